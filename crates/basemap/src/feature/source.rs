//! Read-only view of a tagged record handed to the layers by the upstream
//! reader.

use std::collections::BTreeMap;

use geo::{Geometry, Point};

/// Tag storage type, ordered by key
pub type Tags = BTreeMap<String, String>;

/// Coarse geometry class used by rule constraints
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum GeometryKind {
    Point,
    Line,
    Polygon,
    Other,
}

impl GeometryKind {
    pub fn of(geometry: &Geometry<f64>) -> Self {
        match geometry {
            Geometry::Point(_) | Geometry::MultiPoint(_) => Self::Point,
            Geometry::Line(_) | Geometry::LineString(_) | Geometry::MultiLineString(_) => {
                Self::Line
            }
            Geometry::Polygon(_)
            | Geometry::MultiPolygon(_)
            | Geometry::Rect(_)
            | Geometry::Triangle(_) => Self::Polygon,
            Geometry::GeometryCollection(_) => Self::Other,
        }
    }
}

/// OSM element type a feature was read from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[repr(u8)]
pub enum ElementType {
    Node = 1,
    Way = 2,
    Relation = 3,
}

/// A single tagged record from the source dataset.
///
/// Tag lookups treat an empty value the same as a missing key, so nothing
/// downstream ever copies an empty string into an output attribute.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceFeature {
    geometry: Geometry<f64>,
    kind: GeometryKind,
    tags: Tags,
    element: Option<ElementType>,
    source_id: i64,
}

impl SourceFeature {
    pub fn new<K, V>(
        geometry: impl Into<Geometry<f64>>,
        tags: impl IntoIterator<Item = (K, V)>,
        element: Option<ElementType>,
        source_id: i64,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let geometry = geometry.into();
        Self {
            kind: GeometryKind::of(&geometry),
            geometry,
            tags: tags
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            element,
            source_id,
        }
    }

    pub fn osm_node<K, V>(location: Point, tags: impl IntoIterator<Item = (K, V)>, id: i64) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self::new(location, tags, Some(ElementType::Node), id)
    }

    pub fn geometry(&self) -> &Geometry<f64> {
        &self.geometry
    }

    pub fn kind(&self) -> GeometryKind {
        self.kind
    }

    pub fn is_point(&self) -> bool {
        self.kind == GeometryKind::Point
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    /// `None` for features that did not come from an OSM element
    pub fn element(&self) -> Option<ElementType> {
        self.element
    }

    pub fn source_id(&self) -> i64 {
        self.source_id
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.tags
            .get(key)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn has_tag(&self, key: &str) -> bool {
        self.get_string(key).is_some()
    }

    /// True if `key` is present with one of `values`
    pub fn has_tag_value(&self, key: &str, values: &[&str]) -> bool {
        self.get_string(key)
            .map(|value| values.contains(&value))
            .unwrap_or(false)
    }
}
