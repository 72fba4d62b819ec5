//! Features produced by the layers, ready for the tile encoder.

use std::collections::BTreeMap;
use std::fmt;

use geo::Geometry;

use crate::feature::id::FeatureId;

/// Attribute carrying the symbolic classification of a feature
pub const KIND_ATTR: &str = "kind";

/// Attribute mirroring the feature's minimum zoom for renderer-side filters
pub const MIN_ZOOM_ATTR: &str = "min_zoom";

/// Scalar attribute value, limited to what vector tiles can carry
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum AttrValue {
    String(String),
    Integer(i64),
    Bool(bool),
}

impl AttrValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{}", s),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for AttrValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<u8> for AttrValue {
    fn from(i: u8) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

#[derive(Clone, Debug, PartialEq)]
struct Attribute {
    value: AttrValue,
    min_zoom: u8,
}

/// A feature emitted into one output layer.
///
/// Built through the `set_*` methods right after emission; once handed to
/// the post-processor it is only read.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputFeature {
    layer: &'static str,
    geometry: Geometry<f64>,
    id: Option<FeatureId>,
    attrs: BTreeMap<String, Attribute>,
    min_zoom: u8,
}

impl OutputFeature {
    pub fn new(layer: &'static str, geometry: Geometry<f64>) -> Self {
        Self {
            layer,
            geometry,
            id: None,
            attrs: BTreeMap::new(),
            min_zoom: 0,
        }
    }

    pub fn set_id(&mut self, id: FeatureId) -> &mut Self {
        self.id = Some(id);
        self
    }

    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> &mut Self {
        self.set_attr_with_min_zoom(key, value, 0)
    }

    /// Attach an attribute that is only encoded from `min_zoom` upward
    pub fn set_attr_with_min_zoom(
        &mut self,
        key: impl Into<String>,
        value: impl Into<AttrValue>,
        min_zoom: u8,
    ) -> &mut Self {
        self.attrs.insert(
            key.into(),
            Attribute {
                value: value.into(),
                min_zoom,
            },
        );
        self
    }

    pub fn set_min_zoom(&mut self, min_zoom: u8) -> &mut Self {
        self.min_zoom = min_zoom;
        self
    }

    pub fn layer(&self) -> &'static str {
        self.layer
    }

    pub fn geometry(&self) -> &Geometry<f64> {
        &self.geometry
    }

    pub fn id(&self) -> Option<FeatureId> {
        self.id
    }

    pub fn min_zoom(&self) -> u8 {
        self.min_zoom
    }

    pub fn kind(&self) -> Option<&str> {
        self.attr(KIND_ATTR).and_then(AttrValue::as_str)
    }

    pub fn attr(&self, key: &str) -> Option<&AttrValue> {
        self.attrs.get(key).map(|a| &a.value)
    }

    pub fn is_visible_at(&self, zoom: u8) -> bool {
        zoom >= self.min_zoom
    }

    /// All attributes regardless of their zoom threshold, ordered by key
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttrValue)> + '_ {
        self.attrs.iter().map(|(k, a)| (k.as_str(), &a.value))
    }

    /// Attributes that should be encoded at `zoom`
    pub fn attributes_at(&self, zoom: u8) -> impl Iterator<Item = (&str, &AttrValue)> + '_ {
        self.attrs
            .iter()
            .filter(move |(_, a)| zoom >= a.min_zoom)
            .map(|(k, a)| (k.as_str(), &a.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Point;

    #[test]
    fn test_builder_chain() {
        let mut feature = OutputFeature::new("transit", Point::new(1.0, 2.0).into());
        feature
            .set_id(FeatureId::new(3))
            .set_attr(KIND_ATTR, "crossing")
            .set_attr(MIN_ZOOM_ATTR, 16u8)
            .set_min_zoom(16);

        assert_eq!(feature.layer(), "transit");
        assert_eq!(feature.id(), Some(FeatureId::new(3)));
        assert_eq!(feature.kind(), Some("crossing"));
        assert_eq!(feature.attr(MIN_ZOOM_ATTR), Some(&AttrValue::Integer(16)));
        assert_eq!(feature.min_zoom(), 16);
        assert!(!feature.is_visible_at(15));
        assert!(feature.is_visible_at(16));
    }

    #[test]
    fn test_attributes_at_zoom() {
        let mut feature = OutputFeature::new("transit", Point::new(0.0, 0.0).into());
        feature
            .set_attr("kind", "crossing")
            .set_attr_with_min_zoom("name", "Main Street", 14);

        let low: Vec<_> = feature.attributes_at(13).map(|(k, _)| k).collect();
        assert_eq!(low, vec!["kind"]);

        let high: Vec<_> = feature.attributes_at(14).map(|(k, _)| k).collect();
        assert_eq!(high, vec!["kind", "name"]);

        assert_eq!(feature.attributes().count(), 2);
    }

    #[test]
    fn test_attr_value_display() {
        assert_eq!(AttrValue::from("yes").to_string(), "yes");
        assert_eq!(AttrValue::from(16i64).to_string(), "16");
        assert_eq!(AttrValue::from(true).to_string(), "true");
        assert_eq!(AttrValue::from(16u8).as_integer(), Some(16));
        assert_eq!(AttrValue::from(true).as_str(), None);
    }
}
