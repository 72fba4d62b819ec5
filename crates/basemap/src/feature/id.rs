//! Stable output feature ids.
//!
//! Ids must be identical across runs over the same input, so generators are
//! pure functions of the source feature's identity seed.

use std::fmt;

use crate::error::{LayerError, Result};
use crate::feature::source::SourceFeature;

/// Bits reserved for the source id below the element type tag
const ELEMENT_TYPE_SHIFT: u32 = 44;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct FeatureId(u64);

impl FeatureId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<FeatureId> for u64 {
    fn from(id: FeatureId) -> Self {
        id.0
    }
}

/// Derives the output id for a source feature
pub trait IdGenerator: Send + Sync {
    fn id(&self, feature: &SourceFeature) -> Result<FeatureId>;
}

/// Tags OSM ids with their element type so nodes, ways and relations that
/// share a numeric id still get distinct feature ids.
///
/// Layout: `(element_type << 44) | osm_id`, with node = 1, way = 2,
/// relation = 3. Features without an element type keep their raw id.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsmFeatureId;

impl IdGenerator for OsmFeatureId {
    fn id(&self, feature: &SourceFeature) -> Result<FeatureId> {
        let raw = u64::try_from(feature.source_id()).map_err(|_| {
            LayerError::InvalidId(format!("negative source id {}", feature.source_id()))
        })?;

        let Some(element) = feature.element() else {
            return Ok(FeatureId(raw));
        };

        if raw >> ELEMENT_TYPE_SHIFT != 0 {
            return Err(LayerError::InvalidId(format!(
                "{} id {} does not fit in {} bits",
                element, raw, ELEMENT_TYPE_SHIFT
            )));
        }

        Ok(FeatureId(((element as u64) << ELEMENT_TYPE_SHIFT) | raw))
    }
}
