//! Source and output feature models.

pub mod id;
pub mod output;
pub mod source;

// Re-exports for convenience
pub use id::{FeatureId, IdGenerator, OsmFeatureId};
pub use output::{AttrValue, OutputFeature, KIND_ATTR, MIN_ZOOM_ATTR};
pub use source::{ElementType, GeometryKind, SourceFeature, Tags};
