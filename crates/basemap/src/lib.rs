//! # basemap-layers
//!
//! Classification of tagged source features into basemap tile layers.
//!
//! ## Features
//!
//! - **Data-driven rules**: each layer is a table of tag predicates, attribute
//!   renames and zoom thresholds
//! - **Pluggable collaborators**: id generation, name resolution and feature
//!   emission sit behind traits
//! - **Post-processing hook**: every layer sees its features once per zoom
//!   and may merge or drop them
//!
//! ## Example
//!
//! ```
//! use basemap_layers::prelude::*;
//! use geo::Point;
//!
//! let profile = Profile::new(ProcessContext::default())
//!     .with_layer(Transit::new()?)?;
//!
//! let crossing = SourceFeature::osm_node(
//!     Point::new(13.4050, 52.5200),
//!     [("highway", "crossing"), ("crossing", "zebra")],
//!     1,
//! );
//!
//! let features = profile.process(&crossing)?;
//! assert_eq!(features.len(), 1);
//! assert_eq!(features[0].kind(), Some("crossing"));
//! assert_eq!(features[0].min_zoom(), 16);
//!
//! // Nothing from this layer is visible below z16
//! assert!(profile.finish_zoom(15, features)?.is_empty());
//! # Ok::<(), basemap_layers::LayerError>(())
//! ```

pub mod collector;
pub mod error;
pub mod feature;
pub mod layers;
pub mod names;
pub mod profile;
pub mod rules;

// Re-exports for convenience
pub mod prelude {
    pub use crate::collector::{FeatureCollector, FeatureEmitter};
    pub use crate::error::{LayerError, Result};
    pub use crate::feature::*;
    pub use crate::layers::{Layer, LayerPostProcessor, ProcessContext, Transit};
    pub use crate::names::{NameResolver, NoNames, OsmNames};
    pub use crate::profile::Profile;
    pub use crate::rules::{AttributeRename, ClassificationRule, RuleSet, TagPredicate};
}

pub use prelude::*;
