//! Output layers and the collaborators they share.

pub mod transit;

pub use transit::Transit;

use std::sync::Arc;

use crate::collector::FeatureEmitter;
use crate::error::Result;
use crate::feature::{IdGenerator, OsmFeatureId, OutputFeature, SourceFeature};
use crate::names::{NameResolver, OsmNames};

/// Collaborators handed to every layer while processing a source feature
#[derive(Clone)]
pub struct ProcessContext {
    pub ids: Arc<dyn IdGenerator>,
    pub names: Arc<dyn NameResolver>,
}

impl ProcessContext {
    pub fn new(ids: Arc<dyn IdGenerator>, names: Arc<dyn NameResolver>) -> Self {
        Self { ids, names }
    }
}

impl Default for ProcessContext {
    fn default() -> Self {
        Self::new(Arc::new(OsmFeatureId), Arc::new(OsmNames::new()))
    }
}

/// Per-zoom pass over every feature a layer emitted for one tile.
///
/// Implementations may merge, drop or reorder features but never add new
/// ones. The default keeps the input untouched.
pub trait LayerPostProcessor {
    fn post_process(&self, zoom: u8, features: Vec<OutputFeature>) -> Result<Vec<OutputFeature>> {
        let _ = zoom;
        Ok(features)
    }
}

/// A named output layer
pub trait Layer: LayerPostProcessor + Send + Sync {
    fn name(&self) -> &'static str;

    /// Emit this layer's features for `feature` into `out`
    fn process(
        &self,
        feature: &SourceFeature,
        ctx: &ProcessContext,
        out: &mut dyn FeatureEmitter,
    ) -> Result<()>;
}
