//! Routes source features to every registered layer and hands each layer
//! its own features back at post-processing time.

use std::sync::Arc;

use crate::collector::FeatureCollector;
use crate::error::{LayerError, Result};
use crate::feature::{OutputFeature, SourceFeature};
use crate::layers::{Layer, ProcessContext};

pub struct Profile {
    layers: Vec<Arc<dyn Layer>>,
    context: ProcessContext,
}

impl Profile {
    pub fn new(context: ProcessContext) -> Self {
        Self {
            layers: Vec::new(),
            context,
        }
    }

    /// Register a layer. Layer names must be unique.
    pub fn with_layer(mut self, layer: impl Layer + 'static) -> Result<Self> {
        let name = layer.name();
        if self.layer(name).is_some() {
            return Err(LayerError::DuplicateLayer(name));
        }
        self.layers.push(Arc::new(layer));
        Ok(self)
    }

    pub fn layer(&self, name: &str) -> Option<&Arc<dyn Layer>> {
        self.layers.iter().find(|layer| layer.name() == name)
    }

    pub fn layer_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.layers.iter().map(|layer| layer.name())
    }

    /// Run every layer over one source feature
    pub fn process(&self, feature: &SourceFeature) -> Result<Vec<OutputFeature>> {
        let mut collector = FeatureCollector::new();
        for layer in &self.layers {
            layer.process(feature, &self.context, &mut collector)?;
        }
        Ok(collector.into_features())
    }

    /// Run the named layer's post-processor over its features at `zoom`
    pub fn post_process(
        &self,
        layer: &str,
        zoom: u8,
        features: Vec<OutputFeature>,
    ) -> Result<Vec<OutputFeature>> {
        let layer = self
            .layer(layer)
            .ok_or_else(|| LayerError::UnknownLayer(layer.to_string()))?;
        layer.post_process(zoom, features)
    }

    /// Finish one tile at `zoom`.
    ///
    /// Features below their min zoom are dropped, the rest are grouped per
    /// layer in encounter order and each layer's post-processor runs once.
    /// Output is ordered by layer registration order.
    pub fn finish_zoom(
        &self,
        zoom: u8,
        features: Vec<OutputFeature>,
    ) -> Result<Vec<OutputFeature>> {
        let mut groups: Vec<Vec<OutputFeature>> = vec![Vec::new(); self.layers.len()];

        for feature in features {
            if !feature.is_visible_at(zoom) {
                continue;
            }
            let index = self
                .layers
                .iter()
                .position(|layer| layer.name() == feature.layer())
                .ok_or_else(|| LayerError::UnknownLayer(feature.layer().to_string()))?;
            groups[index].push(feature);
        }

        let mut finished = Vec::new();
        for (layer, group) in self.layers.iter().zip(groups) {
            let before = group.len();
            let processed = layer.post_process(zoom, group)?;
            log::debug!(
                "z{} {}: {} -> {} features after post-processing",
                zoom,
                layer.name(),
                before,
                processed.len()
            );
            finished.extend(processed);
        }

        Ok(finished)
    }
}
