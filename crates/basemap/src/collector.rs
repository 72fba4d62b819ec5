//! Output feature allocation.
//!
//! Layers never construct [`OutputFeature`]s directly; they ask an emitter
//! for one, then fill in id, attributes and zoom through the returned handle.

use geo::Geometry;

use crate::error::{LayerError, Result};
use crate::feature::{GeometryKind, OutputFeature};

/// Allocates output features on behalf of a layer
pub trait FeatureEmitter {
    fn emit(&mut self, layer: &'static str, geometry: &Geometry<f64>) -> Result<&mut OutputFeature>;

    /// Emit a point feature, rejecting any other geometry
    fn emit_point(
        &mut self,
        layer: &'static str,
        geometry: &Geometry<f64>,
    ) -> Result<&mut OutputFeature> {
        let actual = GeometryKind::of(geometry);
        if actual != GeometryKind::Point {
            return Err(LayerError::GeometryMismatch {
                layer,
                expected: GeometryKind::Point,
                actual,
            });
        }
        self.emit(layer, geometry)
    }
}

/// In-memory emitter collecting every feature emitted for one source feature
#[derive(Debug, Default)]
pub struct FeatureCollector {
    features: Vec<OutputFeature>,
}

impl FeatureCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn features(&self) -> &[OutputFeature] {
        &self.features
    }

    pub fn into_features(self) -> Vec<OutputFeature> {
        self.features
    }
}

impl FeatureEmitter for FeatureCollector {
    fn emit(
        &mut self,
        layer: &'static str,
        geometry: &Geometry<f64>,
    ) -> Result<&mut OutputFeature> {
        self.features.push(OutputFeature::new(layer, geometry.clone()));
        let index = self.features.len() - 1;
        Ok(&mut self.features[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, Point};

    #[test]
    fn test_collects_in_emission_order() {
        let mut collector = FeatureCollector::new();
        let point: Geometry<f64> = Point::new(1.0, 1.0).into();

        collector.emit("transit", &point).unwrap().set_attr("kind", "a");
        collector.emit_point("transit", &point).unwrap().set_attr("kind", "b");

        assert_eq!(collector.len(), 2);
        let kinds: Vec<_> = collector.features().iter().filter_map(|f| f.kind()).collect();
        assert_eq!(kinds, vec!["a", "b"]);
        assert_eq!(collector.features()[0].geometry(), &point);
    }

    #[test]
    fn test_emit_point_rejects_lines() {
        let mut collector = FeatureCollector::new();
        let line: Geometry<f64> = line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)].into();

        let err = collector.emit_point("transit", &line).unwrap_err();
        assert!(matches!(
            err,
            LayerError::GeometryMismatch {
                expected: GeometryKind::Point,
                actual: GeometryKind::Line,
                ..
            }
        ));
        assert!(collector.is_empty());
    }
}
