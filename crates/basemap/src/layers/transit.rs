//! Street-level features for pedestrian and cyclist navigation: crossings
//! and the barriers that block bikes.

use crate::collector::FeatureEmitter;
use crate::error::Result;
use crate::feature::{GeometryKind, SourceFeature};
use crate::layers::{Layer, LayerPostProcessor, ProcessContext};
use crate::rules::{AttributeRename, ClassificationRule, RuleSet, TagPredicate};

/// Only useful at navigation scale, not in overview maps
const STREET_LEVEL_ZOOM: u8 = 16;

const CROSSING: ClassificationRule = ClassificationRule {
    geometry: GeometryKind::Point,
    predicate: TagPredicate::OneOf {
        key: "highway",
        values: &["crossing"],
    },
    kind: "crossing",
    min_zoom: STREET_LEVEL_ZOOM,
    attributes: &[
        AttributeRename::copy("crossing"),
        AttributeRename::optional("crossing:signals", "crossing_signals"),
        AttributeRename::copy("tactile_paving"),
        AttributeRename::copy("bicycle"),
        AttributeRename::optional("crossing:bicycle", "crossing_bicycle"),
    ],
    names: Some(0),
};

const BARRIER: ClassificationRule = ClassificationRule {
    geometry: GeometryKind::Point,
    predicate: TagPredicate::OneOf {
        key: "barrier",
        values: &["cycle_barrier", "bollard", "chicane"],
    },
    kind: "barrier",
    min_zoom: STREET_LEVEL_ZOOM,
    attributes: &[
        AttributeRename::required("barrier", "barrier_type"),
        AttributeRename::copy("bicycle"),
        AttributeRename::copy("access"),
    ],
    names: None,
};

/// Rule table of the transit layer, in evaluation order
pub const TRANSIT_RULES: [ClassificationRule; 2] = [CROSSING, BARRIER];

pub struct Transit {
    rules: RuleSet,
}

impl Transit {
    pub const LAYER_NAME: &'static str = "transit";

    pub fn new() -> Result<Self> {
        Self::with_rules(TRANSIT_RULES)
    }

    /// Build the layer from a custom rule table
    pub fn with_rules(rules: impl Into<Vec<ClassificationRule>>) -> Result<Self> {
        Ok(Self {
            rules: RuleSet::new(rules)?,
        })
    }
}

impl Layer for Transit {
    fn name(&self) -> &'static str {
        Self::LAYER_NAME
    }

    fn process(
        &self,
        feature: &SourceFeature,
        ctx: &ProcessContext,
        out: &mut dyn FeatureEmitter,
    ) -> Result<()> {
        let emitted = self.rules.emit(Self::LAYER_NAME, feature, ctx, out)?;
        if emitted > 0 {
            log::debug!(
                "{}: {} feature(s) from source id {}",
                Self::LAYER_NAME,
                emitted,
                feature.source_id()
            );
        }
        Ok(())
    }
}

impl LayerPostProcessor for Transit {}
