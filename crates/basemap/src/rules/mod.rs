//! Data-driven classification rules.
//!
//! A layer is a table of [`ClassificationRule`]s. Every rule is evaluated
//! independently against each source feature, so one feature can match
//! several rules and produce one output feature per match.

pub mod derive;
pub mod predicate;

pub use derive::{derive_attributes, AttributeRename};
pub use predicate::TagPredicate;

use crate::collector::FeatureEmitter;
use crate::error::{LayerError, Result};
use crate::feature::{GeometryKind, OutputFeature, SourceFeature, KIND_ATTR, MIN_ZOOM_ATTR};
use crate::layers::ProcessContext;

/// Highest zoom a rule may declare
pub const MAX_ZOOM: u8 = 24;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassificationRule {
    pub geometry: GeometryKind,
    pub predicate: TagPredicate,
    pub kind: &'static str,
    pub min_zoom: u8,
    pub attributes: &'static [AttributeRename],
    /// Zoom from which name attributes are encoded; `None` skips names
    pub names: Option<u8>,
}

impl ClassificationRule {
    pub fn matches(&self, feature: &SourceFeature) -> bool {
        feature.kind() == self.geometry && self.predicate.matches(feature)
    }

    /// Write the rule's zoom threshold to the feature, both as visibility
    /// and as a `min_zoom` attribute
    pub fn assign_min_zoom(&self, feature: &mut OutputFeature) {
        feature
            .set_attr(MIN_ZOOM_ATTR, self.min_zoom)
            .set_min_zoom(self.min_zoom);
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| LayerError::InvalidRule {
            kind: self.kind,
            reason,
        };

        if self.kind.is_empty() {
            return Err(invalid("kind must not be empty".into()));
        }
        if self.min_zoom > MAX_ZOOM {
            return Err(invalid(format!(
                "min zoom {} exceeds {}",
                self.min_zoom, MAX_ZOOM
            )));
        }

        for (i, rename) in self.attributes.iter().enumerate() {
            if rename.output.is_empty() {
                return Err(invalid(format!("empty output key for `{}`", rename.source)));
            }
            if rename.output == KIND_ATTR || rename.output == MIN_ZOOM_ATTR {
                return Err(invalid(format!("output key `{}` is reserved", rename.output)));
            }
            if self.attributes[..i].iter().any(|r| r.output == rename.output) {
                return Err(invalid(format!("output key `{}` set twice", rename.output)));
            }
            // Only the predicate key is guaranteed present on a match
            if rename.required && rename.source != self.predicate.key() {
                return Err(invalid(format!(
                    "required tag `{}` is not tested by the predicate",
                    rename.source
                )));
            }
        }

        Ok(())
    }
}

/// A validated, ordered rule table
#[derive(Clone, Debug)]
pub struct RuleSet {
    rules: Vec<ClassificationRule>,
}

impl RuleSet {
    pub fn new(rules: impl Into<Vec<ClassificationRule>>) -> Result<Self> {
        let rules = rules.into();
        for rule in &rules {
            rule.validate()?;
        }
        Ok(Self { rules })
    }

    /// Rules satisfied by `feature`, in table order
    pub fn matching<'a>(
        &'a self,
        feature: &'a SourceFeature,
    ) -> impl Iterator<Item = &'a ClassificationRule> + 'a {
        self.rules.iter().filter(move |rule| rule.matches(feature))
    }

    /// Emit one output feature per matching rule into `layer`.
    ///
    /// Returns the number of features emitted.
    pub fn emit(
        &self,
        layer: &'static str,
        feature: &SourceFeature,
        ctx: &ProcessContext,
        out: &mut dyn FeatureEmitter,
    ) -> Result<usize> {
        let mut emitted = 0;

        for rule in self.matching(feature) {
            log::trace!(
                "{} {} matched rule `{}`",
                feature.element().map(|e| e.to_string()).unwrap_or_default(),
                feature.source_id(),
                rule.kind
            );

            let attrs = derive_attributes(rule, feature)?;
            let id = ctx.ids.id(feature)?;

            let output = match rule.geometry {
                GeometryKind::Point => out.emit_point(layer, feature.geometry())?,
                _ => out.emit(layer, feature.geometry())?,
            };
            output.set_id(id);
            for (key, value) in attrs {
                output.set_attr(key, value);
            }
            rule.assign_min_zoom(output);
            if let Some(name_zoom) = rule.names {
                ctx.names.add_names(output, feature, name_zoom);
            }

            emitted += 1;
        }

        Ok(emitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::FeatureCollector;
    use crate::feature::AttrValue;
    use geo::{line_string, Point};

    const AMENITY: ClassificationRule = ClassificationRule {
        geometry: GeometryKind::Point,
        predicate: TagPredicate::Present("amenity"),
        kind: "amenity",
        min_zoom: 15,
        attributes: &[AttributeRename::required("amenity", "amenity_type")],
        names: Some(0),
    };

    const BENCH: ClassificationRule = ClassificationRule {
        geometry: GeometryKind::Point,
        predicate: TagPredicate::OneOf {
            key: "amenity",
            values: &["bench"],
        },
        kind: "bench",
        min_zoom: 17,
        attributes: &[AttributeRename::copy("backrest")],
        names: None,
    };

    fn node(tags: &[(&str, &str)]) -> SourceFeature {
        SourceFeature::osm_node(Point::new(1.0, 1.0), tags.iter().copied(), 10)
    }

    #[test]
    fn test_rules_are_not_exclusive() {
        let rules = RuleSet::new([AMENITY, BENCH]).unwrap();

        let bench = node(&[("amenity", "bench")]);
        let kinds: Vec<_> = rules.matching(&bench).map(|r| r.kind).collect();
        assert_eq!(kinds, vec!["amenity", "bench"]);

        let fountain = node(&[("amenity", "fountain")]);
        let kinds: Vec<_> = rules.matching(&fountain).map(|r| r.kind).collect();
        assert_eq!(kinds, vec!["amenity"]);
    }

    #[test]
    fn test_geometry_constraint() {
        let rules = RuleSet::new([AMENITY]).unwrap();
        let way = SourceFeature::new(
            line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)],
            [("amenity", "bench")],
            None,
            1,
        );
        assert_eq!(rules.matching(&way).count(), 0);
    }

    #[test]
    fn test_emit_populates_features() {
        let rules = RuleSet::new([AMENITY, BENCH]).unwrap();
        let ctx = ProcessContext::default();
        let mut out = FeatureCollector::new();

        let count = rules
            .emit(
                "test",
                &node(&[("amenity", "bench"), ("backrest", "no"), ("name", "Memorial")]),
                &ctx,
                &mut out,
            )
            .unwrap();
        assert_eq!(count, 2);

        let features = out.into_features();
        assert_eq!(features[0].kind(), Some("amenity"));
        assert_eq!(features[0].min_zoom(), 15);
        assert_eq!(features[0].attr("amenity_type"), Some(&AttrValue::from("bench")));
        assert_eq!(features[0].attr("name"), Some(&AttrValue::from("Memorial")));

        assert_eq!(features[1].kind(), Some("bench"));
        assert_eq!(features[1].attr(MIN_ZOOM_ATTR), Some(&AttrValue::Integer(17)));
        assert_eq!(features[1].attr("backrest"), Some(&AttrValue::from("no")));
        assert_eq!(features[1].attr("name"), None);

        assert_eq!(features[0].id(), features[1].id());
        assert_eq!(features[0].geometry(), features[1].geometry());
    }

    #[test]
    fn test_no_match_emits_nothing() {
        let rules = RuleSet::new([AMENITY]).unwrap();
        let mut out = FeatureCollector::new();
        let count = rules
            .emit("test", &node(&[("shop", "bakery")]), &ProcessContext::default(), &mut out)
            .unwrap();
        assert_eq!(count, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn test_validate_rejects_unguarded_required_tag() {
        const UNGUARDED: ClassificationRule = ClassificationRule {
            attributes: &[AttributeRename::required("operator", "operator")],
            ..AMENITY
        };
        assert!(matches!(
            RuleSet::new([UNGUARDED]),
            Err(LayerError::InvalidRule { kind: "amenity", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_reserved_and_duplicate_keys() {
        const RESERVED: ClassificationRule = ClassificationRule {
            attributes: &[AttributeRename::optional("type", "kind")],
            ..BENCH
        };
        assert!(RESERVED.validate().is_err());

        const DUPLICATE: ClassificationRule = ClassificationRule {
            attributes: &[
                AttributeRename::copy("colour"),
                AttributeRename::optional("color", "colour"),
            ],
            ..BENCH
        };
        assert!(DUPLICATE.validate().is_err());

        let empty_kind = ClassificationRule { kind: "", ..BENCH };
        assert!(empty_kind.validate().is_err());

        let too_deep = ClassificationRule { min_zoom: 30, ..BENCH };
        assert!(too_deep.validate().is_err());
    }
}
