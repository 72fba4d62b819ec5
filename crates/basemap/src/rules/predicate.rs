//! Tag predicates deciding whether a source feature belongs to a rule.

use crate::feature::SourceFeature;

/// Condition on a single tag key.
///
/// Only the declared key is read; every other tag on the feature is ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagPredicate {
    /// Key present with any non-empty value
    Present(&'static str),
    /// Key present with one of the listed values
    OneOf {
        key: &'static str,
        values: &'static [&'static str],
    },
}

impl TagPredicate {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Present(key) | Self::OneOf { key, .. } => *key,
        }
    }

    pub fn matches(&self, feature: &SourceFeature) -> bool {
        match self {
            Self::Present(key) => feature.has_tag(key),
            Self::OneOf { key, values } => feature.has_tag_value(key, values),
        }
    }
}
