//! Copying and renaming source tags into output attributes.

use crate::error::{LayerError, Result};
use crate::feature::{AttrValue, SourceFeature, KIND_ATTR};
use crate::rules::ClassificationRule;

/// One `(source key, output key)` entry of a rule's derivation list
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttributeRename {
    pub source: &'static str,
    pub output: &'static str,
    /// Required entries must be guaranteed by the rule's predicate
    pub required: bool,
}

impl AttributeRename {
    /// Copy under the same key when present
    pub const fn copy(key: &'static str) -> Self {
        Self::optional(key, key)
    }

    pub const fn optional(source: &'static str, output: &'static str) -> Self {
        Self {
            source,
            output,
            required: false,
        }
    }

    pub const fn required(source: &'static str, output: &'static str) -> Self {
        Self {
            source,
            output,
            required: true,
        }
    }
}

/// Build the base attributes of a matched rule: `kind` first, then the
/// rule's derivation list in order. Absent optional tags add nothing.
pub fn derive_attributes(
    rule: &ClassificationRule,
    feature: &SourceFeature,
) -> Result<Vec<(&'static str, AttrValue)>> {
    let mut attrs = Vec::with_capacity(rule.attributes.len() + 1);
    attrs.push((KIND_ATTR, AttrValue::from(rule.kind)));

    for rename in rule.attributes {
        match feature.get_string(rename.source) {
            Some(value) => attrs.push((rename.output, AttrValue::from(value))),
            None if rename.required => {
                debug_assert!(
                    false,
                    "rule `{}` matched without required tag `{}`",
                    rule.kind, rename.source
                );
                return Err(LayerError::MissingRequiredTag {
                    kind: rule.kind,
                    key: rename.source,
                });
            }
            None => {}
        }
    }

    Ok(attrs)
}
