//! Error type shared by the layer engine and its collaborators.

use crate::feature::GeometryKind;

#[derive(Debug, thiserror::Error)]
pub enum LayerError {
    #[error("Rule `{kind}` matched but required tag `{key}` is missing")]
    MissingRequiredTag { kind: &'static str, key: &'static str },

    #[error("Layer `{layer}` expected {expected} geometry, got {actual}")]
    GeometryMismatch {
        layer: &'static str,
        expected: GeometryKind,
        actual: GeometryKind,
    },

    #[error("Invalid feature id: {0}")]
    InvalidId(String),

    #[error("Invalid rule `{kind}`: {reason}")]
    InvalidRule { kind: &'static str, reason: String },

    #[error("Unknown layer: {0}")]
    UnknownLayer(String),

    #[error("Layer registered twice: {0}")]
    DuplicateLayer(&'static str),
}

pub type Result<T> = std::result::Result<T, LayerError>;
