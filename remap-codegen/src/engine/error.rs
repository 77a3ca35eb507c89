//! Generation-time errors.

use thiserror::Error;

/// Why a mapper could not be generated.
///
/// Every variant except [`Internal`](MappingError::Internal) is reported as a
/// diagnostic and abandons only the mapper it occurred in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("invalid declaration `{declaration}`: {reason}")]
    AnnotationShape { declaration: String, reason: String },

    #[error("can't find mapper `{name}`")]
    UnresolvedMapper { name: String },

    #[error("no mapping for `{path}` in {requester}: {reason}")]
    MappingNotFound {
        path: String,
        requester: String,
        reason: String,
    },

    #[error("invalid source path `{path}` in {requester}: {reason}")]
    InvalidSourcePath {
        path: String,
        requester: String,
        reason: String,
    },

    #[error(
        "nullable source `{source_path}` cannot be assigned to non-null target `{target}` in {requester}"
    )]
    NullabilityCompliance {
        source_path: String,
        target: String,
        requester: String,
    },

    #[error("enum entry `{entry}` is never produced by {requester}")]
    EnumCompliance { entry: String, requester: String },

    #[error("`{function}` must return a value to be a mapping function")]
    AmbiguousTargetReturn { function: String },

    #[error("internal error: {0}")]
    Internal(String),
}

impl MappingError {
    /// Broken engine invariants abort the whole pass.
    pub fn is_internal(&self) -> bool {
        matches!(self, MappingError::Internal(_))
    }

    /// Re-anchor a lookup failure on the full dotted path it was resolving.
    pub(crate) fn at_path(self, full_path: &str) -> Self {
        match self {
            MappingError::MappingNotFound {
                requester, reason, ..
            } => MappingError::MappingNotFound {
                path: full_path.to_string(),
                requester,
                reason,
            },
            other => other,
        }
    }
}
