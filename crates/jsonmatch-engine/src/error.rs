//! Error types for the matching engine.

/// Errors that abort a comparison. None of them leaves a partial result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    /// An ignore or business-key tree is malformed.
    #[error("invalid rule at {path}: {reason}")]
    InvalidRule { path: String, reason: String },

    /// The same attribute is both ignored and a business key.
    #[error("attribute {path} is both ignored and a business key")]
    ConflictingRule { path: String },

    /// Arrays nested directly in arrays cannot be matched by business key.
    #[error("unsupported comparison at {path}: nested arrays under a business key")]
    UnsupportedComparison { path: String },

    /// Input nesting exceeded the configured limit.
    #[error("nesting depth exceeds {limit} at {path}")]
    DepthExceeded { limit: usize, path: String },
}

impl MatchError {
    pub(crate) fn invalid_rule(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRule {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` for errors in the ignore / business-key configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidRule { .. } | Self::ConflictingRule { .. })
    }
}

/// Convenience alias for engine results.
pub type EngineResult<T> = Result<T, MatchError>;
