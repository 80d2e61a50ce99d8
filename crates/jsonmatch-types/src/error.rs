use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid RFC 3339 timestamp: {0}")]
    InvalidTimestamp(String),
}
