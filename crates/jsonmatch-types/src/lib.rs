//! Foundation types for jsonmatch.
//!
//! This crate provides the value model that the matching engine inspects and
//! the result tree it produces. Every other jsonmatch crate depends on
//! `jsonmatch-types`.
//!
//! # Key Types
//!
//! - [`Value`] -- Tagged tree of objects, arrays, and leaves
//! - [`ValueKind`] -- Shape classification used for dispatch (null, primitive, ordered, object, array)
//! - [`MatchingStatus`] -- Per-node outcome of a comparison
//! - [`MatchingAlgo`] -- Whether an attribute took part in business-key evaluation
//! - [`MatchingResult`] / [`MatchingResultBuilder`] -- Immutable, recursively nested diff node

pub mod error;
pub mod result;
pub mod status;
pub mod value;

pub use error::TypeError;
pub use result::{json_pointer, MatchingResult, MatchingResultBuilder, NO_MATCH_INDEX};
pub use status::{MatchingAlgo, MatchingStatus};
pub use value::{Map, Value, ValueKind};
