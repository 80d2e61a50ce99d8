//! Matching engine for jsonmatch.
//!
//! Compares an expected value against an actual one and returns a navigable
//! [`MatchingResult`] tree instead of a boolean. Attributes can be ignored,
//! and array elements are matched regardless of order, optionally by a
//! declared business key.
//!
//! # Quick Start
//!
//! ```rust
//! use jsonmatch_engine::{compare_json, MatchingStatus};
//! use serde_json::json;
//!
//! let result = compare_json(
//!     &json!({"id": 1, "tags": ["a", "b"], "seen": "today"}),
//!     &json!({"id": 1, "tags": ["b", "a"], "seen": "yesterday"}),
//!     Some(&json!({"seen": true})),
//!     None,
//! )
//! .unwrap();
//! assert_eq!(result.status(), MatchingStatus::Pass);
//! ```
//!
//! # Key Types
//!
//! - [`Matcher`] -- Comparator configured by [`MatcherConfig`]
//! - [`MatchRules`] / [`ConfigNode`] -- Validated ignore and business-key trees
//! - [`MatchError`] -- Configuration, unsupported-shape, and depth errors

mod array;
pub mod comparator;
pub mod config;
pub mod error;
mod object;
pub mod rules;
mod scope;

pub use comparator::Matcher;
pub use config::MatcherConfig;
pub use error::{EngineResult, MatchError};
pub use rules::{ConfigNode, MatchRules};

pub use jsonmatch_types::{Map, MatchingAlgo, MatchingResult, MatchingStatus, Value};

/// Compare two values with the default [`MatcherConfig`].
///
/// Omitted rule trees are empty. The pair is validated before anything is
/// compared.
pub fn compare(
    expected: &Value,
    actual: &Value,
    ignored: Option<&ConfigNode>,
    business_key: Option<&ConfigNode>,
) -> EngineResult<MatchingResult> {
    let rules = MatchRules::new(
        ignored.cloned().unwrap_or_default(),
        business_key.cloned().unwrap_or_default(),
    )?;
    Matcher::default().compare(expected, actual, &rules)
}

/// [`compare`] over raw JSON values and raw rule trees.
pub fn compare_json(
    expected: &serde_json::Value,
    actual: &serde_json::Value,
    ignored: Option<&serde_json::Value>,
    business_key: Option<&serde_json::Value>,
) -> EngineResult<MatchingResult> {
    let rules = MatchRules::from_json(ignored, business_key)?;
    Matcher::default().compare(
        &Value::from(expected.clone()),
        &Value::from(actual.clone()),
        &rules,
    )
}
