//! Shape dispatch: the entry point of every comparison.
//!
//! [`Matcher::compare`] classifies both sides and either settles the pair
//! itself (nulls, leaves, array-vs-non-array) or hands it to the object
//! differ or the array matcher, which recurse back here for nested values.
//!
//! # Cost
//!
//! Objects cost one comparison per attribute. Arrays compare every expected
//! element against every actual element, so an array comparison is
//! O(E × A) element comparisons, and nested arrays multiply. Every failing
//! cell of that matrix keeps copies of both elements, so peak memory of an
//! array comparison also grows with E × A times the element size. Recursion
//! depth equals input nesting depth and is capped by
//! [`MatcherConfig::max_depth`], which counts the objects and arrays entered;
//! leaves never cost a level.

use std::cmp::Ordering;

use tracing::trace;

use jsonmatch_types::{Map, MatchingResult, MatchingStatus, Value, ValueKind, NO_MATCH_INDEX};

use crate::config::MatcherConfig;
use crate::error::{EngineResult, MatchError};
use crate::rules::{ConfigNode, MatchRules};
use crate::scope::Scope;

/// Deep comparator. Holds only options; every call is independent.
#[derive(Clone, Debug, Default)]
pub struct Matcher {
    config: MatcherConfig,
}

impl Matcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Compare two values under validated rules.
    pub fn compare(
        &self,
        expected: &Value,
        actual: &Value,
        rules: &MatchRules,
    ) -> EngineResult<MatchingResult> {
        self.compare_at(
            expected,
            actual,
            rules.ignored(),
            rules.business_key(),
            Scope::root(),
        )
    }

    /// Compare two objects attribute by attribute.
    pub fn diff_objects(
        &self,
        expected: &Map,
        actual: &Map,
        rules: &MatchRules,
    ) -> EngineResult<MatchingResult> {
        self.diff_objects_at(
            expected,
            actual,
            rules.ignored(),
            rules.business_key(),
            Scope::root(),
        )
    }

    /// Match the elements of two arrays regardless of order.
    pub fn match_arrays(
        &self,
        expected: &[Value],
        actual: &[Value],
        rules: &MatchRules,
    ) -> EngineResult<MatchingResult> {
        self.match_arrays_at(
            expected,
            actual,
            rules.ignored(),
            rules.business_key(),
            Scope::root(),
        )
    }

    pub(crate) fn compare_at(
        &self,
        expected: &Value,
        actual: &Value,
        ignored: &ConfigNode,
        business_key: &ConfigNode,
        scope: Scope<'_>,
    ) -> EngineResult<MatchingResult> {
        trace!(
            depth = scope.depth(),
            expected = ?expected.kind(),
            actual = ?actual.kind(),
            "dispatching comparison"
        );

        let result = match (expected, actual) {
            (Value::Null, Value::Null) => MatchingResult::pass(),
            (Value::Null, _) | (_, Value::Null) => MatchingResult::builder(MatchingStatus::Fail)
                .with_sides(expected, actual)
                .with_match_index(NO_MATCH_INDEX)
                .build(),
            (Value::Array(exp), Value::Array(act)) => {
                return self.match_arrays_at(exp, act, ignored, business_key, scope);
            }
            (Value::Array(_), _) | (_, Value::Array(_)) => {
                MatchingResult::builder(MatchingStatus::ObjectMismatch)
                    .with_sides(expected, actual)
                    .build()
            }
            (Value::Object(exp), Value::Object(act)) => {
                return self.diff_objects_at(exp, act, ignored, business_key, scope);
            }
            (Value::Object(_), _) | (_, Value::Object(_)) => {
                MatchingResult::builder(MatchingStatus::Fail)
                    .with_sides(expected, actual)
                    .build()
            }
            _ => compare_leaves(expected, actual),
        };
        Ok(result)
    }

    /// Fail once the scope is nested deeper than the configured limit.
    /// Called on entering an object or an array.
    pub(crate) fn enter(&self, scope: &Scope<'_>) -> EngineResult<()> {
        if scope.depth() > self.config.max_depth {
            return Err(MatchError::DepthExceeded {
                limit: self.config.max_depth,
                path: scope.pointer(),
            });
        }
        Ok(())
    }
}

/// Compare two non-null, non-composite values.
///
/// Primitives match on exact equality, ordered values when their comparison
/// is `Equal`. A primitive never matches an ordered value.
pub(crate) fn compare_leaves(expected: &Value, actual: &Value) -> MatchingResult {
    if leaves_equal(expected, actual) {
        MatchingResult::pass()
    } else {
        MatchingResult::builder(MatchingStatus::Fail)
            .with_sides(expected, actual)
            .with_count(1)
            .build()
    }
}

fn leaves_equal(expected: &Value, actual: &Value) -> bool {
    match (expected.kind(), actual.kind()) {
        (ValueKind::Primitive, ValueKind::Primitive) => expected == actual,
        (ValueKind::Ordered, ValueKind::Ordered) => match (expected, actual) {
            (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b) == Ordering::Equal,
            _ => false,
        },
        _ => false,
    }
}
