//! The result tree produced by a comparison.
//!
//! A [`MatchingResult`] is immutable once built. The engine assembles each
//! node with a [`MatchingResultBuilder`] scoped to one recursive call; no
//! builder outlives the node it produces.
//!
//! # Invariants
//!
//! - `Pass` nodes carry no `expected`, `actual`, `count`, or `diff`.
//! - `diff` is kept only on `Fail` and `KeyMatch` nodes.
//! - A `null` side is stored as absent, so serialized reports stay sparse.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::status::{MatchingAlgo, MatchingStatus};
use crate::value::Value;

/// `match_index` of a result that is not a candidate inside an array.
pub const NO_MATCH_INDEX: i64 = -1;

/// One node of the diff tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingResult {
    status: MatchingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expected: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    actual: Option<Value>,
    /// Matching attribute count for objects; `1` on a failed leaf.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    element_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    match_index: Option<i64>,
    /// Keyed by attribute name, or by decimal expected index for arrays.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    diff: Option<BTreeMap<String, MatchingResult>>,
    /// Actual indices no expected element claimed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unmatched_actual: Option<Vec<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    algorithm: Option<MatchingAlgo>,
}

impl MatchingResult {
    /// A bare passing node.
    pub fn pass() -> Self {
        MatchingResultBuilder::new(MatchingStatus::Pass).build()
    }

    pub fn builder(status: MatchingStatus) -> MatchingResultBuilder {
        MatchingResultBuilder::new(status)
    }

    /// Reopen this node for re-tagging (e.g. with array indices).
    pub fn into_builder(self) -> MatchingResultBuilder {
        MatchingResultBuilder {
            status: self.status,
            expected: self.expected,
            actual: self.actual,
            count: self.count,
            element_index: self.element_index,
            match_index: self.match_index,
            diff: self.diff,
            unmatched_actual: self.unmatched_actual,
            algorithm: self.algorithm,
        }
    }

    pub fn status(&self) -> MatchingStatus {
        self.status
    }

    pub fn is_pass(&self) -> bool {
        self.status.is_pass()
    }

    pub fn is_key_match(&self) -> bool {
        self.status == MatchingStatus::KeyMatch
    }

    pub fn expected(&self) -> Option<&Value> {
        self.expected.as_ref()
    }

    pub fn actual(&self) -> Option<&Value> {
        self.actual.as_ref()
    }

    pub fn count(&self) -> Option<usize> {
        self.count
    }

    pub fn element_index(&self) -> Option<usize> {
        self.element_index
    }

    pub fn match_index(&self) -> Option<i64> {
        self.match_index
    }

    pub fn diff(&self) -> Option<&BTreeMap<String, MatchingResult>> {
        self.diff.as_ref()
    }

    pub fn unmatched_actual(&self) -> Option<&[usize]> {
        self.unmatched_actual.as_deref()
    }

    pub fn algorithm(&self) -> Option<MatchingAlgo> {
        self.algorithm
    }

    /// Child entry for an attribute name (or stringified expected index).
    pub fn get(&self, key: &str) -> Option<&MatchingResult> {
        self.diff.as_ref().and_then(|diff| diff.get(key))
    }

    /// Child entry for an expected array index.
    pub fn at(&self, index: usize) -> Option<&MatchingResult> {
        self.get(&index.to_string())
    }

    /// Follow a sequence of diff keys from this node.
    ///
    /// ```rust
    /// use jsonmatch_types::{MatchingResult, MatchingStatus};
    ///
    /// let root = MatchingResult::pass();
    /// assert!(root.lookup(["missing", "0"]).is_none());
    /// assert_eq!(root.lookup::<_, &str>([]).map(|r| r.status()), Some(MatchingStatus::Pass));
    /// ```
    pub fn lookup<I, S>(&self, path: I) -> Option<&MatchingResult>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        path.into_iter()
            .try_fold(self, |node, key| node.get(key.as_ref()))
    }

    /// Visit every node depth-first, parents before children, with the
    /// diff keys leading to it.
    pub fn walk<F>(&self, mut visit: F)
    where
        F: FnMut(&[String], &MatchingResult),
    {
        let mut path = Vec::new();
        self.walk_inner(&mut path, &mut visit);
    }

    fn walk_inner<F>(&self, path: &mut Vec<String>, visit: &mut F)
    where
        F: FnMut(&[String], &MatchingResult),
    {
        visit(path, self);
        if let Some(diff) = &self.diff {
            for (key, child) in diff {
                path.push(key.clone());
                child.walk_inner(path, visit);
                path.pop();
            }
        }
    }

    /// The deepest offending nodes, as `(json pointer, status)` pairs.
    ///
    /// A node is reported when its status is not `Pass`, `KeyMatch`, or
    /// `Ignored` and none of its children is reported.
    pub fn failures(&self) -> Vec<(String, MatchingStatus)> {
        let mut out = Vec::new();
        self.walk(|path, node| {
            if node.status.is_benign() {
                return;
            }
            let has_failing_child = node
                .diff
                .as_ref()
                .is_some_and(|diff| diff.values().any(|c| !c.status.is_benign()));
            if !has_failing_child {
                out.push((json_pointer(path), node.status));
            }
        });
        out
    }
}

/// Render diff keys as an RFC 6901 pointer; the root renders as `/`.
pub fn json_pointer<I, S>(segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for segment in segments {
        out.push('/');
        out.push_str(&segment.as_ref().replace('~', "~0").replace('/', "~1"));
    }
    if out.is_empty() {
        out.push('/');
    }
    out
}

/// Mutable accumulator for one [`MatchingResult`] node.
#[derive(Clone, Debug)]
pub struct MatchingResultBuilder {
    status: MatchingStatus,
    expected: Option<Value>,
    actual: Option<Value>,
    count: Option<usize>,
    element_index: Option<usize>,
    match_index: Option<i64>,
    diff: Option<BTreeMap<String, MatchingResult>>,
    unmatched_actual: Option<Vec<usize>>,
    algorithm: Option<MatchingAlgo>,
}

impl MatchingResultBuilder {
    pub fn new(status: MatchingStatus) -> Self {
        Self {
            status,
            expected: None,
            actual: None,
            count: None,
            element_index: None,
            match_index: None,
            diff: None,
            unmatched_actual: None,
            algorithm: None,
        }
    }

    pub fn status(&self) -> MatchingStatus {
        self.status
    }

    pub fn with_status(mut self, status: MatchingStatus) -> Self {
        self.status = status;
        self
    }

    /// Attach the expected side; `null` is stored as absent.
    pub fn with_expected(mut self, value: &Value) -> Self {
        self.expected = non_null(value);
        self
    }

    /// Attach the actual side; `null` is stored as absent.
    pub fn with_actual(mut self, value: &Value) -> Self {
        self.actual = non_null(value);
        self
    }

    /// Attach both sides at once.
    pub fn with_sides(self, expected: &Value, actual: &Value) -> Self {
        self.with_expected(expected).with_actual(actual)
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_element_index(mut self, index: usize) -> Self {
        self.element_index = Some(index);
        self
    }

    pub fn with_match_index(mut self, index: i64) -> Self {
        self.match_index = Some(index);
        self
    }

    pub fn with_diff(mut self, diff: BTreeMap<String, MatchingResult>) -> Self {
        self.diff = Some(diff);
        self
    }

    pub fn with_unmatched_actual(mut self, indices: Vec<usize>) -> Self {
        self.unmatched_actual = Some(indices);
        self
    }

    pub fn with_algorithm(mut self, algorithm: MatchingAlgo) -> Self {
        self.algorithm = Some(algorithm);
        self
    }

    /// Freeze the node, dropping fields its status does not carry.
    pub fn build(mut self) -> MatchingResult {
        match self.status {
            MatchingStatus::Pass => {
                self.expected = None;
                self.actual = None;
                self.count = None;
                self.diff = None;
            }
            MatchingStatus::Fail | MatchingStatus::KeyMatch => {}
            _ => self.diff = None,
        }
        MatchingResult {
            status: self.status,
            expected: self.expected,
            actual: self.actual,
            count: self.count,
            element_index: self.element_index,
            match_index: self.match_index,
            diff: self.diff,
            unmatched_actual: self.unmatched_actual,
            algorithm: self.algorithm,
        }
    }
}

fn non_null(value: &Value) -> Option<Value> {
    (!value.is_null()).then(|| value.clone())
}
