//! Order-insensitive matching of two arrays.
//!
//! Each expected element (a *row*) is paired with at most one actual element
//! (a *column*). The assignment is a deterministic greedy heuristic, not an
//! optimal bipartite matching:
//!
//! 1. Score every row against every column.
//! 2. Exact pass: each row takes its first passing, still-free column.
//! 3. Remaining rows are ordered by the quality of their best free candidate
//!    (key matches first, then more matching attributes) and each claims its
//!    best free candidate in turn. Claims are irrevocable.
//!
//! Candidates whose business key does not hold never claim a column; a row
//! left without a candidate is reported as `NotExists`.

use std::cmp::Reverse;

use tracing::debug;

use jsonmatch_types::{MatchingResult, MatchingStatus, Value};

use crate::comparator::Matcher;
use crate::error::{EngineResult, MatchError};
use crate::rules::ConfigNode;
use crate::scope::Scope;

/// Ordering key of a candidate cell; smaller is better.
type Rank = (u8, Reverse<usize>, i64);

impl Matcher {
    pub(crate) fn match_arrays_at(
        &self,
        expected: &[Value],
        actual: &[Value],
        ignored: &ConfigNode,
        business_key: &ConfigNode,
        scope: Scope<'_>,
    ) -> EngineResult<MatchingResult> {
        self.enter(&scope)?;

        let failed = || {
            MatchingResult::builder(MatchingStatus::Fail).with_sides(
                &Value::Array(expected.to_vec()),
                &Value::Array(actual.to_vec()),
            )
        };

        if expected.is_empty() {
            if actual.is_empty() || !self.config().report_unexpected {
                return Ok(MatchingResult::pass());
            }
            return Ok(failed()
                .with_unmatched_actual((0..actual.len()).collect())
                .build());
        }

        if actual.is_empty() {
            let diff = expected
                .iter()
                .enumerate()
                .map(|(i, exp)| (i.to_string(), not_exists(exp)))
                .collect();
            return Ok(failed().with_diff(diff).build());
        }

        let mut rows = Vec::with_capacity(expected.len());
        for (i, exp) in expected.iter().enumerate() {
            let segment = i.to_string();
            let row_scope = scope.child(&segment);
            let mut cells = Vec::with_capacity(actual.len());
            for (j, act) in actual.iter().enumerate() {
                cells.push(self.score_cell(exp, act, i, j, ignored, business_key, row_scope)?);
            }
            rows.push(cells);
        }

        let mut blocked = vec![false; actual.len()];
        let mut resolved: Vec<Option<MatchingResult>> = vec![None; expected.len()];
        let mut deferred = Vec::new();

        for (i, cells) in rows.iter().enumerate() {
            match (0..cells.len()).find(|&j| cells[j].is_pass() && !blocked[j]) {
                Some(j) => {
                    blocked[j] = true;
                    resolved[i] = Some(cells[j].clone());
                }
                None => deferred.push(i),
            }
        }
        let exact = expected.len() - deferred.len();

        // Candidate order per deferred row, then claim order across rows.
        let mut claims: Vec<(usize, Vec<usize>)> = deferred
            .iter()
            .map(|&i| {
                let mut order: Vec<usize> = (0..actual.len()).collect();
                order.sort_by_key(|&j| rank(&rows[i][j]));
                (i, order)
            })
            .collect();
        claims.sort_by_key(|(i, order)| {
            let best = order
                .iter()
                .find(|&&j| !blocked[j] && claimable(&rows[*i][j]))
                .map(|&j| rank(&rows[*i][j]));
            (best.is_none(), best, *i)
        });

        for (i, order) in claims {
            let pick = order
                .into_iter()
                .find(|&j| !blocked[j] && claimable(&rows[i][j]));
            resolved[i] = Some(match pick {
                Some(j) => {
                    blocked[j] = true;
                    rows[i][j].clone()
                }
                None => not_exists(&expected[i]),
            });
        }

        let unmatched: Vec<usize> = (0..actual.len()).filter(|&j| !blocked[j]).collect();
        let extra = self.config().report_unexpected && !unmatched.is_empty();
        debug!(
            path = %scope.pointer(),
            rows = expected.len(),
            exact,
            deferred = deferred.len(),
            unmatched = unmatched.len(),
            "resolved array"
        );

        if deferred.is_empty() && !extra {
            return Ok(MatchingResult::pass());
        }

        let diff = resolved
            .into_iter()
            .enumerate()
            .filter_map(|(i, entry)| entry.map(|entry| (i.to_string(), entry)))
            .collect();
        let mut result = failed().with_diff(diff);
        if extra {
            result = result.with_unmatched_actual(unmatched);
        }
        Ok(result.build())
    }

    /// Compare one expected element with one actual element.
    #[allow(clippy::too_many_arguments)]
    fn score_cell(
        &self,
        expected: &Value,
        actual: &Value,
        row: usize,
        column: usize,
        ignored: &ConfigNode,
        business_key: &ConfigNode,
        scope: Scope<'_>,
    ) -> EngineResult<MatchingResult> {
        if !business_key.is_empty() && expected.as_array().is_some() && actual.as_array().is_some()
        {
            return Err(MatchError::UnsupportedComparison {
                path: scope.pointer(),
            });
        }
        let result = self.compare_at(expected, actual, ignored, business_key, scope)?;
        Ok(result
            .into_builder()
            .with_element_index(row)
            .with_match_index(column as i64)
            .build())
    }
}

fn rank(cell: &MatchingResult) -> Rank {
    let class = match cell.status() {
        MatchingStatus::Pass => 0,
        MatchingStatus::KeyMatch => 1,
        MatchingStatus::Fail => 2,
        MatchingStatus::ObjectMismatch => 3,
        _ => 4,
    };
    (
        class,
        Reverse(cell.count().unwrap_or(0)),
        cell.match_index().unwrap_or(i64::MAX),
    )
}

/// A candidate whose business key failed is not a pairing at all.
fn claimable(cell: &MatchingResult) -> bool {
    cell.status() != MatchingStatus::NotExists
}

fn not_exists(expected: &Value) -> MatchingResult {
    MatchingResult::builder(MatchingStatus::NotExists)
        .with_expected(expected)
        .build()
}
