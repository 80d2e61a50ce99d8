//! Attribute-by-attribute comparison of two objects.
//!
//! Every attribute of expected gets an entry in the node's diff map, passing
//! or not. The node's `count` is the number of attributes that matched:
//! leaves that are equal, attributes null on both sides, and nested objects
//! or arrays that matched as a whole (one credit each, not their inner
//! counts). Ignored attributes never count and never fail the node.
//!
//! When the business key names attributes of this object, a failed node is
//! re-classified after the pass: `KeyMatch` if every key attribute held,
//! `NotExists` otherwise.

use std::collections::BTreeMap;

use tracing::debug;

use jsonmatch_types::{Map, MatchingAlgo, MatchingResult, MatchingStatus, Value};

use crate::comparator::{compare_leaves, Matcher};
use crate::error::EngineResult;
use crate::rules::ConfigNode;
use crate::scope::Scope;

impl Matcher {
    pub(crate) fn diff_objects_at(
        &self,
        expected: &Map,
        actual: &Map,
        ignored: &ConfigNode,
        business_key: &ConfigNode,
        scope: Scope<'_>,
    ) -> EngineResult<MatchingResult> {
        self.enter(&scope)?;

        let mut failed = false;
        let mut count = 0usize;
        let mut diff = BTreeMap::new();

        for (attr, exp_val) in expected {
            let act_val = actual.get(attr).unwrap_or(&Value::Null);
            let (entry, matched) = self.diff_attribute(
                attr,
                exp_val,
                act_val,
                ignored,
                business_key,
                scope.child(attr),
            )?;
            if matched {
                count += 1;
            }
            failed |= !entry.status().is_benign();
            diff.insert(attr.clone(), entry);
        }

        if self.config().report_unexpected {
            for (attr, act_val) in actual {
                if expected.contains_key(attr) {
                    continue;
                }
                let status = if act_val.is_null() {
                    // Absent on one side and null on the other.
                    count += 1;
                    MatchingStatus::Pass
                } else if ignored.covers(attr) {
                    MatchingStatus::Ignored
                } else {
                    failed = true;
                    MatchingStatus::New
                };
                let entry = MatchingResult::builder(status)
                    .with_actual(act_val)
                    .with_algorithm(algorithm_for(business_key, attr))
                    .build();
                diff.insert(attr.clone(), entry);
            }
        }

        if !failed {
            return Ok(MatchingResult::pass());
        }

        let status = classify_failure(expected, business_key, &diff, &scope);
        Ok(MatchingResult::builder(status)
            .with_expected(&Value::Object(expected.clone()))
            .with_actual(&Value::Object(actual.clone()))
            .with_count(count)
            .with_diff(diff)
            .build())
    }

    /// Compare one attribute. Returns its entry and whether it earns a
    /// match credit.
    fn diff_attribute(
        &self,
        attr: &str,
        expected: &Value,
        actual: &Value,
        ignored: &ConfigNode,
        business_key: &ConfigNode,
        scope: Scope<'_>,
    ) -> EngineResult<(MatchingResult, bool)> {
        let is_ignored = ignored.covers(attr);
        let ignored_entry = || {
            MatchingResult::builder(MatchingStatus::Ignored)
                .with_sides(expected, actual)
                .build()
        };

        let (entry, matched) = match (expected, actual) {
            (Value::Null, Value::Null) => (MatchingResult::pass(), true),
            (Value::Null, _) | (_, Value::Null) => {
                if is_ignored {
                    (ignored_entry(), false)
                } else {
                    let entry = MatchingResult::builder(MatchingStatus::Fail)
                        .with_sides(expected, actual)
                        .build();
                    (entry, false)
                }
            }
            (Value::Object(exp), Value::Object(act)) => {
                if is_ignored {
                    (ignored_entry(), false)
                } else {
                    let nested = self.diff_objects_at(
                        exp,
                        act,
                        ignored.child(attr),
                        business_key.child(attr),
                        scope,
                    )?;
                    let matched = nested.status().is_matched();
                    (nested, matched)
                }
            }
            (Value::Array(exp), Value::Array(act)) => {
                if is_ignored {
                    (ignored_entry(), false)
                } else {
                    let nested = self.match_arrays_at(
                        exp,
                        act,
                        ignored.child(attr),
                        business_key.child(attr),
                        scope,
                    )?;
                    let matched = nested.is_pass();
                    (nested, matched)
                }
            }
            _ if is_ignored => (ignored_entry(), false),
            _ if expected.kind() == actual.kind() => {
                let entry = compare_leaves(expected, actual);
                let matched = entry.is_pass();
                (entry, matched)
            }
            _ => {
                let entry = self.compare_at(
                    expected,
                    actual,
                    ignored.child(attr),
                    business_key.child(attr),
                    scope,
                )?;
                (entry, false)
            }
        };

        let entry = entry
            .into_builder()
            .with_algorithm(algorithm_for(business_key, attr))
            .build();
        Ok((entry, matched))
    }
}

fn algorithm_for(business_key: &ConfigNode, attr: &str) -> MatchingAlgo {
    if business_key.has(attr) {
        MatchingAlgo::BusinessKey
    } else {
        MatchingAlgo::MaxCount
    }
}

/// Status of an object node that failed on content.
///
/// Without a business key, or when expected lacks one of the key
/// attributes, the node stays `Fail`. Otherwise the key attributes decide:
/// all held means `KeyMatch`, anything else `NotExists`.
fn classify_failure(
    expected: &Map,
    business_key: &ConfigNode,
    diff: &BTreeMap<String, MatchingResult>,
    scope: &Scope<'_>,
) -> MatchingStatus {
    if business_key.is_empty() || !business_key.attributes().all(|k| expected.contains_key(k)) {
        return MatchingStatus::Fail;
    }

    let mut evaluated = 0usize;
    let mut held = true;
    for entry in diff.values() {
        if entry.algorithm() != Some(MatchingAlgo::BusinessKey)
            || entry.status() == MatchingStatus::Ignored
        {
            continue;
        }
        evaluated += 1;
        held &= entry.status().is_matched();
    }

    let status = if evaluated > 0 && held {
        MatchingStatus::KeyMatch
    } else {
        MatchingStatus::NotExists
    };
    debug!(path = %scope.pointer(), evaluated, %status, "classified by business key");
    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatcherConfig;
    use crate::rules::MatchRules;
    use serde_json::json;

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    fn rules(ignored: serde_json::Value, key: serde_json::Value) -> MatchRules {
        MatchRules::from_json(Some(&ignored), Some(&key)).unwrap()
    }

    fn diff_with(
        matcher: &Matcher,
        expected: serde_json::Value,
        actual: serde_json::Value,
        rules: &MatchRules,
    ) -> MatchingResult {
        matcher.compare(&v(expected), &v(actual), rules).unwrap()
    }

    fn diff(expected: serde_json::Value, actual: serde_json::Value) -> MatchingResult {
        diff_with(&Matcher::default(), expected, actual, &MatchRules::none())
    }

    fn status_of(result: &MatchingResult, path: &[&str]) -> MatchingStatus {
        result
            .lookup(path)
            .unwrap_or_else(|| panic!("no entry at {path:?}"))
            .status()
    }

    #[test]
    fn identical_objects_pass_without_payload() {
        let obj = json!({"name": "Raghav", "id": 1, "tags": ["a"], "add": {"pin": 1}});
        let result = diff(obj.clone(), obj);
        assert!(result.is_pass());
        assert!(result.diff().is_none());
        assert!(result.count().is_none());
    }

    #[test]
    fn basic_object_diff() {
        let result = diff(
            json!({"name": "Raghav Chandra", "mobile": 8867987654u64, "tension": "NO", "id": 10110}),
            json!({"name": "Raghav Chandra", "mobile": 9065065882u64, "id": 10110}),
        );
        assert_eq!(result.status(), MatchingStatus::Fail);
        assert_eq!(result.count(), Some(2));
        assert!(result.expected().is_some());
        assert!(result.actual().is_some());

        assert_eq!(status_of(&result, &["name"]), MatchingStatus::Pass);
        assert_eq!(status_of(&result, &["id"]), MatchingStatus::Pass);

        let mobile = result.get("mobile").unwrap();
        assert_eq!(mobile.status(), MatchingStatus::Fail);
        assert_eq!(mobile.expected(), Some(&v(json!(8867987654u64))));
        assert_eq!(mobile.actual(), Some(&v(json!(9065065882u64))));

        let tension = result.get("tension").unwrap();
        assert_eq!(tension.status(), MatchingStatus::Fail);
        assert_eq!(tension.expected(), Some(&v(json!("NO"))));
        assert!(tension.actual().is_none());
    }

    #[test]
    fn every_expected_attribute_gets_an_entry() {
        let result = diff(json!({"a": 1, "b": 2, "c": null}), json!({"a": 1, "b": 3}));
        let keys: Vec<_> = result.diff().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(status_of(&result, &["c"]), MatchingStatus::Pass);
        assert_eq!(result.count(), Some(2));
    }

    #[test]
    fn nested_object_credits_once() {
        let result = diff(
            json!({"name": "R", "id": 10110, "add": {"city": "Prayagraj", "state": "UP", "pin": 211002, "landmark": "mosque"}}),
            json!({"name": "R", "id": 10110, "add": {"city": "Prayagraj", "state": "UP", "pin": 211002, "landmark": "temple"}}),
        );
        assert_eq!(result.status(), MatchingStatus::Fail);
        assert_eq!(result.count(), Some(2));

        let add = result.get("add").unwrap();
        assert_eq!(add.status(), MatchingStatus::Fail);
        assert_eq!(add.count(), Some(3));
        let landmark = add.get("landmark").unwrap();
        assert_eq!(landmark.expected(), Some(&v(json!("mosque"))));
        assert_eq!(landmark.actual(), Some(&v(json!("temple"))));

        let result = diff(
            json!({"a": {"b": 1, "c": 2}, "d": 1}),
            json!({"a": {"b": 1, "c": 2}, "d": 9}),
        );
        assert_eq!(result.count(), Some(1), "nested pass earns one credit");
    }

    #[test]
    fn ignored_attributes_do_not_count_or_fail() {
        let matcher = Matcher::default();
        let rules = rules(json!({"add": {"landmark": true}, "name": true}), json!({}));
        let result = diff_with(
            &matcher,
            json!({"name": "Raghav", "kerberos": "charag", "id": 10110, "add": {"city": "P", "pin": 211002, "landmark": "mosque"}}),
            json!({"name": "Chandra", "kerberos": "charag", "id": 10110, "add": {"city": "P", "pin": 211003, "landmark": "temple"}}),
            &rules,
        );
        assert_eq!(result.status(), MatchingStatus::Fail);
        assert_eq!(result.count(), Some(2));
        assert_eq!(status_of(&result, &["name"]), MatchingStatus::Ignored);
        assert_eq!(status_of(&result, &["add", "landmark"]), MatchingStatus::Ignored);
        assert_eq!(status_of(&result, &["add", "pin"]), MatchingStatus::Fail);
        assert_eq!(status_of(&result, &["add", "city"]), MatchingStatus::Pass);
    }

    #[test]
    fn only_ignored_differences_pass() {
        let rules = rules(json!({"name": true, "add": true}), json!({}));
        let result = diff_with(
            &Matcher::default(),
            json!({"name": "a", "add": {"x": 1}, "id": 1}),
            json!({"name": "b", "add": {"x": 2}, "id": 1}),
            &rules,
        );
        assert!(result.is_pass());
    }

    #[test]
    fn ignored_attribute_missing_on_actual() {
        let rules = rules(json!({"tension": true}), json!({}));
        let result = diff_with(
            &Matcher::default(),
            json!({"id": 1, "tension": "NO"}),
            json!({"id": 1}),
            &rules,
        );
        assert!(result.is_pass());
    }

    #[test]
    fn count_equals_passing_attributes() {
        let result = diff(
            json!({"a": 1, "b": 2, "c": 3, "d": {"x": 1}, "e": [1, 2], "f": "x", "g": null}),
            json!({"a": 1, "b": 0, "c": 3, "d": {"x": 1}, "e": [2, 3], "f": "y", "g": null}),
        );
        let passing = result
            .diff()
            .unwrap()
            .values()
            .filter(|entry| entry.is_pass())
            .count();
        assert_eq!(result.count(), Some(passing));
        assert_eq!(passing, 4);
    }

    #[test]
    fn actual_only_attribute_is_new() {
        let result = diff(
            json!({"first": "Rags", "add": "India"}),
            json!({"first": "Rags", "second": "Chand", "add": "India"}),
        );
        assert_eq!(result.status(), MatchingStatus::Fail);
        assert_eq!(result.count(), Some(2));
        let second = result.get("second").unwrap();
        assert_eq!(second.status(), MatchingStatus::New);
        assert_eq!(second.actual(), Some(&v(json!("Chand"))));
        assert!(second.expected().is_none());
    }

    #[test]
    fn actual_only_null_counts_as_absent() {
        let result = diff(json!({"a": 1}), json!({"a": 1, "b": null}));
        assert!(result.is_pass());
    }

    #[test]
    fn actual_only_attribute_can_be_ignored() {
        let rules = rules(json!({"second": true}), json!({}));
        let result = diff_with(
            &Matcher::default(),
            json!({"first": "Rags"}),
            json!({"first": "Rags", "second": "Chand"}),
            &rules,
        );
        assert!(result.is_pass());
    }

    #[test]
    fn lenient_matcher_skips_actual_only_attributes() {
        let result = diff_with(
            &Matcher::new(MatcherConfig::lenient()),
            json!({"first": "Rags"}),
            json!({"first": "Rags", "second": "Chand"}),
            &MatchRules::none(),
        );
        assert!(result.is_pass());
    }

    #[test]
    fn attribute_shape_mismatch_fails_parent() {
        let result = diff(json!({"a": [1], "b": {"x": 1}}), json!({"a": {"x": 1}, "b": "x"}));
        assert_eq!(result.status(), MatchingStatus::Fail);
        assert_eq!(status_of(&result, &["a"]), MatchingStatus::ObjectMismatch);
        assert_eq!(status_of(&result, &["b"]), MatchingStatus::Fail);
        assert_eq!(result.count(), Some(0));
    }

    #[test]
    fn matching_business_key_promotes_to_key_match() {
        let rules = rules(json!({}), json!({"id": true}));
        let result = diff_with(
            &Matcher::default(),
            json!({"name": "Raghav", "id": 1234, "No": 654321}),
            json!({"name": "Chandra", "id": 1234, "No": 987654321}),
            &rules,
        );
        assert_eq!(result.status(), MatchingStatus::KeyMatch);
        assert_eq!(result.count(), Some(1));
        let id = result.get("id").unwrap();
        assert_eq!(id.algorithm(), Some(MatchingAlgo::BusinessKey));
        assert_eq!(
            result.get("name").unwrap().algorithm(),
            Some(MatchingAlgo::MaxCount)
        );
    }

    #[test]
    fn ignore_branch_below_a_leaf_key_keeps_the_key() {
        let rules = rules(json!({"id": {"x": true}}), json!({"id": true}));
        let result = diff_with(
            &Matcher::default(),
            json!({"id": 1, "n": "a"}),
            json!({"id": 1, "n": "b"}),
            &rules,
        );
        assert_eq!(result.status(), MatchingStatus::KeyMatch);
        assert_eq!(status_of(&result, &["id"]), MatchingStatus::Pass);

        let result = diff_with(
            &Matcher::default(),
            json!({"id": 1, "n": "a"}),
            json!({"id": 2, "n": "a"}),
            &rules,
        );
        assert_eq!(result.status(), MatchingStatus::NotExists);
    }

    #[test]
    fn broken_business_key_demotes_to_not_exists() {
        let rules = rules(json!({}), json!({"id": true}));
        let result = diff_with(
            &Matcher::default(),
            json!({"name": "Raghav", "id": 1234}),
            json!({"name": "Raghav", "id": 1}),
            &rules,
        );
        assert_eq!(result.status(), MatchingStatus::NotExists);
        assert!(result.diff().is_none());
        assert_eq!(result.count(), Some(1));
    }

    #[test]
    fn key_missing_from_expected_stays_fail() {
        let rules = rules(json!({}), json!({"id": true}));
        let result = diff_with(
            &Matcher::default(),
            json!({"name": "Raghav"}),
            json!({"name": "Chandra", "id": 1}),
            &rules,
        );
        assert_eq!(result.status(), MatchingStatus::Fail);
    }

    #[test]
    fn nested_business_keys() {
        let rules = rules(
            json!({}),
            json!({"firstName": {"id": true}, "secondName": {"id": true}}),
        );
        let result = diff_with(
            &Matcher::default(),
            json!({
                "firstName": {"name": "Raghav", "id": 1234, "No": 51951},
                "secondName": {"name": "Chandra", "id": 1, "No": 987654321}
            }),
            json!({
                "firstName": {"name": "Raghav", "id": 1234, "No": 654321},
                "secondName": {"name": "Chandra", "id": 5, "No": 987654321}
            }),
            &rules,
        );
        assert_eq!(result.status(), MatchingStatus::NotExists);
    }

    #[test]
    fn nested_key_match_holds_parent_identity() {
        let rules = rules(json!({}), json!({"owner": {"id": true}}));
        let result = diff_with(
            &Matcher::default(),
            json!({"owner": {"id": 7, "name": "a"}, "qty": 1}),
            json!({"owner": {"id": 7, "name": "b"}, "qty": 2}),
            &rules,
        );
        assert_eq!(result.status(), MatchingStatus::KeyMatch);
        assert_eq!(status_of(&result, &["owner"]), MatchingStatus::KeyMatch);
        assert_eq!(result.count(), Some(1));
    }

    #[test]
    fn ignored_subtree_with_key_below_passes() {
        let rules = rules(
            json!({"secondName": true}),
            json!({"firstName": {"id": true}, "secondName": {"id": true}}),
        );
        let result = diff_with(
            &Matcher::default(),
            json!({
                "firstName": {"name": "Raghav", "id": 1234, "No": 51951},
                "secondName": {"name": "Chandra", "id": 1, "No": 987654321}
            }),
            json!({
                "firstName": {"name": "Raghav", "id": 1234, "No": 654321},
                "secondName": {"name": "Chandra", "id": 5, "No": 987654321}
            }),
            &rules,
        );
        assert!(result.is_pass());
    }

    #[test]
    fn diff_objects_entry_point() {
        let Value::Object(exp) = v(json!({"a": 1})) else {
            unreachable!()
        };
        let Value::Object(act) = v(json!({"a": 2})) else {
            unreachable!()
        };
        let result = Matcher::default()
            .diff_objects(&exp, &act, &MatchRules::none())
            .unwrap();
        assert_eq!(result.status(), MatchingStatus::Fail);
        assert_eq!(result.count(), Some(0));
    }
}
