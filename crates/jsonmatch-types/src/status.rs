use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome recorded at a node of the result tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchingStatus {
    /// Expected and actual agree.
    Pass,
    /// Expected and actual disagree.
    Fail,
    /// The expected element has no surviving candidate in actual.
    NotExists,
    /// Actual carries an attribute absent from expected.
    New,
    /// One side is an array, the other is not.
    ObjectMismatch,
    /// Business-key attributes agree but other content differs.
    KeyMatch,
    /// Excluded from status and count by the ignore rules.
    Ignored,
}

impl MatchingStatus {
    /// Short name used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::NotExists => "NOT_EXISTS",
            Self::New => "NEW",
            Self::ObjectMismatch => "OBJECT_MISMATCH",
            Self::KeyMatch => "KEY_MATCH",
            Self::Ignored => "IGNORED",
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    /// `Pass` or `KeyMatch`: the pairing holds, possibly with content diffs.
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Pass | Self::KeyMatch)
    }

    /// Returns `true` if this status leaves a parent object untouched.
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::Pass | Self::KeyMatch | Self::Ignored)
    }
}

impl fmt::Display for MatchingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an attribute took part in object matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchingAlgo {
    /// Plain content comparison; contributes to the match count.
    MaxCount,
    /// Declared business key; decides identity.
    BusinessKey,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&MatchingStatus::NotExists).unwrap(),
            "\"NOT_EXISTS\""
        );
        assert_eq!(
            serde_json::to_string(&MatchingAlgo::BusinessKey).unwrap(),
            "\"BUSINESS_KEY\""
        );
    }

    #[test]
    fn display_matches_serialized_name() {
        for status in [
            MatchingStatus::Pass,
            MatchingStatus::Fail,
            MatchingStatus::NotExists,
            MatchingStatus::New,
            MatchingStatus::ObjectMismatch,
            MatchingStatus::KeyMatch,
            MatchingStatus::Ignored,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
    }

    #[test]
    fn benign_statuses() {
        assert!(MatchingStatus::Ignored.is_benign());
        assert!(MatchingStatus::KeyMatch.is_matched());
        assert!(!MatchingStatus::Ignored.is_matched());
        assert!(!MatchingStatus::New.is_benign());
    }
}
