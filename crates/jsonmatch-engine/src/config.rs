use serde::{Deserialize, Serialize};

/// Options for a [`Matcher`](crate::Matcher).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Maximum nesting depth of the compared values, counted in objects and
    /// arrays entered.
    pub max_depth: usize,
    /// When `true`, content present only in actual fails the comparison:
    /// actual-only attributes are reported as `New`, and actual array
    /// elements no expected element claimed are listed as unmatched.
    pub report_unexpected: bool,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            max_depth: 128,
            report_unexpected: true,
        }
    }
}

impl MatcherConfig {
    /// Expected-driven matching: anything actual carries beyond expected
    /// is invisible to the result.
    pub fn lenient() -> Self {
        Self {
            report_unexpected: false,
            ..Default::default()
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
