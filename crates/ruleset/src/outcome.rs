//! Tri-state rule outcome.
//!
//! Every rule check ends in exactly one of three states. Malformed
//! invocations (unknown rule, badly shaped arguments, invalid pattern)
//! are reported as [`RuleOutcome::Indeterminate`], never as an error.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Result of applying one rule to one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleOutcome {
    /// The value satisfies the rule.
    Pass,
    /// The value violates the rule.
    Fail,
    /// The rule could not be evaluated as invoked.
    Indeterminate,
}

impl RuleOutcome {
    /// Returns `true` for [`RuleOutcome::Pass`].
    #[inline]
    pub fn is_pass(self) -> bool {
        matches!(self, Self::Pass)
    }

    /// Returns `true` for [`RuleOutcome::Fail`].
    #[inline]
    pub fn is_fail(self) -> bool {
        matches!(self, Self::Fail)
    }

    /// Returns `true` for [`RuleOutcome::Indeterminate`].
    #[inline]
    pub fn is_indeterminate(self) -> bool {
        matches!(self, Self::Indeterminate)
    }

    /// Stable lowercase name, as used in serialized reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Indeterminate => "indeterminate",
        }
    }
}

impl fmt::Display for RuleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<bool> for RuleOutcome {
    #[inline]
    fn from(passed: bool) -> Self {
        if passed { Self::Pass } else { Self::Fail }
    }
}

/// `None` means the check could not be evaluated.
impl From<Option<bool>> for RuleOutcome {
    #[inline]
    fn from(passed: Option<bool>) -> Self {
        passed.map_or(Self::Indeterminate, Self::from)
    }
}
