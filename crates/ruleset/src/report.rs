//! Validation reports.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::outcome::RuleOutcome;

/// Outcome for one field, shaped like the field's rule spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldReport {
    /// Outcome of a single-rule field, or of a malformed spec.
    Single(RuleOutcome),
    /// Outcomes of a multi-rule field, by rule name.
    Multi(IndexMap<String, RuleOutcome>),
}

impl FieldReport {
    /// Every outcome recorded for the field.
    pub fn leaves(&self) -> impl Iterator<Item = RuleOutcome> + '_ {
        let (single, multi) = match self {
            Self::Single(outcome) => (Some(*outcome), None),
            Self::Multi(outcomes) => (None, Some(outcomes.values().copied())),
        };
        single.into_iter().chain(multi.into_iter().flatten())
    }

    /// Outcome of `rule` on a multi-rule field.
    pub fn rule(&self, rule: &str) -> Option<RuleOutcome> {
        match self {
            Self::Single(_) => None,
            Self::Multi(outcomes) => outcomes.get(rule).copied(),
        }
    }

    /// Returns `true` if every outcome passed.
    pub fn is_pass(&self) -> bool {
        self.leaves().all(RuleOutcome::is_pass)
    }
}

impl From<RuleOutcome> for FieldReport {
    fn from(outcome: RuleOutcome) -> Self {
        Self::Single(outcome)
    }
}

/// Per-field outcomes of one `validate` call, in rule-set order.
///
/// Serializes to the same shape as the rule set it came from:
///
/// ```json
/// {"email": "pass", "user.name": {"required": "pass", "string": "fail"}}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationReport {
    fields: IndexMap<String, FieldReport>,
}

impl ValidationReport {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the outcome recorded for `field`.
    pub fn get(&self, field: &str) -> Option<&FieldReport> {
        self.fields.get(field)
    }

    /// Iterates fields and outcomes in rule-set order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldReport)> {
        self.fields.iter().map(|(field, report)| (field.as_str(), report))
    }

    /// Every outcome in the report, multi-rule fields flattened.
    pub fn leaves(&self) -> impl Iterator<Item = RuleOutcome> + '_ {
        self.fields.values().flat_map(FieldReport::leaves)
    }

    /// Returns `true` if every leaf outcome passed.
    ///
    /// An empty report is a success.
    pub fn success(&self) -> bool {
        self.leaves().all(RuleOutcome::is_pass)
    }

    /// Negation of [`success`](Self::success).
    pub fn failed(&self) -> bool {
        !self.success()
    }

    /// Fields with at least one outcome other than pass.
    pub fn failed_fields(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, report)| !report.is_pass())
            .map(|(field, _)| field)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no field was validated.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, FieldReport)> for ValidationReport {
    fn from_iter<I: IntoIterator<Item = (String, FieldReport)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
