//! Structural validation of intent documents
//!
//! Validation never mutates its input and never stops at the first problem:
//! every error and warning found is reported. The compiler itself does not
//! re-validate; callers check [`ValidationResult::valid`] first.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::intent::{IntentSpec, RuleSpec};

/// Outcome of validating an intent document
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationResult {
    /// True when no errors were found
    pub valid: bool,
    /// Problems that block synthesis
    pub errors: Vec<String>,
    /// Suspicious but permitted constructs
    pub warnings: Vec<String>,
}

/// Structural problems in an intent, all of them
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid intent: {}", .errors.join("; "))]
pub struct ValidationError {
    errors: Vec<String>,
}

impl ValidationError {
    /// Create an error from the list of problems found
    pub fn new(errors: Vec<String>) -> Self {
        Self { errors }
    }

    /// Every problem found, in discovery order
    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

impl From<ValidationError> for netintent_common::Error {
    fn from(err: ValidationError) -> Self {
        netintent_common::Error::validation_errors(err.errors)
    }
}

/// Validate an intent document.
///
/// - error if `rules` is absent; warning if it is present but empty
/// - per rule: error if `from` or `to` is missing or blank; warning if they are equal
pub fn validate(intent: &IntentSpec) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    match &intent.rules {
        None => errors.push("Missing 'rules' field in intent".to_string()),
        Some(rules) if rules.is_empty() => {
            warnings.push("No rules defined in intent".to_string())
        }
        Some(rules) => {
            for (index, rule) in rules.iter().enumerate() {
                validate_rule(index, rule, &mut errors, &mut warnings);
            }
        }
    }

    ValidationResult {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

fn validate_rule(index: usize, rule: &RuleSpec, errors: &mut Vec<String>, warnings: &mut Vec<String>) {
    let from = present(&rule.from);
    let to = present(&rule.to);

    if from.is_none() {
        errors.push(format!("Rule {}: Missing 'from' field", index));
    }
    if to.is_none() {
        errors.push(format!("Rule {}: Missing 'to' field", index));
    }
    if let (Some(from), Some(to)) = (from, to) {
        if from == to {
            warnings.push(format!(
                "Rule {}: Source and destination are the same",
                index
            ));
        }
    }
}

/// A blank service name is as good as a missing one
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}
