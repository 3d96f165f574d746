//! Validation outcomes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One failed rule, attached to the field it concerns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
  pub field:   String,
  pub message: String,
}

impl ValidationIssue {
  pub fn new(field: &str, message: impl Into<String>) -> Self {
    Self {
      field:   field.to_owned(),
      message: message.into(),
    }
  }
}

/// The result of one validation pass.
///
/// `issues` keeps every failure in evaluation order. `field_errors` keeps
/// only the first message per field; later failures on a field that already
/// failed do not replace it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
  pub field_errors: BTreeMap<String, String>,
  pub issues:       Vec<ValidationIssue>,
}

impl ValidationReport {
  pub fn is_valid(&self) -> bool { self.issues.is_empty() }

  /// The issue a caller should surface as the headline notification.
  pub fn first_issue(&self) -> Option<&ValidationIssue> { self.issues.first() }

  /// Whether `field` should be flagged as invalid.
  pub fn has_error(&self, field: &str) -> bool {
    self.field_errors.contains_key(field)
  }

  pub fn push(&mut self, issue: ValidationIssue) {
    self
      .field_errors
      .entry(issue.field.clone())
      .or_insert_with(|| issue.message.clone());
    self.issues.push(issue);
  }
}

impl FromIterator<ValidationIssue> for ValidationReport {
  fn from_iter<I: IntoIterator<Item = ValidationIssue>>(iter: I) -> Self {
    let mut report = Self::default();
    for issue in iter {
      report.push(issue);
    }
    report
  }
}
