//! Field-level rules.
//!
//! Each constructor returns a boxed closure that inspects one field of a
//! [`FormRecord`] and yields at most one [`ValidationIssue`]. Presence rules
//! fail on absent or blank values; shape rules only look at values that are
//! present.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use super::{Rule, ValidationIssue};
use crate::{checksum::digits_only, record::FormRecord};

pub(crate) static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

pub(crate) static STATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^[A-Za-z]{2}$").expect("state pattern compiles")
});

/// The field must be present and non-blank.
pub fn required(field: &'static str, message: &'static str) -> Rule {
  Box::new(move |record: &FormRecord| {
    record
      .text(field)
      .is_none()
      .then(|| ValidationIssue::new(field, message))
  })
}

/// If present, the field must equal one of `allowed` (ASCII case-insensitive).
pub fn one_of(
  field: &'static str,
  allowed: &'static [&'static str],
  message: &'static str,
) -> Rule {
  Box::new(move |record: &FormRecord| {
    let value = record.text(field)?;
    (!allowed.iter().any(|a| a.eq_ignore_ascii_case(&value)))
      .then(|| ValidationIssue::new(field, message))
  })
}

/// If present, the field must parse as a number greater than zero.
pub fn positive(field: &'static str, message: &'static str) -> Rule {
  Box::new(move |record: &FormRecord| {
    record.text(field)?;
    match record.decimal(field) {
      Some(n) if n > Decimal::ZERO => None,
      _ => Some(ValidationIssue::new(field, message)),
    }
  })
}

/// If present, the field must match `pattern`.
pub fn matches(
  field: &'static str,
  pattern: &'static LazyLock<Regex>,
  message: &'static str,
) -> Rule {
  Box::new(move |record: &FormRecord| {
    let value = record.text(field)?;
    (!pattern.is_match(&value)).then(|| ValidationIssue::new(field, message))
  })
}

/// If present, the field must contain one of `counts` digits once
/// punctuation is stripped.
pub fn digit_count(
  field: &'static str,
  counts: &'static [usize],
  message: &'static str,
) -> Rule {
  Box::new(move |record: &FormRecord| {
    let value = record.text(field)?;
    (!counts.contains(&digits_only(&value).len()))
      .then(|| ValidationIssue::new(field, message))
  })
}

/// If present, the field must be at most `max` characters long.
pub fn max_len(field: &'static str, max: usize, message: &'static str) -> Rule {
  Box::new(move |record: &FormRecord| {
    let value = record.text(field)?;
    (value.chars().count() > max).then(|| ValidationIssue::new(field, message))
  })
}
