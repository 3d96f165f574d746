//! Whole-record refinements.
//!
//! These run only once every field rule has passed, so they can assume
//! required fields are present.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use super::{Rule, ValidationIssue};
use crate::{
  checksum::digits_only,
  record::{FormRecord, PersonKind, fields},
};

pub const INVALID_IDENTIFIER: &str = "invalid identifier";

static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"^(\d{2})/(\d{2})/(\d{4})$").expect("date pattern compiles")
});

/// A `DD/MM/YYYY` date split into its parts. No calendar check is applied
/// beyond the ranges in [`admission_date`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayMonthYear {
  pub day:   u32,
  pub month: u32,
  pub year:  u32,
}

impl DayMonthYear {
  /// Split `input` if it is exactly two-digit day, two-digit month and
  /// four-digit year separated by slashes.
  pub fn parse(input: &str) -> Option<Self> {
    let caps = DATE_PATTERN.captures(input.trim())?;
    Some(Self {
      day:   caps[1].parse().ok()?,
      month: caps[2].parse().ok()?,
      year:  caps[3].parse().ok()?,
    })
  }

  pub fn in_range(&self) -> bool {
    (1..=31).contains(&self.day)
      && (1..=12).contains(&self.month)
      && (1900..=2100).contains(&self.year)
  }

  /// `YYYY-MM-DD`.
  pub fn to_iso(&self) -> String {
    format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
  }
}

/// The identifier must have the length and check digits of the record's
/// person kind. With `fixed` set the record's own `person_kind` is ignored.
pub fn identifier(fixed: Option<PersonKind>) -> Rule {
  Box::new(move |record: &FormRecord| {
    let digits = digits_only(&record.text(fields::IDENTIFIER).unwrap_or_default());
    let valid = fixed
      .or_else(|| record.person_kind())
      .is_some_and(|kind| kind.accepts(&digits));
    (!valid).then(|| ValidationIssue::new(fields::IDENTIFIER, INVALID_IDENTIFIER))
  })
}

/// The sale price must not be lower than the cost price.
pub fn sale_not_below_cost() -> Rule {
  Box::new(|record: &FormRecord| {
    let cost = record.decimal(fields::COST_PRICE)?;
    let sale = record.decimal(fields::SALE_PRICE)?;
    (sale < cost).then(|| {
      ValidationIssue::new(
        fields::SALE_PRICE,
        "sale price must not be lower than cost price",
      )
    })
  })
}

/// The admission date must be `DD/MM/YYYY` with day 1-31, month 1-12 and
/// year 1900-2100.
pub fn admission_date() -> Rule {
  Box::new(|record: &FormRecord| {
    let raw = record.text(fields::ADMISSION_DATE).unwrap_or_default();
    match DayMonthYear::parse(&raw) {
      None => Some(ValidationIssue::new(
        fields::ADMISSION_DATE,
        "admission date must be in DD/MM/YYYY format",
      )),
      Some(date) if !date.in_range() => Some(ValidationIssue::new(
        fields::ADMISSION_DATE,
        "admission date is out of range",
      )),
      Some(_) => None,
    }
  })
}

/// The salary must be present and strictly positive.
pub fn positive_salary() -> Rule {
  Box::new(|record: &FormRecord| match record.decimal(fields::SALARY) {
    Some(salary) if salary > Decimal::ZERO => None,
    _ => Some(ValidationIssue::new(
      fields::SALARY,
      "salary must be greater than zero",
    )),
  })
}
