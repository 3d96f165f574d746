//! Form records and the enumerations that classify them.
//!
//! A [`FormRecord`] is the flat set of values a create/edit form submits for
//! one entity. It is built per submit action and never stored locally; the
//! REST backend owns durable state.

use std::{borrow::Cow, collections::BTreeMap, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::{Error, Result, checksum};

// ─── Field names ─────────────────────────────────────────────────────────────

/// Field names shared by the schemas, the normalizer and record files.
pub mod fields {
  pub const NAME: &str = "name";
  pub const IDENTIFIER: &str = "identifier";
  pub const PERSON_KIND: &str = "person_kind";
  pub const STATE_REGISTRATION: &str = "state_registration";
  pub const GENDER: &str = "gender";
  pub const SUPPLIER_TYPE: &str = "supplier_type";
  pub const ROLE: &str = "role";
  pub const ADMISSION_DATE: &str = "admission_date";
  pub const SALARY: &str = "salary";
  pub const DESCRIPTION: &str = "description";
  pub const COST_PRICE: &str = "cost_price";
  pub const SALE_PRICE: &str = "sale_price";

  pub const EMAIL: &str = "email";
  pub const PHONE: &str = "phone";
  pub const STREET: &str = "street";
  pub const DISTRICT: &str = "district";
  pub const CITY: &str = "city";
  pub const STATE: &str = "state";
  pub const POSTAL_CODE: &str = "postal_code";
}

// ─── Entity types ────────────────────────────────────────────────────────────

/// The kinds of record the back office manages.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  EnumIter,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EntityType {
  Customer,
  Supplier,
  Employee,
  Product,
}

impl EntityType {
  /// Parse a user-supplied entity name such as `"Customer"` or `"product"`.
  pub fn parse(input: &str) -> Result<Self> {
    Self::from_str(input.trim())
      .map_err(|_| Error::UnknownEntityType(input.to_owned()))
  }

  /// The REST collection segment for this entity.
  pub fn collection(&self) -> &'static str {
    match self {
      Self::Customer => "customers",
      Self::Supplier => "suppliers",
      Self::Employee => "employees",
      Self::Product => "products",
    }
  }

  /// Whether submission looks for an existing record with the same
  /// identifier before saving.
  pub fn checks_duplicate_identifier(&self) -> bool {
    matches!(self, Self::Customer)
  }
}

// ─── Person kind ─────────────────────────────────────────────────────────────

/// Discriminates which identifier length and algorithm applies.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum PersonKind {
  #[serde(rename = "FISICA")]
  #[strum(serialize = "FISICA")]
  Individual,
  #[serde(rename = "JURIDICA")]
  #[strum(serialize = "JURIDICA")]
  Entity,
}

impl PersonKind {
  /// Wire values accepted in the `person_kind` field.
  pub const VALUES: &'static [&'static str] = &["FISICA", "JURIDICA"];

  /// Number of digits an identifier of this kind must have.
  pub fn identifier_len(&self) -> usize {
    match self {
      Self::Individual => checksum::INDIVIDUAL_ID_LEN,
      Self::Entity => checksum::ENTITY_ID_LEN,
    }
  }

  /// Check a digits-only identifier against this kind's length and
  /// check-digit rule.
  pub fn accepts(&self, digits: &str) -> bool {
    digits.len() == self.identifier_len()
      && match self {
        Self::Individual => checksum::is_valid_individual_id(digits),
        Self::Entity => checksum::is_valid_entity_id(digits),
      }
  }
}

// ─── Gender ──────────────────────────────────────────────────────────────────

/// Only meaningful for individuals.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum Gender {
  Male,
  Female,
  Unspecified,
}

impl Gender {
  pub const VALUES: &'static [&'static str] = &["MALE", "FEMALE", "UNSPECIFIED"];
}

// ─── Field values ────────────────────────────────────────────────────────────

/// A single form value: raw text as typed, or a number already parsed by the
/// caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
  Text(String),
  Number(Decimal),
}

impl FieldValue {
  /// The value as text, untrimmed.
  pub fn as_text(&self) -> Cow<'_, str> {
    match self {
      Self::Text(s) => Cow::Borrowed(s),
      Self::Number(n) => Cow::Owned(n.to_string()),
    }
  }

  /// The value as a decimal, if it is a number or parses as one.
  pub fn as_decimal(&self) -> Option<Decimal> {
    match self {
      Self::Text(s) => parse_decimal(s),
      Self::Number(n) => Some(*n),
    }
  }
}

impl From<&str> for FieldValue {
  fn from(s: &str) -> Self { Self::Text(s.to_owned()) }
}

impl From<String> for FieldValue {
  fn from(s: String) -> Self { Self::Text(s) }
}

impl From<Decimal> for FieldValue {
  fn from(n: Decimal) -> Self { Self::Number(n) }
}

/// Parse a decimal typed by a person. Surrounding whitespace is ignored and a
/// lone comma is read as the decimal separator (`"10,50"`).
pub fn parse_decimal(input: &str) -> Option<Decimal> {
  let trimmed = input.trim();
  if trimmed.is_empty() {
    return None;
  }
  Decimal::from_str(trimmed).ok().or_else(|| {
    (!trimmed.contains('.'))
      .then(|| trimmed.replacen(',', ".", 1))
      .and_then(|s| Decimal::from_str(&s).ok())
  })
}

// ─── FormRecord ──────────────────────────────────────────────────────────────

/// The flat field map submitted by one create/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormRecord {
  fields: BTreeMap<String, FieldValue>,
}

impl FormRecord {
  pub fn new() -> Self { Self::default() }

  /// Builder-style insert.
  pub fn with(mut self, field: &str, value: impl Into<FieldValue>) -> Self {
    self.insert(field, value);
    self
  }

  pub fn insert(&mut self, field: &str, value: impl Into<FieldValue>) {
    self.fields.insert(field.to_owned(), value.into());
  }

  pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
    self.fields.remove(field)
  }

  pub fn get(&self, field: &str) -> Option<&FieldValue> {
    self.fields.get(field)
  }

  /// Trimmed text of `field`; `None` when absent or blank.
  pub fn text(&self, field: &str) -> Option<Cow<'_, str>> {
    match self.fields.get(field)?.as_text() {
      Cow::Borrowed(s) => {
        let s = s.trim();
        (!s.is_empty()).then_some(Cow::Borrowed(s))
      }
      Cow::Owned(s) => Some(Cow::Owned(s)),
    }
  }

  /// `field` as a decimal; `None` when absent, blank, or not numeric.
  pub fn decimal(&self, field: &str) -> Option<Decimal> {
    self.fields.get(field)?.as_decimal()
  }

  /// The person kind this record declares, if any and if recognised.
  pub fn person_kind(&self) -> Option<PersonKind> {
    PersonKind::from_str(&self.text(fields::PERSON_KIND)?).ok()
  }

  /// Build a record from a JSON object. `null` members are skipped; strings
  /// and numbers are kept; anything else is rejected.
  pub fn from_json(value: serde_json::Value) -> Result<Self> {
    let serde_json::Value::Object(map) = value else {
      return Err(Error::NotAnObject);
    };

    let mut record = Self::new();
    for (field, value) in map {
      match value {
        serde_json::Value::Null => {}
        serde_json::Value::String(s) => record.insert(&field, s),
        serde_json::Value::Number(n) => {
          let number = Decimal::from_str(&n.to_string())
            .or_else(|_| Decimal::from_scientific(&n.to_string()))
            .map_err(|_| Error::UnsupportedValue { field: field.clone() })?;
          record.insert(&field, number);
        }
        _ => return Err(Error::UnsupportedValue { field }),
      }
    }
    Ok(record)
  }

  /// Parse a JSON object from text; see [`FormRecord::from_json`].
  pub fn from_json_str(input: &str) -> Result<Self> {
    Self::from_json(serde_json::from_str(input)?)
  }
}
