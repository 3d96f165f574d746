//! Conversion of a validated [`FormRecord`] into the payload the REST
//! backend stores.
//!
//! - identifiers, phone numbers and postal codes are reduced to digits;
//! - numbers are parsed, falling back to zero;
//! - blank optional fields become `None` and serialize as `null`;
//! - `DD/MM/YYYY` dates become `YYYY-MM-DD`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
  checksum::{ENTITY_ID_LEN, INDIVIDUAL_ID_LEN, digits_only},
  record::{EntityType, FormRecord, Gender, PersonKind, fields},
  validation::refine::DayMonthYear,
};

// ─── Payloads ────────────────────────────────────────────────────────────────

/// Contact and address fields shared by every person-like payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPayload {
  pub email:       Option<String>,
  pub phone:       Option<String>,
  pub street:      Option<String>,
  pub district:    Option<String>,
  pub city:        Option<String>,
  /// Two-letter state code, upper-cased.
  pub state:       Option<String>,
  pub postal_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerPayload {
  pub name:               String,
  pub person_kind:        Option<PersonKind>,
  pub identifier:         String,
  pub state_registration: Option<String>,
  pub gender:             Option<Gender>,
  #[serde(flatten)]
  pub contact:            ContactPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplierPayload {
  pub name:               String,
  pub person_kind:        Option<PersonKind>,
  pub identifier:         String,
  pub state_registration: Option<String>,
  pub supplier_type:      String,
  #[serde(flatten)]
  pub contact:            ContactPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeePayload {
  pub name:           String,
  pub identifier:     String,
  pub role:           String,
  /// `YYYY-MM-DD`.
  pub admission_date: Option<String>,
  #[serde(with = "rust_decimal::serde::float")]
  pub salary:         Decimal,
  pub gender:         Option<Gender>,
  #[serde(flatten)]
  pub contact:        ContactPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPayload {
  pub name:        String,
  pub description: String,
  #[serde(with = "rust_decimal::serde::float")]
  pub cost_price:  Decimal,
  #[serde(with = "rust_decimal::serde::float")]
  pub sale_price:  Decimal,
}

/// The body sent to the backend on create or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Payload {
  Customer(CustomerPayload),
  Supplier(SupplierPayload),
  Employee(EmployeePayload),
  Product(ProductPayload),
}

// ─── Normalization ───────────────────────────────────────────────────────────

/// Build the backend payload for `record`. Call after validation; values
/// that did not validate are normalized as far as possible rather than
/// rejected.
pub fn normalize(entity: EntityType, record: &FormRecord) -> Payload {
  match entity {
    EntityType::Customer => {
      let person_kind = record.person_kind();
      Payload::Customer(CustomerPayload {
        name: text(record, fields::NAME),
        person_kind,
        identifier: digits(record, fields::IDENTIFIER).unwrap_or_default(),
        state_registration: optional(record, fields::STATE_REGISTRATION),
        gender: (person_kind != Some(PersonKind::Entity))
          .then(|| gender(record))
          .flatten(),
        contact: contact(record),
      })
    }
    EntityType::Supplier => Payload::Supplier(SupplierPayload {
      name:               text(record, fields::NAME),
      person_kind:        record.person_kind(),
      identifier:         digits(record, fields::IDENTIFIER).unwrap_or_default(),
      state_registration: optional(record, fields::STATE_REGISTRATION),
      supplier_type:      text(record, fields::SUPPLIER_TYPE),
      contact:            contact(record),
    }),
    EntityType::Employee => Payload::Employee(EmployeePayload {
      name:           text(record, fields::NAME),
      identifier:     digits(record, fields::IDENTIFIER).unwrap_or_default(),
      role:           text(record, fields::ROLE),
      admission_date: record
        .text(fields::ADMISSION_DATE)
        .and_then(|raw| DayMonthYear::parse(&raw))
        .map(|date| date.to_iso()),
      salary:         number(record, fields::SALARY),
      gender:         gender(record),
      contact:        contact(record),
    }),
    EntityType::Product => Payload::Product(ProductPayload {
      name:        text(record, fields::NAME),
      description: text(record, fields::DESCRIPTION),
      cost_price:  number(record, fields::COST_PRICE),
      sale_price:  number(record, fields::SALE_PRICE),
    }),
  }
}

/// Render a digits-only identifier with its conventional punctuation
/// (`000.000.000-00` or `00.000.000/0000-00`). Other inputs come back
/// unchanged.
pub fn format_identifier(digits: &str) -> String {
  if !digits.chars().all(|c| c.is_ascii_digit()) {
    return digits.to_owned();
  }
  match digits.len() {
    INDIVIDUAL_ID_LEN => format!(
      "{}.{}.{}-{}",
      &digits[0..3],
      &digits[3..6],
      &digits[6..9],
      &digits[9..11]
    ),
    ENTITY_ID_LEN => format!(
      "{}.{}.{}/{}-{}",
      &digits[0..2],
      &digits[2..5],
      &digits[5..8],
      &digits[8..12],
      &digits[12..14]
    ),
    _ => digits.to_owned(),
  }
}

fn text(record: &FormRecord, field: &str) -> String {
  record.text(field).map(|s| s.into_owned()).unwrap_or_default()
}

fn optional(record: &FormRecord, field: &str) -> Option<String> {
  record.text(field).map(|s| s.into_owned())
}

fn digits(record: &FormRecord, field: &str) -> Option<String> {
  let digits = digits_only(&record.text(field)?);
  (!digits.is_empty()).then_some(digits)
}

fn number(record: &FormRecord, field: &str) -> Decimal {
  record.decimal(field).unwrap_or_default()
}

fn gender(record: &FormRecord) -> Option<Gender> {
  record.text(fields::GENDER)?.parse().ok()
}

fn contact(record: &FormRecord) -> ContactPayload {
  ContactPayload {
    email:       optional(record, fields::EMAIL),
    phone:       digits(record, fields::PHONE),
    street:      optional(record, fields::STREET),
    district:    optional(record, fields::DISTRICT),
    city:        optional(record, fields::CITY),
    state:       optional(record, fields::STATE).map(|s| s.to_ascii_uppercase()),
    postal_code: digits(record, fields::POSTAL_CODE),
  }
}
