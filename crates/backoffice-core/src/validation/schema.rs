//! Per-entity schemas.

use tracing::debug;

use super::{Rule, ValidationReport, refine, rules};
use crate::record::{EntityType, FormRecord, Gender, PersonKind, fields};

/// An ordered list of field rules followed by an ordered list of
/// refinements.
pub struct Schema {
  entity:      EntityType,
  fields:      Vec<Rule>,
  refinements: Vec<Rule>,
}

impl Schema {
  pub fn new(entity: EntityType) -> Self {
    Self {
      entity,
      fields: Vec::new(),
      refinements: Vec::new(),
    }
  }

  pub fn field(mut self, rule: Rule) -> Self {
    self.fields.push(rule);
    self
  }

  pub fn fields(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
    self.fields.extend(rules);
    self
  }

  pub fn refine(mut self, rule: Rule) -> Self {
    self.refinements.push(rule);
    self
  }

  /// Run every field rule, then (only if none failed) every refinement.
  pub fn validate(&self, record: &FormRecord) -> ValidationReport {
    let mut report: ValidationReport =
      self.fields.iter().filter_map(|rule| rule(record)).collect();

    if report.is_valid() {
      for rule in &self.refinements {
        if let Some(issue) = rule(record) {
          report.push(issue);
        }
      }
    }

    debug!(
      entity = %self.entity,
      issues = report.issues.len(),
      "validated form record"
    );
    report
  }

  /// The schema the back office applies to `entity`.
  pub fn for_entity(entity: EntityType) -> Self {
    match entity {
      EntityType::Customer => customer(),
      EntityType::Supplier => supplier(),
      EntityType::Employee => employee(),
      EntityType::Product => product(),
    }
  }
}

// ─── Entity schemas ──────────────────────────────────────────────────────────

fn customer() -> Schema {
  Schema::new(EntityType::Customer)
    .field(rules::required(fields::NAME, "name is required"))
    .field(rules::required(fields::IDENTIFIER, "identifier is required"))
    .fields(person_kind_rules())
    .field(gender_rule())
    .fields(contact_rules())
    .refine(refine::identifier(None))
}

fn supplier() -> Schema {
  Schema::new(EntityType::Supplier)
    .field(rules::required(fields::NAME, "name is required"))
    .field(rules::required(fields::IDENTIFIER, "identifier is required"))
    .fields(person_kind_rules())
    .field(rules::required(
      fields::SUPPLIER_TYPE,
      "supplier type is required",
    ))
    .fields(contact_rules())
    .refine(refine::identifier(None))
}

fn employee() -> Schema {
  Schema::new(EntityType::Employee)
    .field(rules::required(fields::NAME, "name is required"))
    .field(rules::required(fields::IDENTIFIER, "identifier is required"))
    .field(rules::required(fields::ROLE, "role is required"))
    .field(rules::required(
      fields::ADMISSION_DATE,
      "admission date is required",
    ))
    .field(rules::required(fields::SALARY, "salary is required"))
    .field(gender_rule())
    .fields(contact_rules())
    .refine(refine::identifier(Some(PersonKind::Individual)))
    .refine(refine::admission_date())
    .refine(refine::positive_salary())
}

fn product() -> Schema {
  Schema::new(EntityType::Product)
    .field(rules::required(fields::NAME, "name is required"))
    .field(rules::required(fields::DESCRIPTION, "description is required"))
    .field(rules::required(fields::COST_PRICE, "cost price is required"))
    .field(rules::positive(
      fields::COST_PRICE,
      "cost price must be greater than zero",
    ))
    .field(rules::required(fields::SALE_PRICE, "sale price is required"))
    .field(rules::positive(
      fields::SALE_PRICE,
      "sale price must be greater than zero",
    ))
    .refine(refine::sale_not_below_cost())
}

// ─── Shared rule groups ──────────────────────────────────────────────────────

fn person_kind_rules() -> [Rule; 2] {
  [
    rules::required(fields::PERSON_KIND, "person kind is required"),
    rules::one_of(
      fields::PERSON_KIND,
      PersonKind::VALUES,
      "person kind must be FISICA or JURIDICA",
    ),
  ]
}

fn gender_rule() -> Rule {
  rules::one_of(
    fields::GENDER,
    Gender::VALUES,
    "gender must be MALE, FEMALE or UNSPECIFIED",
  )
}

fn contact_rules() -> [Rule; 6] {
  [
    rules::max_len(
      fields::STATE_REGISTRATION,
      20,
      "state registration must be at most 20 characters",
    ),
    rules::matches(fields::EMAIL, &rules::EMAIL_PATTERN, "email is invalid"),
    rules::digit_count(
      fields::PHONE,
      &[10, 11],
      "phone must have 10 or 11 digits",
    ),
    rules::matches(
      fields::STATE,
      &rules::STATE_PATTERN,
      "state must be a two-letter code",
    ),
    rules::digit_count(
      fields::POSTAL_CODE,
      &[8],
      "postal code must have 8 digits",
    ),
    rules::max_len(fields::CITY, 80, "city must be at most 80 characters"),
  ]
}
