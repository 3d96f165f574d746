//! Schema-driven validation of form records.
//!
//! A [`Schema`] holds two ordered lists of [`Rule`]s. Field rules all run
//! and report every failure; refinements look at the record as a whole and
//! run only when the field stage passed. The outcome is a
//! [`ValidationReport`], never an `Err`.

mod issue;
pub mod refine;
pub mod rules;
mod schema;

pub use issue::{ValidationIssue, ValidationReport};
pub use schema::Schema;

use crate::record::{EntityType, FormRecord};

/// A single check over a whole record.
pub type Rule =
  Box<dyn Fn(&FormRecord) -> Option<ValidationIssue> + Send + Sync>;

/// Validate `record` against the schema for `entity`.
pub fn validate(record: &FormRecord, entity: EntityType) -> ValidationReport {
  Schema::for_entity(entity).validate(record)
}
