//! Validated-input core for the back-office client.
//!
//! Checks taxpayer identifiers, validates create/edit form records against
//! per-entity schemas, and normalizes valid records into backend payloads.
//! This crate is free of HTTP dependencies; the only outward call it makes
//! goes through the [`directory::RecordDirectory`] trait.

pub mod checksum;
pub mod directory;
pub mod duplicate;
pub mod error;
pub mod normalize;
pub mod record;
pub mod validation;

pub use error::{Error, Result};
pub use record::{EntityType, FormRecord};
pub use validation::{ValidationIssue, ValidationReport, validate};
