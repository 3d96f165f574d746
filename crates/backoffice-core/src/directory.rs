//! The `RecordDirectory` trait and the paging types it speaks.
//!
//! A directory is whatever can list existing records of an entity type,
//! normally the REST backend reached through `backoffice-client`. The core
//! only needs listing, for the duplicate-identifier lookup; higher layers
//! depend on this abstraction rather than on a concrete HTTP client.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::record::EntityType;

/// Identity key the backend assigns to a stored record.
pub type RecordId = u64;

// ─── Paging ──────────────────────────────────────────────────────────────────

/// Which page of a collection to fetch. Pages are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
  pub page: u32,
  pub size: u32,
}

impl PageRequest {
  /// Page size used when a caller wants the whole collection in one call.
  pub const EVERYTHING_SIZE: u32 = 1000;

  pub fn new(page: u32, size: u32) -> Self { Self { page, size } }

  /// The first page, sized large enough to stand in for "all records".
  pub fn everything() -> Self { Self::new(0, Self::EVERYTHING_SIZE) }
}

impl Default for PageRequest {
  fn default() -> Self { Self::new(0, 20) }
}

/// One page of a paginated collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
  pub items: Vec<T>,
  #[serde(default)]
  pub page:  u32,
  #[serde(default)]
  pub size:  u32,
  /// Total number of records across all pages.
  #[serde(default)]
  pub total: u64,
}

/// The listing view of a stored record. Only the fields the back office
/// needs for tables and duplicate checks; anything else the backend sends is
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSummary {
  pub id:         RecordId,
  #[serde(default)]
  pub name:       String,
  /// As stored by the backend; may or may not carry punctuation.
  #[serde(default)]
  pub identifier: Option<String>,
  #[serde(default = "default_active")]
  pub active:     bool,
}

fn default_active() -> bool { true }

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a source of existing records.
///
/// Methods return `Send` futures so a directory can be shared across a
/// multi-threaded runtime.
pub trait RecordDirectory: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch one page of the records of `entity`.
  fn list_page(
    &self,
    entity: EntityType,
    request: PageRequest,
  ) -> impl Future<Output = Result<Page<RecordSummary>, Self::Error>> + Send + '_;
}
