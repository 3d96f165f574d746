//! Duplicate-identifier detection.
//!
//! Uniqueness belongs to the backend; the lookup here only gives the user an
//! early, friendlier error. It is best-effort: a failed lookup is logged and
//! treated exactly like "no duplicate found".

use tracing::{debug, warn};

use crate::{
  checksum::digits_only,
  directory::{PageRequest, RecordDirectory, RecordId},
  record::{EntityType, FormRecord, fields},
  validation::{ValidationIssue, ValidationReport, validate},
};

pub const DUPLICATE_IDENTIFIER: &str = "identifier already registered";

/// Whether a record of `entity` other than `editing` already uses
/// `identifier`. Identifiers are compared digits-only on both sides.
pub async fn identifier_taken<D: RecordDirectory>(
  directory: &D,
  entity: EntityType,
  identifier: &str,
  editing: Option<RecordId>,
) -> Result<bool, D::Error> {
  let wanted = digits_only(identifier);
  if wanted.is_empty() {
    return Ok(false);
  }

  let page = directory.list_page(entity, PageRequest::everything()).await?;
  Ok(
    page
      .items
      .iter()
      .filter(|existing| Some(existing.id) != editing)
      .filter_map(|existing| existing.identifier.as_deref())
      .any(|existing| digits_only(existing) == wanted),
  )
}

/// The duplicate issue for `record`, if its identifier is already taken.
/// Lookup failures yield `None`.
pub async fn duplicate_identifier_issue<D: RecordDirectory>(
  directory: &D,
  entity: EntityType,
  record: &FormRecord,
  editing: Option<RecordId>,
) -> Option<ValidationIssue> {
  let identifier = record.text(fields::IDENTIFIER)?;
  let taken = identifier_taken(directory, entity, &identifier, editing)
    .await
    .unwrap_or_else(|err| {
      warn!(%entity, error = %err, "duplicate identifier lookup failed, skipping");
      false
    });

  taken.then(|| ValidationIssue::new(fields::IDENTIFIER, DUPLICATE_IDENTIFIER))
}

/// Schema validation followed, for entities that need it, by the duplicate
/// lookup. The lookup only runs once the schema passes.
pub async fn validate_for_submit<D: RecordDirectory>(
  directory: &D,
  entity: EntityType,
  record: &FormRecord,
  editing: Option<RecordId>,
) -> ValidationReport {
  let mut report = validate(record, entity);
  if !report.is_valid() || !entity.checks_duplicate_identifier() {
    return report;
  }

  if let Some(issue) =
    duplicate_identifier_issue(directory, entity, record, editing).await
  {
    debug!(%entity, ?editing, "identifier already registered");
    report.push(issue);
  }
  report
}
