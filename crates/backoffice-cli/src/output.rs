//! Plain-text rendering for validation reports and record tables.

use backoffice_core::{
  ValidationReport,
  checksum::digits_only,
  directory::{Page, RecordSummary},
  normalize::format_identifier,
};

const NAME_WIDTH: usize = 32;

pub fn status_label(active: bool) -> &'static str {
  if active { "active" } else { "inactive" }
}

/// The headline issue first, then one line per flagged field.
pub fn report(report: &ValidationReport) -> String {
  let mut lines = Vec::with_capacity(report.field_errors.len() + 1);
  if let Some(first) = report.first_issue() {
    lines.push(format!("✗ {}", first.message));
  }
  for (field, message) in &report.field_errors {
    lines.push(format!("  {field:<20} {message}"));
  }
  lines.into_iter().map(|l| l + "\n").collect()
}

/// One page of records as a fixed-width table with a paging footer.
pub fn table(page: &Page<RecordSummary>) -> String {
  let mut lines = vec![format!(
    "{:>6}  {:<NAME_WIDTH$}  {:<18}  {}",
    "ID", "NAME", "IDENTIFIER", "STATUS"
  )];

  for item in &page.items {
    let identifier = item
      .identifier
      .as_deref()
      .map(|raw| format_identifier(&digits_only(raw)))
      .unwrap_or_else(|| "-".to_owned());
    lines.push(format!(
      "{:>6}  {:<NAME_WIDTH$}  {:<18}  {}",
      item.id,
      truncate(&item.name, NAME_WIDTH),
      identifier,
      status_label(item.active)
    ));
  }

  lines.push(format!(
    "page {} · {} shown · {} total",
    page.page,
    page.items.len(),
    page.total
  ));
  lines.into_iter().map(|l| l + "\n").collect()
}

fn truncate(s: &str, max: usize) -> String {
  if s.chars().count() <= max {
    return s.to_owned();
  }
  let mut out: String = s.chars().take(max - 1).collect();
  out.push('…');
  out
}
