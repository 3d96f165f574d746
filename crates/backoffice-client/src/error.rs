//! Error type for `backoffice-client`.

use reqwest::StatusCode;
use thiserror::Error;

/// Shown when the backend rejects a request without saying why.
pub const GENERIC_FAILURE: &str = "the server rejected the request";

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to build HTTP client: {0}")]
  Build(#[source] reqwest::Error),

  #[error("request failed: {0}")]
  Http(#[from] reqwest::Error),

  /// The backend answered with a non-success status.
  #[error("{message} ({status})")]
  Status { status: StatusCode, message: String },
}

impl Error {
  /// Build a [`Error::Status`] from a failed response body. The backend's
  /// `message` or `error` field is used verbatim when present.
  pub(crate) fn from_response(status: StatusCode, body: &str) -> Self {
    let message = serde_json::from_str::<serde_json::Value>(body)
      .ok()
      .and_then(|value| {
        ["message", "error"]
          .iter()
          .find_map(|&key| value.get(key)?.as_str().map(str::to_owned))
      })
      .filter(|message| !message.trim().is_empty())
      .unwrap_or_else(|| GENERIC_FAILURE.to_owned());
    Self::Status { status, message }
  }

  /// The text to show a user for this error.
  pub fn user_message(&self) -> String {
    match self {
      Self::Status { message, .. } => message.clone(),
      other => other.to_string(),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
