//! Error types for `backoffice-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown entity type: {0:?}")]
  UnknownEntityType(String),

  #[error("record file must hold a JSON object of field values")]
  NotAnObject,

  #[error("field {field:?} holds neither text nor a number")]
  UnsupportedValue { field: String },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
