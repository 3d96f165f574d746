//! REST client for the back-office API.
//!
//! [`ApiClient`] holds connection settings; [`ApiClient::session`] binds it
//! to the caller's [`Session`] and yields a [`SessionClient`] that lists,
//! reads, writes and toggles records, and runs the full submit flow
//! (validation, duplicate lookup, normalization, save).

mod client;
pub mod error;

pub use client::{
  ApiClient, ApiConfig, Session, SessionClient, SubmitOutcome, USER_ID_HEADER,
};
pub use error::{Error, Result};

#[cfg(test)]
mod tests;
