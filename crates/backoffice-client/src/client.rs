//! Async HTTP client wrapping the back-office REST API.

use std::{future::Future, time::Duration};

use backoffice_core::{
  EntityType, FormRecord, ValidationReport,
  directory::{Page, PageRequest, RecordDirectory, RecordId, RecordSummary},
  duplicate::validate_for_submit,
  normalize::{Payload, normalize},
};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::json;
use tracing::{debug, info};

use crate::{Error, Result};

/// Header carrying the signed-in user's id, when the session has one.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Connection settings for the back-office API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub timeout:  Duration,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: "http://localhost:8080".to_string(),
      timeout:  Duration::from_secs(30),
    }
  }
}

/// Who is making the calls. Passed explicitly to [`ApiClient::session`];
/// nothing here is global.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
  /// Bearer token handed out by the backend at sign-in.
  pub token:   Option<String>,
  pub user_id: Option<u64>,
}

/// Async HTTP client for the back-office REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(config.timeout)
      .build()
      .map_err(Error::Build)?;
    Ok(Self { client, config })
  }

  /// Bind this client to a session; every request made through the result
  /// carries the session's credentials.
  pub fn session(&self, session: Session) -> SessionClient {
    SessionClient {
      api: self.clone(),
      session,
    }
  }
}

/// What happened to a submitted form.
#[derive(Debug)]
pub enum SubmitOutcome {
  /// Validation failed; nothing was sent.
  Rejected(ValidationReport),
  /// The backend stored the record.
  Saved(RecordSummary),
}

/// An [`ApiClient`] bound to a [`Session`].
#[derive(Clone)]
pub struct SessionClient {
  api:     ApiClient,
  session: Session,
}

impl SessionClient {
  fn url(&self, path: &str) -> String {
    format!("{}{}", self.api.config.base_url.trim_end_matches('/'), path)
  }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    let req = match &self.session.token {
      Some(token) => req.bearer_auth(token),
      None => req,
    };
    match self.session.user_id {
      Some(id) => req.header(USER_ID_HEADER, id.to_string()),
      None => req,
    }
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// `GET /{collection}?page=<n>&size=<n>`
  pub async fn list(
    &self,
    entity: EntityType,
    request: PageRequest,
  ) -> Result<Page<RecordSummary>> {
    let path = format!("/{}", entity.collection());
    debug!(%entity, page = request.page, size = request.size, "listing records");
    let resp = self
      .auth(self.api.client.get(self.url(&path)))
      .query(&[("page", request.page), ("size", request.size)])
      .send()
      .await?;
    read_json(resp).await
  }

  /// `GET /{collection}/{id}`, the full entity as the backend returns it.
  pub async fn get(
    &self,
    entity: EntityType,
    id: RecordId,
  ) -> Result<serde_json::Value> {
    let path = format!("/{}/{id}", entity.collection());
    let resp = self
      .auth(self.api.client.get(self.url(&path)))
      .send()
      .await?;
    read_json(resp).await
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  /// `POST /{collection}`
  pub async fn create(
    &self,
    entity: EntityType,
    payload: &Payload,
  ) -> Result<RecordSummary> {
    let path = format!("/{}", entity.collection());
    let resp = self
      .auth(self.api.client.post(self.url(&path)))
      .json(payload)
      .send()
      .await?;
    read_json(resp).await
  }

  /// `PUT /{collection}/{id}`
  pub async fn update(
    &self,
    entity: EntityType,
    id: RecordId,
    payload: &Payload,
  ) -> Result<RecordSummary> {
    let path = format!("/{}/{id}", entity.collection());
    let resp = self
      .auth(self.api.client.put(self.url(&path)))
      .json(payload)
      .send()
      .await?;
    read_json(resp).await
  }

  /// `PATCH /{collection}/{id}/status` with body `{"active": <bool>}`
  pub async fn set_active(
    &self,
    entity: EntityType,
    id: RecordId,
    active: bool,
  ) -> Result<RecordSummary> {
    let path = format!("/{}/{id}/status", entity.collection());
    let resp = self
      .auth(self.api.client.patch(self.url(&path)))
      .json(&json!({ "active": active }))
      .send()
      .await?;
    let summary: RecordSummary = read_json(resp).await?;
    info!(%entity, id, active = summary.active, "record status changed");
    Ok(summary)
  }

  // ── Submit ────────────────────────────────────────────────────────────────

  /// Validate `record`, check for a duplicate identifier where the entity
  /// calls for it, then create it (or update `editing`).
  ///
  /// Validation failures come back as [`SubmitOutcome::Rejected`]; only
  /// transport and backend failures are `Err`.
  pub async fn submit(
    &self,
    entity: EntityType,
    record: &FormRecord,
    editing: Option<RecordId>,
  ) -> Result<SubmitOutcome> {
    let report = validate_for_submit(self, entity, record, editing).await;
    if !report.is_valid() {
      debug!(%entity, issues = report.issues.len(), "submission rejected");
      return Ok(SubmitOutcome::Rejected(report));
    }

    let payload = normalize(entity, record);
    let saved = match editing {
      Some(id) => self.update(entity, id, &payload).await?,
      None => self.create(entity, &payload).await?,
    };
    info!(%entity, id = saved.id, "record saved");
    Ok(SubmitOutcome::Saved(saved))
  }
}

impl RecordDirectory for SessionClient {
  type Error = Error;

  fn list_page(
    &self,
    entity: EntityType,
    request: PageRequest,
  ) -> impl Future<Output = Result<Page<RecordSummary>>> + Send + '_ {
    self.list(entity, request)
  }
}

/// Decode a successful response, or turn a failed one into
/// [`Error::Status`].
async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T> {
  let status = resp.status();
  if !status.is_success() {
    let body = resp.text().await.unwrap_or_default();
    return Err(Error::from_response(status, &body));
  }
  Ok(resp.json().await?)
}
