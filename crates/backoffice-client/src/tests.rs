//! Client tests against an in-process axum backend.

use std::{
  net::SocketAddr,
  sync::{Arc, Mutex},
  time::Duration,
};

use axum::{
  Json, Router,
  extract::{Path, Query, State},
  http::{HeaderMap, StatusCode, header},
  response::{IntoResponse, Response},
  routing::{get, patch},
};
use backoffice_core::{
  EntityType, FormRecord,
  directory::{Page, PageRequest, RecordSummary},
  duplicate::DUPLICATE_IDENTIFIER,
  record::fields,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use crate::{
  ApiClient, ApiConfig, Error, Session, SessionClient, SubmitOutcome,
  USER_ID_HEADER, error::GENERIC_FAILURE,
};

// ─── Fake backend ────────────────────────────────────────────────────────────

/// One request as the fake backend saw it.
#[derive(Debug, Clone)]
struct Call {
  method:        &'static str,
  path:          String,
  authorization: Option<String>,
  user_id:       Option<String>,
  body:          Value,
}

#[derive(Default)]
struct Backend {
  records:       Mutex<Vec<RecordSummary>>,
  calls:         Mutex<Vec<Call>>,
  fail_listing:  bool,
  write_failure: Option<(StatusCode, &'static str)>,
}

impl Backend {
  fn with_records(records: Vec<RecordSummary>) -> Self {
    Self {
      records: Mutex::new(records),
      ..Self::default()
    }
  }

  fn record(&self, method: &'static str, path: String, headers: &HeaderMap, body: Value) {
    let value_of = |name: &str| {
      headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
    };
    self.calls.lock().unwrap().push(Call {
      method,
      path,
      authorization: value_of(header::AUTHORIZATION.as_str()),
      user_id: value_of(USER_ID_HEADER),
      body,
    });
  }

  fn calls(&self) -> Vec<Call> { self.calls.lock().unwrap().clone() }

  fn saved(&self, id: u64, body: &Value) -> RecordSummary {
    RecordSummary {
      id,
      name: body["name"].as_str().unwrap_or_default().to_owned(),
      identifier: body["identifier"].as_str().map(str::to_owned),
      active: true,
    }
  }

  fn write_failure(&self) -> Option<Response> {
    self
      .write_failure
      .map(|(status, body)| (status, body.to_owned()).into_response())
  }
}

async fn list(
  State(backend): State<Arc<Backend>>,
  Path(collection): Path<String>,
  Query(request): Query<PageRequest>,
  headers: HeaderMap,
) -> Response {
  backend.record(
    "GET",
    format!("/{collection}?page={}&size={}", request.page, request.size),
    &headers,
    Value::Null,
  );
  if backend.fail_listing {
    return (StatusCode::SERVICE_UNAVAILABLE, "down").into_response();
  }
  let items = backend.records.lock().unwrap().clone();
  Json(Page {
    total: items.len() as u64,
    items,
    page: request.page,
    size: request.size,
  })
  .into_response()
}

async fn create(
  State(backend): State<Arc<Backend>>,
  Path(collection): Path<String>,
  headers: HeaderMap,
  Json(body): Json<Value>,
) -> Response {
  backend.record("POST", format!("/{collection}"), &headers, body.clone());
  if let Some(failure) = backend.write_failure() {
    return failure;
  }
  (StatusCode::CREATED, Json(backend.saved(42, &body))).into_response()
}

async fn get_one(
  State(backend): State<Arc<Backend>>,
  Path((collection, id)): Path<(String, u64)>,
  headers: HeaderMap,
) -> Response {
  backend.record("GET", format!("/{collection}/{id}"), &headers, Value::Null);
  if id == 404 {
    return (StatusCode::NOT_FOUND, Json(json!({ "message": "record not found" })))
      .into_response();
  }
  Json(json!({ "id": id, "name": "Ana Souza", "email": "ana@example.com" }))
    .into_response()
}

async fn update(
  State(backend): State<Arc<Backend>>,
  Path((collection, id)): Path<(String, u64)>,
  headers: HeaderMap,
  Json(body): Json<Value>,
) -> Response {
  backend.record("PUT", format!("/{collection}/{id}"), &headers, body.clone());
  if let Some(failure) = backend.write_failure() {
    return failure;
  }
  Json(backend.saved(id, &body)).into_response()
}

#[derive(Deserialize)]
struct StatusBody {
  active: bool,
}

async fn set_status(
  State(backend): State<Arc<Backend>>,
  Path((collection, id)): Path<(String, u64)>,
  headers: HeaderMap,
  Json(body): Json<StatusBody>,
) -> Response {
  backend.record(
    "PATCH",
    format!("/{collection}/{id}/status"),
    &headers,
    json!({ "active": body.active }),
  );
  Json(RecordSummary {
    id,
    name: "Ana Souza".into(),
    identifier: None,
    active: body.active,
  })
  .into_response()
}

async fn spawn(backend: Arc<Backend>) -> SocketAddr {
  let app = Router::new()
    .route("/{collection}", get(list).post(create))
    .route("/{collection}/{id}", get(get_one).put(update))
    .route("/{collection}/{id}/status", patch(set_status))
    .with_state(backend);

  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
  addr
}

async fn client_for(backend: Arc<Backend>) -> SessionClient {
  let addr = spawn(backend).await;
  ApiClient::new(ApiConfig {
    base_url: format!("http://{addr}/"),
    timeout:  Duration::from_secs(5),
  })
  .unwrap()
  .session(Session {
    token:   Some("s3cret".into()),
    user_id: Some(3),
  })
}

fn summary(id: u64, identifier: &str) -> RecordSummary {
  RecordSummary {
    id,
    name: format!("Record {id}"),
    identifier: Some(identifier.to_owned()),
    active: true,
  }
}

fn customer(identifier: &str) -> FormRecord {
  FormRecord::new()
    .with(fields::NAME, "Ana Souza")
    .with(fields::PERSON_KIND, "FISICA")
    .with(fields::IDENTIFIER, identifier)
    .with(fields::PHONE, "(11) 98765-4321")
    .with(fields::POSTAL_CODE, "01310-100")
    .with(fields::EMAIL, "")
}

// ─── Reads ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_sends_session_and_paging() {
  let backend = Arc::new(Backend::with_records(vec![summary(1, "52998224725")]));
  let client = client_for(backend.clone()).await;

  let page = client
    .list(EntityType::Supplier, PageRequest::new(2, 10))
    .await
    .unwrap();
  assert_eq!(page.items.len(), 1);
  assert_eq!(page.page, 2);

  let calls = backend.calls();
  assert_eq!(calls.len(), 1);
  assert_eq!(calls[0].path, "/suppliers?page=2&size=10");
  assert_eq!(calls[0].authorization.as_deref(), Some("Bearer s3cret"));
  assert_eq!(calls[0].user_id.as_deref(), Some("3"));
}

#[tokio::test]
async fn session_without_token_sends_no_authorization() {
  let backend = Arc::new(Backend::default());
  let addr = spawn(backend.clone()).await;
  let client = ApiClient::new(ApiConfig {
    base_url: format!("http://{addr}"),
    ..ApiConfig::default()
  })
  .unwrap()
  .session(Session::default());

  client
    .list(EntityType::Product, PageRequest::default())
    .await
    .unwrap();
  let calls = backend.calls();
  assert_eq!(calls[0].path, "/products?page=0&size=20");
  assert!(calls[0].authorization.is_none());
  assert!(calls[0].user_id.is_none());
}

#[tokio::test]
async fn get_returns_the_backend_entity() {
  let client = client_for(Arc::new(Backend::default())).await;
  let entity = client.get(EntityType::Customer, 7).await.unwrap();
  assert_eq!(entity["id"], json!(7));
  assert_eq!(entity["email"], json!("ana@example.com"));

  let err = client.get(EntityType::Customer, 404).await.unwrap_err();
  assert!(matches!(
    &err,
    Error::Status { status, .. } if *status == StatusCode::NOT_FOUND
  ));
  assert_eq!(err.user_message(), "record not found");
}

// ─── Submit ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn submit_posts_normalized_payload() {
  let backend = Arc::new(Backend::with_records(vec![summary(1, "11144477735")]));
  let client = client_for(backend.clone()).await;

  let outcome = client
    .submit(EntityType::Customer, &customer("529.982.247-25"), None)
    .await
    .unwrap();
  let SubmitOutcome::Saved(saved) = outcome else {
    panic!("expected the record to be saved");
  };
  assert_eq!(saved.id, 42);

  let calls = backend.calls();
  assert_eq!(calls.len(), 2);
  assert_eq!(calls[0].method, "GET");
  assert_eq!(calls[0].path, "/customers?page=0&size=1000");
  assert_eq!(calls[1].method, "POST");
  assert_eq!(calls[1].path, "/customers");

  let body = &calls[1].body;
  assert_eq!(body["identifier"], json!("52998224725"));
  assert_eq!(body["phone"], json!("11987654321"));
  assert_eq!(body["postal_code"], json!("01310100"));
  assert_eq!(body["person_kind"], json!("FISICA"));
  assert_eq!(body["email"], json!(null));
}

#[tokio::test]
async fn duplicate_identifier_blocks_submission() {
  let backend = Arc::new(Backend::with_records(vec![summary(1, "52998224725")]));
  let client = client_for(backend.clone()).await;

  let outcome = client
    .submit(EntityType::Customer, &customer("529.982.247-25"), None)
    .await
    .unwrap();
  let SubmitOutcome::Rejected(report) = outcome else {
    panic!("expected a duplicate rejection");
  };
  assert_eq!(report.first_issue().unwrap().message, DUPLICATE_IDENTIFIER);

  let calls = backend.calls();
  assert_eq!(calls.len(), 1);
  assert_eq!(calls[0].method, "GET");
}

#[tokio::test]
async fn editing_the_owner_updates_in_place() {
  let backend = Arc::new(Backend::with_records(vec![summary(5, "52998224725")]));
  let client = client_for(backend.clone()).await;

  let outcome = client
    .submit(EntityType::Customer, &customer("529.982.247-25"), Some(5))
    .await
    .unwrap();
  assert!(matches!(outcome, SubmitOutcome::Saved(ref s) if s.id == 5));

  let calls = backend.calls();
  assert_eq!(calls.last().unwrap().method, "PUT");
  assert_eq!(calls.last().unwrap().path, "/customers/5");
}

#[tokio::test]
async fn failed_duplicate_lookup_still_submits() {
  let backend = Arc::new(Backend {
    fail_listing: true,
    ..Backend::default()
  });
  let client = client_for(backend.clone()).await;

  let outcome = client
    .submit(EntityType::Customer, &customer("529.982.247-25"), None)
    .await
    .unwrap();
  assert!(matches!(outcome, SubmitOutcome::Saved(_)));
  assert_eq!(backend.calls().last().unwrap().method, "POST");
}

#[tokio::test]
async fn invalid_record_never_reaches_the_backend() {
  let backend = Arc::new(Backend::default());
  let client = client_for(backend.clone()).await;

  let product = FormRecord::new()
    .with(fields::NAME, "Widget")
    .with(fields::DESCRIPTION, "Small")
    .with(fields::COST_PRICE, "10.00")
    .with(fields::SALE_PRICE, "9.99");
  let outcome = client
    .submit(EntityType::Product, &product, None)
    .await
    .unwrap();
  let SubmitOutcome::Rejected(report) = outcome else {
    panic!("expected a validation rejection");
  };
  assert_eq!(report.issues.len(), 1);
  assert!(report.has_error(fields::SALE_PRICE));
  assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn backend_rejection_is_surfaced_verbatim() {
  let backend = Arc::new(Backend {
    write_failure: Some((
      StatusCode::UNPROCESSABLE_ENTITY,
      r#"{"message": "supplier type is not allowed"}"#,
    )),
    ..Backend::default()
  });
  let client = client_for(backend).await;

  let supplier = customer("11.444.777/0001-61")
    .with(fields::PERSON_KIND, "JURIDICA")
    .with(fields::SUPPLIER_TYPE, "Other");
  let err = client
    .submit(EntityType::Supplier, &supplier, None)
    .await
    .unwrap_err();
  assert_eq!(err.user_message(), "supplier type is not allowed");
}

#[tokio::test]
async fn silent_backend_rejection_gets_generic_message() {
  let backend = Arc::new(Backend {
    write_failure: Some((StatusCode::INTERNAL_SERVER_ERROR, "")),
    ..Backend::default()
  });
  let client = client_for(backend).await;

  let product = FormRecord::new()
    .with(fields::NAME, "Widget")
    .with(fields::DESCRIPTION, "Small")
    .with(fields::COST_PRICE, "10")
    .with(fields::SALE_PRICE, "12.50");
  let err = client
    .submit(EntityType::Product, &product, None)
    .await
    .unwrap_err();
  assert_eq!(err.user_message(), GENERIC_FAILURE);
}

// ─── Status toggle ───────────────────────────────────────────────────────────

#[tokio::test]
async fn set_active_patches_status() {
  let backend = Arc::new(Backend::default());
  let client = client_for(backend.clone()).await;

  let summary = client
    .set_active(EntityType::Employee, 12, false)
    .await
    .unwrap();
  assert!(!summary.active);

  let calls = backend.calls();
  assert_eq!(calls[0].method, "PATCH");
  assert_eq!(calls[0].path, "/employees/12/status");
  assert_eq!(calls[0].body, json!({ "active": false }));
}
