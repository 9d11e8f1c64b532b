//! In-process ATS backend for exercising the REST sources end to end.
//!
//! Serves the comment and review endpoints from an in-memory store on an
//! ephemeral port. Flags let a test make it misbehave (unfiltered listings,
//! foreign records, injected failures).

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

const FAKE_AUTHOR_ID: &str = "00000000-0000-4000-8000-000000000001";
const MUTABLE_FIELDS: &[&str] = &["text", "score", "comment", "visibility", "reviewStatus"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Family {
    CandidateComments,
    PositionComments,
    CandidateReviews,
}

impl Family {
    fn parent_key(self) -> &'static str {
        match self {
            Family::CandidateComments | Family::CandidateReviews => "companyCandidateId",
            Family::PositionComments => "positionId",
        }
    }

    fn collection_prefix(self) -> &'static str {
        match self {
            Family::CandidateComments => "/company-candidates/:id/comments",
            Family::PositionComments => "/positions/:id/comments",
            Family::CandidateReviews => "/company-candidates/:id/reviews",
        }
    }

    fn item_root(self) -> &'static str {
        match self {
            Family::CandidateComments => "/candidate-comments",
            Family::PositionComments => "/position-comments",
            Family::CandidateReviews => "/candidate-reviews",
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Listing {
    Current(Uuid),
    Global,
    All,
}

#[derive(Default)]
struct Store {
    records: Vec<(Family, Value)>,
    requests: Vec<String>,
    last_authorization: Option<String>,
    fail_status: Option<u16>,
    ignore_filters: bool,
    leak_foreign: bool,
}

type Shared = Arc<Mutex<Store>>;

/// Error shape mirrors the real backend's `{"error": {"code", "message"}}` envelope.
enum FakeError {
    NotFound(String),
    Injected(StatusCode),
}

impl IntoResponse for FakeError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            FakeError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            FakeError::Injected(status) => {
                (status, "INJECTED", "Injected failure".to_string())
            }
        };
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));
        (status, body).into_response()
    }
}

pub(crate) struct FakeBackend {
    pub base_url: String,
    store: Shared,
}

impl FakeBackend {
    pub async fn spawn() -> Self {
        let store: Shared = Arc::default();
        let app = build_router(store.clone());

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .expect("bind fake backend");
        let addr = listener.local_addr().expect("fake backend address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake backend crashed");
        });

        Self {
            base_url: format!("http://{addr}"),
            store,
        }
    }

    /// Inserts a reviewed comment (or a favorite review) and returns its id.
    pub fn seed(&self, family: Family, parent: Uuid, stage: Option<Uuid>, text: &str) -> Uuid {
        let body = match family {
            Family::CandidateReviews => json!({ "score": 10, "comment": text, "stageId": stage }),
            _ => json!({ "text": text, "stageId": stage }),
        };
        let record = new_record(family, parent, &body);
        let id = record["id"]
            .as_str()
            .and_then(|s| s.parse().ok())
            .expect("seeded id");
        self.store.lock().unwrap().records.push((family, record));
        id
    }

    pub fn requests(&self) -> Vec<String> {
        self.store.lock().unwrap().requests.clone()
    }

    pub fn last_authorization(&self) -> Option<String> {
        self.store.lock().unwrap().last_authorization.clone()
    }

    pub fn fail_with(&self, status: u16) {
        self.store.lock().unwrap().fail_status = Some(status);
    }

    /// List endpoints return every record of the parent, twice.
    pub fn ignore_filters(&self) {
        self.store.lock().unwrap().ignore_filters = true;
    }

    /// List endpoints also return other parents' records.
    pub fn leak_foreign_records(&self) {
        self.store.lock().unwrap().leak_foreign = true;
    }
}

fn build_router(store: Shared) -> Router {
    let mut router: Router<Shared> = Router::new();
    for family in [
        Family::CandidateComments,
        Family::PositionComments,
        Family::CandidateReviews,
    ] {
        let prefix = family.collection_prefix();
        let item = format!("{}/:id", family.item_root());
        router = router
            .route(
                prefix,
                get(move |state: State<Shared>, Path(id): Path<Uuid>| async move {
                    list(state, family, id, Listing::All)
                })
                .post(
                    move |State(store): State<Shared>, Path(id): Path<Uuid>, Json(body): Json<Value>| async move {
                        let record = new_record(family, id, &body);
                        store.lock().unwrap().records.push((family, record.clone()));
                        (StatusCode::CREATED, Json(record))
                    },
                ),
            )
            .route(
                &format!("{prefix}/global"),
                get(move |state: State<Shared>, Path(id): Path<Uuid>| async move {
                    list(state, family, id, Listing::Global)
                }),
            )
            .route(
                &format!("{prefix}/stages/:stage"),
                get(
                    move |state: State<Shared>, Path((id, stage)): Path<(Uuid, Uuid)>| async move {
                        list(state, family, id, Listing::Current(stage))
                    },
                ),
            )
            .route(
                &item,
                put(
                    move |State(store): State<Shared>, Path(id): Path<Uuid>, Json(body): Json<Value>| async move {
                        update(&store, family, id, &body)
                    },
                )
                .delete(move |State(store): State<Shared>, Path(id): Path<Uuid>| async move {
                    delete(&store, family, id)
                }),
            )
            .route(
                &format!("{item}/mark-pending"),
                post(move |State(store): State<Shared>, Path(id): Path<Uuid>| async move {
                    update(&store, family, id, &json!({ "reviewStatus": "pending" }))
                }),
            )
            .route(
                &format!("{item}/mark-reviewed"),
                post(move |State(store): State<Shared>, Path(id): Path<Uuid>| async move {
                    update(&store, family, id, &json!({ "reviewStatus": "reviewed" }))
                }),
            );
    }
    router
        .layer(middleware::from_fn_with_state(store.clone(), record_request))
        .with_state(store)
}

async fn record_request(State(store): State<Shared>, request: Request, next: Next) -> Response {
    let fail_status = {
        let mut store = store.lock().unwrap();
        store
            .requests
            .push(format!("{} {}", request.method(), request.uri().path()));
        store.last_authorization = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        store.fail_status
    };
    if let Some(status) = fail_status.and_then(|s| StatusCode::from_u16(s).ok()) {
        return FakeError::Injected(status).into_response();
    }
    next.run(request).await
}

fn new_record(family: Family, parent: Uuid, body: &Value) -> Value {
    let stage_id = body.get("stageId").cloned().unwrap_or(Value::Null);
    let scope = if stage_id.is_null() { "global" } else { "stage-specific" };
    let now = Utc::now().to_rfc3339();
    let mut record = json!({
        "id": Uuid::new_v4(),
        "scope": scope,
        "stageId": stage_id,
        "visibility": body.get("visibility").cloned().unwrap_or(json!("private")),
        "reviewStatus": body.get("reviewStatus").cloned().unwrap_or(json!("reviewed")),
        "createdAt": now,
        "updatedAt": now,
        "authorId": FAKE_AUTHOR_ID,
        "authorName": "Fake Recruiter",
    });
    record[family.parent_key()] = json!(parent);
    for field in ["text", "score", "comment"] {
        if let Some(value) = body.get(field) {
            record[field] = value.clone();
        }
    }
    record
}

fn list(State(store): State<Shared>, family: Family, parent: Uuid, listing: Listing) -> Json<Vec<Value>> {
    let store = store.lock().unwrap();
    let parent_str = parent.to_string();
    let mut out: Vec<Value> = store
        .records
        .iter()
        .filter(|(f, _)| *f == family)
        .map(|(_, r)| r)
        .filter(|r| store.leak_foreign || r[family.parent_key()].as_str() == Some(parent_str.as_str()))
        .filter(|r| {
            store.ignore_filters
                || match listing {
                    Listing::All => true,
                    Listing::Global => r["stageId"].is_null(),
                    Listing::Current(stage) => r["stageId"].as_str() == Some(stage.to_string().as_str()),
                }
        })
        .cloned()
        .collect();
    if store.ignore_filters {
        let copy = out.clone();
        out.extend(copy);
    }
    Json(out)
}

fn update(store: &Shared, family: Family, id: Uuid, body: &Value) -> Result<Json<Value>, FakeError> {
    let mut store = store.lock().unwrap();
    let record = find_mut(&mut store, family, id)?;
    for field in MUTABLE_FIELDS {
        if let Some(value) = body.get(*field) {
            record[*field] = value.clone();
        }
    }
    record["updatedAt"] = json!((Utc::now() + Duration::seconds(1)).to_rfc3339());
    Ok(Json(record.clone()))
}

fn delete(store: &Shared, family: Family, id: Uuid) -> Result<StatusCode, FakeError> {
    let mut store = store.lock().unwrap();
    find_mut(&mut store, family, id)?;
    let id_str = id.to_string();
    store
        .records
        .retain(|(f, r)| !(*f == family && r["id"].as_str() == Some(id_str.as_str())));
    Ok(StatusCode::NO_CONTENT)
}

fn find_mut(store: &mut Store, family: Family, id: Uuid) -> Result<&mut Value, FakeError> {
    let id_str = id.to_string();
    store
        .records
        .iter_mut()
        .filter(|(f, _)| *f == family)
        .map(|(_, r)| r)
        .find(|r| r["id"].as_str() == Some(id_str.as_str()))
        .ok_or_else(|| FakeError::NotFound(format!("Record {id} not found")))
}
