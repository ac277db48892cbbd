//! In-memory stand-in for the Strapi content API.
//!
//! Implements just enough of the upload and collection endpoints for the
//! front-end to forward submissions against: `POST /api/upload`,
//! `POST /api/{collection}` and `GET /api/{collection}`. Response and error
//! bodies follow Strapi's shapes.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;
use uuid::Uuid;

/// Largest request body accepted by the mock.
pub const BODY_LIMIT: usize = 50 * 1024 * 1024;

/// Port used when `PORT` is unset, matching Strapi's default.
pub const DEFAULT_PORT: u16 = 1337;

/// Loopback address for the given `PORT` value, falling back to
/// `DEFAULT_PORT` when it is unset or not a port number.
pub fn listen_addr(port: Option<&str>) -> String {
    let port = port
        .and_then(|p| p.trim().parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    format!("127.0.0.1:{port}")
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct UploadedFile {
    pub id: u64,
    pub name: String,
    pub hash: String,
    pub mime: String,
    pub size: u64,
    pub url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Entry {
    pub id: u64,
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Default)]
pub struct Content {
    last_id: u64,
    pub uploads: Vec<UploadedFile>,
    pub collections: BTreeMap<String, Vec<Entry>>,
}

impl Content {
    fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }
}

pub type Db = Arc<RwLock<Content>>;

type ApiResult<T> = Result<T, (StatusCode, Json<Value>)>;

pub fn app() -> Router {
    app_with_db(Db::default())
}

/// Build the router over an existing store so tests can inspect it.
pub fn app_with_db(db: Db) -> Router {
    Router::new()
        .route("/api/upload", post(upload))
        .route("/api/{collection}", get(list_entries).post(create_entry))
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_db(listener, Db::default()).await
}

pub async fn run_with_db(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_db(db)).await
}

fn bad_request(message: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "data": null,
            "error": { "status": 400, "name": "ValidationError", "message": message }
        })),
    )
}

async fn upload(
    State(db): State<Db>,
    mut multipart: Multipart,
) -> ApiResult<Json<Vec<UploadedFile>>> {
    let mut received = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(&e.body_text()))?
    {
        if field.name() != Some("files") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let mime = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field.bytes().await.map_err(|e| bad_request(&e.body_text()))?;
        received.push((name, mime, data.len() as u64));
    }
    if received.is_empty() {
        return Err(bad_request("Files are empty"));
    }

    let mut content = db.write().await;
    let mut stored = Vec::with_capacity(received.len());
    for (name, mime, size) in received {
        let (stem, ext) = match name.rsplit_once('.') {
            Some((stem, ext)) => (stem.to_string(), format!(".{ext}")),
            None => (name.clone(), String::new()),
        };
        let hash = format!("{stem}_{}", Uuid::new_v4().simple());
        let file = UploadedFile {
            id: content.next_id(),
            url: format!("/uploads/{hash}{ext}"),
            name,
            hash,
            mime,
            size,
        };
        debug!(id = file.id, name = %file.name, size = file.size, "file stored");
        content.uploads.push(file.clone());
        stored.push(file);
    }
    Ok(Json(stored))
}

async fn create_entry(
    State(db): State<Db>,
    Path(collection): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Value>> {
    let Some(data) = body.get("data").and_then(Value::as_object) else {
        return Err(bad_request("Missing \"data\" payload in the request body"));
    };
    let mut content = db.write().await;
    let entry = Entry {
        id: content.next_id(),
        attributes: data.clone(),
    };
    debug!(%collection, id = entry.id, "entry created");
    content
        .collections
        .entry(collection)
        .or_default()
        .push(entry.clone());
    Ok(Json(json!({ "data": entry, "meta": {} })))
}

async fn list_entries(State(db): State<Db>, Path(collection): Path<String>) -> Json<Value> {
    let content = db.read().await;
    let entries = content
        .collections
        .get(&collection)
        .cloned()
        .unwrap_or_default();
    let total = entries.len();
    Json(json!({ "data": entries, "meta": { "pagination": { "total": total } } }))
}
