// svckit/src/backend/memory.rs
//
// In-process emulation of the content API. Backs the dashboard's demo mode
// and the tests; supports failure injection.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use tracing::debug;
use uuid::Uuid;

use super::{ApiRequest, Method, Transport};
use crate::errors::ContentError;

pub const DEFAULT_PAGE_SIZE: usize = 25;
const MAX_PAGE_SIZE: usize = 100;
const PROTECTED_KEYS: [&str; 5] = ["id", "documentId", "createdAt", "updatedAt", "publishedAt"];

#[derive(Default)]
struct MemoryState {
    collections: HashMap<String, Vec<Map<String, Value>>>,
    next_id: u64,
    fail_next: u32,
    offline: bool,
    journal: Vec<String>,
}

#[derive(Default)]
pub struct MemoryTransport {
    state: Mutex<MemoryState>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record directly, bypassing failure injection and the journal.
    /// `fields` may carry its own `publishedAt` to backdate the record.
    pub fn seed(&self, resource: &str, fields: Value) -> Value {
        let mut state = self.state.lock();
        let mut fields = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let published = fields.remove("publishedAt");
        let mut record = insert_record(&mut state, resource, fields);
        if let Some(published) = published {
            record.insert("publishedAt".to_string(), published.clone());
            if let Some(stored) = state
                .collections
                .get_mut(resource)
                .and_then(|records| records.last_mut())
            {
                stored.insert("publishedAt".to_string(), published);
            }
        }
        Value::Object(record)
    }

    /// The next `n` requests fail as if the network were down.
    pub fn fail_next(&self, n: u32) {
        self.state.lock().fail_next = n;
    }

    pub fn set_offline(&self, offline: bool) {
        self.state.lock().offline = offline;
    }

    pub fn records(&self, resource: &str) -> Vec<Value> {
        self.state
            .lock()
            .collections
            .get(resource)
            .map(|records| records.iter().cloned().map(Value::Object).collect())
            .unwrap_or_default()
    }

    /// Requests that reached the backend, as `METHOD path`.
    pub fn journal(&self) -> Vec<String> {
        self.state.lock().journal.clone()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, ContentError> {
        let mut state = self.state.lock();

        if state.offline {
            return Err(ContentError::Network("backend unreachable (offline)".to_string()));
        }
        if state.fail_next > 0 {
            state.fail_next -= 1;
            return Err(ContentError::Network("simulated network failure".to_string()));
        }

        let line = format!("{} {}", request.method.as_str(), request.path);
        debug!("memory transport: {}", line);
        state.journal.push(line);

        let segments: Vec<&str> = request.path.split('/').filter(|s| !s.is_empty()).collect();
        match (request.method, segments.as_slice()) {
            (Method::Get, [resource]) => Ok(list(&state, resource, &request)),
            (Method::Get, [resource, document_id]) => {
                let record = find(&state, resource, document_id)
                    .ok_or_else(|| not_found(resource, document_id))?;
                Ok(json!({ "data": record, "meta": {} }))
            }
            (Method::Post, [resource]) => {
                let fields = payload(&request)?;
                let record = insert_record(&mut state, resource, fields);
                Ok(json!({ "data": record, "meta": {} }))
            }
            (Method::Put, [resource, document_id]) => {
                let fields = payload(&request)?;
                let record = state
                    .collections
                    .get_mut(*resource)
                    .and_then(|records| {
                        records.iter_mut().find(|r| {
                            r.get("documentId").and_then(Value::as_str) == Some(*document_id)
                        })
                    })
                    .ok_or_else(|| not_found(resource, document_id))?;
                for (key, value) in fields {
                    if !PROTECTED_KEYS.contains(&key.as_str()) {
                        record.insert(key, value);
                    }
                }
                record.insert("updatedAt".to_string(), json!(now()));
                Ok(json!({ "data": record.clone(), "meta": {} }))
            }
            (Method::Delete, [resource, document_id]) => {
                let records = state
                    .collections
                    .get_mut(*resource)
                    .ok_or_else(|| not_found(resource, document_id))?;
                let before = records.len();
                records.retain(|r| r.get("documentId").and_then(Value::as_str) != Some(*document_id));
                if records.len() == before {
                    return Err(not_found(resource, document_id));
                }
                Ok(Value::Null)
            }
            _ => Err(ContentError::Backend {
                status: 405,
                message: format!("Method Not Allowed: {} {}", request.method.as_str(), request.path),
            }),
        }
    }

    fn name(&self) -> &str {
        "memory"
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn insert_record(
    state: &mut MemoryState,
    resource: &str,
    fields: Map<String, Value>,
) -> Map<String, Value> {
    state.next_id += 1;
    let stamp = now();

    let mut record = Map::new();
    record.insert("id".to_string(), json!(state.next_id));
    record.insert("documentId".to_string(), json!(Uuid::new_v4().simple().to_string()));
    for (key, value) in fields {
        if !PROTECTED_KEYS.contains(&key.as_str()) {
            record.insert(key, value);
        }
    }
    record.insert("createdAt".to_string(), json!(stamp));
    record.insert("updatedAt".to_string(), json!(stamp));
    record.insert("publishedAt".to_string(), json!(stamp));

    state
        .collections
        .entry(resource.to_string())
        .or_default()
        .push(record.clone());
    record
}

fn list(state: &MemoryState, resource: &str, request: &ApiRequest) -> Value {
    let records = state.collections.get(resource).map(Vec::as_slice).unwrap_or(&[]);

    let page = request
        .query_value("pagination[page]")
        .and_then(|p| p.parse::<usize>().ok())
        .filter(|p| *p > 0)
        .unwrap_or(1);
    let page_size = request
        .query_value("pagination[pageSize]")
        .and_then(|p| p.parse::<usize>().ok())
        .filter(|p| *p > 0)
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .min(MAX_PAGE_SIZE);

    let total = records.len();
    let page_count = total.div_ceil(page_size);
    let data: Vec<Value> = records
        .iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .cloned()
        .map(Value::Object)
        .collect();

    json!({
        "data": data,
        "meta": {
            "pagination": {
                "page": page,
                "pageSize": page_size,
                "pageCount": page_count,
                "total": total,
            }
        }
    })
}

fn find(state: &MemoryState, resource: &str, document_id: &str) -> Option<Map<String, Value>> {
    state
        .collections
        .get(resource)?
        .iter()
        .find(|r| r.get("documentId").and_then(Value::as_str) == Some(document_id))
        .cloned()
}

fn payload(request: &ApiRequest) -> Result<Map<String, Value>, ContentError> {
    request
        .body
        .as_ref()
        .and_then(|body| body.get("data"))
        .and_then(Value::as_object)
        .cloned()
        .ok_or_else(|| ContentError::Backend {
            status: 400,
            message: "Missing \"data\" payload in the request body".to_string(),
        })
}

fn not_found(resource: &str, document_id: &str) -> ContentError {
    ContentError::Backend {
        status: 404,
        message: format!("Not Found: {}/{}", resource, document_id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_assigns_identity() {
        let backend = MemoryTransport::new();
        let body = json!({ "data": { "titre": "Derby", "id": 99 } });
        let response = backend.send(ApiRequest::post("articles", body)).await.unwrap();

        assert_eq!(response["data"]["id"], json!(1));
        assert_eq!(response["data"]["titre"], json!("Derby"));
        assert!(response["data"]["documentId"].as_str().unwrap().len() >= 24);
        assert!(response["data"]["publishedAt"].is_string());
    }

    #[tokio::test]
    async fn test_list_paginates() {
        let backend = MemoryTransport::new();
        for i in 0..30 {
            backend.seed("matches", json!({ "titre": format!("Match {}", i) }));
        }

        let first = backend.send(ApiRequest::get("matches")).await.unwrap();
        assert_eq!(first["data"].as_array().unwrap().len(), 25);
        assert_eq!(first["meta"]["pagination"]["pageCount"], json!(2));
        assert_eq!(first["meta"]["pagination"]["total"], json!(30));

        let second = backend
            .send(ApiRequest::get("matches").with_query("pagination[page]", "2"))
            .await
            .unwrap();
        assert_eq!(second["data"].as_array().unwrap().len(), 5);
        assert_eq!(second["data"][0]["titre"], json!("Match 25"));
    }

    #[tokio::test]
    async fn test_update_merges_and_keeps_identity() {
        let backend = MemoryTransport::new();
        let seeded = backend.seed("clubs", json!({ "nom": "Raja", "capacite": 45000 }));
        let doc = seeded["documentId"].as_str().unwrap().to_string();

        let body = json!({ "data": { "capacite": 67000, "documentId": "hijack" } });
        let response = backend
            .send(ApiRequest::put(format!("clubs/{}", doc), body))
            .await
            .unwrap();

        assert_eq!(response["data"]["nom"], json!("Raja"));
        assert_eq!(response["data"]["capacite"], json!(67000));
        assert_eq!(response["data"]["documentId"], json!(doc));
    }

    #[tokio::test]
    async fn test_unknown_document_is_404() {
        let backend = MemoryTransport::new();
        let err = backend.send(ApiRequest::delete("clubs/nope")).await.unwrap_err();
        assert!(matches!(err, ContentError::Backend { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_write_without_envelope_is_400() {
        let backend = MemoryTransport::new();
        let err = backend
            .send(ApiRequest::post("clubs", json!({ "nom": "Raja" })))
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::Backend { status: 400, .. }));
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let backend = MemoryTransport::new();
        backend.fail_next(1);
        assert!(backend.send(ApiRequest::get("clubs")).await.unwrap_err().is_transport());
        assert!(backend.send(ApiRequest::get("clubs")).await.is_ok());

        backend.set_offline(true);
        assert!(backend.send(ApiRequest::get("clubs")).await.is_err());
        assert_eq!(backend.journal(), vec!["GET clubs".to_string()]);
    }

    #[test]
    fn test_seed_can_backdate() {
        let backend = MemoryTransport::new();
        let record = backend.seed(
            "articles",
            json!({ "titre": "Ancien", "publishedAt": "2024-01-15T10:00:00.000Z" }),
        );
        assert_eq!(record["publishedAt"], json!("2024-01-15T10:00:00.000Z"));
        assert_eq!(
            backend.records("articles")[0]["publishedAt"],
            json!("2024-01-15T10:00:00.000Z")
        );
    }
}
