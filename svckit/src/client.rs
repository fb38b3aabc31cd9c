// svckit/src/client.rs
//
// Typed content client. Translates list/create/update/delete for any record
// kind into transport requests, decodes the backend envelopes and turns
// outcomes into user-facing notices.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, error, info};

use crate::backend::{ApiRequest, HttpTransport, Transport};
use crate::config::AdminConfig;
use crate::display::resolve_media_url;
use crate::errors::ContentError;
use crate::notify::NoticeBoard;
use crate::resource::Resource;
use crate::types::{Envelope, ListEnvelope, Pagination, WriteEnvelope};

#[derive(Debug, Clone)]
pub struct ListPage<R> {
    pub records: Vec<R>,
    pub pagination: Pagination,
}

/// Partial update payload: only the keys set here are sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch(Map<String, Value>);

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every field of `fields`.
    pub fn from_fields<F: Serialize>(fields: &F) -> Result<Self, ContentError> {
        match serde_json::to_value(fields)? {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ContentError::Validation(format!(
                "field set must serialize to an object, got {}",
                other
            ))),
        }
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Serialize) -> Result<Self, ContentError> {
        self.0.insert(key.into(), serde_json::to_value(value)?);
        Ok(self)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_body(self) -> Value {
        serde_json::json!({ "data": Value::Object(self.0) })
    }
}

#[derive(Clone)]
pub struct ContentClient {
    transport: Arc<dyn Transport>,
    notices: NoticeBoard,
    origin: String,
    fetch_all_pages: bool,
}

impl ContentClient {
    pub fn new(transport: Arc<dyn Transport>, notices: NoticeBoard, origin: impl Into<String>) -> Self {
        Self {
            transport,
            notices,
            origin: origin.into().trim_end_matches('/').to_string(),
            fetch_all_pages: false,
        }
    }

    /// HTTP client against the configured backend.
    pub fn from_config(config: &AdminConfig, notices: NoticeBoard) -> Result<Self, ContentError> {
        let transport = HttpTransport::new(&config.backend)?;
        info!("Content client targeting {}", transport.api_root());
        Ok(Self::new(Arc::new(transport), notices, config.backend.origin())
            .with_fetch_all_pages(config.dashboard.fetch_all_pages))
    }

    pub fn with_fetch_all_pages(mut self, enabled: bool) -> Self {
        self.fetch_all_pages = enabled;
        self
    }

    pub fn fetches_all_pages(&self) -> bool {
        self.fetch_all_pages
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn transport_name(&self) -> &str {
        self.transport.name()
    }

    pub fn asset_url(&self, url: &str) -> String {
        resolve_media_url(&self.origin, url)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// One page of `R`, without notices.
    pub async fn list_page<R: Resource>(&self, page: u32) -> Result<ListPage<R>, ContentError> {
        let mut request = ApiRequest::get(R::PATH);
        if let Some(relation) = R::POPULATE {
            request = request.with_query("populate", relation);
        }
        if page > 1 {
            request = request.with_query("pagination[page]", page.to_string());
        }

        let body = self.transport.send(request).await?;
        let envelope: ListEnvelope<R> = serde_json::from_value(body)?;
        Ok(ListPage {
            records: envelope.data,
            pagination: envelope.meta.pagination,
        })
    }

    /// First page, or every page when page walking is enabled.
    pub async fn try_list<R: Resource>(&self) -> Result<Vec<R>, ContentError> {
        let first = self.list_page::<R>(1).await?;
        let mut records = first.records;
        if self.fetch_all_pages {
            for page in 2..=first.pagination.page_count {
                records.extend(self.list_page::<R>(page).await?.records);
            }
        }
        debug!("fetched {} {}", records.len(), R::PATH);
        Ok(records)
    }

    /// Failures are reported to the user and yield an empty collection, so
    /// an empty result is ambiguous between "nothing there" and "failed".
    pub async fn list<R: Resource>(&self) -> Vec<R> {
        match self.try_list::<R>().await {
            Ok(records) => records,
            Err(e) => {
                self.report(R::WORDING.fetch_action, &e);
                Vec::new()
            }
        }
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    pub async fn try_create<R: Resource>(&self, fields: &R::Fields) -> Result<R, ContentError> {
        let body = serde_json::to_value(WriteEnvelope { data: fields })?;
        let response = self.transport.send(ApiRequest::post(R::PATH, body)).await?;
        let envelope: Envelope<R> = serde_json::from_value(response)?;
        Ok(envelope.data)
    }

    pub async fn create<R: Resource>(&self, fields: &R::Fields) -> Option<R> {
        match self.try_create::<R>(fields).await {
            Ok(record) => {
                info!("created {}/{}", R::PATH, record.document_id());
                self.notices.success(R::WORDING.created);
                Some(record)
            }
            Err(e) => {
                self.report(R::WORDING.create_action, &e);
                None
            }
        }
    }

    pub async fn try_update<R: Resource>(&self, document_id: &str, patch: &Patch) -> Result<R, ContentError> {
        let path = format!("{}/{}", R::PATH, document_id);
        let response = self
            .transport
            .send(ApiRequest::put(path, patch.clone().into_body()))
            .await?;
        let envelope: Envelope<R> = serde_json::from_value(response)?;
        Ok(envelope.data)
    }

    pub async fn update<R: Resource>(&self, document_id: &str, patch: &Patch) -> Option<R> {
        match self.try_update::<R>(document_id, patch).await {
            Ok(record) => {
                info!("updated {}/{}", R::PATH, document_id);
                self.notices.success(R::WORDING.updated);
                Some(record)
            }
            Err(e) => {
                self.report(R::WORDING.update_action, &e);
                None
            }
        }
    }

    /// Fire-and-forget: `true` when the backend accepted the request. Does
    /// not check that the record is gone.
    pub async fn delete<R: Resource>(&self, document_id: &str) -> bool {
        let path = format!("{}/{}", R::PATH, document_id);
        match self.transport.send(ApiRequest::delete(path)).await {
            Ok(_) => {
                info!("deleted {}/{}", R::PATH, document_id);
                self.notices.success(R::WORDING.deleted);
                true
            }
            Err(e) => {
                self.report(R::WORDING.delete_action, &e);
                false
            }
        }
    }

    fn report(&self, action: &str, err: &ContentError) {
        error!("Erreur lors {}: {}", action, err);
        self.notices.failure(action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryTransport;
    use crate::notify::NoticeLevel;
    use crate::types::{Club, ClubFields, Match, MatchStatus};
    use serde_json::json;

    fn setup() -> (Arc<MemoryTransport>, ContentClient) {
        let backend = Arc::new(MemoryTransport::new());
        let client = ContentClient::new(backend.clone(), NoticeBoard::default(), "http://localhost:1337");
        (backend, client)
    }

    #[tokio::test]
    async fn test_list_failure_reports_and_yields_empty() {
        let (backend, client) = setup();
        backend.seed("clubs", json!({ "nom": "Raja", "capacite": 45000 }));
        backend.fail_next(1);

        let clubs: Vec<Club> = client.list().await;
        assert!(clubs.is_empty());

        let notice = client.notices().latest().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(
            notice.message,
            "Erreur lors de la récupération des clubs. Veuillez réessayer."
        );
    }

    #[tokio::test]
    async fn test_list_sends_populate_for_logo_kinds() {
        let (backend, client) = setup();
        let _: Vec<Club> = client.list().await;
        let _: Vec<Match> = client.list().await;
        assert_eq!(backend.journal(), vec!["GET clubs", "GET matches"]);
        assert!(client.notices().is_empty());
    }

    #[tokio::test]
    async fn test_create_notifies_success() {
        let (_backend, client) = setup();
        let fields = ClubFields {
            name: "Raja".to_string(),
            stadium: "Stade Mohammed V".to_string(),
            capacity: 45000,
            ..Default::default()
        };

        let created: Club = client.create(&fields).await.unwrap();
        assert_eq!(created.name, "Raja");
        assert_eq!(created.capacity, 45000);
        assert!(!created.document_id.is_empty());
        assert_eq!(client.notices().latest().unwrap().message, "Club créé avec succès");
    }

    #[tokio::test]
    async fn test_update_sends_only_patched_keys() {
        let (backend, client) = setup();
        let seeded = backend.seed("matches", json!({ "titre": "Classico", "statut": "a_venir", "stade": "Bernabéu" }));
        let doc = seeded["documentId"].as_str().unwrap();

        let patch = Patch::new().set("statut", MatchStatus::Finished).unwrap();
        assert_eq!(patch.keys().collect::<Vec<_>>(), vec!["statut"]);

        let updated: Match = client.update(doc, &patch).await.unwrap();
        assert_eq!(updated.status, MatchStatus::Finished);
        assert_eq!(updated.stadium, "Bernabéu");
        assert_eq!(client.notices().latest().unwrap().message, "Match mis à jour avec succès");
    }

    #[tokio::test]
    async fn test_update_unknown_document_fails() {
        let (_backend, client) = setup();
        let patch = Patch::new().set("titre", "x").unwrap();
        let updated: Option<Match> = client.update("missing", &patch).await;
        assert!(updated.is_none());
        assert_eq!(
            client.notices().latest().unwrap().message,
            "Erreur lors de la mise à jour du match. Veuillez réessayer."
        );
    }

    #[tokio::test]
    async fn test_delete_reports_outcome() {
        let (backend, client) = setup();
        let seeded = backend.seed("clubs", json!({ "nom": "Raja" }));
        let doc = seeded["documentId"].as_str().unwrap().to_string();

        assert!(client.delete::<Club>(&doc).await);
        assert_eq!(client.notices().latest().unwrap().message, "Club supprimé avec succès");

        backend.set_offline(true);
        assert!(!client.delete::<Club>(&doc).await);
        assert_eq!(
            client.notices().latest().unwrap().message,
            "Erreur lors de la suppression du club. Veuillez réessayer."
        );
    }

    #[tokio::test]
    async fn test_page_walking() {
        let (backend, client) = setup();
        for i in 0..60 {
            backend.seed("clubs", json!({ "nom": format!("Club {}", i), "capacite": i }));
        }

        let first_page: Vec<Club> = client.list().await;
        assert_eq!(first_page.len(), 25);

        let client = client.with_fetch_all_pages(true);
        let all: Vec<Club> = client.list().await;
        assert_eq!(all.len(), 60);
        assert_eq!(all[59].name, "Club 59");
    }

    #[test]
    fn test_asset_url() {
        let (_backend, client) = setup();
        assert_eq!(
            client.asset_url("/uploads/thumbnail_raja.png"),
            "http://localhost:1337/uploads/thumbnail_raja.png"
        );
    }
}
