// svckit/src/form.rs
//
// Entity editor form: controlled bindings over a kind's editable fields,
// submitted as create or update depending on whether a record is bound.

use tracing::debug;

use crate::client::{ContentClient, Patch};
use crate::errors::ContentError;
use crate::resource::{FieldSpec, FormFields, Resource};

#[derive(Debug, Clone, PartialEq)]
pub enum Submission<R> {
    Saved(R),
    Failed,
    /// A required field is blank; nothing was sent.
    Incomplete(&'static str),
}

impl<R> Submission<R> {
    pub fn is_saved(&self) -> bool {
        matches!(self, Submission::Saved(_))
    }
}

#[derive(Debug, Clone)]
pub struct EditorForm<R: Resource> {
    bound: Option<String>,
    fields: R::Fields,
    submitting: bool,
}

impl<R: Resource> EditorForm<R> {
    /// Empty defaults, submits as create.
    pub fn create() -> Self {
        Self {
            bound: None,
            fields: R::Fields::default(),
            submitting: false,
        }
    }

    /// Seeded from `record`, submits as update against its document id.
    pub fn edit(record: &R) -> Self {
        Self {
            bound: Some(record.document_id().to_string()),
            fields: record.fields(),
            submitting: false,
        }
    }

    pub fn specs(&self) -> &'static [FieldSpec] {
        R::Fields::SPECS
    }

    pub fn bound(&self) -> Option<&str> {
        self.bound.as_deref()
    }

    pub fn is_editing(&self) -> bool {
        self.bound.is_some()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn fields(&self) -> &R::Fields {
        &self.fields
    }

    pub fn value(&self, name: &str) -> String {
        self.fields.value(name).unwrap_or_default()
    }

    pub fn set(&mut self, name: &str, input: &str) -> Result<(), ContentError> {
        self.fields.set_value(name, input)
    }

    pub fn title(&self) -> &'static str {
        if self.is_editing() {
            R::WORDING.edit_title
        } else {
            R::WORDING.new_title
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.submitting {
            "Envoi en cours..."
        } else if self.is_editing() {
            "Mettre à jour"
        } else {
            R::WORDING.create_label
        }
    }

    pub async fn submit(&mut self, client: &ContentClient) -> Submission<R> {
        if let Some(field) = self.fields.missing_required() {
            debug!("{} form incomplete: {} is required", R::PATH, field.name);
            return Submission::Incomplete(field.label);
        }

        self.submitting = true;
        let saved = match self.bound.as_deref() {
            Some(document_id) => match Patch::from_fields(&self.fields) {
                Ok(patch) => client.update::<R>(document_id, &patch).await,
                Err(e) => {
                    debug!("{} form could not be encoded: {}", R::PATH, e);
                    client.notices().failure(R::WORDING.update_action);
                    None
                }
            },
            None => client.create::<R>(&self.fields).await,
        };
        self.submitting = false;

        match saved {
            Some(record) => Submission::Saved(record),
            None => Submission::Failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryTransport;
    use crate::notify::NoticeBoard;
    use crate::types::{Article, Club, Match, MatchStatus};
    use serde_json::json;
    use std::sync::Arc;

    fn setup() -> (Arc<MemoryTransport>, ContentClient) {
        let backend = Arc::new(MemoryTransport::new());
        let client = ContentClient::new(backend.clone(), NoticeBoard::default(), "http://localhost:1337");
        (backend, client)
    }

    #[test]
    fn test_create_form_starts_empty() {
        let form = EditorForm::<Club>::create();
        assert!(!form.is_editing());
        assert_eq!(form.value("nom"), "");
        assert_eq!(form.value("capacite"), "0");
        assert_eq!(form.title(), "Nouveau club");
        assert_eq!(form.submit_label(), "Créer le club");
    }

    #[tokio::test]
    async fn test_edit_form_is_seeded_and_updates() {
        let (backend, client) = setup();
        let seeded = backend.seed("matches", json!({
            "titre": "Raja - Wydad",
            "contenu": "Derby",
            "dateMatch": "2025-04-12T19:30:00.000Z",
            "statut": "a_venir",
            "stade": "Stade Mohammed V",
            "arbitre": "R. Jiyed",
            "resume": "-"
        }));
        let record: Match = serde_json::from_value(seeded).unwrap();

        let mut form = EditorForm::edit(&record);
        assert_eq!(form.title(), "Modifier le match");
        assert_eq!(form.value("dateMatch"), "2025-04-12T19:30");
        assert_eq!(form.value("statut"), "a_venir");

        form.set("statut", "termine").unwrap();
        match form.submit(&client).await {
            Submission::Saved(saved) => {
                assert_eq!(saved.document_id, record.document_id);
                assert_eq!(saved.status, MatchStatus::Finished);
            }
            other => panic!("expected saved, got {:?}", other),
        }
        assert!(!form.is_submitting());
        assert_eq!(backend.records("matches").len(), 1);
    }

    #[tokio::test]
    async fn test_required_fields_block_submission() {
        let (backend, client) = setup();
        let mut form = EditorForm::<Article>::create();
        form.set("contenu", "Sans titre").unwrap();

        assert_eq!(form.submit(&client).await, Submission::Incomplete("Titre"));
        assert!(backend.journal().is_empty());
        assert!(client.notices().is_empty());
    }

    #[tokio::test]
    async fn test_failed_submission_clears_submitting() {
        let (backend, client) = setup();
        backend.set_offline(true);

        let mut form = EditorForm::<Article>::create();
        form.set("titre", "Derby").unwrap();
        form.set("contenu", "Compte rendu").unwrap();

        assert_eq!(form.submit(&client).await, Submission::Failed);
        assert!(!form.is_submitting());
        assert_eq!(form.value("titre"), "Derby");
        assert_eq!(
            client.notices().latest().unwrap().message,
            "Erreur lors de la création de l'article. Veuillez réessayer."
        );
    }
}
