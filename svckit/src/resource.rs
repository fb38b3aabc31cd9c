// svckit/src/resource.rs
//
// Record-kind descriptor. Each kind (article, club, competition, match)
// supplies its resource path, wording, searchable fields, table columns and
// editable field set as data; the client and views are generic over it.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::ContentError;

/// French strings shown for a record kind.
#[derive(Debug, Clone, Copy)]
pub struct Wording {
    /// Tab / card title, e.g. "Clubs".
    pub title: &'static str,
    pub description: &'static str,
    pub fetch_action: &'static str,
    pub create_action: &'static str,
    pub update_action: &'static str,
    pub delete_action: &'static str,
    pub created: &'static str,
    pub updated: &'static str,
    pub deleted: &'static str,
    pub confirm_delete: &'static str,
    pub empty: &'static str,
    pub no_match: &'static str,
    pub loading: &'static str,
    pub search_placeholder: &'static str,
    pub new_title: &'static str,
    pub edit_title: &'static str,
    pub create_label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    LongText,
    Number,
    Date,
    DateTime,
    /// `(wire value, label)` pairs.
    Choice(&'static [(&'static str, &'static str)]),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self { name, label, kind: FieldKind::Text, required: true }
    }

    pub const fn of(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { name, label, kind, required: true }
    }
}

/// Editable attributes of a record kind, bound field-by-field to an editor.
pub trait FormFields: Default + Clone + fmt::Debug + Serialize + Send + Sync + 'static {
    const SPECS: &'static [FieldSpec];

    /// Current value of `name` as editor text.
    fn value(&self, name: &str) -> Option<String>;

    /// Controlled binding: applies editor text to `name`. Number fields
    /// coerce the text; empty input becomes 0.
    fn set_value(&mut self, name: &str, input: &str) -> Result<(), ContentError>;

    /// First required field left blank, if any.
    fn missing_required(&self) -> Option<&'static FieldSpec> {
        Self::SPECS.iter().find(|field| {
            field.required
                && self
                    .value(field.name)
                    .map(|v| v.trim().is_empty())
                    .unwrap_or(true)
        })
    }
}

pub trait Resource: DeserializeOwned + Serialize + Clone + fmt::Debug + Send + Sync + 'static {
    type Fields: FormFields;

    /// Pluralized resource path, e.g. `clubs`.
    const PATH: &'static str;
    /// Relation to embed on reads (`populate=logo`).
    const POPULATE: Option<&'static str> = None;
    const COLUMNS: &'static [&'static str];
    const WORDING: Wording;

    fn document_id(&self) -> &str;

    /// Designated searchable text fields.
    fn searchable(&self) -> Vec<&str>;

    /// Seed values for an editor bound to this record.
    fn fields(&self) -> Self::Fields;

    /// Table cells, one per `COLUMNS` entry. `origin` resolves relative
    /// media URLs.
    fn row(&self, origin: &str) -> Vec<String>;
}

pub(crate) fn parse_number(name: &str, input: &str) -> Result<u32, ContentError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse::<u32>()
        .map_err(|_| ContentError::Validation(format!("{} must be a non-negative integer, got {:?}", name, input)))
}

pub(crate) fn unknown_field(name: &str) -> ContentError {
    ContentError::Validation(format!("unknown field {:?}", name))
}
