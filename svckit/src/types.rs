use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListEnvelope<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: ListMeta,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListMeta {
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub page_count: u32,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Request body for writes: `{ "data": { ...fields } }`.
#[derive(Debug, Serialize)]
pub struct WriteEnvelope<'a, T: Serialize> {
    pub data: &'a T,
}

// ---------------------------------------------------------------------------
// Closed enumerations with verbatim passthrough
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MatchStatus {
    Upcoming,
    InProgress,
    Finished,
    Postponed,
    Cancelled,
    Other(String),
}

impl MatchStatus {
    pub const KNOWN: [MatchStatus; 5] = [
        MatchStatus::Upcoming,
        MatchStatus::InProgress,
        MatchStatus::Finished,
        MatchStatus::Postponed,
        MatchStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            MatchStatus::Upcoming => "a_venir",
            MatchStatus::InProgress => "en_cours",
            MatchStatus::Finished => "termine",
            MatchStatus::Postponed => "reporte",
            MatchStatus::Cancelled => "annule",
            MatchStatus::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            MatchStatus::Upcoming => "À venir",
            MatchStatus::InProgress => "En cours",
            MatchStatus::Finished => "Terminé",
            MatchStatus::Postponed => "Reporté",
            MatchStatus::Cancelled => "Annulé",
            MatchStatus::Other(raw) => raw,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            MatchStatus::Upcoming => "#1A78E2",
            MatchStatus::InProgress => "#4CAF50",
            MatchStatus::Finished => "#6C757D",
            MatchStatus::Postponed => "#FF9800",
            MatchStatus::Cancelled => "#E63946",
            MatchStatus::Other(_) => "#999999",
        }
    }
}

impl Default for MatchStatus {
    fn default() -> Self {
        MatchStatus::Upcoming
    }
}

impl From<String> for MatchStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "a_venir" => MatchStatus::Upcoming,
            "en_cours" => MatchStatus::InProgress,
            "termine" => MatchStatus::Finished,
            "reporte" => MatchStatus::Postponed,
            "annule" => MatchStatus::Cancelled,
            _ => MatchStatus::Other(raw),
        }
    }
}

impl From<MatchStatus> for String {
    fn from(status: MatchStatus) -> Self {
        status.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CompetitionLevel {
    National,
    Continental,
    International,
    Other(String),
}

impl CompetitionLevel {
    pub fn as_str(&self) -> &str {
        match self {
            CompetitionLevel::National => "national",
            CompetitionLevel::Continental => "continental",
            CompetitionLevel::International => "international",
            CompetitionLevel::Other(raw) => raw,
        }
    }

    /// Raw value with its first character upper-cased.
    pub fn label(&self) -> String {
        let raw = self.as_str();
        let mut chars = raw.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl Default for CompetitionLevel {
    fn default() -> Self {
        CompetitionLevel::National
    }
}

impl From<String> for CompetitionLevel {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "national" => CompetitionLevel::National,
            "continental" => CompetitionLevel::Continental,
            "international" => CompetitionLevel::International,
            _ => CompetitionLevel::Other(raw),
        }
    }
}

impl From<CompetitionLevel> for String {
    fn from(level: CompetitionLevel) -> Self {
        level.as_str().to_string()
    }
}

// ---------------------------------------------------------------------------
// Media
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
    pub url: String,
    #[serde(default)]
    pub formats: Option<MediaFormats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaFormats {
    #[serde(default)]
    pub thumbnail: Option<MediaFormat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaFormat {
    pub url: String,
}

impl Media {
    pub fn thumbnail_url(&self) -> Option<&str> {
        self.formats
            .as_ref()
            .and_then(|formats| formats.thumbnail.as_ref())
            .map(|thumb| thumb.url.as_str())
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: u64,
    pub document_id: String,
    #[serde(rename = "titre", default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(rename = "contenu", default, deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Club {
    pub id: u64,
    pub document_id: String,
    #[serde(rename = "nom", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "fondation", default, deserialize_with = "null_as_default")]
    pub founded: String,
    #[serde(rename = "stade", default, deserialize_with = "null_as_default")]
    pub stadium: String,
    #[serde(rename = "capacite", default, deserialize_with = "null_as_default")]
    pub capacity: u32,
    #[serde(rename = "siteWeb", default, deserialize_with = "null_as_default")]
    pub website: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(rename = "entraineur", default, deserialize_with = "null_as_default")]
    pub coach: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub president: String,
    #[serde(default)]
    pub logo: Option<Media>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competition {
    pub id: u64,
    pub document_id: String,
    #[serde(rename = "nom", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "saison", default, deserialize_with = "null_as_default")]
    pub season: String,
    #[serde(rename = "pays", default, deserialize_with = "null_as_default")]
    pub country: String,
    #[serde(rename = "niveau", default, deserialize_with = "null_as_default")]
    pub level: CompetitionLevel,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(rename = "dateDebut", default, deserialize_with = "null_as_default")]
    pub start_date: String,
    #[serde(rename = "dateFin", default, deserialize_with = "null_as_default")]
    pub end_date: String,
    #[serde(default)]
    pub logo: Option<Media>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: u64,
    pub document_id: String,
    #[serde(rename = "titre", default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(rename = "contenu", default, deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(rename = "dateMatch", default, deserialize_with = "lenient_timestamp")]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(rename = "statut", default, deserialize_with = "null_as_default")]
    pub status: MatchStatus,
    #[serde(rename = "stade", default, deserialize_with = "null_as_default")]
    pub stadium: String,
    #[serde(rename = "arbitre", default, deserialize_with = "null_as_default")]
    pub referee: String,
    #[serde(rename = "resume", default, deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub published_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Editable field sets (what create/update send)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleFields {
    #[serde(rename = "titre")]
    pub title: String,
    #[serde(rename = "contenu")]
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClubFields {
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "fondation")]
    pub founded: String,
    #[serde(rename = "stade")]
    pub stadium: String,
    #[serde(rename = "capacite")]
    pub capacity: u32,
    #[serde(rename = "siteWeb")]
    pub website: String,
    pub description: String,
    #[serde(rename = "entraineur")]
    pub coach: String,
    pub president: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompetitionFields {
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "saison")]
    pub season: String,
    #[serde(rename = "pays")]
    pub country: String,
    #[serde(rename = "niveau")]
    pub level: CompetitionLevel,
    pub description: String,
    #[serde(rename = "dateDebut")]
    pub start_date: String,
    #[serde(rename = "dateFin")]
    pub end_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchFields {
    #[serde(rename = "titre")]
    pub title: String,
    #[serde(rename = "contenu")]
    pub body: String,
    /// `YYYY-MM-DDTHH:MM`, as typed into the editor.
    #[serde(rename = "dateMatch")]
    pub scheduled_at: String,
    #[serde(rename = "statut")]
    pub status: MatchStatus,
    #[serde(rename = "stade")]
    pub stadium: String,
    #[serde(rename = "arbitre")]
    pub referee: String,
    #[serde(rename = "resume")]
    pub summary: String,
}

// ---------------------------------------------------------------------------
// Lenient decoding helpers
// ---------------------------------------------------------------------------

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts RFC 3339 as well as the naive `YYYY-MM-DDTHH:MM[:SS]` form the
/// editor produces. Anything else decodes as `None` instead of failing the
/// whole envelope.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
