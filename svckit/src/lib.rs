// svckit/src/lib.rs
//
// Shared toolkit for the sports admin dashboard: typed content client over
// a pluggable transport, record-kind descriptors, list/editor/aggregate view
// state and French display helpers.

pub mod aggregate;
pub mod backend;
pub mod client;
pub mod config;
pub mod display;
pub mod errors;
pub mod filter;
pub mod form;
pub mod kinds;
pub mod notify;
pub mod resource;
pub mod types;
pub mod view;

pub use aggregate::{Aggregate, Chart, ChartPoint, ChartStyle};
pub use backend::{HttpTransport, MemoryTransport, Transport};
pub use client::{ContentClient, Patch};
pub use config::{load_config, AdminConfig};
pub use errors::ContentError;
pub use form::{EditorForm, Submission};
pub use notify::{Notice, NoticeBoard, NoticeLevel};
pub use resource::{FieldKind, FieldSpec, FormFields, Resource, Wording};
pub use types::{Article, Club, Competition, CompetitionLevel, Match, MatchStatus};
pub use view::{AggregateView, DeleteOutcome, FetchTicket, ListView};
