// svckit/src/view.rs
//
// List view and aggregate view state, one instance per record kind. Each
// view owns its own copy of the collection and re-fetches it after every
// successful mutation.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::aggregate::{Aggregate, Chart, NO_DATA};
use crate::client::ContentClient;
use crate::filter::filter_records;
use crate::form::{EditorForm, Submission};
use crate::resource::Resource;

pub const DELETE_CANCELLED: &str = "Suppression annulée";

/// Identifies one fetch. Only the most recently issued ticket of a mounted
/// view may apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

#[derive(Debug, Clone)]
struct FetchGuard {
    generation: u64,
    mounted: bool,
}

impl FetchGuard {
    fn new() -> Self {
        Self { generation: 0, mounted: true }
    }

    fn issue(&mut self) -> FetchTicket {
        self.generation += 1;
        FetchTicket(self.generation)
    }

    fn accepts(&self, ticket: FetchTicket) -> bool {
        self.mounted && ticket.0 == self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Failed,
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct ListView<R: Resource> {
    records: Vec<R>,
    filtered: Vec<R>,
    search: String,
    loading: bool,
    editor: Option<EditorForm<R>>,
    pending_delete: Option<String>,
    guard: FetchGuard,
}

impl<R: Resource> Default for ListView<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resource> ListView<R> {
    /// A freshly mounted view is loading until its first fetch lands.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            filtered: Vec::new(),
            search: String::new(),
            loading: true,
            editor: None,
            pending_delete: None,
            guard: FetchGuard::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Fetching
    // -----------------------------------------------------------------------

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.loading = true;
        self.guard.issue()
    }

    /// Replaces the canonical collection. Returns `false` (and changes
    /// nothing) for a superseded ticket or an unmounted view.
    pub fn apply_fetch(&mut self, ticket: FetchTicket, records: Vec<R>) -> bool {
        if !self.guard.accepts(ticket) {
            debug!("{} list: dropping stale fetch {:?}", R::PATH, ticket);
            return false;
        }
        self.records = records;
        self.filtered = filter_records(&self.records, &self.search);
        self.loading = false;
        true
    }

    pub async fn refresh(&mut self, client: &ContentClient) -> bool {
        let ticket = self.begin_fetch();
        let records = client.list::<R>().await;
        self.apply_fetch(ticket, records)
    }

    pub fn unmount(&mut self) {
        self.guard.mounted = false;
    }

    pub fn is_mounted(&self) -> bool {
        self.guard.mounted
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    // -----------------------------------------------------------------------
    // Collection and search
    // -----------------------------------------------------------------------

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn filtered(&self) -> &[R] {
        &self.filtered
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search = term.into();
        self.filtered = filter_records(&self.records, &self.search);
    }

    fn find(&self, document_id: &str) -> Option<&R> {
        self.records.iter().find(|r| r.document_id() == document_id)
    }

    /// Distinguishes an empty collection from a search without hits.
    pub fn empty_message(&self) -> Option<&'static str> {
        if self.loading || !self.filtered.is_empty() {
            None
        } else if self.records.is_empty() {
            Some(R::WORDING.empty)
        } else {
            Some(R::WORDING.no_match)
        }
    }

    pub fn loading_message(&self) -> Option<&'static str> {
        self.loading.then_some(R::WORDING.loading)
    }

    // -----------------------------------------------------------------------
    // Editor
    // -----------------------------------------------------------------------

    pub fn open_create(&mut self) {
        self.editor = Some(EditorForm::create());
    }

    pub fn open_edit(&mut self, document_id: &str) -> bool {
        match self.find(document_id).map(EditorForm::edit) {
            Some(form) => {
                self.editor = Some(form);
                true
            }
            None => false,
        }
    }

    pub fn close_editor(&mut self) {
        self.editor = None;
    }

    pub fn editor(&self) -> Option<&EditorForm<R>> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut EditorForm<R>> {
        self.editor.as_mut()
    }

    /// Saved closes the editor and re-fetches. Anything else keeps the
    /// editor open with its values and leaves the collection as it was.
    /// `None` when no editor is open.
    pub async fn submit_editor(&mut self, client: &ContentClient) -> Option<Submission<R>> {
        let editor = self.editor.as_mut()?;
        let outcome = editor.submit(client).await;
        if outcome.is_saved() {
            self.editor = None;
            self.refresh(client).await;
        }
        Some(outcome)
    }

    // -----------------------------------------------------------------------
    // Delete with confirmation
    // -----------------------------------------------------------------------

    /// Arms a delete and returns the confirmation prompt.
    pub fn request_delete(&mut self, document_id: &str) -> Option<&'static str> {
        self.find(document_id)?;
        self.pending_delete = Some(document_id.to_string());
        Some(R::WORDING.confirm_delete)
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    pub async fn resolve_delete(&mut self, client: &ContentClient, confirmed: bool) -> DeleteOutcome {
        let Some(document_id) = self.pending_delete.take() else {
            return DeleteOutcome::Cancelled;
        };
        if !confirmed {
            info!("{} delete of {} cancelled", R::PATH, document_id);
            client.notices().info(DELETE_CANCELLED);
            return DeleteOutcome::Cancelled;
        }
        if client.delete::<R>(&document_id).await {
            self.refresh(client).await;
            DeleteOutcome::Deleted
        } else {
            DeleteOutcome::Failed
        }
    }
}

/// Chart side of a record kind. Holds its own copy of the collection, so it
/// can lag the list view until both have re-fetched.
#[derive(Debug, Clone)]
pub struct AggregateView<R: Aggregate> {
    records: Vec<R>,
    loading: bool,
    guard: FetchGuard,
}

impl<R: Aggregate> Default for AggregateView<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Aggregate> AggregateView<R> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            loading: true,
            guard: FetchGuard::new(),
        }
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.loading = true;
        self.guard.issue()
    }

    pub fn apply_fetch(&mut self, ticket: FetchTicket, records: Vec<R>) -> bool {
        if !self.guard.accepts(ticket) {
            debug!("{} chart: dropping stale fetch {:?}", R::PATH, ticket);
            return false;
        }
        self.records = records;
        self.loading = false;
        true
    }

    pub async fn refresh(&mut self, client: &ContentClient) -> bool {
        let ticket = self.begin_fetch();
        let records = client.list::<R>().await;
        self.apply_fetch(ticket, records)
    }

    pub fn unmount(&mut self) {
        self.guard.mounted = false;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn chart(&self, today: NaiveDate) -> Chart {
        R::summarize(&self.records, today)
    }

    /// Shown instead of a chart without any point. Zero-valued points
    /// (an empty month, a club without capacity) are still drawn.
    pub fn placeholder(&self, chart: &Chart) -> Option<&'static str> {
        chart.is_empty().then_some(NO_DATA)
    }
}
