// services/admin-dash/src/state.rs
//
// Dashboard state: one panel per record kind, each pairing a list view with
// an independently fetched chart view, plus keyboard handling.

use chrono::{NaiveDate, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::runtime::Runtime;
use tracing::{debug, info};

use svckit::aggregate::{Aggregate, Chart};
use svckit::view::{AggregateView, ListView};
use svckit::{
    Article, Club, Competition, ContentClient, DeleteOutcome, FieldKind, FieldSpec, Match, Resource,
    Submission,
};

/// One editable field as the editor modal shows it.
#[derive(Debug, Clone)]
pub struct FieldLine {
    pub label: &'static str,
    pub value: String,
    pub kind: FieldKind,
    pub required: bool,
    pub focused: bool,
}

#[derive(Debug, Clone)]
pub struct EditorSnapshot {
    pub title: &'static str,
    pub submit_label: &'static str,
    pub fields: Vec<FieldLine>,
    pub hint: Option<String>,
}

/// Object-safe face of a record-kind panel, so the tabs can live in one list.
pub trait Panel {
    fn title(&self) -> &'static str;
    fn search_placeholder(&self) -> &'static str;
    fn columns(&self) -> &'static [&'static str];

    fn refresh(&mut self, rt: &Runtime, client: &ContentClient);
    fn unmount(&mut self);

    fn search(&self) -> &str;
    fn set_search(&mut self, term: String);

    fn rows(&self, origin: &str) -> Vec<Vec<String>>;
    fn selected(&self) -> Option<usize>;
    fn select_next(&mut self);
    fn select_prev(&mut self);
    /// Loading or empty-state message replacing the table body.
    fn status_line(&self) -> Option<&'static str>;

    fn chart(&self, today: NaiveDate) -> Chart;
    fn chart_placeholder(&self, chart: &Chart) -> Option<&'static str>;

    fn open_create(&mut self);
    fn open_edit_selected(&mut self) -> bool;
    fn editor(&self) -> Option<EditorSnapshot>;
    fn close_editor(&mut self);
    fn focus_next(&mut self);
    fn focus_prev(&mut self);
    fn type_char(&mut self, c: char);
    fn backspace(&mut self);
    fn cycle_choice(&mut self, forward: bool);
    fn submit(&mut self, rt: &Runtime, client: &ContentClient);

    fn request_delete_selected(&mut self) -> Option<&'static str>;
    fn delete_prompt(&self) -> Option<&'static str>;
    fn resolve_delete(&mut self, rt: &Runtime, client: &ContentClient, confirmed: bool);
}

pub struct KindPanel<R: Aggregate> {
    list: ListView<R>,
    chart: AggregateView<R>,
    selected: usize,
    focus: usize,
    hint: Option<String>,
    prompt: Option<&'static str>,
}

impl<R: Aggregate> KindPanel<R> {
    pub fn new() -> Self {
        Self {
            list: ListView::new(),
            chart: AggregateView::new(),
            selected: 0,
            focus: 0,
            hint: None,
            prompt: None,
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.list.filtered().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    fn selected_document(&self) -> Option<String> {
        self.list
            .filtered()
            .get(self.selected)
            .map(|r| r.document_id().to_string())
    }

    fn focused_field(&self) -> Option<&'static FieldSpec> {
        self.list.editor().and_then(|e| e.specs().get(self.focus))
    }

    /// Applies `input` to the focused field. Rejected input (a non-numeric
    /// capacity, say) leaves the previous value in place.
    fn apply_input(&mut self, input: String) {
        let Some(field) = self.focused_field() else {
            return;
        };
        let Some(editor) = self.list.editor_mut() else {
            return;
        };
        match editor.set(field.name, &input) {
            Ok(()) => self.hint = None,
            Err(e) => {
                debug!("rejected input for {}: {}", field.name, e);
                self.hint = Some(format!("Valeur invalide pour {}", field.label));
            }
        }
    }
}

impl<R: Aggregate> Default for KindPanel<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Aggregate> Panel for KindPanel<R> {
    fn title(&self) -> &'static str {
        R::WORDING.title
    }

    fn search_placeholder(&self) -> &'static str {
        R::WORDING.search_placeholder
    }

    fn columns(&self) -> &'static [&'static str] {
        R::COLUMNS
    }

    fn refresh(&mut self, rt: &Runtime, client: &ContentClient) {
        rt.block_on(self.list.refresh(client));
        rt.block_on(self.chart.refresh(client));
        self.clamp_selection();
    }

    fn unmount(&mut self) {
        self.list.unmount();
        self.chart.unmount();
    }

    fn search(&self) -> &str {
        self.list.search()
    }

    fn set_search(&mut self, term: String) {
        self.list.set_search(term);
        self.clamp_selection();
    }

    fn rows(&self, origin: &str) -> Vec<Vec<String>> {
        self.list.filtered().iter().map(|r| r.row(origin)).collect()
    }

    fn selected(&self) -> Option<usize> {
        (!self.list.filtered().is_empty()).then_some(self.selected)
    }

    fn select_next(&mut self) {
        if self.selected + 1 < self.list.filtered().len() {
            self.selected += 1;
        }
    }

    fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn status_line(&self) -> Option<&'static str> {
        self.list.loading_message().or_else(|| self.list.empty_message())
    }

    fn chart(&self, today: NaiveDate) -> Chart {
        self.chart.chart(today)
    }

    fn chart_placeholder(&self, chart: &Chart) -> Option<&'static str> {
        self.chart.placeholder(chart)
    }

    fn open_create(&mut self) {
        self.list.open_create();
        self.focus = 0;
        self.hint = None;
    }

    fn open_edit_selected(&mut self) -> bool {
        let Some(document_id) = self.selected_document() else {
            return false;
        };
        self.focus = 0;
        self.hint = None;
        self.list.open_edit(&document_id)
    }

    fn editor(&self) -> Option<EditorSnapshot> {
        let editor = self.list.editor()?;
        let fields = editor
            .specs()
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let raw = editor.value(field.name);
                let value = match field.kind {
                    FieldKind::Choice(choices) => choices
                        .iter()
                        .find(|(wire, _)| *wire == raw)
                        .map(|(_, label)| label.to_string())
                        .unwrap_or(raw),
                    _ => raw,
                };
                FieldLine {
                    label: field.label,
                    value,
                    kind: field.kind,
                    required: field.required,
                    focused: i == self.focus,
                }
            })
            .collect();

        Some(EditorSnapshot {
            title: editor.title(),
            submit_label: editor.submit_label(),
            fields,
            hint: self.hint.clone(),
        })
    }

    fn close_editor(&mut self) {
        self.list.close_editor();
        self.hint = None;
    }

    fn focus_next(&mut self) {
        let count = self.list.editor().map(|e| e.specs().len()).unwrap_or(0);
        if count > 0 {
            self.focus = (self.focus + 1) % count;
        }
    }

    fn focus_prev(&mut self) {
        let count = self.list.editor().map(|e| e.specs().len()).unwrap_or(0);
        if count > 0 {
            self.focus = (self.focus + count - 1) % count;
        }
    }

    fn type_char(&mut self, c: char) {
        let Some(field) = self.focused_field() else {
            return;
        };
        if matches!(field.kind, FieldKind::Choice(_)) {
            return;
        }
        let Some(editor) = self.list.editor() else {
            return;
        };
        let mut input = editor.value(field.name);
        // A number field shows 0 when empty; typing replaces it.
        if field.kind == FieldKind::Number && input == "0" {
            input.clear();
        }
        input.push(c);
        self.apply_input(input);
    }

    fn backspace(&mut self) {
        let Some(field) = self.focused_field() else {
            return;
        };
        if matches!(field.kind, FieldKind::Choice(_)) {
            return;
        }
        let Some(editor) = self.list.editor() else {
            return;
        };
        let mut input = editor.value(field.name);
        input.pop();
        self.apply_input(input);
    }

    fn cycle_choice(&mut self, forward: bool) {
        let Some(field) = self.focused_field() else {
            return;
        };
        let FieldKind::Choice(choices) = field.kind else {
            return;
        };
        if choices.is_empty() {
            return;
        }
        let Some(editor) = self.list.editor() else {
            return;
        };
        let current = editor.value(field.name);
        let next = match choices.iter().position(|(wire, _)| *wire == current) {
            Some(i) if forward => (i + 1) % choices.len(),
            Some(i) => (i + choices.len() - 1) % choices.len(),
            None => 0,
        };
        self.apply_input(choices[next].0.to_string());
    }

    fn submit(&mut self, rt: &Runtime, client: &ContentClient) {
        let outcome = rt.block_on(self.list.submit_editor(client));
        match outcome {
            Some(Submission::Saved(_)) => {
                self.hint = None;
                rt.block_on(self.chart.refresh(client));
                self.clamp_selection();
            }
            Some(Submission::Incomplete(label)) => {
                self.hint = Some(format!("Champ requis : {}", label));
            }
            Some(Submission::Failed) => {
                self.hint = Some("Échec de l'enregistrement".to_string());
            }
            None => {}
        }
    }

    fn request_delete_selected(&mut self) -> Option<&'static str> {
        let document_id = self.selected_document()?;
        self.prompt = self.list.request_delete(&document_id);
        self.prompt
    }

    fn delete_prompt(&self) -> Option<&'static str> {
        self.list.pending_delete().and(self.prompt)
    }

    fn resolve_delete(&mut self, rt: &Runtime, client: &ContentClient, confirmed: bool) {
        let outcome = rt.block_on(self.list.resolve_delete(client, confirmed));
        info!("{} delete resolved: {:?}", R::PATH, outcome);
        self.prompt = None;
        if outcome == DeleteOutcome::Deleted {
            rt.block_on(self.chart.refresh(client));
        }
        self.clamp_selection();
    }
}

pub struct DashboardState {
    pub panels: Vec<Box<dyn Panel>>,
    pub active: usize,
    pub searching: bool,
    pub should_quit: bool,
    pub demo: bool,
    client: ContentClient,
    runtime: Runtime,
}

impl DashboardState {
    pub fn new(client: ContentClient, runtime: Runtime, demo: bool) -> Self {
        let panels: Vec<Box<dyn Panel>> = vec![
            Box::new(KindPanel::<Article>::new()),
            Box::new(KindPanel::<Club>::new()),
            Box::new(KindPanel::<Competition>::new()),
            Box::new(KindPanel::<Match>::new()),
        ];
        Self {
            panels,
            active: 0,
            searching: false,
            should_quit: false,
            demo,
            client,
            runtime,
        }
    }

    pub fn client(&self) -> &ContentClient {
        &self.client
    }

    pub fn panel(&self) -> &dyn Panel {
        self.panels[self.active].as_ref()
    }

    pub fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }

    /// Initial fetch for every tab.
    pub fn mount(&mut self) {
        for panel in self.panels.iter_mut() {
            panel.refresh(&self.runtime, &self.client);
        }
    }

    pub fn shutdown(&mut self) {
        for panel in self.panels.iter_mut() {
            panel.unmount();
        }
    }

    pub fn select_tab(&mut self, index: usize) {
        if index < self.panels.len() {
            self.active = index;
            self.searching = false;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        let panel = &mut self.panels[self.active];

        if panel.delete_prompt().is_some() {
            let confirmed = matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y'));
            panel.resolve_delete(&self.runtime, &self.client, confirmed);
            return;
        }

        if panel.editor().is_some() {
            match key.code {
                KeyCode::Esc => panel.close_editor(),
                KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    panel.submit(&self.runtime, &self.client)
                }
                KeyCode::Tab | KeyCode::Down | KeyCode::Enter => panel.focus_next(),
                KeyCode::BackTab | KeyCode::Up => panel.focus_prev(),
                KeyCode::Left => panel.cycle_choice(false),
                KeyCode::Right => panel.cycle_choice(true),
                KeyCode::Backspace => panel.backspace(),
                KeyCode::Char(c) => panel.type_char(c),
                _ => {}
            }
            return;
        }

        if self.searching {
            match key.code {
                KeyCode::Esc | KeyCode::Enter => self.searching = false,
                KeyCode::Backspace => {
                    let mut term = panel.search().to_string();
                    term.pop();
                    panel.set_search(term);
                }
                KeyCode::Char(c) => {
                    let mut term = panel.search().to_string();
                    term.push(c);
                    panel.set_search(term);
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('/') => self.searching = true,
            KeyCode::Up => panel.select_prev(),
            KeyCode::Down => panel.select_next(),
            KeyCode::Char('n') => panel.open_create(),
            KeyCode::Char('e') | KeyCode::Enter => {
                panel.open_edit_selected();
            }
            KeyCode::Char('d') => {
                panel.request_delete_selected();
            }
            KeyCode::Char('r') => panel.refresh(&self.runtime, &self.client),
            KeyCode::Left => {
                let count = self.panels.len();
                self.select_tab((self.active + count - 1) % count);
            }
            KeyCode::Right => self.select_tab((self.active + 1) % self.panels.len()),
            KeyCode::Char(c @ '1'..='4') => self.select_tab(c as usize - '1' as usize),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use svckit::{MemoryTransport, NoticeBoard, NoticeLevel};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(state: &mut DashboardState, text: &str) {
        for c in text.chars() {
            state.handle_key(press(KeyCode::Char(c)));
        }
    }

    fn setup() -> (Arc<MemoryTransport>, DashboardState) {
        let backend = Arc::new(MemoryTransport::new());
        let client = ContentClient::new(backend.clone(), NoticeBoard::default(), "http://localhost:1337");
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let mut state = DashboardState::new(client, runtime, true);
        state.mount();
        (backend, state)
    }

    #[test]
    fn test_tabs_and_empty_state() {
        let (_backend, mut state) = setup();
        assert_eq!(state.panel().title(), "Articles");
        assert_eq!(state.panel().status_line(), Some("Aucun article disponible"));

        state.handle_key(press(KeyCode::Right));
        assert_eq!(state.panel().title(), "Clubs");
        state.handle_key(press(KeyCode::Char('4')));
        assert_eq!(state.panel().title(), "Matches");
        state.handle_key(press(KeyCode::Left));
        assert_eq!(state.panel().title(), "Compétitions");
    }

    #[test]
    fn test_create_club_through_editor() {
        let (backend, mut state) = setup();
        state.select_tab(1);
        state.handle_key(press(KeyCode::Char('n')));
        assert_eq!(state.panel().editor().unwrap().title, "Nouveau club");

        // nom, fondation, stade, capacite, entraineur, president, siteWeb, description
        let values = [
            "Raja",
            "1949-03-20",
            "Stade Mohammed V",
            "45000",
            "R. Hmami",
            "A. Bouzoubaa",
            "https://rajaclub.ma",
            "Club casablancais",
        ];
        for value in values {
            type_text(&mut state, value);
            state.handle_key(press(KeyCode::Tab));
        }
        state.handle_key(ctrl('s'));

        assert!(state.panel().editor().is_none());
        assert_eq!(backend.records("clubs").len(), 1);
        let rows = state.panel().rows("http://localhost:1337");
        assert_eq!(rows[0], vec!["RA", "Raja", "Stade Mohammed V", "45 000"]);

        let chart = state.panel().chart(state.today());
        assert_eq!(chart.points[0].label, "Raja");
        assert_eq!(chart.points[0].value, 45000);
    }

    #[test]
    fn test_incomplete_editor_shows_hint() {
        let (backend, mut state) = setup();
        state.handle_key(press(KeyCode::Char('n')));
        type_text(&mut state, "Sans contenu");
        state.handle_key(ctrl('s'));

        let editor = state.panel().editor().unwrap();
        assert_eq!(editor.hint.as_deref(), Some("Champ requis : Contenu"));
        assert!(backend.records("articles").is_empty());

        state.handle_key(press(KeyCode::Esc));
        assert!(state.panel().editor().is_none());
    }

    #[test]
    fn test_number_field_rejects_letters() {
        let (_backend, mut state) = setup();
        state.select_tab(1);
        state.handle_key(press(KeyCode::Char('n')));
        for _ in 0..3 {
            state.handle_key(press(KeyCode::Tab));
        }
        type_text(&mut state, "12x");

        let editor = state.panel().editor().unwrap();
        assert_eq!(editor.fields[3].label, "Capacité");
        assert_eq!(editor.fields[3].value, "12");
        assert_eq!(editor.hint.as_deref(), Some("Valeur invalide pour Capacité"));
    }

    #[test]
    fn test_edit_match_status_with_arrows() {
        let (backend, mut state) = setup();
        backend.seed("matches", serde_json::json!({
            "titre": "Raja - Wydad",
            "contenu": "Derby",
            "dateMatch": "2025-04-12T19:30:00.000Z",
            "statut": "a_venir",
            "stade": "Stade Mohammed V",
            "arbitre": "R. Jiyed",
            "resume": "-"
        }));
        state.select_tab(3);
        state.handle_key(press(KeyCode::Char('r')));
        assert_eq!(state.panel().rows("")[0][3], "À venir");

        state.handle_key(press(KeyCode::Char('e')));
        state.handle_key(press(KeyCode::Tab));
        state.handle_key(press(KeyCode::Tab));
        state.handle_key(press(KeyCode::Right));
        state.handle_key(press(KeyCode::Right));
        assert_eq!(state.panel().editor().unwrap().fields[2].value, "Terminé");

        state.handle_key(ctrl('s'));
        assert!(state.panel().editor().is_none());
        assert_eq!(state.panel().rows("")[0][3], "Terminé");
    }

    #[test]
    fn test_delete_needs_confirmation() {
        let (backend, mut state) = setup();
        backend.seed("articles", serde_json::json!({ "titre": "A", "contenu": "x" }));
        state.handle_key(press(KeyCode::Char('r')));

        state.handle_key(press(KeyCode::Char('d')));
        assert_eq!(
            state.panel().delete_prompt(),
            Some("Êtes-vous sûr de vouloir supprimer cet article ?")
        );
        state.handle_key(press(KeyCode::Char('n')));
        assert!(state.panel().delete_prompt().is_none());
        assert_eq!(backend.records("articles").len(), 1);
        assert_eq!(state.client().notices().latest().unwrap().level, NoticeLevel::Info);

        state.handle_key(press(KeyCode::Char('d')));
        state.handle_key(press(KeyCode::Char('y')));
        assert!(backend.records("articles").is_empty());
        assert_eq!(state.panel().status_line(), Some("Aucun article disponible"));
    }

    #[test]
    fn test_search_mode_filters_rows() {
        let (backend, mut state) = setup();
        backend.seed("articles", serde_json::json!({ "titre": "Victoire du Raja", "contenu": "" }));
        backend.seed("articles", serde_json::json!({ "titre": "Mercato", "contenu": "" }));
        state.handle_key(press(KeyCode::Char('r')));

        state.handle_key(press(KeyCode::Char('/')));
        type_text(&mut state, "raja");
        assert!(state.searching);
        assert_eq!(state.panel().rows("").len(), 1);

        state.handle_key(press(KeyCode::Esc));
        assert!(!state.searching);
        type_text(&mut state, "q");
        assert!(state.should_quit);
    }
}
