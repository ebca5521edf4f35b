/// View controller: owns the document, the app state and the transport, and
/// drives page/tab navigation and the input helpers.
///
/// The backend call sites live in [`crate::actions`] as further methods on
/// [`Controller`]. Both front-ends (CLI and web) drive one controller per
/// session and read the document back after each step.
use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::api::Transport;
use crate::charts::{ChartEngine, DocumentChartEngine, DocumentCloudEngine, WordCloudEngine};
use crate::dom::{Document, ElementId};
use crate::events::ActivityLog;
use crate::render;
use crate::state::{AppState, SelectedFile};
use crate::view::{ACTIVE_CLASS, Page, Tab, View};

/// Longest text the analyze box advertises.
pub const MAX_INPUT_CHARS: usize = 500;

/// Alert for an upload that is neither CSV nor Excel.
pub const WRONG_FILE_TYPE: &str = "Harap upload file CSV atau Excel.";

/// Upload extensions the batch endpoint accepts.
const ACCEPTED_EXTENSIONS: &[&str] = &[".csv", ".xlsx"];

/// Form controls whose value the user edits.
pub const INPUT_FIELDS: &[ElementId] = &[
    "inputText",
    "loginUsername",
    "loginPassword",
    "socialUrl",
    "saveAnalysisLabel",
    "battleUrlA",
    "battleUrlB",
];

/// Presentation knobs taken from the `[ui]` config section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiSettings {
    /// Safeguard after which the word-cloud loading indicator is hidden.
    pub wordcloud_timeout: Duration,
    /// Rows shown in the batch preview table.
    pub preview_rows: usize,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            wordcloud_timeout: Duration::from_millis(2000),
            preview_rows: 10,
        }
    }
}

/// A user interaction forwarded by a front-end.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum UiEvent {
    ShowPage { page: Page },
    BackToWelcome,
    SwitchTab { tab: Tab },
    Input,
    ClearInput,
    AnalyzeSentiment,
    ClearHistory,
    OpenLogin,
    CloseLogin,
    Login,
    Logout,
    OpenFeedback { id: i64 },
    CloseFeedback,
    SubmitFeedback { correction: String },
    RemoveFile,
    AnalyzeBatch,
    AnalyzeSocial,
    SaveYoutube,
    StartBattle,
    Reload,
}

pub struct Controller<T: Transport> {
    pub(crate) transport: T,
    pub(crate) state: AppState,
    pub(crate) doc: Document,
    pub(crate) view: View,
    pub(crate) settings: UiSettings,
    pub(crate) activity: ActivityLog,
    pub(crate) chart: Box<dyn ChartEngine>,
    pub(crate) cloud: Box<dyn WordCloudEngine>,
    pub(crate) last_status: Option<u16>,
    page_template: Document,
    page: Page,
    tab: Option<Tab>,
}

impl<T: Transport> Controller<T> {
    /// Controller over the standard page skeleton, initialized.
    pub fn new(transport: T, state: AppState) -> Self {
        Self::with_document(transport, state, Document::skeleton())
    }

    /// Controller over a custom page (e.g. one missing some elements).
    pub fn with_document(transport: T, state: AppState, doc: Document) -> Self {
        let mut controller = Self::assemble(transport, state, doc);
        controller.init();
        controller
    }

    /// Controller over the standard page without the page-load history
    /// fetch. Nothing is sent until an action asks for it.
    pub fn with_state(transport: T, state: AppState) -> Self {
        let mut controller = Self::assemble(transport, state, Document::skeleton());
        controller.bind();
        controller.restore_navigation();
        controller
    }

    fn assemble(transport: T, state: AppState, doc: Document) -> Self {
        Self {
            transport,
            state,
            doc: doc.clone(),
            view: View::default(),
            settings: UiSettings::default(),
            activity: ActivityLog::disabled(),
            chart: Box::new(DocumentChartEngine::new()),
            cloud: Box::new(DocumentCloudEngine),
            last_status: None,
            page_template: doc,
            page: Page::Home,
            tab: None,
        }
    }

    pub fn with_settings(mut self, settings: UiSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_activity(mut self, activity: ActivityLog) -> Self {
        self.activity = activity;
        self
    }

    pub fn with_engines(
        mut self,
        chart: Box<dyn ChartEngine>,
        cloud: Box<dyn WordCloudEngine>,
    ) -> Self {
        self.chart = chart;
        self.cloud = cloud;
        self
    }

    // -- Accessors --

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn tab(&self) -> Option<Tab> {
        self.tab
    }

    pub fn take_alerts(&mut self) -> Vec<String> {
        self.doc.take_alerts()
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Bind the view, render auth state and history, and restore the last
    /// persona and tab from session storage when they still fit together.
    fn init(&mut self) {
        self.bind();
        self.load_history();
        self.restore_navigation();
    }

    fn bind(&mut self) {
        self.view = View::bind(&self.doc);
        self.refresh_auth_nav();
    }

    fn restore_navigation(&mut self) {
        match (self.state.persona(), self.state.tab()) {
            (Some(persona), Some(tab)) if persona.offers(tab) => {
                log::debug!("restoring {} / {}", persona.as_str(), tab.as_str());
                self.enter_page(Page::Persona(persona));
                self.switch_tab(tab);
            }
            _ => self.show_page(Page::Home),
        }
    }

    /// Start over from the page markup: every in-memory buffer is dropped,
    /// durable and session storage are kept.
    pub fn reload(&mut self) {
        self.doc = self.page_template.clone();
        self.state.reset_in_memory();
        self.tab = None;
        self.init();
    }

    pub fn refresh_auth_nav(&mut self) {
        let session = self
            .state
            .auth
            .is_logged_in()
            .then(|| self.state.auth.user());
        render::render_auth_nav(&mut self.doc, &self.view, session.as_ref().map(Option::as_ref));
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Hide every page and tab view, then show `page`. Persona pages open on
    /// their default tab.
    pub fn show_page(&mut self, page: Page) {
        self.enter_page(page);
        match page.persona() {
            Some(persona) => self.switch_tab(persona.default_tab()),
            None => self.tab = None,
        }
    }

    pub fn back_to_welcome(&mut self) {
        self.show_page(Page::Home);
    }

    fn enter_page(&mut self, page: Page) {
        for id in self.view.pages() {
            self.doc.hide(id);
        }
        for id in self.view.tab_views() {
            self.doc.hide(id);
        }
        self.doc.show(self.view.page(page));
        self.page = page;
        self.state.set_persona(page.persona());
    }

    /// Show one tab view and highlight its button on the active persona page.
    ///
    /// A tab requested outside a persona page that offers it moves to the
    /// persona page hosting it. Entering the dashboard repopulates it.
    pub fn switch_tab(&mut self, tab: Tab) {
        let persona = match self.page.persona() {
            Some(p) if p.offers(tab) => p,
            _ => {
                let host = tab.home_persona();
                self.enter_page(Page::Persona(host));
                host
            }
        };

        self.state.set_tab(tab);
        self.tab = Some(tab);

        for id in self.view.tab_views() {
            self.doc.hide(id);
        }
        for id in self.view.tab_buttons() {
            self.doc.remove_class(id, ACTIVE_CLASS);
        }
        self.doc.show(self.view.tab_view(tab));
        self.doc.add_class(self.view.tab_button(persona, tab), ACTIVE_CLASS);

        if tab == Tab::Dashboard {
            self.load_dashboard();
        }
    }

    // -----------------------------------------------------------------------
    // Input helpers
    // -----------------------------------------------------------------------

    /// Set the value of a user-editable control. Unknown ids are ignored.
    pub fn set_field(&mut self, id: &str, value: &str) {
        let Some(&id) = INPUT_FIELDS.iter().find(|field| **field == id) else {
            log::debug!("ignoring value for non-input element {id}");
            return;
        };
        self.doc.set_value(Some(id), value);
        if Some(id) == self.view.input_text {
            self.update_char_count();
        }
    }

    /// Apply a batch of field values as sent by the web page.
    pub fn apply_fields(&mut self, fields: &BTreeMap<String, String>) {
        for (id, value) in fields {
            self.set_field(id, value);
        }
    }

    pub(crate) fn field(&self, id: Option<ElementId>) -> String {
        id.map(|id| self.doc.value(id).to_string())
            .unwrap_or_default()
    }

    pub fn update_char_count(&mut self) {
        let len = self.field(self.view.input_text).chars().count();
        self.doc
            .set_text(self.view.char_count, format!("{len} / {MAX_INPUT_CHARS} karakter"));
        self.doc.set_visible(self.view.clear_btn, len > 0);
    }

    pub fn clear_input(&mut self) {
        self.doc.set_value(self.view.input_text, "");
        self.update_char_count();
        self.doc.hide(self.view.result_card);
    }

    /// Pick a file for batch analysis. Only CSV and Excel are accepted.
    pub fn select_file(&mut self, name: &str, bytes: Vec<u8>) -> bool {
        if !ACCEPTED_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
            self.doc.alert(WRONG_FILE_TYPE);
            return false;
        }

        self.state.selected_file = Some(SelectedFile {
            name: name.to_string(),
            bytes,
        });
        self.doc.set_text(self.view.file_name, name);
        self.doc.show(self.view.file_info);
        self.doc.hide(self.view.drop_zone);
        self.doc.set_disabled(self.view.analyze_batch_btn, false);
        true
    }

    /// Forget the selected file and the last batch along with it.
    pub fn remove_file(&mut self) {
        self.state.selected_file = None;
        self.state.last_batch.clear();
        self.doc.set_value(self.view.batch_file, "");
        self.doc.hide(self.view.file_info);
        self.doc.show(self.view.drop_zone);
        self.doc.set_disabled(self.view.analyze_batch_btn, true);
        self.doc.hide(self.view.batch_result);
    }

    pub fn open_login(&mut self) {
        self.doc.hide(self.view.login_error);
        self.doc.show(self.view.login_modal);
    }

    pub fn close_login(&mut self) {
        self.doc.hide(self.view.login_modal);
    }

    pub fn open_feedback(&mut self, analysis_id: i64) {
        self.state.feedback_target = Some(analysis_id);
        self.doc
            .set_value(self.view.feedback_analysis_id, analysis_id.to_string());
        self.doc.show(self.view.feedback_modal);
    }

    pub fn close_feedback(&mut self) {
        self.state.feedback_target = None;
        self.doc.hide(self.view.feedback_modal);
    }

    // -----------------------------------------------------------------------
    // Event dispatch
    // -----------------------------------------------------------------------

    pub fn dispatch(&mut self, event: UiEvent) {
        log::debug!("event: {event:?}");
        match event {
            UiEvent::ShowPage { page } => self.show_page(page),
            UiEvent::BackToWelcome => self.back_to_welcome(),
            UiEvent::SwitchTab { tab } => self.switch_tab(tab),
            UiEvent::Input => self.update_char_count(),
            UiEvent::ClearInput => self.clear_input(),
            UiEvent::AnalyzeSentiment => {
                self.analyze_sentiment();
            }
            UiEvent::ClearHistory => self.clear_history(),
            UiEvent::OpenLogin => self.open_login(),
            UiEvent::CloseLogin => self.close_login(),
            UiEvent::Login => {
                self.handle_login();
            }
            UiEvent::Logout => self.logout(),
            UiEvent::OpenFeedback { id } => self.open_feedback(id),
            UiEvent::CloseFeedback => self.close_feedback(),
            UiEvent::SubmitFeedback { correction } => {
                self.submit_feedback(&correction);
            }
            UiEvent::RemoveFile => self.remove_file(),
            UiEvent::AnalyzeBatch => {
                self.analyze_batch();
            }
            UiEvent::AnalyzeSocial => {
                self.analyze_social();
            }
            UiEvent::SaveYoutube => {
                self.save_youtube_analysis();
            }
            UiEvent::StartBattle => {
                self.start_battle();
            }
            UiEvent::Reload => self.reload(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
