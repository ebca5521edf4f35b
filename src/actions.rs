//! Backend call sites.
//!
//! Every action follows the same shape: check preconditions (alert and stop
//! on failure, no request), hold a [`LoadingGuard`] on the triggering control
//! while the single request is in flight, then either alert the failure or
//! hand the payload to a renderer. Each completed action appends one line to
//! the activity log.

use std::time::Instant;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::{self, ApiRequest, ApiResponse, Transport, TransportError};
use crate::auth::AuthError;
use crate::charts;
use crate::controller::Controller;
use crate::events::{ActivityEvent, Outcome};
use crate::export::{self, CSV_FILENAME};
use crate::models::{
    BattleResponse, BatchResponse, ClassifyResponse, DashboardData, HistoryEntry,
    HistoryResponse, ScrapeResponse, SummaryStats, TrendSeries, WordWeight, YoutubeSnapshot,
};
use crate::render;
use crate::view::{LoadingGuard, Tab};

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

pub const EMPTY_TEXT: &str = "Harap masukkan teks terlebih dahulu.";
pub const NO_FILE: &str = "Harap pilih file CSV atau Excel terlebih dahulu.";
pub const EMPTY_URL: &str = "Harap masukkan URL YouTube.";
pub const NOTHING_TO_SAVE: &str = "Tidak ada data untuk disimpan";
pub const MISSING_BATTLE_URLS: &str = "Harap masukkan kedua URL YouTube (Brand vs Kompetitor)";
pub const NO_FEEDBACK_TARGET: &str = "Pilih analisis yang ingin dikoreksi terlebih dahulu.";

pub const ANALYZE_FAILED: &str = "Terjadi kesalahan saat analisis.";
pub const BATCH_FAILED: &str = "Gagal memproses file";
pub const SOCIAL_FAILED: &str = "Gagal mengambil data";
pub const SERVER_UNREACHABLE: &str = "Terjadi kesalahan saat menghubungi server.";
pub const LOGIN_REQUIRED: &str = "Silakan login terlebih dahulu.";
const UNKNOWN_ERROR: &str = "Unknown error";

pub const SAVED: &str = "✅ Analisis berhasil disimpan! Anda bisa compare nanti.";
pub const FEEDBACK_SAVED: &str = "Terima kasih! Masukan Anda telah disimpan.";

const SAVE_FAILED_PREFIX: &str = "❌ Gagal menyimpan: ";
const FEEDBACK_FAILED_PREFIX: &str = "Gagal menyimpan masukan: ";
const BATTLE_FAILED_PREFIX: &str = "Battle Error: ";

const UNTITLED: &str = "Untitled Analysis";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A failed action, already phrased as the alert the user sees.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UiError {
    /// Precondition not met; no request was made.
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Request(String),
}

impl UiError {
    fn outcome(&self) -> Outcome {
        match self {
            Self::Validation(_) => Outcome::Validation,
            Self::Request(_) => Outcome::Failure,
        }
    }
}

/// Whether a 2xx body must say `"status": "success"` or merely must not say
/// anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusRule {
    Lenient,
    Required,
}

/// Why a response could not be used.
#[derive(Debug, thiserror::Error)]
pub enum Failure {
    #[error("backend answered {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Rejected {
        status: u16,
        message: Option<String>,
    },
    #[error(transparent)]
    Unreachable(#[from] TransportError),
}

impl Failure {
    /// Phrase the failure as an alert. `rejected` receives the server's
    /// `message`, if it sent one.
    fn into_ui(self, rejected: impl FnOnce(Option<String>) -> String, unreachable: &str) -> UiError {
        match self {
            Self::Rejected { message, .. } => UiError::Request(rejected(message)),
            Self::Unreachable(e) => {
                log::warn!("{e}");
                UiError::Request(unreachable.to_string())
            }
        }
    }
}

/// Server message or `fallback`, for both rejections and transport errors.
fn or_fallback(fallback: &'static str) -> impl FnOnce(Failure) -> UiError {
    move |failure| failure.into_ui(|m| m.unwrap_or_else(|| fallback.to_string()), fallback)
}

/// Decode a response under the uniform failure rule: non-2xx, a `status`
/// other than `"success"`, or a body that does not fit `P` is a rejection.
pub fn decode<P: DeserializeOwned>(
    result: Result<ApiResponse, TransportError>,
    rule: StatusRule,
) -> Result<P, Failure> {
    let response = result?;
    let status = response.status;
    let rejected = |message| Failure::Rejected { status, message };

    let Some(value) = response.json_value() else {
        return Err(rejected(None));
    };
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string);

    let marked_ok = match value.get("status") {
        Some(marker) => marker.as_str() == Some("success"),
        None => rule == StatusRule::Lenient,
    };
    if !response.is_success() || !marked_ok {
        return Err(rejected(message));
    }

    serde_json::from_value(value).map_err(|e| {
        log::warn!("unexpected response shape ({status}): {e}");
        rejected(None)
    })
}

/// The last batch as a downloadable file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDownload {
    pub filename: &'static str,
    pub content: String,
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

impl<T: Transport> Controller<T> {
    fn begin(&mut self) -> Instant {
        self.last_status = None;
        Instant::now()
    }

    /// Decode a user-triggered response, remembering its HTTP status for the
    /// activity log.
    fn receive<P: DeserializeOwned>(
        &mut self,
        result: Result<ApiResponse, TransportError>,
        rule: StatusRule,
    ) -> Result<P, Failure> {
        if let Ok(response) = &result {
            self.last_status = Some(response.status);
        }
        decode(result, rule)
    }

    fn record(&mut self, action: &str, outcome: Outcome, started: Instant, detail: Option<String>) {
        let event = ActivityEvent::new(action, outcome, started)
            .with_status(self.last_status.take())
            .with_detail(detail);
        self.activity.record(&event);
    }

    /// Alert a failure, log the action, and hand back the payload on success.
    fn finish<P>(&mut self, action: &str, started: Instant, result: Result<P, UiError>) -> Option<P> {
        match result {
            Ok(payload) => {
                self.record(action, Outcome::Success, started, None);
                Some(payload)
            }
            Err(err) => {
                let message = err.to_string();
                log::debug!("{action} failed: {message}");
                self.doc.alert(message.clone());
                self.record(action, err.outcome(), started, Some(message));
                None
            }
        }
    }

    // -- Single text --

    pub fn analyze_sentiment(&mut self) -> Option<ClassifyResponse> {
        let started = self.begin();
        let result = self.try_analyze_sentiment();
        self.finish("analyze_sentiment", started, result)
    }

    fn try_analyze_sentiment(&mut self) -> Result<ClassifyResponse, UiError> {
        let text = self.field(self.view.input_text).trim().to_string();
        if text.is_empty() {
            return Err(UiError::Validation(EMPTY_TEXT.to_string()));
        }

        let request = self.state.auth.with_optional_bearer(api::classify(&text));
        let response = {
            let _busy = LoadingGuard::acquire(&mut self.doc, self.view.analyze_btn, "Menganalisis...");
            self.transport.send(&request)
        };
        let result: ClassifyResponse = self
            .receive(response, StatusRule::Lenient)
            .map_err(or_fallback(ANALYZE_FAILED))?;

        render::render_result(&mut self.doc, &self.view, &result);
        if !self.state.auth.is_logged_in() {
            let timestamp = result
                .timestamp
                .clone()
                .unwrap_or_else(|| Utc::now().to_rfc3339());
            self.state
                .push_history(HistoryEntry::anonymous(&text, &result, timestamp));
        }
        self.load_history();
        Ok(result)
    }

    // -- Batch --

    pub fn analyze_batch(&mut self) -> Option<BatchResponse> {
        let started = self.begin();
        let result = self.try_analyze_batch();
        self.finish("analyze_batch", started, result)
    }

    fn try_analyze_batch(&mut self) -> Result<BatchResponse, UiError> {
        let Some(file) = self.state.selected_file.clone() else {
            return Err(UiError::Validation(NO_FILE.to_string()));
        };

        let request = self
            .state
            .auth
            .with_optional_bearer(api::batch_classify(&file.name, file.bytes));
        let response = {
            let _busy = LoadingGuard::acquire(&mut self.doc, self.view.analyze_batch_btn, "Memproses...");
            self.transport.send(&request)
        };
        let batch: BatchResponse = self
            .receive(response, StatusRule::Lenient)
            .map_err(or_fallback(BATCH_FAILED))?;

        self.state.last_batch = batch.results.clone();
        render::render_batch(&mut self.doc, &self.view, &batch, self.settings.preview_rows);
        Ok(batch)
    }

    /// The last batch as CSV, `None` (and nothing else happens) when there
    /// is no batch to export.
    pub fn download_batch_csv(&self) -> Option<CsvDownload> {
        export::batch_csv(&self.state.last_batch).map(|content| CsvDownload {
            filename: CSV_FILENAME,
            content,
        })
    }

    // -- Social --

    pub fn analyze_social(&mut self) -> Option<ScrapeResponse> {
        let started = self.begin();
        let result = self.try_analyze_social();
        self.finish("analyze_social", started, result)
    }

    fn try_analyze_social(&mut self) -> Result<ScrapeResponse, UiError> {
        let url = self.field(self.view.social_url).trim().to_string();
        if url.is_empty() {
            return Err(UiError::Validation(EMPTY_URL.to_string()));
        }

        self.doc.hide(self.view.social_result);
        let request = api::scrape(&url);
        let response = {
            let _busy = LoadingGuard::acquire(&mut self.doc, self.view.analyze_social_btn, "Memproses...");
            self.transport.send(&request)
        };
        let scrape: ScrapeResponse = self
            .receive(response, StatusRule::Lenient)
            .map_err(or_fallback(SOCIAL_FAILED))?;

        self.state.last_youtube = Some(YoutubeSnapshot {
            url,
            results: scrape.results.clone(),
            stats: scrape.stats,
        });
        render::render_social(&mut self.doc, &self.view, &scrape);
        Ok(scrape)
    }

    /// Save the last scrape under the label typed in the form. Returns the
    /// label used.
    pub fn save_youtube_analysis(&mut self) -> Option<String> {
        let started = self.begin();
        let result = self.try_save_youtube();
        self.finish("save_youtube_analysis", started, result)
    }

    fn try_save_youtube(&mut self) -> Result<String, UiError> {
        let Some(snapshot) = self.state.last_youtube.clone() else {
            return Err(UiError::Validation(NOTHING_TO_SAVE.to_string()));
        };

        let label = match self.field(self.view.save_analysis_label).trim() {
            "" => UNTITLED.to_string(),
            typed => typed.to_string(),
        };
        let analysis_data = serde_json::to_value(&snapshot)
            .map_err(|e| UiError::Request(format!("{SAVE_FAILED_PREFIX}{e}")))?;

        let request = api::youtube_save(&label, &snapshot.url, analysis_data);
        let response = {
            let _busy = LoadingGuard::acquire(&mut self.doc, self.view.save_youtube_btn, "Menyimpan...");
            self.transport.send(&request)
        };
        self.receive::<Value>(response, StatusRule::Lenient)
            .map_err(|failure| {
                failure.into_ui(
                    |m| format!("{SAVE_FAILED_PREFIX}{}", m.as_deref().unwrap_or(UNKNOWN_ERROR)),
                    &format!("{SAVE_FAILED_PREFIX}{SERVER_UNREACHABLE}"),
                )
            })?;

        self.doc.alert(SAVED);
        self.doc.set_value(self.view.save_analysis_label, "");
        Ok(label)
    }

    // -- Brand battle --

    pub fn start_battle(&mut self) -> Option<BattleResponse> {
        let started = self.begin();
        let result = self.try_start_battle();
        self.finish("start_battle", started, result)
    }

    fn try_start_battle(&mut self) -> Result<BattleResponse, UiError> {
        let url_a = self.field(self.view.battle_url_a).trim().to_string();
        let url_b = self.field(self.view.battle_url_b).trim().to_string();
        if url_a.is_empty() || url_b.is_empty() {
            return Err(UiError::Validation(MISSING_BATTLE_URLS.to_string()));
        }

        let request = self
            .state
            .auth
            .with_optional_bearer(api::brand_battle(&url_a, &url_b));
        let response = {
            let _busy = LoadingGuard::acquire(&mut self.doc, self.view.start_battle_btn, "Bertarung...");
            self.transport.send(&request)
        };
        let battle: BattleResponse = self
            .receive(response, StatusRule::Required)
            .map_err(|failure| {
                failure.into_ui(
                    |m| format!("{BATTLE_FAILED_PREFIX}{}", m.as_deref().unwrap_or(UNKNOWN_ERROR)),
                    SERVER_UNREACHABLE,
                )
            })?;

        render::render_battle(&mut self.doc, &self.view, &battle);
        Ok(battle)
    }

    // -- History --

    /// Repopulate the history list and stats: the server history when
    /// logged in, the session list otherwise. A failed fetch shows an empty
    /// list.
    pub fn load_history(&mut self) -> Vec<HistoryEntry> {
        let logged_in = self.state.auth.is_logged_in();
        let entries = if logged_in {
            self.fetch_quietly::<HistoryResponse>(api::history())
                .map(|r| r.history)
                .unwrap_or_default()
        } else {
            self.state.anonymous_history()
        };

        render::render_history(&mut self.doc, &self.view, &entries, logged_in);
        render::render_stats(&mut self.doc, &self.view, &entries);
        entries
    }

    pub fn clear_history(&mut self) {
        self.state.clear_history();
        self.load_history();
    }

    /// Authenticated GET whose failure is only logged. `None` without a
    /// token or on any failure.
    fn fetch_quietly<P: DeserializeOwned>(&self, request: ApiRequest) -> Option<P> {
        let path = request.path.clone();
        let result = self.state.auth.authorized_fetch(&self.transport, request)?;
        decode(result, StatusRule::Lenient)
            .map_err(|failure| log::warn!("{path} unavailable: {failure}"))
            .ok()
    }

    // -- Dashboard --

    /// Fill the dashboard from the three stats endpoints. Each part is
    /// fetched and rendered independently; anonymous users get the login
    /// prompt and no requests.
    pub fn load_dashboard(&mut self) -> Option<DashboardData> {
        if !self.state.auth.is_logged_in() {
            self.doc.show(self.view.dashboard_login_msg);
            self.doc.hide(self.view.dashboard_content);
            return None;
        }
        self.doc.hide(self.view.dashboard_login_msg);
        self.doc.show(self.view.dashboard_content);

        let summary = self.fetch_quietly::<SummaryStats>(api::stats_summary());
        if let Some(summary) = &summary {
            render::render_summary(&mut self.doc, &self.view, summary);
        }

        let trend = self.fetch_quietly::<TrendSeries>(api::stats_trend());
        if let Some(trend) = &trend {
            charts::render_trend(&mut self.doc, &self.view, self.chart.as_mut(), trend);
        }

        let words = self.fetch_quietly::<Vec<WordWeight>>(api::stats_wordcloud());
        if let Some(words) = &words {
            charts::render_word_cloud(
                &mut self.doc,
                &self.view,
                self.cloud.as_mut(),
                words,
                self.settings.wordcloud_timeout,
            );
        }

        Some(DashboardData {
            summary,
            trend,
            words,
        })
    }

    // -- Feedback --

    /// Send a label correction for the analysis picked with
    /// [`Controller::open_feedback`].
    pub fn submit_feedback(&mut self, correction: &str) -> bool {
        let started = self.begin();
        let result = self.try_submit_feedback(correction);
        self.finish("submit_feedback", started, result).is_some()
    }

    fn try_submit_feedback(&mut self, correction: &str) -> Result<(), UiError> {
        let Some(analysis_id) = self.state.feedback_target else {
            return Err(UiError::Validation(NO_FEEDBACK_TARGET.to_string()));
        };

        let Some(response) = self
            .state
            .auth
            .authorized_fetch(&self.transport, api::feedback(analysis_id, correction))
        else {
            return Err(UiError::Request(format!("{FEEDBACK_FAILED_PREFIX}{LOGIN_REQUIRED}")));
        };
        self.receive::<Value>(response, StatusRule::Lenient)
            .map_err(|failure| {
                failure.into_ui(
                    |m| format!("{FEEDBACK_FAILED_PREFIX}{}", m.as_deref().unwrap_or(SERVER_UNREACHABLE)),
                    &format!("{FEEDBACK_FAILED_PREFIX}{SERVER_UNREACHABLE}"),
                )
            })?;

        self.doc.alert(FEEDBACK_SAVED);
        self.close_feedback();
        self.load_history();
        Ok(())
    }

    // -- Session --

    /// Log in with the credentials typed into the login modal. Failures are
    /// shown inside the modal rather than alerted.
    pub fn handle_login(&mut self) -> bool {
        let started = self.begin();
        let username = self.field(self.view.login_username).trim().to_string();
        let password = self.field(self.view.login_password);

        match self.state.auth.login(&self.transport, &username, &password) {
            Ok(()) => {
                self.doc.hide(self.view.login_error);
                self.close_login();
                self.refresh_auth_nav();
                self.load_history();
                if self.tab() == Some(Tab::Dashboard) {
                    self.load_dashboard();
                }
                self.record("login", Outcome::Success, started, None);
                true
            }
            Err(err) => {
                let message = match err {
                    AuthError::Rejected(message) => message,
                    AuthError::Transport(e) => {
                        log::warn!("{e}");
                        SERVER_UNREACHABLE.to_string()
                    }
                };
                self.doc.set_text(self.view.login_error, message.as_str());
                self.doc.show(self.view.login_error);
                self.record("login", Outcome::Failure, started, Some(message));
                false
            }
        }
    }

    /// Drop the session and start over from a fresh page.
    pub fn logout(&mut self) {
        let started = self.begin();
        self.state.auth.logout();
        self.record("logout", Outcome::Success, started, None);
        self.reload();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;
    use crate::auth::{AuthClient, TOKEN_KEY};
    use crate::events::ActivityLog;
    use crate::state::AppState;
    use crate::storage::{MemoryStorage, Storage};

    /// Replays queued responses in order and records every request.
    #[derive(Default)]
    struct Scripted {
        replies: RefCell<VecDeque<Result<ApiResponse, TransportError>>>,
        calls: RefCell<Vec<ApiRequest>>,
    }

    impl Scripted {
        fn reply(self, status: u16, body: &str) -> Self {
            self.replies
                .borrow_mut()
                .push_back(Ok(ApiResponse::new(status, body)));
            self
        }

        fn unreachable(self) -> Self {
            self.replies.borrow_mut().push_back(Err(TransportError::Network {
                method: "POST",
                path: "/".to_string(),
                reason: "connection refused".to_string(),
            }));
            self
        }

        fn paths(&self) -> Vec<String> {
            self.calls.borrow().iter().map(|r| r.path.clone()).collect()
        }
    }

    impl Transport for Scripted {
        fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
            self.calls.borrow_mut().push(request.clone());
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Ok(ApiResponse::new(500, "{}")))
        }
    }

    fn anonymous(transport: Scripted) -> Controller<Scripted> {
        let state = AppState::new(
            AuthClient::new(Box::new(MemoryStorage::new())),
            Box::new(MemoryStorage::new()),
        );
        Controller::new(transport, state)
    }

    fn logged_in(transport: Scripted) -> Controller<Scripted> {
        let mut durable = MemoryStorage::new();
        durable.set(TOKEN_KEY, "tok");
        let state = AppState::new(AuthClient::new(Box::new(durable)), Box::new(MemoryStorage::new()));
        Controller::new(transport, state)
    }

    #[test]
    fn decode_applies_uniform_failure_rule() {
        let ok = decode::<Value>(Ok(ApiResponse::new(200, r#"{"x": 1}"#)), StatusRule::Lenient);
        assert!(ok.is_ok());

        let marked = decode::<Value>(
            Ok(ApiResponse::new(200, r#"{"status": "error", "message": "kuota habis"}"#)),
            StatusRule::Lenient,
        );
        assert!(matches!(marked, Err(Failure::Rejected { message: Some(m), .. }) if m == "kuota habis"));

        let unmarked = decode::<Value>(Ok(ApiResponse::new(200, "{}")), StatusRule::Required);
        assert!(matches!(unmarked, Err(Failure::Rejected { status: 200, message: None })));

        let garbage = decode::<Value>(Ok(ApiResponse::new(502, "<html>")), StatusRule::Lenient);
        assert!(matches!(garbage, Err(Failure::Rejected { status: 502, message: None })));
    }

    #[test]
    fn analyze_sentiment_renders_and_appends_anonymous_history() {
        let transport = Scripted::default().reply(
            200,
            r#"{"status": "success", "sentiment": "Positif", "confidence": 0.9, "timestamp": "2026-03-01T10:15:00"}"#,
        );
        let mut c = anonymous(transport);
        c.set_field("inputText", "  enak sekali  ");

        let result = c.analyze_sentiment().unwrap();

        assert_eq!(result.sentiment.as_str(), "Positif");
        assert_eq!(c.document().text("sentimentLabel"), "Positif");
        assert_eq!(c.document().text("confidenceScore"), "90% Confidence");
        let history = c.state().anonymous_history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].text, "enak sekali");
        assert_eq!(c.transport().paths(), [api::CLASSIFY]);
    }

    #[test]
    fn analyze_sentiment_failure_uses_server_message() {
        let transport = Scripted::default().reply(500, r#"{"message": "Model belum siap"}"#);
        let mut c = anonymous(transport);
        c.set_field("inputText", "halo");

        assert!(c.analyze_sentiment().is_none());
        assert_eq!(c.take_alerts(), ["Model belum siap"]);
        assert!(!c.document().is_visible("resultCard"));
        assert!(!c.document().is_disabled("analyzeBtn"));
    }

    #[test]
    fn empty_text_is_rejected_without_request() {
        let mut c = anonymous(Scripted::default());
        c.set_field("inputText", "   ");

        assert!(c.analyze_sentiment().is_none());
        assert_eq!(c.take_alerts(), [EMPTY_TEXT]);
        assert!(c.transport().paths().is_empty());
    }

    #[test]
    fn battle_requires_success_marker() {
        let body = r#"{
            "brand_a": {"positive_pct": 60, "stats": {"Positif": 6, "Negatif": 4}},
            "brand_b": {"positive_pct": 40, "stats": {"Positif": 4, "Negatif": 6}},
            "verdict": {"gap": 20, "title": "Menang", "message": "A unggul"}
        }"#;
        let mut c = anonymous(Scripted::default().reply(200, body));
        c.set_field("battleUrlA", "https://youtu.be/a");
        c.set_field("battleUrlB", "https://youtu.be/b");

        assert!(c.start_battle().is_none());
        assert_eq!(c.take_alerts(), ["Battle Error: Unknown error"]);
        assert!(!c.document().is_visible("battleResult"));
    }

    #[test]
    fn battle_transport_error_has_generic_alert() {
        let mut c = anonymous(Scripted::default().unreachable());
        c.set_field("battleUrlA", "a");
        c.set_field("battleUrlB", "b");

        assert!(c.start_battle().is_none());
        assert_eq!(c.take_alerts(), [SERVER_UNREACHABLE]);
        assert!(!c.document().is_disabled("startBattleBtn"));
    }

    #[test]
    fn save_youtube_failure_is_prefixed() {
        let transport = Scripted::default()
            .reply(200, r#"{"status": "success", "stats": {"Positif": 1}, "results": []}"#)
            .reply(400, r#"{"status": "error", "message": "Label terlalu panjang"}"#);
        let mut c = anonymous(transport);
        c.set_field("socialUrl", "https://youtu.be/x");
        assert!(c.analyze_social().is_some());

        assert!(c.save_youtube_analysis().is_none());
        assert_eq!(c.take_alerts(), ["❌ Gagal menyimpan: Label terlalu panjang"]);
    }

    #[test]
    fn save_youtube_defaults_label_and_clears_input() {
        let transport = Scripted::default()
            .reply(200, r#"{"stats": {"Negatif": 2}, "results": []}"#)
            .reply(200, r#"{"status": "success"}"#);
        let mut c = anonymous(transport);
        c.set_field("socialUrl", "https://youtu.be/x");
        c.analyze_social();

        assert_eq!(c.save_youtube_analysis().as_deref(), Some(UNTITLED));
        assert_eq!(c.take_alerts(), [SAVED]);

        let calls = c.transport().calls.borrow();
        let api::Body::Json(body) = &calls[1].body else {
            panic!("save must post JSON");
        };
        assert_eq!(body["label"], UNTITLED);
        assert_eq!(body["video_url"], "https://youtu.be/x");
        assert_eq!(body["analysis_data"]["stats"]["Negatif"], 2);
    }

    #[test]
    fn feedback_without_token_makes_no_request() {
        let mut c = anonymous(Scripted::default());
        c.open_feedback(4);

        assert!(!c.submit_feedback("Negatif"));
        assert_eq!(
            c.take_alerts(),
            [format!("{FEEDBACK_FAILED_PREFIX}{LOGIN_REQUIRED}")]
        );
        assert!(c.transport().paths().is_empty());
    }

    #[test]
    fn feedback_success_closes_modal_and_reloads_history() {
        let transport = Scripted::default()
            .reply(200, r#"{"history": []}"#)
            .reply(200, r#"{"status": "success"}"#)
            .reply(200, r#"{"history": []}"#);
        let mut c = logged_in(transport);
        c.open_feedback(12);

        assert!(c.submit_feedback("Netral"));
        assert_eq!(c.take_alerts(), [FEEDBACK_SAVED]);
        assert!(!c.document().is_visible("feedbackModal"));
        assert_eq!(
            c.transport().paths(),
            [api::HISTORY, "/api/feedback/12", api::HISTORY]
        );
    }

    #[test]
    fn login_failure_is_shown_in_modal() {
        let transport = Scripted::default().reply(401, r#"{"message": "Password salah"}"#);
        let mut c = anonymous(transport);
        c.open_login();
        c.set_field("loginUsername", "sari");
        c.set_field("loginPassword", "x");

        assert!(!c.handle_login());
        assert_eq!(c.document().text("loginError"), "Password salah");
        assert!(c.document().is_visible("loginError"));
        assert!(c.document().is_visible("loginModal"));
        assert!(c.take_alerts().is_empty());
    }

    #[test]
    fn dashboard_parts_fail_independently() {
        let transport = Scripted::default()
            .reply(200, r#"{"history": []}"#)
            .reply(200, r#"{"total": 5, "positive": 3, "negative": 1}"#)
            .reply(500, "{}")
            .reply(200, r#"[{"text": "enak", "weight": 3}]"#);
        let mut c = logged_in(transport);

        let data = c.load_dashboard().unwrap();
        assert_eq!(data.summary.unwrap().total, 5);
        assert!(data.trend.is_none());
        assert_eq!(data.words.unwrap().len(), 1);
        assert_eq!(c.document().text("total_analyses"), "5");
        assert!(c.take_alerts().is_empty());
    }

    #[test]
    fn activity_log_records_each_action() {
        let path = std::env::temp_dir()
            .join(format!("sentimen-actions-{}", std::process::id()))
            .join("events.jsonl");
        let _ = std::fs::remove_file(&path);
        let log = ActivityLog::new(&path);

        let transport =
            Scripted::default().reply(200, r#"{"sentiment": "Netral", "confidence": 0.5}"#);
        let mut c = anonymous(transport).with_activity(log.clone());
        c.analyze_sentiment();
        c.set_field("inputText", "biasa saja");
        c.analyze_sentiment();

        let entries = log.read_all();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].outcome, Outcome::Validation);
        assert_eq!(entries[0].detail.as_deref(), Some(EMPTY_TEXT));
        assert_eq!(entries[1].outcome, Outcome::Success);
        assert_eq!(entries[1].status, Some(200));
    }
}
