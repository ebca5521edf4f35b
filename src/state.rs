/// Application state owned by the controller.
///
/// Everything the page keeps between actions lives here: the auth client
/// over durable storage, session storage (anonymous history and navigation
/// markers), and the in-memory buffers that later actions read (last batch,
/// last YouTube scrape, selected upload, feedback target). Writers replace
/// values wholesale; the last write wins.
use crate::auth::AuthClient;
use crate::models::{BatchRow, HistoryEntry, YoutubeSnapshot};
use crate::storage::Storage;
use crate::view::{Persona, Tab};

/// Session key of the anonymous history (JSON array of entries).
pub const HISTORY_KEY: &str = "sentimentHistory";
/// Session key of the last selected tab.
pub const TAB_KEY: &str = "currentTab";
/// Session key of the last visited persona page.
pub const PERSONA_KEY: &str = "currentPersona";

/// A file picked for batch upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

pub struct AppState {
    pub auth: AuthClient,
    session: Box<dyn Storage>,
    pub last_batch: Vec<BatchRow>,
    pub last_youtube: Option<YoutubeSnapshot>,
    pub selected_file: Option<SelectedFile>,
    pub feedback_target: Option<i64>,
}

impl AppState {
    pub fn new(auth: AuthClient, session: Box<dyn Storage>) -> Self {
        Self {
            auth,
            session,
            last_batch: Vec::new(),
            last_youtube: None,
            selected_file: None,
            feedback_target: None,
        }
    }

    /// Drop every in-memory buffer. Storage (durable and session) is kept.
    pub fn reset_in_memory(&mut self) {
        self.last_batch.clear();
        self.last_youtube = None;
        self.selected_file = None;
        self.feedback_target = None;
    }

    // -- Anonymous history --

    /// The session history; a missing or malformed value reads as empty.
    pub fn anonymous_history(&self) -> Vec<HistoryEntry> {
        self.session
            .get(HISTORY_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    pub fn push_history(&mut self, entry: HistoryEntry) {
        let mut history = self.anonymous_history();
        history.push(entry);
        match serde_json::to_string(&history) {
            Ok(json) => self.session.set(HISTORY_KEY, &json),
            Err(e) => log::warn!("failed to store history entry: {e}"),
        }
    }

    pub fn clear_history(&mut self) {
        self.session.remove(HISTORY_KEY);
    }

    // -- Navigation markers --

    pub fn set_tab(&mut self, tab: Tab) {
        self.session.set(TAB_KEY, tab.as_str());
    }

    pub fn tab(&self) -> Option<Tab> {
        Tab::parse(&self.session.get(TAB_KEY)?)
    }

    pub fn set_persona(&mut self, persona: Option<Persona>) {
        match persona {
            Some(p) => self.session.set(PERSONA_KEY, p.as_str()),
            None => self.session.remove(PERSONA_KEY),
        }
    }

    pub fn persona(&self) -> Option<Persona> {
        Persona::parse(&self.session.get(PERSONA_KEY)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClassifyResponse, Sentiment};
    use crate::storage::MemoryStorage;

    fn state() -> AppState {
        AppState::new(
            AuthClient::new(Box::new(MemoryStorage::new())),
            Box::new(MemoryStorage::new()),
        )
    }

    fn entry(text: &str) -> HistoryEntry {
        let result = ClassifyResponse {
            sentiment: Sentiment::Positif,
            confidence: 0.8,
            aspects: Vec::new(),
            timestamp: None,
        };
        HistoryEntry::anonymous(text, &result, "2026-05-01T10:00:00Z".to_string())
    }

    #[test]
    fn history_appends_in_order() {
        let mut state = state();
        state.push_history(entry("satu"));
        state.push_history(entry("dua"));
        let texts: Vec<_> = state
            .anonymous_history()
            .into_iter()
            .map(|e| e.text)
            .collect();
        assert_eq!(texts, ["satu", "dua"]);

        state.clear_history();
        assert!(state.anonymous_history().is_empty());
    }

    #[test]
    fn malformed_history_reads_as_empty() {
        let mut session = MemoryStorage::new();
        session.set(HISTORY_KEY, "{not a list");
        let state = AppState::new(
            AuthClient::new(Box::new(MemoryStorage::new())),
            Box::new(session),
        );
        assert!(state.anonymous_history().is_empty());
    }

    #[test]
    fn navigation_markers_roundtrip() {
        let mut state = state();
        assert!(state.tab().is_none());
        state.set_tab(Tab::Battle);
        state.set_persona(Some(Persona::Brand));
        assert_eq!(state.tab(), Some(Tab::Battle));
        assert_eq!(state.persona(), Some(Persona::Brand));
        state.set_persona(None);
        assert!(state.persona().is_none());
    }

    #[test]
    fn reset_keeps_session_history() {
        let mut state = state();
        state.push_history(entry("tetap"));
        state.feedback_target = Some(3);
        state.selected_file = Some(SelectedFile {
            name: "a.csv".to_string(),
            bytes: Vec::new(),
        });

        state.reset_in_memory();

        assert!(state.selected_file.is_none());
        assert!(state.feedback_target.is_none());
        assert_eq!(state.anonymous_history().len(), 1);
    }
}
