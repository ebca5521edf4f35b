/// Configuration schema and defaults.
///
/// Sections: `[backend]`, `[ui]`, `[storage]`, `[logging]`. Every field has a
/// built-in default; users only set what they want to change.
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::controller::UiSettings;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Maps to `~/.sentimen/config.toml` and `.sentimen.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimenConfig {
    pub backend: BackendConfig,
    pub ui: UiConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [backend]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Origin of the sentiment API; request paths are appended to it.
    pub base_url: String,
    /// Per-request deadline. Unset means no client-enforced timeout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_ms: None,
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

// ---------------------------------------------------------------------------
// [ui]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Address `sentimen serve` binds to.
    pub listen: String,
    /// Safeguard for the word-cloud loading indicator.
    pub wordcloud_timeout_ms: u64,
    pub preview_rows: usize,
    /// Open the page in the default browser on `serve`.
    pub open_browser: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:8765".to_string(),
            wordcloud_timeout_ms: 2000,
            preview_rows: 10,
            open_browser: true,
        }
    }
}

impl UiConfig {
    pub fn settings(&self) -> UiSettings {
        UiSettings {
            wordcloud_timeout: Duration::from_millis(self.wordcloud_timeout_ms),
            preview_rows: self.preview_rows,
        }
    }
}

// ---------------------------------------------------------------------------
// [storage]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Data directory for `storage.json` and `events.jsonl`. `~` is expanded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

impl StorageConfig {
    /// The configured directory, or `~/.sentimen`.
    pub fn data_dir(&self) -> Option<PathBuf> {
        match self.dir.as_deref() {
            Some(dir) => expand_home(dir),
            None => dirs::home_dir().map(|home| home.join(".sentimen")),
        }
    }
}

/// Expand a leading `~` to the home directory.
fn expand_home(raw: &str) -> Option<PathBuf> {
    match raw.strip_prefix("~") {
        Some(rest) => {
            let rest = rest.trim_start_matches(['/', '\\']);
            dirs::home_dir().map(|home| home.join(rest))
        }
        None => Some(PathBuf::from(raw)),
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Append one line per action to `events.jsonl`.
    pub events: bool,
    /// Console level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            events: true,
            level: "warn".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Annotated default file
// ---------------------------------------------------------------------------

impl SentimenConfig {
    /// The annotated config written by `sentimen config init`.
    pub fn default_toml() -> String {
        r#"# sentimen configuration
#
# Configuration hierarchy (highest precedence wins):
#   1. Environment variables (SENTIMEN_*)
#   2. Project config (.sentimen.toml in current directory)
#   3. User global config (~/.sentimen/config.toml)
#   4. Built-in defaults

[backend]
base_url = "http://127.0.0.1:5000"
# timeout_ms = 30000          # unset: no client-enforced timeout

[ui]
listen = "127.0.0.1:8765"     # sentimen serve
wordcloud_timeout_ms = 2000   # hide the loading indicator after this long
preview_rows = 10             # rows shown in the batch preview table
open_browser = true

[storage]
# dir = "~/.sentimen"         # storage.json (session token) + events.jsonl

[logging]
events = true                 # activity log in events.jsonl
level = "warn"                # error | warn | info | debug | trace
"#
        .to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = SentimenConfig::default();
        assert_eq!(config.backend.base_url, "http://127.0.0.1:5000");
        assert!(config.backend.timeout().is_none());
        assert_eq!(config.ui.listen, "127.0.0.1:8765");
        assert_eq!(config.ui.preview_rows, 10);
        assert!(config.logging.events);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn default_toml_matches_defaults() {
        let parsed: SentimenConfig = toml::from_str(&SentimenConfig::default_toml()).unwrap();
        assert_eq!(parsed, SentimenConfig::default());
    }

    #[test]
    fn deserialize_minimal_toml() {
        let config: SentimenConfig = toml::from_str(
            r#"
[backend]
timeout_ms = 1500
"#,
        )
        .unwrap();
        assert_eq!(config.backend.timeout(), Some(Duration::from_millis(1500)));
        assert_eq!(config.backend.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.ui.wordcloud_timeout_ms, 2000);
    }

    #[test]
    fn ui_settings_follow_config() {
        let ui = UiConfig {
            wordcloud_timeout_ms: 500,
            preview_rows: 3,
            ..UiConfig::default()
        };
        let settings = ui.settings();
        assert_eq!(settings.wordcloud_timeout, Duration::from_millis(500));
        assert_eq!(settings.preview_rows, 3);
    }

    #[test]
    fn storage_dir_expands_home() {
        let storage = StorageConfig {
            dir: Some("~/data/sentimen".to_string()),
        };
        if let Some(home) = dirs::home_dir() {
            assert_eq!(storage.data_dir(), Some(home.join("data/sentimen")));
        }

        let absolute = StorageConfig {
            dir: Some("/var/lib/sentimen".to_string()),
        };
        assert_eq!(absolute.data_dir(), Some(PathBuf::from("/var/lib/sentimen")));
    }
}
