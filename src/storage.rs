/// Key-value client storage.
///
/// Two flavours mirror what a browser offers:
///
/// - [`FileStorage`]: durable, survives restarts (`~/.sentimen/storage.json`).
///   Holds the session token and the user record.
/// - [`MemoryStorage`]: session-scoped, lives as long as the process (one CLI
///   invocation or one `sentimen serve` run). Holds the anonymous history and
///   the navigation markers.
///
/// Writes are best-effort: a storage failure is logged and never aborts the
/// action that triggered it.
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Minimal string storage, the shape of `localStorage` / `sessionStorage`.
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

// ---------------------------------------------------------------------------
// Session storage
// ---------------------------------------------------------------------------

/// In-memory storage for session-scoped values.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

// ---------------------------------------------------------------------------
// Durable storage
// ---------------------------------------------------------------------------

/// JSON-file backed storage. Every write is flushed to disk immediately.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open (or lazily create) the storage file at `path`.
    ///
    /// A missing or malformed file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default();
        Self { path, entries }
    }

    /// Storage file inside the given data directory.
    pub fn default_path(data_dir: &Path) -> PathBuf {
        data_dir.join("storage.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("failed to create storage directory")?;
        }
        let json =
            serde_json::to_string_pretty(&self.entries).context("failed to serialize storage")?;
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }

    fn persist_best_effort(&self) {
        if let Err(e) = self.persist() {
            log::warn!("storage write failed: {e:#}");
        }
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
        self.persist_best_effort();
    }

    fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.persist_best_effort();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
