//! Recently searched cities and their persistence.
//!
//! History lives in a small JSON key-value document (the "local preference
//! store") under the [`HISTORY_KEY`] entry. Reads fail open: a missing or
//! unreadable document is an empty history, never a startup error.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::{
    fmt::Debug,
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tempfile::NamedTempFile;

pub const HISTORY_KEY: &str = "searchHistory";
pub const HISTORY_LIMIT: usize = 5;

/// Most-recent-first, deduplicated, at most [`HISTORY_LIMIT`] entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchHistory {
    entries: Vec<String>,
}

impl SearchHistory {
    /// Build a history from an arbitrary sequence, keeping the first
    /// occurrence of each city and dropping blanks.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut history = Self::default();
        for city in entries {
            let city = city.into();
            if history.entries.len() == HISTORY_LIMIT {
                break;
            }
            if !city.trim().is_empty() && !history.contains(&city) {
                history.entries.push(city);
            }
        }
        history
    }

    /// `[city, ...previous]` with any earlier occurrence of `city` removed.
    pub fn with_recorded(&self, city: &str) -> Self {
        Self::from_entries(std::iter::once(city).chain(self.entries.iter().map(String::as_str)))
    }

    pub fn contains(&self, city: &str) -> bool {
        self.entries.iter().any(|c| c == city)
    }

    pub fn most_recent(&self) -> Option<&str> {
        self.entries.first().map(String::as_str)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Durable storage for [`SearchHistory`].
pub trait HistoryStore: Send + Debug {
    /// Persisted history, or empty if nothing valid is stored.
    fn load(&self) -> SearchHistory;

    /// Overwrite persisted history.
    fn save(&self, history: &SearchHistory) -> Result<()>;

    /// Record `city` on top of the stored history and persist the result.
    fn record(&self, city: &str) -> Result<SearchHistory> {
        let history = self.load().with_recorded(city);
        self.save(&history)?;
        Ok(history)
    }
}

/// History kept in a JSON document on disk, alongside any other preferences
/// sharing the same file.
#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_document(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read preferences: {}", self.path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse preferences: {}", self.path.display()))
    }
}

impl HistoryStore for FileHistoryStore {
    fn load(&self) -> SearchHistory {
        let document = match self.read_document() {
            Ok(doc) => doc,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring unreadable search history");
                return SearchHistory::default();
            }
        };

        match document.get(HISTORY_KEY).cloned() {
            None => SearchHistory::default(),
            Some(value) => match serde_json::from_value::<Vec<String>>(value) {
                Ok(entries) => SearchHistory::from_entries(entries),
                Err(err) => {
                    tracing::warn!(error = %err, "ignoring malformed search history");
                    SearchHistory::default()
                }
            },
        }
    }

    fn save(&self, history: &SearchHistory) -> Result<()> {
        // A corrupt document is replaced rather than blocking the write.
        let mut document = self.read_document().unwrap_or_default();
        document.insert(
            HISTORY_KEY.to_string(),
            Value::from(history.entries().to_vec()),
        );

        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        fs::create_dir_all(dir).with_context(|| {
            format!("Failed to create preferences directory: {}", dir.display())
        })?;

        let json = serde_json::to_string_pretty(&document)
            .context("Failed to serialize search history")?;

        // Write beside the target and rename over it, so other preferences
        // survive an interrupted write.
        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
        tmp.write_all(json.as_bytes())
            .context("Failed to write preferences")?;
        tmp.persist(&self.path)
            .with_context(|| format!("Failed to replace preferences: {}", self.path.display()))?;

        Ok(())
    }
}

/// Non-durable store, used for `--no-history` runs.
#[derive(Debug, Default)]
pub struct MemoryHistoryStore {
    history: Mutex<SearchHistory>,
}

impl MemoryHistoryStore {
    pub fn new(history: SearchHistory) -> Self {
        Self {
            history: Mutex::new(history),
        }
    }
}

impl HistoryStore for MemoryHistoryStore {
    fn load(&self) -> SearchHistory {
        self.history
            .lock()
            .map(|h| h.clone())
            .unwrap_or_default()
    }

    fn save(&self, history: &SearchHistory) -> Result<()> {
        let mut guard = self
            .history
            .lock()
            .map_err(|_| anyhow::anyhow!("history lock poisoned"))?;
        *guard = history.clone();
        Ok(())
    }
}
