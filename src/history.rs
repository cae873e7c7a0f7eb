use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_MAX_SIZE: usize = 20;
const SUGGESTION_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub term: String,
    /// Last-searched time as epoch milliseconds, matching the portable
    /// export format.
    pub timestamp: i64,
    pub count: u32,
}

/// File-backed search history, newest first, at most one item per term.
///
/// The file is the source of truth: every operation reads it fresh, so there
/// is no in-memory copy to fall out of sync. History is best-effort: any
/// storage failure degrades to a no-op or an empty read and is only logged,
/// never surfaced to the caller.
pub struct SearchHistory {
    history_file: PathBuf,
    max_size: usize,
}

impl SearchHistory {
    pub fn new() -> Self {
        Self::with_file(
            crate::config::config_dir().join("history.json"),
            DEFAULT_MAX_SIZE,
        )
    }

    pub fn with_file(history_file: PathBuf, max_size: usize) -> Self {
        Self {
            history_file,
            max_size,
        }
    }

    pub fn get_history(&self) -> Vec<HistoryItem> {
        let content = match fs::read_to_string(&self.history_file) {
            Ok(content) => content,
            Err(_) => return Vec::new(),
        };
        match serde_json::from_str(&content) {
            Ok(items) => items,
            Err(e) => {
                warn!("search history file is unreadable: {}", e);
                Vec::new()
            }
        }
    }

    /// Records a search. A repeated term gets its count bumped, its
    /// timestamp refreshed, and moves to the front; a new term is prepended
    /// with count 1. The list is truncated to `max_size` afterwards.
    pub fn add_search(&self, term: &str) {
        let mut history = self.get_history();
        let now = Utc::now().timestamp_millis();
        match history.iter().position(|item| item.term == term) {
            Some(pos) => {
                let mut item = history.remove(pos);
                item.count += 1;
                item.timestamp = now;
                history.insert(0, item);
            }
            None => history.insert(
                0,
                HistoryItem {
                    term: term.to_string(),
                    timestamp: now,
                    count: 1,
                },
            ),
        }
        history.truncate(self.max_size);
        self.persist(&history);
    }

    pub fn remove_search(&self, term: &str) {
        let mut history = self.get_history();
        history.retain(|item| item.term != term);
        self.persist(&history);
    }

    pub fn clear_history(&self) {
        if let Err(e) = fs::remove_file(&self.history_file) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("failed to delete search history: {}", e);
            }
        }
    }

    /// The full current history as a portable JSON payload.
    pub fn export_history(&self) -> String {
        serde_json::to_string(&self.get_history()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Replaces the stored history with `payload` if it is a JSON array of
    /// history items. Anything else is rejected without touching the store.
    ///
    /// Validation goes through the same deserialization as `get_history`,
    /// so an accepted payload is guaranteed to read back. A looser check
    /// (say, any JSON number for `count`) would let an import overwrite the
    /// file with data the reader then rejects, wiping the history.
    pub fn import_history(&self, payload: &str) {
        if let Err(e) = serde_json::from_str::<Vec<HistoryItem>>(payload) {
            warn!("rejected history import: {}", e);
            return;
        }
        if let Some(parent) = self.history_file.parent() {
            let _ = fs::create_dir_all(parent);
        }
        if let Err(e) = fs::write(&self.history_file, payload) {
            warn!("failed to write imported search history: {}", e);
        }
    }

    /// Up to five historical terms containing `query`, most-searched first.
    /// Ties keep their stored order; a blank query yields nothing.
    pub fn get_suggestions(&self, query: &str) -> Vec<String> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();
        let mut matches: Vec<HistoryItem> = self
            .get_history()
            .into_iter()
            .filter(|item| item.term.to_lowercase().contains(&needle))
            .collect();
        matches.sort_by(|a, b| b.count.cmp(&a.count));
        matches
            .into_iter()
            .map(|item| item.term)
            .take(SUGGESTION_LIMIT)
            .collect()
    }

    fn persist(&self, items: &[HistoryItem]) {
        let json = match serde_json::to_string(items) {
            Ok(json) => json,
            Err(e) => {
                warn!("failed to serialize search history: {}", e);
                return;
            }
        };
        if let Some(parent) = self.history_file.parent() {
            let _ = fs::create_dir_all(parent);
        }
        if let Err(e) = fs::write(&self.history_file, json) {
            warn!("failed to persist search history: {}", e);
        }
    }
}

impl Default for SearchHistory {
    fn default() -> Self {
        Self::new()
    }
}
