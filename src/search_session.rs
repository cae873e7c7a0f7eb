use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use crossterm::event::KeyCode;
use reqwest::Url;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api_client::{ApiError, DictionaryApi};
use crate::dictionary::{validate_entries, DictionaryEntry};
use crate::history::{HistoryItem, SearchHistory};
use crate::search_cache::SearchCache;

/// Shown for any lookup failure that is not an authentication error.
pub const SEARCH_FAILED_MESSAGE: &str =
    "Something went wrong while searching. Please try again.";

/// Transient state owned by one search session and rendered by the UI.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Live input text.
    pub query: String,
    /// Committed text shown as the results heading.
    pub displayed_query: String,
    pub results: Vec<DictionaryEntry>,
    pub is_searching: bool,
    pub error: Option<String>,
    /// Snapshot of the history store, refreshed after every mutation.
    pub history: Vec<HistoryItem>,
    pub suggestions: Vec<String>,
    pub selected_suggestion: Option<usize>,
}

struct SearchOutcome {
    generation: u64,
    term: String,
    result: Result<Vec<Value>, ApiError>,
}

/// Coordinates the result cache, the history store, and the dictionary
/// client for one mounted session.
///
/// Lookups run on a worker thread and come back through `poll()`. Each
/// submission gets a generation number; outcomes from a superseded
/// generation are discarded, so a slow response can never land in a reset
/// or newer session state.
pub struct SearchSession {
    client: Arc<dyn DictionaryApi>,
    cache: SearchCache,
    history: SearchHistory,
    state: SessionState,
    share_base_url: String,
    shared_term: Option<String>,
    generation: u64,
    outcome_tx: Sender<SearchOutcome>,
    outcome_rx: Receiver<SearchOutcome>,
}

impl SearchSession {
    pub fn new(
        client: Arc<dyn DictionaryApi>,
        cache: SearchCache,
        history: SearchHistory,
        share_base_url: &str,
    ) -> Self {
        let (outcome_tx, outcome_rx) = channel();
        let state = SessionState {
            history: history.get_history(),
            ..SessionState::default()
        };
        Self {
            client,
            cache,
            history,
            state,
            share_base_url: share_base_url.trim_end_matches('/').to_string(),
            shared_term: None,
            generation: 0,
            outcome_tx,
            outcome_rx,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Applies a term carried in from a shared link: the cache is consulted
    /// first and the network only hit on a miss, so opening a link to an
    /// already-seen word costs nothing.
    pub fn mount(&mut self, initial_term: Option<&str>) {
        let Some(term) = initial_term.map(str::trim).filter(|t| !t.is_empty()) else {
            return;
        };
        self.state.query = term.to_string();
        self.state.displayed_query = term.to_string();
        self.shared_term = Some(term.to_string());
        if let Some(entries) = self.cache.get(term) {
            self.state.results = entries;
        } else {
            self.search(term);
        }
    }

    /// Runs one search lifecycle. Returns false when the submission was
    /// rejected: blank term, or a search already in flight.
    pub fn search(&mut self, term: &str) -> bool {
        let term = term.trim().to_string();
        if term.is_empty() || self.state.is_searching {
            return false;
        }
        self.state.is_searching = true;
        self.state.error = None;
        self.state.query = term.clone();
        self.state.displayed_query = term.clone();

        // History is recorded before the cache lookup or network call so it
        // reflects every attempted search regardless of outcome.
        self.history.add_search(&term);
        self.state.history = self.history.get_history();

        // Committing a search dismisses the suggestion dropdown.
        self.state.suggestions.clear();
        self.state.selected_suggestion = None;

        if self.shared_term.as_deref() != Some(term.as_str()) {
            self.shared_term = Some(term.clone());
        }

        if let Some(entries) = self.cache.get(&term) {
            debug!("cache hit for '{}'", term);
            self.state.results = entries;
            self.state.is_searching = false;
            return true;
        }

        self.generation += 1;
        let generation = self.generation;
        let client = Arc::clone(&self.client);
        let tx = self.outcome_tx.clone();
        thread::spawn(move || {
            let result = client.lookup(&term);
            // The session may be gone by now; a closed channel is fine.
            let _ = tx.send(SearchOutcome {
                generation,
                term,
                result,
            });
        });
        true
    }

    /// Drains finished lookups. Called from the UI tick; outcomes belonging
    /// to a superseded generation are dropped unapplied.
    pub fn poll(&mut self) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            if outcome.generation != self.generation {
                debug!("discarding stale response for '{}'", outcome.term);
                continue;
            }
            self.apply_outcome(outcome);
        }
    }

    fn apply_outcome(&mut self, outcome: SearchOutcome) {
        match outcome.result {
            Ok(raw) => {
                let entries = validate_entries(raw);
                if !entries.is_empty() {
                    self.cache.set(&outcome.term, entries.clone());
                }
                self.state.results = entries;
            }
            Err(ApiError::Auth { message }) => {
                self.state.error = Some(message);
                self.state.results.clear();
            }
            Err(e) => {
                warn!("search for '{}' failed: {}", outcome.term, e);
                self.state.error = Some(SEARCH_FAILED_MESSAGE.to_string());
                self.state.results.clear();
            }
        }
        self.state.is_searching = false;
    }

    /// Updates the live query. Non-blank input recomputes suggestions from
    /// history; blank input clears them. Either way the selection resets.
    pub fn set_query(&mut self, text: &str) {
        self.state.query = text.to_string();
        if text.trim().is_empty() {
            self.state.suggestions.clear();
        } else {
            self.state.suggestions = self.history.get_suggestions(text);
        }
        self.state.selected_suggestion = None;
    }

    /// Clears all transient search state, including the share link.
    /// History and cache are untouched.
    pub fn reset_search(&mut self) {
        // Bumping the generation orphans any in-flight lookup.
        self.generation += 1;
        self.shared_term = None;
        self.state = SessionState {
            history: std::mem::take(&mut self.state.history),
            ..SessionState::default()
        };
    }

    /// Keyboard contract for the search input. Arrow keys cycle through the
    /// suggestion list, Enter submits the selected suggestion or the live
    /// query, Escape dismisses the dropdown.
    pub fn handle_key(&mut self, code: KeyCode) {
        if self.state.suggestions.is_empty() {
            if code == KeyCode::Enter {
                let term = self.state.query.clone();
                self.search(&term);
            }
            return;
        }
        let last = self.state.suggestions.len() - 1;
        match code {
            KeyCode::Down => {
                self.state.selected_suggestion = Some(match self.state.selected_suggestion {
                    Some(index) if index < last => index + 1,
                    _ => 0,
                });
            }
            KeyCode::Up => {
                self.state.selected_suggestion = Some(match self.state.selected_suggestion {
                    Some(index) if index > 0 => index - 1,
                    _ => last,
                });
            }
            KeyCode::Enter => {
                let term = match self.state.selected_suggestion {
                    Some(index) => self.state.suggestions[index].clone(),
                    None => self.state.query.clone(),
                };
                self.search(&term);
            }
            KeyCode::Esc => {
                self.state.suggestions.clear();
                self.state.selected_suggestion = None;
            }
            _ => {}
        }
    }

    /// The term currently reflected in the shareable link, if any.
    pub fn shared_term(&self) -> Option<&str> {
        self.shared_term.as_deref()
    }

    /// Shareable link carrying the active search term as its `q` query
    /// parameter.
    pub fn share_url(&self) -> Option<String> {
        let term = self.shared_term.as_deref()?;
        let mut url = Url::parse(&self.share_base_url).ok()?;
        url.set_path("/");
        url.query_pairs_mut().clear().append_pair("q", term);
        Some(url.to_string())
    }

    pub fn remove_history_item(&mut self, term: &str) {
        self.history.remove_search(term);
        self.state.history = self.history.get_history();
    }

    pub fn clear_history(&mut self) {
        self.history.clear_history();
        self.state.history.clear();
    }

    pub fn export_history(&self) -> String {
        self.history.export_history()
    }

    pub fn import_history(&mut self, payload: &str) {
        self.history.import_history(payload);
        self.state.history = self.history.get_history();
    }
}

impl Drop for SearchSession {
    // The cache is scoped to one mounted session.
    fn drop(&mut self) {
        self.cache.clear();
    }
}
