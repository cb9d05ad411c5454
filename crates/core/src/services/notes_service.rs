use chrono::{DateTime, Utc};
use tracing::info;

use crate::errors::CoreError;
use crate::models::note::Note;
use crate::models::ticker::normalize_ticker;
use crate::storage::store::{NotesByTicker, PersistentStore, StoreKey};

/// Per-ticker notes, kept in insertion order.
pub struct NotesService;

impl NotesService {
    pub fn new() -> Self {
        Self
    }

    /// Append a note to `ticker`'s list and return its index.
    ///
    /// The content must not be blank; the title may be.
    pub fn add(
        &self,
        store: &mut PersistentStore,
        ticker: &str,
        title: &str,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<usize, CoreError> {
        let ticker = normalize_ticker(ticker)?;
        if content.trim().is_empty() {
            return Err(CoreError::ValidationError("Note content is required".into()));
        }

        let mut notes: NotesByTicker = store.read(StoreKey::Notes);
        let list = notes.entry(ticker.clone()).or_default();
        list.push(Note::new(title.trim(), content.trim(), now));
        let index = list.len() - 1;
        store.write(StoreKey::Notes, &notes)?;
        info!(%ticker, index, "note added");
        Ok(index)
    }

    /// Delete the note at `index`. An out-of-range index is a no-op and
    /// returns `false`. A ticker whose last note is deleted is dropped
    /// from the document.
    pub fn delete(
        &self,
        store: &mut PersistentStore,
        ticker: &str,
        index: usize,
    ) -> Result<bool, CoreError> {
        let ticker = normalize_ticker(ticker)?;
        let mut notes: NotesByTicker = store.read(StoreKey::Notes);
        let Some(list) = notes.get_mut(&ticker) else {
            return Ok(false);
        };
        if index >= list.len() {
            return Ok(false);
        }
        list.remove(index);
        if list.is_empty() {
            notes.remove(&ticker);
        }
        store.write(StoreKey::Notes, &notes)?;
        info!(%ticker, index, "note deleted");
        Ok(true)
    }

    /// Notes for `ticker`; empty when none exist.
    pub fn list_for(&self, store: &PersistentStore, ticker: &str) -> Vec<Note> {
        let Ok(ticker) = normalize_ticker(ticker) else {
            return Vec::new();
        };
        let mut notes: NotesByTicker = store.read(StoreKey::Notes);
        notes.remove(&ticker).unwrap_or_default()
    }

    /// Tickers that currently have at least one note, sorted.
    pub fn tickers(&self, store: &PersistentStore) -> Vec<String> {
        let notes: NotesByTicker = store.read(StoreKey::Notes);
        notes
            .into_iter()
            .filter(|(_, list)| !list.is_empty())
            .map(|(ticker, _)| ticker)
            .collect()
    }
}

impl Default for NotesService {
    fn default() -> Self {
        Self::new()
    }
}
