use std::collections::{BTreeMap, BTreeSet};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::note::Note;
use crate::models::transaction::Transaction;

use super::backend::StorageBackend;

/// Stored shape of the watchlist document.
pub type Watchlist = Vec<String>;
/// Stored shape of the notes document: ticker → notes in insertion order.
pub type NotesByTicker = BTreeMap<String, Vec<Note>>;
/// Stored shape of the portfolio document.
pub type Ledger = Vec<Transaction>;
/// Stored shape of the latest-price document: ticker → last observed price.
pub type LatestPrices = BTreeMap<String, f64>;

/// The four independent documents kept in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StoreKey {
    Watchlist,
    Notes,
    Portfolio,
    LatestPrices,
}

impl StoreKey {
    /// Un-namespaced key name.
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::Watchlist => "watchlist",
            StoreKey::Notes => "notes",
            StoreKey::Portfolio => "portfolio",
            StoreKey::LatestPrices => "latestPrices",
        }
    }
}

impl std::fmt::Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed JSON documents on top of a [`StorageBackend`].
///
/// Reads never fail: a missing key, an unreadable backend or malformed JSON
/// all yield the document's empty default. Every successful write is
/// recorded so the view layer can re-render the panels bound to that key.
pub struct PersistentStore {
    backend: Box<dyn StorageBackend>,
    namespace: String,
    changes: BTreeSet<StoreKey>,
}

impl std::fmt::Debug for PersistentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentStore")
            .field("backend", &self.backend.name())
            .field("namespace", &self.namespace)
            .field("pending_changes", &self.changes)
            .finish()
    }
}

impl PersistentStore {
    pub fn new(backend: Box<dyn StorageBackend>, namespace: impl Into<String>) -> Self {
        Self {
            backend,
            namespace: namespace.into(),
            changes: BTreeSet::new(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Full backend key for a document, e.g. `stock-lookup.watchlist`.
    pub fn backend_key(&self, key: StoreKey) -> String {
        format!("{}.{}", self.namespace, key.as_str())
    }

    /// Read and decode a document, falling back to `T::default()`.
    pub fn read<T>(&self, key: StoreKey) -> T
    where
        T: DeserializeOwned + Default,
    {
        let full_key = self.backend_key(key);
        let raw = match self.backend.get(&full_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(e) => {
                warn!(key = %full_key, error = %e, "storage read failed, using empty default");
                return T::default();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = %full_key, error = %e, "stored document is malformed, using empty default");
                T::default()
            }
        }
    }

    /// Encode and persist a document, then mark it changed.
    pub fn write<T>(&mut self, key: StoreKey, value: &T) -> Result<(), CoreError>
    where
        T: Serialize + ?Sized,
    {
        let full_key = self.backend_key(key);
        let json = serde_json::to_string(value)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize {key}: {e}")))?;
        self.backend.set(&full_key, &json)?;
        debug!(key = %full_key, bytes = json.len(), "document written");
        self.changes.insert(key);
        Ok(())
    }

    /// Delete a document; the next read returns the empty default.
    pub fn clear(&mut self, key: StoreKey) -> Result<(), CoreError> {
        let full_key = self.backend_key(key);
        self.backend.remove(&full_key)?;
        debug!(key = %full_key, "document cleared");
        self.changes.insert(key);
        Ok(())
    }

    /// Raw stored text, if any.
    pub fn raw(&self, key: StoreKey) -> Result<Option<String>, CoreError> {
        self.backend.get(&self.backend_key(key))
    }

    /// Drain the set of documents written since the previous call.
    pub fn take_changes(&mut self) -> BTreeSet<StoreKey> {
        std::mem::take(&mut self.changes)
    }

    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Read all four documents at once.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            watchlist: self.read(StoreKey::Watchlist),
            notes: self.read(StoreKey::Notes),
            portfolio: self.read(StoreKey::Portfolio),
            latest_prices: self.read(StoreKey::LatestPrices),
        }
    }

    /// Overwrite all four documents.
    pub fn restore(&mut self, snapshot: &StoreSnapshot) -> Result<(), CoreError> {
        self.write(StoreKey::Watchlist, &snapshot.watchlist)?;
        self.write(StoreKey::Notes, &snapshot.notes)?;
        self.write(StoreKey::Portfolio, &snapshot.portfolio)?;
        self.write(StoreKey::LatestPrices, &snapshot.latest_prices)?;
        Ok(())
    }
}

/// All stored documents together, used for export and import.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    #[serde(default)]
    pub watchlist: Watchlist,
    #[serde(default)]
    pub notes: NotesByTicker,
    #[serde(default)]
    pub portfolio: Ledger,
    #[serde(default)]
    pub latest_prices: LatestPrices,
}
