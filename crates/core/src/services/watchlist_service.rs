use tracing::info;

use crate::errors::CoreError;
use crate::models::ticker::{normalize_ticker, same_ticker};
use crate::storage::store::{PersistentStore, StoreKey, Watchlist};

/// Keeps the watchlist document: an ordered list of unique tickers.
///
/// Stateless; the store is the single source of truth and is re-read on
/// every call.
pub struct WatchlistService;

impl WatchlistService {
    pub fn new() -> Self {
        Self
    }

    /// Add a ticker. Returns `false` when it was already listed
    /// (compared case-insensitively), in which case nothing is written.
    pub fn add(&self, store: &mut PersistentStore, ticker: &str) -> Result<bool, CoreError> {
        let ticker = normalize_ticker(ticker)?;
        let mut list: Watchlist = store.read(StoreKey::Watchlist);
        if list.iter().any(|t| same_ticker(t, &ticker)) {
            return Ok(false);
        }
        list.push(ticker.clone());
        store.write(StoreKey::Watchlist, &list)?;
        info!(%ticker, "added to watchlist");
        Ok(true)
    }

    /// Remove a ticker. Returns whether anything was removed.
    pub fn remove(&self, store: &mut PersistentStore, ticker: &str) -> Result<bool, CoreError> {
        let mut list: Watchlist = store.read(StoreKey::Watchlist);
        let before = list.len();
        list.retain(|t| !same_ticker(t, ticker));
        if list.len() == before {
            return Ok(false);
        }
        store.write(StoreKey::Watchlist, &list)?;
        info!(ticker = %ticker.trim().to_uppercase(), "removed from watchlist");
        Ok(true)
    }

    /// Current watchlist in insertion order.
    pub fn list(&self, store: &PersistentStore) -> Watchlist {
        store.read(StoreKey::Watchlist)
    }

    pub fn contains(&self, store: &PersistentStore, ticker: &str) -> bool {
        self.list(store).iter().any(|t| same_ticker(t, ticker))
    }
}

impl Default for WatchlistService {
    fn default() -> Self {
        Self::new()
    }
}
