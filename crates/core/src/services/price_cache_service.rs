use tracing::debug;

use crate::errors::CoreError;
use crate::models::ticker::normalize_ticker;
use crate::storage::store::{LatestPrices, PersistentStore, StoreKey};

/// Last observed price per ticker. Entries are overwritten, never historized.
pub struct PriceCacheService;

impl PriceCacheService {
    pub fn new() -> Self {
        Self
    }

    /// Insert or overwrite the price for `ticker` and persist immediately.
    pub fn set(&self, store: &mut PersistentStore, ticker: &str, price: f64) -> Result<(), CoreError> {
        let ticker = normalize_ticker(ticker)?;
        if !price.is_finite() || price < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Invalid price for {ticker}: {price} (must be finite and non-negative)"
            )));
        }
        let mut prices: LatestPrices = store.read(StoreKey::LatestPrices);
        prices.insert(ticker.clone(), price);
        store.write(StoreKey::LatestPrices, &prices)?;
        debug!(%ticker, price, "latest price cached");
        Ok(())
    }

    /// Cached price, or `None` when the ticker has never been looked up.
    pub fn get(&self, store: &PersistentStore, ticker: &str) -> Option<f64> {
        let ticker = normalize_ticker(ticker).ok()?;
        let prices: LatestPrices = store.read(StoreKey::LatestPrices);
        prices.get(&ticker).copied()
    }

    pub fn all(&self, store: &PersistentStore) -> LatestPrices {
        store.read(StoreKey::LatestPrices)
    }
}

impl Default for PriceCacheService {
    fn default() -> Self {
        Self::new()
    }
}
