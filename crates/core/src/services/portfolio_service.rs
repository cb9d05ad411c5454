use std::collections::{BTreeMap, HashMap};

use tracing::info;

use crate::errors::CoreError;
use crate::models::analytics::{HoldingValuation, PortfolioValuation};
use crate::models::transaction::{Holding, Transaction, TransactionDraft, TransactionType};
use crate::storage::store::{LatestPrices, Ledger, PersistentStore, StoreKey};

/// Manages the append-only transaction ledger and derives holdings from it.
///
/// Holdings use a running average cost: a sell removes `shares × sell price`
/// from the running cost, exactly like a buy adds `shares × buy price`.
/// There is no lot matching.
pub struct PortfolioService;

impl PortfolioService {
    pub fn new() -> Self {
        Self
    }

    /// Validate and append a transaction. Returns its index in the ledger.
    pub fn add_transaction(
        &self,
        store: &mut PersistentStore,
        draft: TransactionDraft,
    ) -> Result<usize, CoreError> {
        let tx = self.validate(draft)?;
        let mut ledger: Ledger = store.read(StoreKey::Portfolio);
        info!(
            kind = %tx.kind,
            ticker = %tx.ticker,
            shares = tx.shares,
            price = tx.price,
            "transaction recorded"
        );
        ledger.push(tx);
        store.write(StoreKey::Portfolio, &ledger)?;
        Ok(ledger.len() - 1)
    }

    /// Remove the transaction at `index`. Out of range is a no-op (`false`).
    pub fn remove_transaction(
        &self,
        store: &mut PersistentStore,
        index: usize,
    ) -> Result<bool, CoreError> {
        let mut ledger: Ledger = store.read(StoreKey::Portfolio);
        if index >= ledger.len() {
            return Ok(false);
        }
        let removed = ledger.remove(index);
        store.write(StoreKey::Portfolio, &ledger)?;
        info!(index, ticker = %removed.ticker, "transaction removed");
        Ok(true)
    }

    /// The ledger in stored order.
    pub fn transactions(&self, store: &PersistentStore) -> Ledger {
        store.read(StoreKey::Portfolio)
    }

    /// Fold the ledger, in order, into one running total per ticker.
    ///
    /// Every ticker that appears in the ledger is present in the result,
    /// including fully sold (or oversold) ones; callers filter with
    /// [`Holding::is_open`].
    pub fn compute_holdings(&self, transactions: &[Transaction]) -> BTreeMap<String, Holding> {
        let mut holdings: BTreeMap<String, Holding> = BTreeMap::new();

        for tx in transactions {
            let ticker = tx.ticker.trim().to_uppercase();
            let holding = holdings
                .entry(ticker.clone())
                .or_insert_with(|| Holding::new(ticker));
            match tx.kind {
                TransactionType::Buy => {
                    holding.shares += tx.shares;
                    holding.cost += tx.shares * tx.price;
                }
                TransactionType::Sell => {
                    holding.shares -= tx.shares;
                    holding.cost -= tx.shares * tx.price;
                }
            }
        }

        holdings
    }

    /// Value open holdings against the latest known prices.
    ///
    /// A holding without a cached price is still listed (price `None`) and
    /// contributes nothing to `total_value`.
    pub fn compute_value(
        &self,
        holdings: &BTreeMap<String, Holding>,
        prices: &LatestPrices,
    ) -> PortfolioValuation {
        let lookup: HashMap<String, f64> = prices
            .iter()
            .map(|(ticker, price)| (ticker.to_uppercase(), *price))
            .collect();

        let mut valuation = PortfolioValuation::default();

        for holding in holdings.values().filter(|h| h.is_open()) {
            let price = lookup.get(&holding.ticker).copied();
            let market_value = price.map(|p| holding.shares * p);
            let gain_loss = market_value.map(|v| v - holding.cost);
            let gain_loss_pct = gain_loss.and_then(|g| {
                if holding.cost > 0.0 {
                    Some(g / holding.cost * 100.0)
                } else {
                    None
                }
            });

            if let Some(value) = market_value {
                valuation.total_value += value;
                valuation.priced_holdings += 1;
            }
            valuation.total_cost += holding.cost;

            valuation.rows.push(HoldingValuation {
                ticker: holding.ticker.clone(),
                shares: holding.shares,
                cost: holding.cost,
                average_cost: holding.average_cost(),
                price,
                market_value,
                gain_loss,
                gain_loss_pct,
            });
        }

        valuation
    }

    /// Convenience: holdings and valuation straight from the store.
    pub fn valuation(&self, store: &PersistentStore) -> PortfolioValuation {
        let holdings = self.compute_holdings(&self.transactions(store));
        let prices: LatestPrices = store.read(StoreKey::LatestPrices);
        self.compute_value(&holdings, &prices)
    }

    /// Ticker must be present, shares and price must be non-zero numbers.
    /// Negative values are rejected as well: a sell is expressed by the
    /// transaction type, never by the sign.
    pub fn validate(&self, draft: TransactionDraft) -> Result<Transaction, CoreError> {
        let ticker = draft.ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(CoreError::ValidationError("Transaction ticker is required".into()));
        }
        if !draft.shares.is_finite() || draft.shares <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Shares must be a positive number, got {}",
                draft.shares
            )));
        }
        if !draft.price.is_finite() || draft.price <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Price must be a positive number, got {}",
                draft.price
            )));
        }
        let date = draft
            .date
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        Ok(Transaction {
            kind: draft.kind,
            ticker,
            shares: draft.shares,
            price: draft.price,
            date,
        })
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}
