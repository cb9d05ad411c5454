pub mod config;
pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;
pub mod view;

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use config::ClientConfig;
use errors::CoreError;
use models::{
    analytics::{Comparison, PerformanceResult, PortfolioValuation},
    market::{ChartData, ChartPeriod},
    note::Note,
    quote::SearchResult,
    ticker::{normalize_ticker, same_ticker},
    transaction::{Holding, Transaction, TransactionDraft},
};
use providers::traits::StockApi;
use services::{
    analytics_service::AnalyticsService, notes_service::NotesService,
    portfolio_service::PortfolioService, price_cache_service::PriceCacheService,
    watchlist_service::WatchlistService,
};
use storage::store::{LatestPrices, Ledger, NotesByTicker, PersistentStore, StoreSnapshot};
use view::{
    notifications::{Notification, NotificationKind, Notifier},
    panel::{build_view, PanelView},
    state::{AppState, Panel, SearchTicket},
    sync::{ViewSink, ViewSynchronizer},
};

/// Main entry point for the Stock Lookup client.
///
/// Owns the store, the backend handle, the session state and the view
/// synchronizer. Every mutating operation follows the same path: the
/// service writes the store, then the synchronizer re-renders the panels
/// bound to what was written. Failures are turned into transient error
/// notifications and also returned to the caller.
#[must_use]
pub struct StockLookup {
    store: PersistentStore,
    api: Arc<dyn StockApi>,
    state: AppState,
    sync: ViewSynchronizer,
    notifier: Notifier,
    watchlist_service: WatchlistService,
    notes_service: NotesService,
    portfolio_service: PortfolioService,
    price_cache_service: PriceCacheService,
    analytics_service: AnalyticsService,
}

impl std::fmt::Debug for StockLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StockLookup")
            .field("store", &self.store)
            .field("active_ticker", &self.state.active_ticker)
            .field("loading", &self.state.loading)
            .finish()
    }
}

impl StockLookup {
    pub fn new(
        store: PersistentStore,
        api: Arc<dyn StockApi>,
        sink: Box<dyn ViewSink>,
        notification_ttl: Duration,
    ) -> Self {
        Self {
            store,
            api,
            state: AppState::default(),
            sync: ViewSynchronizer::new(sink),
            notifier: Notifier::new(notification_ttl),
            watchlist_service: WatchlistService::new(),
            notes_service: NotesService::new(),
            portfolio_service: PortfolioService::new(),
            price_cache_service: PriceCacheService::new(),
            analytics_service: AnalyticsService::new(),
        }
    }

    /// File-backed store and HTTP backend, both taken from `config`.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_config(config: &ClientConfig, sink: Box<dyn ViewSink>) -> Result<Self, CoreError> {
        config.validate()?;
        let backend = storage::backend::FileBackend::open(&config.data_dir)?;
        let store = PersistentStore::new(Box::new(backend), config.namespace.clone());
        let api = providers::http::HttpStockApi::new(config.base_url.clone(), config.request_timeout_secs);
        Ok(Self::new(store, Arc::new(api), sink, config.notification_ttl()?))
    }

    /// Render every store-backed panel once (page load).
    pub fn initial_render(&mut self) {
        self.sync.refresh(
            [Panel::Watchlist, Panel::Notes, Panel::Portfolio],
            &mut self.store,
            &self.state,
        );
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub fn store(&self) -> &PersistentStore {
        &self.store
    }

    // ── Search ──────────────────────────────────────────────────────

    /// Look up a ticker, then refresh the search history.
    ///
    /// A failed history fetch is reported but does not fail the search.
    pub async fn search(&mut self, ticker: &str) -> Result<(), CoreError> {
        let ticket = self.begin_search(ticker)?;
        let api = Arc::clone(&self.api);
        let outcome = api.search(&ticket.ticker).await;
        self.finish_search(ticket, outcome)?;
        if let Err(e) = self.refresh_history().await {
            warn!(error = %e, "search history unavailable");
        }
        Ok(())
    }

    /// Validate the ticker and mark a search as in flight.
    ///
    /// Fails with [`CoreError::SearchInFlight`] while another search is
    /// outstanding.
    pub fn begin_search(&mut self, ticker: &str) -> Result<SearchTicket, CoreError> {
        if self.state.loading {
            return Err(CoreError::SearchInFlight);
        }
        let ticker = self.report(normalize_ticker(ticker))?;
        self.state.loading = true;
        info!(%ticker, "search started");
        Ok(SearchTicket { ticker })
    }

    /// Apply the response of a search started with [`begin_search`](Self::begin_search).
    ///
    /// On failure nothing of the previous result is replaced; the error is
    /// shown as a transient banner. On success the latest price is cached
    /// and every dependent panel re-renders.
    pub fn finish_search(
        &mut self,
        ticket: SearchTicket,
        outcome: Result<SearchResult, CoreError>,
    ) -> Result<(), CoreError> {
        self.state.loading = false;
        let result = self.report(outcome)?;
        let ticker = ticket.ticker;

        if let Some(price) = result.quote.reference_price() {
            if let Err(e) = self.price_cache_service.set(&mut self.store, &ticker, price) {
                warn!(%ticker, error = %e, "could not cache latest price");
            }
        }

        if self.state.active_ticker.as_deref() != Some(ticker.as_str()) {
            self.state.charts = None;
        }
        self.state.active_ticker = Some(ticker.clone());
        self.state.result = Some(result);
        self.state.last_error = None;
        if self.state.active_panel.is_none() {
            self.state.active_panel = Some(Panel::Outlook);
        }
        info!(%ticker, "search completed");

        self.sync.refresh(
            [Panel::Outlook, Panel::Summary, Panel::Charts, Panel::Notes],
            &mut self.store,
            &self.state,
        );
        Ok(())
    }

    /// Fetch the backend's search history and re-render its panel.
    pub async fn refresh_history(&mut self) -> Result<(), CoreError> {
        let api = Arc::clone(&self.api);
        let history = self.report(api.history().await)?;
        self.state.history = history;
        self.sync
            .refresh([Panel::History], &mut self.store, &self.state);
        Ok(())
    }

    /// Reset the search results (outlook, summary, charts, history).
    /// Stored watchlist, notes and portfolio are untouched.
    pub fn clear(&mut self) {
        self.state.clear_result();
        self.sync.refresh(
            [Panel::Outlook, Panel::Summary, Panel::Charts, Panel::History, Panel::Notes],
            &mut self.store,
            &self.state,
        );
    }

    /// Switch the visible tab.
    pub fn select_panel(&mut self, panel: Panel) {
        self.state.active_panel = Some(panel);
    }

    // ── Charts & Tools ──────────────────────────────────────────────

    /// Load price, return and beta series for the active ticker.
    ///
    /// The price series is required; missing returns or beta leave their
    /// part of the charts panel empty.
    pub async fn load_charts(&mut self, period: ChartPeriod) -> Result<(), CoreError> {
        let ticker = self.report(self.state.active_ticker.clone().ok_or(CoreError::NoActiveTicker))?;
        let api = Arc::clone(&self.api);

        let prices = self.report(api.historical(&ticker, period).await)?;
        let returns = match api.returns(&ticker, period).await {
            Ok(returns) => returns,
            Err(e) => {
                warn!(%ticker, error = %e, "returns unavailable");
                Vec::new()
            }
        };
        let beta = match api.beta(&ticker, period).await {
            Ok(beta) => Some(beta),
            Err(e) => {
                warn!(%ticker, error = %e, "beta unavailable");
                None
            }
        };

        self.state.charts = Some(ChartData {
            ticker,
            period,
            prices,
            returns,
            beta,
        });
        self.sync.refresh([Panel::Charts], &mut self.store, &self.state);
        Ok(())
    }

    /// Compare the periodic returns of two tickers.
    pub async fn compare(
        &mut self,
        first: &str,
        second: &str,
        period: ChartPeriod,
    ) -> Result<Comparison, CoreError> {
        let first = self.report(normalize_ticker(first))?;
        let second = self.report(normalize_ticker(second))?;
        let api = Arc::clone(&self.api);
        let first_returns = self.report(api.returns(&first, period).await)?;
        let second_returns = self.report(api.returns(&second, period).await)?;
        Ok(self
            .analytics_service
            .compare(&first, &first_returns, &second, &second_returns))
    }

    /// Performance calculator: total and annualized return.
    pub fn calculate_performance(
        &mut self,
        initial_value: f64,
        final_value: f64,
        years: f64,
    ) -> Result<PerformanceResult, CoreError> {
        let result = self
            .analytics_service
            .performance(initial_value, final_value, years);
        self.report(result)
    }

    // ── Watchlist ───────────────────────────────────────────────────

    /// Add a ticker to the watchlist. Returns `false` if it was already there.
    pub fn add_to_watchlist(&mut self, ticker: &str) -> Result<bool, CoreError> {
        let result = self.watchlist_service.add(&mut self.store, ticker);
        let added = self.report(result)?;
        let ticker = ticker.trim().to_uppercase();
        if added {
            self.notify(NotificationKind::Success, format!("{ticker} added to watchlist"));
        } else {
            self.notify(NotificationKind::Info, format!("{ticker} is already in your watchlist"));
        }
        self.sync.sync(&mut self.store, &self.state);
        Ok(added)
    }

    /// Remove a ticker from the watchlist. Returns whether it was listed.
    pub fn remove_from_watchlist(&mut self, ticker: &str) -> Result<bool, CoreError> {
        let result = self.watchlist_service.remove(&mut self.store, ticker);
        let removed = self.report(result)?;
        self.sync.sync(&mut self.store, &self.state);
        Ok(removed)
    }

    #[must_use]
    pub fn watchlist(&self) -> Vec<String> {
        self.watchlist_service.list(&self.store)
    }

    // ── Notes ───────────────────────────────────────────────────────

    /// Add a note for `ticker`. Returns the note's index.
    pub fn add_note(&mut self, ticker: &str, title: &str, content: &str) -> Result<usize, CoreError> {
        let result = self
            .notes_service
            .add(&mut self.store, ticker, title, content, Utc::now());
        let index = self.report(result)?;
        self.notify(NotificationKind::Success, "Note saved");
        self.sync.sync(&mut self.store, &self.state);
        Ok(index)
    }

    /// Delete the note at `index` for `ticker`. Out-of-range is a silent no-op.
    pub fn delete_note(&mut self, ticker: &str, index: usize) -> Result<bool, CoreError> {
        let result = self.notes_service.delete(&mut self.store, ticker, index);
        let deleted = self.report(result)?;
        self.sync.sync(&mut self.store, &self.state);
        Ok(deleted)
    }

    #[must_use]
    pub fn notes_for(&self, ticker: &str) -> Vec<Note> {
        self.notes_service.list_for(&self.store, ticker)
    }

    // ── Portfolio ───────────────────────────────────────────────────

    /// Record a buy or sell. Returns the transaction's index in the ledger.
    pub fn add_transaction(&mut self, draft: TransactionDraft) -> Result<usize, CoreError> {
        let result = self.portfolio_service.add_transaction(&mut self.store, draft);
        let index = self.report(result)?;
        self.notify(NotificationKind::Success, "Transaction added");
        self.sync.sync(&mut self.store, &self.state);
        Ok(index)
    }

    /// Remove the transaction at `index`. Out-of-range is a silent no-op.
    pub fn remove_transaction(&mut self, index: usize) -> Result<bool, CoreError> {
        let result = self.portfolio_service.remove_transaction(&mut self.store, index);
        let removed = self.report(result)?;
        self.sync.sync(&mut self.store, &self.state);
        Ok(removed)
    }

    #[must_use]
    pub fn transactions(&self) -> Vec<Transaction> {
        self.portfolio_service.transactions(&self.store)
    }

    #[must_use]
    pub fn holdings(&self) -> BTreeMap<String, Holding> {
        self.portfolio_service
            .compute_holdings(&self.portfolio_service.transactions(&self.store))
    }

    #[must_use]
    pub fn valuation(&self) -> PortfolioValuation {
        self.portfolio_service.valuation(&self.store)
    }

    // ── Prices ──────────────────────────────────────────────────────

    /// Record a price by hand (same effect as a successful lookup).
    pub fn set_cached_price(&mut self, ticker: &str, price: f64) -> Result<(), CoreError> {
        let result = self.price_cache_service.set(&mut self.store, ticker, price);
        self.report(result)?;
        self.sync.sync(&mut self.store, &self.state);
        Ok(())
    }

    #[must_use]
    pub fn cached_price(&self, ticker: &str) -> Option<f64> {
        self.price_cache_service.get(&self.store, ticker)
    }

    #[must_use]
    pub fn cached_prices(&self) -> LatestPrices {
        self.price_cache_service.all(&self.store)
    }

    /// Current content of `panel`, built on demand.
    #[must_use]
    pub fn view(&self, panel: Panel) -> PanelView {
        build_view(panel, &self.store, &self.state)
    }

    // ── Notifications ───────────────────────────────────────────────

    #[must_use]
    pub fn notifications(&self, now: DateTime<Utc>) -> Vec<&Notification> {
        self.notifier.active(now)
    }

    // ── Export / Import ─────────────────────────────────────────────

    /// All stored documents as one pretty-printed JSON object.
    pub fn export_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.store.snapshot())
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize store: {e}")))
    }

    /// Replace all stored documents with the content of an export.
    ///
    /// The input is parsed and checked before anything is written: tickers
    /// are normalized, the watchlist is de-duplicated and every transaction
    /// must pass the same checks as [`add_transaction`](Self::add_transaction).
    /// One invalid entry rejects the whole import.
    pub fn import_json(&mut self, json: &str) -> Result<(), CoreError> {
        let parsed: Result<StoreSnapshot, CoreError> = serde_json::from_str(json).map_err(CoreError::from);
        let snapshot = self.report(parsed)?;
        let checked = self.checked_snapshot(snapshot);
        let snapshot = self.report(checked)?;
        let result = self.store.restore(&snapshot);
        self.report(result)?;
        info!(
            watchlist = snapshot.watchlist.len(),
            transactions = snapshot.portfolio.len(),
            "store imported"
        );
        self.notify(NotificationKind::Success, "Data imported");
        self.sync.sync(&mut self.store, &self.state);
        Ok(())
    }

    /// The transaction ledger as CSV.
    /// Columns: index, type, ticker, shares, price, total, date
    pub fn export_transactions_csv(&self) -> Result<String, CoreError> {
        let csv_error = |e: csv::Error| CoreError::Serialization(format!("Failed to write CSV: {e}"));
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(["index", "type", "ticker", "shares", "price", "total", "date"])
            .map_err(csv_error)?;
        for (index, tx) in self.transactions().iter().enumerate() {
            writer
                .write_record([
                    index.to_string(),
                    tx.kind.to_string(),
                    tx.ticker.clone(),
                    tx.shares.to_string(),
                    tx.price.to_string(),
                    tx.total().to_string(),
                    tx.date.clone().unwrap_or_default(),
                ])
                .map_err(csv_error)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| CoreError::Serialization(format!("Failed to flush CSV: {e}")))?;
        String::from_utf8(bytes).map_err(|e| CoreError::Serialization(format!("CSV is not UTF-8: {e}")))
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Surface an error as a transient banner and pass it through.
    fn report<T>(&mut self, result: Result<T, CoreError>) -> Result<T, CoreError> {
        if let Err(e) = &result {
            warn!(error = %e, "operation failed");
            self.state.last_error = Some(e.to_string());
            self.notify(NotificationKind::Error, format!("Error: {e}"));
        }
        result
    }

    /// Bring an imported snapshot in line with what the services would have
    /// written: uppercase ticker keys, no duplicate watchlist entries and only
    /// valid transactions and prices.
    fn checked_snapshot(&self, snapshot: StoreSnapshot) -> Result<StoreSnapshot, CoreError> {
        let mut watchlist: Vec<String> = Vec::with_capacity(snapshot.watchlist.len());
        for raw in &snapshot.watchlist {
            let ticker = normalize_ticker(raw)?;
            if !watchlist.iter().any(|t| same_ticker(t, &ticker)) {
                watchlist.push(ticker);
            }
        }

        let mut notes: NotesByTicker = BTreeMap::new();
        for (raw, entries) in snapshot.notes {
            let ticker = normalize_ticker(&raw)?;
            if !entries.is_empty() {
                notes.entry(ticker).or_default().extend(entries);
            }
        }

        let portfolio = snapshot
            .portfolio
            .into_iter()
            .enumerate()
            .map(|(index, tx)| {
                self.portfolio_service.validate(tx.into()).map_err(|e| match e {
                    CoreError::ValidationError(msg) => {
                        CoreError::ValidationError(format!("Transaction #{index} in import: {msg}"))
                    }
                    other => other,
                })
            })
            .collect::<Result<Ledger, CoreError>>()?;

        let mut latest_prices = LatestPrices::new();
        for (raw, price) in snapshot.latest_prices {
            let ticker = normalize_ticker(&raw)?;
            if !price.is_finite() || price < 0.0 {
                return Err(CoreError::ValidationError(format!(
                    "Invalid price for {ticker} in import: {price}"
                )));
            }
            latest_prices.insert(ticker, price);
        }

        Ok(StoreSnapshot {
            watchlist,
            notes,
            portfolio,
            latest_prices,
        })
    }

    fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) {
        let notification = self.notifier.push(kind, message, Utc::now()).clone();
        self.sync.notify(&notification);
    }
}
