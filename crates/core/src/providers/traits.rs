use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::market::{BetaReport, ChartPeriod, HistoricalPoint, HistoryEntry, ReturnPoint};
use crate::models::quote::SearchResult;

/// The lookup backend, seen from the client.
///
/// Every method maps one endpoint. Implementations return normalized
/// records; a body carrying an `error` field becomes [`CoreError::Api`].
/// Tests substitute in-memory mocks.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait StockApi: Send + Sync {
    /// `GET /search?ticker=`: company profile and latest quote.
    async fn search(&self, ticker: &str) -> Result<SearchResult, CoreError>;

    /// `GET /history`: most recent searches, newest first.
    async fn history(&self) -> Result<Vec<HistoryEntry>, CoreError>;

    /// `GET /historical?ticker=&period=`: daily closes and volumes.
    async fn historical(
        &self,
        ticker: &str,
        period: ChartPeriod,
    ) -> Result<Vec<HistoricalPoint>, CoreError>;

    /// `GET /returns?ticker=&period=`: periodic returns.
    async fn returns(&self, ticker: &str, period: ChartPeriod) -> Result<Vec<ReturnPoint>, CoreError>;

    /// `GET /beta?ticker=&period=`: beta, risk level and volatility.
    async fn beta(&self, ticker: &str, period: ChartPeriod) -> Result<BetaReport, CoreError>;
}
