use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::market::{
    BetaReport, BetaResponse, ChartPeriod, HistoricalPoint, HistoryEntry, ReturnPoint,
    SeriesResponse,
};
use crate::models::quote::{RawSearchResponse, SearchResult};
use super::traits::StockApi;

/// [`StockApi`] over HTTP against the lookup backend.
///
/// The backend answers errors with a JSON body (`{"error": "..."}`) and a
/// non-2xx status, so bodies are decoded regardless of status.
pub struct HttpStockApi {
    client: Client,
    base_url: String,
}

impl HttpStockApi {
    /// `timeout_secs = None` leaves requests without a deadline.
    pub fn new(base_url: impl Into<String>, timeout_secs: Option<u64>) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = match timeout_secs {
            Some(secs) => builder.timeout(Duration::from_secs(secs)),
            None => builder,
        };
        #[cfg(target_arch = "wasm32")]
        let _ = timeout_secs;
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, CoreError> {
        let url = format!("{}/{endpoint}", self.base_url);
        debug!(%endpoint, ?query, "backend request");
        let resp = self.client.get(&url).query(query).send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        serde_json::from_str(&text).map_err(|e| {
            if status.is_success() {
                CoreError::Deserialization(format!("Failed to parse /{endpoint} response: {e}"))
            } else {
                CoreError::Api {
                    endpoint: endpoint.to_string(),
                    message: format!("HTTP {status}"),
                }
            }
        })
    }
}

fn api_error(endpoint: &str, message: String) -> CoreError {
    CoreError::Api {
        endpoint: endpoint.to_string(),
        message,
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl StockApi for HttpStockApi {
    async fn search(&self, ticker: &str) -> Result<SearchResult, CoreError> {
        let resp: RawSearchResponse = self.get_json("search", &[("ticker", ticker)]).await?;
        if let Some(message) = resp.error {
            return Err(api_error("search", message));
        }
        let company = resp
            .company
            .ok_or_else(|| api_error("search", "response has no company section".into()))?;
        Ok(SearchResult::from_raw(company, resp.stock.unwrap_or_default(), ticker))
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>, CoreError> {
        self.get_json("history", &[]).await
    }

    async fn historical(
        &self,
        ticker: &str,
        period: ChartPeriod,
    ) -> Result<Vec<HistoricalPoint>, CoreError> {
        let resp: SeriesResponse<HistoricalPoint> = self
            .get_json("historical", &[("ticker", ticker), ("period", period.as_param())])
            .await?;
        match resp.error {
            Some(message) => Err(api_error("historical", message)),
            None => Ok(resp.data),
        }
    }

    async fn returns(&self, ticker: &str, period: ChartPeriod) -> Result<Vec<ReturnPoint>, CoreError> {
        let resp: SeriesResponse<ReturnPoint> = self
            .get_json("returns", &[("ticker", ticker), ("period", period.as_param())])
            .await?;
        match resp.error {
            Some(message) => Err(api_error("returns", message)),
            None => Ok(resp.data),
        }
    }

    async fn beta(&self, ticker: &str, period: ChartPeriod) -> Result<BetaReport, CoreError> {
        let resp: BetaResponse = self
            .get_json("beta", &[("ticker", ticker), ("period", period.as_param())])
            .await?;
        match resp.error {
            Some(message) => Err(api_error("beta", message)),
            None => Ok(resp.report),
        }
    }
}
