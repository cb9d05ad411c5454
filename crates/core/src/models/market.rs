use serde::{Deserialize, Serialize};

use super::quote::lenient_f64;

/// Look-back window accepted by the chart endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChartPeriod {
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "3m")]
    ThreeMonths,
    #[default]
    #[serde(rename = "6m")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "5y")]
    FiveYears,
}

impl ChartPeriod {
    pub const ALL: [ChartPeriod; 5] = [
        ChartPeriod::OneMonth,
        ChartPeriod::ThreeMonths,
        ChartPeriod::SixMonths,
        ChartPeriod::OneYear,
        ChartPeriod::FiveYears,
    ];

    /// Query-string value sent to the backend.
    pub fn as_param(&self) -> &'static str {
        match self {
            ChartPeriod::OneMonth => "1m",
            ChartPeriod::ThreeMonths => "3m",
            ChartPeriod::SixMonths => "6m",
            ChartPeriod::OneYear => "1y",
            ChartPeriod::FiveYears => "5y",
        }
    }
}

impl std::fmt::Display for ChartPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_param())
    }
}

impl std::str::FromStr for ChartPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ChartPeriod::ALL
            .into_iter()
            .find(|p| p.as_param() == wanted)
            .ok_or_else(|| format!("unknown period '{s}' (expected 1m, 3m, 6m, 1y or 5y)"))
    }
}

/// One row of the backend's search history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub ticker: String,
    pub timestamp: String,
    #[serde(default)]
    pub api_timestamp: Option<String>,
}

/// Daily close and volume for the price chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub date: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub close: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub volume: Option<f64>,
}

/// Periodic return, as a fraction (0.01 = 1%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnPoint {
    pub date: String,
    #[serde(rename = "return", default, deserialize_with = "lenient_f64")]
    pub value: Option<f64>,
}

/// Beta and volatility of a ticker against the market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetaReport {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub beta: Option<f64>,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub annualized_volatility: Option<f64>,
}

/// Envelope shared by `/historical` and `/returns`.
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of `/beta`.
#[derive(Debug, Clone, Deserialize)]
pub struct BetaResponse {
    #[serde(flatten)]
    pub report: BetaReport,
    #[serde(default)]
    pub error: Option<String>,
}

/// Everything the charts panel shows for the active ticker.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartData {
    pub ticker: String,
    pub period: ChartPeriod,
    pub prices: Vec<HistoricalPoint>,
    pub returns: Vec<ReturnPoint>,
    pub beta: Option<BetaReport>,
}
