use serde::{Deserialize, Serialize};

/// Valuation of every open holding against the latest-price cache.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioValuation {
    /// One row per holding with shares > 0, sorted by ticker
    pub rows: Vec<HoldingValuation>,

    /// Sum of `shares × price` over rows with a known price
    pub total_value: f64,

    /// Sum of running cost over all rows
    pub total_cost: f64,

    /// Number of rows with a known price
    pub priced_holdings: usize,
}

/// Valuation of a single holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingValuation {
    pub ticker: String,

    pub shares: f64,

    /// Running cost (`Σ buy − Σ sell` of `shares × price`)
    pub cost: f64,

    pub average_cost: Option<f64>,

    /// Cached price, `None` when the ticker has never been looked up
    pub price: Option<f64>,

    pub market_value: Option<f64>,

    pub gain_loss: Option<f64>,

    pub gain_loss_pct: Option<f64>,
}

/// Output of the performance calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceResult {
    pub initial_value: f64,
    pub final_value: f64,
    pub years: f64,

    /// `final_value - initial_value`
    pub gain: f64,

    /// Simple return in percent, `None` when the initial value is not positive
    pub total_return_pct: Option<f64>,

    /// Compound annual growth rate in percent
    pub annualized_return_pct: Option<f64>,
}

/// One aligned date of the comparison tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub date: String,
    pub first: f64,
    pub second: f64,
    /// `first - second`
    pub spread: f64,
}

/// Two return series compared over their shared dates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub first_ticker: String,
    pub second_ticker: String,
    pub rows: Vec<ComparisonRow>,
    /// Compounded return of the first series over the aligned dates
    pub first_cumulative: f64,
    /// Compounded return of the second series over the aligned dates
    pub second_cumulative: f64,
}

/// Display-ready beta figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetaSummary {
    pub beta: String,
    pub risk_level: String,
    pub annualized_volatility: String,
}
