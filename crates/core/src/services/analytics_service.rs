use std::collections::HashMap;

use crate::errors::CoreError;
use crate::models::analytics::{BetaSummary, Comparison, ComparisonRow, PerformanceResult};
use crate::models::market::{BetaReport, ReturnPoint};
use crate::view::format::{format_number, format_percent, NOT_AVAILABLE};

/// Client-side calculators: performance, return comparison, beta display.
///
/// Pure functions over already-fetched data. No I/O.
pub struct AnalyticsService;

impl AnalyticsService {
    pub fn new() -> Self {
        Self
    }

    /// Total and annualized (CAGR) return of an investment.
    ///
    /// `years` may be fractional. Returns are `None` when they are undefined
    /// (non-positive initial value, non-positive period).
    pub fn performance(
        &self,
        initial_value: f64,
        final_value: f64,
        years: f64,
    ) -> Result<PerformanceResult, CoreError> {
        for (label, v) in [("initial value", initial_value), ("final value", final_value), ("years", years)] {
            if !v.is_finite() {
                return Err(CoreError::ValidationError(format!("{label} must be a finite number")));
            }
        }
        if final_value < 0.0 {
            return Err(CoreError::ValidationError("final value must not be negative".into()));
        }

        let gain = final_value - initial_value;
        let total_return_pct = (initial_value > 0.0).then(|| gain / initial_value * 100.0);
        let annualized_return_pct = (initial_value > 0.0 && years > 0.0)
            .then(|| ((final_value / initial_value).powf(1.0 / years) - 1.0) * 100.0);

        Ok(PerformanceResult {
            initial_value,
            final_value,
            years,
            gain,
            total_return_pct,
            annualized_return_pct,
        })
    }

    /// Align two return series on their shared dates (in the order of
    /// `first`) and compound each side over those dates.
    /// Points without a value are skipped.
    pub fn compare(
        &self,
        first_ticker: &str,
        first: &[ReturnPoint],
        second_ticker: &str,
        second: &[ReturnPoint],
    ) -> Comparison {
        let second_by_date: HashMap<&str, f64> = second
            .iter()
            .filter_map(|p| p.value.map(|v| (p.date.as_str(), v)))
            .collect();

        let rows: Vec<ComparisonRow> = first
            .iter()
            .filter_map(|p| {
                let a = p.value?;
                let b = *second_by_date.get(p.date.as_str())?;
                Some(ComparisonRow {
                    date: p.date.clone(),
                    first: a,
                    second: b,
                    spread: a - b,
                })
            })
            .collect();

        let first_cumulative = compound(rows.iter().map(|r| r.first));
        let second_cumulative = compound(rows.iter().map(|r| r.second));

        Comparison {
            first_ticker: first_ticker.to_uppercase(),
            second_ticker: second_ticker.to_uppercase(),
            rows,
            first_cumulative,
            second_cumulative,
        }
    }

    /// Display strings for a beta report. Volatility arrives as a fraction.
    pub fn beta_summary(&self, report: &BetaReport) -> BetaSummary {
        BetaSummary {
            beta: report.beta.map(format_number).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            risk_level: report
                .risk_level
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(NOT_AVAILABLE)
                .to_string(),
            annualized_volatility: report
                .annualized_volatility
                .map(|v| format_percent(v * 100.0))
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }
}

fn compound(returns: impl Iterator<Item = f64>) -> f64 {
    returns.fold(1.0, |acc, r| acc * (1.0 + r)) - 1.0
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}
