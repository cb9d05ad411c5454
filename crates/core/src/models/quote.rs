use serde::{Deserialize, Deserializer, Serialize};

// ── Raw backend payloads ────────────────────────────────────────────
//
// The backend forwards upstream JSON mostly untouched, so field names vary
// between providers and numbers sometimes arrive as strings or "N/A".
// These types accept all of that; nothing outside this module sees them.

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCompany {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub exchange_code: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub industry_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStock {
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub last: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub last_close: Option<f64>,
    #[serde(default, rename = "prevClose", deserialize_with = "lenient_f64")]
    pub prev_close: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub open: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub high: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub low: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub volume: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub change: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub change_percent: Option<f64>,
}

/// Body of `GET /search`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSearchResponse {
    #[serde(default)]
    pub company: Option<RawCompany>,
    #[serde(default)]
    pub stock: Option<RawStock>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Accepts a JSON number, a numeric string, `null`, or any placeholder
/// string such as `"N/A"` (mapped to `None`).
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|v| v.is_finite()))
}

// ── Canonical records ───────────────────────────────────────────────

/// Company metadata shown in the outlook panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub name: String,
    pub ticker: String,
    pub exchange_code: Option<String>,
    pub start_date: Option<String>,
    pub description: Option<String>,
    pub industry: Option<String>,
}

impl CompanyProfile {
    pub fn from_raw(raw: RawCompany, requested: &str) -> Self {
        let ticker = non_blank(raw.ticker)
            .map(|t| t.to_uppercase())
            .unwrap_or_else(|| requested.to_string());
        let name = non_blank(raw.name)
            .map(|n| strip_share_class(&n).to_string())
            .unwrap_or_else(|| ticker.clone());
        Self {
            name,
            ticker,
            exchange_code: non_blank(raw.exchange_code),
            start_date: non_blank(raw.start_date),
            description: non_blank(raw.description),
            industry: non_blank(raw.industry).or_else(|| non_blank(raw.industry_code)),
        }
    }
}

/// Direction of the last price move relative to the previous close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceDirection {
    Up,
    Down,
    Flat,
}

/// Latest trading data shown in the summary panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockQuote {
    pub ticker: String,
    pub trading_day: Option<String>,
    pub last: Option<f64>,
    pub prev_close: Option<f64>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub volume: Option<f64>,
    pub change: Option<f64>,
    pub change_percent: Option<f64>,
}

impl StockQuote {
    pub fn from_raw(raw: RawStock, requested: &str) -> Self {
        let last = raw.last.or(raw.last_close);
        let change = raw.change.or_else(|| match (last, raw.prev_close) {
            (Some(last), Some(prev)) => Some(round2(last - prev)),
            _ => None,
        });
        let change_percent = raw.change_percent.or_else(|| match (change, raw.prev_close) {
            (Some(change), Some(prev)) if prev != 0.0 => Some(round2(change / prev * 100.0)),
            _ => None,
        });
        let trading_day = non_blank(raw.timestamp)
            .and_then(|ts| ts.split('T').next().map(str::to_string));

        Self {
            ticker: non_blank(raw.ticker)
                .map(|t| t.to_uppercase())
                .unwrap_or_else(|| requested.to_string()),
            trading_day,
            last,
            prev_close: raw.prev_close,
            open: raw.open,
            high: raw.high,
            low: raw.low,
            volume: raw.volume,
            change,
            change_percent,
        }
    }

    /// Best available price for caching and valuation:
    /// last trade, falling back to the previous close.
    pub fn reference_price(&self) -> Option<f64> {
        self.last.or(self.prev_close)
    }

    pub fn direction(&self) -> Option<PriceDirection> {
        self.change.map(|c| {
            if c > 0.0 {
                PriceDirection::Up
            } else if c < 0.0 {
                PriceDirection::Down
            } else {
                PriceDirection::Flat
            }
        })
    }
}

/// Normalized result of a successful search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub company: CompanyProfile,
    pub quote: StockQuote,
}

impl SearchResult {
    pub fn from_raw(company: RawCompany, stock: RawStock, requested: &str) -> Self {
        Self {
            company: CompanyProfile::from_raw(company, requested),
            quote: StockQuote::from_raw(stock, requested),
        }
    }
}

/// Drop a trailing share-class suffix such as `" - Class A"`.
pub fn strip_share_class(name: &str) -> &str {
    let trimmed = name.trim_end();
    if let Some(idx) = trimmed.rfind(" - Class ") {
        let suffix = &trimmed[idx + " - Class ".len()..];
        if suffix.len() == 1 && suffix.chars().all(|c| c.is_ascii_uppercase()) {
            return &trimmed[..idx];
        }
    }
    trimmed
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
