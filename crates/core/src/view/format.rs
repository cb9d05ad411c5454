//! Display formatting shared by every panel.
//!
//! Stored and derived numbers are never rounded; rounding happens here,
//! at render time only, so formatting the same value twice gives the same text.

/// Placeholder for a value that is not known.
pub const NOT_AVAILABLE: &str = "N/A";

/// Placeholder for a watchlist price that has not been looked up yet.
pub const PRICE_PENDING: &str = "Loading...";

/// Monetary amount, two decimals, e.g. `1234.50` → `"$1,234.50"`.
pub fn format_money(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let digits = format!("{:.2}", value.abs());
    let sign = if value < 0.0 && digits != "0.00" { "-" } else { "" };
    format!("{sign}${}", group_thousands(&digits))
}

pub fn format_money_opt(value: Option<f64>) -> String {
    value.map(format_money).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Plain number with two decimals (prices in the summary table).
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    format!("{value:.2}")
}

pub fn format_number_opt(value: Option<f64>) -> String {
    value.map(format_number).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Percent value (already scaled), e.g. `1.234` → `"1.23%"`.
pub fn format_percent(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    format!("{value:.2}%")
}

pub fn format_percent_opt(value: Option<f64>) -> String {
    value.map(format_percent).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Share counts: whole numbers without decimals, fractions with up to four.
pub fn format_shares(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        let text = format!("{value:.4}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Traded volume with thousands separators, e.g. `"12,345,678"`.
pub fn format_volume_opt(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => group_thousands(&format!("{:.0}", v.round())),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };
    let mut grouped = String::with_capacity(sign.len() + int_part.len() + int_part.len() / 3);
    grouped.push_str(sign);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    match frac_part {
        Some(f) => format!("{grouped}.{f}"),
        None => grouped,
    }
}
