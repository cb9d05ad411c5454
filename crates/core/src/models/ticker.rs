use crate::errors::CoreError;

/// Normalize a user-entered ticker: trimmed and uppercased.
///
/// Returns a validation error for an empty symbol or one containing
/// characters no exchange uses (anything besides letters, digits, `.`, `-`, `^`).
pub fn normalize_ticker(raw: &str) -> Result<String, CoreError> {
    let ticker = raw.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(CoreError::ValidationError("Ticker is required".into()));
    }
    if let Some(bad) = ticker
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^')))
    {
        return Err(CoreError::ValidationError(format!(
            "Invalid character '{bad}' in ticker '{ticker}'"
        )));
    }
    Ok(ticker)
}

/// Case-insensitive ticker comparison.
pub fn same_ticker(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}
