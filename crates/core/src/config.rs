use std::path::PathBuf;

use chrono::Duration;

use crate::errors::CoreError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_DATA_DIR: &str = ".stock-lookup";
pub const DEFAULT_NAMESPACE: &str = "stock-lookup";
pub const DEFAULT_NOTIFICATION_TTL_SECS: i64 = 3;

/// Runtime configuration for the client.
///
/// Nothing here is persisted in the store; it comes from the environment
/// (or a `.env` file loaded by the front-end) on every start.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Root URL of the lookup backend (`/search`, `/history`, ...).
    pub base_url: String,

    /// Directory holding one JSON file per stored document.
    pub data_dir: PathBuf,

    /// Prefix applied to every store key (`<namespace>.watchlist`, ...).
    pub namespace: String,

    /// How long transient notifications stay visible.
    pub notification_ttl_secs: i64,

    /// Optional HTTP timeout. Unset means requests wait indefinitely.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            namespace: DEFAULT_NAMESPACE.to_string(),
            notification_ttl_secs: DEFAULT_NOTIFICATION_TTL_SECS,
            request_timeout_secs: None,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    /// Missing or unparseable values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            base_url: lookup("STOCK_LOOKUP_BASE_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            data_dir: lookup("STOCK_LOOKUP_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            namespace: lookup("STOCK_LOOKUP_NAMESPACE").unwrap_or(defaults.namespace),
            notification_ttl_secs: lookup("STOCK_LOOKUP_NOTIFICATION_TTL_SECS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.notification_ttl_secs),
            request_timeout_secs: lookup("STOCK_LOOKUP_REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse().ok()),
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.base_url.trim().is_empty() {
            return Err(CoreError::ValidationError("base URL must not be empty".into()));
        }
        if self.namespace.trim().is_empty() {
            return Err(CoreError::ValidationError("store namespace must not be empty".into()));
        }
        // Namespaced keys become file names in the data directory.
        if self.namespace.starts_with('.')
            || !self
                .namespace
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        {
            return Err(CoreError::ValidationError(format!(
                "store namespace '{}' may only contain ASCII letters, digits, '.', '-' and '_' and must not start with '.'",
                self.namespace
            )));
        }
        self.notification_ttl()?;
        Ok(())
    }

    /// Notification lifetime as a [`Duration`].
    /// Fails for a non-positive value or one too large to represent.
    pub fn notification_ttl(&self) -> Result<Duration, CoreError> {
        if self.notification_ttl_secs <= 0 {
            return Err(CoreError::ValidationError(format!(
                "notification TTL must be positive, got {}",
                self.notification_ttl_secs
            )));
        }
        Duration::try_seconds(self.notification_ttl_secs).ok_or_else(|| {
            CoreError::ValidationError(format!(
                "notification TTL of {} seconds is out of range",
                self.notification_ttl_secs
            ))
        })
    }
}
