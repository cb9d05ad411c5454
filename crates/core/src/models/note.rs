use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A free-text note attached to a ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    #[serde(default)]
    pub title: String,

    pub content: String,

    /// Creation time, stored as an ISO-8601 string.
    pub timestamp: DateTime<Utc>,
}

impl Note {
    pub fn new(title: impl Into<String>, content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            timestamp,
        }
    }
}
