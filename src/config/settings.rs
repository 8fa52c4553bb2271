//! Application settings configuration.

use serde::{Deserialize, Serialize};

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Query run on startup; empty or absent means start with an empty list.
    pub default_query: Option<String>,
    /// Event loop tick rate in milliseconds (spinner and toast animation).
    pub tick_rate_ms: u64,
    /// Page size requested per search.
    pub max_results: u32,
}

impl Settings {
    /// The default query, if one is configured and non-blank.
    pub fn startup_query(&self) -> Option<&str> {
        self.default_query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_query: None,
            tick_rate_ms: 100,
            max_results: 50,
        }
    }
}
