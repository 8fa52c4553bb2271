//! JIRA account configuration.

use serde::{Deserialize, Serialize};

use super::{ConfigError, Result};

/// Connection details for a JIRA instance.
///
/// The API token is deliberately not part of the profile: it comes from the
/// environment or the OS keyring and is never written to the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    /// The JIRA instance URL (e.g., "https://company.atlassian.net").
    #[serde(default)]
    pub url: String,

    /// The account email used for Basic Auth.
    #[serde(default)]
    pub email: String,
}

impl Profile {
    /// Create a new profile.
    #[cfg(test)]
    pub fn new(url: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            email: email.into(),
        }
    }

    /// Validate this profile.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingCredential` for an empty URL or email and
    /// `ConfigError::ValidationError` for a malformed one.
    pub fn validate(&self) -> Result<()> {
        if self.url.is_empty() {
            return Err(ConfigError::MissingCredential("JIRA_URL"));
        }

        if !self.url.starts_with("https://") && !self.url.starts_with("http://") {
            return Err(ConfigError::ValidationError(format!(
                "URL '{}' must start with http:// or https://",
                self.url
            )));
        }

        if self.email.is_empty() {
            return Err(ConfigError::MissingCredential("JIRA_EMAIL"));
        }

        if !self.email.contains('@') {
            return Err(ConfigError::ValidationError(format!(
                "'{}' does not appear to be a valid email address",
                self.email
            )));
        }

        Ok(())
    }
}
