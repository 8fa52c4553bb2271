//! Configuration management for jiratui.
//!
//! Configuration is resolved once at startup: built-in defaults, then the
//! optional TOML file, then environment variables and command line flags.

mod profile;
mod settings;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

pub use profile::Profile;
pub use settings::Settings;

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform configuration directory could not be determined.
    #[error("could not determine configuration directory")]
    NoConfigDir,

    /// The config file exists but could not be read.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// The config file is not valid TOML for this schema.
    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// A value is present but invalid.
    #[error("invalid configuration: {0}")]
    ValidationError(String),

    /// A required credential was not supplied anywhere.
    #[error("missing required setting {0}")]
    MissingCredential(&'static str),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Values supplied on the command line or through the environment.
///
/// Each `Some` replaces the corresponding file value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub url: Option<String>,
    pub email: Option<String>,
    pub token: Option<String>,
    pub query: Option<String>,
}

/// The resolved application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Application settings.
    #[serde(default)]
    pub settings: Settings,
    /// The JIRA account to connect to.
    #[serde(default)]
    pub profile: Profile,
    /// API token from the environment; never read from or written to disk.
    #[serde(skip)]
    pub token: Option<String>,
}

impl Config {
    /// The default config file path: `<config_dir>/jiratui/config.toml`.
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("jiratui").join("config.toml"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load configuration from `path`, or from the default location.
    ///
    /// A missing file at the default location yields the default
    /// configuration; a missing file that was asked for explicitly is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    debug!(path = %path.display(), "No config file, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        info!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Apply environment and command line overrides.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(url) = overrides.url {
            self.profile.url = url;
        }
        if let Some(email) = overrides.email {
            self.profile.email = email;
        }
        if let Some(query) = overrides.query {
            self.settings.default_query = Some(query);
        }
        self.token = overrides.token.filter(|t| !t.is_empty()).or(self.token);
        self
    }

    /// Check that everything needed to reach JIRA is present and well formed.
    ///
    /// The token may still be absent here; it can come from the keyring.
    pub fn validate(&self) -> Result<()> {
        self.profile.validate()?;
        if self.settings.tick_rate_ms == 0 {
            return Err(ConfigError::ValidationError(
                "tick_rate_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
[settings]
default_query = "assignee = currentUser()"
tick_rate_ms = 250

[profile]
url = "https://company.atlassian.net"
email = "me@company.com"
"#;

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = Config::load(Some(file.path())).unwrap();

        assert_eq!(config.profile.url, "https://company.atlassian.net");
        assert_eq!(config.profile.email, "me@company.com");
        assert_eq!(
            config.settings.startup_query(),
            Some("assignee = currentUser()")
        );
        assert_eq!(config.settings.tick_rate_ms, 250);
        assert_eq!(config.settings.max_results, 50);
        assert!(config.token.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(&dir.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::ReadError(_))));
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[settings\nbroken").unwrap();

        let result = Config::load(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_overrides_win() {
        let config = Config {
            profile: Profile::new("https://file.atlassian.net", "file@example.com"),
            ..Default::default()
        }
        .with_overrides(Overrides {
            url: Some("https://env.atlassian.net".to_string()),
            email: None,
            token: Some("secret".to_string()),
            query: Some("project = X".to_string()),
        });

        assert_eq!(config.profile.url, "https://env.atlassian.net");
        assert_eq!(config.profile.email, "file@example.com");
        assert_eq!(config.token.as_deref(), Some("secret"));
        assert_eq!(config.settings.startup_query(), Some("project = X"));
    }

    #[test]
    fn test_empty_token_override_ignored() {
        let config = Config::default().with_overrides(Overrides {
            token: Some(String::new()),
            ..Default::default()
        });
        assert!(config.token.is_none());
    }

    #[test]
    fn test_validate_requires_url() {
        let config = Config::default();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingCredential("JIRA_URL"))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_tick_rate() {
        let mut config = Config {
            profile: Profile::new("https://x.atlassian.net", "a@b.c"),
            ..Default::default()
        };
        config.settings.tick_rate_ms = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
