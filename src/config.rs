use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Port the ratings backend listens on.
const RATINGS_PORT: u16 = 9080;

const DEFAULT_CONFIG_PATH: &str = "config.toml";
const DEFAULT_RATINGS_HOSTNAME: &str = "ratings";
const DEFAULT_STAR_COLOR: &str = "black";

const SHORT_TIMEOUT: Duration = Duration::from_millis(2500);
const LONG_TIMEOUT: Duration = Duration::from_millis(10000);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid PORT value: {0:?}")]
    InvalidPort(String),
}

/// Process-wide configuration, resolved once at startup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub ratings: RatingsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RatingsConfig {
    pub enabled: bool,
    /// Appended to the hostname as `.<domain>` when non-empty.
    pub services_domain: String,
    pub hostname: String,
    /// Display color for stars. Also selects the backend timeout.
    pub star_color: String,
}

impl Default for RatingsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            services_domain: String::new(),
            hostname: DEFAULT_RATINGS_HOSTNAME.to_string(),
            star_color: DEFAULT_STAR_COLOR.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the optional TOML file named by
    /// `REVIEWS_CONFIG` (or `config.toml`), then environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("REVIEWS_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config: AppConfig =
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.ratings.fill_defaults();
        Ok(config)
    }

    /// Overlay environment variables, read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("ENABLE_RATINGS") {
            self.ratings.enabled = parse_bool(&value).unwrap_or(false);
        }
        if let Some(value) = lookup("SERVICES_DOMAIN") {
            self.ratings.services_domain = value;
        }
        if let Some(value) = lookup("RATINGS_HOSTNAME") {
            self.ratings.hostname = value;
        }
        if let Some(value) = lookup("STAR_COLOR") {
            self.ratings.star_color = value;
        }
        if let Some(value) = lookup("PORT") {
            self.server.port = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(value))?;
        }

        self.ratings.fill_defaults();
        Ok(())
    }
}

impl RatingsConfig {
    fn fill_defaults(&mut self) {
        if self.hostname.is_empty() {
            self.hostname = DEFAULT_RATINGS_HOSTNAME.to_string();
        }
        if self.star_color.is_empty() {
            self.star_color = DEFAULT_STAR_COLOR.to_string();
        }
    }

    /// `http://<hostname>[.<domain>]:9080/ratings`
    pub fn base_url(&self) -> String {
        let suffix = if self.services_domain.is_empty() {
            String::new()
        } else {
            format!(".{}", self.services_domain)
        };
        format!(
            "http://{}{}:{}/ratings",
            self.hostname, suffix, RATINGS_PORT
        )
    }

    /// Long timeout when the star color is "black", short otherwise.
    // NOTE: keyed off the display color, kept as deployed until product confirms.
    pub fn timeout(&self) -> Duration {
        if self.star_color == DEFAULT_STAR_COLOR {
            LONG_TIMEOUT
        } else {
            SHORT_TIMEOUT
        }
    }
}

/// Boolean grammar accepted for `ENABLE_RATINGS`.
fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
