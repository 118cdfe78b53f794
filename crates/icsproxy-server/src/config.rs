//! Server configuration.
//!
//! Settings live in an optional `config.toml` under a `[server]` table,
//! `~/.config/icsproxy/config.toml` by default:
//!
//! ```toml
//! [server]
//! listen = "0.0.0.0:8787"
//! default_ics_url = "https://calendar.google.com/calendar/ical/.../basic.ics"
//! default_max_results = 200
//! ```
//!
//! The loaded value is handed to the router at construction; request
//! handling never reads files or the environment.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for [`ServerConfig`].
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub listen: SocketAddr,

    /// Calendar URL used when a request has no `ics` parameter.
    pub default_ics_url: Option<String>,

    /// Longest accepted source URL, in characters.
    pub max_url_length: usize,

    /// Result cap when `maxResults` is absent or unusable.
    pub default_max_results: usize,

    /// User agent sent upstream.
    pub user_agent: String,

    /// `Cache-Control` value on successful responses.
    pub cache_control: String,
}

impl ServerConfig {
    /// Default listen address.
    pub const DEFAULT_LISTEN: ([u8; 4], u16) = ([127, 0, 0, 1], 8787);

    /// Default maximum URL length.
    pub const DEFAULT_MAX_URL_LENGTH: usize = 1000;

    /// Default result cap.
    pub const DEFAULT_MAX_RESULTS: usize = 200;

    /// 120 seconds fresh at the shared cache, then served stale for up to
    /// 600 seconds while revalidating.
    pub const DEFAULT_CACHE_CONTROL: &'static str =
        "public, s-maxage=120, stale-while-revalidate=600";

    /// Loads configuration from the default path, or defaults if it does not exist.
    pub fn load() -> ConfigResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses the `[server]` table out of a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<ConfigFile>(content).map(|file| file.server)
    }

    /// Renders the configuration as a `config.toml` document.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&ConfigFileRef { server: self })
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("icsproxy")
            .join("config.toml")
    }

    /// Builder: set the listen address.
    pub fn with_listen(mut self, listen: SocketAddr) -> Self {
        self.listen = listen;
        self
    }

    /// Builder: set the fallback calendar URL.
    pub fn with_default_ics_url(mut self, url: impl Into<String>) -> Self {
        self.default_ics_url = Some(url.into());
        self
    }

    /// Builder: set the maximum URL length.
    pub fn with_max_url_length(mut self, max: usize) -> Self {
        self.max_url_length = max;
        self
    }

    /// Builder: set the default result cap.
    pub fn with_default_max_results(mut self, max: usize) -> Self {
        self.default_max_results = max;
        self
    }

    /// Builder: set the upstream user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        let (ip, port) = Self::DEFAULT_LISTEN;
        Self {
            listen: SocketAddr::from((ip, port)),
            default_ics_url: None,
            max_url_length: Self::DEFAULT_MAX_URL_LENGTH,
            default_max_results: Self::DEFAULT_MAX_RESULTS,
            user_agent: format!("icsproxy/{}", env!("CARGO_PKG_VERSION")),
            cache_control: Self::DEFAULT_CACHE_CONTROL.to_string(),
        }
    }
}

/// On-disk layout of `config.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    server: ServerConfig,
}

#[derive(Serialize)]
struct ConfigFileRef<'a> {
    server: &'a ServerConfig,
}
