//! omni.toml configuration parser.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Schema cache location used when none is configured.
pub const DEFAULT_CACHE_DIR: &str = "cache/omniinterface/payloadstructs";

/// How to treat responses that are neither an exception nor a rowset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    /// Unknown shapes and unparseable bodies yield an empty result.
    #[default]
    Lenient,
    /// Unknown shapes and unparseable bodies are protocol errors.
    Strict,
}

/// Connection settings for one ObjectServer REST endpoint.
#[derive(Clone, Serialize, Deserialize)]
pub struct OmniConfig {
    /// Base URL, e.g. `http://host:8080/objectserver/restapi`.
    pub url: String,
    pub user: String,
    pub password: String,
    /// Per-request timeout in seconds. Absent or zero waits indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<f64>,
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    #[serde(default)]
    pub response_mode: ResponseMode,
}

impl fmt::Debug for OmniConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OmniConfig")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .field("cache_dir", &self.cache_dir)
            .field("response_mode", &self.response_mode)
            .finish()
    }
}

impl OmniConfig {
    pub fn new(url: &str, user: &str, password: &str) -> Self {
        Self {
            url: url.to_string(),
            user: user.to_string(),
            password: password.to_string(),
            timeout_secs: None,
            cache_dir: None,
            response_mode: ResponseMode::default(),
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: OmniConfig = toml::from_str(content)?;
        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = Some(timeout.as_secs_f64());
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    pub fn with_response_mode(mut self, mode: ResponseMode) -> Self {
        self.response_mode = mode;
        self
    }

    /// Effective request timeout. `None` means no limit.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|secs| *secs > 0.0)
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }

    /// Effective schema cache directory.
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR))
    }
}
