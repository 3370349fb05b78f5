//! Security properties.
//!
//! ```toml
//! [ignored]
//! urls = ["/actuator/**", "/favicon.ico"]
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::http::error::ConfigError;

/// Root of the security properties file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SecurityProperties {
    ignored: IgnoredUrlsProperties,
}

impl SecurityProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::Parse)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    pub fn ignored(&self) -> &IgnoredUrlsProperties {
        &self.ignored
    }

    pub fn with_ignored(mut self, ignored: IgnoredUrlsProperties) -> Self {
        self.ignored = ignored;
        self
    }
}

/// Statically configured patterns that never require authentication.
///
/// They seed the exemption set before route discovery runs.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IgnoredUrlsProperties {
    urls: Vec<String>,
}

impl IgnoredUrlsProperties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.urls.push(url.into());
        self
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }
}
