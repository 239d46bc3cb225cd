//! Configuration module
//!
//! Loads and validates the optional TOML configuration file. Every
//! section has a sensible default, so running without a config file is
//! supported.
//!
//! # Example
//!
//! ```no_run
//! use wallgrab::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("wallgrab.toml")).unwrap();
//! println!("Crawling {}", config.site.base_url);
//! ```

mod parser;
mod validation;

pub use parser::load_config;
pub use validation::validate;

use crate::session::DEFAULT_USER_AGENT;
use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub vault: VaultConfig,
    #[serde(default)]
    pub download: DownloadConfig,
}

/// Destination site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Base URL of the search site
    #[serde(rename = "base-url")]
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://alpha.wallhaven.cc".to_string(),
        }
    }
}

/// User agent identification
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub name: String,

    /// Version of the crawler
    pub version: String,
}

impl UserAgentConfig {
    /// The full header value, e.g. `wallgrab/1.0`.
    pub fn full_value(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        let (name, version) = DEFAULT_USER_AGENT
            .split_once('/')
            .unwrap_or((DEFAULT_USER_AGENT, "0"));
        Self {
            name: name.to_string(),
            version: version.to_string(),
        }
    }
}

/// Persisted session configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Path of the serialized session blob
    #[serde(rename = "file-path")]
    pub file_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            file_path: "session.json".to_string(),
        }
    }
}

/// Credential vault configuration
#[derive(Debug, Clone, Deserialize)]
pub struct VaultConfig {
    /// Path of the per-install service token file
    #[serde(rename = "service-token-path")]
    pub service_token_path: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            service_token_path: "service.txt".to_string(),
        }
    }
}

/// Download destination configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadConfig {
    /// Directory downloaded payloads are written into
    pub directory: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            directory: "downloads".to_string(),
        }
    }
}
