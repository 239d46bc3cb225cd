//! Wallgrab: a session-aware crawler for the Wallhaven wallpaper search
//!
//! This crate turns a validated search filter into a lazy, restartable
//! stream of discovered wallpapers, maintaining an authenticated session
//! transparently when the filter requires elevated access (NSFW results).

pub mod config;
pub mod crawler;
pub mod filter;
pub mod item;
pub mod session;
pub mod vault;

use thiserror::Error;

/// Main error type for wallgrab operations
#[derive(Debug, Error)]
pub enum WallgrabError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid value `{value}` for filter field `{field}` (allowed: {allowed})")]
    InvalidFilterValue {
        field: &'static str,
        value: String,
        allowed: String,
    },

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP status {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Document parse error: {0}")]
    Parse(String),

    /// Expected terminal condition: the current page has no "next" link.
    ///
    /// Callers must treat this as normal end-of-stream, not failure.
    #[error("No more result pages")]
    NoMorePages,

    #[error("Next-page links on the document disagree on their target")]
    InconsistentPageLinks,

    #[error("No downloadable file found for item {id}")]
    MissingPayload { id: String },

    #[error("Session store error: {0}")]
    SessionStore(#[from] SessionStoreError),

    #[error("Credential vault error: {0}")]
    Vault(#[from] VaultError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WallgrabError {
    /// Returns true if this is the expected end-of-stream signal rather
    /// than a hard failure.
    pub fn is_end_of_pages(&self) -> bool {
        matches!(self, Self::NoMorePages)
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors from the persisted-session store
#[derive(Debug, Error)]
pub enum SessionStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from the credential vault
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    /// Partial deletion: names the fields that could not be removed.
    #[error("Unable to delete stored credential fields: {fields:?}")]
    Delete { fields: Vec<&'static str> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for wallgrab operations
pub type Result<T> = std::result::Result<T, WallgrabError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for vault operations
pub type VaultResult<T> = std::result::Result<T, VaultError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlSession, CrawlState, PageFetcher, ResultsPage};
pub use filter::{ResolutionMode, SearchFilter, SortKey, SortOrder, TimeRange};
pub use item::Item;
pub use session::{Credentials, SessionCache};
pub use vault::CredentialVault;
