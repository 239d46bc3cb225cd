use crate::config::{Config, DownloadConfig, SessionConfig, SiteConfig, UserAgentConfig, VaultConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site(&config.site)?;
    validate_user_agent(&config.user_agent)?;
    validate_session(&config.session)?;
    validate_vault(&config.vault)?;
    validate_download(&config.download)?;
    Ok(())
}

fn validate_site(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url must be http(s), got {}",
            config.base_url
        )));
    }
    Ok(())
}

fn validate_user_agent(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.name.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent name cannot be empty".to_string(),
        ));
    }
    if !config
        .name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "user-agent name must be alphanumeric with hyphens, got {:?}",
            config.name
        )));
    }
    if config.version.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent version cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_session(config: &SessionConfig) -> Result<(), ConfigError> {
    if config.file_path.is_empty() {
        return Err(ConfigError::Validation(
            "session file-path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_vault(config: &VaultConfig) -> Result<(), ConfigError> {
    if config.service_token_path.is_empty() {
        return Err(ConfigError::Validation(
            "vault service-token-path cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_download(config: &DownloadConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "download directory cannot be empty".to_string(),
        ));
    }
    Ok(())
}
