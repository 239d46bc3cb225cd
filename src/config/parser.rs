use crate::config::validation::validate;
use crate::config::Config;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn load(content: &str) -> Result<Config, ConfigError> {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        load_config(file.path())
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = load("").unwrap();
        assert_eq!(config.site.base_url, "https://alpha.wallhaven.cc");
        assert_eq!(config.session.file_path, "session.json");
        assert_eq!(config.vault.service_token_path, "service.txt");
        assert_eq!(config.download.directory, "downloads");
    }

    #[test]
    fn test_partial_file_overrides_one_section() {
        let config = load(
            r#"
[site]
base-url = "https://wallhaven.test"

[user-agent]
name = "testgrab"
version = "9.9"
"#,
        )
        .unwrap();
        assert_eq!(config.site.base_url, "https://wallhaven.test");
        assert_eq!(config.user_agent.full_value(), "testgrab/9.9");
        assert_eq!(config.session.file_path, "session.json");
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        assert!(matches!(load("[site"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_invalid_base_url_fails_validation() {
        let result = load(
            r#"
[site]
base-url = "not a url"
"#,
        );
        assert!(matches!(result, Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_config(Path::new("/nonexistent/wallgrab.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
