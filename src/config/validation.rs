use crate::config::types::{Config, OutputConfig, TargetConfig, UserAgentConfig};
use crate::url::normalize_base_url;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
///
/// The username and the resource toggles are not checked here: they can be
/// overridden on the command line and are validated by the scrape coordinator
/// before any request is made.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_target_config(&config.target)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

fn validate_target_config(config: &TargetConfig) -> Result<(), ConfigError> {
    normalize_base_url(&config.base_url)?;

    if config.username.chars().any(|c| c.is_whitespace() || c == '/') {
        return Err(ConfigError::Validation(format!(
            "username must not contain whitespace or '/', got '{}'",
            config.username
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.name.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent name cannot be empty".to_string(),
        ));
    }

    if !config
        .name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "user-agent name must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.name
        )));
    }

    if config.version.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent version cannot be empty".to_string(),
        ));
    }

    if let Some(contact) = &config.contact_url {
        Url::parse(contact)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }
    Ok(())
}
