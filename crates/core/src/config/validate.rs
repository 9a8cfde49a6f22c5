use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Extension list is non-empty and every entry starts with a dot
/// - Renamer concurrency is at least 1
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    // Library validation
    if config.library.extensions.is_empty() {
        return Err(ConfigError::ValidationError(
            "library.extensions cannot be empty".to_string(),
        ));
    }
    if let Some(bad) = config
        .library
        .extensions
        .iter()
        .find(|ext| !ext.starts_with('.') || ext.len() < 2)
    {
        return Err(ConfigError::ValidationError(format!(
            "library.extensions entry '{}' must look like '.mp4'",
            bad
        )));
    }

    // Renamer validation
    if config.renamer.concurrency == 0 {
        return Err(ConfigError::ValidationError(
            "renamer.concurrency cannot be 0".to_string(),
        ));
    }

    Ok(())
}
