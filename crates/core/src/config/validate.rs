use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - In-service slot limit, when set, is not 0
/// - Default service minutes is positive
/// - Snapshot key is not empty when snapshots are enabled
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.queue.max_in_service == Some(0) {
        return Err(ConfigError::ValidationError(
            "queue.max_in_service cannot be 0 (omit it for no limit)".to_string(),
        ));
    }

    if config.queue.default_service_minutes == 0 {
        return Err(ConfigError::ValidationError(
            "queue.default_service_minutes must be positive".to_string(),
        ));
    }

    if config.snapshot.enabled && config.snapshot.key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "snapshot.key cannot be empty".to_string(),
        ));
    }

    Ok(())
}
