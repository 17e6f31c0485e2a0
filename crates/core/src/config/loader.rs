use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "FILA_";

/// Load configuration from file with environment variable overrides.
///
/// Overrides use a double underscore between nesting levels so that
/// snake_case field names survive intact:
///
/// - `FILA_SERVER__PORT=9000` sets `server.port`
/// - `FILA_QUEUE__MAX_IN_SERVICE=2` sets `queue.max_in_service`
/// - `FILA_QUEUE__SERVICE_MINUTES__VACINA=5` sets one entry of the table
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    figment(path)
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}
