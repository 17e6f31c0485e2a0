use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::IpAddr;
use std::path::PathBuf;

use crate::ticket::CodeStyle;

/// Minutes per ticket assumed before any service has been completed.
pub const DEFAULT_SERVICE_MINUTES: u32 = 10;

/// Key of the durable slot holding the queue snapshot.
pub const DEFAULT_SNAPSHOT_KEY: &str = "fila_queue_state_v1";

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub snapshot: SnapshotConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Queue policy configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QueueConfig {
    /// How display codes are built from sequence numbers.
    #[serde(default)]
    pub code_style: CodeStyle,
    /// Maximum tickets in service at once (None = unlimited).
    #[serde(default)]
    pub max_in_service: Option<usize>,
    /// Fallback minutes per ticket for wait estimates.
    #[serde(default = "default_service_minutes")]
    pub default_service_minutes: u32,
    /// Category assigned when a registration names none.
    #[serde(default = "default_category")]
    pub default_category: String,
    /// Expected service minutes per category.
    #[serde(default = "default_service_table")]
    pub service_minutes: BTreeMap<String, u32>,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            code_style: CodeStyle::default(),
            max_in_service: None,
            default_service_minutes: default_service_minutes(),
            default_category: default_category(),
            service_minutes: default_service_table(),
        }
    }
}

impl QueueConfig {
    /// Expected minutes for a category, or the default figure if unknown.
    pub fn minutes_for(&self, category: &str) -> u32 {
        self.service_minutes
            .get(category)
            .copied()
            .unwrap_or(self.default_service_minutes)
    }
}

fn default_service_minutes() -> u32 {
    DEFAULT_SERVICE_MINUTES
}

fn default_category() -> String {
    "consulta".to_string()
}

fn default_service_table() -> BTreeMap<String, u32> {
    [("consulta", 12), ("enfermagem", 8), ("odontologia", 18), ("vacina", 6)]
        .into_iter()
        .map(|(name, minutes)| (name.to_string(), minutes))
        .collect()
}

/// Snapshot persistence configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SnapshotConfig {
    #[serde(default = "default_snapshot_enabled")]
    pub enabled: bool,
    #[serde(default = "default_snapshot_path")]
    pub path: PathBuf,
    #[serde(default = "default_snapshot_key")]
    pub key: String,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            enabled: default_snapshot_enabled(),
            path: default_snapshot_path(),
            key: default_snapshot_key(),
        }
    }
}

fn default_snapshot_enabled() -> bool {
    true
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("fila.db")
}

fn default_snapshot_key() -> String {
    DEFAULT_SNAPSHOT_KEY.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.queue.code_style, CodeStyle::SingleClass);
        assert!(config.queue.max_in_service.is_none());
        assert_eq!(config.queue.default_service_minutes, DEFAULT_SERVICE_MINUTES);
        assert!(config.snapshot.enabled);
        assert_eq!(config.snapshot.path.to_str().unwrap(), "fila.db");
        assert_eq!(config.snapshot.key, DEFAULT_SNAPSHOT_KEY);
    }

    #[test]
    fn test_deserialize_queue_section() {
        let toml = r#"
[queue]
code_style = "per_class"
max_in_service = 1
default_service_minutes = 15
default_category = "clinica"

[queue.service_minutes]
clinica = 20
pediatria = 25
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.queue.code_style, CodeStyle::PerClass);
        assert_eq!(config.queue.max_in_service, Some(1));
        assert_eq!(config.queue.default_service_minutes, 15);
        assert_eq!(config.queue.default_category, "clinica");
        assert_eq!(config.queue.minutes_for("pediatria"), 25);
        // Explicit table replaces the defaults entirely
        assert_eq!(config.queue.minutes_for("vacina"), 15);
    }

    #[test]
    fn test_default_service_table() {
        let queue = QueueConfig::default();
        assert_eq!(queue.minutes_for("consulta"), 12);
        assert_eq!(queue.minutes_for("enfermagem"), 8);
        assert_eq!(queue.minutes_for("odontologia"), 18);
        assert_eq!(queue.minutes_for("vacina"), 6);
        assert_eq!(queue.minutes_for("unknown"), DEFAULT_SERVICE_MINUTES);
    }

    #[test]
    fn test_deserialize_snapshot_section() {
        let toml = r#"
[snapshot]
enabled = false
path = "/data/queue.sqlite"
key = "kiosk-1"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(!config.snapshot.enabled);
        assert_eq!(config.snapshot.path.to_str().unwrap(), "/data/queue.sqlite");
        assert_eq!(config.snapshot.key, "kiosk-1");
    }

    #[test]
    fn test_unknown_code_style_fails() {
        let toml = r#"
[queue]
code_style = "roman"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_serializes_to_json() {
        let json = serde_json::to_value(Config::default()).unwrap();
        assert_eq!(json["server"]["port"], 8080);
        assert_eq!(json["queue"]["code_style"], "single_class");
        assert_eq!(json["queue"]["service_minutes"]["consulta"], 12);
    }
}
