//! Service configuration with TOML file support.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use anyhow::Context;
use idlink_store_lmdb::environment::DEFAULT_MAP_SIZE;
use idlink_utils::LogFormat;
use idlink_verification::RegistryConfig;
use serde::{Deserialize, Serialize};

/// Which persistence backend holds the three mappings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Lmdb,
    /// Single JSON document, rewritten after every change.
    Json,
}

/// Configuration for the idlink daemon.
///
/// Loaded from a TOML file via [`ServiceConfig::from_toml_file`]; every field
/// has a default so an empty file is valid. CLI flags override file values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Address the HTTP server binds to.
    #[serde(default = "default_bind_address")]
    pub bind_address: IpAddr,

    /// HTTP port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the store files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default)]
    pub store_backend: StoreBackend,

    /// LMDB map size in bytes.
    #[serde(default = "default_lmdb_map_size")]
    pub lmdb_map_size: usize,

    /// Code lifetime in seconds. Absent means codes never expire.
    #[serde(default)]
    pub code_ttl_secs: Option<u64>,

    #[serde(default = "default_lock_stripes")]
    pub lock_stripes: usize,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter, e.g. "info" or "debug,tower_http=trace".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_bind_address() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    3000
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./idlink_data")
}

fn default_lmdb_map_size() -> usize {
    DEFAULT_MAP_SIZE
}

fn default_lock_stripes() -> usize {
    RegistryConfig::default().lock_stripes
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ServiceConfig {
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }

    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            code_ttl_secs: self.code_ttl_secs,
            lock_stripes: self.lock_stripes,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            data_dir: default_data_dir(),
            store_backend: StoreBackend::default(),
            lmdb_map_size: default_lmdb_map_size(),
            code_ttl_secs: None,
            lock_stripes: default_lock_stripes(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = ServiceConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = ServiceConfig::from_toml_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config = ServiceConfig::from_toml_str("").unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.store_backend, StoreBackend::Lmdb);
        assert_eq!(config.log_format, LogFormat::Human);
        assert_eq!(config.code_ttl_secs, None);
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            port = 8080
            store_backend = "json"
            code_ttl_secs = 600
            log_format = "json"
        "#;
        let config = ServiceConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.store_backend, StoreBackend::Json);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.registry_config().code_ttl_secs, Some(600));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn unknown_backend_is_rejected() {
        assert!(ServiceConfig::from_toml_str(r#"store_backend = "redis""#).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ServiceConfig::from_toml_file(&dir.path().join("absent.toml")).is_err());
    }

    #[test]
    fn reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("idlink.toml");
        std::fs::write(&path, "port = 4000\nbind_address = \"127.0.0.1\"\n").unwrap();
        let config = ServiceConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:4000");
    }
}
