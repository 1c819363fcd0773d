//! idlink daemon: links chat identities to external accounts through
//! one-time codes.

mod config;
mod shutdown;
mod store;

use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use idlink_rpc::RpcServer;
use idlink_utils::{init_logging, LogFormat};
use idlink_verification::SessionRegistry;

use crate::config::{ServiceConfig, StoreBackend};

#[derive(Parser, Debug)]
#[command(name = "idlink-daemon", about = "Identity linking service")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// flags and environment variables override them.
    #[arg(long, env = "IDLINK_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind the HTTP server to.
    #[arg(long, env = "IDLINK_BIND_ADDRESS")]
    bind_address: Option<IpAddr>,

    /// HTTP port.
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Directory holding the store files.
    #[arg(long, env = "IDLINK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[arg(long, value_enum, env = "IDLINK_STORE_BACKEND")]
    store_backend: Option<StoreBackend>,

    /// Expire codes this many seconds after issuance.
    #[arg(long, env = "IDLINK_CODE_TTL_SECS")]
    code_ttl_secs: Option<u64>,

    /// Log format: "human" or "json".
    #[arg(long, env = "IDLINK_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "IDLINK_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Cli {
    /// Resolve the effective configuration: file (or defaults), then flags.
    fn into_config(self) -> anyhow::Result<ServiceConfig> {
        let base = match &self.config {
            Some(path) => ServiceConfig::from_toml_file(path)?,
            None => ServiceConfig::default(),
        };
        Ok(ServiceConfig {
            bind_address: self.bind_address.unwrap_or(base.bind_address),
            port: self.port.unwrap_or(base.port),
            data_dir: self.data_dir.unwrap_or(base.data_dir),
            store_backend: self.store_backend.unwrap_or(base.store_backend),
            code_ttl_secs: self.code_ttl_secs.or(base.code_ttl_secs),
            log_format: self.log_format.unwrap_or(base.log_format),
            log_level: self.log_level.unwrap_or(base.log_level),
            ..base
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.clone();
    let config = cli.into_config()?;

    init_logging(config.log_format, &config.log_level)?;
    if let Some(path) = &config_path {
        tracing::info!(path = %path.display(), "loaded config");
    }
    tracing::info!(
        backend = ?config.store_backend,
        data_dir = %config.data_dir.display(),
        code_ttl_secs = ?config.code_ttl_secs,
        "starting idlink daemon"
    );

    let store_config = config.clone();
    let store = tokio::task::spawn_blocking(move || store::open_store(&store_config)).await??;
    let registry = Arc::new(SessionRegistry::new(store, config.registry_config()));

    let server = RpcServer::new(config.socket_addr(), registry);
    let listener = server.bind().await?;
    server.serve(listener, shutdown::shutdown_signal()).await?;

    tracing::info!("idlink daemon exited cleanly");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("idlink-daemon").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn flags_override_defaults() {
        let config = parse(&["--port", "8080", "--store-backend", "json", "--log-format", "json"])
            .into_config()
            .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.store_backend, StoreBackend::Json);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn flags_override_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("idlink.toml");
        std::fs::write(&path, "port = 4000\ncode_ttl_secs = 600\nlog_level = \"debug\"\n").unwrap();
        let path_arg = path.to_string_lossy().into_owned();

        let config = parse(&["--config", &path_arg, "--port", "5000"]).into_config().unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.code_ttl_secs, Some(600));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn unknown_backend_flag_is_rejected() {
        let result = Cli::try_parse_from(["idlink-daemon", "--store-backend", "redis"]);
        assert!(result.is_err());
    }
}
