//! Opening the configured store before the listener binds.

use std::sync::Arc;

use anyhow::Context;
use idlink_store::VerificationStore;
use idlink_store_json::JsonFileStore;
use idlink_store_lmdb::{check_data_dir, check_integrity, LmdbEnvironment};
use tracing::{info, warn};

use crate::config::{ServiceConfig, StoreBackend};

/// Subdirectory of `data_dir` holding the LMDB environment.
pub const LMDB_DIR: &str = "lmdb";
/// File name of the JSON document inside `data_dir`.
pub const JSON_FILE: &str = "db.json";

/// Open the configured backend. Any failure here aborts startup.
pub fn open_store(config: &ServiceConfig) -> anyhow::Result<Arc<dyn VerificationStore>> {
    match config.store_backend {
        StoreBackend::Lmdb => {
            let path = config.data_dir.join(LMDB_DIR);
            check_data_dir(&path).map_err(anyhow::Error::msg)?;
            let env = LmdbEnvironment::open(&path, config.lmdb_map_size)
                .with_context(|| format!("opening LMDB environment at {}", path.display()))?;

            let report = check_integrity(&env).context("checking LMDB integrity")?;
            if !report.is_healthy() {
                for error in &report.errors {
                    warn!(%error, "integrity check");
                }
                anyhow::bail!(
                    "LMDB integrity check failed with {} error(s)",
                    report.errors.len()
                );
            }
            info!(
                path = %path.display(),
                entries = report.total_entries,
                "opened LMDB store"
            );
            Ok(Arc::new(env))
        }
        StoreBackend::Json => {
            let path = config.data_dir.join(JSON_FILE);
            let store = JsonFileStore::open(&path)
                .with_context(|| format!("opening JSON store at {}", path.display()))?;
            info!(path = %path.display(), "opened JSON store");
            Ok(Arc::new(store))
        }
    }
}
