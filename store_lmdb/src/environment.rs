//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::migration::Migrator;
use crate::LmdbError;

/// Named databases created in every environment.
pub(crate) const PENDING_CODES_DB: &str = "pending_codes";
pub(crate) const RECORDS_DB: &str = "records";
pub(crate) const CONFIRMATIONS_DB: &str = "confirmations";
pub(crate) const META_DB: &str = "meta";

/// Default map size: 64 MiB is far beyond what per-identity sessions need.
pub const DEFAULT_MAP_SIZE: usize = 64 * 1024 * 1024;

const MAX_DBS: u32 = 8;

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    pub(crate) env: Arc<Env>,
    pub(crate) pending_codes_db: Database<Bytes, Bytes>,
    pub(crate) records_db: Database<Bytes, Bytes>,
    pub(crate) confirmations_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given directory and bring
    /// its schema up to date.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;

        let mut options = EnvOpenOptions::new();
        options.map_size(map_size).max_dbs(MAX_DBS);
        // SAFETY: each data directory is opened by a single `LmdbEnvironment`
        // per process; the daemon holds the only handle for its lifetime.
        let env = unsafe { options.open(path)? };

        let mut wtxn = env.write_txn()?;
        let pending_codes_db = env.create_database(&mut wtxn, Some(PENDING_CODES_DB))?;
        let records_db = env.create_database(&mut wtxn, Some(RECORDS_DB))?;
        let confirmations_db = env.create_database(&mut wtxn, Some(CONFIRMATIONS_DB))?;
        let meta_db = env.create_database(&mut wtxn, Some(META_DB))?;
        wtxn.commit()?;

        let environment = Self {
            env: Arc::new(env),
            pending_codes_db,
            records_db,
            confirmations_db,
            meta_db,
        };
        Migrator::run(&environment)?;

        tracing::debug!(path = %path.display(), "opened LMDB environment");
        Ok(environment)
    }

    /// Shared handle to the underlying heed environment.
    pub fn env(&self) -> &Arc<Env> {
        &self.env
    }

    /// Flush the memory map to disk.
    pub fn sync(&self) -> Result<(), LmdbError> {
        self.env.force_sync()?;
        Ok(())
    }
}
