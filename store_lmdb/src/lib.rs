//! LMDB storage backend for the idlink service.
//!
//! Implements all storage traits from `idlink-store` using the `heed` LMDB bindings.
//! Each mapping (pending codes, records, confirmation flags) is its own named
//! database inside a single environment, plus a `meta` database for the schema
//! version.

pub mod confirmation;
pub mod environment;
pub mod error;
pub mod integrity;
pub mod meta;
pub mod migration;
pub mod pending;
pub mod record;
pub mod write_batch;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use integrity::{check_data_dir, check_integrity, IntegrityReport};
