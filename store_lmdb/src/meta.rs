//! Schema bookkeeping in the `meta` database.

use crate::{LmdbEnvironment, LmdbError};

const SCHEMA_VERSION_KEY: &[u8] = b"schema_version";

impl LmdbEnvironment {
    /// Stored schema version, or 0 for a fresh environment.
    pub fn schema_version(&self) -> Result<u32, LmdbError> {
        let rtxn = self.env.read_txn()?;
        let val = self.meta_db.get(&rtxn, SCHEMA_VERSION_KEY)?;
        match val {
            Some(bytes) => {
                let arr: [u8; 4] = bytes.try_into().map_err(|_| {
                    LmdbError::Serialization(
                        "schema_version has unexpected byte length".to_string(),
                    )
                })?;
                Ok(u32::from_le_bytes(arr))
            }
            None => Ok(0),
        }
    }

    pub fn set_schema_version(&self, version: u32) -> Result<(), LmdbError> {
        let bytes = version.to_le_bytes();
        let mut wtxn = self.env.write_txn()?;
        self.meta_db.put(&mut wtxn, SCHEMA_VERSION_KEY, &bytes)?;
        wtxn.commit()?;
        Ok(())
    }
}
