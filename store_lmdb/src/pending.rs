//! LMDB implementation of PendingCodeStore.
//!
//! Key: raw identity bytes. Value: bincode-encoded [`PendingCode`].

use idlink_store::{PendingCode, PendingCodeStore, StoreError};
use idlink_types::Identity;

use crate::{LmdbEnvironment, LmdbError};

impl PendingCodeStore for LmdbEnvironment {
    fn get_pending_code(&self, identity: &Identity) -> Result<Option<PendingCode>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .pending_codes_db
            .get(&rtxn, identity.as_str().as_bytes())
            .map_err(LmdbError::from)?;
        match val {
            Some(bytes) => {
                let pending: PendingCode = bincode::deserialize(bytes).map_err(LmdbError::from)?;
                Ok(Some(pending))
            }
            None => Ok(None),
        }
    }

    fn pending_code_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let count = self.pending_codes_db.len(&rtxn).map_err(LmdbError::from)?;
        Ok(count)
    }
}
