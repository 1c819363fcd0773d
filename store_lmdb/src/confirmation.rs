//! LMDB implementation of ConfirmationStore.
//!
//! Presence of a key means confirmed; the value is a single marker byte.

use idlink_store::{ConfirmationStore, StoreError};
use idlink_types::Identity;

use crate::{LmdbEnvironment, LmdbError};

pub(crate) const CONFIRMED_MARKER: &[u8] = &[1];

impl ConfirmationStore for LmdbEnvironment {
    fn is_confirmed(&self, identity: &Identity) -> Result<bool, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .confirmations_db
            .get(&rtxn, identity.as_str().as_bytes())
            .map_err(LmdbError::from)?;
        Ok(val.is_some())
    }

    fn confirmed_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let count = self.confirmations_db.len(&rtxn).map_err(LmdbError::from)?;
        Ok(count)
    }
}
