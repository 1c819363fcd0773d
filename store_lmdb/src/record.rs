//! LMDB implementation of RecordStore.

use idlink_store::{RecordStore, StoreError, VerificationRecord};
use idlink_types::Identity;

use crate::{LmdbEnvironment, LmdbError};

impl RecordStore for LmdbEnvironment {
    fn get_record(&self, identity: &Identity) -> Result<Option<VerificationRecord>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let record = self
            .records_db
            .get(&rtxn, identity.as_str().as_bytes())
            .map_err(LmdbError::from)?
            .map(|bytes| bincode::deserialize::<VerificationRecord>(bytes))
            .transpose()
            .map_err(LmdbError::from)?;
        Ok(record)
    }

    fn record_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let count = self.records_db.len(&rtxn).map_err(LmdbError::from)?;
        Ok(count)
    }
}
