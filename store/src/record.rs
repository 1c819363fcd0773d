//! Verification record storage trait.

use crate::StoreError;
use idlink_types::{Digest, Identity, Timestamp};
use serde::{Deserialize, Serialize};

/// The terminal result of a full (payload) verification.
///
/// Only digests of the fingerprint and IP are kept.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    pub identity: Identity,
    /// Username on the external platform, as submitted.
    pub external_username: String,
    pub fingerprint_hash: Digest,
    pub ip_hash: Digest,
    pub confirmed_at: Timestamp,
}

/// Read access to verification records.
pub trait RecordStore {
    fn get_record(&self, identity: &Identity) -> Result<Option<VerificationRecord>, StoreError>;

    fn record_count(&self) -> Result<u64, StoreError>;
}
