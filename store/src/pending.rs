//! Pending code storage trait.

use crate::StoreError;
use idlink_types::{Identity, Timestamp, VerificationCode};
use serde::{Deserialize, Serialize};

/// The outstanding one-time code for an identity.
///
/// At most one exists per identity; issuing again replaces it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCode {
    pub identity: Identity,
    pub code: VerificationCode,
    pub issued_at: Timestamp,
    /// When the click-through confirmed this code. The code stays redeemable
    /// by payload after a click.
    #[serde(default)]
    pub clicked_at: Option<Timestamp>,
}

/// Read access to pending codes.
pub trait PendingCodeStore {
    /// The pending code for `identity`, if one is outstanding.
    fn get_pending_code(&self, identity: &Identity) -> Result<Option<PendingCode>, StoreError>;

    /// Number of outstanding codes across all identities.
    fn pending_code_count(&self) -> Result<u64, StoreError>;
}
