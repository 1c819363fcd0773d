//! Confirmation flag storage trait.

use crate::StoreError;
use idlink_types::Identity;

/// Read access to confirmation flags.
///
/// Flags are append-only: once set for an identity they stay set.
pub trait ConfirmationStore {
    /// Whether `identity` has completed a redemption. Unknown identities read `false`.
    fn is_confirmed(&self, identity: &Identity) -> Result<bool, StoreError>;

    fn confirmed_count(&self) -> Result<u64, StoreError>;
}
