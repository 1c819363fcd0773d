//! Abstract storage traits for the idlink service.
//!
//! Every storage backend (LMDB, JSON document, in-memory for testing) implements
//! these traits. The rest of the codebase depends only on the traits.
//!
//! The store holds three mappings keyed by [`Identity`](idlink_types::Identity):
//! pending codes, verification records and confirmation flags. Reads go through
//! the per-mapping traits; every mutation goes through a [`WriteBatch`] so that
//! a redemption's record write, flag write and code deletion land together or
//! not at all.

pub mod batch;
pub mod confirmation;
pub mod error;
pub mod pending;
pub mod record;

pub use batch::{BatchOp, WriteBatch};
pub use confirmation::ConfirmationStore;
pub use error::StoreError;
pub use pending::{PendingCode, PendingCodeStore};
pub use record::{RecordStore, VerificationRecord};

/// Applies write batches atomically.
pub trait BatchWriter {
    /// Apply every operation in `batch`, in order, as one atomic unit.
    ///
    /// On error nothing in the batch is visible to subsequent reads.
    fn write_batch(&self, batch: WriteBatch) -> Result<(), StoreError>;
}

/// Everything the session registry needs from a backend.
pub trait VerificationStore:
    PendingCodeStore + RecordStore + ConfirmationStore + BatchWriter + Send + Sync
{
}

impl<T> VerificationStore for T where
    T: PendingCodeStore + RecordStore + ConfirmationStore + BatchWriter + Send + Sync
{
}
