//! Backend-agnostic write batch.
//!
//! ```ignore
//! let mut batch = WriteBatch::new();
//! batch.put_record(record);
//! batch.set_confirmed(identity.clone());
//! batch.delete_pending_code(identity);
//! store.write_batch(batch)?;
//! ```

use idlink_types::Identity;

use crate::{PendingCode, VerificationRecord};

/// A single mutation inside a [`WriteBatch`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchOp {
    PutPendingCode(PendingCode),
    DeletePendingCode(Identity),
    PutRecord(VerificationRecord),
    SetConfirmed(Identity),
}

/// An ordered group of mutations applied as one unit by
/// [`BatchWriter::write_batch`](crate::BatchWriter::write_batch).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<BatchOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `pending` as the outstanding code for its identity, replacing any previous one.
    pub fn put_pending_code(&mut self, pending: PendingCode) -> &mut Self {
        self.ops.push(BatchOp::PutPendingCode(pending));
        self
    }

    /// Remove the outstanding code. Deleting a missing code is not an error.
    pub fn delete_pending_code(&mut self, identity: Identity) -> &mut Self {
        self.ops.push(BatchOp::DeletePendingCode(identity));
        self
    }

    /// Store `record`, overwriting any previous record for its identity.
    pub fn put_record(&mut self, record: VerificationRecord) -> &mut Self {
        self.ops.push(BatchOp::PutRecord(record));
        self
    }

    pub fn set_confirmed(&mut self, identity: Identity) -> &mut Self {
        self.ops.push(BatchOp::SetConfirmed(identity));
        self
    }

    pub fn ops(&self) -> &[BatchOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl IntoIterator for WriteBatch {
    type Item = BatchOp;
    type IntoIter = std::vec::IntoIter<BatchOp>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.into_iter()
    }
}
