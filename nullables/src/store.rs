//! Nullable store: thread-safe in-memory storage for testing.
//!
//! Reads and writes can be made to fail on demand to exercise the
//! store-error paths of callers.

use idlink_store::{
    BatchOp, BatchWriter, ConfirmationStore, PendingCode, PendingCodeStore, RecordStore,
    StoreError, VerificationRecord, WriteBatch,
};
use idlink_types::Identity;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Tables {
    pending_codes: HashMap<Identity, PendingCode>,
    records: HashMap<Identity, VerificationRecord>,
    confirmations: HashSet<Identity>,
}

/// An in-memory verification store for testing.
/// Thread-safe for use with tokio's multi-threaded runtime.
#[derive(Default)]
pub struct NullStore {
    tables: Mutex<Tables>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    batches_written: AtomicUsize,
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent read return a backend error.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent batch write return a backend error without
    /// applying anything.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of batches successfully applied.
    pub fn batches_written(&self) -> usize {
        self.batches_written.load(Ordering::SeqCst)
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected read failure".to_string()));
        }
        self.tables
            .lock()
            .map_err(|_| StoreError::Backend("null store lock poisoned".to_string()))
    }
}

impl PendingCodeStore for NullStore {
    fn get_pending_code(&self, identity: &Identity) -> Result<Option<PendingCode>, StoreError> {
        Ok(self.tables()?.pending_codes.get(identity).cloned())
    }

    fn pending_code_count(&self) -> Result<u64, StoreError> {
        Ok(self.tables()?.pending_codes.len() as u64)
    }
}

impl RecordStore for NullStore {
    fn get_record(&self, identity: &Identity) -> Result<Option<VerificationRecord>, StoreError> {
        Ok(self.tables()?.records.get(identity).cloned())
    }

    fn record_count(&self) -> Result<u64, StoreError> {
        Ok(self.tables()?.records.len() as u64)
    }
}

impl ConfirmationStore for NullStore {
    fn is_confirmed(&self, identity: &Identity) -> Result<bool, StoreError> {
        Ok(self.tables()?.confirmations.contains(identity))
    }

    fn confirmed_count(&self) -> Result<u64, StoreError> {
        Ok(self.tables()?.confirmations.len() as u64)
    }
}

impl BatchWriter for NullStore {
    fn write_batch(&self, batch: WriteBatch) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected write failure".to_string()));
        }
        let mut tables = self
            .tables
            .lock()
            .map_err(|_| StoreError::Backend("null store lock poisoned".to_string()))?;
        for op in batch {
            match op {
                BatchOp::PutPendingCode(pending) => {
                    tables.pending_codes.insert(pending.identity.clone(), pending);
                }
                BatchOp::DeletePendingCode(identity) => {
                    tables.pending_codes.remove(&identity);
                }
                BatchOp::PutRecord(record) => {
                    tables.records.insert(record.identity.clone(), record);
                }
                BatchOp::SetConfirmed(identity) => {
                    tables.confirmations.insert(identity);
                }
            }
        }
        self.batches_written.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
