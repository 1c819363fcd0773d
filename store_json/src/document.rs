//! In-memory shape of the persisted document.

use std::collections::BTreeMap;

use idlink_store::{BatchOp, PendingCode, VerificationRecord, WriteBatch};
use idlink_types::Identity;
use serde::{Deserialize, Serialize};

/// The three mappings, keyed by identity.
///
/// `BTreeMap` keeps the file output stable between writes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub pending_codes: BTreeMap<Identity, PendingCode>,
    #[serde(default)]
    pub records: BTreeMap<Identity, VerificationRecord>,
    #[serde(default)]
    pub confirmations: BTreeMap<Identity, bool>,
}

impl Document {
    /// Apply a batch in order.
    pub fn apply(&mut self, batch: WriteBatch) {
        for op in batch {
            match op {
                BatchOp::PutPendingCode(pending) => {
                    self.pending_codes.insert(pending.identity.clone(), pending);
                }
                BatchOp::DeletePendingCode(identity) => {
                    self.pending_codes.remove(&identity);
                }
                BatchOp::PutRecord(record) => {
                    self.records.insert(record.identity.clone(), record);
                }
                BatchOp::SetConfirmed(identity) => {
                    self.confirmations.insert(identity, true);
                }
            }
        }
    }

    pub fn is_confirmed(&self, identity: &Identity) -> bool {
        self.confirmations.get(identity).copied().unwrap_or(false)
    }
}
