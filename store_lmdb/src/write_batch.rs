//! Write batching: applies a [`WriteBatch`] inside a single LMDB write
//! transaction.
//!
//! If any operation fails the transaction is dropped without commit and
//! LMDB aborts it, so none of the batch becomes visible.

use idlink_store::{BatchOp, BatchWriter, StoreError, WriteBatch};

use crate::confirmation::CONFIRMED_MARKER;
use crate::{LmdbEnvironment, LmdbError};

impl LmdbEnvironment {
    fn apply_batch(&self, batch: WriteBatch) -> Result<(), LmdbError> {
        let mut wtxn = self.env.write_txn()?;
        for op in batch {
            match op {
                BatchOp::PutPendingCode(pending) => {
                    let bytes = bincode::serialize(&pending)?;
                    self.pending_codes_db.put(
                        &mut wtxn,
                        pending.identity.as_str().as_bytes(),
                        &bytes,
                    )?;
                }
                BatchOp::DeletePendingCode(identity) => {
                    self.pending_codes_db
                        .delete(&mut wtxn, identity.as_str().as_bytes())?;
                }
                BatchOp::PutRecord(record) => {
                    let bytes = bincode::serialize(&record)?;
                    self.records_db
                        .put(&mut wtxn, record.identity.as_str().as_bytes(), &bytes)?;
                }
                BatchOp::SetConfirmed(identity) => {
                    self.confirmations_db.put(
                        &mut wtxn,
                        identity.as_str().as_bytes(),
                        CONFIRMED_MARKER,
                    )?;
                }
            }
        }
        wtxn.commit()?;
        Ok(())
    }
}

impl BatchWriter for LmdbEnvironment {
    fn write_batch(&self, batch: WriteBatch) -> Result<(), StoreError> {
        if batch.is_empty() {
            return Ok(());
        }
        let ops = batch.len();
        self.apply_batch(batch)?;
        tracing::trace!(ops, "committed LMDB write batch");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idlink_store::{
        ConfirmationStore, PendingCode, PendingCodeStore, RecordStore, VerificationRecord,
    };
    use idlink_types::{Digest, Identity, Timestamp, VerificationCode};

    fn temp_env() -> (tempfile::TempDir, LmdbEnvironment) {
        let dir = tempfile::tempdir().expect("temp dir");
        let env = LmdbEnvironment::open(dir.path(), 4 * 1024 * 1024).expect("open env");
        (dir, env)
    }

    fn pending(id: &str, code: &str) -> PendingCode {
        PendingCode {
            identity: Identity::new(id),
            code: VerificationCode::new(code),
            issued_at: Timestamp::new(1_700_000_000),
            clicked_at: None,
        }
    }

    fn record(id: &str, username: &str) -> VerificationRecord {
        VerificationRecord {
            identity: Identity::new(id),
            external_username: username.to_string(),
            fingerprint_hash: Digest::new([7u8; 32]),
            ip_hash: Digest::new([9u8; 32]),
            confirmed_at: Timestamp::new(1_700_000_100),
        }
    }

    #[test]
    fn put_and_read_pending_code() {
        let (_dir, env) = temp_env();
        let mut batch = WriteBatch::new();
        batch.put_pending_code(pending("u1", "A1B2C3D4"));
        env.write_batch(batch).unwrap();

        let stored = env.get_pending_code(&Identity::new("u1")).unwrap();
        assert_eq!(stored, Some(pending("u1", "A1B2C3D4")));
        assert_eq!(env.pending_code_count().unwrap(), 1);
        assert_eq!(env.get_pending_code(&Identity::new("u2")).unwrap(), None);
    }

    #[test]
    fn second_put_overwrites_pending_code() {
        let (_dir, env) = temp_env();
        let mut batch = WriteBatch::new();
        batch
            .put_pending_code(pending("u1", "AAAAAAAA"))
            .put_pending_code(pending("u1", "BBBBBBBB"));
        env.write_batch(batch).unwrap();

        let stored = env.get_pending_code(&Identity::new("u1")).unwrap().unwrap();
        assert!(stored.code.matches("BBBBBBBB"));
        assert_eq!(env.pending_code_count().unwrap(), 1);
    }

    #[test]
    fn redemption_batch_applies_all_three_mutations() {
        let (_dir, env) = temp_env();
        let id = Identity::new("u1");
        let mut issue = WriteBatch::new();
        issue.put_pending_code(pending("u1", "A1B2C3D4"));
        env.write_batch(issue).unwrap();

        let mut redeem = WriteBatch::new();
        redeem
            .put_record(record("u1", "bob"))
            .set_confirmed(id.clone())
            .delete_pending_code(id.clone());
        env.write_batch(redeem).unwrap();

        assert_eq!(env.get_pending_code(&id).unwrap(), None);
        assert_eq!(env.get_record(&id).unwrap(), Some(record("u1", "bob")));
        assert!(env.is_confirmed(&id).unwrap());
        assert_eq!(env.confirmed_count().unwrap(), 1);
        assert_eq!(env.record_count().unwrap(), 1);
    }

    #[test]
    fn deleting_missing_code_is_not_an_error() {
        let (_dir, env) = temp_env();
        let mut batch = WriteBatch::new();
        batch.delete_pending_code(Identity::new("ghost"));
        assert!(env.write_batch(batch).is_ok());
    }

    #[test]
    fn data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let env = LmdbEnvironment::open(dir.path(), 4 * 1024 * 1024).unwrap();
            let mut batch = WriteBatch::new();
            batch
                .put_record(record("u9", "alice"))
                .set_confirmed(Identity::new("u9"));
            env.write_batch(batch).unwrap();
            env.sync().unwrap();
        }
        let env = LmdbEnvironment::open(dir.path(), 4 * 1024 * 1024).unwrap();
        assert!(env.is_confirmed(&Identity::new("u9")).unwrap());
        assert_eq!(
            env.get_record(&Identity::new("u9")).unwrap().unwrap().external_username,
            "alice"
        );
    }
}
