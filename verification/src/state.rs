//! Verification session state for one identity.
//!
//! A [`VerificationSession`] is a snapshot of everything stored for an
//! identity. Transitions are pure: they validate against the snapshot and
//! return the [`WriteBatch`] that must be committed to move the session
//! forward. Nothing changes until the registry writes that batch.

use idlink_crypto::sha256_str;
use idlink_store::{
    PendingCode, PendingCodeStore, RecordStore, StoreError, VerificationRecord, WriteBatch,
};
use idlink_types::{Identity, Timestamp, VerificationCode};
use serde::{Deserialize, Serialize};

use crate::VerificationError;

/// Where an identity is in the verification lifecycle.
///
/// ```text
/// NoSession -> PendingCodeIssued -> ClickConfirmed -> FullyVerified
///                      \_______________________________/^
/// ```
///
/// Issuing a code from any state returns to `PendingCodeIssued`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Nothing has ever been issued for this identity.
    NoSession,
    /// A code is outstanding and has not been clicked.
    PendingCodeIssued,
    /// A code is outstanding and the click-through confirmed it.
    ClickConfirmed,
    /// The last code was redeemed with a payload; a record exists.
    FullyVerified,
}

/// The stored state of one identity.
///
/// The confirmation flag is not part of the snapshot: it is append-only and
/// no transition depends on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationSession {
    pub identity: Identity,
    pub pending: Option<PendingCode>,
    pub record: Option<VerificationRecord>,
}

impl VerificationSession {
    /// Read the pending code and record for `identity`.
    pub fn load<S>(store: &S, identity: &Identity) -> Result<Self, StoreError>
    where
        S: PendingCodeStore + RecordStore + ?Sized,
    {
        Ok(Self {
            identity: identity.clone(),
            pending: store.get_pending_code(identity)?,
            record: store.get_record(identity)?,
        })
    }

    pub fn state(&self) -> SessionState {
        match (&self.pending, &self.record) {
            (Some(pending), _) if pending.clicked_at.is_some() => SessionState::ClickConfirmed,
            (Some(_), _) => SessionState::PendingCodeIssued,
            (None, Some(_)) => SessionState::FullyVerified,
            (None, None) => SessionState::NoSession,
        }
    }

    /// Store `code` as the pending code, discarding any previous one.
    /// An existing record is left in place until a new payload overwrites it.
    pub fn issue(&self, code: VerificationCode, now: Timestamp) -> WriteBatch {
        let mut batch = WriteBatch::new();
        batch.put_pending_code(PendingCode {
            identity: self.identity.clone(),
            code,
            issued_at: now,
            clicked_at: None,
        });
        batch
    }

    /// Click-through redemption: flag the identity confirmed and remember the
    /// click on the pending code. The code stays outstanding.
    pub fn confirm_by_click(
        &self,
        submitted: &str,
        now: Timestamp,
        code_ttl_secs: Option<u64>,
    ) -> Result<WriteBatch, VerificationError> {
        let pending = self.matching_code(submitted, now, code_ttl_secs)?;

        let mut batch = WriteBatch::new();
        if pending.clicked_at.is_none() {
            batch.put_pending_code(PendingCode {
                clicked_at: Some(now),
                ..pending.clone()
            });
        }
        batch.set_confirmed(self.identity.clone());
        Ok(batch)
    }

    /// Full redemption: write the hashed record, flag the identity confirmed
    /// and consume the code.
    pub fn verify_with_payload(
        &self,
        submitted: &str,
        external_username: &str,
        fingerprint: &str,
        ip: &str,
        now: Timestamp,
        code_ttl_secs: Option<u64>,
    ) -> Result<WriteBatch, VerificationError> {
        self.matching_code(submitted, now, code_ttl_secs)?;

        let mut batch = WriteBatch::new();
        batch
            .put_record(VerificationRecord {
                identity: self.identity.clone(),
                external_username: external_username.to_string(),
                fingerprint_hash: sha256_str(fingerprint),
                ip_hash: sha256_str(ip),
                confirmed_at: now,
            })
            .set_confirmed(self.identity.clone())
            .delete_pending_code(self.identity.clone());
        Ok(batch)
    }

    fn matching_code(
        &self,
        submitted: &str,
        now: Timestamp,
        code_ttl_secs: Option<u64>,
    ) -> Result<&PendingCode, VerificationError> {
        let Some(pending) = self.pending.as_ref() else {
            tracing::warn!(identity = %self.identity, "redemption without a pending code");
            return Err(VerificationError::InvalidCode);
        };
        if !pending.code.matches(submitted) {
            tracing::warn!(identity = %self.identity, "redemption with a mismatched code");
            return Err(VerificationError::InvalidCode);
        }
        if let Some(ttl) = code_ttl_secs {
            if pending.issued_at.has_expired(ttl, now) {
                tracing::warn!(
                    identity = %self.identity,
                    age_secs = pending.issued_at.elapsed_since(now),
                    "redemption with an expired code"
                );
                return Err(VerificationError::InvalidCode);
            }
        }
        Ok(pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idlink_store::BatchOp;
    use idlink_types::Digest;

    fn session_with_code(code: &str) -> VerificationSession {
        VerificationSession {
            identity: Identity::new("u1"),
            pending: Some(PendingCode {
                identity: Identity::new("u1"),
                code: VerificationCode::new(code),
                issued_at: Timestamp::new(1_000),
                clicked_at: None,
            }),
            record: None,
        }
    }

    fn empty_session() -> VerificationSession {
        VerificationSession {
            identity: Identity::new("u1"),
            pending: None,
            record: None,
        }
    }

    #[test]
    fn state_derivation() {
        assert_eq!(empty_session().state(), SessionState::NoSession);

        let mut session = session_with_code("A1B2C3D4");
        assert_eq!(session.state(), SessionState::PendingCodeIssued);

        session.pending.as_mut().unwrap().clicked_at = Some(Timestamp::new(1_001));
        assert_eq!(session.state(), SessionState::ClickConfirmed);

        session.pending = None;
        session.record = Some(VerificationRecord {
            identity: Identity::new("u1"),
            external_username: "bob".into(),
            fingerprint_hash: Digest::ZERO,
            ip_hash: Digest::ZERO,
            confirmed_at: Timestamp::new(1_002),
        });
        assert_eq!(session.state(), SessionState::FullyVerified);
    }

    #[test]
    fn issue_resets_click() {
        let batch = session_with_code("OLDCODE1")
            .issue(VerificationCode::new("NEWCODE2"), Timestamp::new(2_000));
        match &batch.ops()[0] {
            BatchOp::PutPendingCode(p) => {
                assert!(p.code.matches("NEWCODE2"));
                assert_eq!(p.clicked_at, None);
                assert_eq!(p.issued_at, Timestamp::new(2_000));
            }
            other => panic!("unexpected op {other:?}"),
        }
    }

    #[test]
    fn click_marks_code_and_flag_only() {
        let batch = session_with_code("A1B2C3D4")
            .confirm_by_click("A1B2C3D4", Timestamp::new(1_010), None)
            .unwrap();
        assert_eq!(batch.len(), 2);
        assert!(batch
            .ops()
            .iter()
            .all(|op| !matches!(op, BatchOp::PutRecord(_) | BatchOp::DeletePendingCode(_))));
    }

    #[test]
    fn repeated_click_only_sets_flag() {
        let mut session = session_with_code("A1B2C3D4");
        session.pending.as_mut().unwrap().clicked_at = Some(Timestamp::new(1_005));
        let batch = session
            .confirm_by_click("A1B2C3D4", Timestamp::new(1_010), None)
            .unwrap();
        assert_eq!(batch.ops(), &[BatchOp::SetConfirmed(Identity::new("u1"))]);
    }

    #[test]
    fn payload_writes_record_flag_and_consumes_code() {
        let batch = session_with_code("A1B2C3D4")
            .verify_with_payload(
                "A1B2C3D4",
                "bob",
                "fp-xyz",
                "9.9.9.9",
                Timestamp::new(1_020),
                None,
            )
            .unwrap();
        let ops = batch.ops();
        assert_eq!(ops.len(), 3);
        match &ops[0] {
            BatchOp::PutRecord(record) => {
                assert_eq!(record.external_username, "bob");
                assert_eq!(record.fingerprint_hash, sha256_str("fp-xyz"));
                assert_eq!(record.ip_hash, sha256_str("9.9.9.9"));
                assert_eq!(record.confirmed_at, Timestamp::new(1_020));
            }
            other => panic!("unexpected op {other:?}"),
        }
        assert_eq!(ops[1], BatchOp::SetConfirmed(Identity::new("u1")));
        assert_eq!(ops[2], BatchOp::DeletePendingCode(Identity::new("u1")));
    }

    #[test]
    fn mismatch_and_absence_are_invalid() {
        let session = session_with_code("A1B2C3D4");
        for wrong in ["a1b2c3d4", "A1B2C3D", "A1B2C3D45", ""] {
            assert!(matches!(
                session.confirm_by_click(wrong, Timestamp::new(1_001), None),
                Err(VerificationError::InvalidCode)
            ));
        }
        assert!(matches!(
            empty_session().confirm_by_click("A1B2C3D4", Timestamp::new(1_001), None),
            Err(VerificationError::InvalidCode)
        ));
    }

    #[test]
    fn ttl_applies_only_when_configured() {
        let session = session_with_code("A1B2C3D4");
        let late = Timestamp::new(1_000 + 3_600);
        assert!(session.confirm_by_click("A1B2C3D4", late, None).is_ok());
        assert!(matches!(
            session.confirm_by_click("A1B2C3D4", late, Some(600)),
            Err(VerificationError::InvalidCode)
        ));
        assert!(session
            .confirm_by_click("A1B2C3D4", Timestamp::new(1_599), Some(600))
            .is_ok());
    }
}
