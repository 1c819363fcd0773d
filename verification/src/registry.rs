//! Session registry: the four verification operations over a store.

use std::sync::Arc;

use idlink_crypto::{CodeGenerator, OsCodeGenerator};
use idlink_store::{VerificationRecord, VerificationStore};
use idlink_types::{Clock, Identity, SystemClock, VerificationCode};
use serde::{Deserialize, Serialize};

use crate::locks::{StripedLocks, DEFAULT_STRIPES};
use crate::request::{require, require_identity};
use crate::{SessionState, VerificationError, VerificationSession, VerifyRequest};

/// Tunables for [`SessionRegistry`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Reject redemptions of codes older than this many seconds.
    /// `None` means codes never expire.
    #[serde(default)]
    pub code_ttl_secs: Option<u64>,

    /// Number of lock stripes used to serialize per-identity operations.
    #[serde(default = "default_lock_stripes")]
    pub lock_stripes: usize,
}

fn default_lock_stripes() -> usize {
    DEFAULT_STRIPES
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            code_ttl_secs: None,
            lock_stripes: default_lock_stripes(),
        }
    }
}

/// Owns every pending code, record and confirmation flag.
///
/// Each mutating operation reads the identity's session, checks it, and
/// writes one batch while holding that identity's lock, so two racing
/// redemptions of the same code cannot both succeed. In-memory state lives
/// only in the store; a failed write changes nothing.
pub struct SessionRegistry {
    store: Arc<dyn VerificationStore>,
    clock: Arc<dyn Clock>,
    codes: Arc<dyn CodeGenerator>,
    locks: StripedLocks,
    config: RegistryConfig,
}

impl SessionRegistry {
    /// Registry over `store` using wall-clock time and OS randomness.
    pub fn new(store: Arc<dyn VerificationStore>, config: RegistryConfig) -> Self {
        Self::with_parts(store, Arc::new(SystemClock), Arc::new(OsCodeGenerator), config)
    }

    /// Registry with explicit clock and code source (used by tests).
    pub fn with_parts(
        store: Arc<dyn VerificationStore>,
        clock: Arc<dyn Clock>,
        codes: Arc<dyn CodeGenerator>,
        config: RegistryConfig,
    ) -> Self {
        let locks = StripedLocks::new(config.lock_stripes);
        Self {
            store,
            clock,
            codes,
            locks,
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Generate and store a fresh code for `identity`, replacing any
    /// outstanding one.
    pub fn issue_code(&self, identity: &str) -> Result<VerificationCode, VerificationError> {
        require_identity(identity)?;
        let identity = Identity::from(identity);

        let _guard = self.locks.lock(&identity);
        let session = VerificationSession::load(&*self.store, &identity)?;
        let previous = session.state();
        let code = self.codes.generate();
        self.store
            .write_batch(session.issue(code.clone(), self.clock.now()))?;

        tracing::info!(%identity, ?previous, "issued verification code");
        Ok(code)
    }

    /// Click-through redemption. Marks `identity` confirmed; the code stays
    /// outstanding for the payload step.
    pub fn confirm_by_click(&self, identity: &str, code: &str) -> Result<(), VerificationError> {
        require_identity(identity)?;
        require("code", code)?;
        let identity = Identity::from(identity);

        let _guard = self.locks.lock(&identity);
        let session = VerificationSession::load(&*self.store, &identity)?;
        let batch = session.confirm_by_click(code, self.clock.now(), self.config.code_ttl_secs)?;
        self.store.write_batch(batch)?;

        tracing::info!(%identity, "confirmed by click");
        Ok(())
    }

    /// Full redemption. Stores the hashed record, marks the identity
    /// confirmed and consumes the code.
    pub fn verify_with_payload(&self, request: &VerifyRequest<'_>) -> Result<(), VerificationError> {
        request.validate()?;
        let identity = Identity::from(request.identity);

        let _guard = self.locks.lock(&identity);
        let session = VerificationSession::load(&*self.store, &identity)?;
        let replaced_record = session.record.is_some();
        let batch = session.verify_with_payload(
            request.code,
            request.external_username,
            request.fingerprint,
            request.ip,
            self.clock.now(),
            self.config.code_ttl_secs,
        )?;
        self.store.write_batch(batch)?;

        tracing::info!(%identity, replaced_record, "verified with payload");
        Ok(())
    }

    /// Whether `identity` has completed any redemption. Read-only.
    pub fn query_status(&self, identity: &str) -> Result<bool, VerificationError> {
        require_identity(identity)?;
        Ok(self.store.is_confirmed(&Identity::from(identity))?)
    }

    /// Lifecycle position of `identity`. Read-only.
    pub fn session_state(&self, identity: &str) -> Result<SessionState, VerificationError> {
        require_identity(identity)?;
        let identity = Identity::from(identity);

        // The three mappings are read separately; the lock keeps a concurrent
        // redemption from landing between them.
        let _guard = self.locks.lock(&identity);
        let session = VerificationSession::load(&*self.store, &identity)?;
        Ok(session.state())
    }

    /// The stored record for `identity`, if a payload redemption ever succeeded.
    pub fn verification_record(
        &self,
        identity: &str,
    ) -> Result<Option<VerificationRecord>, VerificationError> {
        require_identity(identity)?;
        Ok(self.store.get_record(&Identity::from(identity))?)
    }
}
