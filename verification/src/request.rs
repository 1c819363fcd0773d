//! Raw redemption input and field validation.

use crate::VerificationError;

/// Longest accepted identity, in bytes. Identities are storage keys and LMDB
/// caps keys at 511 bytes.
pub const MAX_IDENTITY_LEN: usize = 256;

/// A payload redemption exactly as received from the caller.
#[derive(Clone, Copy, Debug, Default)]
pub struct VerifyRequest<'a> {
    pub identity: &'a str,
    pub code: &'a str,
    pub external_username: &'a str,
    pub fingerprint: &'a str,
    pub ip: &'a str,
}

impl VerifyRequest<'_> {
    /// Reject the request if any field is empty, naming the first one found.
    pub fn validate(&self) -> Result<(), VerificationError> {
        require_identity(self.identity)?;
        require("code", self.code)?;
        require("external_username", self.external_username)?;
        require("fingerprint", self.fingerprint)?;
        require("ip", self.ip)?;
        Ok(())
    }
}

/// `MissingField(name)` if `value` is empty.
pub(crate) fn require(name: &'static str, value: &str) -> Result<(), VerificationError> {
    if value.is_empty() {
        Err(VerificationError::MissingField(name))
    } else {
        Ok(())
    }
}

/// `require("identity", ..)` plus the length bound.
pub(crate) fn require_identity(value: &str) -> Result<(), VerificationError> {
    require("identity", value)?;
    if value.len() > MAX_IDENTITY_LEN {
        return Err(VerificationError::FieldTooLong {
            field: "identity",
            max: MAX_IDENTITY_LEN,
        });
    }
    Ok(())
}
