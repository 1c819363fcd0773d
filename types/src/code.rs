//! One-time verification code.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A one-time code handed to the user and redeemed by click or payload.
///
/// Comparison is exact and case-sensitive: `a1b2c3d4` does not redeem `A1B2C3D4`.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerificationCode(String);

impl VerificationCode {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Exact string equality against a submitted code.
    pub fn matches(&self, submitted: &str) -> bool {
        self.0 == submitted
    }
}

// Codes are bearer secrets; keep them out of debug output.
impl fmt::Debug for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VerificationCode(..{})", self.0.len())
    }
}

impl fmt::Display for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
