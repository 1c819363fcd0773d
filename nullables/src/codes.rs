//! Nullable code generator: scripted verification codes.

use idlink_crypto::CodeGenerator;
use idlink_types::VerificationCode;
use std::sync::Mutex;

/// Returns pre-configured codes in order, cycling when exhausted.
pub struct NullCodes {
    codes: Vec<VerificationCode>,
    index: Mutex<usize>,
}

impl NullCodes {
    /// Create with a sequence of codes.
    ///
    /// # Panics
    /// Panics if `codes` is empty.
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let codes: Vec<VerificationCode> =
            codes.into_iter().map(VerificationCode::new).collect();
        assert!(!codes.is_empty(), "NullCodes needs at least one code");
        Self {
            codes,
            index: Mutex::new(0),
        }
    }

    /// Create with a single code returned for every call.
    pub fn constant(code: &str) -> Self {
        Self::new([code])
    }

    /// How many codes have been handed out.
    pub fn issued(&self) -> usize {
        *self.index.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CodeGenerator for NullCodes {
    fn generate(&self) -> VerificationCode {
        let mut idx = self.index.lock().unwrap_or_else(|e| e.into_inner());
        let code = self.codes[*idx % self.codes.len()].clone();
        *idx += 1;
        code
    }
}
