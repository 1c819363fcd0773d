//! One-time verification code generation.

use idlink_types::VerificationCode;
use rand::rngs::OsRng;
use rand::RngCore;

/// Random bytes per code. Rendered as twice as many uppercase hex characters.
pub const CODE_BYTES: usize = 4;

/// Produces fresh verification codes.
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> VerificationCode;
}

/// Draws codes from the operating system CSPRNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsCodeGenerator;

impl CodeGenerator for OsCodeGenerator {
    fn generate(&self) -> VerificationCode {
        let mut bytes = [0u8; CODE_BYTES];
        OsRng.fill_bytes(&mut bytes);
        VerificationCode::new(hex::encode_upper(bytes))
    }
}
