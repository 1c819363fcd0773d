//! Cryptographic primitives for the idlink service.
//!
//! - **SHA-256** for anonymizing raw fingerprints and IP addresses before storage
//! - **OS randomness** for one-time verification codes

pub mod code;
pub mod hash;

pub use code::{CodeGenerator, OsCodeGenerator, CODE_BYTES};
pub use hash::{sha256, sha256_str};
