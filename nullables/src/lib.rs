//! Nullable infrastructure for deterministic testing.
//!
//! All external dependencies (clock, storage, randomness) are abstracted
//! behind traits. This crate provides test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem
//!
//! Usage: swap real implementations for nullables in tests.

pub mod clock;
pub mod codes;
pub mod store;

pub use clock::NullClock;
pub use codes::NullCodes;
pub use store::NullStore;
