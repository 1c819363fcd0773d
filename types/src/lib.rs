//! Fundamental types for the idlink service.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! chat-platform identities, one-time verification codes, digests and timestamps.

pub mod code;
pub mod digest;
pub mod identity;
pub mod time;

pub use code::VerificationCode;
pub use digest::Digest;
pub use identity::Identity;
pub use time::{Clock, SystemClock, Timestamp};
