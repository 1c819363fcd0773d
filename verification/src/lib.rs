//! Identity-link verification.
//!
//! A chat-platform identity is linked to an external username and a device
//! fingerprint in three steps:
//! 1. **Issue**: a one-time code is generated and stored as pending.
//! 2. **Click** (optional): an in-browser click-through presents the code and
//!    marks the identity as confirmed, leaving the code redeemable.
//! 3. **Payload**: the code is submitted together with the username,
//!    fingerprint and IP; the hashed record is written, the identity is marked
//!    confirmed and the code is consumed.
//!
//! A status query reads the confirmation flag without side effects.

pub mod error;
pub mod locks;
pub mod registry;
pub mod request;
pub mod state;

pub use error::VerificationError;
pub use registry::{RegistryConfig, SessionRegistry};
pub use request::{VerifyRequest, MAX_IDENTITY_LEN};
pub use state::{SessionState, VerificationSession};
