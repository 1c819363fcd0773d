//! HTTP server for the identity-linking service.
//!
//! Endpoints:
//! - `GET /` health check
//! - `POST /api/generate-code` issue a one-time code
//! - `GET /api/confirm` click-through confirmation
//! - `POST /api/verify` payload redemption
//! - `GET /api/status` confirmation status

pub mod error;
pub mod handlers;
pub mod server;

pub use error::RpcError;
pub use server::{router, RpcServer};
