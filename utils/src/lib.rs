//! Shared process utilities for the idlink service.

pub mod logging;

pub use logging::{init_logging, LogFormat, LoggingError};
