use idlink_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("field {field} exceeds {max} bytes")]
    FieldTooLong { field: &'static str, max: usize },

    #[error("invalid verification code")]
    InvalidCode,

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
