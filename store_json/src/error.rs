use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonStoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed store document {path}: {source}")]
    Malformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store lock poisoned")]
    Poisoned,
}

impl From<JsonStoreError> for idlink_store::StoreError {
    fn from(e: JsonStoreError) -> Self {
        match e {
            JsonStoreError::Malformed { .. } => idlink_store::StoreError::Corruption(e.to_string()),
            JsonStoreError::Serialization(err) => {
                idlink_store::StoreError::Serialization(err.to_string())
            }
            other => idlink_store::StoreError::Backend(other.to_string()),
        }
    }
}
