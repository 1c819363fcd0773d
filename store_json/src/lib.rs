//! JSON file storage backend for the idlink service.
//!
//! The whole namespace lives in one JSON document holding the three mappings.
//! It is loaded into memory when the store is opened and rewritten after every
//! write batch. A batch is applied to a copy of the document, the copy is
//! written to a temporary file and renamed over the original, and only then
//! does the copy replace the in-memory document. A failed write therefore
//! leaves memory and disk in agreement.

pub mod document;
pub mod error;
pub mod store;

pub use document::Document;
pub use error::JsonStoreError;
pub use store::JsonFileStore;
