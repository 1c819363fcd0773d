//! File-backed store over a single [`Document`].

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use idlink_store::{
    BatchWriter, ConfirmationStore, PendingCode, PendingCodeStore, RecordStore, StoreError,
    VerificationRecord, WriteBatch,
};
use idlink_types::Identity;

use crate::{Document, JsonStoreError};

/// A store that keeps the whole document in memory and flushes it to one
/// JSON file after every batch.
pub struct JsonFileStore {
    path: PathBuf,
    document: RwLock<Document>,
}

impl JsonFileStore {
    /// Load the document at `path`, creating an empty one on first use.
    ///
    /// Parent directories are created as needed. The empty document is written
    /// immediately so a misconfigured path fails here rather than on the first
    /// request.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, JsonStoreError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
        }

        let document = if path.exists() {
            read_document(&path)?
        } else {
            let empty = Document::default();
            write_document(&path, &empty)?;
            empty
        };

        tracing::debug!(
            path = %path.display(),
            pending = document.pending_codes.len(),
            records = document.records.len(),
            "loaded JSON store"
        );

        Ok(Self {
            path,
            document: RwLock::new(document),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file from disk, replacing the in-memory document.
    pub fn reload(&self) -> Result<(), JsonStoreError> {
        let fresh = read_document(&self.path)?;
        *self.document.write().map_err(|_| JsonStoreError::Poisoned)? = fresh;
        Ok(())
    }

    fn read<T>(&self, f: impl FnOnce(&Document) -> T) -> Result<T, StoreError> {
        let guard = self.document.read().map_err(|_| JsonStoreError::Poisoned)?;
        Ok(f(&guard))
    }
}

/// Parse the file at `path`. A blank file is an empty document.
fn read_document(path: &Path) -> Result<Document, JsonStoreError> {
    let raw = fs::read(path).map_err(|e| io_error(path, e))?;
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(Document::default());
    }
    serde_json::from_slice(&raw).map_err(|source| JsonStoreError::Malformed {
        path: path.display().to_string(),
        source,
    })
}

/// Write to `<path>.tmp`, fsync, then rename over `path`.
fn write_document(path: &Path, document: &Document) -> Result<(), JsonStoreError> {
    let bytes = serde_json::to_vec_pretty(document)?;
    let tmp = tmp_path(path);
    let mut file = fs::File::create(&tmp).map_err(|e| io_error(&tmp, e))?;
    file.write_all(&bytes).map_err(|e| io_error(&tmp, e))?;
    file.sync_all().map_err(|e| io_error(&tmp, e))?;
    drop(file);
    fs::rename(&tmp, path).map_err(|e| io_error(path, e))?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn io_error(path: &Path, source: std::io::Error) -> JsonStoreError {
    JsonStoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

impl PendingCodeStore for JsonFileStore {
    fn get_pending_code(&self, identity: &Identity) -> Result<Option<PendingCode>, StoreError> {
        self.read(|doc| doc.pending_codes.get(identity).cloned())
    }

    fn pending_code_count(&self) -> Result<u64, StoreError> {
        self.read(|doc| doc.pending_codes.len() as u64)
    }
}

impl RecordStore for JsonFileStore {
    fn get_record(&self, identity: &Identity) -> Result<Option<VerificationRecord>, StoreError> {
        self.read(|doc| doc.records.get(identity).cloned())
    }

    fn record_count(&self) -> Result<u64, StoreError> {
        self.read(|doc| doc.records.len() as u64)
    }
}

impl ConfirmationStore for JsonFileStore {
    fn is_confirmed(&self, identity: &Identity) -> Result<bool, StoreError> {
        self.read(|doc| doc.is_confirmed(identity))
    }

    fn confirmed_count(&self) -> Result<u64, StoreError> {
        self.read(|doc| doc.confirmations.values().filter(|c| **c).count() as u64)
    }
}

impl BatchWriter for JsonFileStore {
    fn write_batch(&self, batch: WriteBatch) -> Result<(), StoreError> {
        if batch.is_empty() {
            return Ok(());
        }
        let mut guard = self
            .document
            .write()
            .map_err(|_| JsonStoreError::Poisoned)?;
        let mut next = guard.clone();
        next.apply(batch);
        write_document(&self.path, &next)?;
        *guard = next;
        Ok(())
    }
}
