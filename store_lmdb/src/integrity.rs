//! LMDB database integrity checks.
//!
//! Run on startup to detect corruption early, before the service begins
//! accepting requests.

use std::path::Path;

use heed::types::Bytes;
use heed::{Database, RoTxn};
use idlink_store::{PendingCode, VerificationRecord};

use crate::environment::{CONFIRMATIONS_DB, PENDING_CODES_DB, RECORDS_DB};
use crate::{LmdbEnvironment, LmdbError};

/// Summary of an integrity check run.
#[derive(Debug, Default)]
pub struct IntegrityReport {
    pub databases_checked: u32,
    pub total_entries: u64,
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// Returns `true` if no errors were detected.
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Decode every entry and check that each value belongs to the identity it is
/// keyed under. Problems are collected into the report rather than returned
/// as a hard error.
pub fn check_integrity(env: &LmdbEnvironment) -> Result<IntegrityReport, LmdbError> {
    let mut report = IntegrityReport::default();
    let rtxn = env.env.read_txn()?;

    scan(&rtxn, &env.pending_codes_db, PENDING_CODES_DB, &mut report, |key, val| {
        let pending: PendingCode = bincode::deserialize(val).map_err(|e| e.to_string())?;
        key_matches(key, pending.identity.as_str())
    });
    scan(&rtxn, &env.records_db, RECORDS_DB, &mut report, |key, val| {
        let record: VerificationRecord = bincode::deserialize(val).map_err(|e| e.to_string())?;
        key_matches(key, record.identity.as_str())
    });
    scan(&rtxn, &env.confirmations_db, CONFIRMATIONS_DB, &mut report, |_, val| {
        if val.is_empty() {
            Err("empty confirmation marker".to_string())
        } else {
            Ok(())
        }
    });

    Ok(report)
}

fn scan(
    rtxn: &RoTxn<'_>,
    db: &Database<Bytes, Bytes>,
    name: &str,
    report: &mut IntegrityReport,
    check: impl Fn(&[u8], &[u8]) -> Result<(), String>,
) {
    report.databases_checked += 1;
    let iter = match db.iter(rtxn) {
        Ok(iter) => iter,
        Err(e) => {
            report
                .errors
                .push(format!("failed to read database '{}': {}", name, e));
            return;
        }
    };
    for entry in iter {
        match entry {
            Ok((key, val)) => {
                report.total_entries += 1;
                if let Err(reason) = check(key, val) {
                    report.errors.push(format!(
                        "{}: bad entry for key '{}': {}",
                        name,
                        String::from_utf8_lossy(key),
                        reason
                    ));
                }
            }
            Err(e) => {
                report
                    .errors
                    .push(format!("{}: cursor error: {}", name, e));
                return;
            }
        }
    }
}

fn key_matches(key: &[u8], identity: &str) -> Result<(), String> {
    if key == identity.as_bytes() {
        Ok(())
    } else {
        Err(format!("value belongs to identity '{}'", identity))
    }
}

/// Check if the LMDB data directory looks valid before opening.
///
/// A missing or empty directory is a fresh start. A directory holding other
/// files but no `data.mdb` suggests the wrong path or a damaged store.
pub fn check_data_dir(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Ok(());
    }
    if path.join("data.mdb").exists() {
        return Ok(());
    }
    let has_entries = std::fs::read_dir(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?
        .next()
        .is_some();
    if has_entries {
        return Err(format!(
            "LMDB directory is not empty but data.mdb is missing at {}",
            path.display()
        ));
    }
    Ok(())
}
