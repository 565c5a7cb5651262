//! Durable single-process ledger stored as one JSON document.
//!
//! Document layout:
//!
//! ```json
//! { "version": 1, "entries": { "<key>": "<base64 value>" } }
//! ```
//!
//! Values are arbitrary bytes, hence the base64 encoding. Every `put`
//! rewrites the document to a sibling temp file and renames it over the
//! original, so a crash mid-write leaves the previous document intact.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::traits::LedgerGateway;

const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct LedgerDocument {
    version: u32,
    entries: BTreeMap<String, String>,
}

/// Ledger persisted to a JSON file on disk.
#[derive(Debug)]
pub struct FileLedger {
    path: PathBuf,
    entries: BTreeMap<String, Vec<u8>>,
}

impl FileLedger {
    /// Open the ledger at `path`, starting empty if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "ledger file not found, starting empty");
            return Ok(FileLedger {
                path,
                entries: BTreeMap::new(),
            });
        }

        let content = fs::read_to_string(&path).map_err(|source| StorageError::Io {
            path: path.clone(),
            source,
        })?;
        let document: LedgerDocument =
            serde_json::from_str(&content).map_err(|e| StorageError::Corrupt {
                path: path.clone(),
                message: e.to_string(),
            })?;
        if document.version != FORMAT_VERSION {
            return Err(StorageError::Corrupt {
                path,
                message: format!(
                    "unsupported format version {} (expected {})",
                    document.version, FORMAT_VERSION
                ),
            });
        }

        let mut entries = BTreeMap::new();
        for (key, encoded) in document.entries {
            let value = BASE64.decode(encoded.as_bytes()).map_err(|e| StorageError::Corrupt {
                path: path.clone(),
                message: format!("value for key '{}' is not valid base64: {}", key, e),
            })?;
            entries.insert(key, value);
        }
        tracing::debug!(path = %path.display(), entries = entries.len(), "ledger file loaded");
        Ok(FileLedger { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) -> Result<(), StorageError> {
        let document = LedgerDocument {
            version: FORMAT_VERSION,
            entries: self
                .entries
                .iter()
                .map(|(k, v)| (k.clone(), BASE64.encode(v)))
                .collect(),
        };
        let json = serde_json::to_string_pretty(&document)
            .map_err(|e| StorageError::Backend(format!("ledger encode failed: {}", e)))?;

        let mut tmp_name = OsString::from(self.path.as_os_str());
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        fs::write(&tmp_path, json).map_err(|source| StorageError::Io {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| StorageError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl LedgerGateway for FileLedger {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let previous = self.entries.insert(key.to_string(), value.to_vec());
        if let Err(e) = self.persist() {
            // Keep memory in line with what is on disk.
            match previous {
                Some(old) => self.entries.insert(key.to_string(), old),
                None => self.entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }
}
