// SPDX-License-Identifier: MIT

//! Local key/value persistence.
//!
//! Each key is serialized as its own JSON document at `<root>/<key>.json`,
//! overwritten whole on every write. There are no transactions spanning
//! multiple keys. A detached storage (no root directory) reads nothing and
//! writes nothing; this is a deliberate fallback for contexts without
//! persistence, not an error.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// File-per-key JSON storage.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: Option<PathBuf>,
}

impl LocalStorage {
    /// Open storage rooted at `root`, creating the directory if needed.
    ///
    /// If the directory cannot be created the fault is logged and the
    /// storage falls back to detached mode.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        match fs::create_dir_all(&root) {
            Ok(()) => Self { root: Some(root) },
            Err(err) => {
                tracing::error!(path = %root.display(), error = %err, "Could not open storage, running detached");
                Self { root: None }
            }
        }
    }

    /// Storage that never reads or writes anything.
    pub fn detached() -> Self {
        Self { root: None }
    }

    pub fn is_detached(&self) -> bool {
        self.root.is_none()
    }

    fn key_path(root: &Path, key: &str) -> PathBuf {
        root.join(format!("{key}.json"))
    }

    /// Read and deserialize a key. Absent keys, IO faults, and parse
    /// faults all yield `None`; faults are logged.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let root = self.root.as_ref()?;
        let path = Self::key_path(root, key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                tracing::warn!(key, error = %err, "Storage read failed");
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(key, error = %err, "Storage entry is not valid JSON");
                None
            }
        }
    }

    /// Serialize and write a key, replacing any previous value.
    ///
    /// No-op when detached. Write faults are logged and swallowed; the
    /// in-memory state stays authoritative for the rest of the process.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        let Some(root) = self.root.as_ref() else {
            return;
        };
        let path = Self::key_path(root, key);
        match serde_json::to_vec(value) {
            Ok(bytes) => {
                if let Err(err) = fs::write(&path, bytes) {
                    tracing::warn!(key, error = %err, "Storage write failed");
                }
            }
            Err(err) => {
                tracing::warn!(key, error = %err, "Could not serialize storage entry");
            }
        }
    }
}
