//! JSON file persistence for the key-value store
//!
//! The whole store is one JSON object on disk. Every mutation rewrites it
//! with the same write-then-rename pattern the config file uses.

use super::KeyValueStore;
use crate::config::get_config_dir;
use crate::error::{Error, Result};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Store file name inside the config directory
const STORE_FILE_NAME: &str = "store.json";

/// Temporary file name used during atomic writes
const STORE_BACKUP_NAME: &str = "store.json.bak";

/// Key-value store backed by a JSON file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store in the platform config directory.
    pub fn open_default() -> Result<Self> {
        Self::open(get_config_dir()?.join(STORE_FILE_NAME))
    }

    /// Open (or start) a store at `path`.
    ///
    /// A missing or empty file yields an empty store. A file that is not a
    /// JSON object is renamed to `<name>.corrupt` first, so the next write
    /// cannot destroy it.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|e| Error::Store {
                message: format!("failed to read '{}': {}", path.display(), e),
            })?;
            if contents.trim().is_empty() {
                BTreeMap::new()
            } else {
                match serde_json::from_str(&contents) {
                    Ok(entries) => entries,
                    Err(e) => {
                        let aside = corrupt_path(&path);
                        fs::rename(&path, &aside).map_err(|source| Error::FileWrite {
                            path: aside.clone(),
                            source,
                        })?;
                        warn!(
                            "Store file at {} is not valid JSON ({}), moved to {} and starting empty",
                            path.display(),
                            e,
                            aside.display()
                        );
                        BTreeMap::new()
                    }
                }
            }
        } else {
            debug!("No store file at {}, starting empty", path.display());
            BTreeMap::new()
        };

        Ok(Self { path, entries })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| Error::Store {
                message: format!("failed to create '{}': {}", dir.display(), e),
            })?;
        }

        let json = serde_json::to_string_pretty(&self.entries).map_err(|e| Error::Store {
            message: e.to_string(),
        })?;

        let backup_path = self.path.with_file_name(STORE_BACKUP_NAME);
        fs::write(&backup_path, json).map_err(|source| Error::FileWrite {
            path: backup_path.clone(),
            source,
        })?;
        fs::rename(&backup_path, &self.path).map_err(|source| Error::FileWrite {
            path: self.path.clone(),
            source,
        })?;

        debug!("Saved store to {}", self.path.display());
        Ok(())
    }
}

/// Where an undecodable store file is kept: the same name plus `.corrupt`.
fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".corrupt");
    PathBuf::from(name)
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
