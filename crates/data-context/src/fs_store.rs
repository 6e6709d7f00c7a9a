// crates/data-context/src/fs_store.rs
// ============================================================================
// Module: Filesystem Tuple Store
// Description: TupleStoreBackend writing one JSON file per key.
// Purpose: Persist suites and validation results inside the project tree.
// Dependencies: data-context-core, tracing
// ============================================================================

//! ## Overview
//! A key `[c0, c1, ..., cN]` is stored at `base/c0/c1/.../cN.json`. Key
//! components are validated so no key can escape the base directory. Writes
//! go to a hidden temporary file that is renamed into place, so readers
//! never observe a partial document.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use data_context_core::StoreError;
use data_context_core::StoreKey;
use data_context_core::TupleStoreBackend;
use data_context_core::interfaces::check_key_length;
use tracing::debug;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Suffix appended to the final key component.
const FILE_SUFFIX: &str = ".json";
/// Maximum length of a single key component.
const MAX_COMPONENT_LENGTH: usize = 255;
/// Maximum document size accepted by the store.
pub const MAX_DOCUMENT_BYTES: u64 = 16 * 1024 * 1024;

// ============================================================================
// SECTION: Store
// ============================================================================

/// Filesystem-backed tuple store rooted at a base directory.
#[derive(Debug, Clone)]
pub struct FilesystemTupleStoreBackend {
    /// Directory holding the key tree.
    base_directory: PathBuf,
    /// Number of components every key must have.
    key_length: usize,
}

impl FilesystemTupleStoreBackend {
    /// Creates a store rooted at `base_directory`; the directory is created
    /// lazily on first write.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Invalid`] when `key_length` is zero or the base
    /// path is an existing file.
    pub fn new(base_directory: impl Into<PathBuf>, key_length: usize) -> Result<Self, StoreError> {
        let base_directory = base_directory.into();
        if key_length == 0 {
            return Err(StoreError::Invalid("key length must be positive".to_string()));
        }
        if base_directory.is_file() {
            return Err(StoreError::Invalid(format!(
                "store base directory {} is a file",
                base_directory.display()
            )));
        }
        Ok(Self {
            base_directory,
            key_length,
        })
    }

    /// Returns the base directory.
    #[must_use]
    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Maps a validated key to its file path.
    fn path_for(&self, key: &StoreKey) -> Result<PathBuf, StoreError> {
        check_key_length(key, self.key_length)?;
        let mut path = self.base_directory.clone();
        let components = key.components();
        for (index, component) in components.iter().enumerate() {
            validate_component(component)?;
            if index + 1 == components.len() {
                path.push(format!("{component}{FILE_SUFFIX}"));
            } else {
                path.push(component);
            }
        }
        Ok(path)
    }

    /// Collects keys below `directory` at the given depth.
    fn collect_keys(
        &self,
        directory: &Path,
        prefix: &mut Vec<String>,
        keys: &mut Vec<StoreKey>,
    ) -> Result<(), StoreError> {
        let entries = fs::read_dir(directory).map_err(|err| StoreError::Io(err.to_string()))?;
        let last_level = prefix.len() + 1 == self.key_length;
        for entry in entries {
            let entry = entry.map_err(|err| StoreError::Io(err.to_string()))?;
            let file_type = entry.file_type().map_err(|err| StoreError::Io(err.to_string()))?;
            let Some(name) = entry.file_name().to_str().map(ToString::to_string) else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            if last_level {
                let Some(stem) = name.strip_suffix(FILE_SUFFIX) else {
                    continue;
                };
                if file_type.is_file() && !stem.is_empty() {
                    let mut components = prefix.clone();
                    components.push(stem.to_string());
                    keys.push(StoreKey::new(components));
                }
            } else if file_type.is_dir() {
                prefix.push(name);
                self.collect_keys(&entry.path(), prefix, keys)?;
                prefix.pop();
            }
        }
        Ok(())
    }
}

impl TupleStoreBackend for FilesystemTupleStoreBackend {
    fn key_length(&self) -> usize {
        self.key_length
    }

    fn has(&self, key: &StoreKey) -> Result<bool, StoreError> {
        Ok(self.path_for(key)?.is_file())
    }

    fn get(&self, key: &StoreKey) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.path_for(key)?;
        if !path.is_file() {
            return Ok(None);
        }
        let length = fs::metadata(&path).map_err(|err| StoreError::Io(err.to_string()))?.len();
        if length > MAX_DOCUMENT_BYTES {
            return Err(StoreError::Invalid(format!(
                "document exceeds size limit: {length} bytes (max {MAX_DOCUMENT_BYTES})"
            )));
        }
        fs::read(&path).map(Some).map_err(|err| StoreError::Io(err.to_string()))
    }

    fn set(&self, key: &StoreKey, value: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let Some(parent) = path.parent() else {
            return Err(StoreError::Invalid(format!("key {key} has no parent directory")));
        };
        fs::create_dir_all(parent).map_err(|err| StoreError::Io(err.to_string()))?;
        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            return Err(StoreError::Invalid(format!("key {key} has no file name")));
        };
        let temp_path = parent.join(format!(".{file_name}.tmp"));
        let mut file = fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|err| StoreError::Io(err.to_string()))?;
        file.write_all(value).map_err(|err| StoreError::Io(err.to_string()))?;
        file.sync_all().map_err(|err| StoreError::Io(err.to_string()))?;
        drop(file);
        fs::rename(&temp_path, &path).map_err(|err| StoreError::Io(err.to_string()))?;
        debug!(path = %path.display(), bytes = value.len(), "document written");
        Ok(())
    }

    fn list_keys(&self) -> Result<Vec<StoreKey>, StoreError> {
        if !self.base_directory.is_dir() {
            return Ok(Vec::new());
        }
        let mut keys = Vec::new();
        self.collect_keys(&self.base_directory, &mut Vec::new(), &mut keys)?;
        keys.sort();
        Ok(keys)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Rejects key components that could escape or alias the key tree.
fn validate_component(component: &str) -> Result<(), StoreError> {
    if component.is_empty() {
        return Err(StoreError::Invalid("key components must be non-empty".to_string()));
    }
    if component.len() > MAX_COMPONENT_LENGTH {
        return Err(StoreError::Invalid(format!(
            "key component exceeds {MAX_COMPONENT_LENGTH} bytes"
        )));
    }
    if component.starts_with('.') {
        return Err(StoreError::Invalid(format!(
            "key component '{component}' must not start with '.'"
        )));
    }
    if component.chars().any(|ch| matches!(ch, '/' | '\\' | '\0') || ch.is_control()) {
        return Err(StoreError::Invalid(format!(
            "key component '{component}' contains a path separator or control character"
        )));
    }
    Ok(())
}
