// crates/data-context-core/src/interfaces/mod.rs
// ============================================================================
// Module: Data Context Interfaces
// Description: Backend-agnostic interfaces for document storage and asset generators.
// Purpose: Define the contract surfaces used by the registry, resolver, and stores.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Interfaces separate the data context runtime from where documents live
//! and how asset names are discovered. Store backends persist opaque
//! canonical JSON under fixed-length tuple keys; generators report the asset
//! names they know about. Implementations must fail closed on invalid keys
//! or corrupted data.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use thiserror::Error;

use crate::core::DataContextError;
use crate::core::StoreKey;

// ============================================================================
// SECTION: Tuple Store Backend
// ============================================================================

/// Tuple store backend errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("tuple store io error: {0}")]
    Io(String),
    /// Store data is corrupted or fails integrity checks.
    #[error("tuple store corruption: {0}")]
    Corrupt(String),
    /// Store data version is incompatible.
    #[error("tuple store version mismatch: {0}")]
    VersionMismatch(String),
    /// Key or payload is invalid for this backend.
    #[error("tuple store invalid data: {0}")]
    Invalid(String),
    /// Store reported an error.
    #[error("tuple store error: {0}")]
    Store(String),
}

impl From<StoreError> for DataContextError {
    fn from(error: StoreError) -> Self {
        Self::Store(error.to_string())
    }
}

/// Key-value persistence keyed by fixed-length string tuples.
pub trait TupleStoreBackend {
    /// Returns the number of components every key must have.
    fn key_length(&self) -> usize;

    /// Returns true when a document is stored under the key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn has(&self, key: &StoreKey) -> Result<bool, StoreError>;

    /// Loads the document stored under the key.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when loading fails or the data is corrupt.
    fn get(&self, key: &StoreKey) -> Result<Option<Vec<u8>>, StoreError>;

    /// Stores a document under the key, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the key is invalid or writing fails.
    fn set(&self, key: &StoreKey, value: &[u8]) -> Result<(), StoreError>;

    /// Lists every stored key in ascending order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when listing fails.
    fn list_keys(&self) -> Result<Vec<StoreKey>, StoreError>;
}

/// Rejects keys whose component count differs from the backend's key length.
///
/// # Errors
///
/// Returns [`StoreError::Invalid`] on a length mismatch.
pub fn check_key_length(key: &StoreKey, key_length: usize) -> Result<(), StoreError> {
    if key.len() == key_length {
        Ok(())
    } else {
        Err(StoreError::Invalid(format!(
            "key '{key}' has {} components; expected {key_length}",
            key.len()
        )))
    }
}

// ============================================================================
// SECTION: Asset Generators
// ============================================================================

/// How a generator participates in name resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorCapability {
    /// Generator lists concrete asset names.
    Enumerating,
    /// Generator lists nothing but accepts any new asset name.
    Accepting,
}

/// Source of data asset names within a datasource.
pub trait AssetGenerator: Send + Sync {
    /// Returns the implementation tag used to build the generator.
    fn implementation(&self) -> &str;

    /// Returns how the generator participates in name resolution.
    fn capability(&self) -> GeneratorCapability;

    /// Returns the asset names the generator currently enumerates.
    ///
    /// # Errors
    ///
    /// Returns [`DataContextError`] when the underlying source cannot be read.
    fn asset_names(&self) -> Result<BTreeSet<String>, DataContextError>;
}
