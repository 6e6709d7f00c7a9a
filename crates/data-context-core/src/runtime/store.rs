// crates/data-context-core/src/runtime/store.rs
// ============================================================================
// Module: In-Memory Tuple Store
// Description: Process-local tuple store backend and a shared backend wrapper.
// Purpose: Provide a deterministic backend for ephemeral contexts and tests.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! [`InMemoryTupleStoreBackend`] keeps documents in an ordered map behind a
//! mutex, so listings come back sorted without extra work.
//! [`SharedTupleStoreBackend`] erases the concrete backend so stores can be
//! configured at runtime.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use crate::core::StoreKey;
use crate::interfaces::StoreError;
use crate::interfaces::TupleStoreBackend;
use crate::interfaces::check_key_length;

// ============================================================================
// SECTION: In-Memory Backend
// ============================================================================

/// In-memory tuple store backend.
#[derive(Debug, Clone)]
pub struct InMemoryTupleStoreBackend {
    /// Required key length.
    key_length: usize,
    /// Documents keyed by store key, protected by a mutex.
    entries: Arc<Mutex<BTreeMap<StoreKey, Vec<u8>>>>,
}

impl InMemoryTupleStoreBackend {
    /// Creates an empty backend for keys of the given length.
    #[must_use]
    pub fn new(key_length: usize) -> Self {
        Self {
            key_length,
            entries: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }

    /// Locks the entry map.
    fn entries(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, BTreeMap<StoreKey, Vec<u8>>>, StoreError> {
        self.entries.lock().map_err(|_| StoreError::Store("tuple store mutex poisoned".to_string()))
    }
}

impl TupleStoreBackend for InMemoryTupleStoreBackend {
    fn key_length(&self) -> usize {
        self.key_length
    }

    fn has(&self, key: &StoreKey) -> Result<bool, StoreError> {
        check_key_length(key, self.key_length)?;
        Ok(self.entries()?.contains_key(key))
    }

    fn get(&self, key: &StoreKey) -> Result<Option<Vec<u8>>, StoreError> {
        check_key_length(key, self.key_length)?;
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &StoreKey, value: &[u8]) -> Result<(), StoreError> {
        check_key_length(key, self.key_length)?;
        self.entries()?.insert(key.clone(), value.to_vec());
        Ok(())
    }

    fn list_keys(&self) -> Result<Vec<StoreKey>, StoreError> {
        Ok(self.entries()?.keys().cloned().collect())
    }
}

// ============================================================================
// SECTION: Shared Backend Wrapper
// ============================================================================

/// Shared tuple store backend backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedTupleStoreBackend {
    /// Inner backend implementation.
    inner: Arc<dyn TupleStoreBackend + Send + Sync>,
}

impl SharedTupleStoreBackend {
    /// Wraps a backend in a shared, clonable wrapper.
    #[must_use]
    pub fn from_backend(backend: impl TupleStoreBackend + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(backend),
        }
    }
}

impl TupleStoreBackend for SharedTupleStoreBackend {
    fn key_length(&self) -> usize {
        self.inner.key_length()
    }

    fn has(&self, key: &StoreKey) -> Result<bool, StoreError> {
        self.inner.has(key)
    }

    fn get(&self, key: &StoreKey) -> Result<Option<Vec<u8>>, StoreError> {
        self.inner.get(key)
    }

    fn set(&self, key: &StoreKey, value: &[u8]) -> Result<(), StoreError> {
        self.inner.set(key, value)
    }

    fn list_keys(&self) -> Result<Vec<StoreKey>, StoreError> {
        self.inner.list_keys()
    }
}
