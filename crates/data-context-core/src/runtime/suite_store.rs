// crates/data-context-core/src/runtime/suite_store.rs
// ============================================================================
// Module: Expectation Suite Store
// Description: Identity-checked persistence of expectation suites over a tuple backend.
// Purpose: Enforce create, overwrite, and rename-on-save rules for suites.
// Dependencies: crate::core, crate::interfaces, tracing
// ============================================================================

//! ## Overview
//! Suites are stored under their four-component identifier key as canonical
//! JSON. The embedded identity of a stored document must match the key it
//! lives under; any disagreement is treated as corruption. Saving a suite
//! under a new identifier rewrites its embedded identity and leaves the
//! previous key untouched.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use crate::core::DataAssetIdentifier;
use crate::core::DataContextError;
use crate::core::ExpectationSuite;
use crate::core::ExpectationSuiteIdentifier;
use crate::core::hashing::canonical_json_bytes;
use crate::core::hashing::decode_json;
use crate::interfaces::TupleStoreBackend;
use crate::runtime::store::SharedTupleStoreBackend;

// ============================================================================
// SECTION: Store
// ============================================================================

/// Expectation suite store.
#[derive(Clone)]
pub struct ExpectationSuiteStore {
    /// Backend holding canonical suite documents.
    backend: SharedTupleStoreBackend,
}

impl ExpectationSuiteStore {
    /// Creates a suite store over a backend.
    ///
    /// # Errors
    ///
    /// Returns [`DataContextError::Config`] when the backend key length is
    /// not [`ExpectationSuiteIdentifier::KEY_LENGTH`].
    pub fn new(backend: SharedTupleStoreBackend) -> Result<Self, DataContextError> {
        if backend.key_length() != ExpectationSuiteIdentifier::KEY_LENGTH {
            return Err(DataContextError::Config(format!(
                "expectation suite backend must use {} key components, found {}",
                ExpectationSuiteIdentifier::KEY_LENGTH,
                backend.key_length()
            )));
        }
        Ok(Self {
            backend,
        })
    }

    /// Persists and returns an empty suite.
    ///
    /// # Errors
    ///
    /// Returns [`DataContextError::AlreadyExists`] when the suite exists and
    /// `overwrite` is false, or a store error when persistence fails.
    pub fn create(
        &self,
        identifier: &ExpectationSuiteIdentifier,
        overwrite: bool,
    ) -> Result<ExpectationSuite, DataContextError> {
        if !overwrite && self.backend.has(&identifier.to_store_key())? {
            return Err(DataContextError::AlreadyExists(format!(
                "expectation_suite '{}' already exists for data_asset '{}'; use overwrite to \
                 replace it",
                identifier.expectation_suite_name(),
                identifier.data_asset_name()
            )));
        }
        let suite = ExpectationSuite::empty(identifier);
        self.write(identifier, &suite)?;
        Ok(suite)
    }

    /// Loads a stored suite.
    ///
    /// # Errors
    ///
    /// Returns [`DataContextError::NotFound`] when absent, or
    /// [`DataContextError::Store`] when the stored document is unreadable or
    /// its embedded identity disagrees with its key.
    pub fn get(
        &self,
        identifier: &ExpectationSuiteIdentifier,
    ) -> Result<ExpectationSuite, DataContextError> {
        let bytes = self.backend.get(&identifier.to_store_key())?.ok_or_else(|| {
            DataContextError::NotFound(format!(
                "expectation_suite '{}' not found for data_asset '{}'",
                identifier.expectation_suite_name(),
                identifier.data_asset_name()
            ))
        })?;
        let suite: ExpectationSuite =
            decode_json(&bytes).map_err(|err| DataContextError::Store(err.to_string()))?;
        if suite.identifier() != *identifier {
            return Err(DataContextError::Store(format!(
                "stored suite under '{identifier}' identifies itself as '{}'",
                suite.identifier()
            )));
        }
        Ok(suite)
    }

    /// Saves a suite under the explicit identifier, or its embedded one.
    ///
    /// The suite's embedded identity is rewritten to the effective
    /// identifier before persisting.
    ///
    /// # Errors
    ///
    /// Returns a store error when persistence fails.
    pub fn save(
        &self,
        suite: &mut ExpectationSuite,
        identifier: Option<&ExpectationSuiteIdentifier>,
    ) -> Result<ExpectationSuiteIdentifier, DataContextError> {
        let effective = identifier.cloned().unwrap_or_else(|| suite.identifier());
        suite.assign_identifier(&effective);
        self.write(&effective, suite)?;
        Ok(effective)
    }

    /// Lists stored suite identifiers in ascending order.
    ///
    /// # Errors
    ///
    /// Returns a store error when listing fails.
    pub fn list_keys(&self) -> Result<Vec<ExpectationSuiteIdentifier>, DataContextError> {
        let mut identifiers = Vec::new();
        for key in self.backend.list_keys()? {
            let identifier = ExpectationSuiteIdentifier::from_store_key(&key).ok_or_else(|| {
                DataContextError::Store(format!("malformed expectation suite key '{key}'"))
            })?;
            identifiers.push(identifier);
        }
        identifiers.sort();
        Ok(identifiers)
    }

    /// Returns the assets that hold at least one stored suite.
    ///
    /// # Errors
    ///
    /// Returns a store error when listing fails.
    pub fn stored_assets(&self) -> Result<BTreeSet<DataAssetIdentifier>, DataContextError> {
        Ok(self
            .list_keys()?
            .into_iter()
            .map(|identifier| identifier.data_asset_name().clone())
            .collect())
    }

    /// Writes a suite document under the identifier.
    fn write(
        &self,
        identifier: &ExpectationSuiteIdentifier,
        suite: &ExpectationSuite,
    ) -> Result<(), DataContextError> {
        let bytes =
            canonical_json_bytes(suite).map_err(|err| DataContextError::Store(err.to_string()))?;
        self.backend.set(&identifier.to_store_key(), &bytes)?;
        tracing::debug!(
            expectation_suite = %identifier,
            expectations = suite.expectations.len(),
            "expectation suite saved"
        );
        Ok(())
    }
}
