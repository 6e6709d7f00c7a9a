// crates/data-context-core/src/runtime/validation_store.rs
// ============================================================================
// Module: Validation Result Store
// Description: Persistence of validation results keyed by suite and run.
// Purpose: Store externally produced results and serve filtered views of them.
// Dependencies: crate::core, crate::interfaces, tracing
// ============================================================================

//! ## Overview
//! Validation results live under five-component keys: the suite key plus the
//! run identifier. When a caller omits the run identifier the greatest
//! stored run identifier for the suite is selected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::DataContextError;
use crate::core::ExpectationSuiteIdentifier;
use crate::core::RunId;
use crate::core::ValidationResult;
use crate::core::ValidationResultIdentifier;
use crate::core::hashing::canonical_json_bytes;
use crate::core::hashing::decode_json;
use crate::interfaces::TupleStoreBackend;
use crate::runtime::store::SharedTupleStoreBackend;

// ============================================================================
// SECTION: Store
// ============================================================================

/// Validation result store.
#[derive(Clone)]
pub struct ValidationResultStore {
    /// Backend holding canonical result documents.
    backend: SharedTupleStoreBackend,
}

impl ValidationResultStore {
    /// Creates a validation result store over a backend.
    ///
    /// # Errors
    ///
    /// Returns [`DataContextError::Config`] when the backend key length is
    /// not [`ValidationResultIdentifier::KEY_LENGTH`].
    pub fn new(backend: SharedTupleStoreBackend) -> Result<Self, DataContextError> {
        if backend.key_length() != ValidationResultIdentifier::KEY_LENGTH {
            return Err(DataContextError::Config(format!(
                "validation result backend must use {} key components, found {}",
                ValidationResultIdentifier::KEY_LENGTH,
                backend.key_length()
            )));
        }
        Ok(Self {
            backend,
        })
    }

    /// Stores a result under its embedded identifier.
    ///
    /// # Errors
    ///
    /// Returns a store error when persistence fails.
    pub fn store(
        &self,
        result: &ValidationResult,
    ) -> Result<ValidationResultIdentifier, DataContextError> {
        let identifier = result.identifier();
        let bytes =
            canonical_json_bytes(result).map_err(|err| DataContextError::Store(err.to_string()))?;
        self.backend.set(&identifier.to_store_key(), &bytes)?;
        tracing::debug!(
            validation_result = %identifier,
            success = result.success,
            "validation result stored"
        );
        Ok(identifier)
    }

    /// Loads a result for a suite.
    ///
    /// `run_id` defaults to the greatest stored run for the suite;
    /// `failed_only` drops successful expectation results.
    ///
    /// # Errors
    ///
    /// Returns [`DataContextError::NotFound`] when no matching result exists,
    /// or [`DataContextError::Store`] when the stored document is unreadable.
    pub fn get(
        &self,
        suite: &ExpectationSuiteIdentifier,
        run_id: Option<&RunId>,
        failed_only: bool,
    ) -> Result<ValidationResult, DataContextError> {
        let run_id = match run_id {
            Some(run_id) => run_id.clone(),
            None => self.latest_run(suite)?,
        };
        let identifier = ValidationResultIdentifier::new(suite.clone(), run_id);
        let bytes = self.backend.get(&identifier.to_store_key())?.ok_or_else(|| {
            DataContextError::NotFound(format!("validation result '{identifier}' not found"))
        })?;
        let result: ValidationResult =
            decode_json(&bytes).map_err(|err| DataContextError::Store(err.to_string()))?;
        if result.identifier() != identifier {
            return Err(DataContextError::Store(format!(
                "stored validation result under '{identifier}' identifies itself as '{}'",
                result.identifier()
            )));
        }
        Ok(if failed_only { result.failed_only() } else { result })
    }

    /// Lists stored result identifiers in ascending order.
    ///
    /// # Errors
    ///
    /// Returns a store error when listing fails.
    pub fn list_keys(&self) -> Result<Vec<ValidationResultIdentifier>, DataContextError> {
        let mut identifiers = Vec::new();
        for key in self.backend.list_keys()? {
            let identifier = ValidationResultIdentifier::from_store_key(&key).ok_or_else(|| {
                DataContextError::Store(format!("malformed validation result key '{key}'"))
            })?;
            identifiers.push(identifier);
        }
        identifiers.sort();
        Ok(identifiers)
    }

    /// Returns the greatest stored run identifier for a suite.
    fn latest_run(&self, suite: &ExpectationSuiteIdentifier) -> Result<RunId, DataContextError> {
        self.list_keys()?
            .into_iter()
            .filter(|identifier| identifier.expectation_suite_identifier() == suite)
            .map(|identifier| identifier.run_id().clone())
            .max()
            .ok_or_else(|| {
                DataContextError::NotFound(format!("no validation results stored for '{suite}'"))
            })
    }
}
