// crates/data-context-core/src/core/suite.rs
// ============================================================================
// Module: Expectation Suites
// Description: Expectation configurations and the suite document that holds them.
// Purpose: Define the mutable, serializable suite document persisted by the store.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! An [`ExpectationSuite`] is an ordered collection of declarative
//! validation rules bound to one data asset and suite name. Suites are owned
//! by whoever fetched them; the store rewrites the embedded identity on save.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::core::identifiers::DataAssetIdentifier;
use crate::core::identifiers::ExpectationSuiteIdentifier;

// ============================================================================
// SECTION: Expectation Configuration
// ============================================================================

/// A single declarative validation rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectationConfiguration {
    /// Expectation type tag (for example `expect_table_row_count_to_equal`).
    pub expectation_type: String,
    /// Keyword arguments for the expectation.
    #[serde(default)]
    pub kwargs: BTreeMap<String, Value>,
}

impl ExpectationConfiguration {
    /// Creates an expectation configuration.
    #[must_use]
    pub fn new(expectation_type: impl Into<String>, kwargs: BTreeMap<String, Value>) -> Self {
        Self {
            expectation_type: expectation_type.into(),
            kwargs,
        }
    }

    /// Returns the column kwarg when the expectation is column-scoped.
    #[must_use]
    pub fn column(&self) -> Option<&str> {
        self.kwargs.get("column").and_then(Value::as_str)
    }
}

// ============================================================================
// SECTION: Expectation Suite
// ============================================================================

/// Ordered collection of expectations bound to one data asset and suite name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectationSuite {
    /// Data asset the suite is bound to.
    pub data_asset_name: DataAssetIdentifier,
    /// Suite name.
    pub expectation_suite_name: String,
    /// Ordered expectations.
    #[serde(default)]
    pub expectations: Vec<ExpectationConfiguration>,
    /// Free-form metadata.
    #[serde(default)]
    pub meta: Map<String, Value>,
}

impl ExpectationSuite {
    /// Creates an empty suite for the identifier.
    #[must_use]
    pub fn empty(identifier: &ExpectationSuiteIdentifier) -> Self {
        Self {
            data_asset_name: identifier.data_asset_name().clone(),
            expectation_suite_name: identifier.expectation_suite_name().to_string(),
            expectations: Vec::new(),
            meta: Map::new(),
        }
    }

    /// Returns the identifier formed by the suite's embedded fields.
    #[must_use]
    pub fn identifier(&self) -> ExpectationSuiteIdentifier {
        ExpectationSuiteIdentifier::new(
            self.data_asset_name.clone(),
            self.expectation_suite_name.clone(),
        )
    }

    /// Rewrites the embedded identity to match the identifier.
    pub fn assign_identifier(&mut self, identifier: &ExpectationSuiteIdentifier) {
        self.data_asset_name = identifier.data_asset_name().clone();
        self.expectation_suite_name = identifier.expectation_suite_name().to_string();
    }

    /// Appends an expectation to the end of the suite.
    pub fn append_expectation(&mut self, expectation: ExpectationConfiguration) {
        self.expectations.push(expectation);
    }
}
