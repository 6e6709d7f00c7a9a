// crates/data-context-core/src/core/parameters.rs
// ============================================================================
// Module: Evaluation Parameters
// Description: Parameter URN grammar and the compiled cross-suite parameter index.
// Purpose: Describe references from expectation kwargs to other suites' results.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! An expectation kwarg may defer its value to another validation result by
//! holding `{"$PARAMETER": "<urn>"}`. Validation URNs name a result field of a
//! specific expectation in a specific suite:
//!
//! ```text
//! urn:great_expectations:validations:<asset>:<suite>:expectations:<type>:<target>
//! <target> = columns:<column>:<key>[:...] | <key>[:...]
//! ```
//!
//! [`CompiledParameters`] is the reverse index built across all stored suites.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde_json::Value;
use thiserror::Error;

use crate::core::identifiers::DataAssetIdentifier;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Kwarg key marking a deferred parameter value.
pub const PARAMETER_KEY: &str = "$PARAMETER";
/// Prefix shared by all validation result URNs.
pub const VALIDATION_URN_PREFIX: &str = "urn:great_expectations:validations:";
/// Table-level URN keys recognized by the compiler.
const TABLE_KEYS: [&str; 2] = ["result", "details"];
/// Segment that follows the suite name.
const EXPECTATIONS_SEGMENT: &str = "expectations";

// ============================================================================
// SECTION: URN Parsing
// ============================================================================

/// Result field addressed by a validation URN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterTarget {
    /// Field of a column-scoped expectation.
    Column {
        /// Column name.
        column: String,
        /// Result key (for example `result`).
        key: String,
    },
    /// Field of a table-scoped expectation (`result` or `details`).
    Table {
        /// Result key.
        key: String,
    },
}

/// Reasons a parameter URN cannot be indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UrnParseError {
    /// URN does not start with [`VALIDATION_URN_PREFIX`].
    #[error("not a validation urn")]
    NotValidationUrn,
    /// URN has fewer components than the grammar requires.
    #[error("too few urn components")]
    TooFewParts,
    /// Segment after the suite is not `expectations`, or a table-level key
    /// is neither `result` nor `details`.
    #[error("unrecognized parameter structure")]
    UnrecognizedStructure,
}

/// Parsed validation URN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterUrn {
    /// Original URN text.
    pub raw: String,
    /// Data asset name as written in the URN (may be partial).
    pub data_asset_name: String,
    /// Suite name.
    pub expectation_suite_name: String,
    /// Expectation type.
    pub expectation_type: String,
    /// Addressed result field.
    pub target: ParameterTarget,
}

impl ParameterUrn {
    /// Parses a validation URN.
    ///
    /// # Errors
    ///
    /// Returns [`UrnParseError`] when the URN does not follow the grammar.
    pub fn parse(urn: &str) -> Result<Self, UrnParseError> {
        if !urn.starts_with(VALIDATION_URN_PREFIX) {
            return Err(UrnParseError::NotValidationUrn);
        }
        let parts: Vec<&str> = urn.split(':').collect();
        let part = |index: usize| {
            parts.get(index).map(|value| (*value).to_string()).ok_or(UrnParseError::TooFewParts)
        };
        let data_asset_name = part(3)?;
        let expectation_suite_name = part(4)?;
        if part(5)? != EXPECTATIONS_SEGMENT {
            return Err(UrnParseError::UnrecognizedStructure);
        }
        let expectation_type = part(6)?;
        let target = if part(7)? == "columns" {
            ParameterTarget::Column {
                column: part(8)?,
                key: part(9)?,
            }
        } else {
            let key = part(7)?;
            if !TABLE_KEYS.contains(&key.as_str()) {
                return Err(UrnParseError::UnrecognizedStructure);
            }
            ParameterTarget::Table {
                key,
            }
        };
        Ok(Self {
            raw: urn.to_string(),
            data_asset_name,
            expectation_suite_name,
            expectation_type,
            target,
        })
    }
}

/// Returns the parameter URN held by a kwarg value, if any.
#[must_use]
pub fn parameter_reference(value: &Value) -> Option<&str> {
    value.as_object()?.get(PARAMETER_KEY)?.as_str()
}

// ============================================================================
// SECTION: Compiled Index
// ============================================================================

/// URN sets referenced for one expectation of one suite.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExpectationParameters {
    /// Column name → result key → URNs.
    pub columns: BTreeMap<String, BTreeMap<String, BTreeSet<String>>>,
    /// Table-level result key → URNs.
    pub fields: BTreeMap<String, BTreeSet<String>>,
}

/// Suite name → expectation type → referenced parameters.
pub type SuiteParameters = BTreeMap<String, BTreeMap<String, ExpectationParameters>>;

/// Reverse index from referenced validation fields to their URNs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompiledParameters {
    /// Every validation URN referenced by any stored suite.
    pub raw: BTreeSet<String>,
    /// Referenced asset → suite → expectation → parameters.
    pub data_assets: BTreeMap<DataAssetIdentifier, SuiteParameters>,
}

impl CompiledParameters {
    /// Records a parsed URN under the resolved asset.
    pub fn insert(&mut self, asset: DataAssetIdentifier, urn: &ParameterUrn) {
        self.raw.insert(urn.raw.clone());
        let expectation = self
            .data_assets
            .entry(asset)
            .or_default()
            .entry(urn.expectation_suite_name.clone())
            .or_default()
            .entry(urn.expectation_type.clone())
            .or_default();
        match &urn.target {
            ParameterTarget::Column {
                column,
                key,
            } => {
                expectation
                    .columns
                    .entry(column.clone())
                    .or_default()
                    .entry(key.clone())
                    .or_default()
                    .insert(urn.raw.clone());
            }
            ParameterTarget::Table {
                key,
            } => {
                expectation.fields.entry(key.clone()).or_default().insert(urn.raw.clone());
            }
        }
    }

    /// Returns true when no parameter references were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions unwrap known-good inputs."
    )]

    use super::*;

    #[test]
    fn parses_column_and_table_urns() {
        let column = ParameterUrn::parse(
            "urn:great_expectations:validations:ds/gen/a:default:expectations:expect_x:columns:c:\
             result:observed_value",
        )
        .unwrap();
        assert_eq!(
            column.target,
            ParameterTarget::Column {
                column: "c".to_string(),
                key: "result".to_string()
            }
        );
        let table = ParameterUrn::parse(
            "urn:great_expectations:validations:a:default:expectations:expect_y:details:x",
        )
        .unwrap();
        assert_eq!(table.data_asset_name, "a");
        assert_eq!(
            table.target,
            ParameterTarget::Table {
                key: "details".to_string()
            }
        );
    }

    #[test]
    fn rejects_short_and_unrecognized_urns() {
        assert_eq!(
            ParameterUrn::parse("urn:great_expectations:validations:a:default"),
            Err(UrnParseError::TooFewParts)
        );
        assert_eq!(
            ParameterUrn::parse("urn:great_expectations:validations:a:s:expectations:t:bogus"),
            Err(UrnParseError::UnrecognizedStructure)
        );
        assert_eq!(
            ParameterUrn::parse("urn:great_expectations:validations:a:s:bogus:t:result"),
            Err(UrnParseError::UnrecognizedStructure)
        );
        assert_eq!(ParameterUrn::parse("urn:other:thing"), Err(UrnParseError::NotValidationUrn));
    }
}
