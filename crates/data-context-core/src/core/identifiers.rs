// crates/data-context-core/src/core/identifiers.rs
// ============================================================================
// Module: Data Context Identifiers
// Description: Fully-qualified data asset, suite, and validation identifiers.
// Purpose: Provide immutable, ordered identifiers with stable string and key forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Identifiers are structural value objects. A [`DataAssetIdentifier`] is the
//! `(datasource, generator, generator_asset)` triple produced by name
//! resolution; suites and validation results extend it with a suite name and
//! a run identifier. Each identifier materializes as a fixed-length
//! [`StoreKey`] for tuple store backends.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::error::DataContextError;

// ============================================================================
// SECTION: Delimiter
// ============================================================================

/// Characters accepted as data asset name delimiters.
pub const ALLOWED_DELIMITERS: [char; 2] = ['/', '.'];

/// Validated single-character delimiter for data asset names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NameDelimiter(char);

impl NameDelimiter {
    /// The default `/` delimiter.
    pub const SLASH: Self = Self('/');

    /// Parses a delimiter string.
    ///
    /// # Errors
    ///
    /// Returns [`DataContextError::InvalidDelimiter`] unless the input is
    /// exactly one of [`ALLOWED_DELIMITERS`].
    pub fn parse(value: &str) -> Result<Self, DataContextError> {
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) if ALLOWED_DELIMITERS.contains(&ch) => Ok(Self(ch)),
            _ => Err(DataContextError::InvalidDelimiter(format!(
                "Invalid delimiter: '{value}'; delimiter must be one of '/' or '.'"
            ))),
        }
    }

    /// Returns the delimiter character.
    #[must_use]
    pub const fn as_char(self) -> char {
        self.0
    }
}

impl Default for NameDelimiter {
    fn default() -> Self {
        Self::SLASH
    }
}

impl fmt::Display for NameDelimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<String> for NameDelimiter {
    type Error = DataContextError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<NameDelimiter> for String {
    fn from(value: NameDelimiter) -> Self {
        value.0.to_string()
    }
}

// ============================================================================
// SECTION: Store Keys
// ============================================================================

/// Fixed-length tuple key used by store backends.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreKey(Vec<String>);

impl StoreKey {
    /// Creates a store key from its components.
    #[must_use]
    pub fn new(components: Vec<String>) -> Self {
        Self(components)
    }

    /// Returns the key components.
    #[must_use]
    pub fn components(&self) -> &[String] {
        &self.0
    }

    /// Returns the number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when the key has no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("/"))
    }
}

// ============================================================================
// SECTION: Data Asset Identifier
// ============================================================================

/// Fully-qualified data asset reference.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DataAssetIdentifier {
    /// Datasource name.
    datasource: String,
    /// Generator name within the datasource.
    generator: String,
    /// Asset name within the generator.
    generator_asset: String,
}

impl DataAssetIdentifier {
    /// Creates a new data asset identifier.
    #[must_use]
    pub fn new(
        datasource: impl Into<String>,
        generator: impl Into<String>,
        generator_asset: impl Into<String>,
    ) -> Self {
        Self {
            datasource: datasource.into(),
            generator: generator.into(),
            generator_asset: generator_asset.into(),
        }
    }

    /// Parses a fully-qualified `datasource<d>generator<d>asset` string.
    ///
    /// # Errors
    ///
    /// Returns [`DataContextError::InvalidName`] unless the input splits into
    /// exactly three non-empty components.
    pub fn parse(value: &str, delimiter: NameDelimiter) -> Result<Self, DataContextError> {
        let parts: Vec<&str> = value.split(delimiter.as_char()).collect();
        match parts.as_slice() {
            [datasource, generator, asset]
                if !datasource.is_empty() && !generator.is_empty() && !asset.is_empty() =>
            {
                Ok(Self::new(*datasource, *generator, *asset))
            }
            _ => Err(DataContextError::InvalidName(format!(
                "Invalid data_asset_name '{value}': expected three non-empty components using \
                 delimiter '{delimiter}'"
            ))),
        }
    }

    /// Returns the datasource name.
    #[must_use]
    pub fn datasource(&self) -> &str {
        &self.datasource
    }

    /// Returns the generator name.
    #[must_use]
    pub fn generator(&self) -> &str {
        &self.generator
    }

    /// Returns the generator asset name.
    #[must_use]
    pub fn generator_asset(&self) -> &str {
        &self.generator_asset
    }

    /// Renders the identifier joined with the provided delimiter.
    #[must_use]
    pub fn to_delimited_string(&self, delimiter: NameDelimiter) -> String {
        let d = delimiter.as_char();
        format!("{}{d}{}{d}{}", self.datasource, self.generator, self.generator_asset)
    }

    /// Returns the first component that contains `delimiter`, if any.
    #[must_use]
    pub fn component_containing(&self, delimiter: NameDelimiter) -> Option<&str> {
        [self.datasource.as_str(), self.generator.as_str(), self.generator_asset.as_str()]
            .into_iter()
            .find(|component| component.contains(delimiter.as_char()))
    }

    /// Checks that the identifier can be written as a delimited name.
    ///
    /// # Errors
    ///
    /// Returns [`DataContextError::InvalidName`] when a component is empty or
    /// contains `delimiter`.
    pub fn ensure_nameable(&self, delimiter: NameDelimiter) -> Result<(), DataContextError> {
        let empty = [&self.datasource, &self.generator, &self.generator_asset]
            .into_iter()
            .any(String::is_empty);
        if empty {
            return Err(DataContextError::InvalidName(format!(
                "Invalid data_asset_name '{self}': components must be non-empty"
            )));
        }
        if let Some(component) = self.component_containing(delimiter) {
            return Err(DataContextError::InvalidName(format!(
                "Invalid data_asset_name '{self}': component '{component}' contains delimiter \
                 '{delimiter}'"
            )));
        }
        Ok(())
    }
}

impl fmt::Display for DataAssetIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_delimited_string(NameDelimiter::SLASH))
    }
}

// ============================================================================
// SECTION: Expectation Suite Identifier
// ============================================================================

/// Identifies exactly one persisted expectation suite.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExpectationSuiteIdentifier {
    /// Data asset the suite is bound to.
    data_asset_name: DataAssetIdentifier,
    /// Suite name within the data asset.
    expectation_suite_name: String,
}

impl ExpectationSuiteIdentifier {
    /// Number of components in a suite store key.
    pub const KEY_LENGTH: usize = 4;

    /// Creates a new suite identifier.
    #[must_use]
    pub fn new(
        data_asset_name: DataAssetIdentifier,
        expectation_suite_name: impl Into<String>,
    ) -> Self {
        Self {
            data_asset_name,
            expectation_suite_name: expectation_suite_name.into(),
        }
    }

    /// Returns the data asset identifier.
    #[must_use]
    pub const fn data_asset_name(&self) -> &DataAssetIdentifier {
        &self.data_asset_name
    }

    /// Returns the suite name.
    #[must_use]
    pub fn expectation_suite_name(&self) -> &str {
        &self.expectation_suite_name
    }

    /// Returns the `[datasource, generator, asset, suite]` store key.
    #[must_use]
    pub fn to_store_key(&self) -> StoreKey {
        StoreKey::new(vec![
            self.data_asset_name.datasource.clone(),
            self.data_asset_name.generator.clone(),
            self.data_asset_name.generator_asset.clone(),
            self.expectation_suite_name.clone(),
        ])
    }

    /// Rebuilds an identifier from a store key, if well-formed.
    #[must_use]
    pub fn from_store_key(key: &StoreKey) -> Option<Self> {
        match key.components() {
            [datasource, generator, asset, suite] => Some(Self::new(
                DataAssetIdentifier::new(datasource, generator, asset),
                suite,
            )),
            _ => None,
        }
    }
}

impl fmt::Display for ExpectationSuiteIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.data_asset_name, self.expectation_suite_name)
    }
}

// ============================================================================
// SECTION: Validation Identifiers
// ============================================================================

/// Validation run identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(String);

impl RunId {
    /// Creates a new run identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for RunId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RunId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Identifies one stored validation result.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ValidationResultIdentifier {
    /// Suite the validation ran against.
    expectation_suite_identifier: ExpectationSuiteIdentifier,
    /// Validation run identifier.
    run_id: RunId,
}

impl ValidationResultIdentifier {
    /// Number of components in a validation store key.
    pub const KEY_LENGTH: usize = 5;

    /// Creates a new validation result identifier.
    #[must_use]
    pub const fn new(expectation_suite_identifier: ExpectationSuiteIdentifier, run_id: RunId) -> Self {
        Self {
            expectation_suite_identifier,
            run_id,
        }
    }

    /// Returns the suite identifier.
    #[must_use]
    pub const fn expectation_suite_identifier(&self) -> &ExpectationSuiteIdentifier {
        &self.expectation_suite_identifier
    }

    /// Returns the run identifier.
    #[must_use]
    pub const fn run_id(&self) -> &RunId {
        &self.run_id
    }

    /// Returns the `[datasource, generator, asset, suite, run_id]` store key.
    #[must_use]
    pub fn to_store_key(&self) -> StoreKey {
        let mut components = self.expectation_suite_identifier.to_store_key().0;
        components.push(self.run_id.0.clone());
        StoreKey::new(components)
    }

    /// Rebuilds an identifier from a store key, if well-formed.
    #[must_use]
    pub fn from_store_key(key: &StoreKey) -> Option<Self> {
        match key.components() {
            [datasource, generator, asset, suite, run_id] => Some(Self::new(
                ExpectationSuiteIdentifier::new(
                    DataAssetIdentifier::new(datasource, generator, asset),
                    suite,
                ),
                RunId::new(run_id),
            )),
            _ => None,
        }
    }
}

impl fmt::Display for ValidationResultIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.expectation_suite_identifier, self.run_id)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions.")]

    use super::*;
    use crate::core::DataContextErrorKind;

    #[test]
    fn delimiter_rejects_multi_character_and_unlisted_values() {
        assert!(NameDelimiter::parse("//").is_err());
        assert!(NameDelimiter::parse("$").is_err());
        assert!(NameDelimiter::parse("").is_err());
        assert_eq!(NameDelimiter::parse(".").map(NameDelimiter::as_char), Ok('.'));
    }

    #[test]
    fn suite_key_roundtrips_through_store_key() {
        let id = ExpectationSuiteIdentifier::new(DataAssetIdentifier::new("ds", "gen", "a"), "s");
        let key = id.to_store_key();
        assert_eq!(key.len(), ExpectationSuiteIdentifier::KEY_LENGTH);
        assert_eq!(ExpectationSuiteIdentifier::from_store_key(&key), Some(id));
    }

    #[test]
    fn nameable_identifiers_exclude_the_active_delimiter() {
        let dotted = DataAssetIdentifier::new("ds", "gen", "sales.2019");
        assert!(dotted.ensure_nameable(NameDelimiter::SLASH).is_ok());
        let dot = NameDelimiter::parse(".").unwrap();
        assert_eq!(dotted.component_containing(dot), Some("sales.2019"));
        let err = dotted.ensure_nameable(dot).unwrap_err();
        assert_eq!(err.kind(), DataContextErrorKind::InvalidName);

        let empty = DataAssetIdentifier::new("ds", "", "a");
        assert!(empty.ensure_nameable(NameDelimiter::SLASH).is_err());
    }
}
