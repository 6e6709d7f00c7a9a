// crates/data-context-core/src/core/datasource.rs
// ============================================================================
// Module: Datasource Configuration
// Description: Serializable datasource and generator configuration records.
// Purpose: Describe registry components independently of how they are built.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A datasource is a named connection to data; each datasource owns named
//! generators that enumerate or accept data asset names. The records here
//! are the persisted form; the runtime registry turns them into live
//! components through its component factory.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Configuration Records
// ============================================================================

/// Datasource configuration record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasourceConfig {
    /// Implementation tag resolved by the component factory.
    pub implementation: String,
    /// Root directory for file-backed datasources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_directory: Option<PathBuf>,
    /// Generators keyed by name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub generators: BTreeMap<String, GeneratorConfig>,
}

impl DatasourceConfig {
    /// Creates a datasource configuration with no generators.
    #[must_use]
    pub fn new(implementation: impl Into<String>) -> Self {
        Self {
            implementation: implementation.into(),
            base_directory: None,
            generators: BTreeMap::new(),
        }
    }

    /// Sets the base directory.
    #[must_use]
    pub fn with_base_directory(mut self, base_directory: impl Into<PathBuf>) -> Self {
        self.base_directory = Some(base_directory.into());
        self
    }

    /// Adds a named generator.
    #[must_use]
    pub fn with_generator(mut self, name: impl Into<String>, generator: GeneratorConfig) -> Self {
        self.generators.insert(name.into(), generator);
        self
    }
}

/// Generator configuration record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Implementation tag resolved by the component factory.
    pub implementation: String,
    /// Directory scanned by directory generators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_directory: Option<PathBuf>,
    /// Asset names listed by manual generators.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assets: Vec<String>,
}

impl GeneratorConfig {
    /// Creates a generator configuration.
    #[must_use]
    pub fn new(implementation: impl Into<String>) -> Self {
        Self {
            implementation: implementation.into(),
            base_directory: None,
            assets: Vec::new(),
        }
    }

    /// Creates a manual generator listing the provided assets.
    #[must_use]
    pub fn manual<I, S>(assets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            implementation: "manual".to_string(),
            base_directory: None,
            assets: assets.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a directory generator over the provided directory.
    #[must_use]
    pub fn directory(base_directory: impl Into<PathBuf>) -> Self {
        Self {
            implementation: "directory".to_string(),
            base_directory: Some(base_directory.into()),
            assets: Vec::new(),
        }
    }

    /// Creates an accepting in-memory generator.
    #[must_use]
    pub fn memory() -> Self {
        Self::new("memory")
    }
}

/// Summary row returned by datasource listings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DatasourceSummary {
    /// Datasource name.
    pub name: String,
    /// Implementation tag.
    pub implementation: String,
}
