// crates/data-context-core/src/runtime/generators.rs
// ============================================================================
// Module: Built-In Asset Generators
// Description: Directory, manual, and in-memory generator implementations.
// Purpose: Supply asset names to the registry for name resolution and listings.
// Dependencies: crate::core, crate::interfaces, tracing
// ============================================================================

//! ## Overview
//! Directory generators enumerate a directory on every call so newly added
//! files are visible without rebuilding the registry. Manual generators list
//! the names given in configuration. In-memory generators enumerate nothing
//! and accept any name.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use crate::core::DataContextError;
use crate::interfaces::AssetGenerator;
use crate::interfaces::GeneratorCapability;

// ============================================================================
// SECTION: Implementation Tags
// ============================================================================

/// Tag for generators that list files in a directory.
pub const DIRECTORY_GENERATOR: &str = "directory";
/// Tag for generators that list configured names.
pub const MANUAL_GENERATOR: &str = "manual";
/// Tag for accepting in-memory generators.
pub const MEMORY_GENERATOR: &str = "memory";

// ============================================================================
// SECTION: Directory Generator
// ============================================================================

/// Generator listing the entries of a directory.
#[derive(Debug, Clone)]
pub struct DirectoryGenerator {
    /// Directory to enumerate.
    base_directory: PathBuf,
}

impl DirectoryGenerator {
    /// Creates a directory generator.
    #[must_use]
    pub fn new(base_directory: impl Into<PathBuf>) -> Self {
        Self {
            base_directory: base_directory.into(),
        }
    }

    /// Returns the enumerated directory.
    #[must_use]
    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }
}

impl AssetGenerator for DirectoryGenerator {
    fn implementation(&self) -> &str {
        DIRECTORY_GENERATOR
    }

    fn capability(&self) -> GeneratorCapability {
        GeneratorCapability::Enumerating
    }

    fn asset_names(&self) -> Result<BTreeSet<String>, DataContextError> {
        let entries = match fs::read_dir(&self.base_directory) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(
                    directory = %self.base_directory.display(),
                    "generator directory does not exist"
                );
                return Ok(BTreeSet::new());
            }
            Err(err) => return Err(io_error(&self.base_directory, &err)),
        };
        let mut names = BTreeSet::new();
        for entry in entries {
            let entry = entry.map_err(|err| io_error(&self.base_directory, &err))?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if file_name.starts_with('.') {
                continue;
            }
            let file_type = entry.file_type().map_err(|err| io_error(&entry.path(), &err))?;
            let name = if file_type.is_dir() {
                file_name.to_string()
            } else {
                asset_name_from_file(file_name)
            };
            if !name.is_empty() {
                names.insert(name);
            }
        }
        Ok(names)
    }
}

/// Strips the final extension from a file name.
fn asset_name_from_file(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map_or_else(|| file_name.to_string(), ToString::to_string)
}

/// Formats a filesystem failure for a generator directory.
fn io_error(path: &Path, err: &std::io::Error) -> DataContextError {
    DataContextError::Io(format!("failed to list {}: {err}", path.display()))
}

// ============================================================================
// SECTION: Manual Generator
// ============================================================================

/// Generator listing a fixed set of configured names.
#[derive(Debug, Clone, Default)]
pub struct ManualGenerator {
    /// Configured asset names.
    assets: BTreeSet<String>,
}

impl ManualGenerator {
    /// Creates a manual generator.
    #[must_use]
    pub fn new<I, S>(assets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            assets: assets.into_iter().map(Into::into).collect(),
        }
    }
}

impl AssetGenerator for ManualGenerator {
    fn implementation(&self) -> &str {
        MANUAL_GENERATOR
    }

    fn capability(&self) -> GeneratorCapability {
        GeneratorCapability::Enumerating
    }

    fn asset_names(&self) -> Result<BTreeSet<String>, DataContextError> {
        Ok(self.assets.clone())
    }
}

// ============================================================================
// SECTION: Memory Generator
// ============================================================================

/// Generator that enumerates nothing and accepts any asset name.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryGenerator;

impl AssetGenerator for MemoryGenerator {
    fn implementation(&self) -> &str {
        MEMORY_GENERATOR
    }

    fn capability(&self) -> GeneratorCapability {
        GeneratorCapability::Accepting
    }

    fn asset_names(&self) -> Result<BTreeSet<String>, DataContextError> {
        Ok(BTreeSet::new())
    }
}
