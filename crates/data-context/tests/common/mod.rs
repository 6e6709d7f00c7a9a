// crates/data-context/tests/common/mod.rs
// =============================================================================
// Module: Data Context Test Helpers
// Description: Shared context builders for facade integration tests.
// Purpose: Build in-memory and on-disk contexts with minimal boilerplate.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::collections::BTreeMap;
use std::path::Path;

use data_context::DataContext;
use data_context_config::ProjectConfig;
use data_context_core::DatasourceConfig;
use data_context_core::GeneratorConfig;

/// Returns an empty variable source.
pub fn no_variables() -> BTreeMap<String, String> {
    BTreeMap::new()
}

/// Builds a variable source from literal pairs.
pub fn variables(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs.iter().map(|(key, value)| ((*key).to_string(), (*value).to_string())).collect()
}

/// Builds an in-memory config from `(datasource, generator, assets)` rows.
pub fn manual_config(rows: &[(&str, &str, &[&str])]) -> ProjectConfig {
    let mut config = ProjectConfig::default();
    for (datasource, generator, assets) in rows {
        config
            .datasources
            .entry((*datasource).to_string())
            .or_insert_with(|| DatasourceConfig::new("memory"))
            .generators
            .insert((*generator).to_string(), GeneratorConfig::manual(assets.iter().copied()));
    }
    config
}

/// Opens an in-memory context over manual generators.
pub fn memory_context(rows: &[(&str, &str, &[&str])]) -> DataContext {
    DataContext::from_config(manual_config(rows), None, &no_variables()).unwrap()
}

/// Scaffolds and opens a project context under `project_root`.
pub fn project_context(project_root: &Path) -> DataContext {
    DataContext::create(project_root, &no_variables()).unwrap()
}
