// crates/data-context-core/tests/common/mod.rs
// =============================================================================
// Module: Core Test Helpers
// Description: Shared registry and store fixtures for core integration tests.
// Purpose: Reduce duplication across resolver, store, and compiler suites.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::collections::BTreeSet;

use data_context_core::DataAssetIdentifier;
use data_context_core::DataContextError;
use data_context_core::DatasourceConfig;
use data_context_core::DatasourceRegistry;
use data_context_core::ExpectationSuiteIdentifier;
use data_context_core::ExpectationSuiteStore;
use data_context_core::GeneratorConfig;
use data_context_core::InMemoryTupleStoreBackend;
use data_context_core::NameDelimiter;
use data_context_core::NameResolver;
use data_context_core::ResolveIntent;
use data_context_core::SharedTupleStoreBackend;

/// Builds a registry from `(datasource, generator, assets)` rows using manual generators.
pub fn manual_registry(rows: &[(&str, &str, &[&str])]) -> DatasourceRegistry {
    let mut registry = DatasourceRegistry::default();
    for (datasource, generator, assets) in rows {
        if registry.datasource(datasource).is_none() {
            let config = DatasourceConfig::new("memory")
                .with_generator(*generator, GeneratorConfig::manual(assets.iter().copied()));
            registry.add_datasource(datasource, config).unwrap();
        } else {
            registry
                .add_generator(datasource, generator, GeneratorConfig::manual(assets.iter().copied()))
                .unwrap();
        }
    }
    registry
}

/// Resolves a name with the default delimiter and no stored suites.
pub fn resolve(
    registry: &DatasourceRegistry,
    name: &str,
    intent: ResolveIntent,
) -> Result<DataAssetIdentifier, DataContextError> {
    resolve_with(registry, &BTreeSet::new(), NameDelimiter::SLASH, name, intent)
}

/// Resolves a name against the registry and stored suite assets.
pub fn resolve_with(
    registry: &DatasourceRegistry,
    stored: &BTreeSet<DataAssetIdentifier>,
    delimiter: NameDelimiter,
    name: &str,
    intent: ResolveIntent,
) -> Result<DataAssetIdentifier, DataContextError> {
    NameResolver::new(registry, stored, delimiter).resolve(name, intent)
}

/// Returns a suite store over a fresh in-memory backend.
pub fn memory_suite_store() -> ExpectationSuiteStore {
    let backend = SharedTupleStoreBackend::from_backend(InMemoryTupleStoreBackend::new(
        ExpectationSuiteIdentifier::KEY_LENGTH,
    ));
    ExpectationSuiteStore::new(backend).unwrap()
}

/// Builds a suite identifier from string parts.
pub fn suite_id(datasource: &str, generator: &str, asset: &str, suite: &str) -> ExpectationSuiteIdentifier {
    ExpectationSuiteIdentifier::new(DataAssetIdentifier::new(datasource, generator, asset), suite)
}
