// crates/data-context-core/src/lib.rs
// ============================================================================
// Module: Data Context Core Library
// Description: Public API surface for the data context core.
// Purpose: Expose identifiers, documents, interfaces, and runtime components.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! The data context core resolves short data asset names into
//! fully-qualified identifiers and persists expectation suites and
//! validation results under those identifiers. It is storage-agnostic and
//! integrates through the [`TupleStoreBackend`] and [`AssetGenerator`]
//! interfaces.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use interfaces::AssetGenerator;
pub use interfaces::GeneratorCapability;
pub use interfaces::StoreError;
pub use interfaces::TupleStoreBackend;
pub use runtime::AvailableAssetNames;
pub use runtime::ComponentFactory;
pub use runtime::DEFAULT_GENERATOR_NAME;
pub use runtime::Datasource;
pub use runtime::DatasourceRegistry;
pub use runtime::DuplicatePolicy;
pub use runtime::ExpectationSuiteStore;
pub use runtime::InMemoryTupleStoreBackend;
pub use runtime::NameResolver;
pub use runtime::ResolveIntent;
pub use runtime::SharedTupleStoreBackend;
pub use runtime::ValidationResultStore;
pub use runtime::compile_parameters;
