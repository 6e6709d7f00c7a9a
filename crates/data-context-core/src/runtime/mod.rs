// crates/data-context-core/src/runtime/mod.rs
// ============================================================================
// Module: Data Context Runtime
// Description: Registry, name resolution, stores, and parameter compilation.
// Purpose: Implement data context behavior over the core types and interfaces.
// Dependencies: crate::{core, interfaces}, tracing
// ============================================================================

//! ## Overview
//! Runtime modules hold the stateful parts of a data context. The façade in
//! the `data-context` crate composes them; every surface (library or CLI)
//! resolves names and persists suites through the same code paths.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod compiler;
pub mod generators;
pub mod registry;
pub mod resolver;
pub mod store;
pub mod suite_store;
pub mod validation_store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use compiler::compile_parameters;
pub use generators::DirectoryGenerator;
pub use generators::ManualGenerator;
pub use generators::MemoryGenerator;
pub use registry::AvailableAssetNames;
pub use registry::ComponentFactory;
pub use registry::DEFAULT_GENERATOR_NAME;
pub use registry::Datasource;
pub use registry::DatasourceRegistry;
pub use registry::DuplicatePolicy;
pub use resolver::NameResolver;
pub use resolver::ResolveIntent;
pub use store::InMemoryTupleStoreBackend;
pub use store::SharedTupleStoreBackend;
pub use suite_store::ExpectationSuiteStore;
pub use validation_store::ValidationResultStore;
