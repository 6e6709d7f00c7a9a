// crates/data-context-core/src/core/mod.rs
// ============================================================================
// Module: Data Context Core Types
// Description: Identifiers, documents, and configuration records for a data context.
// Purpose: Provide stable, serializable types shared by every data context crate.
// Dependencies: serde, serde_json, serde_jcs, sha2, thiserror
// ============================================================================

//! ## Overview
//! Core types are plain values. They carry no registry or store handles, so
//! they can be built, compared, and serialized anywhere in the workspace.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod datasource;
pub mod error;
pub mod hashing;
pub mod identifiers;
pub mod parameters;
pub mod suite;
pub mod validation;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use datasource::DatasourceConfig;
pub use datasource::DatasourceSummary;
pub use datasource::GeneratorConfig;
pub use error::DataContextError;
pub use error::DataContextErrorKind;
pub use hashing::DEFAULT_HASH_ALGORITHM;
pub use hashing::DocumentError;
pub use hashing::HashAlgorithm;
pub use hashing::HashDigest;
pub use identifiers::ALLOWED_DELIMITERS;
pub use identifiers::DataAssetIdentifier;
pub use identifiers::ExpectationSuiteIdentifier;
pub use identifiers::NameDelimiter;
pub use identifiers::RunId;
pub use identifiers::StoreKey;
pub use identifiers::ValidationResultIdentifier;
pub use parameters::CompiledParameters;
pub use parameters::ExpectationParameters;
pub use parameters::ParameterTarget;
pub use parameters::ParameterUrn;
pub use parameters::SuiteParameters;
pub use parameters::UrnParseError;
pub use suite::ExpectationConfiguration;
pub use suite::ExpectationSuite;
pub use validation::ExpectationValidationResult;
pub use validation::ValidationResult;
pub use validation::ValidationResultMeta;
pub use validation::ValidationStatistics;
