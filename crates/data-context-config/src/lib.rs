// crates/data-context-config/src/lib.rs
// ============================================================================
// Module: Data Context Config Library
// Description: Canonical project config model, validation, and substitution.
// Purpose: Single source of truth for data_context.toml semantics.
// Dependencies: data-context-core, data-context-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `data-context-config` defines the configuration model for a data context
//! project. Loading is strict and fail-closed: files are size-limited, must
//! be UTF-8, reject unknown fields, and are validated before use. String
//! values may reference `${NAME}` variables resolved from an injected
//! [`VariableSource`] layered over the project's config-variables file.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod variables;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use variables::LayeredVariables;
pub use variables::VariableSource;
pub use variables::load_config_variables;
pub use variables::substitute_str;
pub use variables::substitute_value;
