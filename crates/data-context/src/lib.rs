// crates/data-context/src/lib.rs
// ============================================================================
// Module: Data Context Library
// Description: Public API surface for project-level data contexts.
// Purpose: Expose the context facade, project layout helpers, and file store.
// Dependencies: crate::{context, fs_store, project}
// ============================================================================

//! ## Overview
//! A [`DataContext`] is opened from a project directory (or built from an
//! in-memory [`ProjectConfig`]) and coordinates datasources, name
//! resolution, and the suite and validation stores. Store backends are
//! chosen by configuration: in-memory, one JSON file per key through
//! [`FilesystemTupleStoreBackend`], or a shared SQLite database.
//!
//! [`ProjectConfig`]: data_context_config::ProjectConfig

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod context;
pub mod fs_store;
pub mod project;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use context::DataAssetName;
pub use context::DataContext;
pub use context::NamedStore;
pub use fs_store::FilesystemTupleStoreBackend;
pub use project::CONTEXT_DIRECTORY_NAME;
pub use project::CONTEXT_HOME_VARIABLE;
pub use project::PROJECT_CONFIG_TEMPLATE;
pub use project::all_uncommitted_directories_exist;
pub use project::find_context_root_dir;
pub use project::scaffold_directories;
pub use project::scaffold_project;
