// crates/data-context-store-sqlite/src/lib.rs
// ============================================================================
// Module: SQLite Tuple Store
// Description: Durable TupleStoreBackend using SQLite WAL.
// Purpose: Persist suites and validation results in a single database file.
// Dependencies: data-context-core, rusqlite
// ============================================================================

//! ## Overview
//! This crate provides a SQLite-backed [`TupleStoreBackend`] implementation.
//! Documents are stored with an integrity hash and verified on every load.
//! Several stores with different key lengths can share one database file.
//!
//! [`TupleStoreBackend`]: data_context_core::TupleStoreBackend

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::MAX_DOCUMENT_BYTES;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
pub use store::SqliteTupleStoreBackend;
