// crates/data-context-cli/src/lib.rs
// ============================================================================
// Module: Data Context CLI Library
// Description: Shared helpers for the `data-context` binary.
// Purpose: Expose the message catalog to the binary and its tests.
// Dependencies: crate::i18n
// ============================================================================

//! ## Overview
//! The binary lives in `main.rs`; this library carries the pieces that
//! integration tests exercise directly.

pub mod i18n;
