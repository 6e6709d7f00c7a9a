// crates/data-context-core/tests/suite_store.rs
// ============================================================================
// Module: Expectation Suite Store Tests
// Description: Tests for suite create, get, save, and listing semantics.
// Purpose: Validate identity precedence and fail-closed persistence rules.
// Dependencies: data-context-core, serde_json
// ============================================================================
//! ## Overview
//! Covers overwrite protection, rename-on-save, and identity checks against
//! documents tampered with in the backend.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use std::collections::BTreeMap;

use common::memory_suite_store;
use common::suite_id;
use data_context_core::DataContextErrorKind;
use data_context_core::ExpectationConfiguration;
use data_context_core::ExpectationSuiteIdentifier;
use data_context_core::ExpectationSuiteStore;
use data_context_core::InMemoryTupleStoreBackend;
use data_context_core::SharedTupleStoreBackend;
use data_context_core::TupleStoreBackend;
use serde_json::json;

fn row_count_expectation(value: i64) -> ExpectationConfiguration {
    ExpectationConfiguration::new(
        "expect_table_row_count_to_equal",
        BTreeMap::from([("value".to_string(), json!(value))]),
    )
}

/// Verifies a second create fails unless overwrite is requested.
#[test]
fn create_rejects_duplicates_without_overwrite() {
    let store = memory_suite_store();
    let id = suite_id("ds", "gen", "titanic", "test_create_expectation_suite");
    let mut suite = store.create(&id, false).unwrap();
    suite.append_expectation(row_count_expectation(10));
    store.save(&mut suite, None).unwrap();

    let err = store.create(&id, false).unwrap_err();
    assert_eq!(err.kind(), DataContextErrorKind::AlreadyExists);
    assert!(err.message().contains("already exists"));

    let replaced = store.create(&id, true).unwrap();
    assert!(replaced.expectations.is_empty());
    assert!(store.get(&id).unwrap().expectations.is_empty());
}

/// Verifies created suites carry the identifier and start empty.
#[test]
fn create_persists_empty_suite() {
    let store = memory_suite_store();
    let id = suite_id("ds", "gen", "new_asset", "default");
    let suite = store.create(&id, false).unwrap();
    assert_eq!(suite.identifier(), id);
    assert!(suite.expectations.is_empty());
    assert_eq!(store.get(&id).unwrap(), suite);
}

/// Verifies get fails for missing suites.
#[test]
fn get_missing_suite_is_not_found() {
    let store = memory_suite_store();
    let err = store.get(&suite_id("ds", "gen", "a", "default")).unwrap_err();
    assert_eq!(err.kind(), DataContextErrorKind::NotFound);
}

/// Verifies saving with an explicit identifier rewrites the embedded identity.
#[test]
fn save_with_explicit_identifier_renames_suite() {
    let store = memory_suite_store();
    let original = suite_id("ds", "gen", "a", "default");
    let mut suite = store.create(&original, false).unwrap();
    suite.append_expectation(row_count_expectation(3));

    let renamed = suite_id("ds", "gen", "b", "warning");
    let effective = store.save(&mut suite, Some(&renamed)).unwrap();
    assert_eq!(effective, renamed);
    assert_eq!(suite.identifier(), renamed);

    let loaded = store.get(&renamed).unwrap();
    assert_eq!(loaded.data_asset_name, *renamed.data_asset_name());
    assert_eq!(loaded.expectation_suite_name, "warning");
    assert_eq!(loaded.expectations, suite.expectations);
    assert!(store.get(&original).unwrap().expectations.is_empty());
}

/// Verifies saving without an identifier uses the embedded fields.
#[test]
fn save_without_identifier_uses_embedded_fields() {
    let store = memory_suite_store();
    let id = suite_id("ds", "gen", "a", "default");
    let mut suite = store.create(&id, false).unwrap();
    suite.expectation_suite_name = "edited".to_string();
    let effective = store.save(&mut suite, None).unwrap();
    assert_eq!(effective, suite_id("ds", "gen", "a", "edited"));
    assert_eq!(store.list_keys().unwrap().len(), 2);
}

/// Verifies listings are sorted by identifier.
#[test]
fn list_keys_are_sorted() {
    let store = memory_suite_store();
    for (asset, suite) in [("b", "default"), ("a", "warning"), ("a", "default")] {
        store.create(&suite_id("ds", "gen", asset, suite), false).unwrap();
    }
    let keys = store.list_keys().unwrap();
    assert_eq!(
        keys,
        vec![
            suite_id("ds", "gen", "a", "default"),
            suite_id("ds", "gen", "a", "warning"),
            suite_id("ds", "gen", "b", "default"),
        ]
    );
}

/// Verifies documents whose identity disagrees with their key fail closed.
#[test]
fn mismatched_stored_identity_fails_closed() {
    let backend = InMemoryTupleStoreBackend::new(ExpectationSuiteIdentifier::KEY_LENGTH);
    let store =
        ExpectationSuiteStore::new(SharedTupleStoreBackend::from_backend(backend.clone())).unwrap();
    let real = suite_id("ds", "gen", "a", "default");
    store.create(&real, false).unwrap();
    let bytes = backend.get(&real.to_store_key()).unwrap().unwrap();

    let forged = suite_id("ds", "gen", "other", "default");
    backend.set(&forged.to_store_key(), &bytes).unwrap();
    let err = store.get(&forged).unwrap_err();
    assert_eq!(err.kind(), DataContextErrorKind::Store);
}

/// Verifies backends with the wrong key length are rejected.
#[test]
fn store_requires_four_component_backend() {
    let backend = SharedTupleStoreBackend::from_backend(InMemoryTupleStoreBackend::new(5));
    let err = ExpectationSuiteStore::new(backend).err().unwrap();
    assert_eq!(err.kind(), DataContextErrorKind::Config);
}
