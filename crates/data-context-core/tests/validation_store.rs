// crates/data-context-core/tests/validation_store.rs
// ============================================================================
// Module: Validation Result Store Tests
// Description: Tests for storing and filtering validation results.
// Purpose: Validate latest-run selection and failed-only filtering.
// Dependencies: data-context-core
// ============================================================================
//! ## Overview
//! Stores results for several runs and checks the views served back.

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

use common::suite_id;
use data_context_core::DataContextErrorKind;
use data_context_core::ExpectationConfiguration;
use data_context_core::ExpectationValidationResult;
use data_context_core::InMemoryTupleStoreBackend;
use data_context_core::RunId;
use data_context_core::SharedTupleStoreBackend;
use data_context_core::ValidationResult;
use data_context_core::ValidationResultIdentifier;
use data_context_core::ValidationResultStore;
use serde_json::Map;

fn validation_store() -> ValidationResultStore {
    ValidationResultStore::new(SharedTupleStoreBackend::from_backend(
        InMemoryTupleStoreBackend::new(ValidationResultIdentifier::KEY_LENGTH),
    ))
    .unwrap()
}

fn outcome(expectation_type: &str, success: bool) -> ExpectationValidationResult {
    ExpectationValidationResult {
        success,
        expectation_config: ExpectationConfiguration::new(expectation_type, BTreeMap::new()),
        result: Map::new(),
    }
}

/// Verifies an omitted run id selects the greatest stored run.
#[test]
fn missing_run_id_selects_latest_run() {
    let store = validation_store();
    let suite = suite_id("ds", "gen", "a", "default");
    for run in ["20260101T000000Z", "20260301T000000Z", "20260201T000000Z"] {
        store
            .store(&ValidationResult::new(suite.clone(), RunId::new(run), vec![outcome(
                "expect_x", true,
            )]))
            .unwrap();
    }
    let other = suite_id("ds", "gen", "b", "default");
    store.store(&ValidationResult::new(other, RunId::new("20991231T000000Z"), Vec::new())).unwrap();

    let latest = store.get(&suite, None, false).unwrap();
    assert_eq!(latest.meta.run_id, RunId::new("20260301T000000Z"));
    let pinned = store.get(&suite, Some(&RunId::new("20260101T000000Z")), false).unwrap();
    assert_eq!(pinned.meta.run_id.as_str(), "20260101T000000Z");
}

/// Verifies failed-only views drop successful results but keep statistics.
#[test]
fn failed_only_filters_successful_results() {
    let store = validation_store();
    let suite = suite_id("ds", "gen", "a", "default");
    let result = ValidationResult::new(suite.clone(), RunId::new("run-1"), vec![
        outcome("expect_ok", true),
        outcome("expect_bad", false),
        outcome("expect_fine", true),
    ]);
    assert!(!result.success);
    assert_eq!(result.statistics.unsuccessful_expectations, 1);
    store.store(&result).unwrap();

    let failed = store.get(&suite, None, true).unwrap();
    assert_eq!(failed.results.len(), 1);
    assert_eq!(failed.results[0].expectation_config.expectation_type, "expect_bad");
    assert_eq!(failed.statistics.evaluated_expectations, 3);
    assert_eq!(store.get(&suite, None, false).unwrap().results.len(), 3);
}

/// Verifies lookups with no stored runs are not found.
#[test]
fn missing_results_are_not_found() {
    let store = validation_store();
    let suite = suite_id("ds", "gen", "a", "default");
    assert_eq!(store.get(&suite, None, false).unwrap_err().kind(), DataContextErrorKind::NotFound);
    assert_eq!(
        store.get(&suite, Some(&RunId::new("nope")), false).unwrap_err().kind(),
        DataContextErrorKind::NotFound
    );
    assert!(store.list_keys().unwrap().is_empty());
}
