// crates/data-context/tests/fs_store.rs
// ============================================================================
// Module: Filesystem Tuple Store Tests
// Description: Tests for path layout, key validation, and listing.
// Purpose: Validate that keys map to files without escaping the base tree.
// Dependencies: data-context, data-context-core, tempfile
// ============================================================================
//! ## Overview
//! Keys become nested directories ending in a `.json` file. Components that
//! could alias or escape the tree are rejected before any I/O.

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

use std::fs;

use data_context::FilesystemTupleStoreBackend;
use data_context_core::StoreError;
use data_context_core::StoreKey;
use data_context_core::TupleStoreBackend;

fn key(parts: &[&str]) -> StoreKey {
    StoreKey::new(parts.iter().map(ToString::to_string).collect())
}

/// Verifies documents land at the nested path and read back intact.
#[test]
fn set_writes_nested_json_file() {
    let temp = tempfile::tempdir().unwrap();
    let store = FilesystemTupleStoreBackend::new(temp.path().join("expectations"), 3).unwrap();
    let stored = key(&["ds", "gen", "asset"]);

    assert!(!store.has(&stored).unwrap());
    assert_eq!(store.get(&stored).unwrap(), None);
    store.set(&stored, b"{\"a\":1}").unwrap();

    let path = temp.path().join("expectations/ds/gen/asset.json");
    assert_eq!(fs::read(&path).unwrap(), b"{\"a\":1}");
    assert!(store.has(&stored).unwrap());
    assert_eq!(store.get(&stored).unwrap().unwrap(), b"{\"a\":1}");

    store.set(&stored, b"{\"a\":2}").unwrap();
    assert_eq!(store.get(&stored).unwrap().unwrap(), b"{\"a\":2}");
    assert!(!temp.path().join("expectations/ds/gen/.asset.json.tmp").exists());
}

/// Verifies listing is sorted and skips hidden or foreign files.
#[test]
fn list_keys_is_sorted_and_filtered() {
    let temp = tempfile::tempdir().unwrap();
    let store = FilesystemTupleStoreBackend::new(temp.path(), 2).unwrap();
    store.set(&key(&["b", "two"]), b"2").unwrap();
    store.set(&key(&["a", "one"]), b"1").unwrap();
    store.set(&key(&["b", "one"]), b"3").unwrap();
    fs::write(temp.path().join("a/.one.json.tmp"), b"partial").unwrap();
    fs::write(temp.path().join("a/notes.txt"), b"ignored").unwrap();
    fs::write(temp.path().join("stray.json"), b"ignored").unwrap();

    assert_eq!(store.list_keys().unwrap(), vec![
        key(&["a", "one"]),
        key(&["b", "one"]),
        key(&["b", "two"])
    ]);
}

/// Verifies a missing base directory lists nothing.
#[test]
fn list_keys_on_missing_base_is_empty() {
    let temp = tempfile::tempdir().unwrap();
    let store = FilesystemTupleStoreBackend::new(temp.path().join("absent"), 4).unwrap();
    assert!(store.list_keys().unwrap().is_empty());
}

/// Verifies traversal and separator components are rejected.
#[test]
fn rejects_components_that_escape_the_tree() {
    let temp = tempfile::tempdir().unwrap();
    let store = FilesystemTupleStoreBackend::new(temp.path(), 2).unwrap();
    for bad in ["..", ".hidden", "a/b", "a\\b", "", "nul\0byte"] {
        let err = store.set(&key(&["ok", bad]), b"x").unwrap_err();
        assert!(matches!(err, StoreError::Invalid(_)), "accepted {bad:?}");
    }
    let long = "x".repeat(256);
    assert!(matches!(store.get(&key(&["ok", long.as_str()])), Err(StoreError::Invalid(_))));
}

/// Verifies keys of the wrong length are rejected.
#[test]
fn rejects_wrong_key_length() {
    let temp = tempfile::tempdir().unwrap();
    let store = FilesystemTupleStoreBackend::new(temp.path(), 3).unwrap();
    assert!(matches!(store.set(&key(&["a", "b"]), b"x"), Err(StoreError::Invalid(_))));
    assert!(matches!(store.has(&key(&["a", "b", "c", "d"])), Err(StoreError::Invalid(_))));
}

/// Verifies construction rejects a zero key length and a file base path.
#[test]
fn rejects_invalid_construction() {
    let temp = tempfile::tempdir().unwrap();
    assert!(matches!(
        FilesystemTupleStoreBackend::new(temp.path(), 0),
        Err(StoreError::Invalid(_))
    ));
    let file = temp.path().join("file");
    fs::write(&file, b"").unwrap();
    assert!(matches!(FilesystemTupleStoreBackend::new(&file, 2), Err(StoreError::Invalid(_))));
}
