// crates/data-context/tests/project.rs
// ============================================================================
// Module: Project Layout Tests
// Description: Tests for scaffolding, discovery, and data docs lookup.
// Purpose: Validate the on-disk layout a data context creates and finds.
// Dependencies: data-context, data-context-config, tempfile
// ============================================================================
//! ## Overview
//! Scaffolding must be idempotent and never overwrite user files. Discovery
//! honors `DATA_CONTEXT_HOME` before walking ancestors.

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
use std::fs;

use common::no_variables;
use common::project_context;
use common::variables;
use data_context::CONTEXT_HOME_VARIABLE;
use data_context::PROJECT_CONFIG_TEMPLATE;
use data_context::all_uncommitted_directories_exist;
use data_context::find_context_root_dir;
use data_context::scaffold_directories;
use data_context::scaffold_project;
use data_context::project::existing_data_docs_urls;
use data_context_config::DataDocsSiteConfig;
use data_context_config::ProjectConfig;
use data_context_core::DataContextErrorKind;

/// Verifies a fresh project gets the full directory tree and config files.
#[test]
fn scaffold_creates_expected_tree() {
    let temp = tempfile::tempdir().unwrap();
    let root = scaffold_project(temp.path()).unwrap();

    assert_eq!(root, temp.path().join("data_context"));
    for directory in [
        "datasources",
        "expectations",
        "plugins",
        "uncommitted",
        "uncommitted/data_docs",
        "uncommitted/samples",
        "uncommitted/validations",
    ] {
        assert!(root.join(directory).is_dir(), "missing {directory}");
    }
    assert_eq!(fs::read_to_string(root.join(".gitignore")).unwrap(), "uncommitted/\n");
    assert!(root.join("uncommitted/config_variables.toml").is_file());
    let written = fs::read_to_string(root.join("data_context.toml")).unwrap();
    assert_eq!(written, PROJECT_CONFIG_TEMPLATE);
    ProjectConfig::from_toml_str(&written).unwrap();
}

/// Verifies re-scaffolding keeps edited files and restores missing directories.
#[test]
fn scaffold_is_idempotent_and_preserves_files() {
    let temp = tempfile::tempdir().unwrap();
    let root = scaffold_project(temp.path()).unwrap();
    let config_path = root.join("data_context.toml");
    let variables_path = root.join("uncommitted/config_variables.toml");
    let edited = PROJECT_CONFIG_TEMPLATE.replace("\"plugins\"", "\"custom_plugins\"");
    fs::write(&config_path, &edited).unwrap();
    fs::write(&variables_path, "SECRET = \"kept\"\n").unwrap();
    fs::remove_dir(root.join("uncommitted/samples")).unwrap();
    assert!(!all_uncommitted_directories_exist(&root));

    scaffold_project(temp.path()).unwrap();

    assert!(all_uncommitted_directories_exist(&root));
    assert_eq!(fs::read_to_string(&config_path).unwrap(), edited);
    assert_eq!(fs::read_to_string(&variables_path).unwrap(), "SECRET = \"kept\"\n");
}

/// Verifies directory scaffolding alone leaves an existing gitignore intact.
#[test]
fn scaffold_directories_keeps_existing_gitignore() {
    let temp = tempfile::tempdir().unwrap();
    fs::write(temp.path().join(".gitignore"), "custom\n").unwrap();
    scaffold_directories(temp.path()).unwrap();
    assert!(all_uncommitted_directories_exist(temp.path()));
    assert_eq!(fs::read_to_string(temp.path().join(".gitignore")).unwrap(), "custom\n");
}

/// Verifies discovery walks ancestors to the nearest project.
#[test]
fn find_context_root_searches_ancestors() {
    let temp = tempfile::tempdir().unwrap();
    let root = scaffold_project(temp.path()).unwrap();
    let nested = temp.path().join("notebooks/analysis");
    fs::create_dir_all(&nested).unwrap();

    assert_eq!(find_context_root_dir(&nested, &no_variables()).unwrap(), root);
}

/// Verifies the home variable wins when it points at a context root.
#[test]
fn find_context_root_prefers_home_variable() {
    let project = tempfile::tempdir().unwrap();
    let other = tempfile::tempdir().unwrap();
    scaffold_project(project.path()).unwrap();
    let home = scaffold_project(other.path()).unwrap();
    let source = variables(&[(CONTEXT_HOME_VARIABLE, home.to_str().unwrap())]);

    assert_eq!(find_context_root_dir(project.path(), &source).unwrap(), home);
}

/// Verifies a home variable without a config falls back to the ancestor search.
#[test]
fn find_context_root_ignores_unusable_home_variable() {
    let project = tempfile::tempdir().unwrap();
    let empty = tempfile::tempdir().unwrap();
    let root = scaffold_project(project.path()).unwrap();
    let source = variables(&[(CONTEXT_HOME_VARIABLE, empty.path().to_str().unwrap())]);

    assert_eq!(find_context_root_dir(project.path(), &source).unwrap(), root);
}

/// Verifies discovery fails when no project exists.
#[test]
fn find_context_root_reports_not_found() {
    let temp = tempfile::tempdir().unwrap();
    let err = find_context_root_dir(temp.path(), &no_variables()).unwrap_err();
    assert_eq!(err.kind(), DataContextErrorKind::NotFound);
    assert_eq!(err.message(), "Unable to locate context root directory.");
}

/// Verifies only sites with an index page are reported.
#[test]
fn data_docs_urls_include_only_existing_sites() {
    let temp = tempfile::tempdir().unwrap();
    let sites = BTreeMap::from([
        ("built".to_string(), DataDocsSiteConfig {
            base_directory: "docs/built".into(),
        }),
        ("missing".to_string(), DataDocsSiteConfig {
            base_directory: "docs/missing".into(),
        }),
    ]);
    assert!(existing_data_docs_urls(Some(temp.path()), &sites).is_empty());

    let built = temp.path().join("docs/built");
    fs::create_dir_all(&built).unwrap();
    fs::write(built.join("index.html"), "<html></html>").unwrap();

    let urls = existing_data_docs_urls(Some(temp.path()), &sites);
    assert_eq!(urls, vec![format!("file://{}", built.join("index.html").display())]);
}

/// Verifies a scaffolded context reports its local site once it is built.
#[test]
fn context_reports_local_data_docs_site() {
    let temp = tempfile::tempdir().unwrap();
    let context = project_context(temp.path());
    assert!(context.get_existing_local_data_docs_sites_urls().is_empty());

    let root = context.root_directory().unwrap().to_path_buf();
    let site = root.join("uncommitted/data_docs/local_site");
    fs::create_dir_all(&site).unwrap();
    fs::write(site.join("index.html"), "<html></html>").unwrap();

    assert_eq!(context.get_existing_local_data_docs_sites_urls(), vec![format!(
        "file://{}",
        site.join("index.html").display()
    )]);
}
