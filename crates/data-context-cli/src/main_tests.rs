// crates/data-context-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Command Tests
// Description: Unit tests for argument parsing and command execution.
// Purpose: Ensure commands drive the data context and render stable output.
// Dependencies: data-context-cli main helpers, tempfile
// ============================================================================

//! ## Overview
//! Commands run against a temporary project with an injected variable map,
//! and their stdout is captured into a buffer.

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

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use clap::Parser;

use super::AssetCommand;
use super::Cli;
use super::Commands;
use super::Environment;
use super::IntentArg;
use super::execute;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn environment(working_directory: &Path) -> Environment {
    Environment {
        variables: BTreeMap::new(),
        working_directory: working_directory.to_path_buf(),
    }
}

fn run(environment: &Environment, args: &[&str]) -> Result<String, String> {
    let cli = Cli::try_parse_from(std::iter::once("data-context").chain(args.iter().copied()))
        .map_err(|err| err.to_string())?;
    let mut out = Vec::new();
    execute(cli, environment, &mut out).map_err(|err| err.to_string())?;
    Ok(String::from_utf8(out).unwrap())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn parses_global_flags_after_subcommands() {
    let cli = Cli::try_parse_from([
        "data-context",
        "asset",
        "normalize",
        "titanic",
        "--intent",
        "read",
        "--context-root",
        "/tmp/project/data_context",
        "-v",
    ])
    .unwrap();
    assert!(cli.verbose);
    assert_eq!(cli.context_root.unwrap().to_str().unwrap(), "/tmp/project/data_context");
    let Commands::Asset {
        command: AssetCommand::Normalize(command),
    } = cli.command
    else {
        panic!("expected asset normalize");
    };
    assert_eq!(command.name, "titanic");
    assert!(matches!(command.intent, IntentArg::Read));
}

#[test]
fn init_then_manage_datasources_and_suites() {
    let temp = tempfile::tempdir().unwrap();
    let env = environment(temp.path());

    let output = run(&env, &["init"]).unwrap();
    let root = temp.path().join("data_context");
    assert_eq!(output, format!("Data context initialized at {}\n", root.display()));

    fs::create_dir_all(root.join("data")).unwrap();
    fs::write(root.join("data/titanic.csv"), "id\n1\n").unwrap();
    let output =
        run(&env, &["datasource", "add", "mydatasource", "--base-directory", "data"]).unwrap();
    assert!(output.starts_with("Datasource mydatasource added to "));

    assert_eq!(run(&env, &["datasource", "list"]).unwrap(), "- mydatasource (filesystem)\n");
    assert_eq!(run(&env, &["asset", "list"]).unwrap(), "mydatasource/default/titanic\n");
    assert_eq!(
        run(&env, &["asset", "normalize", "titanic", "--intent", "read"]).unwrap(),
        "mydatasource/default/titanic\n"
    );

    let output = run(&env, &["suite", "create", "titanic"]).unwrap();
    assert_eq!(output, "Expectation suite created: mydatasource/default/titanic/default\n");
    assert_eq!(run(&env, &["suite", "list"]).unwrap(), "mydatasource/default/titanic/default\n");
    let shown = run(&env, &["suite", "show", "titanic"]).unwrap();
    assert!(shown.contains("\"expectation_suite_name\":\"default\""));

    let err = run(&env, &["suite", "create", "titanic"]).unwrap_err();
    assert!(err.starts_with("Data context error: "));
}

#[test]
fn empty_project_reports_empty_listings() {
    let temp = tempfile::tempdir().unwrap();
    let env = environment(temp.path());
    run(&env, &["init", "--project-dir", "nested"]).unwrap();
    let nested = environment(&temp.path().join("nested"));

    assert_eq!(run(&nested, &["datasource", "list"]).unwrap(), "No datasources configured.\n");
    assert_eq!(run(&nested, &["suite", "list"]).unwrap(), "No expectation suites found.\n");
    assert_eq!(run(&nested, &["validation", "list"]).unwrap(), "No validation results found.\n");
    assert_eq!(run(&nested, &["docs"]).unwrap(), "No data docs sites have been built.\n");
    assert_eq!(
        run(&nested, &["compile"]).unwrap(),
        "Compiled 0 parameter references across 0 data assets\n"
    );
}

#[test]
fn explicit_context_root_skips_discovery() {
    let temp = tempfile::tempdir().unwrap();
    let project = tempfile::tempdir().unwrap();
    run(&environment(project.path()), &["init"]).unwrap();
    let root = project.path().join("data_context");
    let env = environment(temp.path());

    let output =
        run(&env, &["config", "validate", "--context-root", root.to_str().unwrap()]).unwrap();
    assert_eq!(output, format!("Config valid: {}\n", root.display()));
}

#[test]
fn missing_project_fails_with_discovery_error() {
    let temp = tempfile::tempdir().unwrap();
    let err = run(&environment(temp.path()), &["suite", "list"]).unwrap_err();
    assert_eq!(err, "Data context error: Unable to locate context root directory.");
}
