// crates/data-context-config/tests/variable_substitution.rs
// =============================================================================
// Module: Variable Substitution Tests
// Description: Validate `${NAME}` resolution over project configuration.
// Purpose: Ensure layering and failure semantics for config variables.
// =============================================================================

//! Variable substitution tests for data-context-config.

use std::fs;
use std::path::PathBuf;

use data_context_config::ProjectConfig;
use data_context_config::StoreConfig;
use data_context_config::load_config_variables;
use data_context_core::DatasourceConfig;

mod common;

use common::assert_invalid;
use common::minimal_config;
use common::variables;

type TestResult = Result<(), String>;

fn config_with_datasource_root(base: &str) -> ProjectConfig {
    let mut config = minimal_config();
    config
        .datasources
        .insert("files".to_string(), DatasourceConfig::new("filesystem").with_base_directory(base));
    config
}

#[test]
fn injected_variables_are_substituted() -> TestResult {
    let config = config_with_datasource_root("${DATA_ROOT}/raw");
    let source = variables(&[("DATA_ROOT", "/srv/data")]);
    let effective = config.substitute_variables(None, &source).map_err(|err| err.to_string())?;
    if effective.datasources["files"].base_directory != Some(PathBuf::from("/srv/data/raw")) {
        return Err("base_directory was not substituted".to_string());
    }
    if config.datasources["files"].base_directory != Some(PathBuf::from("${DATA_ROOT}/raw")) {
        return Err("raw config must stay unsubstituted".to_string());
    }
    Ok(())
}

#[test]
fn undefined_variables_fail() -> TestResult {
    let config = config_with_datasource_root("${DATA_ROOT}/raw");
    assert_invalid(
        config.substitute_variables(None, &variables(&[])),
        "config variable 'DATA_ROOT' is not defined",
    )
}

#[test]
fn variables_file_is_layered_under_injected_source() -> TestResult {
    let root = tempfile::tempdir().map_err(|err| err.to_string())?;
    fs::create_dir_all(root.path().join("uncommitted")).map_err(|err| err.to_string())?;
    fs::write(
        root.path().join("uncommitted/config_variables.toml"),
        "DATA_ROOT = \"/from/file\"\nSTORE_DIR = \"suites\"\nRETRIES = 3\n",
    )
    .map_err(|err| err.to_string())?;

    let mut config = config_with_datasource_root("${DATA_ROOT}");
    config.expectations_store = StoreConfig::filesystem("${STORE_DIR}");
    let from_file = config
        .substitute_variables(Some(root.path()), &variables(&[]))
        .map_err(|err| err.to_string())?;
    if from_file.datasources["files"].base_directory != Some(PathBuf::from("/from/file")) {
        return Err("file variable not applied".to_string());
    }
    if from_file.expectations_store.base_directory != Some(PathBuf::from("suites")) {
        return Err("store directory not substituted".to_string());
    }

    let overridden = config
        .substitute_variables(Some(root.path()), &variables(&[("DATA_ROOT", "/from/env")]))
        .map_err(|err| err.to_string())?;
    if overridden.datasources["files"].base_directory != Some(PathBuf::from("/from/env")) {
        return Err("injected variable should win over the file".to_string());
    }
    Ok(())
}

#[test]
fn variables_file_path_resolves_from_injected_source() -> TestResult {
    let root = tempfile::tempdir().map_err(|err| err.to_string())?;
    let secrets = tempfile::tempdir().map_err(|err| err.to_string())?;
    fs::write(secrets.path().join("vars.toml"), "DATA_ROOT = \"/secret\"\n")
        .map_err(|err| err.to_string())?;

    let mut config = config_with_datasource_root("${DATA_ROOT}");
    config.config_variables_file_path = Some("${SECRETS}/vars.toml".to_string());
    let secrets_dir = secrets.path().to_string_lossy().to_string();
    let source = variables(&[("SECRETS", secrets_dir.as_str())]);
    let path = config.config_variables_path(root.path(), &source).map_err(|err| err.to_string())?;
    if path != secrets.path().join("vars.toml") {
        return Err(format!("unexpected variables path {}", path.display()));
    }
    let effective =
        config.substitute_variables(Some(root.path()), &source).map_err(|err| err.to_string())?;
    if effective.datasources["files"].base_directory != Some(PathBuf::from("/secret")) {
        return Err("variables from the configured file were not applied".to_string());
    }
    Ok(())
}

#[test]
fn missing_variables_file_yields_nothing() -> TestResult {
    let root = tempfile::tempdir().map_err(|err| err.to_string())?;
    let loaded = load_config_variables(&root.path().join("absent.toml"))
        .map_err(|err| err.to_string())?;
    if !loaded.is_empty() {
        return Err("missing file should yield no variables".to_string());
    }
    Ok(())
}

#[test]
fn nested_variable_values_are_rejected() -> TestResult {
    let root = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = root.path().join("vars.toml");
    fs::write(&path, "[nested]\nkey = \"v\"\n").map_err(|err| err.to_string())?;
    assert_invalid(load_config_variables(&path), "must be a scalar value")
}
