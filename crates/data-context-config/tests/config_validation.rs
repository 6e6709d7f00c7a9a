// crates/data-context-config/tests/config_validation.rs
// =============================================================================
// Module: Project Config Validation Tests
// Description: Validate parsing limits, defaults, and store constraints.
// Purpose: Ensure project configuration fails closed on invalid input.
// =============================================================================

//! Project config validation tests for data-context-config.

use std::path::PathBuf;

use data_context_config::ConfigError;
use data_context_config::NamedStoreConfig;
use data_context_config::ProjectConfig;
use data_context_config::StoreClass;
use data_context_config::StoreConfig;
use data_context_config::StoreType;
use data_context_core::DataContextError;
use data_context_core::DataContextErrorKind;
use data_context_core::NameDelimiter;

mod common;

use common::assert_invalid;
use common::config_from_toml;
use common::minimal_config;

type TestResult = Result<(), String>;

#[test]
fn empty_config_uses_defaults() -> TestResult {
    let config = config_from_toml("").map_err(|err| err.to_string())?;
    if config != ProjectConfig::default() {
        return Err("empty config did not match defaults".to_string());
    }
    if config.data_asset_name_delimiter != NameDelimiter::SLASH {
        return Err("default delimiter should be '/'".to_string());
    }
    if config.expectations_store.store_type != StoreType::Memory {
        return Err("default expectations store should be memory".to_string());
    }
    if config.plugins_directory != PathBuf::from("plugins") {
        return Err("default plugins directory should be 'plugins'".to_string());
    }
    Ok(())
}

#[test]
fn full_config_parses() -> TestResult {
    let config = config_from_toml(
        r#"
config_version = 1
data_asset_name_delimiter = "."
allow_datasource_overwrite = true

[expectations_store]
type = "filesystem"
base_directory = "expectations"

[validations_store]
type = "sqlite"
path = "uncommitted/validations.sqlite"
journal_mode = "delete"
sync_mode = "normal"

[datasources.warehouse]
implementation = "filesystem"
base_directory = "data"

[datasources.warehouse.generators.listed]
implementation = "manual"
assets = ["orders", "customers"]

[data_docs_sites.local_site]
base_directory = "uncommitted/data_docs/local_site"
"#,
    )
    .map_err(|err| err.to_string())?;
    if config.data_asset_name_delimiter.as_char() != '.' {
        return Err("delimiter not parsed".to_string());
    }
    let generators = &config.datasources["warehouse"].generators;
    if generators["listed"].assets != vec!["orders".to_string(), "customers".to_string()] {
        return Err("generator assets not parsed".to_string());
    }
    let sqlite = config.validations_store.sqlite_config(PathBuf::from("/tmp/v.sqlite"));
    if sqlite.busy_timeout_ms != 5_000 || sqlite.journal_mode.pragma_value() != "delete" {
        return Err("sqlite tuning not carried over".to_string());
    }
    Ok(())
}

#[test]
fn unknown_fields_are_rejected() -> TestResult {
    let result = config_from_toml("unexpected = true\n");
    if !matches!(result, Err(ConfigError::Parse(_))) {
        return Err("unknown top-level field should fail to parse".to_string());
    }
    let result = config_from_toml("[datasources.ds]\nimplementation = \"memory\"\nspeed = 3\n");
    if !matches!(result, Err(ConfigError::Parse(_))) {
        return Err("unknown datasource field should fail to parse".to_string());
    }
    Ok(())
}

#[test]
fn invalid_delimiter_is_rejected() -> TestResult {
    let result = config_from_toml("data_asset_name_delimiter = \"$\"\n");
    if !matches!(result, Err(ConfigError::Parse(_))) {
        return Err("invalid delimiter should fail to parse".to_string());
    }
    Ok(())
}

#[test]
fn unsupported_config_version_is_rejected() -> TestResult {
    assert_invalid(config_from_toml("config_version = 2\n"), "unsupported config_version 2")
}

#[test]
fn memory_store_rejects_locations() -> TestResult {
    let mut config = minimal_config();
    config.expectations_store.path = Some(PathBuf::from("suites.sqlite"));
    assert_invalid(config.validate(), "memory expectations_store must not set base_directory")
}

#[test]
fn filesystem_store_requires_base_directory() -> TestResult {
    let mut config = minimal_config();
    config.validations_store.store_type = StoreType::Filesystem;
    assert_invalid(config.validate(), "filesystem validations_store requires base_directory")
}

#[test]
fn sqlite_store_requires_path() -> TestResult {
    let mut config = minimal_config();
    config.expectations_store = StoreConfig::sqlite("suites.sqlite");
    config.expectations_store.path = None;
    assert_invalid(config.validate(), "sqlite expectations_store requires path")?;
    config.expectations_store = StoreConfig::sqlite("suites.sqlite");
    config.expectations_store.base_directory = Some(PathBuf::from("x"));
    assert_invalid(config.validate(), "must not set base_directory")
}

#[test]
fn named_stores_parse_and_validate() -> TestResult {
    let config = config_from_toml(
        r#"
[stores.archive]
class = "validations"

[stores.archive.store_backend]
type = "filesystem"
base_directory = "uncommitted/archive"
"#,
    )
    .map_err(|err| err.to_string())?;
    let archive = &config.stores["archive"];
    if archive.class != StoreClass::Validations {
        return Err("store class not parsed".to_string());
    }
    if archive.store_backend != StoreConfig::filesystem("uncommitted/archive") {
        return Err("store backend not parsed".to_string());
    }

    let mut config = minimal_config();
    config.stores.insert(
        "archive".to_string(),
        NamedStoreConfig::new(StoreClass::Expectations, StoreConfig::sqlite("")),
    );
    assert_invalid(config.validate(), "stores.archive.store_backend.path must be non-empty")?;
    config.stores.clear();
    config.stores.insert(
        "validations_store".to_string(),
        NamedStoreConfig::new(StoreClass::Validations, StoreConfig::default()),
    );
    assert_invalid(config.validate(), "store name 'validations_store' is reserved")
}

#[test]
fn overlong_paths_are_rejected() -> TestResult {
    let mut config = minimal_config();
    config.expectations_store = StoreConfig::filesystem("a".repeat(300));
    assert_invalid(config.validate(), "path component too long")
}

#[test]
fn load_enforces_file_limits() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let missing = dir.path().join("missing.toml");
    if !matches!(ProjectConfig::load(&missing), Err(ConfigError::Io(_))) {
        return Err("missing config should be an io error".to_string());
    }

    let oversized = dir.path().join("big.toml");
    let padding = format!("# {}\n", "x".repeat(1024 * 1024));
    std::fs::write(&oversized, padding).map_err(|err| err.to_string())?;
    assert_invalid(ProjectConfig::load(&oversized), "exceeds size limit")?;

    let binary = dir.path().join("binary.toml");
    std::fs::write(&binary, [0xff_u8, 0xfe, 0x00]).map_err(|err| err.to_string())?;
    assert_invalid(ProjectConfig::load(&binary), "must be utf-8")
}

#[test]
fn serialized_config_round_trips() -> TestResult {
    let mut config = minimal_config();
    config.expectations_store = StoreConfig::filesystem("expectations");
    config.validations_store = StoreConfig::sqlite("uncommitted/validations.sqlite");
    config.config_variables_file_path = Some("${SECRETS}/vars.toml".to_string());
    let text = config.to_toml_string().map_err(|err| err.to_string())?;
    let parsed = config_from_toml(&text).map_err(|err| err.to_string())?;
    if parsed != config {
        return Err(format!("round trip changed config:\n{text}"));
    }
    Ok(())
}

#[test]
fn config_errors_convert_to_context_errors() -> TestResult {
    let error: DataContextError = ConfigError::Invalid("bad".to_string()).into();
    if error.kind() != DataContextErrorKind::Config {
        return Err("config errors should map to the config kind".to_string());
    }
    if !error.message().contains("invalid config: bad") {
        return Err(format!("unexpected message {}", error.message()));
    }
    Ok(())
}
