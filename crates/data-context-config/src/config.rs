// crates/data-context-config/src/config.rs
// ============================================================================
// Module: Data Context Configuration
// Description: Configuration loading and validation for data context projects.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: data-context-core, data-context-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! Project configuration lives in `data_context.toml`. It is loaded with
//! strict size and path limits, parsed with unknown fields rejected, and
//! validated before use. [`ProjectConfig::load`] returns the configuration
//! exactly as written so it can be saved back verbatim;
//! [`ProjectConfig::substitute_variables`] produces the effective copy with
//! `${NAME}` references resolved.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use data_context_core::DataContextError;
use data_context_core::DatasourceConfig;
use data_context_core::NameDelimiter;
use data_context_store_sqlite::SqliteStoreConfig;
use data_context_store_sqlite::SqliteStoreMode;
use data_context_store_sqlite::SqliteSyncMode;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::variables::LayeredVariables;
use crate::variables::VariableSource;
use crate::variables::load_config_variables;
use crate::variables::substitute_str;
use crate::variables::substitute_value;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Project configuration filename inside the context root.
pub const CONFIG_FILE_NAME: &str = "data_context.toml";
/// Supported configuration version.
pub const CONFIG_VERSION: u32 = 1;
/// Default plugins directory, relative to the context root.
pub const DEFAULT_PLUGINS_DIRECTORY: &str = "plugins";
/// Default config-variables file, relative to the context root.
pub const DEFAULT_CONFIG_VARIABLES_FILE_PATH: &str = "uncommitted/config_variables.toml";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Store names taken by the built-in expectation and validation stores.
pub const RESERVED_STORE_NAMES: [&str; 2] = ["expectations_store", "validations_store"];
/// Default `SQLite` busy timeout (ms).
const DEFAULT_STORE_BUSY_TIMEOUT_MS: u64 = 5_000;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Data context project configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Configuration format version.
    #[serde(default = "default_config_version")]
    pub config_version: u32,
    /// Delimiter used to split data asset names.
    #[serde(default)]
    pub data_asset_name_delimiter: NameDelimiter,
    /// Plugins directory, relative to the context root unless absolute.
    #[serde(default = "default_plugins_directory")]
    pub plugins_directory: PathBuf,
    /// Config-variables file path; may reference injected variables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_variables_file_path: Option<String>,
    /// Allow re-adding a datasource under an existing name.
    #[serde(default)]
    pub allow_datasource_overwrite: bool,
    /// Backend for expectation suites.
    #[serde(default)]
    pub expectations_store: StoreConfig,
    /// Backend for validation results.
    #[serde(default)]
    pub validations_store: StoreConfig,
    /// Additional named stores keyed by name.
    #[serde(default)]
    pub stores: BTreeMap<String, NamedStoreConfig>,
    /// Configured datasources keyed by name.
    #[serde(default)]
    pub datasources: BTreeMap<String, DatasourceConfig>,
    /// Data documentation sites keyed by name.
    #[serde(default)]
    pub data_docs_sites: BTreeMap<String, DataDocsSiteConfig>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            config_version: CONFIG_VERSION,
            data_asset_name_delimiter: NameDelimiter::default(),
            plugins_directory: default_plugins_directory(),
            config_variables_file_path: None,
            allow_datasource_overwrite: false,
            expectations_store: StoreConfig::default(),
            validations_store: StoreConfig::default(),
            stores: BTreeMap::new(),
            datasources: BTreeMap::new(),
            data_docs_sites: BTreeMap::new(),
        }
    }
}

impl ProjectConfig {
    /// Loads configuration from disk without substituting variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        validate_path(path)?;
        let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the configuration cannot be
    /// represented as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|err| ConfigError::Invalid(err.to_string()))
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.config_version != CONFIG_VERSION {
            return Err(ConfigError::Invalid(format!(
                "unsupported config_version {}; expected {CONFIG_VERSION}",
                self.config_version
            )));
        }
        validate_path_string("plugins_directory", &self.plugins_directory.to_string_lossy())?;
        if let Some(path) = &self.config_variables_file_path {
            validate_path_string("config_variables_file_path", path)?;
        }
        self.expectations_store.validate("expectations_store")?;
        self.validations_store.validate("validations_store")?;
        for (name, store) in &self.stores {
            store.validate(name)?;
        }
        for (name, datasource) in &self.datasources {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid("datasource names must be non-empty".to_string()));
            }
            if datasource.implementation.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "datasources.{name}.implementation must be non-empty"
                )));
            }
        }
        for (name, site) in &self.data_docs_sites {
            validate_path_string(
                &format!("data_docs_sites.{name}.base_directory"),
                &site.base_directory.to_string_lossy(),
            )?;
        }
        Ok(())
    }

    /// Returns the config-variables file location for a context root.
    ///
    /// The configured path may reference variables from `source` only.
    /// Relative paths are joined onto `context_root`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when substitution fails.
    pub fn config_variables_path(
        &self,
        context_root: &Path,
        source: &dyn VariableSource,
    ) -> Result<PathBuf, ConfigError> {
        let configured =
            self.config_variables_file_path.as_deref().unwrap_or(DEFAULT_CONFIG_VARIABLES_FILE_PATH);
        let resolved = PathBuf::from(substitute_str(configured, source)?);
        if resolved.is_absolute() {
            Ok(resolved)
        } else {
            Ok(context_root.join(resolved))
        }
    }

    /// Returns a copy with every `${NAME}` reference resolved.
    ///
    /// Variables come from `source`, layered over the config-variables file
    /// when `context_root` is provided.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the variables file is invalid, a
    /// reference cannot be resolved, or the result fails validation.
    pub fn substitute_variables(
        &self,
        context_root: Option<&Path>,
        source: &dyn VariableSource,
    ) -> Result<Self, ConfigError> {
        let file_variables = match context_root {
            Some(root) => load_config_variables(&self.config_variables_path(root, source)?)?,
            None => BTreeMap::new(),
        };
        let layered = LayeredVariables::new(source, file_variables);
        let mut value =
            toml::Value::try_from(self).map_err(|err| ConfigError::Invalid(err.to_string()))?;
        substitute_value(&mut value, &layered)?;
        let substituted: Self =
            value.try_into().map_err(|err| ConfigError::Invalid(err.to_string()))?;
        substituted.validate()?;
        Ok(substituted)
    }
}

/// Returns the supported config version.
const fn default_config_version() -> u32 {
    CONFIG_VERSION
}

/// Returns the default plugins directory.
fn default_plugins_directory() -> PathBuf {
    PathBuf::from(DEFAULT_PLUGINS_DIRECTORY)
}

/// Data documentation site configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataDocsSiteConfig {
    /// Site output directory, relative to the context root unless absolute.
    pub base_directory: PathBuf,
}

/// Document store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Store backend type.
    #[serde(rename = "type", default)]
    pub store_type: StoreType,
    /// Root directory when using the filesystem backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_directory: Option<PathBuf>,
    /// `SQLite` database path when using the sqlite backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_store_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` synchronous mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_type: StoreType::default(),
            base_directory: None,
            path: None,
            busy_timeout_ms: default_store_busy_timeout_ms(),
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

impl StoreConfig {
    /// Returns a filesystem store rooted at `base_directory`.
    #[must_use]
    pub fn filesystem(base_directory: impl Into<PathBuf>) -> Self {
        Self {
            store_type: StoreType::Filesystem,
            base_directory: Some(base_directory.into()),
            ..Self::default()
        }
    }

    /// Returns a `SQLite` store at `path`.
    #[must_use]
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self {
            store_type: StoreType::Sqlite,
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Builds the `SQLite` store configuration with `path` already resolved.
    #[must_use]
    pub fn sqlite_config(&self, path: PathBuf) -> SqliteStoreConfig {
        SqliteStoreConfig {
            path,
            busy_timeout_ms: self.busy_timeout_ms,
            journal_mode: self.journal_mode,
            sync_mode: self.sync_mode,
        }
    }

    /// Validates store configuration; `field` names the table in errors.
    fn validate(&self, field: &str) -> Result<(), ConfigError> {
        match self.store_type {
            StoreType::Memory => {
                if self.base_directory.is_some() || self.path.is_some() {
                    return Err(ConfigError::Invalid(format!(
                        "memory {field} must not set base_directory or path"
                    )));
                }
                Ok(())
            }
            StoreType::Filesystem => {
                if self.path.is_some() {
                    return Err(ConfigError::Invalid(format!(
                        "filesystem {field} must not set path"
                    )));
                }
                let base = self.base_directory.as_ref().ok_or_else(|| {
                    ConfigError::Invalid(format!("filesystem {field} requires base_directory"))
                })?;
                validate_path_string(&format!("{field}.base_directory"), &base.to_string_lossy())
            }
            StoreType::Sqlite => {
                if self.base_directory.is_some() {
                    return Err(ConfigError::Invalid(format!(
                        "sqlite {field} must not set base_directory"
                    )));
                }
                let path = self
                    .path
                    .as_ref()
                    .ok_or_else(|| ConfigError::Invalid(format!("sqlite {field} requires path")))?;
                validate_path_string(&format!("{field}.path"), &path.to_string_lossy())
            }
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_store_busy_timeout_ms() -> u64 {
    DEFAULT_STORE_BUSY_TIMEOUT_MS
}

/// Document class held by a named store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreClass {
    /// Expectation suites keyed by suite identifier.
    Expectations,
    /// Validation results keyed by suite identifier and run.
    Validations,
}

/// Named store configuration under `[stores.<name>]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamedStoreConfig {
    /// Documents the store holds.
    pub class: StoreClass,
    /// Backend the documents are written to.
    #[serde(default)]
    pub store_backend: StoreConfig,
}

impl NamedStoreConfig {
    /// Creates a named store configuration.
    #[must_use]
    pub const fn new(class: StoreClass, store_backend: StoreConfig) -> Self {
        Self {
            class,
            store_backend,
        }
    }

    /// Validates the store; `name` is its key under `stores`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for an empty name or an invalid
    /// backend.
    pub fn validate(&self, name: &str) -> Result<(), ConfigError> {
        if name.trim().is_empty() {
            return Err(ConfigError::Invalid("store names must be non-empty".to_string()));
        }
        if RESERVED_STORE_NAMES.contains(&name) {
            return Err(ConfigError::Invalid(format!("store name '{name}' is reserved")));
        }
        self.store_backend.validate(&format!("stores.{name}.store_backend"))
    }
}

/// Document store backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreType {
    /// Keep documents in process memory.
    #[default]
    Memory,
    /// One JSON file per document under a directory.
    Filesystem,
    /// `SQLite`-backed durable store.
    Sqlite,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<ConfigError> for DataContextError {
    fn from(error: ConfigError) -> Self {
        Self::Config(error.to_string())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates a path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    let path = Path::new(trimmed);
    for component in path.components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}
