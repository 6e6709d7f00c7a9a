// crates/data-context/src/context.rs
// ============================================================================
// Module: Data Context
// Description: Project-level facade over datasources, suites, and results.
// Purpose: Bind configuration, registry, name resolution, and stores together.
// Dependencies: data-context-config, data-context-core, data-context-store-sqlite, tracing
// ============================================================================

//! ## Overview
//! [`DataContext`] owns the datasource registry, the suite and validation
//! stores, and any further [`NamedStore`]s configured for a project. Every
//! operation that takes a data asset name accepts either a raw string,
//! resolved against the registry and stored suites, or an already-qualified
//! [`DataAssetIdentifier`], which is used as given provided no component
//! contains the active delimiter.
//!
//! A context keeps two copies of its configuration: the one it was loaded
//! from, which is what [`DataContext::save_project_config`] writes back, and
//! the effective copy with `${NAME}` references substituted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use data_context_config::CONFIG_FILE_NAME;
use data_context_config::NamedStoreConfig;
use data_context_config::ProjectConfig;
use data_context_config::RESERVED_STORE_NAMES;
use data_context_config::StoreClass;
use data_context_config::StoreConfig;
use data_context_config::StoreType;
use data_context_config::VariableSource;
use data_context_core::AvailableAssetNames;
use data_context_core::CompiledParameters;
use data_context_core::ComponentFactory;
use data_context_core::DataAssetIdentifier;
use data_context_core::DataContextError;
use data_context_core::Datasource;
use data_context_core::DatasourceConfig;
use data_context_core::DatasourceRegistry;
use data_context_core::DatasourceSummary;
use data_context_core::DuplicatePolicy;
use data_context_core::ExpectationSuite;
use data_context_core::ExpectationSuiteIdentifier;
use data_context_core::ExpectationSuiteStore;
use data_context_core::GeneratorConfig;
use data_context_core::InMemoryTupleStoreBackend;
use data_context_core::NameDelimiter;
use data_context_core::NameResolver;
use data_context_core::ResolveIntent;
use data_context_core::RunId;
use data_context_core::SharedTupleStoreBackend;
use data_context_core::StoreError;
use data_context_core::ValidationResult;
use data_context_core::ValidationResultIdentifier;
use data_context_core::ValidationResultStore;
use data_context_core::compile_parameters;
use data_context_store_sqlite::SqliteTupleStoreBackend;
use tracing::debug;
use tracing::info;

use crate::fs_store::FilesystemTupleStoreBackend;
use crate::project::existing_data_docs_urls;
use crate::project::resolve_against;
use crate::project::scaffold_project;

// ============================================================================
// SECTION: Asset Names
// ============================================================================

/// A data asset name as supplied by a caller.
#[derive(Debug, Clone, Copy)]
pub enum DataAssetName<'a> {
    /// Name to resolve against the registry.
    Raw(&'a str),
    /// Fully-qualified identifier used verbatim.
    Qualified(&'a DataAssetIdentifier),
}

impl<'a> From<&'a str> for DataAssetName<'a> {
    fn from(name: &'a str) -> Self {
        Self::Raw(name)
    }
}

impl<'a> From<&'a String> for DataAssetName<'a> {
    fn from(name: &'a String) -> Self {
        Self::Raw(name.as_str())
    }
}

impl<'a> From<&'a DataAssetIdentifier> for DataAssetName<'a> {
    fn from(identifier: &'a DataAssetIdentifier) -> Self {
        Self::Qualified(identifier)
    }
}

// ============================================================================
// SECTION: Named Stores
// ============================================================================

/// A store registered under `[stores.<name>]`.
pub enum NamedStore {
    /// Expectation suite store.
    Expectations(ExpectationSuiteStore),
    /// Validation result store.
    Validations(ValidationResultStore),
}

impl NamedStore {
    /// Returns the document class the store holds.
    #[must_use]
    pub const fn class(&self) -> StoreClass {
        match self {
            Self::Expectations(_) => StoreClass::Expectations,
            Self::Validations(_) => StoreClass::Validations,
        }
    }

    /// Opens the store described by `config`.
    fn open(
        config: &NamedStoreConfig,
        context_root: Option<&Path>,
    ) -> Result<Self, DataContextError> {
        match config.class {
            StoreClass::Expectations => Ok(Self::Expectations(ExpectationSuiteStore::new(
                open_backend(
                    &config.store_backend,
                    context_root,
                    ExpectationSuiteIdentifier::KEY_LENGTH,
                )?,
            )?)),
            StoreClass::Validations => Ok(Self::Validations(ValidationResultStore::new(
                open_backend(
                    &config.store_backend,
                    context_root,
                    ValidationResultIdentifier::KEY_LENGTH,
                )?,
            )?)),
        }
    }
}

// ============================================================================
// SECTION: Data Context
// ============================================================================

/// Project-level coordinator for datasources, suites, and validation results.
pub struct DataContext {
    /// Context root directory, absent for purely in-memory contexts.
    context_root: Option<PathBuf>,
    /// Configuration as loaded, without variable substitution.
    project_config: ProjectConfig,
    /// Configuration with variables substituted.
    config: ProjectConfig,
    /// Active data asset name delimiter.
    delimiter: NameDelimiter,
    /// Configured datasources and generators.
    registry: DatasourceRegistry,
    /// Expectation suite persistence.
    suites: ExpectationSuiteStore,
    /// Validation result persistence.
    validations: ValidationResultStore,
    /// Additional stores keyed by name.
    stores: BTreeMap<String, NamedStore>,
    /// Parameter index from the latest compile.
    compiled_parameters: Option<CompiledParameters>,
}

impl DataContext {
    /// Scaffolds a project under `project_root` and opens its context.
    ///
    /// # Errors
    ///
    /// Returns [`DataContextError`] when scaffolding or opening fails.
    pub fn create(
        project_root: &Path,
        variables: &dyn VariableSource,
    ) -> Result<Self, DataContextError> {
        let context_root = scaffold_project(project_root)?;
        Self::open(&context_root, variables)
    }

    /// Opens the context rooted at `context_root`.
    ///
    /// # Errors
    ///
    /// Returns [`DataContextError::Config`] when the project config cannot be
    /// loaded, or any error raised while building datasources and stores.
    pub fn open(
        context_root: &Path,
        variables: &dyn VariableSource,
    ) -> Result<Self, DataContextError> {
        let config = ProjectConfig::load(&context_root.join(CONFIG_FILE_NAME))?;
        Self::from_config(config, Some(context_root.to_path_buf()), variables)
    }

    /// Builds a context from an in-memory configuration.
    ///
    /// Without a context root, relative paths are used as given and no
    /// config-variables file is read.
    ///
    /// # Errors
    ///
    /// Returns [`DataContextError`] when substitution fails, a datasource
    /// cannot be built, or a store cannot be opened.
    pub fn from_config(
        project_config: ProjectConfig,
        context_root: Option<PathBuf>,
        variables: &dyn VariableSource,
    ) -> Result<Self, DataContextError> {
        let config = project_config.substitute_variables(context_root.as_deref(), variables)?;
        let mut factory = ComponentFactory::with_builtin_components();
        if let Some(root) = &context_root {
            factory = factory.with_root_directory(root);
        }
        let policy = if config.allow_datasource_overwrite {
            DuplicatePolicy::Overwrite
        } else {
            DuplicatePolicy::Reject
        };
        let mut registry = DatasourceRegistry::new(factory, policy);
        for (name, datasource) in &config.datasources {
            registry.add_datasource(name, datasource.clone())?;
        }
        let root = context_root.as_deref();
        let suites = ExpectationSuiteStore::new(open_backend(
            &config.expectations_store,
            root,
            ExpectationSuiteIdentifier::KEY_LENGTH,
        )?)?;
        let validations = ValidationResultStore::new(open_backend(
            &config.validations_store,
            root,
            ValidationResultIdentifier::KEY_LENGTH,
        )?)?;
        let mut stores = BTreeMap::new();
        for (name, store) in &config.stores {
            stores.insert(name.clone(), NamedStore::open(store, root)?);
        }
        info!(
            root = %root.map_or_else(|| "<memory>".to_string(), |path| path.display().to_string()),
            datasources = config.datasources.len(),
            "data context opened"
        );
        Ok(Self {
            context_root,
            delimiter: config.data_asset_name_delimiter,
            project_config,
            config,
            registry,
            suites,
            validations,
            stores,
            compiled_parameters: None,
        })
    }

    // ------------------------------------------------------------------------
    // Project
    // ------------------------------------------------------------------------

    /// Returns the context root directory.
    #[must_use]
    pub fn root_directory(&self) -> Option<&Path> {
        self.context_root.as_deref()
    }

    /// Returns the configuration as loaded, without substitution.
    #[must_use]
    pub const fn project_config(&self) -> &ProjectConfig {
        &self.project_config
    }

    /// Returns the configuration with variables substituted.
    #[must_use]
    pub const fn effective_config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Returns the plugins directory.
    #[must_use]
    pub fn plugins_directory(&self) -> PathBuf {
        self.normalize_absolute_or_relative_path(&self.config.plugins_directory)
    }

    /// Returns absolute paths unchanged and joins relative ones onto the
    /// context root.
    #[must_use]
    pub fn normalize_absolute_or_relative_path(&self, path: impl AsRef<Path>) -> PathBuf {
        resolve_against(self.root_directory(), path.as_ref())
    }

    /// Writes the unsubstituted configuration back to `data_context.toml`.
    ///
    /// # Errors
    ///
    /// Returns [`DataContextError::Config`] for contexts without a root, or
    /// [`DataContextError::Io`] when the file cannot be written.
    pub fn save_project_config(&self) -> Result<(), DataContextError> {
        let Some(root) = self.root_directory() else {
            return Err(DataContextError::Config(
                "data context has no root directory to save its config into".to_string(),
            ));
        };
        let text = self.project_config.to_toml_string()?;
        let path = root.join(CONFIG_FILE_NAME);
        fs::write(&path, text)
            .map_err(|err| DataContextError::Io(format!("write {}: {err}", path.display())))?;
        debug!(path = %path.display(), "project config saved");
        Ok(())
    }

    /// Returns `file://` URLs of configured data docs sites that exist.
    #[must_use]
    pub fn get_existing_local_data_docs_sites_urls(&self) -> Vec<String> {
        existing_data_docs_urls(self.root_directory(), &self.config.data_docs_sites)
    }

    // ------------------------------------------------------------------------
    // Stores
    // ------------------------------------------------------------------------

    /// Opens a named store and records it in the project config.
    ///
    /// # Errors
    ///
    /// Returns [`DataContextError::AlreadyExists`] when the name is taken,
    /// [`DataContextError::Config`] for an invalid configuration, or a store
    /// error when the backend cannot be opened.
    pub fn add_store(
        &mut self,
        name: &str,
        config: NamedStoreConfig,
    ) -> Result<&NamedStore, DataContextError> {
        if self.stores.contains_key(name) || RESERVED_STORE_NAMES.contains(&name) {
            return Err(DataContextError::AlreadyExists(format!("store '{name}' already exists")));
        }
        config.validate(name)?;
        let store = NamedStore::open(&config, self.context_root.as_deref())?;
        self.project_config.stores.insert(name.to_string(), config.clone());
        self.config.stores.insert(name.to_string(), config);
        debug!(store = name, "store registered");
        Ok(&*self.stores.entry(name.to_string()).or_insert(store))
    }

    /// Returns the named store.
    ///
    /// # Errors
    ///
    /// Returns [`DataContextError::NotFound`] when no store has that name.
    pub fn get_store(&self, name: &str) -> Result<&NamedStore, DataContextError> {
        self.stores
            .get(name)
            .ok_or_else(|| DataContextError::NotFound(format!("no store named '{name}'")))
    }

    /// Returns the named store names in ascending order.
    pub fn store_names(&self) -> impl Iterator<Item = &str> {
        self.stores.keys().map(String::as_str)
    }

    // ------------------------------------------------------------------------
    // Datasources
    // ------------------------------------------------------------------------

    /// Registers a datasource and records it in the project config.
    ///
    /// # Errors
    ///
    /// Returns [`DataContextError::AlreadyExists`] for a duplicate name when
    /// overwriting is not allowed, or [`DataContextError::Config`] when the
    /// datasource cannot be built.
    pub fn add_datasource(
        &mut self,
        name: &str,
        config: DatasourceConfig,
    ) -> Result<&Datasource, DataContextError> {
        self.registry.add_datasource(name, config.clone())?;
        self.project_config.datasources.insert(name.to_string(), config.clone());
        self.config.datasources.insert(name.to_string(), config);
        self.registry.get_datasource(name)
    }

    /// Registers a generator on a datasource and records it in the config.
    ///
    /// # Errors
    ///
    /// Returns [`DataContextError::UnknownDatasourceOrGenerator`] for an
    /// unknown datasource, [`DataContextError::AlreadyExists`] for a
    /// duplicate generator, or [`DataContextError::Config`] when it cannot
    /// be built.
    pub fn add_generator(
        &mut self,
        datasource_name: &str,
        generator_name: &str,
        config: GeneratorConfig,
    ) -> Result<(), DataContextError> {
        self.registry.add_generator(datasource_name, generator_name, config.clone())?;
        for project in [&mut self.project_config, &mut self.config] {
            if let Some(datasource) = project.datasources.get_mut(datasource_name) {
                datasource.generators.insert(generator_name.to_string(), config.clone());
            }
        }
        Ok(())
    }

    /// Returns the named datasource.
    ///
    /// # Errors
    ///
    /// Returns [`DataContextError::UnknownDatasourceOrGenerator`] when absent.
    pub fn get_datasource(&self, name: &str) -> Result<&Datasource, DataContextError> {
        self.registry.get_datasource(name)
    }

    /// Returns sorted datasource summaries.
    #[must_use]
    pub fn list_datasources(&self) -> Vec<DatasourceSummary> {
        self.registry.list_datasources()
    }

    /// Returns enumerated asset names by datasource and generator.
    ///
    /// # Errors
    ///
    /// Returns [`DataContextError`] for an unknown datasource in the filter
    /// or a failing generator.
    pub fn get_available_data_asset_names(
        &self,
        datasource_names: Option<&[String]>,
    ) -> Result<AvailableAssetNames, DataContextError> {
        self.registry.get_available_data_asset_names(datasource_names)
    }

    // ------------------------------------------------------------------------
    // Names
    // ------------------------------------------------------------------------

    /// Returns the active data asset name delimiter.
    #[must_use]
    pub const fn data_asset_name_delimiter(&self) -> NameDelimiter {
        self.delimiter
    }

    /// Changes the data asset name delimiter.
    ///
    /// # Errors
    ///
    /// Returns [`DataContextError::InvalidDelimiter`] for an unsupported
    /// value, or when the new delimiter appears inside an enumerated or
    /// stored asset name; the previous delimiter stays in effect.
    pub fn set_data_asset_name_delimiter(&mut self, value: &str) -> Result<(), DataContextError> {
        let delimiter = NameDelimiter::parse(value)?;
        self.ensure_delimiter_unused(delimiter)?;
        self.delimiter = delimiter;
        self.project_config.data_asset_name_delimiter = delimiter;
        self.config.data_asset_name_delimiter = delimiter;
        Ok(())
    }

    /// Fails when `delimiter` occurs inside any known asset name.
    fn ensure_delimiter_unused(&self, delimiter: NameDelimiter) -> Result<(), DataContextError> {
        let conflict = |asset: &DataAssetIdentifier| {
            DataContextError::InvalidDelimiter(format!(
                "Invalid delimiter: '{delimiter}' appears in data asset '{asset}'"
            ))
        };
        for (datasource, generators) in self.registry.get_available_data_asset_names(None)? {
            for (generator, assets) in generators {
                for asset in assets {
                    let identifier = DataAssetIdentifier::new(&datasource, &generator, asset);
                    if identifier.component_containing(delimiter).is_some() {
                        return Err(conflict(&identifier));
                    }
                }
            }
        }
        let stored = self.suites.stored_assets()?;
        match stored.iter().find(|asset| asset.component_containing(delimiter).is_some()) {
            Some(asset) => Err(conflict(asset)),
            None => Ok(()),
        }
    }

    /// Resolves a name for creating a new asset.
    ///
    /// # Errors
    ///
    /// Returns the resolution error when the name is not unambiguous.
    pub fn normalize_data_asset_name(
        &self,
        data_asset_name: &str,
    ) -> Result<DataAssetIdentifier, DataContextError> {
        self.normalize_data_asset_name_with_intent(data_asset_name, ResolveIntent::Create)
    }

    /// Resolves a name with an explicit intent.
    ///
    /// # Errors
    ///
    /// Returns the resolution error when the name is not unambiguous.
    pub fn normalize_data_asset_name_with_intent(
        &self,
        data_asset_name: &str,
        intent: ResolveIntent,
    ) -> Result<DataAssetIdentifier, DataContextError> {
        let stored = self.suites.stored_assets()?;
        NameResolver::new(&self.registry, &stored, self.delimiter).resolve(data_asset_name, intent)
    }

    /// Resolves raw names and checks qualified identifiers are nameable.
    fn resolve(
        &self,
        data_asset_name: DataAssetName<'_>,
        intent: ResolveIntent,
    ) -> Result<DataAssetIdentifier, DataContextError> {
        match data_asset_name {
            DataAssetName::Raw(name) => self.normalize_data_asset_name_with_intent(name, intent),
            DataAssetName::Qualified(identifier) => {
                identifier.ensure_nameable(self.delimiter)?;
                Ok(identifier.clone())
            }
        }
    }

    // ------------------------------------------------------------------------
    // Expectation Suites
    // ------------------------------------------------------------------------

    /// Creates and persists an empty suite.
    ///
    /// # Errors
    ///
    /// Returns a resolution error, [`DataContextError::AlreadyExists`] when
    /// the suite exists and `overwrite` is false, or a store error.
    pub fn create_expectation_suite<'a>(
        &self,
        data_asset_name: impl Into<DataAssetName<'a>>,
        expectation_suite_name: &str,
        overwrite: bool,
    ) -> Result<ExpectationSuite, DataContextError> {
        let asset = self.resolve(data_asset_name.into(), ResolveIntent::Create)?;
        let identifier = ExpectationSuiteIdentifier::new(asset, expectation_suite_name);
        self.suites.create(&identifier, overwrite)
    }

    /// Loads a stored suite.
    ///
    /// # Errors
    ///
    /// Returns a resolution error, [`DataContextError::NotFound`] when the
    /// suite is absent, or a store error.
    pub fn get_expectation_suite<'a>(
        &self,
        data_asset_name: impl Into<DataAssetName<'a>>,
        expectation_suite_name: &str,
    ) -> Result<ExpectationSuite, DataContextError> {
        let asset = self.resolve(data_asset_name.into(), ResolveIntent::Read)?;
        self.suites.get(&ExpectationSuiteIdentifier::new(asset, expectation_suite_name))
    }

    /// Saves a suite, optionally under a new asset or suite name.
    ///
    /// Arguments that are `None` fall back to the suite's embedded fields.
    /// The suite is rewritten to carry the identifier it was saved under.
    ///
    /// # Errors
    ///
    /// Returns a resolution error or a store error.
    pub fn save_expectation_suite(
        &self,
        suite: &mut ExpectationSuite,
        data_asset_name: Option<DataAssetName<'_>>,
        expectation_suite_name: Option<&str>,
    ) -> Result<ExpectationSuiteIdentifier, DataContextError> {
        let asset = match data_asset_name {
            Some(name) => self.resolve(name, ResolveIntent::Create)?,
            None => {
                suite.data_asset_name.ensure_nameable(self.delimiter)?;
                suite.data_asset_name.clone()
            }
        };
        let suite_name = expectation_suite_name
            .map_or_else(|| suite.expectation_suite_name.clone(), ToString::to_string);
        let identifier = ExpectationSuiteIdentifier::new(asset, suite_name);
        self.suites.save(suite, Some(&identifier))
    }

    /// Lists stored suite identifiers in ascending order.
    ///
    /// # Errors
    ///
    /// Returns a store error when listing fails.
    pub fn list_expectation_suite_keys(
        &self,
    ) -> Result<Vec<ExpectationSuiteIdentifier>, DataContextError> {
        self.suites.list_keys()
    }

    // ------------------------------------------------------------------------
    // Evaluation Parameters
    // ------------------------------------------------------------------------

    /// Rebuilds the evaluation parameter index from every stored suite.
    ///
    /// # Errors
    ///
    /// Returns a store error or the resolution error for a referenced asset.
    pub fn compile(&mut self) -> Result<&CompiledParameters, DataContextError> {
        let stored = self.suites.stored_assets()?;
        let resolver = NameResolver::new(&self.registry, &stored, self.delimiter);
        let compiled = compile_parameters(&self.suites, &resolver)?;
        Ok(self.compiled_parameters.insert(compiled))
    }

    /// Returns the index built by the latest [`DataContext::compile`].
    #[must_use]
    pub const fn compiled_parameters(&self) -> Option<&CompiledParameters> {
        self.compiled_parameters.as_ref()
    }

    // ------------------------------------------------------------------------
    // Validation Results
    // ------------------------------------------------------------------------

    /// Persists a validation result.
    ///
    /// # Errors
    ///
    /// Returns a store error when persistence fails.
    pub fn store_validation_result(
        &self,
        result: &ValidationResult,
    ) -> Result<ValidationResultIdentifier, DataContextError> {
        self.validations.store(result)
    }

    /// Loads a validation result; without `run_id` the latest run is used.
    ///
    /// # Errors
    ///
    /// Returns a resolution error, [`DataContextError::NotFound`] when no
    /// matching result exists, or a store error.
    pub fn get_validation_result<'a>(
        &self,
        data_asset_name: impl Into<DataAssetName<'a>>,
        expectation_suite_name: &str,
        run_id: Option<&RunId>,
        failed_only: bool,
    ) -> Result<ValidationResult, DataContextError> {
        let asset = self.resolve(data_asset_name.into(), ResolveIntent::Read)?;
        let suite = ExpectationSuiteIdentifier::new(asset, expectation_suite_name);
        self.validations.get(&suite, run_id, failed_only)
    }

    /// Lists stored validation result identifiers in ascending order.
    ///
    /// # Errors
    ///
    /// Returns a store error when listing fails.
    pub fn list_validation_result_keys(
        &self,
    ) -> Result<Vec<ValidationResultIdentifier>, DataContextError> {
        self.validations.list_keys()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Opens the tuple store backend described by `store`.
fn open_backend(
    store: &StoreConfig,
    context_root: Option<&Path>,
    key_length: usize,
) -> Result<SharedTupleStoreBackend, DataContextError> {
    match store.store_type {
        StoreType::Memory => {
            Ok(SharedTupleStoreBackend::from_backend(InMemoryTupleStoreBackend::new(key_length)))
        }
        StoreType::Filesystem => {
            let base = store.base_directory.as_ref().ok_or_else(|| {
                DataContextError::Config("filesystem store requires base_directory".to_string())
            })?;
            let backend =
                FilesystemTupleStoreBackend::new(resolve_against(context_root, base), key_length)?;
            Ok(SharedTupleStoreBackend::from_backend(backend))
        }
        StoreType::Sqlite => {
            let path = store.path.as_ref().ok_or_else(|| {
                DataContextError::Config("sqlite store requires path".to_string())
            })?;
            let config = store.sqlite_config(resolve_against(context_root, path));
            let backend =
                SqliteTupleStoreBackend::new(&config, key_length).map_err(StoreError::from)?;
            Ok(SharedTupleStoreBackend::from_backend(backend))
        }
    }
}
