// crates/data-context-core/src/runtime/registry.rs
// ============================================================================
// Module: Datasource Registry
// Description: Named datasources, their generators, and the component factory.
// Purpose: Hold the configured components consulted by name resolution.
// Dependencies: crate::core, crate::interfaces, crate::runtime::generators, tracing
// ============================================================================

//! ## Overview
//! The registry owns every configured [`Datasource`] keyed by name. Datasources
//! and generators are built from configuration records by a
//! [`ComponentFactory`] that maps implementation tags to constructors, so
//! hosts can register additional kinds without touching the registry.
//! Iteration order is always lexicographic by name.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;

use crate::core::DataContextError;
use crate::core::DatasourceConfig;
use crate::core::DatasourceSummary;
use crate::core::GeneratorConfig;
use crate::interfaces::AssetGenerator;
use crate::interfaces::GeneratorCapability;
use crate::runtime::generators::DIRECTORY_GENERATOR;
use crate::runtime::generators::DirectoryGenerator;
use crate::runtime::generators::MANUAL_GENERATOR;
use crate::runtime::generators::MEMORY_GENERATOR;
use crate::runtime::generators::ManualGenerator;
use crate::runtime::generators::MemoryGenerator;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Tag for file-backed datasources.
pub const FILESYSTEM_DATASOURCE: &str = "filesystem";
/// Tag for in-memory datasources.
pub const MEMORY_DATASOURCE: &str = "memory";
/// Name of the generator added to datasources configured without generators.
pub const DEFAULT_GENERATOR_NAME: &str = "default";

/// Available asset names keyed by datasource, then generator.
pub type AvailableAssetNames = BTreeMap<String, BTreeMap<String, BTreeSet<String>>>;

// ============================================================================
// SECTION: Component Factory
// ============================================================================

/// Builds a generator from its configuration.
pub type GeneratorConstructor =
    fn(&GeneratorConfig, &ComponentFactory) -> Result<Box<dyn AssetGenerator>, DataContextError>;

/// Returns the generators a datasource kind adds when none are configured.
pub type DefaultGenerators = fn(&DatasourceConfig) -> BTreeMap<String, GeneratorConfig>;

/// Maps implementation tags to component constructors.
pub struct ComponentFactory {
    /// Directory that relative component paths resolve against.
    root_directory: Option<PathBuf>,
    /// Datasource kinds keyed by tag.
    datasources: BTreeMap<String, DefaultGenerators>,
    /// Generator kinds keyed by tag.
    generators: BTreeMap<String, GeneratorConstructor>,
}

impl ComponentFactory {
    /// Creates a factory with no registered kinds.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            root_directory: None,
            datasources: BTreeMap::new(),
            generators: BTreeMap::new(),
        }
    }

    /// Creates a factory with the built-in datasource and generator kinds.
    #[must_use]
    pub fn with_builtin_components() -> Self {
        let mut factory = Self::empty();
        factory.register_datasource(FILESYSTEM_DATASOURCE, filesystem_defaults);
        factory.register_datasource(MEMORY_DATASOURCE, memory_defaults);
        factory.register_generator(DIRECTORY_GENERATOR, build_directory_generator);
        factory.register_generator(MANUAL_GENERATOR, build_manual_generator);
        factory.register_generator(MEMORY_GENERATOR, build_memory_generator);
        factory
    }

    /// Sets the directory that relative component paths resolve against.
    #[must_use]
    pub fn with_root_directory(mut self, root_directory: impl Into<PathBuf>) -> Self {
        self.root_directory = Some(root_directory.into());
        self
    }

    /// Registers a datasource kind.
    pub fn register_datasource(&mut self, tag: impl Into<String>, defaults: DefaultGenerators) {
        self.datasources.insert(tag.into(), defaults);
    }

    /// Registers a generator kind.
    pub fn register_generator(&mut self, tag: impl Into<String>, constructor: GeneratorConstructor) {
        self.generators.insert(tag.into(), constructor);
    }

    /// Resolves a component path against the root directory.
    #[must_use]
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.root_directory {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Builds a datasource and its generators.
    ///
    /// # Errors
    ///
    /// Returns [`DataContextError::Config`] when a tag is unknown or a
    /// generator configuration is incomplete.
    pub fn build_datasource(
        &self,
        name: &str,
        config: DatasourceConfig,
    ) -> Result<Datasource, DataContextError> {
        let defaults = self.datasources.get(&config.implementation).ok_or_else(|| {
            DataContextError::Config(format!(
                "datasource '{name}' uses unknown implementation '{}'",
                config.implementation
            ))
        })?;
        let generator_configs =
            if config.generators.is_empty() { defaults(&config) } else { config.generators.clone() };
        let mut generators = BTreeMap::new();
        for (generator_name, generator_config) in &generator_configs {
            generators.insert(generator_name.clone(), self.build_generator(generator_config)?);
        }
        Ok(Datasource {
            name: name.to_string(),
            config,
            generators,
        })
    }

    /// Builds a generator.
    ///
    /// # Errors
    ///
    /// Returns [`DataContextError::Config`] when the tag is unknown or the
    /// configuration is incomplete.
    pub fn build_generator(
        &self,
        config: &GeneratorConfig,
    ) -> Result<Box<dyn AssetGenerator>, DataContextError> {
        let constructor = self.generators.get(&config.implementation).ok_or_else(|| {
            DataContextError::Config(format!(
                "unknown generator implementation '{}'",
                config.implementation
            ))
        })?;
        constructor(config, self)
    }
}

impl Default for ComponentFactory {
    fn default() -> Self {
        Self::with_builtin_components()
    }
}

/// Default generators for filesystem datasources.
fn filesystem_defaults(config: &DatasourceConfig) -> BTreeMap<String, GeneratorConfig> {
    let generator = config
        .base_directory
        .as_ref()
        .map_or_else(GeneratorConfig::memory, GeneratorConfig::directory);
    BTreeMap::from([(DEFAULT_GENERATOR_NAME.to_string(), generator)])
}

/// Default generators for in-memory datasources.
fn memory_defaults(_config: &DatasourceConfig) -> BTreeMap<String, GeneratorConfig> {
    BTreeMap::from([(DEFAULT_GENERATOR_NAME.to_string(), GeneratorConfig::memory())])
}

/// Builds a directory generator.
fn build_directory_generator(
    config: &GeneratorConfig,
    factory: &ComponentFactory,
) -> Result<Box<dyn AssetGenerator>, DataContextError> {
    let base_directory = config.base_directory.as_ref().ok_or_else(|| {
        DataContextError::Config("directory generator requires base_directory".to_string())
    })?;
    Ok(Box::new(DirectoryGenerator::new(factory.resolve_path(base_directory))))
}

/// Builds a manual generator.
fn build_manual_generator(
    config: &GeneratorConfig,
    _factory: &ComponentFactory,
) -> Result<Box<dyn AssetGenerator>, DataContextError> {
    Ok(Box::new(ManualGenerator::new(config.assets.iter().cloned())))
}

/// Builds an in-memory generator.
fn build_memory_generator(
    _config: &GeneratorConfig,
    _factory: &ComponentFactory,
) -> Result<Box<dyn AssetGenerator>, DataContextError> {
    Ok(Box::new(MemoryGenerator))
}

// ============================================================================
// SECTION: Datasource
// ============================================================================

/// Configured datasource with its live generators.
pub struct Datasource {
    /// Datasource name.
    name: String,
    /// Configuration the datasource was built from.
    config: DatasourceConfig,
    /// Generators keyed by name.
    generators: BTreeMap<String, Box<dyn AssetGenerator>>,
}

impl Datasource {
    /// Returns the datasource name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the implementation tag.
    #[must_use]
    pub fn implementation(&self) -> &str {
        &self.config.implementation
    }

    /// Returns the configuration the datasource was built from.
    #[must_use]
    pub const fn config(&self) -> &DatasourceConfig {
        &self.config
    }

    /// Returns the generator names in ascending order.
    pub fn generator_names(&self) -> impl Iterator<Item = &str> {
        self.generators.keys().map(String::as_str)
    }

    /// Returns the named generator.
    #[must_use]
    pub fn generator(&self, name: &str) -> Option<&dyn AssetGenerator> {
        self.generators.get(name).map(|generator| &**generator)
    }

    /// Returns the generators keyed by name.
    pub fn generators(&self) -> impl Iterator<Item = (&str, &dyn AssetGenerator)> {
        self.generators.iter().map(|(name, generator)| (name.as_str(), &**generator))
    }

    /// Returns the number of generators.
    #[must_use]
    pub fn generator_count(&self) -> usize {
        self.generators.len()
    }
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Behavior when a datasource name is registered twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Fail with `AlreadyExists`.
    #[default]
    Reject,
    /// Replace the existing datasource.
    Overwrite,
}

/// Registry of configured datasources.
pub struct DatasourceRegistry {
    /// Factory building datasources and generators.
    factory: ComponentFactory,
    /// Duplicate registration policy.
    policy: DuplicatePolicy,
    /// Datasources keyed by name.
    datasources: BTreeMap<String, Datasource>,
}

impl DatasourceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new(factory: ComponentFactory, policy: DuplicatePolicy) -> Self {
        Self {
            factory,
            policy,
            datasources: BTreeMap::new(),
        }
    }

    /// Returns true when no datasource is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.datasources.is_empty()
    }

    /// Builds and registers a datasource.
    ///
    /// # Errors
    ///
    /// Returns [`DataContextError::AlreadyExists`] for a duplicate name under
    /// [`DuplicatePolicy::Reject`], or [`DataContextError::Config`] when the
    /// configuration cannot be built.
    pub fn add_datasource(
        &mut self,
        name: &str,
        config: DatasourceConfig,
    ) -> Result<&Datasource, DataContextError> {
        validate_component_name("datasource", name)?;
        if self.policy == DuplicatePolicy::Reject && self.datasources.contains_key(name) {
            return Err(DataContextError::AlreadyExists(format!(
                "datasource '{name}' already exists"
            )));
        }
        for generator_name in config.generators.keys() {
            validate_component_name("generator", generator_name)?;
        }
        let datasource = self.factory.build_datasource(name, config)?;
        tracing::debug!(
            datasource = name,
            implementation = datasource.implementation(),
            generators = datasource.generator_count(),
            "datasource registered"
        );
        self.datasources.insert(name.to_string(), datasource);
        self.get_datasource(name)
    }

    /// Builds and registers a generator on an existing datasource.
    ///
    /// # Errors
    ///
    /// Returns [`DataContextError::UnknownDatasourceOrGenerator`] for an
    /// unknown datasource, [`DataContextError::AlreadyExists`] for a duplicate
    /// generator, or [`DataContextError::Config`] when it cannot be built.
    pub fn add_generator(
        &mut self,
        datasource_name: &str,
        generator_name: &str,
        config: GeneratorConfig,
    ) -> Result<(), DataContextError> {
        validate_component_name("generator", generator_name)?;
        let datasource = self.datasources.get_mut(datasource_name).ok_or_else(|| {
            DataContextError::UnknownDatasourceOrGenerator(format!(
                "Unable to add generator '{generator_name}': no configured datasource \
                 '{datasource_name}'"
            ))
        })?;
        if datasource.generators.contains_key(generator_name) {
            return Err(DataContextError::AlreadyExists(format!(
                "generator '{generator_name}' already exists for datasource '{datasource_name}'"
            )));
        }
        let generator = self.factory.build_generator(&config)?;
        datasource.config.generators.insert(generator_name.to_string(), config);
        datasource.generators.insert(generator_name.to_string(), generator);
        tracing::debug!(
            datasource = datasource_name,
            generator = generator_name,
            "generator registered"
        );
        Ok(())
    }

    /// Returns the named datasource.
    ///
    /// # Errors
    ///
    /// Returns [`DataContextError::UnknownDatasourceOrGenerator`] when absent.
    pub fn get_datasource(&self, name: &str) -> Result<&Datasource, DataContextError> {
        self.datasources.get(name).ok_or_else(|| {
            DataContextError::UnknownDatasourceOrGenerator(format!(
                "Unable to load datasource '{name}': no configuration found"
            ))
        })
    }

    /// Returns the named datasource when configured.
    #[must_use]
    pub fn datasource(&self, name: &str) -> Option<&Datasource> {
        self.datasources.get(name)
    }

    /// Returns sorted name and implementation summaries.
    #[must_use]
    pub fn list_datasources(&self) -> Vec<DatasourceSummary> {
        self.datasources
            .values()
            .map(|datasource| DatasourceSummary {
                name: datasource.name.clone(),
                implementation: datasource.implementation().to_string(),
            })
            .collect()
    }

    /// Returns enumerated asset names grouped by datasource and generator.
    ///
    /// When `datasource_names` is provided only those datasources are listed.
    ///
    /// # Errors
    ///
    /// Returns [`DataContextError::UnknownDatasourceOrGenerator`] for an
    /// unknown datasource in the filter, or any generator enumeration error.
    pub fn get_available_data_asset_names(
        &self,
        datasource_names: Option<&[String]>,
    ) -> Result<AvailableAssetNames, DataContextError> {
        let selected: Vec<&Datasource> = match datasource_names {
            Some(names) => {
                names.iter().map(|name| self.get_datasource(name)).collect::<Result<_, _>>()?
            }
            None => self.datasources.values().collect(),
        };
        let mut available = AvailableAssetNames::new();
        for datasource in selected {
            let by_generator = available.entry(datasource.name.clone()).or_default();
            for (generator_name, generator) in datasource.generators() {
                by_generator.insert(generator_name.to_string(), enumerated_assets(generator)?);
            }
        }
        Ok(available)
    }

    /// Returns every `(datasource, generator)` pair in ascending order.
    pub fn generator_pairs(&self) -> impl Iterator<Item = (&str, &str, &dyn AssetGenerator)> {
        self.datasources.values().flat_map(|datasource| {
            datasource
                .generators()
                .map(move |(generator_name, generator)| {
                    (datasource.name.as_str(), generator_name, generator)
                })
        })
    }
}

impl Default for DatasourceRegistry {
    fn default() -> Self {
        Self::new(ComponentFactory::with_builtin_components(), DuplicatePolicy::Reject)
    }
}

/// Returns the names a generator enumerates; accepting generators list none.
///
/// # Errors
///
/// Returns the generator's enumeration error.
pub fn enumerated_assets(
    generator: &dyn AssetGenerator,
) -> Result<BTreeSet<String>, DataContextError> {
    match generator.capability() {
        GeneratorCapability::Enumerating => generator.asset_names(),
        GeneratorCapability::Accepting => Ok(BTreeSet::new()),
    }
}

/// Rejects component names that cannot appear in identifiers or store keys.
fn validate_component_name(kind: &str, name: &str) -> Result<(), DataContextError> {
    if name.is_empty() || name.contains(['/', '.', '\\', ':']) {
        return Err(DataContextError::Config(format!(
            "{kind} name '{name}' must be non-empty and must not contain '/', '.', '\\', or ':'"
        )));
    }
    Ok(())
}
