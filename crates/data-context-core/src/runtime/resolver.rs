// crates/data-context-core/src/runtime/resolver.rs
// ============================================================================
// Module: Data Asset Name Resolver
// Description: Disambiguates partial data asset names into fully-qualified identifiers.
// Purpose: Map user-supplied names onto exactly one (datasource, generator, asset) triple.
// Dependencies: crate::core, crate::runtime::registry, tracing
// ============================================================================

//! ## Overview
//! A name has one, two, or three delimiter-separated components. Three
//! components are authoritative once the datasource and generator exist.
//! Shorter names are matched against each generator's known assets: the
//! names it enumerates plus the assets already holding a stored suite under
//! it. Accepting generators contribute only their stored assets. Existing
//! matches always win over inferring a creation target, and
//! resolution either yields a complete triple or an error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use crate::core::DataAssetIdentifier;
use crate::core::DataContextError;
use crate::core::NameDelimiter;
use crate::interfaces::AssetGenerator;
use crate::runtime::registry::DatasourceRegistry;
use crate::runtime::registry::enumerated_assets;

// ============================================================================
// SECTION: Intent
// ============================================================================

/// Purpose of a resolution, controlling the zero-match fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveIntent {
    /// The asset must already exist.
    Read,
    /// The asset may be created when the target is unambiguous.
    Create,
}

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Read-only view used to resolve data asset names.
pub struct NameResolver<'a> {
    /// Registry of configured datasources.
    registry: &'a DatasourceRegistry,
    /// Assets that already hold at least one stored suite.
    stored_assets: &'a BTreeSet<DataAssetIdentifier>,
    /// Active name delimiter.
    delimiter: NameDelimiter,
}

impl<'a> NameResolver<'a> {
    /// Creates a resolver over the registry and stored suite assets.
    #[must_use]
    pub const fn new(
        registry: &'a DatasourceRegistry,
        stored_assets: &'a BTreeSet<DataAssetIdentifier>,
        delimiter: NameDelimiter,
    ) -> Self {
        Self {
            registry,
            stored_assets,
            delimiter,
        }
    }

    /// Resolves a name into a fully-qualified identifier.
    ///
    /// # Errors
    ///
    /// Returns the [`DataContextError`] variant describing why the name does
    /// not identify exactly one asset.
    pub fn resolve(
        &self,
        name: &str,
        intent: ResolveIntent,
    ) -> Result<DataAssetIdentifier, DataContextError> {
        let d = self.delimiter;
        let parts: Vec<&str> = name.split(d.as_char()).collect();
        if parts.len() > 3 {
            return Err(DataContextError::TooManyComponents(format!(
                "Invalid data_asset_name '{name}': found too many components using delimiter \
                 '{d}'"
            )));
        }
        if parts.iter().any(|part| part.is_empty()) {
            return Err(DataContextError::InvalidName(format!(
                "Invalid data_asset_name '{name}': components must be non-empty using delimiter \
                 '{d}'"
            )));
        }
        let resolved = match parts.as_slice() {
            [datasource, generator, asset] => self.resolve_qualified(datasource, generator, asset),
            [datasource, asset] => self.resolve_in_datasource(name, datasource, asset),
            _ => self.resolve_anywhere(name, intent),
        }?;
        tracing::debug!(data_asset_name = name, resolved = %resolved, "data asset name resolved");
        Ok(resolved)
    }

    /// Resolves a `datasource<d>generator<d>asset` name.
    fn resolve_qualified(
        &self,
        datasource: &str,
        generator: &str,
        asset: &str,
    ) -> Result<DataAssetIdentifier, DataContextError> {
        let detail =
            format!("no configured datasource '{datasource}' with generator '{generator}'");
        if self.registry.is_empty() {
            return Err(DataContextError::NoDatasourceConfigured(format!(
                "No datasource configured: invalid data_asset_name: {detail}"
            )));
        }
        let owns_generator = self
            .registry
            .datasource(datasource)
            .is_some_and(|configured| configured.generator(generator).is_some());
        if !owns_generator {
            return Err(DataContextError::UnknownDatasourceOrGenerator(format!(
                "Invalid data_asset_name: {detail}"
            )));
        }
        Ok(DataAssetIdentifier::new(datasource, generator, asset))
    }

    /// Resolves a `datasource<d>asset` name.
    fn resolve_in_datasource(
        &self,
        name: &str,
        datasource_name: &str,
        asset: &str,
    ) -> Result<DataAssetIdentifier, DataContextError> {
        if self.registry.is_empty() {
            return Err(no_datasource(name));
        }
        let datasource = self.registry.datasource(datasource_name).ok_or_else(|| {
            DataContextError::UnknownDatasourceOrGenerator(format!(
                "Invalid data_asset_name '{name}': no configured datasource '{datasource_name}'"
            ))
        })?;
        if datasource.generator_count() == 0 {
            return Err(DataContextError::UnknownDatasourceOrGenerator(format!(
                "Invalid data_asset_name '{name}': datasource '{datasource_name}' has no \
                 configured generators"
            )));
        }
        let mut candidates = Vec::new();
        for (generator_name, generator) in datasource.generators() {
            if self.known_assets(datasource_name, generator_name, generator)?.contains(asset) {
                candidates.push(DataAssetIdentifier::new(datasource_name, generator_name, asset));
            }
        }
        if let Some(resolved) = self.single_candidate(name, candidates)? {
            return Ok(resolved);
        }
        let mut generator_names = datasource.generator_names();
        match (generator_names.next(), generator_names.next()) {
            (Some(generator_name), None) => {
                Ok(DataAssetIdentifier::new(datasource_name, generator_name, asset))
            }
            _ => Err(DataContextError::AmbiguousCreateTarget(format!(
                "Ambiguous data_asset_name: no existing data_asset has the provided name \
                 '{name}' and datasource '{datasource_name}' has multiple generators"
            ))),
        }
    }

    /// Resolves a bare asset name across every configured generator.
    fn resolve_anywhere(
        &self,
        name: &str,
        intent: ResolveIntent,
    ) -> Result<DataAssetIdentifier, DataContextError> {
        if self.registry.is_empty() {
            return Err(no_datasource(name));
        }
        let mut candidates = Vec::new();
        let mut pair_count = 0_usize;
        let mut sole_pair = None;
        for (datasource_name, generator_name, generator) in self.registry.generator_pairs() {
            pair_count += 1;
            sole_pair = Some((datasource_name, generator_name));
            if self.known_assets(datasource_name, generator_name, generator)?.contains(name) {
                candidates.push(DataAssetIdentifier::new(datasource_name, generator_name, name));
            }
        }
        if let Some(resolved) = self.single_candidate(name, candidates)? {
            return Ok(resolved);
        }
        match (intent, pair_count, sole_pair) {
            (ResolveIntent::Read, _, _) => Err(DataContextError::NotFound(format!(
                "No data_asset named '{name}' found in any configured datasource"
            ))),
            (ResolveIntent::Create, 1, Some((datasource_name, generator_name))) => {
                Ok(DataAssetIdentifier::new(datasource_name, generator_name, name))
            }
            (ResolveIntent::Create, ..) => Err(DataContextError::AmbiguousCreateTarget(format!(
                "Ambiguous data_asset_name: no existing data_asset has the provided name \
                 '{name}' and {pair_count} datasource/generator pairs could receive it"
            ))),
        }
    }

    /// Returns the single candidate, or fails when several exist.
    fn single_candidate(
        &self,
        name: &str,
        mut candidates: Vec<DataAssetIdentifier>,
    ) -> Result<Option<DataAssetIdentifier>, DataContextError> {
        match candidates.len() {
            0 => Ok(None),
            1 => Ok(candidates.pop()),
            _ => {
                candidates.sort();
                let rendered: Vec<String> = candidates
                    .iter()
                    .map(|candidate| candidate.to_delimited_string(self.delimiter))
                    .collect();
                Err(DataContextError::AmbiguousExistingMatch(format!(
                    "Ambiguous data_asset_name '{name}'. Multiple candidates found: {}",
                    rendered.join(", ")
                )))
            }
        }
    }

    /// Returns the enumerated and stored asset names for one generator.
    fn known_assets(
        &self,
        datasource: &str,
        generator_name: &str,
        generator: &dyn AssetGenerator,
    ) -> Result<BTreeSet<String>, DataContextError> {
        let mut names = enumerated_assets(generator)?;
        names.extend(
            self.stored_assets
                .iter()
                .filter(|stored| {
                    stored.datasource() == datasource && stored.generator() == generator_name
                })
                .map(|stored| stored.generator_asset().to_string()),
        );
        Ok(names)
    }
}

/// Builds the error raised when the registry is empty.
fn no_datasource(name: &str) -> DataContextError {
    DataContextError::NoDatasourceConfigured(format!(
        "No datasource configured: unable to resolve data_asset_name '{name}'"
    ))
}
