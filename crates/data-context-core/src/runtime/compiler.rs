// crates/data-context-core/src/runtime/compiler.rs
// ============================================================================
// Module: Parameter Compiler
// Description: Builds the cross-suite evaluation parameter index.
// Purpose: Report which validation results stored suites depend on.
// Dependencies: crate::core, crate::runtime, tracing
// ============================================================================

//! ## Overview
//! Compilation walks every stored suite, collects each kwarg holding a
//! validation parameter URN, and indexes it under the asset the URN names.
//! URN asset names are resolved like any user-supplied name, so partial
//! names are accepted when unambiguous. Malformed URNs are still listed in
//! the raw set but are logged and left out of the structured index.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::CompiledParameters;
use crate::core::DataContextError;
use crate::core::ExpectationSuite;
use crate::core::ParameterUrn;
use crate::core::UrnParseError;
use crate::core::parameters::parameter_reference;
use crate::runtime::resolver::NameResolver;
use crate::runtime::resolver::ResolveIntent;
use crate::runtime::suite_store::ExpectationSuiteStore;

// ============================================================================
// SECTION: Compilation
// ============================================================================

/// Compiles the parameter index across every stored suite.
///
/// # Errors
///
/// Returns a store error when suites cannot be loaded, or the resolver error
/// for a URN whose asset name does not resolve.
pub fn compile_parameters(
    suites: &ExpectationSuiteStore,
    resolver: &NameResolver<'_>,
) -> Result<CompiledParameters, DataContextError> {
    let mut compiled = CompiledParameters::default();
    for identifier in suites.list_keys()? {
        let suite = suites.get(&identifier)?;
        index_suite(&suite, resolver, &mut compiled)?;
    }
    tracing::debug!(parameters = compiled.raw.len(), "evaluation parameters compiled");
    Ok(compiled)
}

/// Indexes the parameter URNs referenced by one suite.
fn index_suite(
    suite: &ExpectationSuite,
    resolver: &NameResolver<'_>,
    compiled: &mut CompiledParameters,
) -> Result<(), DataContextError> {
    for expectation in &suite.expectations {
        for value in expectation.kwargs.values() {
            let Some(urn) = parameter_reference(value) else {
                continue;
            };
            match ParameterUrn::parse(urn) {
                Ok(parsed) => {
                    let asset = resolver.resolve(&parsed.data_asset_name, ResolveIntent::Create)?;
                    compiled.insert(asset, &parsed);
                }
                Err(UrnParseError::NotValidationUrn) => {}
                Err(reason) => {
                    compiled.raw.insert(urn.to_string());
                    tracing::warn!(
                        urn,
                        %reason,
                        expectation_suite = %suite.identifier(),
                        "skipping malformed evaluation parameter urn"
                    );
                }
            }
        }
    }
    Ok(())
}
