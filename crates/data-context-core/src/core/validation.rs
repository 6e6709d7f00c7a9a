// crates/data-context-core/src/core/validation.rs
// ============================================================================
// Module: Validation Results
// Description: Stored outcome of running an expectation suite against a batch.
// Purpose: Provide the serializable document kept by the validation result store.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Validation results are produced by an external validation engine and
//! handed to the context for storage. The context only filters them; it
//! never evaluates expectations itself.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::core::identifiers::ExpectationSuiteIdentifier;
use crate::core::identifiers::RunId;
use crate::core::identifiers::ValidationResultIdentifier;
use crate::core::suite::ExpectationConfiguration;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Identity metadata embedded in a validation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResultMeta {
    /// Suite the validation ran against.
    pub expectation_suite_identifier: ExpectationSuiteIdentifier,
    /// Validation run identifier.
    pub run_id: RunId,
}

/// Aggregate counts for a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ValidationStatistics {
    /// Number of expectations evaluated.
    pub evaluated_expectations: usize,
    /// Number of expectations that succeeded.
    pub successful_expectations: usize,
    /// Number of expectations that failed.
    pub unsuccessful_expectations: usize,
    /// Percentage of successful expectations, absent when nothing ran.
    pub success_percent: Option<f64>,
}

impl ValidationStatistics {
    /// Computes statistics over a set of expectation results.
    #[must_use]
    #[allow(clippy::cast_precision_loss, reason = "Percentages tolerate precision loss.")]
    pub fn from_results(results: &[ExpectationValidationResult]) -> Self {
        let evaluated = results.len();
        let successful = results.iter().filter(|result| result.success).count();
        let success_percent =
            (evaluated > 0).then(|| successful as f64 / evaluated as f64 * 100.0);
        Self {
            evaluated_expectations: evaluated,
            successful_expectations: successful,
            unsuccessful_expectations: evaluated - successful,
            success_percent,
        }
    }
}

/// Outcome of a single expectation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectationValidationResult {
    /// Whether the expectation held.
    pub success: bool,
    /// Expectation that was evaluated.
    pub expectation_config: ExpectationConfiguration,
    /// Engine-specific result payload (observed values, details).
    #[serde(default)]
    pub result: Map<String, Value>,
}

/// Outcome of validating one suite for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Identity metadata.
    pub meta: ValidationResultMeta,
    /// Whether every expectation held.
    pub success: bool,
    /// Aggregate counts.
    pub statistics: ValidationStatistics,
    /// Ordered per-expectation results.
    pub results: Vec<ExpectationValidationResult>,
}

impl ValidationResult {
    /// Builds a result, deriving `success` and `statistics` from the entries.
    #[must_use]
    pub fn new(
        expectation_suite_identifier: ExpectationSuiteIdentifier,
        run_id: RunId,
        results: Vec<ExpectationValidationResult>,
    ) -> Self {
        let statistics = ValidationStatistics::from_results(&results);
        Self {
            meta: ValidationResultMeta {
                expectation_suite_identifier,
                run_id,
            },
            success: results.iter().all(|result| result.success),
            statistics,
            results,
        }
    }

    /// Returns the store identifier formed by the embedded metadata.
    #[must_use]
    pub fn identifier(&self) -> ValidationResultIdentifier {
        ValidationResultIdentifier::new(
            self.meta.expectation_suite_identifier.clone(),
            self.meta.run_id.clone(),
        )
    }

    /// Returns a copy holding only unsuccessful expectation results.
    #[must_use]
    pub fn failed_only(&self) -> Self {
        let results: Vec<ExpectationValidationResult> =
            self.results.iter().filter(|result| !result.success).cloned().collect();
        Self {
            meta: self.meta.clone(),
            success: self.success,
            statistics: self.statistics,
            results,
        }
    }
}
