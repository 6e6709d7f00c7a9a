// crates/data-context-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for data-context-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::collections::BTreeMap;

use data_context_config::ConfigError;
use data_context_config::ProjectConfig;

/// Parses and validates a TOML string into a `ProjectConfig`.
pub fn config_from_toml(toml_str: &str) -> Result<ProjectConfig, ConfigError> {
    ProjectConfig::from_toml_str(toml_str)
}

/// Returns a config with all defaults applied.
pub fn minimal_config() -> ProjectConfig {
    ProjectConfig::default()
}

/// Builds a variable map from literal pairs.
pub fn variables(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs.iter().map(|(key, value)| ((*key).to_string(), (*value).to_string())).collect()
}

/// Asserts that `result` failed with a message containing `needle`.
pub fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) -> Result<(), String> {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}
