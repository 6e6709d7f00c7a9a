// crates/data-context-config/src/variables.rs
// ============================================================================
// Module: Config Variables
// Description: `${NAME}` substitution over parsed configuration values.
// Purpose: Resolve deployment-specific values without mutating the process.
// Dependencies: toml, tracing
// ============================================================================

//! ## Overview
//! Variables are looked up through the [`VariableSource`] trait so callers
//! decide where values come from. The CLI snapshots the process environment
//! into a map; tests pass literal maps. [`LayeredVariables`] puts the
//! injected source in front of the config-variables file.
//!
//! Substitution is strict: an undefined variable or unterminated `${` is a
//! configuration error. A `$` that does not open `${` is kept literally.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::ConfigError;
use crate::config::MAX_CONFIG_FILE_SIZE;

// ============================================================================
// SECTION: Variable Sources
// ============================================================================

/// Lookup of named configuration variables.
pub trait VariableSource {
    /// Returns the value of `name`, if defined.
    fn var(&self, name: &str) -> Option<String>;
}

impl VariableSource for BTreeMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<T: VariableSource + ?Sized> VariableSource for &T {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }
}

/// Injected variables layered over a config-variables file.
pub struct LayeredVariables<'a> {
    /// Source consulted first.
    primary: &'a dyn VariableSource,
    /// Values loaded from the config-variables file.
    fallback: BTreeMap<String, String>,
}

impl<'a> LayeredVariables<'a> {
    /// Creates a layered source; `primary` wins over `fallback`.
    #[must_use]
    pub fn new(primary: &'a dyn VariableSource, fallback: BTreeMap<String, String>) -> Self {
        Self {
            primary,
            fallback,
        }
    }
}

impl VariableSource for LayeredVariables<'_> {
    fn var(&self, name: &str) -> Option<String> {
        self.primary.var(name).or_else(|| self.fallback.get(name).cloned())
    }
}

// ============================================================================
// SECTION: Substitution
// ============================================================================

/// Replaces every `${NAME}` in `value` using `source`.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] when a reference is unterminated, empty,
/// or names an undefined variable.
pub fn substitute_str(value: &str, source: &dyn VariableSource) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find("${") {
        output.push_str(&rest[.. start]);
        let after = &rest[start + 2 ..];
        let Some(end) = after.find('}') else {
            return Err(ConfigError::Invalid(format!(
                "unterminated variable reference in '{value}'"
            )));
        };
        let name = after[.. end].trim();
        if name.is_empty() {
            return Err(ConfigError::Invalid(format!("empty variable reference in '{value}'")));
        }
        let Some(resolved) = source.var(name) else {
            return Err(ConfigError::Invalid(format!("config variable '{name}' is not defined")));
        };
        output.push_str(&resolved);
        rest = &after[end + 1 ..];
    }
    output.push_str(rest);
    Ok(output)
}

/// Substitutes variables in every string nested inside `value`.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] when any string fails substitution.
pub fn substitute_value(
    value: &mut toml::Value,
    source: &dyn VariableSource,
) -> Result<(), ConfigError> {
    match value {
        toml::Value::String(text) => {
            if text.contains("${") {
                *text = substitute_str(text, source)?;
            }
            Ok(())
        }
        toml::Value::Array(items) => {
            for item in items {
                substitute_value(item, source)?;
            }
            Ok(())
        }
        toml::Value::Table(table) => {
            for (_, item) in table.iter_mut() {
                substitute_value(item, source)?;
            }
            Ok(())
        }
        toml::Value::Integer(_)
        | toml::Value::Float(_)
        | toml::Value::Boolean(_)
        | toml::Value::Datetime(_) => Ok(()),
    }
}

// ============================================================================
// SECTION: Variables File
// ============================================================================

/// Loads a flat TOML table of variables; a missing file yields no variables.
///
/// Scalar values are stringified. Nested tables and arrays are rejected.
///
/// # Errors
///
/// Returns [`ConfigError`] when the file cannot be read, exceeds the size
/// limit, or contains unsupported values.
pub fn load_config_variables(path: &Path) -> Result<BTreeMap<String, String>, ConfigError> {
    if !path.exists() {
        debug!(path = %path.display(), "config variables file not found");
        return Ok(BTreeMap::new());
    }
    let bytes = fs::read(path).map_err(|err| ConfigError::Io(err.to_string()))?;
    if bytes.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::Invalid("config variables file exceeds size limit".to_string()));
    }
    let content = std::str::from_utf8(&bytes)
        .map_err(|_| ConfigError::Invalid("config variables file must be utf-8".to_string()))?;
    let table: toml::Table =
        toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
    let mut variables = BTreeMap::new();
    for (name, value) in table {
        let text = match value {
            toml::Value::String(text) => text,
            toml::Value::Integer(number) => number.to_string(),
            toml::Value::Float(number) => number.to_string(),
            toml::Value::Boolean(flag) => flag.to_string(),
            toml::Value::Datetime(datetime) => datetime.to_string(),
            toml::Value::Array(_) | toml::Value::Table(_) => {
                return Err(ConfigError::Invalid(format!(
                    "config variable '{name}' must be a scalar value"
                )));
            }
        };
        variables.insert(name, text);
    }
    Ok(variables)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, reason = "Test-only assertions.")]

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(key, value)| ((*key).to_string(), (*value).to_string())).collect()
    }

    #[test]
    fn substitutes_multiple_references() {
        let source = vars(&[("HOST", "db"), ("PORT", "5432")]);
        assert_eq!(substitute_str("pg://${HOST}:${PORT}/x", &source).unwrap(), "pg://db:5432/x");
        assert_eq!(substitute_str("costs $5", &source).unwrap(), "costs $5");
    }

    #[test]
    fn rejects_undefined_and_unterminated_references() {
        let source = vars(&[]);
        let err = substitute_str("${MISSING}", &source).unwrap_err();
        assert!(err.to_string().contains("'MISSING' is not defined"));
        assert!(substitute_str("${OPEN", &source).is_err());
        assert!(substitute_str("${}", &source).is_err());
    }

    #[test]
    fn primary_source_wins_over_file_values() {
        let primary = vars(&[("A", "env")]);
        let layered = LayeredVariables::new(&primary, vars(&[("A", "file"), ("B", "file")]));
        assert_eq!(layered.var("A").as_deref(), Some("env"));
        assert_eq!(layered.var("B").as_deref(), Some("file"));
        assert_eq!(layered.var("C"), None);
    }
}
