// crates/data-context-cli/src/i18n.rs
// ============================================================================
// Module: CLI Message Catalog
// Description: Message catalog and placeholder substitution for CLI output.
// Purpose: Keep every user-facing CLI string in one table.
// Dependencies: Standard library collections.
// ============================================================================

//! ## Overview
//! User-facing CLI strings live in a keyed catalog and are rendered through
//! the [`t!`](crate::t) macro. Missing keys render as the key itself so a
//! typo is visible rather than silent.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A formatted message argument captured by the [`macro@crate::t`] macro.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageArg {
    /// Placeholder name without braces.
    pub key: &'static str,
    /// Preformatted replacement value.
    pub value: String,
}

impl MessageArg {
    /// Creates a message argument.
    #[must_use]
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// English message catalog.
const CATALOG: &[(&str, &str)] = &[
    ("init.ok", "Data context initialized at {path}"),
    ("config.validate.ok", "Config valid: {path}"),
    ("context.failed", "Data context error: {error}"),
    ("cwd.failed", "Unable to determine the working directory: {error}"),
    ("datasource.list.none", "No datasources configured."),
    ("datasource.list.entry", "- {name} ({implementation})"),
    ("datasource.add.ok", "Datasource {name} added to {path}"),
    ("asset.list.none", "No data assets found."),
    ("suite.list.none", "No expectation suites found."),
    ("suite.create.ok", "Expectation suite created: {identifier}"),
    ("validation.list.none", "No validation results found."),
    ("compile.summary", "Compiled {parameters} parameter references across {assets} data assets"),
    ("compile.entry", "- {urn}"),
    ("docs.list.none", "No data docs sites have been built."),
    ("json.failed", "Failed to render JSON: {error}"),
    ("logging.init_failed", "Failed to initialize logging: {error}"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
];

/// Returns the catalog as a lookup map.
fn catalog() -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    CATALOG_MAP.get_or_init(|| CATALOG.iter().copied().collect())
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Renders `key` while substituting `args`.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog().get(key).copied().unwrap_or(key);
    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a catalog message from a key and named arguments.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
