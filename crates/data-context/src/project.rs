// crates/data-context/src/project.rs
// ============================================================================
// Module: Project Layout
// Description: Scaffolding and discovery of data context project directories.
// Purpose: Create and locate the on-disk layout a data context runs against.
// Dependencies: data-context-config, data-context-core, tracing
// ============================================================================

//! ## Overview
//! A project keeps its context root at `<project>/data_context/`. The root
//! holds `data_context.toml`, committed directories for datasources,
//! expectations and plugins, and an `uncommitted/` tree for local-only
//! files. Scaffolding never overwrites an existing configuration or
//! config-variables file.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use data_context_config::CONFIG_FILE_NAME;
use data_context_config::DataDocsSiteConfig;
use data_context_config::VariableSource;
use data_context_core::DataContextError;
use tracing::info;
use tracing::warn;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Name of the context root directory inside a project.
pub const CONTEXT_DIRECTORY_NAME: &str = "data_context";
/// Variable naming an explicit context root.
pub const CONTEXT_HOME_VARIABLE: &str = "DATA_CONTEXT_HOME";
/// Directories created directly under the context root.
pub const BASE_DIRECTORIES: [&str; 4] = ["datasources", "expectations", "plugins", "uncommitted"];
/// Directories created under `uncommitted/`.
pub const UNCOMMITTED_DIRECTORIES: [&str; 3] = ["data_docs", "samples", "validations"];
/// Name of the local-only directory.
const UNCOMMITTED_DIRECTORY: &str = "uncommitted";
/// Config-variables file created by scaffolding.
const CONFIG_VARIABLES_FILE_NAME: &str = "config_variables.toml";
/// Data docs entry page name.
const DATA_DOCS_INDEX: &str = "index.html";

/// Contents of the context root `.gitignore`.
const GITIGNORE_TEMPLATE: &str = "uncommitted/\n";

/// Starting project configuration written by [`scaffold_project`].
pub const PROJECT_CONFIG_TEMPLATE: &str = r#"# Data context project configuration.
config_version = 1
data_asset_name_delimiter = "/"
plugins_directory = "plugins"
config_variables_file_path = "uncommitted/config_variables.toml"

[expectations_store]
type = "filesystem"
base_directory = "expectations"

[validations_store]
type = "filesystem"
base_directory = "uncommitted/validations"

[datasources]

[data_docs_sites.local_site]
base_directory = "uncommitted/data_docs/local_site"
"#;

/// Starting config-variables file written by [`scaffold_project`].
const CONFIG_VARIABLES_TEMPLATE: &str = "# Values referenced as ${NAME} from data_context.toml.\n\
                                         # This file lives under uncommitted/ and is not \
                                         committed.\n";

// ============================================================================
// SECTION: Scaffolding
// ============================================================================

/// Creates the standard directory tree and `.gitignore` under a context root.
///
/// Existing directories and files are left in place.
///
/// # Errors
///
/// Returns [`DataContextError::Io`] when a directory or file cannot be
/// created.
pub fn scaffold_directories(context_root: &Path) -> Result<(), DataContextError> {
    for directory in BASE_DIRECTORIES {
        create_dir(&context_root.join(directory))?;
    }
    let uncommitted = context_root.join(UNCOMMITTED_DIRECTORY);
    for directory in UNCOMMITTED_DIRECTORIES {
        create_dir(&uncommitted.join(directory))?;
    }
    let gitignore = context_root.join(".gitignore");
    if !gitignore.exists() {
        write_file(&gitignore, GITIGNORE_TEMPLATE)?;
    }
    Ok(())
}

/// Returns true when every `uncommitted/` sub-directory exists.
#[must_use]
pub fn all_uncommitted_directories_exist(context_root: &Path) -> bool {
    let uncommitted = context_root.join(UNCOMMITTED_DIRECTORY);
    UNCOMMITTED_DIRECTORIES.iter().all(|directory| uncommitted.join(directory).is_dir())
}

/// Scaffolds a project and returns its context root.
///
/// Re-running is safe: an existing configuration or config-variables file
/// is kept and a warning is logged; missing directories are recreated.
///
/// # Errors
///
/// Returns [`DataContextError::Io`] when the layout cannot be written.
pub fn scaffold_project(project_root: &Path) -> Result<PathBuf, DataContextError> {
    let context_root = project_root.join(CONTEXT_DIRECTORY_NAME);
    create_dir(&context_root)?;

    let config_path = context_root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        warn!(path = %config_path.display(), "project config already exists; leaving it untouched");
    } else {
        write_file(&config_path, PROJECT_CONFIG_TEMPLATE)?;
    }

    if !all_uncommitted_directories_exist(&context_root) {
        info!(path = %context_root.display(), "creating uncommitted directories");
    }
    scaffold_directories(&context_root)?;

    let variables_path = context_root.join(UNCOMMITTED_DIRECTORY).join(CONFIG_VARIABLES_FILE_NAME);
    if variables_path.exists() {
        warn!(
            path = %variables_path.display(),
            "config variables file already exists; leaving it untouched"
        );
    } else {
        write_file(&variables_path, CONFIG_VARIABLES_TEMPLATE)?;
    }
    Ok(context_root)
}

// ============================================================================
// SECTION: Discovery
// ============================================================================

/// Locates the context root for a project.
///
/// `DATA_CONTEXT_HOME` from `variables` wins when it names a directory
/// holding `data_context.toml`. Otherwise `start` and its ancestors are
/// searched for `data_context/data_context.toml`.
///
/// # Errors
///
/// Returns [`DataContextError::NotFound`] when no context root is found.
pub fn find_context_root_dir(
    start: &Path,
    variables: &dyn VariableSource,
) -> Result<PathBuf, DataContextError> {
    if let Some(home) = variables.var(CONTEXT_HOME_VARIABLE) {
        let home = PathBuf::from(home);
        if home.join(CONFIG_FILE_NAME).is_file() {
            return Ok(home);
        }
        warn!(
            path = %home.display(),
            "{CONTEXT_HOME_VARIABLE} does not contain {CONFIG_FILE_NAME}; searching from start"
        );
    }
    for directory in start.ancestors() {
        let candidate = directory.join(CONTEXT_DIRECTORY_NAME);
        if candidate.join(CONFIG_FILE_NAME).is_file() {
            return Ok(candidate);
        }
    }
    Err(DataContextError::NotFound("Unable to locate context root directory.".to_string()))
}

// ============================================================================
// SECTION: Data Docs
// ============================================================================

/// Returns `file://` URLs for every site whose `index.html` exists.
///
/// Relative site directories are joined onto `context_root`. URLs are
/// ordered by site name.
#[must_use]
pub fn existing_data_docs_urls(
    context_root: Option<&Path>,
    sites: &BTreeMap<String, DataDocsSiteConfig>,
) -> Vec<String> {
    sites
        .values()
        .map(|site| resolve_against(context_root, &site.base_directory).join(DATA_DOCS_INDEX))
        .filter(|index| index.is_file())
        .map(|index| format!("file://{}", index.display()))
        .collect()
}

/// Returns `path` unchanged when absolute, otherwise joined onto `root`.
#[must_use]
pub fn resolve_against(root: Option<&Path>, path: &Path) -> PathBuf {
    match root {
        Some(root) if path.is_relative() => root.join(path),
        _ => path.to_path_buf(),
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Creates a directory and its parents.
fn create_dir(path: &Path) -> Result<(), DataContextError> {
    fs::create_dir_all(path)
        .map_err(|err| DataContextError::Io(format!("create {}: {err}", path.display())))
}

/// Writes a text file.
fn write_file(path: &Path, contents: &str) -> Result<(), DataContextError> {
    fs::write(path, contents)
        .map_err(|err| DataContextError::Io(format!("write {}: {err}", path.display())))
}
