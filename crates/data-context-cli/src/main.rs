// crates/data-context-cli/src/main.rs
// ============================================================================
// Module: Data Context CLI Entry Point
// Description: Command dispatcher for data context project workflows.
// Purpose: Scaffold projects and inspect datasources, suites, and results.
// Dependencies: clap, data-context, data-context-core, serde_jcs, thiserror, tracing-subscriber
// ============================================================================

//! ## Overview
//! The `data-context` binary opens the project found through `--context-root`,
//! `DATA_CONTEXT_HOME`, or the nearest `data_context/` directory above the
//! working directory. The process environment is read once into a variable
//! map that feeds config substitution; nothing else consults it. Logs go to
//! stderr so stdout stays machine-readable.

// ============================================================================
// SECTION: Modules
// ============================================================================

#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use data_context::DataContext;
use data_context::find_context_root_dir;
use data_context_cli::t;
use data_context_core::DataContextError;
use data_context_core::DatasourceConfig;
use data_context_core::ResolveIntent;
use data_context_core::RunId;
use serde::Serialize;
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "data-context", version, disable_help_subcommand = true)]
struct Cli {
    /// Context root directory (defaults to `DATA_CONTEXT_HOME` or the nearest
    /// `data_context/` directory).
    #[arg(long, value_name = "DIR", global = true)]
    context_root: Option<PathBuf>,
    /// Emit debug logs on stderr.
    #[arg(long, short, action = ArgAction::SetTrue, global = true)]
    verbose: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Scaffold a new project.
    Init(InitCommand),
    /// Project configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Datasource utilities.
    Datasource {
        /// Selected datasource subcommand.
        #[command(subcommand)]
        command: DatasourceCommand,
    },
    /// Data asset name utilities.
    Asset {
        /// Selected asset subcommand.
        #[command(subcommand)]
        command: AssetCommand,
    },
    /// Expectation suite utilities.
    Suite {
        /// Selected suite subcommand.
        #[command(subcommand)]
        command: SuiteCommand,
    },
    /// Validation result utilities.
    Validation {
        /// Selected validation subcommand.
        #[command(subcommand)]
        command: ValidationCommand,
    },
    /// Build the evaluation parameter index from stored suites.
    Compile,
    /// List built data docs sites.
    Docs,
}

/// Arguments for `init`.
#[derive(Args, Debug)]
struct InitCommand {
    /// Project directory that receives `data_context/`.
    #[arg(long, value_name = "DIR", default_value = ".")]
    project_dir: PathBuf,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load the project config and build every configured component.
    Validate,
}

/// Datasource subcommands.
#[derive(Subcommand, Debug)]
enum DatasourceCommand {
    /// List configured datasources.
    List,
    /// Add a datasource and save the project config.
    Add(DatasourceAddCommand),
}

/// Arguments for `datasource add`.
#[derive(Args, Debug)]
struct DatasourceAddCommand {
    /// Datasource name.
    name: String,
    /// Datasource implementation tag.
    #[arg(long, value_name = "TAG", default_value = "filesystem")]
    implementation: String,
    /// Base directory for file-backed datasources.
    #[arg(long, value_name = "DIR")]
    base_directory: Option<PathBuf>,
}

/// Asset subcommands.
#[derive(Subcommand, Debug)]
enum AssetCommand {
    /// List enumerated data asset names.
    List(AssetListCommand),
    /// Resolve a data asset name into its qualified form.
    Normalize(AssetNormalizeCommand),
}

/// Arguments for `asset list`.
#[derive(Args, Debug)]
struct AssetListCommand {
    /// Restrict the listing to these datasources.
    #[arg(long = "datasource", value_name = "NAME")]
    datasources: Vec<String>,
}

/// Arguments for `asset normalize`.
#[derive(Args, Debug)]
struct AssetNormalizeCommand {
    /// Data asset name to resolve.
    name: String,
    /// Whether the asset must already exist.
    #[arg(long, value_enum, default_value_t = IntentArg::Create)]
    intent: IntentArg,
}

/// Resolution intent accepted on the command line.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum IntentArg {
    /// The asset must already exist.
    Read,
    /// The asset may be created.
    Create,
}

impl From<IntentArg> for ResolveIntent {
    fn from(value: IntentArg) -> Self {
        match value {
            IntentArg::Read => Self::Read,
            IntentArg::Create => Self::Create,
        }
    }
}

/// Suite subcommands.
#[derive(Subcommand, Debug)]
enum SuiteCommand {
    /// List stored suites.
    List,
    /// Create an empty suite.
    Create(SuiteCreateCommand),
    /// Print a stored suite as canonical JSON.
    Show(SuiteShowCommand),
}

/// Arguments for `suite create`.
#[derive(Args, Debug)]
struct SuiteCreateCommand {
    /// Data asset name the suite belongs to.
    data_asset_name: String,
    /// Suite name.
    #[arg(long, value_name = "NAME", default_value = "default")]
    suite: String,
    /// Replace an existing suite.
    #[arg(long, action = ArgAction::SetTrue)]
    overwrite: bool,
}

/// Arguments for `suite show`.
#[derive(Args, Debug)]
struct SuiteShowCommand {
    /// Data asset name the suite belongs to.
    data_asset_name: String,
    /// Suite name.
    #[arg(long, value_name = "NAME", default_value = "default")]
    suite: String,
}

/// Validation subcommands.
#[derive(Subcommand, Debug)]
enum ValidationCommand {
    /// List stored validation results.
    List,
    /// Print a stored validation result as canonical JSON.
    Get(ValidationGetCommand),
}

/// Arguments for `validation get`.
#[derive(Args, Debug)]
struct ValidationGetCommand {
    /// Data asset name the result belongs to.
    data_asset_name: String,
    /// Suite name.
    #[arg(long, value_name = "NAME", default_value = "default")]
    suite: String,
    /// Run identifier (defaults to the latest run).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,
    /// Keep only failed expectation results.
    #[arg(long, action = ArgAction::SetTrue)]
    failed_only: bool,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error carrying a rendered message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a rendered message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

impl From<DataContextError> for CliError {
    fn from(err: DataContextError) -> Self {
        Self::new(t!("context.failed", error = err))
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Environment
// ============================================================================

/// Process inputs a command runs against.
struct Environment {
    /// Snapshot of the process environment used for config substitution.
    variables: BTreeMap<String, String>,
    /// Directory the context root search starts from.
    working_directory: PathBuf,
}

impl Environment {
    /// Captures the current process environment.
    fn capture() -> CliResult<Self> {
        let working_directory = std::env::current_dir()
            .map_err(|err| CliError::new(t!("cwd.failed", error = err)))?;
        Ok(Self {
            variables: std::env::vars().collect(),
            working_directory,
        })
    }
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = setup_logging(cli.verbose).and_then(|()| {
        let environment = Environment::capture()?;
        let mut stdout = std::io::stdout().lock();
        execute(cli, &environment, &mut stdout)
    });
    match result {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Installs the stderr log subscriber.
fn setup_logging(verbose: bool) -> CliResult<()> {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|err| CliError::new(t!("logging.init_failed", error = err)))
}

/// Executes a parsed command, writing results to `out`.
fn execute(cli: Cli, environment: &Environment, out: &mut dyn Write) -> CliResult<ExitCode> {
    let root = cli.context_root.as_deref();
    match cli.command {
        Commands::Init(command) => command_init(&command, environment, out),
        Commands::Config {
            command: ConfigCommand::Validate,
        } => command_config_validate(root, environment, out),
        Commands::Datasource {
            command,
        } => command_datasource(command, root, environment, out),
        Commands::Asset {
            command,
        } => command_asset(&command, root, environment, out),
        Commands::Suite {
            command,
        } => command_suite(&command, root, environment, out),
        Commands::Validation {
            command,
        } => command_validation(&command, root, environment, out),
        Commands::Compile => command_compile(root, environment, out),
        Commands::Docs => command_docs(root, environment, out),
    }
}

/// Opens the context for commands that operate on an existing project.
fn open_context(root: Option<&Path>, environment: &Environment) -> CliResult<DataContext> {
    let context_root = match root {
        Some(root) => root.to_path_buf(),
        None => find_context_root_dir(&environment.working_directory, &environment.variables)?,
    };
    Ok(DataContext::open(&context_root, &environment.variables)?)
}

// ============================================================================
// SECTION: Project Commands
// ============================================================================

/// Executes `init`.
fn command_init(
    command: &InitCommand,
    environment: &Environment,
    out: &mut dyn Write,
) -> CliResult<ExitCode> {
    let project_dir: PathBuf =
        environment.working_directory.join(&command.project_dir).components().collect();
    let context = DataContext::create(&project_dir, &environment.variables)?;
    let path = context.root_directory().map_or_else(String::new, |root| root.display().to_string());
    write_line(out, &t!("init.ok", path = path))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `config validate`.
fn command_config_validate(
    root: Option<&Path>,
    environment: &Environment,
    out: &mut dyn Write,
) -> CliResult<ExitCode> {
    let context = open_context(root, environment)?;
    let path = context.root_directory().map_or_else(String::new, |root| root.display().to_string());
    write_line(out, &t!("config.validate.ok", path = path))?;
    Ok(ExitCode::SUCCESS)
}

/// Executes `docs`.
fn command_docs(
    root: Option<&Path>,
    environment: &Environment,
    out: &mut dyn Write,
) -> CliResult<ExitCode> {
    let context = open_context(root, environment)?;
    let urls = context.get_existing_local_data_docs_sites_urls();
    if urls.is_empty() {
        write_line(out, &t!("docs.list.none"))?;
    }
    for url in urls {
        write_line(out, &url)?;
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Datasource And Asset Commands
// ============================================================================

/// Dispatches datasource subcommands.
fn command_datasource(
    command: DatasourceCommand,
    root: Option<&Path>,
    environment: &Environment,
    out: &mut dyn Write,
) -> CliResult<ExitCode> {
    let mut context = open_context(root, environment)?;
    match command {
        DatasourceCommand::List => {
            let datasources = context.list_datasources();
            if datasources.is_empty() {
                write_line(out, &t!("datasource.list.none"))?;
            }
            for datasource in datasources {
                write_line(
                    out,
                    &t!(
                        "datasource.list.entry",
                        name = datasource.name,
                        implementation = datasource.implementation
                    ),
                )?;
            }
        }
        DatasourceCommand::Add(command) => {
            let mut config = DatasourceConfig::new(command.implementation);
            if let Some(base_directory) = command.base_directory {
                config = config.with_base_directory(base_directory);
            }
            context.add_datasource(&command.name, config)?;
            context.save_project_config()?;
            let path = context
                .root_directory()
                .map_or_else(String::new, |root| root.display().to_string());
            write_line(out, &t!("datasource.add.ok", name = command.name, path = path))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Dispatches asset subcommands.
fn command_asset(
    command: &AssetCommand,
    root: Option<&Path>,
    environment: &Environment,
    out: &mut dyn Write,
) -> CliResult<ExitCode> {
    let context = open_context(root, environment)?;
    let delimiter = context.data_asset_name_delimiter();
    match command {
        AssetCommand::List(command) => {
            let filter = (!command.datasources.is_empty()).then_some(command.datasources.as_slice());
            let available = context.get_available_data_asset_names(filter)?;
            let mut any = false;
            for (datasource, generators) in &available {
                for (generator, assets) in generators {
                    for asset in assets {
                        any = true;
                        write_line(out, &format!("{datasource}{delimiter}{generator}{delimiter}{asset}"))?;
                    }
                }
            }
            if !any {
                write_line(out, &t!("asset.list.none"))?;
            }
        }
        AssetCommand::Normalize(command) => {
            let identifier =
                context.normalize_data_asset_name_with_intent(&command.name, command.intent.into())?;
            write_line(out, &identifier.to_delimited_string(delimiter))?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Suite And Validation Commands
// ============================================================================

/// Dispatches suite subcommands.
fn command_suite(
    command: &SuiteCommand,
    root: Option<&Path>,
    environment: &Environment,
    out: &mut dyn Write,
) -> CliResult<ExitCode> {
    let context = open_context(root, environment)?;
    match command {
        SuiteCommand::List => {
            let keys = context.list_expectation_suite_keys()?;
            if keys.is_empty() {
                write_line(out, &t!("suite.list.none"))?;
            }
            for key in keys {
                write_line(out, &key.to_string())?;
            }
        }
        SuiteCommand::Create(command) => {
            let suite = context.create_expectation_suite(
                command.data_asset_name.as_str(),
                &command.suite,
                command.overwrite,
            )?;
            write_line(out, &t!("suite.create.ok", identifier = suite.identifier()))?;
        }
        SuiteCommand::Show(command) => {
            let suite =
                context.get_expectation_suite(command.data_asset_name.as_str(), &command.suite)?;
            write_json(out, &suite)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Dispatches validation subcommands.
fn command_validation(
    command: &ValidationCommand,
    root: Option<&Path>,
    environment: &Environment,
    out: &mut dyn Write,
) -> CliResult<ExitCode> {
    let context = open_context(root, environment)?;
    match command {
        ValidationCommand::List => {
            let keys = context.list_validation_result_keys()?;
            if keys.is_empty() {
                write_line(out, &t!("validation.list.none"))?;
            }
            for key in keys {
                write_line(out, &key.to_string())?;
            }
        }
        ValidationCommand::Get(command) => {
            let run_id = command.run_id.as_deref().map(RunId::new);
            let result = context.get_validation_result(
                command.data_asset_name.as_str(),
                &command.suite,
                run_id.as_ref(),
                command.failed_only,
            )?;
            write_json(out, &result)?;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes `compile`.
fn command_compile(
    root: Option<&Path>,
    environment: &Environment,
    out: &mut dyn Write,
) -> CliResult<ExitCode> {
    let mut context = open_context(root, environment)?;
    let compiled = context.compile()?;
    write_line(
        out,
        &t!(
            "compile.summary",
            parameters = compiled.raw.len(),
            assets = compiled.data_assets.len()
        ),
    )?;
    for urn in &compiled.raw {
        write_line(out, &t!("compile.entry", urn = urn))?;
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to `out`.
fn write_line(out: &mut dyn Write, message: &str) -> CliResult<()> {
    writeln!(out, "{message}")
        .map_err(|err| CliError::new(t!("output.write_failed", stream = "stdout", error = err)))
}

/// Writes canonical JSON followed by a newline.
fn write_json<T: Serialize>(out: &mut dyn Write, value: &T) -> CliResult<()> {
    let mut bytes =
        serde_jcs::to_vec(value).map_err(|err| CliError::new(t!("json.failed", error = err)))?;
    bytes.push(b'\n');
    out.write_all(&bytes)
        .map_err(|err| CliError::new(t!("output.write_failed", stream = "stdout", error = err)))
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
