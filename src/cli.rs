//! Command-line interface implementation for kiln.
//! Provides argument parsing with clap and the `run` entry point used by `main`.

use clap::{Parser, ValueEnum};
use std::io::Read;
use std::path::PathBuf;

use crate::config::{load_config, parse_assignment, parse_config, ConfigValue, PartialConfig};
use crate::engine::TemplateEngine;
use crate::environment::CommandAction;
use crate::error::{Error, Result};
use crate::prompt::{prompt_missing, DialoguerPrompter, Prompter};
use crate::vcs::{Git2VersionControl, GitCommandVersionControl};

/// Version-control backend used for the initial commit.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum VcsBackend {
    /// Built-in libgit2
    #[default]
    Libgit2,
    /// The `git` executable found on PATH
    Git,
}

/// Command-line arguments structure for kiln.
#[derive(Parser, Debug)]
#[command(author, version, about = "kiln: bootstrap a freshly generated project in place", long_about = None)]
pub struct Args {
    /// Template directory to rewrite in place
    #[arg(value_name = "DIRECTORY", default_value = ".")]
    pub directory: PathBuf,

    /// JSON or YAML file with configuration values
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Set a configuration value, e.g. --set dockerSupport=true (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_set)]
    pub values: Vec<(String, ConfigValue)>,

    /// Read configuration values as JSON from stdin
    #[arg(short, long)]
    pub stdin: bool,

    /// Ask for every known value that was not supplied
    #[arg(short, long)]
    pub interactive: bool,

    /// Version-control backend
    #[arg(long, value_enum, default_value_t = VcsBackend::Libgit2)]
    pub vcs: VcsBackend,

    /// Command run when dockerSupport is enabled (repeatable, runs in order)
    #[arg(long = "setup", value_name = "COMMAND")]
    pub setup_commands: Vec<String>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

fn parse_set(raw: &str) -> std::result::Result<(String, ConfigValue), String> {
    parse_assignment(raw).map_err(|e| e.to_string())
}

/// Parses command line arguments and returns the Args structure.
///
/// Exits through clap's error handling on invalid arguments.
pub fn get_args() -> Args {
    Args::parse()
}

/// Merges the configuration sources, lowest precedence first:
/// config file, stdin, `--set` values, then interactive answers for what is still missing.
pub fn collect_config(
    args: &Args,
    mut stdin: impl Read,
    prompter: &dyn Prompter,
) -> Result<PartialConfig> {
    let mut partial = match &args.config {
        Some(path) => load_config(path)?,
        None => PartialConfig::new(),
    };

    if args.stdin {
        let mut buf = String::new();
        stdin.read_to_string(&mut buf)?;
        partial.extend(parse_config(&buf)?);
    }

    partial.extend(args.values.iter().cloned());

    if args.interactive {
        partial = prompt_missing(prompter, partial)?;
    }
    Ok(partial)
}

/// Builds the engine described by `args` for an already collected configuration.
pub fn build_engine(args: &Args, partial: PartialConfig) -> Result<TemplateEngine> {
    if !args.directory.is_dir() {
        return Err(Error::ConfigError(format!(
            "'{}' is not a directory",
            args.directory.display()
        )));
    }

    let mut engine = TemplateEngine::new(partial).with_root(&args.directory);
    engine = match args.vcs {
        VcsBackend::Libgit2 => engine.with_version_control(Git2VersionControl::new()),
        VcsBackend::Git => engine.with_version_control(GitCommandVersionControl::new()),
    };
    for command in &args.setup_commands {
        engine = engine.with_setup_action(CommandAction::new(command.as_str()));
    }
    Ok(engine)
}

/// Main application logic execution.
///
/// # Flow
/// 1. Collects configuration from file, stdin, flags and prompts
/// 2. Builds the template engine for the target directory
/// 3. Runs the bootstrap
pub fn run(args: Args) -> Result<()> {
    let prompter = DialoguerPrompter::new();
    let partial = collect_config(&args, std::io::stdin(), &prompter)?;
    let mut engine = build_engine(&args, partial)?;

    engine.bootstrap()?;

    println!(
        "Project '{}' has been bootstrapped successfully.",
        engine.config().project_name()
    );
    Ok(())
}
