//! Rule engine CLI.
//!
//! `engine <INITIAL_STATE> <RULES>` applies the rules to the initial state
//! until it stops changing and prints the final state as JSON.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::Parser;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use engine::core::fixpoint::PassLimitExceeded;
use engine::exit_codes;
use engine::io::config::{DEFAULT_CONFIG_FILE, EngineConfig, load_config};
use engine::logging;
use engine::run::run_files;

const USAGE_ERROR: &str =
    "Please pass in the initial state file, then the rules file as the arguments.";

#[derive(Parser, Debug)]
#[command(
    name = "engine",
    version,
    about = "Apply condition/action rules to a key/value state until it reaches a fixed point"
)]
struct Cli {
    /// Initial state file: JSON array of `{"Key", "Value"}` records.
    initial_state: PathBuf,
    /// Rules file: JSON array of `{"Criteria", "Actions"}` records.
    rules: PathBuf,
    /// Config file (TOML). Defaults to `engine.toml` in the working directory if present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Fail instead of running more than this many passes.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    max_passes: Option<u32>,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            ) {
                err.exit();
            }
            if is_argument_count_error(&err) {
                println!("[Error] {USAGE_ERROR}");
                println!("{}", err.render());
            } else {
                println!("[Error] {}", err.to_string().trim_end());
            }
            std::process::exit(exit_codes::INVALID);
        }
    };

    logging::init();

    match run(&cli) {
        Ok(output) => println!("{output}"),
        Err(err) => {
            println!("[Error] {:#}", err);
            let code = if err.downcast_ref::<PassLimitExceeded>().is_some() {
                exit_codes::NOT_CONVERGED
            } else {
                exit_codes::INVALID
            };
            std::process::exit(code);
        }
    }
}

/// Too few positionals, or an extra one; unknown flags and bad values don't count.
fn is_argument_count_error(err: &clap::Error) -> bool {
    match err.kind() {
        ErrorKind::MissingRequiredArgument => true,
        ErrorKind::UnknownArgument => matches!(
            err.get(ContextKind::InvalidArg),
            Some(ContextValue::String(arg)) if !arg.starts_with('-')
        ),
        _ => false,
    }
}

fn run(cli: &Cli) -> Result<String> {
    let config = resolve_config(cli)?;
    let outcome = run_files(&cli.initial_state, &cli.rules, &config)?;
    Ok(outcome.output)
}

/// Explicit `--config` must exist; the default file is optional.
/// `--max-passes` overrides the file.
fn resolve_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            if !path.is_file() {
                bail!("config file {} does not exist", path.display());
            }
            load_config(path)?
        }
        None => load_config(Path::new(DEFAULT_CONFIG_FILE))?,
    };
    if let Some(max_passes) = cli.max_passes {
        config.max_passes = Some(max_passes);
    }
    config.validate()?;
    Ok(config)
}
