//! Command-line entry: `tablesnap_cli <backup|restore|version|help> [ENV] [options]`.

pub mod output;

use std::{env, path::PathBuf};

use strsim::levenshtein;
use tablesnap_config::{resolve_environment, Config, ConfigManager};
use tracing::error;

use crate::{
    backup::run_backup,
    errors::{Result, SnapError},
    restore::run_restore,
    utils::{build_info, init_logging, LogSettings},
};

/// Overrides the directory log files are written to.
pub const LOG_DIR_VAR: &str = "TABLESNAP_LOG_DIR";
const DEFAULT_LOG_DIR: &str = ".";
const COMMANDS: [&str; 4] = ["backup", "restore", "version", "help"];

const USAGE: &str = "\
Usage: tablesnap_cli <command> [ENV] [options]

Commands:
  backup     Save every table to <output.dir>, one artifact per table
  restore    Replace table contents from the artifacts in <src.dir>
  version    Print build information
  help       Show this message

Options:
  --env <ENV>          Environment name (default: $TABLESNAP_ENV or `local`)
  --config-dir <DIR>   Directory holding config_<ENV>.json
  --log-dir <DIR>      Directory for log files (default: $TABLESNAP_LOG_DIR or .)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Backup,
    Restore,
    Version,
    Help,
}

impl Command {
    fn name(self) -> &'static str {
        match self {
            Command::Backup => "backup",
            Command::Restore => "restore",
            Command::Version => "version",
            Command::Help => "help",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub environment: Option<String>,
    pub config_dir: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: Command,
    pub options: RunOptions,
}

pub fn run_cli() -> Result<()> {
    run_with_args(env::args().skip(1).collect())
}

pub fn run_with_args(args: Vec<String>) -> Result<()> {
    let invocation = parse_args(&args)?;
    match invocation.command {
        Command::Help => {
            println!("{USAGE}");
            Ok(())
        }
        Command::Version => {
            print_version();
            Ok(())
        }
        Command::Backup | Command::Restore => execute(invocation),
    }
}

pub fn parse_args(args: &[String]) -> Result<Invocation> {
    let mut iter = args.iter();
    let command = match iter.next().map(String::as_str) {
        None | Some("help") | Some("--help") | Some("-h") => Command::Help,
        Some("version") | Some("--version") | Some("-V") => Command::Version,
        Some("backup") => Command::Backup,
        Some("restore") => Command::Restore,
        Some(other) => return Err(SnapError::Input(unknown_command(other))),
    };

    let mut options = RunOptions::default();
    let mut positional: Option<String> = None;
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--env" => options.environment = Some(flag_value(arg, iter.next())?),
            "--config-dir" => options.config_dir = Some(flag_value(arg, iter.next())?.into()),
            "--log-dir" => options.log_dir = Some(flag_value(arg, iter.next())?.into()),
            flag if flag.starts_with("--") => {
                return Err(SnapError::Input(format!("unknown option `{flag}`")));
            }
            value if positional.is_none() => positional = Some(value.to_string()),
            value => {
                return Err(SnapError::Input(format!("unexpected argument `{value}`")));
            }
        }
    }
    if options.environment.is_none() {
        options.environment = positional;
    }
    Ok(Invocation { command, options })
}

fn flag_value(flag: &str, value: Option<&String>) -> Result<String> {
    value
        .filter(|value| !value.starts_with("--"))
        .cloned()
        .ok_or_else(|| SnapError::Input(format!("`{flag}` needs a value")))
}

fn unknown_command(input: &str) -> String {
    let best = COMMANDS
        .iter()
        .map(|command| (levenshtein(command, input), *command))
        .min_by_key(|(distance, _)| *distance);
    match best {
        Some((distance, command)) if distance <= 3 => {
            format!("unknown command `{input}`. Did you mean `{command}`?")
        }
        _ => format!("unknown command `{input}`. Run `help` for usage."),
    }
}

fn execute(invocation: Invocation) -> Result<()> {
    let Invocation { command, options } = invocation;
    let environment = resolve_environment(options.environment.as_deref());
    let log_dir = options
        .log_dir
        .or_else(|| env::var_os(LOG_DIR_VAR).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR));
    let log_file = init_logging(&LogSettings::new(log_dir, command.name(), &environment))?;

    let config = load_config(&environment, options.config_dir)?;
    let summary = match command {
        Command::Backup => run_backup(&config, &environment),
        _ => run_restore(&config, &environment),
    }
    .map_err(|err| {
        error!("{} failed: {}", command.name(), err);
        err
    })?;

    let title = match command {
        Command::Backup => format!("Backup ({environment})"),
        _ => format!("Restore ({environment})"),
    };
    output::print_summary(&title, &summary);
    output::info(format!("Log written to {}", log_file.display()));
    Ok(())
}

fn load_config(environment: &str, dir: Option<PathBuf>) -> Result<Config> {
    let manager = ConfigManager::with_default_search(environment, dir);
    manager.load().map_err(|err| {
        error!("Error loading configuration: {}", err);
        SnapError::from(err)
    })
}

fn print_version() {
    let meta = build_info::current();
    output::section(meta);
    for (label, value) in meta.details() {
        output::info(format!("{label:<9}{value}"));
    }
}
