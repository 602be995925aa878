mod cmd;
mod logging;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::error;

use flatguard_lib::config::{Config, Overrides};
use flatguard_lib::pkg::Scope;

use crate::cmd::{cmd_check, cmd_diff, cmd_outdated, cmd_run};
use crate::output::{OutputFormat, print_error};

/// flatguard - Flatpak updates that wait for consent to new permissions
#[derive(Parser)]
#[command(name = "flatguard")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Path to the config file
  #[arg(long, global = true)]
  config: Option<PathBuf>,

  /// Log at debug level
  #[arg(short = 'v', long, global = true)]
  debug: bool,

  /// Directory for the log file
  #[arg(long, global = true)]
  log_dir: Option<PathBuf>,

  /// Installation to operate on (user, system or all)
  #[arg(long, global = true)]
  scope: Option<Scope>,

  /// Do not send desktop notifications
  #[arg(long, global = true)]
  no_notify: bool,

  /// Skip the outdated running instance check
  #[arg(long, global = true)]
  no_outdated: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Update applications whose permissions are unchanged, hold back the rest
  Run {
    /// Compare and report without updating anything
    #[arg(long)]
    dry_run: bool,

    /// Only consider these application ids
    #[arg(long, value_name = "APP")]
    only: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
  },

  /// Compare one application's installed and remote permissions
  Check {
    /// Application id
    app: String,

    /// Remote to fetch the new manifest from (default: the remote providing the update)
    #[arg(long)]
    origin: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
  },

  /// Compare two manifest files
  Diff {
    /// Manifest of the installed version
    installed: PathBuf,

    /// Manifest of the new version
    remote: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
  },

  /// List running applications that are older than the installed build
  Outdated {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
  },
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let config = match load_config(&cli) {
    Ok(config) => config,
    Err(e) => {
      print_error(&format!("{:#}", e));
      return ExitCode::FAILURE;
    }
  };

  match dispatch(cli.command, &config) {
    Ok(code) => code,
    Err(e) => {
      error!("{:#}", e);
      ExitCode::FAILURE
    }
  }
}

/// Resolve the configuration and start logging.
fn load_config(cli: &Cli) -> Result<Config> {
  let overrides = Overrides {
    no_outdated: cli.no_outdated,
    log_dir: cli.log_dir.clone(),
    debug: cli.debug,
    scope: cli.scope,
    no_notify: cli.no_notify,
  };
  let config = Config::load(cli.config.as_deref())?.with_overrides(overrides);

  logging::init(&config.log_dir, config.debug)?;
  Ok(config)
}

fn dispatch(command: Commands, config: &Config) -> Result<ExitCode> {
  match command {
    Commands::Run { dry_run, only, output } => cmd_run(config, dry_run, only, output).map(|()| ExitCode::SUCCESS),
    Commands::Check { app, origin, output } => cmd_check(config, &app, origin, output),
    Commands::Diff {
      installed,
      remote,
      output,
    } => cmd_diff(config, &installed, &remote, output),
    Commands::Outdated { output } => cmd_outdated(config, output).map(|()| ExitCode::SUCCESS),
  }
}
