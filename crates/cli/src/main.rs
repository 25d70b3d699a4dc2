//! Atelier command line host
//!
//! Runs creation registry calls against a local sled database, acting as the
//! ledger host that supplies caller identity and block height.

mod commands;
mod settings;

use anyhow::Result;
use atelier_creation_registry::Principal;
use clap::Parser;
use commands::{Commands, Host, Outcome};
use settings::{HostConfig, LogFormat};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "atelier")]
#[command(about = "Atelier creation registry", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Data directory holding the registry database
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Log level filter (overridden by RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Identity acting as the caller of registry operations
    #[arg(long, global = true)]
    caller: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = HostConfig::load(cli.config.as_deref())?;
    apply_overrides(&cli, &mut config);
    init_logging(&config);

    let caller = config.caller.clone().map(Principal::new);
    tracing::debug!(
        db = %config.db_path().display(),
        caller = ?config.caller,
        "Opening registry database"
    );
    let host = Host::open(&config.db_path(), caller)?;

    let outcome = host.execute(cli.command)?;
    println!("{}", serde_json::to_string_pretty(&outcome.to_json())?);

    Ok(match outcome {
        Outcome::Output(_) => ExitCode::SUCCESS,
        Outcome::Rejected(_) => ExitCode::FAILURE,
    })
}

fn apply_overrides(cli: &Cli, config: &mut HostConfig) {
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }

    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone();
    }

    if let Some(caller) = &cli.caller {
        config.caller = Some(caller.clone());
    }
}

fn init_logging(config: &HostConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    match config.log_format {
        LogFormat::Plain => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}
