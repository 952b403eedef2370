//! CLI entry point for the catalog browser.

use anyhow::Result;
use clap::Parser;
use tracing::debug;

mod app_config;
mod cli;
mod commands;
mod output;

use app_config::{EffectiveConfig, VerbositySetting, load_default_file_config};
use cli::{Cli, Command, ConfigCommand};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let cli = Cli::parse();

    let loaded = load_default_file_config()?;
    let effective = EffectiveConfig::resolve(&cli, loaded.config.as_ref());

    init_tracing(&cli, effective.verbosity);
    debug!(?cli, "CLI arguments parsed");
    debug!(
        base_url = %effective.catalog.base_url,
        subject = %effective.subject,
        config_loaded = loaded.loaded_from_file,
        "Effective configuration"
    );

    match &cli.command {
        Command::List(args) => commands::run_list_command(args, &effective).await,
        Command::Show { id } => commands::run_show_command(id, &effective).await,
        Command::Open { route } => commands::run_open_command(route, &effective).await,
        Command::Config {
            command: ConfigCommand::Show,
        } => commands::run_config_show_command(&loaded, &effective),
    }
}

/// Installs the stderr subscriber.
///
/// Priority: `RUST_LOG` > `--quiet` > `-v`/`-vv` > config `verbosity` > info.
fn init_tracing(cli: &Cli, config_verbosity: VerbositySetting) {
    let default_level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => config_verbosity.log_level(),
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
