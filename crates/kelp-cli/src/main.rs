//! CLI entrypoint for the kelp parser.

mod cli;
mod commands;
mod config;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, Level};

use cli::{Cli, Command};
use config::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cwd = std::env::current_dir().context("failed to resolve current directory")?;
    let config = Config::load(&cwd, cli.config.as_deref());
    debug!(config = ?config.config_path, mode = ?config.mode, "configuration resolved");

    match cli.command {
        Command::Tree { file, script } => commands::tree(&file, script, &config),
        Command::Check { files, script } => {
            if !commands::check(&files, script, &config)? {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Tokens { file } => commands::tokens(&file),
    }
}
