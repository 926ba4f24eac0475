use clap::Parser;
use eyre::Result;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod context;
mod output;

use cli::{Cli, Command};
use context::AppContext;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    let config = config::resolve(&cli)?;
    let command = match cli.command {
        Command::Config(command) => {
            return commands::config::run(&config, cli.config.as_deref(), command, cli.json);
        }
        other => other,
    };

    let ctx = AppContext::open(config, cli.actor, cli.json)?;
    match command {
        Command::Links(command) => commands::links::run(&ctx, command).await,
        Command::Backup(command) => commands::backup::run(&ctx, command).await,
        Command::Recovery(command) => commands::recovery::run(&ctx, command).await,
        Command::Tasks(command) => commands::tasks::run(&ctx, command),
        Command::Audit(command) => commands::audit::run(&ctx, command),
        Command::Config(_) => Ok(()),
    }
}

/// Logs go to stderr so command output on stdout stays machine-readable.
fn init_tracing(verbose: u8, json: bool) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
