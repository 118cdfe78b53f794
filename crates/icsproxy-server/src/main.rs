//! icsproxy CLI entry point.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use icsproxy_core::init_tracing;
use icsproxy_server::ServerConfig;
use icsproxy_server::cli::{Cli, Command, ConfigAction};
use icsproxy_server::commands;
use icsproxy_server::commands::parse::ParseOptions;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.tracing_config()) {
        eprintln!("error: failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<ServerConfig> {
    match cli.config {
        Some(ref path) => ServerConfig::load_from(path).context("failed to load configuration"),
        None => ServerConfig::load().context("failed to load configuration"),
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;

    match cli.command {
        Command::Serve(args) => commands::serve::run(args.apply(config)).await,
        Command::Parse {
            input,
            time_min,
            time_max,
            max_results,
            stats,
            pretty,
        } => {
            let options = ParseOptions {
                time_min,
                time_max,
                max_results,
                stats,
                pretty,
            };
            commands::parse::run(&input, &options, config.default_max_results)
        }
        Command::Config { action } => match action {
            ConfigAction::Dump => commands::config::dump(&config),
            ConfigAction::Path => commands::config::path(),
        },
    }
}
