//! Command-line interface definition.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use icsproxy_core::{TracingConfig, TracingOutputFormat};
use tracing::Level;

use crate::config::ServerConfig;

/// icsproxy - serve a remote iCalendar feed as JSON events
#[derive(Debug, Parser)]
#[command(name = "icsproxy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v', global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Logging setup for the selected command.
    ///
    /// `serve` logs at info with timestamps; other commands stay quiet unless
    /// `--debug` is given, which also adds source locations.
    pub fn tracing_config(&self) -> TracingConfig {
        match &self.command {
            Command::Serve(args) => {
                let config = TracingConfig::server();
                let config = if args.json_logs {
                    config.with_format(TracingOutputFormat::Json)
                } else {
                    config
                };
                if self.debug {
                    config.with_level(Level::DEBUG)
                } else {
                    config
                }
            }
            _ if self.debug => TracingConfig::cli_debug(),
            _ => TracingConfig::default(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP proxy in the foreground
    Serve(ServeArgs),

    /// Parse a local .ics file and print the events response
    Parse {
        /// File to read, or `-` for stdin
        input: PathBuf,

        /// Only events starting at or after this instant
        #[arg(long)]
        time_min: Option<String>,

        /// Only events starting at or before this instant
        #[arg(long)]
        time_max: Option<String>,

        /// Maximum number of events to print
        #[arg(long)]
        max_results: Option<String>,

        /// Include parse statistics in the output
        #[arg(long)]
        stats: bool,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Flags of `icsproxy serve`. Each one overrides the config file.
#[derive(Debug, Default, Args)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long)]
    pub listen: Option<SocketAddr>,

    /// Calendar URL used when a request has no `ics` parameter
    #[arg(long)]
    pub ics_url: Option<String>,

    /// Result cap when a request has no usable `maxResults`
    #[arg(long)]
    pub default_max_results: Option<usize>,

    /// Longest accepted calendar URL, in characters
    #[arg(long)]
    pub max_url_length: Option<usize>,

    /// User agent sent upstream
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

impl ServeArgs {
    /// Layers these flags over `config`.
    pub fn apply(&self, mut config: ServerConfig) -> ServerConfig {
        if let Some(listen) = self.listen {
            config = config.with_listen(listen);
        }
        if let Some(ref url) = self.ics_url {
            config = config.with_default_ics_url(url);
        }
        if let Some(max) = self.default_max_results {
            config = config.with_default_max_results(max);
        }
        if let Some(max) = self.max_url_length {
            config = config.with_max_url_length(max);
        }
        if let Some(ref user_agent) = self.user_agent {
            config = config.with_user_agent(user_agent);
        }
        config
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Dump,
    /// Print the default configuration file path
    Path,
}
