//! Clap derive structures for the `unigate` binary.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// unigate -- block and unblock UniFi clients by name over HTTP
#[derive(Debug, Parser)]
#[command(
    name = "unigate",
    version,
    about = "HTTP middleware to list UniFi clients and block/unblock them by name",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config dir)
    #[arg(long, short = 'c', env = "UNIGATE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log output format
    #[arg(long, env = "UNIGATE_LOG_FORMAT", default_value = "text", global = true)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per event
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP middleware
    Serve(ServeArgs),

    /// Validate the configuration and print the effective settings
    Check,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Listen address (overrides `listen` from config)
    #[arg(long, short = 'l')]
    pub listen: Option<SocketAddr>,
}
