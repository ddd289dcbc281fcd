//! CLI interface for Haven
//!
//! This module provides the command-line interface using clap's derive API.

use clap::Parser;
use std::path::PathBuf;

/// Haven companion backend
///
/// Serves the mood journal, per-companion chat history and the completion proxy
/// over HTTP. All state is held in memory and lost on restart.
#[derive(Parser, Debug)]
#[command(name = "haven")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Specify alternate configuration file
    #[arg(long, value_name = "PATH", env = "HAVEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Listen port (overrides PORT and the config file)
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL")]
    pub log: Option<String>,
}
