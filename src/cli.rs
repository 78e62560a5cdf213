//! Command-line interface definition for Memkeep
//!
//! This module defines the CLI structure using clap's derive API.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Memkeep - session memory MCP server
///
/// Persists conversation transcripts keyed by (user, session) and serves
/// them back through a single session_memory tool with save, load, and
/// search actions.
#[derive(Parser, Debug, Clone)]
#[command(name = "memkeep")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory holding session files (overrides the config file)
    #[arg(long, env = "MEMKEEP_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Memkeep
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Serve the session_memory tool over stdio
    Serve,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
