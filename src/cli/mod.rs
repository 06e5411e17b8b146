//! CLI module - Command-line interface for coinshop
//!
//! This module provides a structured CLI using clap for argument parsing.

use clap::{Parser, Subcommand};

/// coinshop - virtual coin economy backend
#[derive(Parser)]
#[command(name = "coinshop")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP API (default)
    #[command(alias = "daemon")]
    Serve,

    /// Create default config file
    Init,

    /// Apply migrations and seed the catalog, then exit
    Seed,
}

impl Cli {
    #[must_use]
    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Serve)
    }
}
