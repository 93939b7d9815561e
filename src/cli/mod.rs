//! Command-line interface, parsed with clap.

use clap::{Parser, Subcommand};

/// Geoportal - administration backend for a municipal spatial data portal
#[derive(Parser)]
#[command(name = "geoportal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API (default)
    #[command(alias = "daemon")]
    Serve,

    /// Load and validate the configuration, then exit
    #[command(alias = "check")]
    CheckConfig,

    /// Print an Argon2id hash for a password using the configured cost parameters
    HashPassword {
        /// Password to hash
        password: String,
    },
}
