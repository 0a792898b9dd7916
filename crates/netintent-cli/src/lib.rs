//! netintent CLI library

pub mod commands;
pub mod config;
pub mod error;

pub use error::{Error, Result};

use clap::{Parser, Subcommand};

use crate::config::CliConfig;

/// netintent - compile service communication intents into NetworkPolicies
#[derive(Parser, Debug)]
#[command(name = "netintent")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile an intent file into policy manifests
    Generate(commands::generate::GenerateArgs),
    /// Check an intent file without generating anything
    Validate(commands::validate::ValidateArgs),
}

impl Cli {
    /// Run the CLI command
    pub fn run(self, config: &CliConfig) -> Result<()> {
        match self.command {
            Commands::Generate(args) => commands::generate::run(args, config),
            Commands::Validate(args) => commands::validate::run(args),
        }
    }
}
