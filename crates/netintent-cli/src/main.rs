//! netintent CLI
//!
//! Compiles communication intents into Kubernetes NetworkPolicies.

use clap::Parser;

use netintent_cli::config::load_config;
use netintent_cli::{Cli, Result};
use netintent_common::telemetry::{init_logging, LoggingConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config()?;

    init_logging(LoggingConfig {
        format: config.log_format,
        ..Default::default()
    })?;

    cli.run(&config)
}
