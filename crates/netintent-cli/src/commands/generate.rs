//! Generate command

use chrono::{DateTime, Utc};
use clap::Args;
use netintent_compiler::{to_json, to_text, validate, CommunicationIntent, PolicyCompiler};
use serde::Serialize;
use tracing::{info, warn};

use super::read_intent;
use crate::config::{CliConfig, OutputFormat};
use crate::{Error, Result};

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Intent file (JSON or YAML), or `-` for stdin
    pub file: String,

    /// Output format, overrides the config file
    #[arg(long, short, value_enum)]
    pub output: Option<OutputFormat>,

    /// Emit CiliumNetworkPolicies with L7 rules instead of NetworkPolicies
    #[arg(long)]
    pub l7: bool,

    /// Pin the generated-at annotation for reproducible output
    #[arg(long)]
    pub no_timestamps: bool,
}

pub fn run(args: GenerateArgs, config: &CliConfig) -> Result<()> {
    let rendered = generate(&args, config)?;
    print!("{}", rendered);
    if !rendered.ends_with('\n') {
        println!();
    }
    Ok(())
}

/// Validate, compile and render the intent named by `args`
pub fn generate(args: &GenerateArgs, config: &CliConfig) -> Result<String> {
    let spec = read_intent(&args.file)?;

    let result = validate(&spec);
    for warning in &result.warnings {
        warn!(file = %args.file, "{}", warning);
    }
    if !result.valid {
        return Err(Error::Validation {
            errors: result.errors,
        });
    }

    let intent = CommunicationIntent::try_from(spec)?;
    let mut compiler = PolicyCompiler::new(&intent);
    if args.no_timestamps || !config.timestamps {
        compiler = compiler.with_timestamp(pinned_timestamp());
    }

    let format = args.output.unwrap_or(config.output);
    if args.l7 {
        let policies = compiler.compile_l7();
        info!(intent = %intent.name(), count = policies.len(), "generated L7 policies");
        render(&policies, format)
    } else {
        let manifests = compiler.compile().into_manifests();
        render(&manifests, format)
    }
}

/// The UNIX epoch, used when timestamps are disabled
fn pinned_timestamp() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}

fn render<T: Serialize>(manifests: &[T], format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Yaml => to_text(manifests)?,
        OutputFormat::Json => to_json(manifests)?,
    };
    Ok(rendered)
}
