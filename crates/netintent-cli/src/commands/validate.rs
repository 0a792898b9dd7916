//! Validate command

use clap::Args;
use netintent_compiler::{validate, ValidationResult};

use super::read_intent;
use crate::{Error, Result};

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Intent file (JSON or YAML), or `-` for stdin
    pub file: String,
}

pub fn run(args: ValidateArgs) -> Result<()> {
    let result = validate_file(&args.file)?;

    for warning in &result.warnings {
        println!("  warning: {}", warning);
    }
    for error in &result.errors {
        println!("  error: {}", error);
    }

    if !result.valid {
        return Err(Error::Validation {
            errors: result.errors,
        });
    }

    println!("{} is valid", args.file);
    Ok(())
}

/// Validate the intent stored at `path`
pub fn validate_file(path: &str) -> Result<ValidationResult> {
    Ok(validate(&read_intent(path)?))
}
