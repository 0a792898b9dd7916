//! CLI commands

use std::io::Read;
use std::path::Path;

use netintent_compiler::IntentSpec;
use tracing::debug;

use crate::Result;

pub mod generate;
pub mod validate;

/// Path argument meaning "read from stdin"
pub const STDIN_PATH: &str = "-";

/// Read and parse an intent document.
///
/// `.json` files are parsed as JSON; anything else, stdin included, as YAML
/// (which also accepts JSON).
pub fn read_intent(path: &str) -> Result<IntentSpec> {
    debug!(path, "reading intent");
    let content = if path == STDIN_PATH {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };
    parse_intent(&content, is_json_path(path))
}

fn is_json_path(path: &str) -> bool {
    Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Parse an intent document from text
pub fn parse_intent(content: &str, json: bool) -> Result<IntentSpec> {
    if json {
        Ok(serde_json::from_str(content)?)
    } else {
        Ok(serde_yaml::from_str(content)?)
    }
}
