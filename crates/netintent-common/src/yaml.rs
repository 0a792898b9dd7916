//! YAML parsing utilities using yaml-rust2
//!
//! Converts YAML documents into `serde_json::Value` trees so rendered
//! manifests can be compared against their structured form.

use serde_json::{Map, Number, Value};
use yaml_rust2::{Yaml, YamlLoader};

/// Error type for YAML parsing
#[derive(Debug, Clone)]
pub struct YamlError(String);

impl std::fmt::Display for YamlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "yaml error: {}", self.0)
    }
}

impl std::error::Error for YamlError {}

impl From<YamlError> for crate::Error {
    fn from(err: YamlError) -> Self {
        crate::Error::serialization(err.to_string())
    }
}

/// Parse a multi-document YAML string into a Vec of serde_json::Values.
///
/// Each YAML document separated by `---` becomes a separate Value. Comment
/// lines are dropped by the parser.
pub fn parse_yaml_multi(input: &str) -> Result<Vec<Value>, YamlError> {
    let docs = YamlLoader::load_from_str(input).map_err(|e| YamlError(e.to_string()))?;
    docs.into_iter().map(yaml_to_json).collect()
}

fn yaml_to_json(yaml: Yaml) -> Result<Value, YamlError> {
    match yaml {
        Yaml::Null => Ok(Value::Null),
        Yaml::Boolean(b) => Ok(Value::Bool(b)),
        Yaml::Integer(i) => Ok(Value::Number(i.into())),
        // JSON has no NaN or infinity
        Yaml::Real(s) if is_yaml_special_float(&s) => Ok(Value::Null),
        Yaml::Real(s) => {
            let f: f64 = s
                .parse()
                .map_err(|e: std::num::ParseFloatError| YamlError(e.to_string()))?;
            // Plain `nan`/`inf` are strings to serde_yaml, which leaves them unquoted
            Ok(Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or(Value::String(s)))
        }
        Yaml::String(s) => Ok(Value::String(s)),
        Yaml::Array(arr) => arr
            .into_iter()
            .map(yaml_to_json)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Yaml::Hash(map) => map
            .into_iter()
            .map(|(k, v)| {
                let key = match k {
                    Yaml::String(s) => s,
                    Yaml::Integer(i) => i.to_string(),
                    Yaml::Boolean(b) => b.to_string(),
                    _ => return Err(YamlError("unsupported YAML key type".to_string())),
                };
                yaml_to_json(v).map(|v| (key, v))
            })
            .collect::<Result<Map<String, Value>, _>>()
            .map(Value::Object),
        Yaml::Alias(_) => Err(YamlError("YAML aliases not supported".to_string())),
        Yaml::BadValue => Err(YamlError("bad YAML value".to_string())),
    }
}

/// YAML 1.2 spellings of NaN and infinity (`.nan`, `.inf`, `-.inf`, ...)
fn is_yaml_special_float(s: &str) -> bool {
    let s = s.strip_prefix(&['+', '-'][..]).unwrap_or(s);
    matches!(s, ".nan" | ".NaN" | ".NAN" | ".inf" | ".Inf" | ".INF")
}
