//! Manifest rendering
//!
//! The structured form is the manifest list as generic JSON trees. The text
//! form is multi-document YAML, one document per manifest in order, and must
//! parse back to exactly the structured form.

use netintent_common::{Error, Result};
use serde::Serialize;
use serde_json::Value;

const DOCUMENT_SEPARATOR: &str = "---\n";

/// Render manifests as generic trees, preserving order
pub fn to_structured<T: Serialize>(manifests: &[T]) -> Result<Vec<Value>> {
    manifests
        .iter()
        .map(|m| serde_json::to_value(m).map_err(Error::from))
        .collect()
}

/// Render manifests as multi-document YAML
pub fn to_text<T: Serialize>(manifests: &[T]) -> Result<String> {
    let documents = manifests
        .iter()
        .map(|m| {
            serde_yaml::to_string(m)
                .map_err(|e| Error::serialization(format!("failed to render YAML: {}", e)))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(documents.join(DOCUMENT_SEPARATOR))
}

/// Render manifests as a pretty-printed JSON array
pub fn to_json<T: Serialize>(manifests: &[T]) -> Result<String> {
    Ok(serde_json::to_string_pretty(manifests)?)
}
