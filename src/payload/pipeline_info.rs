//! Normalisation of the pipeline information document (tool versions per process).

use std::path::Path;

use serde_json::Value;
use serde_yaml::Value as YamlValue;

use crate::{common::io::read_yaml, err::PayloadError};

use super::schema::Record;

/// Strip the namespace from `key`, keeping what follows the last `:`.
pub fn normalize_key(key: &str) -> &str {
    key.rsplit(':').next().unwrap_or(key)
}

/// Text of a scalar YAML value.
fn scalar_text(value: &YamlValue) -> String {
    match value {
        YamlValue::Null => "None".to_string(),
        YamlValue::Bool(true) => "True".to_string(),
        YamlValue::Bool(false) => "False".to_string(),
        YamlValue::Number(n) => n.to_string(),
        YamlValue::String(s) => s.clone(),
        YamlValue::Tagged(tagged) => scalar_text(&tagged.value),
        YamlValue::Sequence(_) | YamlValue::Mapping(_) => {
            serde_yaml::to_string(value).unwrap_or_default().trim_end().to_string()
        }
    }
}

/// Convert `value` to JSON, turning every leaf into a string.
fn stringify_leaves(value: &YamlValue) -> Value {
    match value {
        YamlValue::Mapping(mapping) => Value::Object(
            mapping
                .iter()
                .map(|(key, value)| (scalar_text(key), stringify_leaves(value)))
                .collect(),
        ),
        YamlValue::Sequence(items) => Value::Array(items.iter().map(stringify_leaves).collect()),
        YamlValue::Tagged(tagged) => stringify_leaves(&tagged.value),
        scalar => Value::String(scalar_text(scalar)),
    }
}

/// Normalise a parsed pipeline information document.
///
/// Top-level keys lose their namespace prefix; when two keys normalise to the same name the
/// later value wins.  An empty document yields an empty mapping.
pub fn normalize(doc: &YamlValue) -> Result<Record, PayloadError> {
    let mapping = match doc {
        YamlValue::Null => return Ok(Record::new()),
        YamlValue::Mapping(mapping) => mapping,
        other => return Err(PayloadError::InvalidPipelineInfo(scalar_text(other))),
    };

    let mut result = Record::new();
    for (key, value) in mapping {
        let key = scalar_text(key);
        result.insert(normalize_key(&key).to_string(), stringify_leaves(value));
    }
    Ok(result)
}

/// Load and normalise the pipeline information YAML file at `path`.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Record, anyhow::Error> {
    tracing::info!("Loading pipeline info from {:?}", path.as_ref());
    let doc: YamlValue = read_yaml(path)?;
    Ok(normalize(&doc)?)
}
