//! Loads the optional attributes file handed to asciidoctor as `-a key=value` flags.
//!
//! The file is a flat YAML mapping:
//!
//! ```yaml
//! ---
//! product-title: OpenShift Container Platform
//! product-version: 4.16
//! ```
//!
//! Entry order is preserved because it becomes the literal flag order on the
//! command line.

use serde_yaml::Value;
use std::fs;
use std::path::Path;
use tracing::{debug, error, info};

use crate::error::ConvertError;

/// Ordered `(key, value)` pairs passed to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSet {
    pairs: Vec<(String, String)>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Flatten into `["-a", "k1=v1", "-a", "k2=v2", ...]`.
    pub fn to_flags(&self) -> Vec<String> {
        self.pairs
            .iter()
            .flat_map(|(k, v)| ["-a".to_string(), format!("{k}={v}")])
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Load attributes from `path`; no path means no attributes.
pub fn load_attributes(path: Option<&Path>) -> Result<AttributeSet, ConvertError> {
    let Some(path) = path else {
        debug!("No attributes file given");
        return Ok(AttributeSet::new());
    };
    info!(attributes_path = %path.display(), "Loading attributes file");

    let content = fs::read_to_string(path).map_err(|source| {
        error!(error = %source, attributes_path = %path.display(), "Failed to read attributes file");
        ConvertError::ConfigRead {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let attributes = parse_attributes(&content).map_err(|message| {
        error!(error = %message, attributes_path = %path.display(), "Failed to parse attributes file");
        ConvertError::ConfigParse {
            path: path.to_path_buf(),
            message,
        }
    })?;

    info!(count = attributes.len(), "Attributes loaded");
    Ok(attributes)
}

/// Parse the YAML text of an attributes file.
pub fn parse_attributes(content: &str) -> Result<AttributeSet, String> {
    if is_blank_yaml(content) {
        return Ok(AttributeSet::new());
    }
    let document: Value = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
    match document {
        Value::Null => Ok(AttributeSet::new()),
        Value::Mapping(mapping) => Ok(mapping
            .iter()
            .map(|(key, value)| (scalar_to_string(key), scalar_to_string(value)))
            .collect()),
        other => Err(format!(
            "expected a mapping of attribute names to values, found {}",
            kind_of(&other)
        )),
    }
}

/// True when `content` holds no YAML nodes at all (only markers, comments, whitespace).
pub(crate) fn is_blank_yaml(content: &str) -> bool {
    content.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#') || line == "---" || line == "..."
    })
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
        nested @ (Value::Sequence(_) | Value::Mapping(_)) => serde_yaml::to_string(nested)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
