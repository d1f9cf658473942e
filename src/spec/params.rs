//! Typed view over the parameters of a flattened spec.

use super::SourceSpec;
use crate::error::{Result, SourceError};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

impl SourceSpec {
    /// Build a [`config::Config`] from the flattened parameters of this spec.
    ///
    /// Values keep the `config` crate's lenient coercion, so a parameter
    /// stored as the string `"10"` can be read with `get_int`. Only keys that
    /// are plain `config` paths (dot-separated segments of ASCII letters,
    /// digits and `_`) are part of the view; metadata keys such as
    /// `@type` and keys like `gs://bucket/shard` are left out.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use source_spec::spec::SourceSpec;
    /// use serde_json::json;
    ///
    /// let spec = SourceSpec::from_value(json!({
    ///     "spec": { "@type": "TextSource", "start_offset": "10" }
    /// }))
    /// .unwrap();
    ///
    /// let params = spec.to_config().unwrap();
    /// assert_eq!(params.get_int("start_offset").unwrap(), 10);
    /// ```
    pub fn to_config(&self) -> Result<config::Config> {
        let flat = self.flatten();
        let mut builder = config::Config::builder();

        for (key, value) in flat.spec() {
            if !is_path_key(key) {
                tracing::debug!(key = %key, "skipping parameter that is not a config path");
                continue;
            }
            let value = json_value_to_config_value(value)?;
            builder = builder.set_override(key.as_str(), value).map_err(|e| {
                SourceError::invalid_parameter(key.clone(), e.to_string())
            })?;
        }

        builder
            .build()
            .map_err(|e| SourceError::DeserializationError(format!("Failed to build parameters: {}", e)))
    }

    /// Deserialize the flattened parameters of this spec into `P`.
    ///
    /// Parameters are read straight from the merged mapping, so key case is
    /// preserved (`#[serde(rename_all = "camelCase")]` works) and values are
    /// not coerced: a string `"10"` does not deserialize into an integer.
    pub fn parameters<P>(&self) -> Result<P>
    where
        P: DeserializeOwned,
    {
        let flat = self.flatten();
        serde_json::from_value(JsonValue::Object(flat.spec))
            .map_err(|e| SourceError::DeserializationError(e.to_string()))
    }
}

/// Returns true if `key` can be used as a `config` path expression.
fn is_path_key(key: &str) -> bool {
    !key.is_empty()
        && key.split('.').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

/// Convert a serde_json::Value to a config::Value.
fn json_value_to_config_value(value: &JsonValue) -> Result<config::Value> {
    let kind = match value {
        JsonValue::Null => config::ValueKind::Nil,
        JsonValue::Bool(b) => config::ValueKind::Boolean(*b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                config::ValueKind::I64(i)
            } else if let Some(u) = n.as_u64() {
                config::ValueKind::U64(u)
            } else if let Some(f) = n.as_f64() {
                config::ValueKind::Float(f)
            } else {
                return Err(SourceError::DeserializationError(format!(
                    "Unsupported number type: {}",
                    n
                )));
            }
        }
        JsonValue::String(s) => config::ValueKind::String(s.clone()),
        JsonValue::Array(arr) => {
            let values: Result<Vec<config::Value>> =
                arr.iter().map(json_value_to_config_value).collect();
            config::ValueKind::Array(values?)
        }
        JsonValue::Object(map) => {
            let mut table = HashMap::new();
            for (key, val) in map {
                table.insert(key.clone(), json_value_to_config_value(val)?);
            }
            config::ValueKind::Table(table)
        }
    };
    Ok(config::Value::new(None, kind))
}
