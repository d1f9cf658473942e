//! Layered source specifications.
//!
//! A [`SourceSpec`] describes a source as an override layer (`spec`) on top of
//! an ordered list of lower-priority layers (`baseSpecs`). Base layers let a
//! service share common parameters between many sources; [`SourceSpec::flatten`]
//! collapses them into a single mapping.

mod file;
mod params;

pub use file::SpecFile;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A single layer of source parameters.
pub type SpecMap = serde_json::Map<String, Value>;

/// Key holding the source kind in a spec layer.
pub const KIND_KEY: &str = "@type";

/// A layered description of a source.
///
/// # Examples
///
/// ```rust
/// use source_spec::spec::SourceSpec;
/// use serde_json::json;
///
/// let spec = SourceSpec::from_value(json!({
///     "spec": { "filename": "input.txt" },
///     "baseSpecs": [{ "@type": "TextSource", "filename": "default.txt" }]
/// }))
/// .unwrap();
///
/// let flat = spec.flatten();
/// assert_eq!(flat.kind(), Some("TextSource"));
/// assert_eq!(flat.get("filename"), Some(&json!("input.txt")));
/// assert!(flat.base_specs().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSpec {
    #[serde(default)]
    spec: SpecMap,
    #[serde(default, skip_serializing_if = "Vec::is_empty", deserialize_with = "nullable_layers")]
    base_specs: Vec<SpecMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    codec: Option<SpecMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    does_not_need_splitting: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<SpecMap>,
}

/// `baseSpecs: null` is treated the same as an absent or empty list.
fn nullable_layers<'de, D>(deserializer: D) -> std::result::Result<Vec<SpecMap>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<SpecMap>>::deserialize(deserializer)?.unwrap_or_default())
}

impl SourceSpec {
    /// Create a spec with only an override layer.
    pub fn new(spec: SpecMap) -> Self {
        Self {
            spec,
            ..Self::default()
        }
    }

    /// Deserialize a spec from a JSON value.
    pub fn from_value(value: Value) -> crate::error::Result<Self> {
        serde_json::from_value(value)
            .map_err(|e| crate::error::SourceError::ParseError(e.to_string()))
    }

    /// Append a base layer.
    ///
    /// Layers added later take precedence over layers added earlier, but
    /// never over the override layer.
    pub fn with_base_spec(mut self, layer: SpecMap) -> Self {
        self.base_specs.push(layer);
        self
    }

    /// Set the element encoding description carried with this spec.
    pub fn with_codec(mut self, codec: SpecMap) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Set the `doesNotNeedSplitting` hint.
    pub fn with_does_not_need_splitting(mut self, value: bool) -> Self {
        self.does_not_need_splitting = Some(value);
        self
    }

    /// Set the source metadata (size estimates, infinite/finite hints).
    pub fn with_metadata(mut self, metadata: SpecMap) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Set a parameter in the override layer.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.spec.insert(key.into(), value.into());
    }

    /// The override layer.
    pub fn spec(&self) -> &SpecMap {
        &self.spec
    }

    /// The base layers, lowest priority first.
    pub fn base_specs(&self) -> &[SpecMap] {
        &self.base_specs
    }

    /// The element encoding description, if any.
    pub fn codec(&self) -> Option<&SpecMap> {
        self.codec.as_ref()
    }

    /// The `doesNotNeedSplitting` hint, if set.
    pub fn does_not_need_splitting(&self) -> Option<bool> {
        self.does_not_need_splitting
    }

    /// The source metadata, if any.
    pub fn metadata(&self) -> Option<&SpecMap> {
        self.metadata.as_ref()
    }

    /// Look up a parameter in the override layer.
    ///
    /// Base layers are not consulted; use [`flatten`](Self::flatten) first to
    /// see inherited values.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.spec.get(key)
    }

    /// The source kind named by the override layer's `@type` entry.
    pub fn kind(&self) -> Option<&str> {
        self.spec.get(KIND_KEY).and_then(Value::as_str)
    }

    /// Returns a copy of this spec with `baseSpecs` merged into `spec`.
    ///
    /// On conflict for a parameter name, values in `spec` override values in
    /// `baseSpecs`, and later entries in `baseSpecs` override earlier ones.
    /// The result always has an empty `baseSpecs`; `self` is left untouched.
    /// All other fields are copied as-is.
    pub fn flatten(&self) -> SourceSpec {
        if self.base_specs.is_empty() {
            return self.clone();
        }

        let mut merged = SpecMap::new();
        for layer in &self.base_specs {
            for (key, value) in layer {
                merged.insert(key.clone(), value.clone());
            }
        }
        for (key, value) in &self.spec {
            merged.insert(key.clone(), value.clone());
        }

        tracing::debug!(
            layers = self.base_specs.len(),
            keys = merged.len(),
            "flattened base specs"
        );

        SourceSpec {
            spec: merged,
            base_specs: Vec::new(),
            codec: self.codec.clone(),
            does_not_need_splitting: self.does_not_need_splitting,
            metadata: self.metadata.clone(),
        }
    }
}

impl From<SpecMap> for SourceSpec {
    fn from(spec: SpecMap) -> Self {
        Self::new(spec)
    }
}

impl fmt::Display for SourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn layer(value: Value) -> SpecMap {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {}", other),
        }
    }

    #[test]
    fn test_flatten_without_base_specs_is_identity() {
        let spec = SourceSpec::new(layer(json!({ "a": 1, "b": "two" })));
        let flat = spec.flatten();
        assert_eq!(flat, spec);
        assert!(flat.base_specs().is_empty());
    }

    #[test]
    fn test_override_layer_wins() {
        let spec = SourceSpec::new(layer(json!({ "a": "top" })))
            .with_base_spec(layer(json!({ "a": "base", "b": "base" })));

        let flat = spec.flatten();
        assert_eq!(flat.get("a"), Some(&json!("top")));
        assert_eq!(flat.get("b"), Some(&json!("base")));
        assert!(flat.base_specs().is_empty());
    }

    #[test]
    fn test_later_base_layer_wins() {
        let spec = SourceSpec::default()
            .with_base_spec(layer(json!({ "a": 1 })))
            .with_base_spec(layer(json!({ "a": 2 })));

        let flat = spec.flatten();
        assert_eq!(flat.get("a"), Some(&json!(2)));
    }

    #[test]
    fn test_flatten_does_not_mutate_input() {
        let spec = SourceSpec::new(layer(json!({ "a": 1 })))
            .with_base_spec(layer(json!({ "b": 2 })));
        let before = spec.clone();

        let _ = spec.flatten();
        assert_eq!(spec, before);
        assert_eq!(spec.base_specs().len(), 1);
    }

    #[test]
    fn test_flatten_keeps_pass_through_fields() {
        let spec = SourceSpec::default()
            .with_base_spec(layer(json!({ "a": 1 })))
            .with_codec(layer(json!({ "@type": "StringUtf8Coder" })))
            .with_does_not_need_splitting(true)
            .with_metadata(layer(json!({ "estimatedSizeBytes": "1024" })));

        let flat = spec.flatten();
        assert_eq!(flat.codec(), spec.codec());
        assert_eq!(flat.does_not_need_splitting(), Some(true));
        assert_eq!(flat.metadata(), spec.metadata());
    }

    #[test]
    fn test_metadata_survives_round_trip_and_description() {
        let spec = SourceSpec::from_value(json!({
            "spec": { "@type": "TextSource" },
            "baseSpecs": [{ "filename": "in.txt" }],
            "metadata": { "infinite": false, "estimatedSizeBytes": "42" }
        }))
        .unwrap();

        let metadata = spec.metadata().expect("metadata should be kept");
        assert_eq!(metadata.get("infinite"), Some(&json!(false)));
        assert!(spec.to_string().contains(r#""metadata":{"estimatedSizeBytes":"42","infinite":false}"#));
        assert_eq!(spec.flatten().metadata(), Some(metadata));
    }

    #[test]
    fn test_set_and_from_map() {
        let mut spec = SourceSpec::from(layer(json!({ "@type": "TextSource" })));
        spec.set("filename", "in.txt");
        spec.set("start_offset", 10);

        assert_eq!(spec.kind(), Some("TextSource"));
        assert_eq!(spec.get("filename"), Some(&json!("in.txt")));
        assert_eq!(spec.get("start_offset"), Some(&json!(10)));
        assert!(spec.base_specs().is_empty());
    }

    #[test]
    fn test_kind() {
        let spec = SourceSpec::default().with_base_spec(layer(json!({ "@type": "TextSource" })));
        assert_eq!(spec.kind(), None);
        assert_eq!(spec.flatten().kind(), Some("TextSource"));
    }

    #[test]
    fn test_deserialize_null_base_specs() {
        let spec = SourceSpec::from_value(json!({ "spec": { "a": 1 }, "baseSpecs": null })).unwrap();
        assert!(spec.base_specs().is_empty());
        assert_eq!(spec.get("a"), Some(&json!(1)));
    }

    #[test]
    fn test_display_is_json() {
        let spec = SourceSpec::new(layer(json!({ "filename": "in.txt" })));
        assert_eq!(spec.to_string(), r#"{"spec":{"filename":"in.txt"}}"#);
    }
}
