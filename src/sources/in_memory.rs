//! Source over elements held in memory.

use super::source::{Source, SourceIterator, exhausted};
use crate::error::{Result, SourceError};
use crate::spec::SourceSpec;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::io;

/// Source kind handled by [`InMemorySource::from_spec`].
pub const IN_MEMORY_SOURCE_KIND: &str = "InMemorySource";

/// A source yielding a fixed list of elements.
///
/// Mostly useful for tests and for specs that embed their data inline.
///
/// # Examples
///
/// ```rust
/// use source_spec::prelude::*;
///
/// let source = InMemorySource::new(vec![1, 2, 3, 4]).with_range(1, 3);
/// assert_eq!(drain_all(&source).unwrap(), vec![2, 3]);
/// ```
#[derive(Debug, Clone)]
pub struct InMemorySource<T> {
    elements: Vec<T>,
    start: usize,
    end: usize,
}

impl<T: Clone> InMemorySource<T> {
    /// Create a source over all of `elements`.
    pub fn new(elements: Vec<T>) -> Self {
        let end = elements.len();
        Self {
            elements,
            start: 0,
            end,
        }
    }

    /// Restrict the source to the half-open index range `start..end`.
    ///
    /// Both bounds are clamped to the number of elements.
    pub fn with_range(mut self, start: usize, end: usize) -> Self {
        self.end = end.min(self.elements.len());
        self.start = start.min(self.end);
        self
    }

    /// Number of elements this source will yield.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if the source yields nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + DeserializeOwned> InMemorySource<T> {
    /// Build a source from a spec.
    ///
    /// Reads `elements` (an array, each entry deserialized into `T`) and the
    /// optional `start_index` and `end_index` parameters.
    pub fn from_spec(spec: &SourceSpec) -> Result<Self> {
        let flat = spec.flatten();

        let elements = match flat.get("elements") {
            Some(Value::Array(values)) => values
                .iter()
                .cloned()
                .map(serde_json::from_value::<T>)
                .collect::<std::result::Result<Vec<T>, _>>()
                .map_err(|e| SourceError::invalid_parameter("elements", e.to_string()))?,
            Some(_) => {
                return Err(SourceError::invalid_parameter(
                    "elements",
                    "expected an array",
                ));
            }
            None => return Err(SourceError::invalid_parameter("elements", "missing")),
        };

        let params = flat.to_config()?;
        let len = elements.len();
        let start = optional_index(&params, "start_index")?.unwrap_or(0);
        let end = optional_index(&params, "end_index")?.unwrap_or(len);

        Ok(Self::new(elements).with_range(start, end))
    }
}

fn optional_index(params: &config::Config, name: &str) -> Result<Option<usize>> {
    match params.get_int(name) {
        Ok(value) => usize::try_from(value)
            .map(Some)
            .map_err(|_| SourceError::invalid_parameter(name, "must not be negative")),
        Err(config::ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(SourceError::invalid_parameter(name, e.to_string())),
    }
}

impl<T: Clone> Source<T> for InMemorySource<T> {
    fn iterator(&self) -> io::Result<Box<dyn SourceIterator<T> + '_>> {
        Ok(Box::new(InMemoryIterator {
            elements: &self.elements[self.start..self.end],
            position: 0,
        }))
    }

    fn name(&self) -> String {
        format!("in-memory[{}..{}]", self.start, self.end)
    }
}

struct InMemoryIterator<'a, T> {
    elements: &'a [T],
    position: usize,
}

impl<T: Clone> SourceIterator<T> for InMemoryIterator<'_, T> {
    fn has_next(&mut self) -> io::Result<bool> {
        Ok(self.position < self.elements.len())
    }

    fn next(&mut self) -> io::Result<T> {
        let element = self.elements.get(self.position).cloned().ok_or_else(exhausted)?;
        self.position += 1;
        Ok(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn collect<T: Clone>(source: &InMemorySource<T>) -> Vec<T> {
        let mut it = source.iterator().unwrap();
        let mut out = Vec::new();
        while it.has_next().unwrap() {
            out.push(it.next().unwrap());
        }
        out
    }

    #[test]
    fn test_yields_all_elements_in_order() {
        let source = InMemorySource::new(vec!["a", "b", "c"]);
        assert_eq!(collect(&source), vec!["a", "b", "c"]);
        assert_eq!(source.len(), 3);
    }

    #[test]
    fn test_range_is_clamped() {
        let source = InMemorySource::new(vec![1, 2, 3]).with_range(2, 10);
        assert_eq!(collect(&source), vec![3]);

        let source = InMemorySource::new(vec![1, 2, 3]).with_range(5, 1);
        assert!(source.is_empty());
        assert_eq!(source.name(), "in-memory[1..1]");
    }

    #[test]
    fn test_next_past_end() {
        let source = InMemorySource::new(Vec::<i32>::new());
        let mut it = source.iterator().unwrap();
        assert!(!it.has_next().unwrap());
        assert_eq!(it.next().unwrap_err().kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_from_spec() {
        let spec = SourceSpec::from_value(json!({
            "spec": { "start_index": "1" },
            "baseSpecs": [{ "@type": "InMemorySource", "elements": [10, 20, 30, 40], "end_index": 3 }]
        }))
        .unwrap();

        let source: InMemorySource<u32> = InMemorySource::from_spec(&spec).unwrap();
        assert_eq!(collect(&source), vec![20, 30]);
    }

    #[test]
    fn test_from_spec_ignores_keys_that_are_not_paths() {
        let spec = SourceSpec::from_value(json!({
            "spec": { "@type": "InMemorySource", "elements": [1, 2], "gs://bucket/shard": true }
        }))
        .unwrap();

        let source: InMemorySource<u32> = InMemorySource::from_spec(&spec).unwrap();
        assert_eq!(source.name(), "in-memory[0..2]");
        assert_eq!(collect(&source), vec![1, 2]);
    }

    #[test]
    fn test_from_spec_rejects_bad_elements() {
        let spec = SourceSpec::from_value(json!({ "spec": { "elements": "nope" } })).unwrap();
        let result = InMemorySource::<u32>::from_spec(&spec);
        assert!(matches!(result, Err(SourceError::InvalidParameter { .. })));

        let spec = SourceSpec::from_value(json!({ "spec": { "elements": ["x"] } })).unwrap();
        let result = InMemorySource::<u32>::from_spec(&spec);
        assert!(matches!(result, Err(SourceError::InvalidParameter { .. })));
    }

    #[test]
    fn test_from_spec_rejects_negative_index() {
        let spec =
            SourceSpec::from_value(json!({ "spec": { "elements": [1], "start_index": -1 } })).unwrap();
        let result = InMemorySource::<u32>::from_spec(&spec);
        assert!(matches!(result, Err(SourceError::InvalidParameter { .. })));
    }
}
