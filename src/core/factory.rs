//! Building sources from their specs.

use crate::error::{Result, SourceError};
use crate::sources::{IN_MEMORY_SOURCE_KIND, InMemorySource, Source, TEXT_SOURCE_KIND, TextSource};
use crate::spec::SourceSpec;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Execution context handed to a factory by a running step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionContext {
    step_name: String,
}

impl ExecutionContext {
    /// Create a context for the named step.
    pub fn new(step_name: impl Into<String>) -> Self {
        Self {
            step_name: step_name.into(),
        }
    }

    /// The name of the step reading the source.
    pub fn step_name(&self) -> &str {
        &self.step_name
    }
}

/// Pipeline-wide options visible to factories.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineOptions {
    values: HashMap<String, Value>,
}

impl PipelineOptions {
    /// Create an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Look up an option.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }
}

/// Trait for components that build sources from specs.
///
/// Either `context` or `options` may be absent; implementations must fall
/// back to their own defaults in that case.
pub trait SourceFactory<T> {
    /// Build a source from `spec`.
    ///
    /// # Errors
    ///
    /// Returns an error if the spec does not describe a source this factory
    /// can build.
    fn create(
        &self,
        context: Option<&ExecutionContext>,
        spec: &SourceSpec,
        options: Option<&PipelineOptions>,
    ) -> Result<Box<dyn Source<T>>>;
}

impl<T, F: SourceFactory<T> + ?Sized> SourceFactory<T> for &F {
    fn create(
        &self,
        context: Option<&ExecutionContext>,
        spec: &SourceSpec,
        options: Option<&PipelineOptions>,
    ) -> Result<Box<dyn Source<T>>> {
        (**self).create(context, spec, options)
    }
}

/// Type alias for source constructors stored in a registry.
type Creator<T> = Arc<
    dyn Fn(Option<&ExecutionContext>, &SourceSpec, Option<&PipelineOptions>) -> Result<Box<dyn Source<T>>>
        + Send
        + Sync,
>;

/// A [`SourceFactory`] dispatching on the spec's `@type` entry.
///
/// The spec is flattened before dispatch, so the kind and every parameter
/// may come from a base layer.
///
/// # Examples
///
/// ```rust
/// use source_spec::prelude::*;
/// use serde_json::json;
///
/// let registry = SourceRegistry::<u32>::new().register_in_memory();
/// let spec = SourceSpec::from_value(json!({
///     "spec": { "@type": "InMemorySource", "elements": [1, 2, 3] }
/// }))
/// .unwrap();
///
/// assert_eq!(drain_spec(&registry, &spec).unwrap(), vec![1, 2, 3]);
/// ```
pub struct SourceRegistry<T> {
    creators: HashMap<String, Creator<T>>,
}

impl<T> SourceRegistry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            creators: HashMap::new(),
        }
    }

    /// Register a constructor for a source kind.
    ///
    /// The constructor receives the flattened spec. Registering a kind twice
    /// replaces the earlier constructor.
    pub fn register<F>(mut self, kind: impl Into<String>, creator: F) -> Self
    where
        F: Fn(Option<&ExecutionContext>, &SourceSpec, Option<&PipelineOptions>) -> Result<Box<dyn Source<T>>>
            + Send
            + Sync
            + 'static,
    {
        let kind = kind.into();
        if self.creators.insert(kind.clone(), Arc::new(creator)).is_some() {
            tracing::debug!(kind = %kind, "replaced source constructor");
        }
        self
    }

    /// Returns true if a constructor is registered for `kind`.
    pub fn contains(&self, kind: &str) -> bool {
        self.creators.contains_key(kind)
    }

    /// Get the registered kinds in sorted order.
    pub fn kinds(&self) -> Vec<String> {
        let mut kinds: Vec<_> = self.creators.keys().cloned().collect();
        kinds.sort();
        kinds
    }
}

impl<T: Clone + DeserializeOwned + 'static> SourceRegistry<T> {
    /// Register [`InMemorySource`] under `InMemorySource`.
    pub fn register_in_memory(self) -> Self {
        self.register(IN_MEMORY_SOURCE_KIND, |_, spec, _| {
            Ok(Box::new(InMemorySource::<T>::from_spec(spec)?) as Box<dyn Source<T>>)
        })
    }
}

impl SourceRegistry<String> {
    /// Register [`TextSource`] under `TextSource`.
    pub fn register_text(self) -> Self {
        self.register(TEXT_SOURCE_KIND, |_, spec, _| {
            Ok(Box::new(TextSource::from_spec(spec)?) as Box<dyn Source<String>>)
        })
    }

    /// Create a registry with every built-in source kind registered.
    pub fn with_builtins() -> Self {
        Self::new().register_in_memory().register_text()
    }
}

impl<T> Default for SourceRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for SourceRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            creators: self.creators.clone(),
        }
    }
}

impl<T> SourceFactory<T> for SourceRegistry<T> {
    fn create(
        &self,
        context: Option<&ExecutionContext>,
        spec: &SourceSpec,
        options: Option<&PipelineOptions>,
    ) -> Result<Box<dyn Source<T>>> {
        let flat = spec.flatten();
        let kind = flat.kind().ok_or(SourceError::MissingSourceKind)?;
        let creator = self
            .creators
            .get(kind)
            .ok_or_else(|| SourceError::UnknownSourceKind(kind.to_string()))?;

        tracing::debug!(
            kind = %kind,
            step = context.map(ExecutionContext::step_name),
            "creating source"
        );

        creator(context, &flat, options)
    }
}
