//! # source-spec
//!
//! Layered source specifications and in-memory draining of pull-based sources.
//!
//! ## Overview
//!
//! Batch pipelines describe their inputs as *source specs*: a mapping of
//! parameters (`spec`) layered over shared, lower-priority defaults
//! (`baseSpecs`). `source-spec` provides:
//! - Flattening of layered specs into a single mapping
//! - A pull-based [`Source`](sources::Source) abstraction with scoped iterators
//! - A registry that builds sources from specs by their `@type`
//! - Helpers that drain a source (or a spec) into a `Vec` for tests and debugging
//!
//! ## Quick Start
//!
//! ```rust
//! use source_spec::prelude::*;
//! use serde_json::json;
//!
//! # fn example() -> source_spec::error::Result<()> {
//! let spec = SourceSpec::from_value(json!({
//!     "spec": { "start_index": 1 },
//!     "baseSpecs": [{ "@type": "InMemorySource", "elements": ["a", "b", "c"] }]
//! }))?;
//!
//! let registry = SourceRegistry::<String>::with_builtins();
//! let elements = drain_spec(&registry, &spec)?;
//! assert_eq!(elements, vec!["b", "c"]);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Feature Flags
//!
//! - `yaml` (default): load spec documents from `.yaml` / `.yml` files
//! - `toml` (default): load spec documents from `.toml` files
//! - `all-formats`: both of the above
//!
//! JSON spec documents are always supported.

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod sources;
pub mod spec;

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{
        ExecutionContext, PipelineOptions, SourceFactory, SourceRegistry, drain_all, drain_spec,
    };
    pub use crate::error::{Result, SourceError};
    pub use crate::sources::{InMemorySource, Source, SourceIterator, TextSource};
    pub use crate::spec::{SourceSpec, SpecFile};
}
