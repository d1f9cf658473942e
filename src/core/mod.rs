//! Core source operations: building sources from specs and draining them.

mod drain;
mod factory;

pub use drain::{drain_all, drain_spec};
pub use factory::{ExecutionContext, PipelineOptions, SourceFactory, SourceRegistry};
