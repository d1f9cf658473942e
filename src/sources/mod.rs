//! Pull-based source abstractions and built-in implementations.

mod in_memory;
mod source;
mod text;

pub use in_memory::{IN_MEMORY_SOURCE_KIND, InMemorySource};
pub use source::{Source, SourceIterator};
pub use text::{TEXT_SOURCE_KIND, TextSource};
