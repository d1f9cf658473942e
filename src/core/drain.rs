//! Reading every element of a source into memory.
//!
//! These helpers are meant for tests and debugging: the whole source is
//! materialized in a `Vec`, so they must not be pointed at unbounded or
//! production-sized inputs.

use crate::core::factory::SourceFactory;
use crate::error::{Result, SourceError};
use crate::sources::{Source, SourceIterator};
use crate::spec::SourceSpec;
use std::io;

/// Owns an acquired iterator and releases it exactly once.
///
/// Call [`close`](Self::close) on the success path to observe release
/// failures; on any other exit path the iterator is closed on drop and a
/// release failure is only logged.
struct ScopedIterator<'a, T> {
    inner: Box<dyn SourceIterator<T> + 'a>,
    source_name: String,
    closed: bool,
}

impl<'a, T> ScopedIterator<'a, T> {
    fn new(inner: Box<dyn SourceIterator<T> + 'a>, source_name: String) -> Self {
        Self {
            inner,
            source_name,
            closed: false,
        }
    }

    fn has_next(&mut self) -> io::Result<bool> {
        self.inner.has_next()
    }

    fn next_element(&mut self) -> io::Result<T> {
        self.inner.next()
    }

    fn close(mut self) -> io::Result<()> {
        self.closed = true;
        self.inner.close()
    }
}

impl<T> Drop for ScopedIterator<'_, T> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(e) = self.inner.close() {
            tracing::warn!(source = %self.source_name, error = %e, "failed to close source iterator");
        }
    }
}

/// Reads all elements from the given source.
///
/// The iterator is acquired once and released exactly once, whether the
/// drain completes or fails part way.
///
/// # Errors
///
/// Any I/O failure while acquiring, advancing, or releasing the iterator is
/// returned as [`SourceError::ReadFailed`] naming the source, with the
/// original error as its cause. Elements read before the failure are
/// discarded.
///
/// # Examples
///
/// ```rust
/// use source_spec::prelude::*;
///
/// let source = InMemorySource::new(vec!["a", "b", "c"]);
/// assert_eq!(drain_all(&source).unwrap(), vec!["a", "b", "c"]);
/// ```
pub fn drain_all<T, S>(source: &S) -> Result<Vec<T>>
where
    S: Source<T> + ?Sized,
{
    let name = source.name();
    tracing::debug!(source = %name, "draining source");

    let read = || -> io::Result<Vec<T>> {
        let mut it = ScopedIterator::new(source.iterator()?, name.clone());
        let mut elems = Vec::new();
        while it.has_next()? {
            elems.push(it.next_element()?);
        }
        it.close()?;
        Ok(elems)
    };

    match read() {
        Ok(elems) => {
            tracing::debug!(source = %name, count = elems.len(), "drained source");
            Ok(elems)
        }
        Err(e) => Err(SourceError::read_failed(name, e)),
    }
}

/// Creates a source from `spec` with `factory` and reads all elements from it.
///
/// The factory is called without an execution context or pipeline options.
///
/// # Errors
///
/// Any failure to build or drain the source is returned as
/// [`SourceError::ReadFailed`] describing the spec, with the original error as
/// its cause.
pub fn drain_spec<T, F>(factory: &F, spec: &SourceSpec) -> Result<Vec<T>>
where
    F: SourceFactory<T> + ?Sized,
{
    factory
        .create(None, spec, None)
        .and_then(|source| drain_all(source.as_ref()))
        .map_err(|e| SourceError::read_failed(spec.to_string(), e))
}
