//! Pull-based source traits.

use std::io;

/// A pull-based source of elements.
///
/// Implement this trait to expose a custom reader (files, in-memory fixtures,
/// remote shards) to the drain helpers and the source registry.
pub trait Source<T> {
    /// Acquire a fresh iterator over the elements of this source.
    ///
    /// The caller owns the iterator and must [`close`](SourceIterator::close)
    /// it when done; [`drain_all`](crate::core::drain_all) does this on every
    /// exit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying resource cannot be opened.
    fn iterator(&self) -> io::Result<Box<dyn SourceIterator<T> + '_>>;

    /// Get a human-readable name for this source (for logging/debugging).
    fn name(&self) -> String;
}

/// Cursor over the elements of a [`Source`].
pub trait SourceIterator<T> {
    /// Returns true if another element is available.
    ///
    /// Calling this repeatedly without calling [`next`](Self::next) must not
    /// skip elements.
    fn has_next(&mut self) -> io::Result<bool>;

    /// Returns the next element.
    ///
    /// # Errors
    ///
    /// Returns [`io::ErrorKind::UnexpectedEof`] if the iterator is exhausted,
    /// or any error raised by the underlying reader.
    fn next(&mut self) -> io::Result<T>;

    /// Release the resources held by this iterator.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<T, S: Source<T> + ?Sized> Source<T> for Box<S> {
    fn iterator(&self) -> io::Result<Box<dyn SourceIterator<T> + '_>> {
        (**self).iterator()
    }

    fn name(&self) -> String {
        (**self).name()
    }
}

/// Error returned by [`SourceIterator::next`] past the last element.
pub(crate) fn exhausted() -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, "no more elements in source")
}
