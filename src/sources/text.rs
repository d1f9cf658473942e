//! Line-oriented text file source.

use super::source::{Source, SourceIterator, exhausted};
use crate::error::{Result, SourceError};
use crate::spec::SourceSpec;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Source kind handled by [`TextSource::from_spec`].
pub const TEXT_SOURCE_KIND: &str = "TextSource";

/// A source yielding the lines of a local text file.
///
/// An optional byte range restricts the source to the lines that *start*
/// inside `[start_offset, end_offset)`. A line straddling `start_offset` is
/// left to whoever reads the preceding range, so adjacent ranges never
/// produce the same line twice.
///
/// # Examples
///
/// ```rust,no_run
/// use source_spec::prelude::*;
///
/// let source = TextSource::new("data/input.txt").with_range(Some(128), None);
/// let lines = drain_all(&source).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct TextSource {
    path: PathBuf,
    start_offset: u64,
    end_offset: Option<u64>,
    strip_trailing_newlines: bool,
}

impl TextSource {
    /// Create a source over the whole file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            start_offset: 0,
            end_offset: None,
            strip_trailing_newlines: true,
        }
    }

    /// Restrict the source to lines starting in `[start, end)`.
    ///
    /// `None` for either bound means the start or end of the file.
    pub fn with_range(mut self, start_offset: Option<u64>, end_offset: Option<u64>) -> Self {
        self.start_offset = start_offset.unwrap_or(0);
        self.end_offset = end_offset;
        self
    }

    /// Whether to drop the trailing `\n` or `\r\n` from each line (default: true).
    pub fn with_strip_trailing_newlines(mut self, strip: bool) -> Self {
        self.strip_trailing_newlines = strip;
        self
    }

    /// The file this source reads.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build a source from a spec.
    ///
    /// Reads `filename` (required), and the optional `start_offset`,
    /// `end_offset` and `strip_trailing_newlines` parameters.
    pub fn from_spec(spec: &SourceSpec) -> Result<Self> {
        let params = spec.to_config()?;

        let filename = params
            .get_string("filename")
            .map_err(|e| SourceError::invalid_parameter("filename", e.to_string()))?;
        let start_offset = optional_offset(&params, "start_offset")?;
        let end_offset = optional_offset(&params, "end_offset")?;
        let strip = match params.get_bool("strip_trailing_newlines") {
            Ok(strip) => strip,
            Err(config::ConfigError::NotFound(_)) => true,
            Err(e) => {
                return Err(SourceError::invalid_parameter(
                    "strip_trailing_newlines",
                    e.to_string(),
                ));
            }
        };

        Ok(Self::new(filename)
            .with_range(start_offset, end_offset)
            .with_strip_trailing_newlines(strip))
    }
}

fn optional_offset(params: &config::Config, name: &str) -> Result<Option<u64>> {
    match params.get_int(name) {
        Ok(value) => u64::try_from(value)
            .map(Some)
            .map_err(|_| SourceError::invalid_parameter(name, "must not be negative")),
        Err(config::ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(SourceError::invalid_parameter(name, e.to_string())),
    }
}

impl Source<String> for TextSource {
    fn iterator(&self) -> io::Result<Box<dyn SourceIterator<String> + '_>> {
        let file = File::open(&self.path)?;
        let mut reader = BufReader::new(file);
        let mut position = self.start_offset;

        if self.start_offset > 0 {
            // Skip the remainder of the line containing start_offset - 1.
            reader.seek(SeekFrom::Start(self.start_offset - 1))?;
            let mut skipped = Vec::new();
            let read = reader.read_until(b'\n', &mut skipped)?;
            position = self.start_offset - 1 + read as u64;
        }

        Ok(Box::new(TextIterator {
            reader: Some(reader),
            position,
            end_offset: self.end_offset,
            strip_trailing_newlines: self.strip_trailing_newlines,
            pending: None,
        }))
    }

    fn name(&self) -> String {
        match (self.start_offset, self.end_offset) {
            (0, None) => format!("text:{}", self.path.display()),
            (start, Some(end)) => format!("text:{}[{}..{}]", self.path.display(), start, end),
            (start, None) => format!("text:{}[{}..]", self.path.display(), start),
        }
    }
}

struct TextIterator {
    reader: Option<BufReader<File>>,
    position: u64,
    end_offset: Option<u64>,
    strip_trailing_newlines: bool,
    pending: Option<String>,
}

impl TextIterator {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        if self.end_offset.is_some_and(|end| self.position >= end) {
            return Ok(None);
        }

        let reader = self
            .reader
            .as_mut()
            .ok_or_else(|| io::Error::other("text source iterator already closed"))?;

        let mut buf = Vec::new();
        let read = reader.read_until(b'\n', &mut buf)?;
        if read == 0 {
            return Ok(None);
        }
        self.position += read as u64;

        if self.strip_trailing_newlines && buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') {
                buf.pop();
            }
        }

        String::from_utf8(buf)
            .map(Some)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl SourceIterator<String> for TextIterator {
    fn has_next(&mut self) -> io::Result<bool> {
        if self.pending.is_none() {
            self.pending = self.read_line()?;
        }
        Ok(self.pending.is_some())
    }

    fn next(&mut self) -> io::Result<String> {
        if !self.has_next()? {
            return Err(exhausted());
        }
        self.pending.take().ok_or_else(exhausted)
    }

    fn close(&mut self) -> io::Result<()> {
        self.reader = None;
        self.pending = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("input.txt");
        fs::write(&path, contents).unwrap();
        path
    }

    fn read_all(source: &TextSource) -> Vec<String> {
        let mut it = source.iterator().unwrap();
        let mut lines = Vec::new();
        while it.has_next().unwrap() {
            lines.push(it.next().unwrap());
        }
        it.close().unwrap();
        lines
    }

    #[test]
    fn test_reads_all_lines() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "alpha\nbeta\r\ngamma");

        let lines = read_all(&TextSource::new(&path));
        assert_eq!(lines, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_keeps_newlines_when_asked() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "alpha\nbeta\n");

        let lines = read_all(&TextSource::new(&path).with_strip_trailing_newlines(false));
        assert_eq!(lines, vec!["alpha\n", "beta\n"]);
    }

    #[test]
    fn test_range_skips_partial_first_line() {
        let dir = TempDir::new().unwrap();
        // Line starts: 0 "aaa", 4 "bbb", 8 "ccc", 12 "ddd"
        let path = write_file(&dir, "aaa\nbbb\nccc\nddd\n");

        let lines = read_all(&TextSource::new(&path).with_range(Some(2), Some(9)));
        assert_eq!(lines, vec!["bbb", "ccc"]);
    }

    #[test]
    fn test_range_keeps_line_starting_at_offset() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "aaa\nbbb\nccc\n");

        let lines = read_all(&TextSource::new(&path).with_range(Some(4), Some(8)));
        assert_eq!(lines, vec!["bbb"]);
    }

    #[test]
    fn test_adjacent_ranges_partition_lines() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "one\ntwo\nthree\nfour\nfive\n");

        let mut lines = read_all(&TextSource::new(&path).with_range(None, Some(10)));
        lines.extend(read_all(&TextSource::new(&path).with_range(Some(10), None)));
        assert_eq!(lines, vec!["one", "two", "three", "four", "five"]);
    }

    #[test]
    fn test_has_next_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "x\ny\n");
        let source = TextSource::new(&path);

        let mut it = source.iterator().unwrap();
        assert!(it.has_next().unwrap());
        assert!(it.has_next().unwrap());
        assert_eq!(it.next().unwrap(), "x");
        assert_eq!(it.next().unwrap(), "y");
        assert!(!it.has_next().unwrap());
        assert_eq!(it.next().unwrap_err().kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_missing_file_fails_on_iterator() {
        let source = TextSource::new("/nonexistent/input.txt");
        assert!(source.iterator().is_err());
    }

    #[test]
    fn test_from_spec() {
        let spec = SourceSpec::from_value(json!({
            "spec": { "filename": "in.txt", "start_offset": "3" },
            "baseSpecs": [{ "@type": "TextSource", "end_offset": 20, "strip_trailing_newlines": false }]
        }))
        .unwrap();

        let source = TextSource::from_spec(&spec).unwrap();
        assert_eq!(source.path(), Path::new("in.txt"));
        assert_eq!(source.start_offset, 3);
        assert_eq!(source.end_offset, Some(20));
        assert!(!source.strip_trailing_newlines);
        assert_eq!(source.name(), "text:in.txt[3..20]");
    }

    #[test]
    fn test_from_spec_requires_filename() {
        let spec = SourceSpec::from_value(json!({ "spec": { "@type": "TextSource" } })).unwrap();
        let result = TextSource::from_spec(&spec);
        assert!(matches!(result, Err(SourceError::InvalidParameter { ref name, .. }) if name == "filename"));
    }
}
