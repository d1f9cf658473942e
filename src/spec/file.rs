//! Source spec documents stored on disk.

use super::SourceSpec;
use crate::error::{Result, SourceError};
use std::fs;
use std::path::{Path, PathBuf};

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
    Toml,
}

/// A source spec document on disk.
///
/// Loads a [`SourceSpec`] from JSON, YAML, or TOML with the format detected
/// from the file extension. The document uses the same field names as the
/// serialized spec: `spec`, `baseSpecs`, `codec`, `doesNotNeedSplitting`.
///
/// # Examples
///
/// ```rust,no_run
/// use source_spec::spec::SpecFile;
///
/// let spec = SpecFile::new("specs/input.json").load().unwrap();
/// println!("{}", spec);
/// ```
#[derive(Debug, Clone)]
pub struct SpecFile {
    path: PathBuf,
}

impl SpecFile {
    /// Create a new spec file reference.
    ///
    /// The format is detected from the file extension:
    /// - `.json` -> JSON
    /// - `.yaml`, `.yml` -> YAML (requires the `yaml` feature)
    /// - `.toml` -> TOML (requires the `toml` feature)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The path of this document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Determine the document format from the file extension.
    fn format(&self) -> Result<Format> {
        let extension = self
            .path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                SourceError::LoadError(format!(
                    "Unable to determine file format for: {}",
                    self.path.display()
                ))
            })?;

        match extension {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            "toml" => Ok(Format::Toml),
            _ => Err(SourceError::LoadError(format!(
                "Unsupported file extension: {}. Supported: .json, .yaml, .yml, .toml",
                extension
            ))),
        }
    }

    /// Read and parse the document.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The extension is not supported, or its format feature is disabled
    /// - The file does not exist or cannot be read
    /// - The contents are not a valid spec document
    pub fn load(&self) -> Result<SourceSpec> {
        let format = self.format()?;

        if !self.path.exists() {
            return Err(SourceError::LoadError(format!(
                "Spec file not found: {}",
                self.path.display()
            )));
        }

        let contents = fs::read_to_string(&self.path)?;
        let spec = parse(format, &contents)?;

        tracing::debug!(
            path = %self.path.display(),
            base_specs = spec.base_specs().len(),
            "loaded source spec"
        );

        Ok(spec)
    }
}

fn parse(format: Format, contents: &str) -> Result<SourceSpec> {
    match format {
        Format::Json => {
            serde_json::from_str(contents).map_err(|e| SourceError::ParseError(e.to_string()))
        }
        Format::Yaml => parse_yaml(contents),
        Format::Toml => parse_toml(contents),
    }
}

#[cfg(feature = "yaml")]
fn parse_yaml(contents: &str) -> Result<SourceSpec> {
    serde_yaml::from_str(contents).map_err(|e| SourceError::ParseError(e.to_string()))
}

#[cfg(not(feature = "yaml"))]
fn parse_yaml(_contents: &str) -> Result<SourceSpec> {
    Err(SourceError::FeatureNotEnabled("yaml"))
}

#[cfg(feature = "toml")]
fn parse_toml(contents: &str) -> Result<SourceSpec> {
    toml::from_str(contents).map_err(|e| SourceError::ParseError(e.to_string()))
}

#[cfg(not(feature = "toml"))]
fn parse_toml(_contents: &str) -> Result<SourceSpec> {
    Err(SourceError::FeatureNotEnabled("toml"))
}
