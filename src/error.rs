//! Error taxonomy shared by the locator, the emitter and the plugin entry point.
//!
//! Configuration and scan errors are fatal and abort the pass. [`AssetError`] is the per-asset
//! record collected while emitting; it never aborts processing of the remaining references.

use std::path::PathBuf;

use thiserror::Error;

/// Rejected plugin configuration, raised at construction time.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// A required path option was not provided.
  #[error("missing '{option}' configuration")]
  MissingOption {
    /// Name of the configuration option.
    option: &'static str,
  },
  /// Neither a template path nor a caller supplied locator was configured.
  #[error("missing 'templatePath' or 'assetLocator' configuration")]
  MissingReferenceSource,
  /// A required path option points at nothing.
  #[error("{option} \"{}\" does not exist", path.display())]
  PathNotFound {
    /// Name of the configuration option.
    option: &'static str,
    /// Path that was configured.
    path: PathBuf,
  },
  /// The output name override cannot produce a file extension.
  #[error(
    "invalid 'filename' configuration \"{template}\", the format should end with \".[ext]\" when it is overridden"
  )]
  InvalidFilename {
    /// Rejected template.
    template: String,
  },
  /// A configured pattern failed to compile.
  #[error("invalid {option} pattern \"{pattern}\": {source}")]
  InvalidPattern {
    /// Name of the configuration option.
    option: &'static str,
    /// Pattern source text.
    pattern: String,
    /// Compilation failure.
    source: regex::Error,
  },
  /// The capture group index does not exist in the reference pattern.
  #[error("reference pattern \"{pattern}\" has no capture group {index}")]
  InvalidGroupIndex {
    /// Pattern source text.
    pattern: String,
    /// Requested capture group.
    index: usize,
  },
  /// The configuration file could not be read.
  #[error("failed to read {}: {source}", path.display())]
  Io {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
  /// The configuration file is not valid JSON for the expected shape.
  #[error("failed to parse {}: {source}", path.display())]
  Parse {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    source: serde_json::Error,
  },
}

/// Fatal failure while discovering asset references.
#[derive(Debug, Error)]
pub enum ScanError {
  /// The template search root does not exist.
  #[error("search path \"{}\" does not exist", path.display())]
  RootNotFound {
    /// Configured search root.
    path: PathBuf,
  },
  /// A directory could not be listed or inspected during traversal.
  #[error("{}: failed to read directory, {source}", path.display())]
  Walk {
    /// Directory or entry that failed.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
  /// A matched template file could not be read.
  #[error("{}: failed to read file, {source}", path.display())]
  Read {
    /// Template file that failed.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
  /// A caller-supplied reference source failed.
  #[error("reference source failed: {0}")]
  Source(String),
}

/// Recoverable failure for a single referenced asset.
#[derive(Debug, Error)]
#[error("failed to add asset \"{reference}\", {kind}")]
pub struct AssetError {
  /// Logical reference as written in the template.
  pub reference: String,
  /// What went wrong.
  pub kind: AssetErrorKind,
}

/// Cause attached to an [`AssetError`].
#[derive(Debug, Error)]
pub enum AssetErrorKind {
  /// Nothing exists at the resolved physical path.
  #[error("asset not found at \"{}\"", path.display())]
  NotFound {
    /// Physical path that was probed.
    path: PathBuf,
  },
  /// Reading, naming or writing the asset failed.
  #[error("{source}")]
  Emit {
    /// Underlying cause.
    source: Box<dyn std::error::Error + Send + Sync>,
  },
}

impl AssetError {
  /// Record an asset whose physical file is missing.
  pub fn not_found(reference: impl Into<String>, path: impl Into<PathBuf>) -> Self {
    Self {
      reference: reference.into(),
      kind: AssetErrorKind::NotFound { path: path.into() },
    }
  }

  /// Record an asset that failed somewhere between reading and emitting.
  pub fn emit(
    reference: impl Into<String>,
    source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
  ) -> Self {
    Self {
      reference: reference.into(),
      kind: AssetErrorKind::Emit {
        source: source.into(),
      },
    }
  }

  /// Subject of the record, the logical reference.
  pub fn subject(&self) -> &str {
    &self.reference
  }
}
