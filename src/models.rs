//! Data structures produced while emitting referenced assets.

use std::path::PathBuf;

use serde::Serialize;

/// A reference that was located on disk and placed into the artifact set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAsset {
  /// Reference as written in the template.
  pub logical_name: String,
  /// File the bytes were read from, below the asset root.
  pub physical_source_path: PathBuf,
  /// Path of the artifact, the reference's directory followed by the interpolated name.
  pub interpolated_output_path: String,
}

/// Outcome of one emission pass over a reference list.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassReport {
  /// Assets emitted during the pass, in reference order.
  pub emitted: Vec<ResolvedAsset>,
  /// References skipped because something already produced them.
  pub skipped: Vec<String>,
  /// References that produced an error record.
  pub failed: Vec<String>,
}

impl PassReport {
  /// True when every reference was either emitted or already handled.
  pub fn is_clean(&self) -> bool {
    self.failed.is_empty()
  }
}
