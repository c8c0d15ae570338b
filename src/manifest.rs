//! Reading and writing the `logical name -> output path` manifest.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default manifest file name written next to the emitted artifacts.
pub const DEFAULT_MANIFEST_FILE: &str = "manifest.json";

/// Flat mapping from requested names to emitted paths, serialised as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetManifest {
  entries: BTreeMap<String, String>,
}

impl AssetManifest {
  /// Empty manifest.
  pub fn new() -> Self {
    Self::default()
  }

  /// Associate `logical_name` with `output_path`, replacing any earlier entry.
  pub fn insert(&mut self, logical_name: impl Into<String>, output_path: impl Into<String>) {
    self.entries.insert(logical_name.into(), output_path.into());
  }

  /// Output path registered for `logical_name`.
  pub fn get(&self, logical_name: &str) -> Option<&str> {
    self.entries.get(logical_name).map(String::as_str)
  }

  /// Number of entries.
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// True when the manifest has no entries.
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Entries in logical name order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self
      .entries
      .iter()
      .map(|(key, value)| (key.as_str(), value.as_str()))
  }

  /// Write the manifest as pretty JSON, creating parent directories.
  pub fn write(&self, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent)
        .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(self).context("failed to serialise manifest")?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
  }
}

/// Load a manifest from disk.
pub fn load_manifest(path: &Path) -> Result<AssetManifest> {
  let content = fs::read_to_string(path)
    .with_context(|| format!("manifest not found at {}", path.display()))?;
  let manifest: AssetManifest =
    serde_json::from_str(&content).context("failed to parse asset manifest JSON")?;
  Ok(manifest)
}
