//! The build host seen from the emitter, plus two ready-made hosts.
//!
//! The host owns the artifact set, the manifest and the diagnostics of a build. The emitter only
//! asks it for a naming convention, hands it bytes and reports failures.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::emit::naming::{self, NamingError};
use crate::error::AssetError;
use crate::manifest::AssetManifest;

/// Collaborator receiving emitted assets.
pub trait BuildHost {
  /// The host's primary output naming template, `None` when it has none configured.
  fn name_template(&self) -> Option<&str>;

  /// Produce the final file name for `resource_path`.
  ///
  /// Hosts with their own naming machinery override this; the default expands the `[token]`
  /// convention of [`naming::interpolate_name`].
  fn interpolate_name(
    &self,
    resource_path: &Path,
    context: &Path,
    template: &str,
    content: &[u8],
  ) -> Result<String, NamingError> {
    naming::interpolate_name(resource_path, Some(context), template, content)
  }

  /// Place `bytes` into the artifact set at `output_path`, recording that it serves the
  /// request `logical_name`.
  fn emit(&mut self, output_path: &str, bytes: Vec<u8>, logical_name: &str) -> io::Result<()>;

  /// Append a non-fatal diagnostic.
  fn record_error(&mut self, error: AssetError);
}

/// Host keeping the artifact set in memory.
#[derive(Debug, Default)]
pub struct MemoryHost {
  name_template: Option<String>,
  artifacts: BTreeMap<String, Vec<u8>>,
  manifest: AssetManifest,
  errors: Vec<AssetError>,
}

impl MemoryHost {
  /// Host with the given primary output template.
  pub fn new(name_template: Option<String>) -> Self {
    Self {
      name_template,
      ..Self::default()
    }
  }

  /// Add an output the host produced on its own, served under its own name.
  pub fn add_output(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
    let name = name.into();
    self.manifest.insert(name.clone(), name.clone());
    self.artifacts.insert(name, bytes);
  }

  /// Every artifact by output path.
  pub fn artifacts(&self) -> &BTreeMap<String, Vec<u8>> {
    &self.artifacts
  }

  /// Bytes emitted at `output_path`.
  pub fn artifact(&self, output_path: &str) -> Option<&[u8]> {
    self.artifacts.get(output_path).map(Vec::as_slice)
  }

  /// Logical name to output path associations.
  pub fn manifest(&self) -> &AssetManifest {
    &self.manifest
  }

  /// Diagnostics collected so far.
  pub fn errors(&self) -> &[AssetError] {
    &self.errors
  }
}

impl BuildHost for MemoryHost {
  fn name_template(&self) -> Option<&str> {
    self.name_template.as_deref()
  }

  fn emit(&mut self, output_path: &str, bytes: Vec<u8>, logical_name: &str) -> io::Result<()> {
    self.artifacts.insert(output_path.to_string(), bytes);
    self.manifest.insert(logical_name, output_path);
    Ok(())
  }

  fn record_error(&mut self, error: AssetError) {
    self.errors.push(error);
  }
}

/// Host writing artifacts below an output directory.
#[derive(Debug)]
pub struct DirectoryHost {
  output_dir: PathBuf,
  name_template: Option<String>,
  manifest: AssetManifest,
  errors: Vec<AssetError>,
}

impl DirectoryHost {
  /// Host writing into `output_dir` with the given primary output template.
  pub fn new(output_dir: impl Into<PathBuf>, name_template: Option<String>) -> Self {
    Self {
      output_dir: output_dir.into(),
      name_template,
      manifest: AssetManifest::new(),
      errors: Vec::new(),
    }
  }

  /// Directory artifacts are written to.
  pub fn output_dir(&self) -> &Path {
    &self.output_dir
  }

  /// Register an output produced outside the emitter so it shows up in the manifest.
  pub fn register_output(&mut self, logical_name: impl Into<String>, output_path: impl Into<String>) {
    self.manifest.insert(logical_name, output_path);
  }

  /// Logical name to output path associations.
  pub fn manifest(&self) -> &AssetManifest {
    &self.manifest
  }

  /// Diagnostics collected so far.
  pub fn errors(&self) -> &[AssetError] {
    &self.errors
  }

  /// Write the manifest as `file_name` inside the output directory.
  pub fn write_manifest(&self, file_name: &str) -> anyhow::Result<PathBuf> {
    let path = self.output_dir.join(file_name);
    self.manifest.write(&path)?;
    Ok(path)
  }
}

impl BuildHost for DirectoryHost {
  fn name_template(&self) -> Option<&str> {
    self.name_template.as_deref()
  }

  fn emit(&mut self, output_path: &str, bytes: Vec<u8>, logical_name: &str) -> io::Result<()> {
    let destination = self.output_dir.join(output_path);
    if let Some(parent) = destination.parent() {
      fs::create_dir_all(parent)?;
    }
    fs::write(&destination, bytes)?;
    self.manifest.insert(logical_name, output_path);
    Ok(())
  }

  fn record_error(&mut self, error: AssetError) {
    self.errors.push(error);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn memory_host_records_artifacts_and_manifest() {
    let mut host = MemoryHost::new(None);
    host.add_output("main.js", b"console.log(1)".to_vec());
    host
      .emit("img/logo.abc.png", b"png".to_vec(), "img/logo.png")
      .unwrap();

    assert_eq!(host.artifact("img/logo.abc.png"), Some(&b"png"[..]));
    assert_eq!(host.manifest().get("img/logo.png"), Some("img/logo.abc.png"));
    assert_eq!(host.manifest().get("main.js"), Some("main.js"));
    assert!(host.name_template().is_none());
  }

  #[test]
  fn directory_host_writes_nested_files_and_manifest() {
    let dir = tempdir().unwrap();
    let mut host = DirectoryHost::new(dir.path().join("public"), Some("[name].js".into()));

    host
      .emit("img/icons/star.1234.svg", b"<svg/>".to_vec(), "img/icons/star.svg")
      .unwrap();
    host.register_output("main.js", "main.js");
    let manifest_path = host.write_manifest("manifest.json").unwrap();

    let written = fs::read(dir.path().join("public/img/icons/star.1234.svg")).unwrap();
    assert_eq!(written, b"<svg/>");

    let manifest = crate::manifest::load_manifest(&manifest_path).unwrap();
    assert_eq!(manifest.get("img/icons/star.svg"), Some("img/icons/star.1234.svg"));
    assert_eq!(manifest.len(), 2);
  }

  #[test]
  fn collects_errors() {
    let mut host = MemoryHost::new(None);
    host.record_error(AssetError::not_found("a.png", "/assets/a.png"));
    assert_eq!(host.errors().len(), 1);
    assert_eq!(host.errors()[0].subject(), "a.png");
  }
}
