//! Resolution of references to files under the asset root and their emission into the host.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::emit::host::BuildHost;
use crate::emit::naming::{DEFAULT_HOST_TEMPLATE, derive_output_template};
use crate::emit::registry::HandledAssetRegistry;
use crate::error::AssetError;
use crate::models::{PassReport, ResolvedAsset};

/// Emits referenced assets that the host did not already produce.
///
/// One emitter serves one build pass: its registry starts empty, is filled by the host's own
/// outputs and by every successful emission, and is dropped with the emitter.
#[derive(Debug)]
pub struct AssetEmitter {
  asset_root: PathBuf,
  filename: Option<String>,
  registry: HandledAssetRegistry,
}

impl AssetEmitter {
  /// Emitter resolving references below `asset_root`.
  ///
  /// `filename` overrides the output naming template; it is expected to have been validated.
  pub fn new(asset_root: impl Into<PathBuf>, filename: Option<String>) -> Self {
    Self {
      asset_root: asset_root.into(),
      filename,
      registry: HandledAssetRegistry::new(),
    }
  }

  /// Directory references are resolved against.
  pub fn asset_root(&self) -> &Path {
    &self.asset_root
  }

  /// Requests handled so far in this pass.
  pub fn registry(&self) -> &HandledAssetRegistry {
    &self.registry
  }

  /// Record that the host produced `key` from `source` on its own.
  pub fn report_produced_output(&mut self, key: impl Into<String>, source: impl Into<PathBuf>) {
    self.registry.mark_handled(key, source);
  }

  /// Record a host chunk built from `module_file`, see
  /// [`HandledAssetRegistry::mark_module_output`].
  pub fn record_module_output(&mut self, chunk_name: &str, module_file: &str) -> String {
    self.registry.mark_module_output(chunk_name, module_file)
  }

  /// Naming template used for this pass.
  pub fn output_template<H: BuildHost + ?Sized>(&self, host: &H) -> String {
    match &self.filename {
      Some(filename) => filename.clone(),
      None => derive_output_template(host.name_template().unwrap_or(DEFAULT_HOST_TEMPLATE)),
    }
  }

  /// Emit every reference in order.
  ///
  /// Handled references are skipped silently. A reference that cannot be found or emitted is
  /// reported to the host as an [`AssetError`] and processing moves on to the next one.
  pub fn emit_assets<H: BuildHost + ?Sized>(
    &mut self,
    references: &[String],
    host: &mut H,
  ) -> PassReport {
    let template = self.output_template(host);
    let mut report = PassReport::default();

    for reference in references {
      if self.registry.is_handled(reference) {
        debug!("asset \"{reference}\" already handled, skipping");
        report.skipped.push(reference.clone());
        continue;
      }

      let physical = self.resolve(reference);
      let outcome = if physical.exists() {
        self.emit_asset(reference, &physical, &template, host)
      } else {
        Err(AssetError::not_found(reference.as_str(), physical))
      };

      match outcome {
        Ok(asset) => {
          debug!(
            "emitted \"{}\" as \"{}\"",
            asset.logical_name, asset.interpolated_output_path
          );
          self
            .registry
            .mark_handled(reference.clone(), asset.physical_source_path.clone());
          report.emitted.push(asset);
        }
        Err(error) => {
          warn!("{error}");
          report.failed.push(reference.clone());
          host.record_error(error);
        }
      }
    }

    info!(
      "asset pass finished: {} emitted, {} skipped, {} failed",
      report.emitted.len(),
      report.skipped.len(),
      report.failed.len()
    );
    report
  }

  /// Physical location of `reference` below the asset root.
  pub fn resolve(&self, reference: &str) -> PathBuf {
    self.asset_root.join(reference.trim_start_matches('/'))
  }

  fn emit_asset<H: BuildHost + ?Sized>(
    &self,
    reference: &str,
    physical: &Path,
    template: &str,
    host: &mut H,
  ) -> Result<ResolvedAsset, AssetError> {
    let bytes = fs::read(physical).map_err(|err| AssetError::emit(reference, err))?;
    let file_name = host
      .interpolate_name(physical, &self.asset_root, template, &bytes)
      .map_err(|err| AssetError::emit(reference, err))?;
    let output_path = output_path_for(reference, &file_name);

    host
      .emit(&output_path, bytes, reference)
      .map_err(|err| AssetError::emit(reference, err))?;

    Ok(ResolvedAsset {
      logical_name: reference.to_string(),
      physical_source_path: physical.to_path_buf(),
      interpolated_output_path: output_path,
    })
  }
}

/// Place `file_name` in the directory part of `reference`, always with forward slashes.
///
/// `..` segments become `_` so the result stays below the output directory.
pub fn output_path_for(reference: &str, file_name: &str) -> String {
  let directory: Vec<&str> = reference
    .rsplit_once('/')
    .map(|(dir, _)| dir)
    .unwrap_or_default()
    .split('/')
    .filter(|segment| !segment.is_empty() && *segment != ".")
    .map(|segment| if segment == ".." { "_" } else { segment })
    .collect();

  if directory.is_empty() {
    file_name.to_string()
  } else {
    format!("{}/{}", directory.join("/"), file_name)
  }
}
