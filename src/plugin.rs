//! Build integration: validated configuration, one eager reference scan, then one emission pass.

use std::path::{Path, PathBuf};

use log::info;

use crate::emit::naming::validate_output_template;
use crate::emit::{AssetEmitter, BuildHost, HandledAssetRegistry};
use crate::error::{ConfigError, ScanError};
use crate::locator::{AssetLocator, ReferenceRule, ReferenceSource};
use crate::models::PassReport;

/// Options accepted by [`TemplateAssetPlugin::new`].
///
/// Either `template_path` or `asset_locator` must be set. When both are, the caller supplied
/// locator wins and the template path is only checked for existence.
#[derive(Default)]
pub struct PluginOptions {
  /// Root the references are resolved against.
  pub asset_path: Option<PathBuf>,
  /// Template tree scanned by the default locator.
  pub template_path: Option<PathBuf>,
  /// Rules for the default locator.
  pub rule: ReferenceRule,
  /// Caller supplied reference source replacing the default locator.
  pub asset_locator: Option<Box<dyn ReferenceSource>>,
  /// Output naming template override, has to end with `[ext]`.
  pub filename: Option<String>,
}

/// Emits template-referenced assets into a build.
pub struct TemplateAssetPlugin {
  asset_path: PathBuf,
  filename: Option<String>,
  source: Box<dyn ReferenceSource>,
}

impl TemplateAssetPlugin {
  /// Validate `options` and build the plugin.
  pub fn new(options: PluginOptions) -> Result<Self, ConfigError> {
    let PluginOptions {
      asset_path,
      template_path,
      rule,
      asset_locator,
      filename,
    } = options;

    if let Some(filename) = filename.as_deref() {
      validate_output_template(filename)?;
    }

    if let Some(path) = template_path.as_ref()
      && !path.exists()
    {
      return Err(ConfigError::PathNotFound {
        option: "templates path",
        path: path.clone(),
      });
    }

    let source: Box<dyn ReferenceSource> = match (asset_locator, template_path) {
      (Some(locator), _) => locator,
      (None, Some(templates)) => Box::new(AssetLocator::with_rule(templates, rule)),
      (None, None) => return Err(ConfigError::MissingReferenceSource),
    };

    let asset_path = asset_path.ok_or(ConfigError::MissingOption {
      option: "assetPath",
    })?;
    if !asset_path.exists() {
      return Err(ConfigError::PathNotFound {
        option: "assets path",
        path: asset_path,
      });
    }

    Ok(Self {
      asset_path,
      filename,
      source,
    })
  }

  /// Root the references are resolved against.
  pub fn asset_path(&self) -> &Path {
    &self.asset_path
  }

  /// Scan for references and open a pass over them.
  ///
  /// The reference list is computed here, once, and stays fixed for the whole pass.
  pub fn begin_pass(&self) -> Result<AssetPass, ScanError> {
    let references = self.source.find_asset_references()?;
    info!("discovered {} asset reference(s)", references.len());

    Ok(AssetPass {
      references,
      emitter: AssetEmitter::new(self.asset_path.clone(), self.filename.clone()),
    })
  }

  /// Scan and emit in one go, for hosts without outputs of their own.
  pub fn run<H: BuildHost + ?Sized>(&self, host: &mut H) -> Result<PassReport, ScanError> {
    let mut pass = self.begin_pass()?;
    Ok(pass.process_assets(host))
  }
}

/// A single build pass: the fixed reference list and the pass-local handled registry.
#[derive(Debug)]
pub struct AssetPass {
  references: Vec<String>,
  emitter: AssetEmitter,
}

impl AssetPass {
  /// References discovered when the pass began.
  pub fn references(&self) -> &[String] {
    &self.references
  }

  /// Requests handled so far.
  pub fn registry(&self) -> &HandledAssetRegistry {
    self.emitter.registry()
  }

  /// Mark `key` as produced by the host from `source`; it will not be emitted again.
  pub fn report_produced_output(&mut self, key: impl Into<String>, source: impl Into<PathBuf>) {
    self.emitter.report_produced_output(key, source);
  }

  /// Mark the output of chunk `chunk_name` built from `module_file` as produced.
  pub fn record_module_output(&mut self, chunk_name: &str, module_file: &str) -> String {
    self.emitter.record_module_output(chunk_name, module_file)
  }

  /// Emit every reference not yet handled into `host`.
  pub fn process_assets<H: BuildHost + ?Sized>(&mut self, host: &mut H) -> PassReport {
    self.emitter.emit_assets(&self.references, host)
  }
}
