//! Project configuration loader describing where templates and assets live.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::locator::{DEFAULT_REFERENCE_GROUP, ReferenceRule, compile_pattern};
use crate::plugin::PluginOptions;

/// Configuration file looked up by [`PluginConfigFile::discover`].
pub const DEFAULT_CONFIG_FILE: &str = "twig-assets.config.json";

/// JSON configuration for a build.
///
/// Every field is optional in the file; [`PluginConfigFile::into_options`] fills in the locator
/// defaults and leaves required-path validation to the plugin constructor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct PluginConfigFile {
  /// Directory referenced assets are resolved against.
  pub asset_path: Option<PathBuf>,
  /// Directory scanned for templates.
  pub template_path: Option<PathBuf>,
  /// Pattern selecting template files. An empty string scans every file.
  pub file_match: Option<String>,
  /// Pattern locating references inside templates.
  pub reference_match: Option<String>,
  /// Capture group of `referenceMatch` holding the asset path, group 2 when omitted.
  pub reference_match_group_index: Option<usize>,
  /// Patterns excluding template tree entries and references.
  pub exclusion_patterns: Option<Vec<String>>,
  /// Output naming template override.
  pub filename: Option<String>,
  /// The host's own primary output template, used to derive the default naming.
  pub output_filename: Option<String>,
  /// Directory the command line host writes artifacts to.
  pub output_path: Option<PathBuf>,
}

impl PluginConfigFile {
  /// Load `twig-assets.config.json` from `dir` when present.
  pub fn discover(dir: &Path) -> Result<Option<Self>, ConfigError> {
    let candidate = dir.join(DEFAULT_CONFIG_FILE);
    if !candidate.exists() {
      return Ok(None);
    }
    Self::from_path(&candidate).map(Some)
  }

  /// Read configuration from a specific JSON file.
  ///
  /// Relative paths in the file are resolved against the file's directory.
  pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    Ok(config.relative_to(base))
  }

  /// Resolve relative paths against `base`.
  pub fn relative_to(mut self, base: &Path) -> Self {
    let resolve = |value: Option<PathBuf>| value.map(|path| base.join(path));
    self.asset_path = resolve(self.asset_path);
    self.template_path = resolve(self.template_path);
    self.output_path = resolve(self.output_path);
    self
  }

  /// Build the locator rule, compiling every configured pattern.
  pub fn to_rule(&self) -> Result<ReferenceRule, ConfigError> {
    let mut rule = ReferenceRule::default();

    if let Some(file_match) = self.file_match.as_deref() {
      let pattern = if file_match.is_empty() {
        None
      } else {
        Some(compile_pattern("fileMatch", file_match)?)
      };
      rule = rule.with_file_match(pattern);
    }

    match (self.reference_match.as_deref(), self.reference_match_group_index) {
      (Some(pattern), group) => {
        let group = group.unwrap_or(DEFAULT_REFERENCE_GROUP);
        rule = rule.with_reference_match(compile_pattern("referenceMatch", pattern)?, group)?;
      }
      (None, Some(group)) => {
        let pattern = rule.reference_match().clone();
        rule = rule.with_reference_match(pattern, group)?;
      }
      (None, None) => {}
    }

    if let Some(exclusions) = self.exclusion_patterns.as_ref() {
      let compiled = exclusions
        .iter()
        .map(|pattern| compile_pattern("exclusionPatterns", pattern))
        .collect::<Result<Vec<_>, _>>()?;
      rule = rule.with_exclusions(compiled);
    }

    Ok(rule)
  }

  /// Convert into plugin options using the default template locator.
  pub fn into_options(self) -> Result<PluginOptions, ConfigError> {
    let rule = self.to_rule()?;
    Ok(PluginOptions {
      asset_path: self.asset_path,
      template_path: self.template_path,
      rule,
      asset_locator: None,
      filename: self.filename,
    })
  }
}
