//! Discovery of asset references embedded in template files.
//!
//! The work is split the same way the data flows: [`scan_tree`] finds template files,
//! [`extract_references`] pulls references out of one file's content, and [`AssetLocator`]
//! stitches the two together across a whole template tree. Anything able to produce a list of
//! references can stand in for the locator through [`ReferenceSource`].

mod extract;
mod rule;
mod scanner;

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::ScanError;

pub use extract::{ReferenceMatches, extract_references};
pub use rule::{
  DEFAULT_EXCLUSION, DEFAULT_FILE_MATCH, DEFAULT_REFERENCE_GROUP, DEFAULT_REFERENCE_MATCH,
  ReferenceRule, compile_pattern,
};
pub use scanner::scan_tree;

/// Anything able to list the asset references a build should emit.
pub trait ReferenceSource {
  /// Ordered, de-duplicated references.
  fn find_asset_references(&self) -> Result<Vec<String>, ScanError>;
}

impl<F> ReferenceSource for F
where
  F: Fn() -> Result<Vec<String>, ScanError>,
{
  fn find_asset_references(&self) -> Result<Vec<String>, ScanError> {
    self()
  }
}

/// Fixed reference list supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct StaticReferences(pub Vec<String>);

impl ReferenceSource for StaticReferences {
  fn find_asset_references(&self) -> Result<Vec<String>, ScanError> {
    Ok(self.0.clone())
  }
}

/// Scans a template tree for asset references.
#[derive(Debug, Clone)]
pub struct AssetLocator {
  search_path: PathBuf,
  rule: ReferenceRule,
}

impl AssetLocator {
  /// Locator over `search_path` with the default [`ReferenceRule`].
  pub fn new(search_path: impl Into<PathBuf>) -> Self {
    Self::with_rule(search_path, ReferenceRule::default())
  }

  /// Locator over `search_path` with custom rules.
  pub fn with_rule(search_path: impl Into<PathBuf>, rule: ReferenceRule) -> Self {
    Self {
      search_path: search_path.into(),
      rule,
    }
  }

  /// Root of the template tree.
  pub fn search_path(&self) -> &Path {
    &self.search_path
  }

  /// Rules applied while scanning.
  pub fn rule(&self) -> &ReferenceRule {
    &self.rule
  }

  /// Collect the references of every template below the search path.
  ///
  /// Order is the first occurrence across the depth first file walk. A missing search path or
  /// an I/O failure on a template aborts the whole scan. Bytes that are not valid UTF-8 are
  /// replaced, so binary files picked up by a broad file pattern only contribute noise.
  pub fn find_asset_references(&self) -> Result<Vec<String>, ScanError> {
    let templates = scan_tree(
      &self.search_path,
      self.rule.file_match(),
      self.rule.exclusions(),
    )?;

    let mut assets: Vec<String> = Vec::new();
    for template in templates {
      let content = read_template(&template)?;

      let found = self.find_asset_references_in_content(&content);
      debug!(
        "found {} asset reference(s) in {}",
        found.len(),
        template.display()
      );

      for reference in found {
        if !assets.contains(&reference) {
          assets.push(reference);
        }
      }
    }

    Ok(assets)
  }

  /// References in a single piece of template content.
  pub fn find_asset_references_in_content(&self, content: &str) -> Vec<String> {
    extract_references(
      content,
      self.rule.reference_match(),
      self.rule.reference_group(),
      self.rule.exclusions(),
    )
  }
}

fn read_template(path: &Path) -> Result<String, ScanError> {
  let bytes = fs::read(path).map_err(|source| ScanError::Read {
    path: path.to_path_buf(),
    source,
  })?;
  Ok(String::from_utf8_lossy(&bytes).into_owned())
}

impl ReferenceSource for AssetLocator {
  fn find_asset_references(&self) -> Result<Vec<String>, ScanError> {
    AssetLocator::find_asset_references(self)
  }
}
