use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Request names already satisfied during the current build pass.
///
/// Each key maps to the physical files that produced it, in reporting order and without
/// repeats. Entries are never removed: once a request is handled it stays handled.
#[derive(Debug, Clone, Default)]
pub struct HandledAssetRegistry {
  handled: BTreeMap<String, Vec<PathBuf>>,
}

impl HandledAssetRegistry {
  /// Empty registry for a fresh pass.
  pub fn new() -> Self {
    Self::default()
  }

  /// Record that `source` satisfies the request `key`.
  pub fn mark_handled(&mut self, key: impl Into<String>, source: impl Into<PathBuf>) {
    let sources = self.handled.entry(key.into()).or_default();
    let source = source.into();
    if !sources.contains(&source) {
      sources.push(source);
    }
  }

  /// Whether anything already satisfies `key`.
  pub fn is_handled(&self, key: &str) -> bool {
    self.handled.contains_key(key)
  }

  /// Files recorded for `key`, empty when it is unhandled.
  pub fn sources(&self, key: &str) -> &[PathBuf] {
    self.handled.get(key).map(Vec::as_slice).unwrap_or_default()
  }

  /// Record a host module output: chunk `chunk_name` built from `module_file` is served as
  /// `<chunk_name><extension of module_file>`.
  ///
  /// Returns the request key that was marked.
  pub fn mark_module_output(&mut self, chunk_name: &str, module_file: &str) -> String {
    let extension = Path::new(module_file)
      .extension()
      .map(|value| format!(".{}", value.to_string_lossy()))
      .unwrap_or_default();
    let key = format!("{chunk_name}{extension}");
    self.mark_handled(key.clone(), module_file);
    key
  }

  /// Number of handled request keys.
  pub fn len(&self) -> usize {
    self.handled.len()
  }

  /// True when nothing has been handled yet.
  pub fn is_empty(&self) -> bool {
    self.handled.is_empty()
  }
}
