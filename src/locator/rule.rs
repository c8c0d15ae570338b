use regex::Regex;

use crate::error::ConfigError;

/// Template files scanned when no file pattern is configured.
pub const DEFAULT_FILE_MATCH: &str = r"\.html\.twig$";
/// Quoted single argument call, `asset('logo.png')` or `asset("logo.png")`.
///
/// Group 1 is the opening quote and group 2 the path. The path may not contain either quote
/// character, which stands in for a backreference to the opening quote.
pub const DEFAULT_REFERENCE_MATCH: &str = r#"asset\((['"])([^'"]+)['"]\)"#;
/// Capture group holding the asset path in [`DEFAULT_REFERENCE_MATCH`].
pub const DEFAULT_REFERENCE_GROUP: usize = 2;
/// Dependency cache directory skipped by default.
pub const DEFAULT_EXCLUSION: &str = "node_modules";

/// Rules describing which files are scanned and how references are pulled out of them.
///
/// Exclusion patterns apply to the base name of every directory entry met while walking the
/// template tree, and to every extracted reference string.
#[derive(Debug, Clone)]
pub struct ReferenceRule {
  file_match: Option<Regex>,
  reference_match: Regex,
  reference_group: usize,
  exclusions: Vec<Regex>,
}

impl Default for ReferenceRule {
  fn default() -> Self {
    Self {
      file_match: Some(Regex::new(DEFAULT_FILE_MATCH).expect("invalid default file regex")),
      reference_match: Regex::new(DEFAULT_REFERENCE_MATCH)
        .expect("invalid default reference regex"),
      reference_group: DEFAULT_REFERENCE_GROUP,
      exclusions: vec![Regex::new(DEFAULT_EXCLUSION).expect("invalid default exclusion regex")],
    }
  }
}

impl ReferenceRule {
  /// Replace the template file pattern. `None` scans every file.
  pub fn with_file_match(mut self, file_match: Option<Regex>) -> Self {
    self.file_match = file_match;
    self
  }

  /// Replace the reference pattern and the capture group holding the path.
  ///
  /// Group 0 takes the whole match, for patterns without groups.
  pub fn with_reference_match(
    mut self,
    reference_match: Regex,
    group: usize,
  ) -> Result<Self, ConfigError> {
    if group >= reference_match.captures_len() {
      return Err(ConfigError::InvalidGroupIndex {
        pattern: reference_match.as_str().to_string(),
        index: group,
      });
    }
    self.reference_match = reference_match;
    self.reference_group = group;
    Ok(self)
  }

  /// Replace the exclusion set. An empty set excludes nothing.
  pub fn with_exclusions(mut self, exclusions: Vec<Regex>) -> Self {
    self.exclusions = exclusions;
    self
  }

  /// Pattern selecting template files, if any.
  pub fn file_match(&self) -> Option<&Regex> {
    self.file_match.as_ref()
  }

  /// Pattern locating references inside template content.
  pub fn reference_match(&self) -> &Regex {
    &self.reference_match
  }

  /// Capture group of [`Self::reference_match`] that yields the asset path.
  pub fn reference_group(&self) -> usize {
    self.reference_group
  }

  /// Patterns excluding tree entries and references.
  pub fn exclusions(&self) -> &[Regex] {
    &self.exclusions
  }

  /// Whether `value` matches any exclusion pattern.
  pub fn is_excluded(&self, value: &str) -> bool {
    is_excluded(&self.exclusions, value)
  }
}

pub(crate) fn is_excluded(exclusions: &[Regex], value: &str) -> bool {
  exclusions.iter().any(|pattern| pattern.is_match(value))
}

/// Compile a user supplied pattern, tagging failures with the option they came from.
pub fn compile_pattern(option: &'static str, pattern: &str) -> Result<Regex, ConfigError> {
  Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
    option,
    pattern: pattern.to_string(),
    source,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_select_twig_templates() {
    let rule = ReferenceRule::default();
    let file_match = rule.file_match().unwrap();
    assert!(file_match.is_match("views/page.html.twig"));
    assert!(!file_match.is_match("views/page.twig"));
    assert_eq!(rule.reference_group(), DEFAULT_REFERENCE_GROUP);
  }

  #[test]
  fn default_exclusion_skips_dependency_cache() {
    let rule = ReferenceRule::default();
    assert!(rule.is_excluded("node_modules"));
    assert!(!rule.is_excluded("templates"));
  }

  #[test]
  fn rejects_group_outside_pattern() {
    let pattern = Regex::new(r"inc\('([^']+)'\)").unwrap();
    assert!(
      ReferenceRule::default()
        .with_reference_match(pattern.clone(), 2)
        .is_err()
    );
    let rule = ReferenceRule::default()
      .with_reference_match(pattern, 1)
      .unwrap();
    assert_eq!(rule.reference_group(), 1);
  }

  #[test]
  fn group_zero_takes_the_whole_match() {
    let rule = ReferenceRule::default()
      .with_reference_match(Regex::new(r"[\w/]+\.png").unwrap(), 0)
      .unwrap();
    assert_eq!(rule.reference_group(), 0);
  }

  #[test]
  fn compile_pattern_reports_option_name() {
    let error = compile_pattern("fileMatch", "(unclosed").unwrap_err();
    assert!(error.to_string().contains("fileMatch"));
  }
}
