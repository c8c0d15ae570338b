//! Reference extraction from template content.

use regex::{Captures, Regex};

use crate::locator::rule::is_excluded;

/// Successive matches of a reference pattern over one piece of content.
///
/// The search position lives in the iterator, never in the pattern, so a pattern can be shared
/// between any number of extractions without one leaking its position into another.
pub struct ReferenceMatches<'r, 'c> {
    pattern: &'r Regex,
    content: &'c str,
    position: usize,
}

impl<'r, 'c> ReferenceMatches<'r, 'c> {
    /// Start matching `pattern` at the beginning of `content`.
    pub fn new(pattern: &'r Regex, content: &'c str) -> Self {
        Self {
            pattern,
            content,
            position: 0,
        }
    }
}

impl<'c> Iterator for ReferenceMatches<'_, 'c> {
    type Item = Captures<'c>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position > self.content.len() {
            return None;
        }

        let captures = self.pattern.captures_at(self.content, self.position)?;
        let whole = captures.get(0)?;
        self.position = if whole.is_empty() {
            // Step over one character so an empty match cannot repeat forever.
            self.content[whole.end()..]
                .chars()
                .next()
                .map_or(self.content.len() + 1, |ch| whole.end() + ch.len_utf8())
        } else {
            whole.end()
        };

        Some(captures)
    }
}

/// Pull capture group `group` out of every match of `pattern` in `content`.
///
/// Values matching an exclusion pattern are dropped, and so are repeats: the result keeps the
/// first occurrence of each value in content order. Matches where the group did not participate
/// are ignored.
pub fn extract_references(
    content: &str,
    pattern: &Regex,
    group: usize,
    exclusions: &[Regex],
) -> Vec<String> {
    let mut references: Vec<String> = Vec::new();

    for captures in ReferenceMatches::new(pattern, content) {
        let Some(value) = captures.get(group).map(|m| m.as_str()) else {
            continue;
        };

        if is_excluded(exclusions, value) || references.iter().any(|known| known == value) {
            continue;
        }

        references.push(value.to_string());
    }

    references
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::rule::{DEFAULT_REFERENCE_GROUP, DEFAULT_REFERENCE_MATCH};

    fn default_pattern() -> Regex {
        Regex::new(DEFAULT_REFERENCE_MATCH).unwrap()
    }

    #[test]
    fn extracts_both_quote_styles() {
        let content = r#"<img src="{{ asset('logo.png') }}"><img src="{{ asset("icons/star.svg") }}">"#;
        let references =
            extract_references(content, &default_pattern(), DEFAULT_REFERENCE_GROUP, &[]);
        assert_eq!(references, vec!["logo.png", "icons/star.svg"]);
    }

    #[test]
    fn keeps_first_occurrence_order_without_duplicates() {
        let content = "asset('b.png') asset('a.png') asset(\"b.png\") asset('c.png') asset('a.png')";
        let references =
            extract_references(content, &default_pattern(), DEFAULT_REFERENCE_GROUP, &[]);
        assert_eq!(references, vec!["b.png", "a.png", "c.png"]);
    }

    #[test]
    fn drops_excluded_references() {
        let content = "asset('app.js') asset('logo.png') asset('theme.css')";
        let exclusions = vec![Regex::new(r"\.js$").unwrap(), Regex::new(r"\.css$").unwrap()];
        let references = extract_references(
            content,
            &default_pattern(),
            DEFAULT_REFERENCE_GROUP,
            &exclusions,
        );
        assert_eq!(references, vec!["logo.png"]);
    }

    #[test]
    fn supports_custom_pattern_and_group() {
        let pattern = Regex::new(r"inc\('([^']+)'\)").unwrap();
        let content = "<?php inc('120.png'); inc('main.js'); echo asset('ignored.png'); ?>";
        let references = extract_references(content, &pattern, 1, &[]);
        assert_eq!(references, vec!["120.png", "main.js"]);
    }

    #[test]
    fn group_zero_yields_the_whole_match() {
        let pattern = Regex::new(r"[\w/]+\.png").unwrap();
        let references = extract_references("<img src=\"img/a.png\"> b.png", &pattern, 0, &[]);
        assert_eq!(references, vec!["img/a.png", "b.png"]);
    }

    #[test]
    fn repeated_extraction_with_shared_pattern_starts_from_the_top() {
        let pattern = default_pattern();
        let first = extract_references("asset('one.png')", &pattern, DEFAULT_REFERENCE_GROUP, &[]);
        let second = extract_references("asset('two.png')", &pattern, DEFAULT_REFERENCE_GROUP, &[]);
        let again = extract_references("asset('one.png')", &pattern, DEFAULT_REFERENCE_GROUP, &[]);

        assert_eq!(first, vec!["one.png"]);
        assert_eq!(second, vec!["two.png"]);
        assert_eq!(again, first);
    }

    #[test]
    fn terminates_on_patterns_matching_empty_strings() {
        let pattern = Regex::new(r"(x*)").unwrap();
        let references = extract_references("aéxxb", &pattern, 1, &[]);
        assert_eq!(references, vec!["", "xx"]);
    }
}
