//! Recursive template discovery.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::ScanError;
use crate::locator::rule::is_excluded;

/// Walk `root` depth first, returning every file selected by `file_match`.
///
/// Entries whose base name matches an exclusion pattern are skipped, directories included, so
/// nothing below an excluded directory is visited. Siblings are visited in file name order. A
/// missing root fails with [`ScanError::RootNotFound`]; failures further down are reported as
/// they happen.
pub fn scan_tree(
    root: &Path,
    file_match: Option<&Regex>,
    exclusions: &[Regex],
) -> Result<Vec<PathBuf>, ScanError> {
    if !root.exists() {
        return Err(ScanError::RootNotFound {
            path: root.to_path_buf(),
        });
    }

    let mut found = Vec::new();
    collect_files_recursively(root, file_match, exclusions, &mut found)?;
    Ok(found)
}

fn collect_files_recursively(
    dir: &Path,
    file_match: Option<&Regex>,
    exclusions: &[Regex],
    found: &mut Vec<PathBuf>,
) -> Result<(), ScanError> {
    let walk_error = |path: &Path| {
        let path = path.to_path_buf();
        move |source| ScanError::Walk { path, source }
    };

    let mut entries = fs::read_dir(dir)
        .map_err(walk_error(dir))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(walk_error(dir))?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let file_name = entry.file_name();
        let name_str = file_name.to_string_lossy();
        if is_excluded(exclusions, &name_str) {
            continue;
        }

        let path = entry.path();
        let metadata = fs::metadata(&path).map_err(walk_error(&path))?;

        if metadata.is_dir() {
            collect_files_recursively(&path, file_match, exclusions, found)?;
        } else if file_match.is_none_or(|pattern| pattern.is_match(&path.to_string_lossy())) {
            found.push(path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_file(path: &Path, contents: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn fails_for_missing_root() {
        let dir = tempdir().unwrap();
        let result = scan_tree(&dir.path().join("absent"), None, &[]);
        assert!(matches!(result, Err(ScanError::RootNotFound { .. })));
    }

    #[test]
    fn visits_directories_depth_first() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write_file(&root.join("a/inner.html.twig"), "");
        write_file(&root.join("a/deeper/deepest.html.twig"), "");
        write_file(&root.join("b.html.twig"), "");
        write_file(&root.join("notes.txt"), "");

        let file_match = Regex::new(r"\.html\.twig$").unwrap();
        let found = scan_tree(root, Some(&file_match), &[]).unwrap();

        assert_eq!(found, vec![
            root.join("a/deeper/deepest.html.twig"),
            root.join("a/inner.html.twig"),
            root.join("b.html.twig"),
        ]);
    }

    #[test]
    fn returns_every_file_without_file_match() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write_file(&root.join("one.txt"), "");
        write_file(&root.join("nested/two.bin"), "");

        let found = scan_tree(root, None, &[]).unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn skips_excluded_directories_at_any_depth() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write_file(&root.join("kept.html.twig"), "");
        write_file(&root.join("node_modules/pkg/view.html.twig"), "");
        write_file(&root.join("nested/node_modules/view.html.twig"), "");
        write_file(&root.join("nested/kept.html.twig"), "");

        let exclusions = vec![Regex::new("node_modules").unwrap()];
        let found = scan_tree(root, None, &exclusions).unwrap();

        assert_eq!(found, vec![
            root.join("kept.html.twig"),
            root.join("nested/kept.html.twig"),
        ]);
    }

    #[test]
    fn skips_excluded_file_names() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write_file(&root.join("page.html.twig"), "");
        write_file(&root.join("page.draft.html.twig"), "");

        let exclusions = vec![Regex::new(r"\.draft\.").unwrap()];
        let found = scan_tree(root, None, &exclusions).unwrap();
        assert_eq!(found, vec![root.join("page.html.twig")]);
    }
}
