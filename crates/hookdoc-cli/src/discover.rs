//! PHP file discovery.
//!
//! Walks the input paths and collects `.php` files in sorted path order,
//! skipping directories that never carry documentable hooks (vendored
//! code, build output, assets).

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory names skipped during discovery, matched against each path
/// component. Callers may extend the list via config or `--exclude`.
pub const DEFAULT_IGNORE_DIRS: &[&str] = &[
    "vendor",
    "vendor_prefixed",
    "node_modules",
    "integration-tests",
    "tests",
    "build",
    "config",
    "grunt",
    "deploy_keys",
    "js",
    "languages",
    "webpack",
    "images",
    "css",
];

/// Collect all PHP files under `path`, excluding ignored directories.
/// A `path` that is itself a `.php` file is returned as-is. The result
/// is sorted so downstream output is stable across runs.
pub fn php_files(path: &Path, extra_excludes: &[String]) -> Vec<PathBuf> {
    if path.is_file() {
        if has_php_extension(path) {
            return vec![path.to_path_buf()];
        }
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_entry(|e| !is_excluded_dir(e.path(), e.file_type().is_dir(), extra_excludes))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && has_php_extension(e.path()))
        .map(|e| e.into_path())
        .collect();

    files.sort();
    files
}

fn has_php_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "php")
}

fn is_excluded_dir(path: &Path, is_dir: bool, extra_excludes: &[String]) -> bool {
    if !is_dir {
        return false;
    }
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| {
            DEFAULT_IGNORE_DIRS.contains(&name) || extra_excludes.iter().any(|ex| ex == name)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "<?php\n").unwrap();
    }

    #[test]
    fn test_collects_php_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b.php"));
        touch(&dir.path().join("a.php"));
        touch(&dir.path().join("inc/c.php"));
        touch(&dir.path().join("readme.txt"));

        let files = php_files(dir.path(), &[]);
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.php", "b.php", "inc/c.php"]);
    }

    #[test]
    fn test_skips_ignored_directories() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("plugin.php"));
        touch(&dir.path().join("vendor/autoload.php"));
        touch(&dir.path().join("node_modules/pkg/index.php"));
        touch(&dir.path().join("tests/test-case.php"));

        let files = php_files(dir.path(), &[]);
        assert_eq!(files, vec![dir.path().join("plugin.php")]);
    }

    #[test]
    fn test_extra_excludes_apply() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("plugin.php"));
        touch(&dir.path().join("third-party/lib.php"));

        let files = php_files(dir.path(), &["third-party".to_string()]);
        assert_eq!(files, vec![dir.path().join("plugin.php")]);
    }

    #[test]
    fn test_single_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("only.php");
        touch(&file);
        assert_eq!(php_files(&file, &[]), vec![file.clone()]);
        assert!(php_files(&dir.path().join("missing.txt"), &[]).is_empty());
    }
}
