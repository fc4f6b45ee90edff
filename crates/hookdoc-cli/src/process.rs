//! Per-file processing: read, parse, walk, build the record.
//!
//! Failures here are data failures (unreadable bytes, source the parser
//! cannot survive) and are reported per file rather than aborting the
//! run.

use bumpalo::Bump;
use hookdoc_core::walk_program;
use hookdoc_model::SourceFile;
use mago_database::file::FileId;
use mago_syntax::parser::parse_file_content;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

/// A file that could not be turned into a record, with the reason kept
/// for the run report.
#[derive(Debug, Clone)]
pub struct Failure {
    pub path: String,
    pub reason: String,
}

/// Process one PHP file into its record. `root` is the scan root the
/// path is reported relative to.
pub fn process_file(path: &Path, root: &Path, plugin_name: &str) -> Result<SourceFile, Failure> {
    let rel_path = path
        .strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string();

    let source = std::fs::read_to_string(path).map_err(|e| Failure {
        path: rel_path.clone(),
        reason: format!("unreadable: {e}"),
    })?;

    // The parser arena lives only as long as one file's walk; everything
    // the record needs is copied out by then.
    let walk = catch_unwind(AssertUnwindSafe(|| {
        let arena = Bump::new();
        let file_id = FileId::new(rel_path.as_str());
        let program = parse_file_content(&arena, file_id, &source);
        walk_program(program, &source)
    }))
    .map_err(|_| Failure {
        path: rel_path.clone(),
        reason: "parser could not recover from the file's syntax".to_string(),
    })?;

    let root_str = root.display().to_string();
    hookdoc_model::source_file(walk, &rel_path, &root_str, plugin_name).map_err(|e| Failure {
        path: rel_path.clone(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processes_a_simple_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hooks.php");
        std::fs::write(&path, "<?php do_action('init');\n").unwrap();

        let file = process_file(&path, dir.path(), "Test Plugin").unwrap();
        assert_eq!(file.path, "hooks.php");
        assert_eq!(file.hooks.len(), 1);
        assert_eq!(file.hooks[0].name, "init");
    }

    #[test]
    fn test_missing_file_is_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = process_file(&dir.path().join("gone.php"), dir.path(), "").unwrap_err();
        assert_eq!(err.path, "gone.php");
        assert!(err.reason.starts_with("unreadable"));
    }
}
