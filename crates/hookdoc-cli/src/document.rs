//! Builds the run's document set: every file record plus run-level
//! metadata (plugin, WordPress version, failures).

use hookdoc_model::SourceFile;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

use crate::plugin::{self, PluginInfo};
use crate::process::{self, Failure};

/// Everything one run produced, in stable order.
#[derive(Debug, Default)]
pub struct DocumentSet {
    pub files: Vec<SourceFile>,
    pub failures: Vec<Failure>,
    pub plugin: PluginInfo,
    pub wp_version: Option<String>,
}

impl DocumentSet {
    pub fn hook_count(&self) -> usize {
        self.files.iter().map(|f| f.hooks.len()).sum()
    }
}

/// Process all discovered files under `root`. Files are parsed in
/// parallel but reassembled in discovery order, so two runs over the
/// same tree produce identical documents.
pub fn build_document(root: &Path, paths: &[PathBuf]) -> DocumentSet {
    let plugin = plugin::find_plugin(paths);
    let wp_version = plugin::find_wp_version(paths);

    let mut results: Vec<(usize, Result<SourceFile, Failure>)> = paths
        .par_iter()
        .enumerate()
        .map(|(index, path)| (index, process::process_file(path, root, &plugin.name)))
        .collect();
    results.sort_by_key(|(index, _)| *index);

    let mut files = Vec::new();
    let mut failures = Vec::new();
    for (_, result) in results {
        match result {
            Ok(file) => files.push(file),
            Err(failure) => failures.push(failure),
        }
    }

    DocumentSet {
        files,
        failures,
        plugin,
        wp_version,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_order_matches_discovery_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.php", "b.php", "c.php"] {
            std::fs::write(dir.path().join(name), "<?php do_action('init');\n").unwrap();
        }
        let paths = crate::discover::php_files(dir.path(), &[]);
        let doc = build_document(dir.path(), &paths);

        let order: Vec<_> = doc.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(order, vec!["a.php", "b.php", "c.php"]);
        assert_eq!(doc.hook_count(), 3);
        assert!(doc.failures.is_empty());
    }

    #[test]
    fn test_repeated_runs_render_identical_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("a.php"),
            "<?php\n/** Fires at init. */\ndo_action('init');\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("b.php"),
            concat!(
                "<?php\n",
                "class Post {\n",
                "    public function title($title) {\n",
                "        return apply_filters('the_title', $title);\n",
                "    }\n",
                "}\n",
            ),
        )
        .unwrap();
        let paths = crate::discover::php_files(dir.path(), &[]);

        let first = crate::export::render_json(&build_document(dir.path(), &paths).files).unwrap();
        let second = crate::export::render_json(&build_document(dir.path(), &paths).files).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_plugin_name_flows_into_records() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("main.php"),
            "<?php\n/**\n * Plugin Name: Doc Plugin\n */\ndo_action('load');\n",
        )
        .unwrap();
        let paths = crate::discover::php_files(dir.path(), &[]);
        let doc = build_document(dir.path(), &paths);

        assert_eq!(doc.plugin.name, "Doc Plugin");
        assert_eq!(doc.files[0].plugin_name, "Doc Plugin");
    }
}
