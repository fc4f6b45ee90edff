//! Run reporting.

use colored::Colorize;
use std::path::Path;

use crate::document::DocumentSet;

pub struct Reporter {
    verbose: bool,
}

impl Reporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn file_processed(&self, path: &str, hook_count: usize) {
        if self.verbose {
            println!("  {} {} ({} hooks)", "Parsed".green(), path, hook_count);
        }
    }

    pub fn warn_missing_path(&self, path: &Path) {
        eprintln!(
            "{}: path does not exist: {}",
            "Warning".yellow(),
            path.display()
        );
    }

    pub fn warn_failure(&self, path: &str, reason: &str) {
        eprintln!("{}: {}: {}", "Warning".yellow(), path, reason);
    }

    pub fn summary(&self, doc: &DocumentSet, output: &Path) {
        println!();
        println!("{}", "Summary".bold().underline());
        println!("  Files processed: {}", doc.files.len());
        println!("  Hooks found:     {}", doc.hook_count());
        if !doc.failures.is_empty() {
            println!(
                "  Failures:        {}",
                doc.failures.len().to_string().yellow()
            );
        }
        if let Some(version) = &doc.wp_version {
            println!("  WordPress:       {version}");
        }
        if !doc.plugin.is_empty() {
            println!("  Plugin:          {}", doc.plugin.name);
        }
        println!("  Output:          {}", output.display());
    }
}
