//! Plugin header detection.
//!
//! WordPress declares plugin metadata in a comment block at the top of a
//! PHP file (`Plugin Name: ...` and friends). The first file in path
//! order that carries a non-empty `Plugin Name` names the plugin for the
//! whole run.

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// How much of a file is scanned for header fields. Matches the amount
/// WordPress itself reads when sniffing plugin headers.
const HEADER_SCAN_BYTES: usize = 8 * 1024;

const HEADER_KEYS: &[(&str, &str)] = &[
    ("name", "Plugin Name"),
    ("plugin_uri", "Plugin URI"),
    ("version", "Version"),
    ("description", "Description"),
    ("author", "Author"),
    ("author_uri", "Author URI"),
    ("text_domain", "Text Domain"),
    ("domain_path", "Domain Path"),
    ("network", "Network"),
];

#[derive(Debug, Clone, Default)]
pub struct PluginInfo {
    pub name: String,
    pub version: String,
    pub description: String,
    pub author: String,
}

impl PluginInfo {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }
}

fn header_patterns() -> &'static [(&'static str, Regex)] {
    static PATTERNS: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        HEADER_KEYS
            .iter()
            .map(|(field, key)| {
                let pattern = format!(r"(?mi)^[ \t/*#@]*{}:(.*)$", regex::escape(key));
                (*field, Regex::new(&pattern).unwrap())
            })
            .collect()
    })
}

/// Parse plugin header fields out of one file's contents. Returns `None`
/// when the file carries no `Plugin Name` header.
pub fn parse_headers(source: &str) -> Option<PluginInfo> {
    // Clamp the window back to a char boundary so multi-byte content
    // straddling the limit cannot split a code point.
    let mut end = HEADER_SCAN_BYTES.min(source.len());
    while !source.is_char_boundary(end) {
        end -= 1;
    }
    let head = &source[..end];

    let mut info = PluginInfo::default();
    for (field, re) in header_patterns() {
        let value = re
            .captures(head)
            .map(|caps| clean_header_value(&caps[1]))
            .unwrap_or_default();
        match *field {
            "name" => info.name = value,
            "version" => info.version = value,
            "description" => info.description = value,
            "author" => info.author = value,
            _ => {}
        }
    }

    if info.name.is_empty() {
        None
    } else {
        Some(info)
    }
}

/// Find the plugin declared by a source tree: the first file in path
/// order whose header block names one.
pub fn find_plugin(paths: &[std::path::PathBuf]) -> PluginInfo {
    for path in paths {
        if let Ok(source) = std::fs::read_to_string(path) {
            if let Some(info) = parse_headers(&source) {
                return info;
            }
        }
    }
    PluginInfo::default()
}

/// Strip the comment-closer and surrounding whitespace from a raw header
/// value, the way WordPress' `get_file_data()` does.
fn clean_header_value(raw: &str) -> String {
    raw.split("*/").next().unwrap_or("").trim().to_string()
}

/// Extract the WordPress core version from `wp-includes/version.php`, if
/// that file is among the inputs.
pub fn find_wp_version(paths: &[std::path::PathBuf]) -> Option<String> {
    static VERSION_RE: OnceLock<Regex> = OnceLock::new();
    let re = VERSION_RE.get_or_init(|| Regex::new(r"\$wp_version\s*=\s*'([^']+)'").unwrap());

    let version_file = paths
        .iter()
        .find(|p| p.ends_with(Path::new("wp-includes/version.php")))?;
    let source = std::fs::read_to_string(version_file).ok()?;
    re.captures(&source).map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const HEADER: &str = concat!(
        "<?php\n",
        "/**\n",
        " * Plugin Name: Example Plugin\n",
        " * Version: 2.1.0\n",
        " * Description: Does example things. */\n",
        " * Author: Jane Doe\n",
        " */\n",
    );

    #[test]
    fn test_parses_header_block() {
        let info = parse_headers(HEADER).unwrap();
        assert_eq!(info.name, "Example Plugin");
        assert_eq!(info.version, "2.1.0");
        assert_eq!(info.description, "Does example things.");
    }

    #[test]
    fn test_no_plugin_name_means_none() {
        assert!(parse_headers("<?php\n// Version: 1.0\n").is_none());
    }

    #[test]
    fn test_scan_window_respects_char_boundaries() {
        // A multi-byte char straddles the byte limit; the clamp must not
        // split it.
        let mut source = String::from("<?php\nx");
        while source.len() < HEADER_SCAN_BYTES + 16 {
            source.push('é');
        }
        assert!(parse_headers(&source).is_none());

        let mut with_header = String::from(HEADER);
        while with_header.len() < HEADER_SCAN_BYTES + 16 {
            with_header.push('é');
        }
        assert_eq!(parse_headers(&with_header).unwrap().name, "Example Plugin");
    }

    #[test]
    fn test_find_plugin_uses_first_match_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let helper = dir.path().join("helper.php");
        let main = dir.path().join("plugin.php");
        std::fs::write(&helper, "<?php\n").unwrap();
        std::fs::write(&main, HEADER).unwrap();

        let info = find_plugin(&[helper, main]);
        assert_eq!(info.name, "Example Plugin");
    }

    #[test]
    fn test_find_wp_version() {
        let dir = tempfile::tempdir().unwrap();
        let inc = dir.path().join("wp-includes");
        std::fs::create_dir(&inc).unwrap();
        let version_file = inc.join("version.php");
        std::fs::write(&version_file, "<?php\n$wp_version = '6.4.2';\n").unwrap();

        let paths: Vec<PathBuf> = vec![dir.path().join("index.php"), version_file];
        assert_eq!(find_wp_version(&paths).as_deref(), Some("6.4.2"));
    }
}
