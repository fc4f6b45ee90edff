//! Document exporters.
//!
//! Both formats list only hook-bearing files. CSV is flat for
//! spreadsheets: a path row introduces each file, followed by one row
//! per hook. JSON keeps the full docblock per hook, keyed by file path
//! then hook name.

use anyhow::{Context, Result};
use hookdoc_model::SourceFile;
use serde_json::json;
use std::io::Write;
use std::path::Path;

pub fn export(files: &[SourceFile], format: &str, output: &Path) -> Result<()> {
    let rendered = match format {
        "csv" => render_csv(files),
        "json" => render_json(files)?,
        other => anyhow::bail!("unknown output format: {other}"),
    };
    write_output(output, &rendered)
}

fn write_output(output: &Path, contents: &str) -> Result<()> {
    let mut file = std::fs::File::create(output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(())
}

pub fn render_csv(files: &[SourceFile]) -> String {
    let mut out = String::from("file,hook,line,description\n");
    for file in files.iter().filter(|f| f.has_hooks()) {
        out.push_str(&csv_field(&file.path));
        out.push_str(",,,\n");
        for hook in &file.hooks {
            out.push(',');
            out.push_str(&csv_field(&hook.name));
            out.push(',');
            out.push_str(&hook.line.to_string());
            out.push(',');
            out.push_str(&csv_field(&hook.doc.description));
            out.push('\n');
        }
    }
    out
}

pub fn render_json(files: &[SourceFile]) -> Result<String> {
    let mut document = serde_json::Map::new();
    for file in files.iter().filter(|f| f.has_hooks()) {
        let mut hooks = serde_json::Map::new();
        for hook in &file.hooks {
            hooks.insert(
                hook.name.clone(),
                json!({ "start": hook.line, "doc": hook.doc }),
            );
        }
        document.insert(file.path.clone(), hooks.into());
    }
    let rendered = serde_json::to_string_pretty(&serde_json::Value::Object(document))
        .context("Failed to serialize document")?;
    Ok(rendered)
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use hookdoc_core::walk_program;
    use mago_database::file::FileId;

    fn build(php: &str, path: &str) -> SourceFile {
        let arena = Bump::new();
        let program = mago_syntax::parser::parse_file_content(&arena, FileId::new(path), php);
        let walk = walk_program(program, php);
        hookdoc_model::source_file(walk, path, "/srv/wp", "").unwrap()
    }

    #[test]
    fn test_csv_lists_hook_rows_under_path_row() {
        let file = build(
            concat!(
                "<?php\n",
                "/** Fires at init. */\n",
                "do_action('init');\n",
                "apply_filters('the_title', $title);\n",
            ),
            "wp-settings.php",
        );
        let csv = render_csv(&[file]);
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "file,hook,line,description");
        assert_eq!(lines[1], "wp-settings.php,,,");
        assert_eq!(lines[2], ",init,3,Fires at init.");
        assert_eq!(lines[3], ",the_title,4,");
    }

    #[test]
    fn test_csv_quotes_fields_with_commas() {
        let file = build(
            "<?php\n/** One, two. */\ndo_action('go');\n",
            "go.php",
        );
        let csv = render_csv(&[file]);
        assert!(csv.contains(",go,3,\"One, two.\""));
    }

    #[test]
    fn test_hookless_files_are_omitted() {
        let with = build("<?php do_action('init');", "a.php");
        let without = build("<?php function noop() {}", "b.php");
        let files = vec![with, without];

        let csv = render_csv(&files);
        assert!(csv.contains("a.php"));
        assert!(!csv.contains("b.php"));

        let json: serde_json::Value = serde_json::from_str(&render_json(&files).unwrap()).unwrap();
        assert!(json.get("a.php").is_some());
        assert!(json.get("b.php").is_none());
    }

    #[test]
    fn test_json_shape() {
        let file = build(
            concat!(
                "<?php\n",
                "/**\n",
                " * Fires once loaded.\n",
                " *\n",
                " * @since 2.0.0\n",
                " */\n",
                "do_action('loaded', $screen);\n",
            ),
            "wp-admin/admin.php",
        );
        let json: serde_json::Value =
            serde_json::from_str(&render_json(&[file]).unwrap()).unwrap();
        let hook = &json["wp-admin/admin.php"]["loaded"];
        assert_eq!(hook["start"], 7);
        assert_eq!(hook["doc"]["description"], "Fires once loaded.");
        assert_eq!(hook["doc"]["tags"][0]["name"], "since");
    }

    #[test]
    fn test_empty_document_exports_are_well_formed() {
        assert_eq!(render_csv(&[]), "file,hook,line,description\n");
        assert_eq!(render_json(&[]).unwrap(), "{}");
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("hooks.csv");
        export(&[], "csv", &out).unwrap();
        assert_eq!(
            std::fs::read_to_string(&out).unwrap(),
            "file,hook,line,description\n"
        );
        assert!(export(&[], "xml", &out).is_err());
    }
}
