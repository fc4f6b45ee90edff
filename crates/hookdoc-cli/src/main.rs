mod config;
mod discover;
mod document;
mod export;
mod output;
mod plugin;
mod process;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use config::Config;
use output::Reporter;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "hookdoc",
    about = "Extract WordPress hook documentation from PHP source trees",
    version
)]
struct Cli {
    /// Files or directories to scan
    #[arg(default_value = ".")]
    paths: Vec<PathBuf>,

    /// Output format: csv or json (default csv)
    #[arg(long)]
    format: Option<String>,

    /// Output file (defaults to hookdoc.<format>)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Additional directory names to exclude
    #[arg(long)]
    exclude: Vec<String>,

    /// Use a specific config file instead of searching for .hookdoc.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ignore any config file
    #[arg(long)]
    no_config: bool,

    /// Report each file as it is processed
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red(), e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = if cli.no_config {
        Config::default()
    } else if let Some(path) = &cli.config {
        Config::load_path(path)?
    } else {
        match Config::load()? {
            Some((config, path)) => {
                if cli.verbose {
                    println!("Using config: {}", path.display());
                }
                config
            }
            None => Config::default(),
        }
    };

    let format = resolve_format(cli.format, config.output.format)?;

    let mut excludes = config.paths.exclude;
    excludes.extend(cli.exclude);

    let reporter = Reporter::new(cli.verbose);

    let mut all_paths = Vec::new();
    let mut root = None;
    for path in &cli.paths {
        if !path.exists() {
            reporter.warn_missing_path(path);
            continue;
        }
        if root.is_none() {
            root = Some(if path.is_file() {
                path.parent().unwrap_or(path).to_path_buf()
            } else {
                path.clone()
            });
        }
        all_paths.extend(discover::php_files(path, &excludes));
    }

    let root = match root {
        Some(root) => root,
        None => anyhow::bail!("no input paths exist"),
    };

    let doc = document::build_document(&root, &all_paths);

    for file in &doc.files {
        reporter.file_processed(&file.path, file.hooks.len());
    }
    for failure in &doc.failures {
        reporter.warn_failure(&failure.path, &failure.reason);
    }

    let output = cli
        .output
        .or_else(|| config.output.file.map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(format!("hookdoc.{format}")));
    export::export(&doc.files, &format, &output)?;

    reporter.summary(&doc, &output);

    Ok(ExitCode::SUCCESS)
}

/// An explicit `--format` always wins; the config file only fills in when
/// the flag is absent.
fn resolve_format(flag: Option<String>, config: Option<String>) -> Result<String> {
    let format = flag
        .or(config)
        .unwrap_or_else(|| "csv".to_string());
    if format != "csv" && format != "json" {
        anyhow::bail!("unknown output format: {format} (expected csv or json)");
    }
    Ok(format)
}
