//! Command-line interface for swiftcheck.

use clap::{Parser, Subcommand};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::Configuration;
use crate::detect::{
    filter_suppressed, parse_suppressions, FileDiagnostics, LintResult, RuleId, Runner,
};
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Default configuration file names to search for.
const DEFAULT_CONFIG_NAMES: &[&str] = &["swiftcheck.yaml", ".swiftcheck.yaml"];

/// Directories never descended into.
const SKIPPED_DIRS: &[&str] = &["Pods", "Carthage", "DerivedData"];

/// Template written by `swiftcheck init`.
const DEFAULT_TEMPLATE: &str = include_str!("templates/default.yaml");

/// Fast, approximate style checker for Swift source.
///
/// Swiftcheck recovers functions, types and bindings with brace-depth
/// scanning instead of a full parser, then checks whitespace and
/// punctuation patterns, function and type size limits, and naming.
#[derive(Parser)]
#[command(name = "swiftcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check Swift files for style violations
    #[command(visible_alias = "check")]
    Lint(LintArgs),
    /// Create a swiftcheck configuration file
    Init(InitArgs),
    /// List the built-in rules
    Rules,
}

/// Arguments for the lint command.
#[derive(Parser)]
pub struct LintArgs {
    /// Path to check (file or directory)
    pub path: PathBuf,

    /// Path to configuration YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format: pretty, json, or sarif
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Show suppressed diagnostics in output
    #[arg(long)]
    pub show_suppressed: bool,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "swiftcheck.yaml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Discover a configuration file in the current directory.
fn discover_config() -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
}

/// Collect Swift files under `root`.
pub fn collect_files(root: &Path, config: &Configuration) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            // Hidden directories include .build and .git
            !name.starts_with('.') && !SKIPPED_DIRS.iter().any(|skipped| name == *skipped)
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("swift") {
            continue;
        }
        let relative = path.strip_prefix(root).unwrap_or(path);
        if config.is_path_excluded(relative) {
            debug!(path = %path.display(), "excluded by configuration");
            continue;
        }
        files.push(path.to_path_buf());
    }

    Ok(files)
}

/// Analyze one source text and split off suppressed diagnostics.
pub fn lint_source(file: &str, content: &str, runner: &Runner) -> FileDiagnostics {
    let diagnostics = runner.analyze(content);
    let suppressions = parse_suppressions(content);
    let (diagnostics, suppressed) = filter_suppressed(diagnostics, &suppressions);

    FileDiagnostics {
        file: file.to_string(),
        diagnostics,
        suppressed,
    }
}

/// Analyze files in parallel. Unreadable files are skipped with a warning.
pub fn lint_files(files: &[PathBuf], runner: &Runner) -> LintResult {
    let results: Vec<FileDiagnostics> = files
        .par_iter()
        .filter_map(|path| match std::fs::read_to_string(path) {
            Ok(content) => Some(lint_source(&path.to_string_lossy(), &content, runner)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable file");
                None
            }
        })
        .collect();

    LintResult {
        scanned: results.len(),
        files: results,
    }
}

/// Load the configuration named on the command line, or discover one.
fn load_config(explicit: Option<&Path>) -> anyhow::Result<(Configuration, Option<PathBuf>)> {
    let path = match explicit {
        Some(p) => Some(p.to_path_buf()),
        None => discover_config(),
    };

    let config = match &path {
        Some(p) => Configuration::parse_file(p)
            .map_err(|e| anyhow::anyhow!("{}: {}", p.display(), e))?,
        None => Configuration::default(),
    };
    config.validate()?;

    Ok((config, path))
}

/// Run the lint command.
pub fn run_lint(args: &LintArgs) -> anyhow::Result<i32> {
    if args.format != "pretty" && args.format != "json" && args.format != "sarif" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty', 'json', or 'sarif'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    let (config, config_path) = match load_config(args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: invalid configuration: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let abs_path = match args.path.canonicalize() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: cannot access path {:?}: {}", args.path, e);
            return Ok(EXIT_ERROR);
        }
    };

    let files = if abs_path.is_dir() {
        collect_files(&abs_path, &config)?
    } else {
        vec![abs_path.clone()]
    };

    if files.is_empty() {
        eprintln!("Warning: no Swift files to scan");
        return Ok(EXIT_SUCCESS);
    }
    debug!(files = files.len(), "collected files");

    let runner = Runner::new(&config);
    let result = lint_files(&files, &runner);

    let path_str = args.path.to_string_lossy().to_string();
    let config_str = config_path.map(|p| p.to_string_lossy().to_string());

    match args.format.as_str() {
        "json" => report::write_json(&path_str, config_str.as_deref(), &result)?,
        "sarif" => report::write_sarif(&abs_path, &result)?,
        _ => report::write_pretty(&path_str, config_str.as_deref(), &result, args.show_suppressed),
    }

    if result.has_errors() {
        Ok(EXIT_FAILED)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    if args.output.exists() && !args.force {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Use --force to overwrite it or --output to choose another path");
        return Ok(EXIT_ERROR);
    }

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    if let Err(e) = std::fs::write(&args.output, DEFAULT_TEMPLATE) {
        eprintln!("Error: failed to write configuration: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to tune thresholds and rules", args.output.display());
    println!("  2. Run: swiftcheck lint . --config {}", args.output.display());

    Ok(EXIT_SUCCESS)
}

/// List the built-in rules.
pub fn run_rules() -> anyhow::Result<i32> {
    println!("Built-in rules:");
    println!();

    for rule in RuleId::ALL {
        let info = report::rule_info(rule);
        println!(
            "  {:<28} {:<8} {}",
            rule.as_str(),
            info.default_severity.to_string(),
            info.description
        );
    }

    println!();
    println!("Disable rules with `disabled_rules` in swiftcheck.yaml.");

    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_template_parses() {
        let config = Configuration::from_yaml(DEFAULT_TEMPLATE).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.thresholds.function_complexity.warning, 10);
    }

    #[test]
    fn test_collect_files_skips_dependencies_and_hidden_dirs() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        for dir in ["App", "Pods/Lib", ".build/debug", "App/Generated"] {
            std::fs::create_dir_all(root.join(dir)).unwrap();
        }
        std::fs::write(root.join("App/View.swift"), "").unwrap();
        std::fs::write(root.join("App/notes.md"), "").unwrap();
        std::fs::write(root.join("App/Generated/Model.swift"), "").unwrap();
        std::fs::write(root.join("Pods/Lib/Lib.swift"), "").unwrap();
        std::fs::write(root.join(".build/debug/Out.swift"), "").unwrap();

        let config = Configuration {
            excluded_paths: vec!["**/Generated/**".to_string()],
            ..Default::default()
        };
        let files = collect_files(root, &config).unwrap();
        assert_eq!(files, vec![root.join("App/View.swift")]);
    }

    #[test]
    fn test_lint_source_applies_suppressions() {
        let content = "// swiftcheck:ignore-next-line force-cast - Checked above\nlet view = thing as! View\nlet data = try! load()\n";
        let result = lint_source("View.swift", content, &Runner::default());

        let rules: Vec<_> = result.diagnostics.iter().map(|d| d.rule.as_str()).collect();
        assert_eq!(rules, vec!["force-try"]);
        assert_eq!(result.suppressed.len(), 1);
        assert_eq!(result.suppressed[0].diagnostic.rule, "force-cast");
    }

    #[test]
    fn test_lint_files_counts_scanned() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("A.swift");
        let b = temp.path().join("B.swift");
        std::fs::write(&a, "let value = 1\n").unwrap();
        std::fs::write(&b, "let value = 1;\n").unwrap();

        let result = lint_files(&[a, b, temp.path().join("missing.swift")], &Runner::default());
        assert_eq!(result.scanned, 2);
        assert_eq!(result.diagnostic_count(), 1);
        assert!(!result.has_errors());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let temp = TempDir::new().unwrap();
        let output = temp.path().join("swiftcheck.yaml");
        let args = InitArgs {
            output: output.clone(),
            force: false,
        };

        assert_eq!(run_init(&args).unwrap(), EXIT_SUCCESS);
        assert_eq!(run_init(&args).unwrap(), EXIT_ERROR);

        let forced = InitArgs {
            output,
            force: true,
        };
        assert_eq!(run_init(&forced).unwrap(), EXIT_SUCCESS);
    }
}
