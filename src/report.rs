//! Output formatting for swiftcheck results.
//!
//! Supports three output formats:
//! - Pretty: colored terminal output, 1-based line and column
//! - JSON: structured output with the engine's 0-based positions
//! - SARIF: Static Analysis Results Interchange Format for IDE/CI integration

use colored::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use crate::analysis::Position;
use crate::detect::{Diagnostic, LintResult, RuleId, Severity, SuppressedDiagnostic};

// =============================================================================
// Rule metadata
// =============================================================================

/// Human-facing description of a rule.
#[derive(Debug, Clone, Copy)]
pub struct RuleInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub default_severity: Severity,
}

/// Metadata for a built-in rule.
pub fn rule_info(rule: RuleId) -> RuleInfo {
    let (name, description, default_severity) = match rule {
        RuleId::ClosingBraceSpacing => (
            "ClosingBraceSpacing",
            "No whitespace between a closing brace and a closing parenthesis",
            Severity::Warning,
        ),
        RuleId::ColonSpacing => (
            "ColonSpacing",
            "Type annotation colons sit next to the identifier, followed by one space",
            Severity::Warning,
        ),
        RuleId::CommaSpacing => (
            "CommaSpacing",
            "No space before a comma and exactly one after",
            Severity::Warning,
        ),
        RuleId::ConditionalReturnNewline => (
            "ConditionalReturnNewline",
            "`if`/`guard` bodies return on their own line",
            Severity::Warning,
        ),
        RuleId::ControlStatementParens => (
            "ControlStatementParens",
            "Control statement conditions are not wrapped in parentheses",
            Severity::Warning,
        ),
        RuleId::EmptyCountComparison => (
            "EmptyCountComparison",
            "Use `isEmpty` instead of comparing `count` to zero",
            Severity::Error,
        ),
        RuleId::ForceCast => ("ForceCast", "Avoid `as!`", Severity::Error),
        RuleId::ForceTry => ("ForceTry", "Avoid `try!`", Severity::Error),
        RuleId::LeadingWhitespace => (
            "LeadingWhitespace",
            "Files do not start with whitespace",
            Severity::Warning,
        ),
        RuleId::LegacyGeometryFunctions => (
            "LegacyGeometryFunctions",
            "Prefer CGRect properties and methods over legacy C functions",
            Severity::Warning,
        ),
        RuleId::OpeningBraceStyle => (
            "OpeningBraceStyle",
            "Opening braces follow one space on the declaration's line",
            Severity::Warning,
        ),
        RuleId::RedundantNilCoalescing => (
            "RedundantNilCoalescing",
            "`?? nil` has no effect",
            Severity::Warning,
        ),
        RuleId::ReturnArrowSpacing => (
            "ReturnArrowSpacing",
            "One space on each side of a return arrow",
            Severity::Warning,
        ),
        RuleId::TrailingNewline => (
            "TrailingNewline",
            "Files end with exactly one newline",
            Severity::Warning,
        ),
        RuleId::TrailingSemicolon => (
            "TrailingSemicolon",
            "Lines do not end with a semicolon",
            Severity::Warning,
        ),
        RuleId::TrailingWhitespace => (
            "TrailingWhitespace",
            "Lines do not end with whitespace",
            Severity::Warning,
        ),
        RuleId::ExcessVerticalWhitespace => (
            "ExcessVerticalWhitespace",
            "At most one consecutive blank line",
            Severity::Warning,
        ),
        RuleId::FunctionComplexity => (
            "FunctionComplexity",
            "Branching keywords per function (warning above 10, error above 20)",
            Severity::Warning,
        ),
        RuleId::FunctionBodyLength => (
            "FunctionBodyLength",
            "Lines per function (warning above 40, error above 100)",
            Severity::Warning,
        ),
        RuleId::FunctionParameterCount => (
            "FunctionParameterCount",
            "Parameters per function (warning above 5, error above 8)",
            Severity::Warning,
        ),
        RuleId::FunctionNestingDepth => (
            "FunctionNestingDepth",
            "Brace nesting per function (warning above 5)",
            Severity::Warning,
        ),
        RuleId::VariableName => (
            "VariableName",
            "Binding and parameter names: 3 to 40 alphanumerics, lowerCamelCase",
            Severity::Warning,
        ),
        RuleId::TypeNestingDepth => (
            "TypeNestingDepth",
            "Brace nesting per type (warning above 1)",
            Severity::Warning,
        ),
        RuleId::TypeBodyLength => (
            "TypeBodyLength",
            "Lines per type (warning above 200, error above 350)",
            Severity::Warning,
        ),
        RuleId::TypeName => (
            "TypeName",
            "Type and alias names: 3 to 40 alphanumerics, UpperCamelCase",
            Severity::Warning,
        ),
    };

    RuleInfo {
        name,
        description,
        default_severity,
    }
}

fn one_based(p: Position) -> (usize, usize) {
    (p.line + 1, p.column + 1)
}

// =============================================================================
// JSON Format
// =============================================================================

/// JSON report document.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<String>,
    pub files_scanned: usize,
    pub errors: usize,
    pub warnings: usize,
    pub diagnostics: Vec<JsonDiagnostic>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suppressed: Vec<JsonSuppressedDiagnostic>,
    pub suppressed_count: usize,
}

/// One diagnostic, positions 0-based as the engine emits them.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonDiagnostic {
    pub file: String,
    pub rule: String,
    pub severity: String,
    pub message: String,
    pub from: Position,
    pub to: Position,
}

/// Suppressed diagnostic with suppression info.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonSuppressedDiagnostic {
    pub diagnostic: JsonDiagnostic,
    pub suppression: JsonSuppression,
}

/// Suppression directive info.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonSuppression {
    pub rule: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    pub line: usize,
    #[serde(rename = "type")]
    pub suppression_type: String,
}

fn diagnostic_to_json(file: &str, d: &Diagnostic) -> JsonDiagnostic {
    JsonDiagnostic {
        file: file.to_string(),
        rule: d.rule.clone(),
        severity: d.severity.to_string(),
        message: d.message.clone(),
        from: d.from,
        to: d.to,
    }
}

/// Build the JSON document for a lint result.
pub fn build_json_report(path: &str, config_path: Option<&str>, result: &LintResult) -> JsonReport {
    let diagnostics = result
        .diagnostics()
        .map(|(file, d)| diagnostic_to_json(file, d))
        .collect();

    let suppressed = result
        .files
        .iter()
        .flat_map(|f| {
            f.suppressed.iter().map(move |sd| JsonSuppressedDiagnostic {
                diagnostic: diagnostic_to_json(&f.file, &sd.diagnostic),
                suppression: JsonSuppression {
                    rule: sd.suppression.rule.clone(),
                    reason: sd.suppression.reason.clone(),
                    line: sd.suppression.line,
                    suppression_type: format!("{:?}", sd.suppression.suppression_type)
                        .to_lowercase(),
                },
            })
        })
        .collect();

    JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        path: path.to_string(),
        config: config_path.map(str::to_string),
        files_scanned: result.scanned,
        errors: result.count_by_severity(Severity::Error),
        warnings: result.count_by_severity(Severity::Warning),
        diagnostics,
        suppressed,
        suppressed_count: result.suppressed_count(),
    }
}

/// Write results in JSON format.
pub fn write_json(path: &str, config_path: Option<&str>, result: &LintResult) -> anyhow::Result<()> {
    let report = build_json_report(path, config_path, result);
    let json = serde_json::to_string_pretty(&report)?;
    println!("{}", json);
    Ok(())
}

// =============================================================================
// SARIF Format
// =============================================================================

const SARIF_VERSION: &str = "2.1.0";
const SARIF_SCHEMA: &str = "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";
const TOOL_NAME: &str = "swiftcheck";

#[derive(Serialize, Deserialize)]
struct SarifReport {
    version: String,
    #[serde(rename = "$schema")]
    schema: String,
    runs: Vec<SarifRun>,
}

#[derive(Serialize, Deserialize)]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Serialize, Deserialize)]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Serialize, Deserialize)]
struct SarifDriver {
    name: String,
    version: String,
    rules: Vec<SarifRule>,
}

#[derive(Serialize, Deserialize)]
struct SarifRule {
    id: String,
    name: String,
    #[serde(rename = "shortDescription")]
    short_description: SarifMessage,
    #[serde(rename = "defaultConfiguration")]
    default_config: SarifRuleConfig,
}

#[derive(Serialize, Deserialize)]
struct SarifRuleConfig {
    level: String,
}

#[derive(Serialize, Deserialize)]
struct SarifResult {
    #[serde(rename = "ruleId")]
    rule_id: String,
    level: String,
    message: SarifMessage,
    locations: Vec<SarifLocation>,
}

#[derive(Serialize, Deserialize)]
struct SarifMessage {
    text: String,
}

#[derive(Serialize, Deserialize)]
struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    physical_location: SarifPhysicalLocation,
}

#[derive(Serialize, Deserialize)]
struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    artifact_location: SarifArtifact,
    region: SarifRegion,
}

#[derive(Serialize, Deserialize)]
struct SarifArtifact {
    uri: String,
}

#[derive(Serialize, Deserialize)]
struct SarifRegion {
    #[serde(rename = "startLine")]
    start_line: usize,
    #[serde(rename = "startColumn")]
    start_column: usize,
    #[serde(rename = "endLine")]
    end_line: usize,
    #[serde(rename = "endColumn")]
    end_column: usize,
}

fn map_severity_to_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
    }
}

fn make_relative_path(file_path: &str, base_path: &Path) -> String {
    if base_path.as_os_str().is_empty() {
        return file_path.to_string();
    }

    let file = Path::new(file_path);

    // Single file scan: just the file name
    if file == base_path {
        return file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file_path.to_string());
    }

    file.strip_prefix(base_path)
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .unwrap_or_else(|_| file_path.to_string())
}

/// Render results as a SARIF document.
pub fn render_sarif(base_path: &Path, result: &LintResult) -> anyhow::Result<String> {
    let rule_set: BTreeSet<&str> = result.diagnostics().map(|(_, d)| d.rule.as_str()).collect();

    let rules: Vec<SarifRule> = rule_set
        .iter()
        .map(|rule_id| {
            let (name, description, level) = match RuleId::parse(rule_id) {
                Some(rule) => {
                    let info = rule_info(rule);
                    (
                        info.name.to_string(),
                        info.description.to_string(),
                        map_severity_to_level(info.default_severity),
                    )
                }
                None => (rule_id.to_string(), "Custom pattern rule".to_string(), "warning"),
            };
            SarifRule {
                id: rule_id.to_string(),
                name,
                short_description: SarifMessage { text: description },
                default_config: SarifRuleConfig {
                    level: level.to_string(),
                },
            }
        })
        .collect();

    let results: Vec<SarifResult> = result
        .diagnostics()
        .map(|(file, d)| {
            let (start_line, start_column) = one_based(d.from);
            let (end_line, end_column) = one_based(d.to);
            SarifResult {
                rule_id: d.rule.clone(),
                level: map_severity_to_level(d.severity).to_string(),
                message: SarifMessage {
                    text: d.message.clone(),
                },
                locations: vec![SarifLocation {
                    physical_location: SarifPhysicalLocation {
                        artifact_location: SarifArtifact {
                            uri: make_relative_path(file, base_path),
                        },
                        region: SarifRegion {
                            start_line,
                            start_column,
                            end_line,
                            end_column,
                        },
                    },
                }],
            }
        })
        .collect();

    let report = SarifReport {
        version: SARIF_VERSION.to_string(),
        schema: SARIF_SCHEMA.to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: TOOL_NAME.to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    rules,
                },
            },
            results,
        }],
    };

    Ok(serde_json::to_string_pretty(&report)?)
}

/// Write results in SARIF format.
pub fn write_sarif(base_path: &Path, result: &LintResult) -> anyhow::Result<()> {
    println!("{}", render_sarif(base_path, result)?);
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write results in pretty (human-readable) format.
pub fn write_pretty(path: &str, config_path: Option<&str>, result: &LintResult, show_suppressed: bool) {
    println!();
    print!("  ");
    print!("{}", "swiftcheck".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Scanning: ".dimmed());
    println!("{} ({} files)", path, result.scanned);
    print!("  {}", "Config:   ".dimmed());
    println!("{}", config_path.unwrap_or("(defaults)"));
    println!();

    for file in &result.files {
        if !file.diagnostics.is_empty() {
            write_file_diagnostics(&file.file, &file.diagnostics);
            println!();
        }
    }

    let suppressed: Vec<(&str, &SuppressedDiagnostic)> = result
        .files
        .iter()
        .flat_map(|f| f.suppressed.iter().map(move |s| (f.file.as_str(), s)))
        .collect();
    if !suppressed.is_empty() {
        write_suppressed_summary(&suppressed, show_suppressed);
        println!();
    }

    write_final_status(result);
    println!();
}

fn write_file_diagnostics(file: &str, diagnostics: &[Diagnostic]) {
    println!("  {} ({}):", file.blue().bold(), diagnostics.len());

    for d in diagnostics {
        let (line, column) = one_based(d.from);
        write_severity_tag(d.severity);
        print!("{}", format!("{:>5}:{:<4}", line, column).dimmed());
        print!(" {:<28}", d.rule.dimmed());
        println!("{}", d.message);
    }
}

fn write_severity_tag(severity: Severity) {
    match severity {
        Severity::Error => print!("    {} ", "ERROR".red()),
        Severity::Warning => print!("    {} ", "WARN ".yellow()),
    }
}

fn write_final_status(result: &LintResult) {
    let errors = result.count_by_severity(Severity::Error);
    let warnings = result.count_by_severity(Severity::Warning);

    if errors > 0 {
        print!("  {}", "✗ FAIL".red());
    } else {
        print!("  {}", "✓ PASS".green());
    }

    let error_text = format!("{} error{}", errors, if errors == 1 { "" } else { "s" });
    let warning_text = format!("{} warning{}", warnings, if warnings == 1 { "" } else { "s" });
    print!(
        "  {}  {}",
        if errors > 0 { error_text.red() } else { error_text.normal() },
        if warnings > 0 { warning_text.yellow() } else { warning_text.normal() },
    );

    let suppressed = result.suppressed_count();
    if suppressed > 0 {
        print!("  {}", format!("({} suppressed)", suppressed).dimmed());
    }
    println!();
}

fn write_suppressed_summary(suppressed: &[(&str, &SuppressedDiagnostic)], show_details: bool) {
    println!("  {} ({}):", "Suppressed".dimmed(), suppressed.len());

    if !show_details {
        println!("    {}", "(use --show-suppressed to see details)".dimmed());
        return;
    }

    println!();
    for (file, sd) in suppressed {
        let d = &sd.diagnostic;
        let s = &sd.suppression;
        let (line, _) = one_based(d.from);

        print!("    {:<28}", d.rule.dimmed());
        print!("{}", file.blue());
        if matches!(s.suppression_type, crate::detect::SuppressionType::File) {
            print!("{}", ":* (file)".dimmed());
        } else {
            print!("{}", format!(":{}", line).dimmed());
        }
        println!();

        if !s.reason.is_empty() {
            println!("            {}", format!("reason: {:?}", s.reason).dimmed());
        }
    }
}
