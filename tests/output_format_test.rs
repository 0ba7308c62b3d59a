//! Tests for the JSON and SARIF report formats and the file-level pipeline.

use std::path::PathBuf;

use swiftcheck::cli::{collect_files, lint_files};
use swiftcheck::detect::{LintResult, Runner};
use swiftcheck::report::{build_json_report, render_sarif, JsonReport};
use swiftcheck::Configuration;

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn lint_testdata() -> LintResult {
    let testdata = testdata_path();
    let config = Configuration::default();
    let files = collect_files(&testdata, &config).expect("should walk testdata");
    lint_files(&files, &Runner::new(&config))
}

fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

#[test]
fn test_collects_only_swift_fixtures() {
    let files = collect_files(&testdata_path(), &Configuration::default()).unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["clean.swift", "suppressed.swift", "violations.swift"]);
}

#[test]
fn test_lint_result_totals() {
    let result = lint_testdata();
    assert_eq!(result.scanned, 3);
    assert_eq!(result.diagnostic_count(), 4);
    assert_eq!(result.suppressed_count(), 3);
    assert!(result.has_errors());

    let suppressed = result
        .files
        .iter()
        .find(|f| file_name(&f.file) == "suppressed.swift")
        .unwrap();
    assert!(suppressed.diagnostics.is_empty());
    let rules: Vec<_> = suppressed
        .suppressed
        .iter()
        .map(|s| s.diagnostic.rule.as_str())
        .collect();
    assert_eq!(rules, vec!["force-cast", "trailing-semicolon", "trailing-semicolon"]);
}

#[test]
fn test_json_report_structure() {
    let report = build_json_report("testdata", None, &lint_testdata());

    assert_eq!(report.version, env!("CARGO_PKG_VERSION"));
    assert_eq!(report.files_scanned, 3);
    assert_eq!(report.errors, 3);
    assert_eq!(report.warnings, 1);
    assert_eq!(report.suppressed_count, 3);

    let force_try = report
        .diagnostics
        .iter()
        .find(|d| d.rule == "force-try")
        .unwrap();
    assert_eq!(file_name(&force_try.file), "violations.swift");
    assert_eq!(force_try.severity, "error");
    assert_eq!((force_try.from.line, force_try.from.column), (7, 15));
}

#[test]
fn test_json_field_names() {
    let report = build_json_report("testdata", Some("swiftcheck.yaml"), &lint_testdata());
    let value = serde_json::to_value(&report).unwrap();

    for field in [
        "version",
        "path",
        "config",
        "files_scanned",
        "errors",
        "warnings",
        "diagnostics",
        "suppressed",
        "suppressed_count",
    ] {
        assert!(value.get(field).is_some(), "missing field {}", field);
    }

    let diagnostic = &value["diagnostics"][0];
    for field in ["file", "rule", "severity", "message", "from", "to"] {
        assert!(diagnostic.get(field).is_some(), "missing field {}", field);
    }
    assert!(diagnostic["from"].get("line").is_some());
    assert!(diagnostic["from"].get("column").is_some());

    let suppression = &value["suppressed"][0]["suppression"];
    assert!(suppression.get("type").is_some());

    let parsed: JsonReport = serde_json::from_value(value).unwrap();
    assert_eq!(parsed.diagnostics.len(), 4);
}

#[test]
fn test_sarif_document() {
    let testdata = testdata_path();
    let sarif = render_sarif(&testdata, &lint_testdata()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&sarif).unwrap();

    assert_eq!(value["version"], "2.1.0");
    assert!(value["$schema"].as_str().unwrap().contains("sarif-schema-2.1.0"));

    let run = &value["runs"][0];
    assert_eq!(run["tool"]["driver"]["name"], "swiftcheck");

    let results = run["results"].as_array().unwrap();
    assert_eq!(results.len(), 4);

    let type_name = results.iter().find(|r| r["ruleId"] == "type-name").unwrap();
    assert_eq!(type_name["level"], "warning");
    let location = &type_name["locations"][0]["physicalLocation"];
    assert_eq!(location["artifactLocation"]["uri"], "violations.swift");
    assert_eq!(location["region"]["startLine"], 3);
    assert_eq!(location["region"]["startColumn"], 1);
    assert_eq!(location["region"]["endColumn"], 16);

    let rule_ids: Vec<_> = run["tool"]["driver"]["rules"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        rule_ids,
        vec!["empty-count-comparison", "force-try", "type-name", "variable-name"]
    );
}
