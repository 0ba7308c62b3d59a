//! Core types for detection results.

use serde::{Deserialize, Serialize};

use crate::analysis::Position;

/// Severity levels for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" | "warn" => Ok(Severity::Warning),
            _ => Err(format!("unknown severity: {}", s)),
        }
    }
}

/// Identifiers of the built-in rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    // Pattern rules, in catalog order
    ClosingBraceSpacing,
    ColonSpacing,
    CommaSpacing,
    ConditionalReturnNewline,
    ControlStatementParens,
    EmptyCountComparison,
    ForceCast,
    ForceTry,
    LeadingWhitespace,
    LegacyGeometryFunctions,
    OpeningBraceStyle,
    RedundantNilCoalescing,
    ReturnArrowSpacing,
    TrailingNewline,
    TrailingSemicolon,
    TrailingWhitespace,
    ExcessVerticalWhitespace,
    // Function rules
    FunctionComplexity,
    FunctionBodyLength,
    FunctionParameterCount,
    FunctionNestingDepth,
    VariableName,
    // Type rules
    TypeNestingDepth,
    TypeBodyLength,
    TypeName,
}

impl RuleId {
    /// Every built-in rule, in evaluation order.
    pub const ALL: [RuleId; 25] = [
        RuleId::ClosingBraceSpacing,
        RuleId::ColonSpacing,
        RuleId::CommaSpacing,
        RuleId::ConditionalReturnNewline,
        RuleId::ControlStatementParens,
        RuleId::EmptyCountComparison,
        RuleId::ForceCast,
        RuleId::ForceTry,
        RuleId::LeadingWhitespace,
        RuleId::LegacyGeometryFunctions,
        RuleId::OpeningBraceStyle,
        RuleId::RedundantNilCoalescing,
        RuleId::ReturnArrowSpacing,
        RuleId::TrailingNewline,
        RuleId::TrailingSemicolon,
        RuleId::TrailingWhitespace,
        RuleId::ExcessVerticalWhitespace,
        RuleId::FunctionComplexity,
        RuleId::FunctionBodyLength,
        RuleId::FunctionParameterCount,
        RuleId::FunctionNestingDepth,
        RuleId::VariableName,
        RuleId::TypeNestingDepth,
        RuleId::TypeBodyLength,
        RuleId::TypeName,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::ClosingBraceSpacing => "closing-brace-spacing",
            RuleId::ColonSpacing => "colon-spacing",
            RuleId::CommaSpacing => "comma-spacing",
            RuleId::ConditionalReturnNewline => "conditional-return-newline",
            RuleId::ControlStatementParens => "control-statement-parens",
            RuleId::EmptyCountComparison => "empty-count-comparison",
            RuleId::ForceCast => "force-cast",
            RuleId::ForceTry => "force-try",
            RuleId::LeadingWhitespace => "leading-whitespace",
            RuleId::LegacyGeometryFunctions => "legacy-geometry-functions",
            RuleId::OpeningBraceStyle => "opening-brace-style",
            RuleId::RedundantNilCoalescing => "redundant-nil-coalescing",
            RuleId::ReturnArrowSpacing => "return-arrow-spacing",
            RuleId::TrailingNewline => "trailing-newline",
            RuleId::TrailingSemicolon => "trailing-semicolon",
            RuleId::TrailingWhitespace => "trailing-whitespace",
            RuleId::ExcessVerticalWhitespace => "excess-vertical-whitespace",
            RuleId::FunctionComplexity => "function-complexity",
            RuleId::FunctionBodyLength => "function-body-length",
            RuleId::FunctionParameterCount => "function-parameter-count",
            RuleId::FunctionNestingDepth => "function-nesting-depth",
            RuleId::VariableName => "variable-name",
            RuleId::TypeNestingDepth => "type-nesting-depth",
            RuleId::TypeBodyLength => "type-body-length",
            RuleId::TypeName => "type-name",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        RuleId::ALL.iter().copied().find(|rule| rule.as_str() == s)
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A rule violation located by byte offset, before position mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFinding {
    pub rule: String,
    pub matched_text: String,
    pub start_offset: usize,
    pub severity: Severity,
    pub message: String,
}

impl RawFinding {
    pub fn new(
        rule: impl Into<String>,
        matched_text: impl Into<String>,
        start_offset: usize,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule: rule.into(),
            matched_text: matched_text.into(),
            start_offset,
            severity,
            message: message.into(),
        }
    }

    /// Exclusive end offset of the matched text.
    pub fn end_offset(&self) -> usize {
        self.start_offset + self.matched_text.len()
    }
}

/// A finding resolved to a half-open `from..to` position range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub rule: String,
    pub severity: Severity,
    pub message: String,
    pub from: Position,
    pub to: Position,
}

/// Diagnostics for one file, as produced by the command-line runner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileDiagnostics {
    pub file: String,
    pub diagnostics: Vec<Diagnostic>,
    /// Diagnostics that were suppressed by inline comments
    #[serde(default)]
    pub suppressed: Vec<super::SuppressedDiagnostic>,
}

/// Results of linting a set of files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LintResult {
    pub files: Vec<FileDiagnostics>,
    /// Number of files scanned
    pub scanned: usize,
}

impl LintResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// All active diagnostics with their file names.
    pub fn diagnostics(&self) -> impl Iterator<Item = (&str, &Diagnostic)> {
        self.files
            .iter()
            .flat_map(|f| f.diagnostics.iter().map(move |d| (f.file.as_str(), d)))
    }

    /// Total number of active diagnostics.
    pub fn diagnostic_count(&self) -> usize {
        self.files.iter().map(|f| f.diagnostics.len()).sum()
    }

    /// Number of suppressed diagnostics.
    pub fn suppressed_count(&self) -> usize {
        self.files.iter().map(|f| f.suppressed.len()).sum()
    }

    /// Number of active diagnostics at the given severity.
    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.diagnostics()
            .filter(|(_, d)| d.severity == severity)
            .count()
    }

    /// Check if there are any error-severity diagnostics.
    pub fn has_errors(&self) -> bool {
        self.count_by_severity(Severity::Error) > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_id_round_trip_names() {
        for rule in RuleId::ALL {
            assert_eq!(RuleId::parse(rule.as_str()), Some(rule));
        }
        assert_eq!(RuleId::parse("no-such-rule"), None);
    }

    #[test]
    fn test_rule_id_serde_matches_as_str() {
        let json = serde_json::to_string(&RuleId::ForceCast).unwrap();
        assert_eq!(json, "\"force-cast\"");
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!("error".parse::<Severity>().unwrap(), Severity::Error);
        assert_eq!("WARN".parse::<Severity>().unwrap(), Severity::Warning);
        assert!("info".parse::<Severity>().is_err());
        assert!(Severity::Error > Severity::Warning);
    }

    #[test]
    fn test_lint_result_counts() {
        let diag = |severity| Diagnostic {
            rule: "force-cast".to_string(),
            severity,
            message: String::new(),
            from: Position::new(0, 0),
            to: Position::new(0, 3),
        };
        let result = LintResult {
            files: vec![FileDiagnostics {
                file: "a.swift".to_string(),
                diagnostics: vec![diag(Severity::Error), diag(Severity::Warning)],
                suppressed: Vec::new(),
            }],
            scanned: 1,
        };
        assert_eq!(result.diagnostic_count(), 2);
        assert_eq!(result.count_by_severity(Severity::Warning), 1);
        assert!(result.has_errors());
    }
}
