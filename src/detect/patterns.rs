//! Whole-text pattern rules.
//!
//! Each rule is a regex evaluated against the full source text. A rule may
//! carry exception patterns: any finding whose start offset falls inside an
//! exception match is dropped. This is how a multi-line `if` header is
//! allowed to put its brace somewhere the brace-style rule would otherwise
//! reject, and how string literals are kept out of punctuation checks.

use lazy_static::lazy_static;
use regex::Regex;
use std::ops::Range;

use crate::config::{ConfigError, CustomRule};

use super::{RawFinding, RuleId, Severity};

/// Double-quoted string literal on a single line.
const STRING_LITERAL: &str = r#""(?:[^"\\\n]|\\.)*""#;

/// Static description of a built-in pattern rule.
struct BuiltinPattern {
    id: RuleId,
    pattern: &'static str,
    exceptions: &'static [&'static str],
    severity: Severity,
    message: &'static str,
}

static BUILTIN_PATTERNS: &[BuiltinPattern] = &[
    BuiltinPattern {
        id: RuleId::ClosingBraceSpacing,
        pattern: r"\}\s+\)",
        exceptions: &[],
        severity: Severity::Warning,
        message: "Closing brace with closing parenthesis should not have any whitespace in between",
    },
    BuiltinPattern {
        id: RuleId::ColonSpacing,
        // `x:Int`, `x :Int`, `x :  Int`, `x:  Int`, `[String:Int]`
        pattern: r"\b[A-Za-z_][A-Za-z0-9_]*(?:[ \t]+:[ \t]*|:[ \t]{2,}|:)[\[(]*[A-Z]",
        exceptions: &[
            STRING_LITERAL,
            // ternary `cond ? a : B`; a postfix optional `Int?` is not one
            r"\s\?\s[^?:\n]*:",
        ],
        severity: Severity::Warning,
        message: "Colons should be next to the identifier when specifying a type, and followed by a single space",
    },
    BuiltinPattern {
        id: RuleId::CommaSpacing,
        pattern: r"[ \t]+,(?:[^\s]|[ \t]{2,}|\t)?|,(?:[^\s]|[ \t]{2,}|\t)",
        exceptions: &[STRING_LITERAL],
        severity: Severity::Warning,
        message: "There should be no space before and one space after any comma",
    },
    BuiltinPattern {
        id: RuleId::ConditionalReturnNewline,
        pattern: r"\b(?:if|guard)\b[^\n{]*\{[ \t]*return\b",
        exceptions: &[],
        severity: Severity::Warning,
        message: "Conditional statements should always return on the next line",
    },
    BuiltinPattern {
        id: RuleId::ControlStatementParens,
        pattern: r"\b(?:if|guard|for|switch|while)[ \t]*\([^\n{]*\)[ \t]*(?:\{|else\b)",
        exceptions: &[],
        severity: Severity::Warning,
        message: "`if`, `guard`, `for`, `switch` and `while` conditions should not be wrapped in parentheses",
    },
    BuiltinPattern {
        id: RuleId::EmptyCountComparison,
        pattern: r"\.count[ \t]*(?:==|!=|>)[ \t]*0\b",
        exceptions: &[],
        severity: Severity::Error,
        message: "Prefer checking `isEmpty` over comparing `count` to zero",
    },
    BuiltinPattern {
        id: RuleId::ForceCast,
        pattern: r"\bas!",
        exceptions: &[],
        severity: Severity::Error,
        message: "Force casts should be avoided",
    },
    BuiltinPattern {
        id: RuleId::ForceTry,
        pattern: r"\btry!",
        exceptions: &[],
        severity: Severity::Error,
        message: "Force tries should be avoided",
    },
    BuiltinPattern {
        id: RuleId::LeadingWhitespace,
        pattern: r"\A\s+",
        exceptions: &[],
        severity: Severity::Warning,
        message: "Files should not start with whitespace",
    },
    BuiltinPattern {
        id: RuleId::LegacyGeometryFunctions,
        pattern: r"\b(?:CGRectGetWidth|CGRectGetHeight|CGRectGetMinX|CGRectGetMidX|CGRectGetMaxX|CGRectGetMinY|CGRectGetMidY|CGRectGetMaxY|CGRectIsNull|CGRectIsEmpty|CGRectIsInfinite|CGRectStandardize|CGRectIntegral|CGRectInset|CGRectOffset|CGRectUnion|CGRectIntersection|CGRectContainsRect|CGRectContainsPoint|CGRectIntersectsRect)[ \t]*\(",
        exceptions: &[],
        severity: Severity::Warning,
        message: "Struct extension properties and methods are preferred over legacy geometry functions",
    },
    BuiltinPattern {
        id: RuleId::OpeningBraceStyle,
        // `x{`, `x   {`, or a brace alone at the start of a line
        pattern: r"[^\s(\[{$]\{|[^\s][ \t]{2,}\{|\n[ \t]*\{",
        exceptions: &[
            STRING_LITERAL,
            // condition continued after a trailing `,` / `&&` / `||`
            r"\b(?:if|guard|while)\b[^\n{]*(?:,|&&|\|\|)[ \t]*\n[^{]*\{",
            // condition continued with a leading `,` / `&&` / `||`
            r"\b(?:if|guard|while)\b[^\n{]*\n[ \t]*(?:,|&&|\|\|)[^{]*\{",
        ],
        severity: Severity::Warning,
        message: "Opening braces should be preceded by a single space and on the same line as the declaration",
    },
    BuiltinPattern {
        id: RuleId::RedundantNilCoalescing,
        pattern: r"\?\?[ \t]*nil\b",
        exceptions: &[],
        severity: Severity::Warning,
        message: "Nil coalescing with `nil` on the right-hand side is redundant",
    },
    BuiltinPattern {
        id: RuleId::ReturnArrowSpacing,
        // zero or 2+ spaces before the arrow, or anything but one space after it
        pattern: r"[\w)\]>](?:[ \t]{2,})?->|[\w)\]>][ \t]+->(?:[^ \t\n]|[ \t]{2,}|[ \t]*\r?\n)",
        exceptions: &[],
        severity: Severity::Warning,
        message: "Return arrow and return type should be separated by a single space",
    },
    BuiltinPattern {
        id: RuleId::TrailingNewline,
        pattern: r"[^\n]\z|\n(?:[ \t]*\n)+\z",
        exceptions: &[],
        severity: Severity::Warning,
        message: "Files should end with a single trailing newline",
    },
    BuiltinPattern {
        id: RuleId::TrailingSemicolon,
        pattern: r"(?m);[ \t]*\r?$",
        exceptions: &[],
        severity: Severity::Warning,
        message: "Lines should not have trailing semicolons",
    },
    BuiltinPattern {
        id: RuleId::TrailingWhitespace,
        pattern: r"(?m)[ \t]+\r?$",
        exceptions: &[],
        severity: Severity::Warning,
        message: "Lines should not have trailing whitespace",
    },
    BuiltinPattern {
        id: RuleId::ExcessVerticalWhitespace,
        pattern: r"\n(?:[ \t]*\n){2,}",
        exceptions: &[],
        severity: Severity::Warning,
        message: "Limit vertical whitespace to a single empty line",
    },
];

lazy_static! {
    /// Compiled built-in catalog, in catalog order.
    static ref COMPILED_BUILTINS: Vec<PatternRule> = BUILTIN_PATTERNS
        .iter()
        .map(|p| PatternRule {
            id: p.id.as_str().to_string(),
            pattern: Regex::new(p.pattern).unwrap(),
            exceptions: p.exceptions.iter().map(|e| Regex::new(e).unwrap()).collect(),
            severity: p.severity,
            message: p.message.to_string(),
        })
        .collect();
}

/// A pattern rule ready for evaluation.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub id: String,
    pub pattern: Regex,
    pub exceptions: Vec<Regex>,
    pub severity: Severity,
    pub message: String,
}

impl PatternRule {
    /// Build a rule from a user-supplied definition.
    pub fn from_custom(custom: &CustomRule) -> Result<Self, ConfigError> {
        Ok(Self {
            id: custom.id.clone(),
            pattern: custom.compile()?,
            exceptions: Vec::new(),
            severity: custom.severity,
            message: custom.message.clone(),
        })
    }

    /// Offset ranges in which this rule's findings are suppressed.
    fn exception_ranges(&self, text: &str) -> Vec<Range<usize>> {
        self.exceptions
            .iter()
            .flat_map(|e| e.find_iter(text).map(|m| m.range()))
            .collect()
    }

    /// Run the rule over the full text. Findings come out in text order.
    pub fn evaluate(&self, text: &str) -> Vec<RawFinding> {
        let exceptions = self.exception_ranges(text);

        self.pattern
            .find_iter(text)
            .filter(|m| !m.as_str().is_empty())
            .filter(|m| !exceptions.iter().any(|range| range.contains(&m.start())))
            .map(|m| {
                RawFinding::new(
                    self.id.as_str(),
                    m.as_str(),
                    m.start(),
                    self.severity,
                    self.message.as_str(),
                )
            })
            .collect()
    }
}

/// The built-in catalog, in evaluation order.
pub fn builtin_pattern_rules() -> Vec<PatternRule> {
    COMPILED_BUILTINS.iter().cloned().collect()
}
