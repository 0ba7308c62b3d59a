//! Swiftcheck - fast, approximate style checking for Swift source.
//!
//! Swiftcheck recovers functions, types and bindings from raw text by
//! brace- and paren-depth scanning, without a tokenizer or syntax tree,
//! and evaluates three rule families against them: whole-text patterns,
//! per-function checks, and per-type checks. Every finding is mapped back
//! to a 0-based line/column range.
//!
//! # Architecture
//!
//! - `analysis`: position index, declaration and binding extraction
//! - `detect`: rule families, the `Runner` aggregator, inline suppressions
//! - `config`: YAML configuration (disabled rules, thresholds, custom rules)
//! - `report`: Output formatting (pretty, JSON, SARIF)
//! - `cli`: the `swiftcheck` command-line surface
//!
//! # Example
//!
//! ```
//! use swiftcheck::{analyze, Configuration};
//!
//! let diagnostics = analyze("let view = thing as! View\n", &Configuration::default());
//! assert_eq!(diagnostics[0].rule, "force-cast");
//! assert_eq!(diagnostics[0].from.line, 0);
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod detect;
pub mod report;

pub use analysis::{AnalysisContext, Binding, Declaration, DeclarationKind, Position, PositionIndex};
pub use config::{ConfigError, Configuration, Thresholds};
pub use detect::{Diagnostic, LintResult, RuleId, Runner, Severity};

/// Analyze one source text with the given options.
///
/// Never fails: the worst case is an incomplete diagnostic list. Each call
/// builds its own analysis state, so concurrent calls are independent.
pub fn analyze(text: &str, options: &Configuration) -> Vec<Diagnostic> {
    Runner::new(options).analyze(text)
}
