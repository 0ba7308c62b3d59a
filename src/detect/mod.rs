//! Rule families and diagnostic aggregation.

mod functions;
mod naming;
mod patterns;
mod runner;
mod suppress;
mod type_rules;
mod types;

pub use functions::{complexity, FunctionRule};
pub use naming::{check_binding, check_type_name, is_valid_type_name};
pub use patterns::{builtin_pattern_rules, PatternRule};
pub use runner::{Rule, Runner};
pub use suppress::{
    filter_suppressed, matches_suppression, parse_suppressions, SuppressedDiagnostic,
    Suppression, SuppressionType,
};
pub use type_rules::TypeRule;
pub use types::{Diagnostic, FileDiagnostics, LintResult, RawFinding, RuleId, Severity};
