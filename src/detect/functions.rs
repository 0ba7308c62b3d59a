//! Checks over extracted function declarations.

use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::{AnalysisContext, Declaration};
use crate::config::{Threshold, Thresholds};

use super::naming::check_binding;
use super::{RawFinding, RuleId, Severity};

lazy_static! {
    static ref BRANCH_KEYWORD: Regex = Regex::new(r"\b(?:if|guard|for|while|repeat|func)\b").unwrap();
    static ref SWITCH_KEYWORD: Regex = Regex::new(r"\bswitch\b").unwrap();
    static ref CASE_KEYWORD: Regex = Regex::new(r"\bcase\b").unwrap();
    static ref FALLTHROUGH_KEYWORD: Regex = Regex::new(r"\bfallthrough\b").unwrap();
}

/// The function rule family, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionRule {
    Complexity,
    BodyLength,
    ParameterCount,
    NestingDepth,
    BindingNames,
}

impl FunctionRule {
    pub const ALL: [FunctionRule; 5] = [
        FunctionRule::Complexity,
        FunctionRule::BodyLength,
        FunctionRule::ParameterCount,
        FunctionRule::NestingDepth,
        FunctionRule::BindingNames,
    ];

    pub fn id(&self) -> RuleId {
        match self {
            FunctionRule::Complexity => RuleId::FunctionComplexity,
            FunctionRule::BodyLength => RuleId::FunctionBodyLength,
            FunctionRule::ParameterCount => RuleId::FunctionParameterCount,
            FunctionRule::NestingDepth => RuleId::FunctionNestingDepth,
            FunctionRule::BindingNames => RuleId::VariableName,
        }
    }

    pub fn evaluate(&self, ctx: &AnalysisContext<'_>, thresholds: &Thresholds) -> Vec<RawFinding> {
        match self {
            FunctionRule::Complexity => {
                self.measure_each(ctx, &thresholds.function_complexity, |f| {
                    (complexity(f), "complexity")
                })
            }
            FunctionRule::BodyLength => {
                self.measure_each(ctx, &thresholds.function_body_length, |f| {
                    (f.line_count(), "lines")
                })
            }
            FunctionRule::ParameterCount => {
                self.measure_each(ctx, &thresholds.function_parameter_count, |f| {
                    (f.parameter_count(), "parameters")
                })
            }
            FunctionRule::NestingDepth => {
                self.measure_each(ctx, &thresholds.function_nesting_depth, |f| {
                    (f.max_depth, "levels of nesting")
                })
            }
            FunctionRule::BindingNames => ctx
                .all_bindings()
                .filter_map(|b| check_binding(&b, thresholds))
                .collect(),
        }
    }

    /// Apply one threshold to a per-function measurement, anchoring each
    /// finding at the function's `func name` header.
    fn measure_each<F>(
        &self,
        ctx: &AnalysisContext<'_>,
        threshold: &Threshold,
        measure: F,
    ) -> Vec<RawFinding>
    where
        F: Fn(&Declaration) -> (usize, &'static str),
    {
        let mut findings = Vec::new();

        for function in ctx.functions() {
            let (value, unit) = measure(function);
            if let Some(severity) = threshold.classify(value) {
                let limit = match severity {
                    Severity::Error => threshold.error.unwrap_or(threshold.warning),
                    Severity::Warning => threshold.warning,
                };
                findings.push(RawFinding::new(
                    self.id().as_str(),
                    function.header(),
                    function.start_offset,
                    severity,
                    format!(
                        "function '{}' has {} {}, exceeds maximum of {}",
                        function.name, value, unit, limit
                    ),
                ));
            }
        }

        findings
    }
}

/// Count branching keywords in a function body.
///
/// Keywords are counted after the function's own opening brace. A `switch`
/// adds its case count minus its `fallthrough` count when that is positive.
pub fn complexity(function: &Declaration) -> usize {
    let body = function.inner_body();
    let mut total = BRANCH_KEYWORD.find_iter(body).count();

    if SWITCH_KEYWORD.is_match(body) {
        let cases = CASE_KEYWORD.find_iter(body).count();
        let fallthroughs = FALLTHROUGH_KEYWORD.find_iter(body).count();
        total += cases.saturating_sub(fallthroughs);
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluate(rule: FunctionRule, text: &str) -> Vec<RawFinding> {
        let ctx = AnalysisContext::new(text);
        rule.evaluate(&ctx, &Thresholds::default())
    }

    fn function_with_ifs(count: usize) -> String {
        let mut text = String::from("func busy() {\n");
        for _ in 0..count {
            text.push_str("    if ready { run() }\n");
        }
        text.push_str("}\n");
        text
    }

    #[test]
    fn test_complexity_thresholds() {
        assert!(evaluate(FunctionRule::Complexity, &function_with_ifs(10)).is_empty());

        let findings = evaluate(FunctionRule::Complexity, &function_with_ifs(11));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert_eq!(findings[0].rule, "function-complexity");
        assert_eq!(findings[0].matched_text, "func busy");
        assert!(findings[0].message.contains("complexity 11"));

        let findings = evaluate(FunctionRule::Complexity, &function_with_ifs(21));
        assert_eq!(findings[0].severity, Severity::Error);
    }

    #[test]
    fn test_complexity_counts_switch_cases() {
        let text = "func pick(v: Int) {\n    switch v {\n    case 1:\n        fallthrough\n    case 2:\n        run()\n    case 3:\n        stop()\n    default:\n        break\n    }\n}\n";
        let ctx = AnalysisContext::new(text);
        // three cases, one fallthrough
        assert_eq!(complexity(&ctx.functions()[0]), 2);
    }

    #[test]
    fn test_complexity_ignores_cases_without_switch() {
        let text = "func check() {\n    if case .some = value { }\n}\n";
        let ctx = AnalysisContext::new(text);
        assert_eq!(complexity(&ctx.functions()[0]), 1);
    }

    #[test]
    fn test_body_length() {
        let mut text = String::from("func long() {\n");
        for _ in 0..39 {
            text.push_str("    step()\n");
        }
        text.push_str("}\n");
        // 41 lines including signature and closing brace
        let findings = evaluate(FunctionRule::BodyLength, &text);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert!(findings[0].message.contains("41 lines"));
    }

    #[test]
    fn test_parameter_count() {
        let text = "func f(a: Int, b: (Int, Int) -> Int, c: String) { }";
        assert!(evaluate(FunctionRule::ParameterCount, text).is_empty());

        let six = "func g(a: Int, b: Int, c: Int, d: Int, e: Int, f: Int) { }";
        let findings = evaluate(FunctionRule::ParameterCount, six);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);

        let nine = "func h(a: Int, b: Int, c: Int, d: Int, e: Int, f: Int, g: Int, i: Int, j: Int) { }";
        assert_eq!(evaluate(FunctionRule::ParameterCount, nine)[0].severity, Severity::Error);
    }

    #[test]
    fn test_nesting_depth_warns_only() {
        let deep = "func deep() { a { b { c { d { e { } } } } } }";
        let findings = evaluate(FunctionRule::NestingDepth, deep);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);

        let fine = "func fine() { a { b { c { d { } } } } }";
        assert!(evaluate(FunctionRule::NestingDepth, fine).is_empty());
    }

    #[test]
    fn test_binding_names_cover_parameters() {
        let text = "let total = 1\nfunc f(x: Int) {\n    let (first, y) = pair\n}\n";
        let findings = evaluate(FunctionRule::BindingNames, text);
        let names: Vec<_> = findings.iter().map(|f| f.matched_text.as_str()).collect();
        // whole-text bindings first, then parameters
        assert_eq!(names, vec!["y", "x"]);
        assert!(findings.iter().all(|f| f.rule == "variable-name"));
    }
}
