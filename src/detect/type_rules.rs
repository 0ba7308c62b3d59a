//! Checks over extracted enum, struct and class declarations.

use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::AnalysisContext;
use crate::config::Thresholds;

use super::naming::check_type_name;
use super::{RawFinding, RuleId, Severity};

lazy_static! {
    /// `typealias Name`: an alias has no body, so it is matched directly.
    static ref TYPE_ALIAS: Regex =
        Regex::new(r"\btypealias\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap();
}

/// The type rule family, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRule {
    NestingDepth,
    BodyLength,
    Names,
}

impl TypeRule {
    pub const ALL: [TypeRule; 3] = [TypeRule::NestingDepth, TypeRule::BodyLength, TypeRule::Names];

    pub fn id(&self) -> RuleId {
        match self {
            TypeRule::NestingDepth => RuleId::TypeNestingDepth,
            TypeRule::BodyLength => RuleId::TypeBodyLength,
            TypeRule::Names => RuleId::TypeName,
        }
    }

    pub fn evaluate(&self, ctx: &AnalysisContext<'_>, thresholds: &Thresholds) -> Vec<RawFinding> {
        match self {
            TypeRule::NestingDepth => ctx
                .types()
                .iter()
                .filter_map(|t| {
                    let severity = thresholds.type_nesting_depth.classify(t.max_depth)?;
                    Some(RawFinding::new(
                        self.id().as_str(),
                        t.header(),
                        t.start_offset,
                        severity,
                        format!(
                            "{} '{}' nests {} levels deep, exceeds maximum of {}",
                            t.kind, t.name, t.max_depth, thresholds.type_nesting_depth.warning
                        ),
                    ))
                })
                .collect(),
            TypeRule::BodyLength => {
                let threshold = &thresholds.type_body_length;
                ctx.types()
                    .iter()
                    .filter_map(|t| {
                        let lines = t.line_count();
                        let severity = threshold.classify(lines)?;
                        let limit = match severity {
                            Severity::Error => threshold.error.unwrap_or(threshold.warning),
                            Severity::Warning => threshold.warning,
                        };
                        Some(RawFinding::new(
                            self.id().as_str(),
                            t.header(),
                            t.start_offset,
                            severity,
                            format!(
                                "{} '{}' has {} lines, exceeds maximum of {}",
                                t.kind, t.name, lines, limit
                            ),
                        ))
                    })
                    .collect()
            }
            TypeRule::Names => {
                let mut findings: Vec<RawFinding> = ctx
                    .types()
                    .iter()
                    .filter_map(|t| check_type_name(&t.name, t.header(), t.start_offset))
                    .collect();

                for caps in TYPE_ALIAS.captures_iter(ctx.text()) {
                    let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                        continue;
                    };
                    findings.extend(check_type_name(name.as_str(), whole.as_str(), whole.start()));
                }

                findings
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluate(rule: TypeRule, text: &str) -> Vec<RawFinding> {
        let ctx = AnalysisContext::new(text);
        rule.evaluate(&ctx, &Thresholds::default())
    }

    #[test]
    fn test_nesting_depth() {
        assert!(evaluate(TypeRule::NestingDepth, "struct Flat {\n    let x = 1\n}\n").is_empty());

        let text = "struct Outer {\n    enum Inner {\n        case a\n    }\n}\n";
        let findings = evaluate(TypeRule::NestingDepth, text);
        // Only the outer struct reaches depth 2; the enum is measured on its own.
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].matched_text, "struct Outer");
        assert_eq!(findings[0].severity, Severity::Warning);
        assert!(findings[0].message.contains("struct 'Outer'"));
    }

    #[test]
    fn test_body_length() {
        let mut text = String::from("class Big {\n");
        for i in 0..199 {
            text.push_str(&format!("    var value{} = 0\n", i));
        }
        text.push_str("}\n");
        let findings = evaluate(TypeRule::BodyLength, &text);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert!(findings[0].message.contains("201 lines"));
    }

    #[test]
    fn test_type_and_alias_names() {
        let text = "struct pt {\n}\nenum Kind {\n}\ntypealias id = Int\ntypealias Identifier = Int\n";
        let findings = evaluate(TypeRule::Names, text);
        let matched: Vec<_> = findings.iter().map(|f| f.matched_text.as_str()).collect();
        assert_eq!(matched, vec!["struct pt", "typealias id"]);
        assert!(findings.iter().all(|f| f.rule == "type-name"));
        assert_eq!(findings[1].start_offset, text.find("typealias id").unwrap());
    }
}
