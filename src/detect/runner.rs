//! Rule evaluation and diagnostic aggregation.

use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::analysis::AnalysisContext;
use crate::config::{Configuration, Thresholds};

use super::{
    builtin_pattern_rules, Diagnostic, FunctionRule, PatternRule, RawFinding, TypeRule,
};

/// One evaluable rule, tagged by family.
#[derive(Debug, Clone)]
pub enum Rule {
    Pattern(PatternRule),
    Function(FunctionRule),
    Type(TypeRule),
}

impl Rule {
    pub fn id(&self) -> &str {
        match self {
            Rule::Pattern(rule) => rule.id.as_str(),
            Rule::Function(rule) => rule.id().as_str(),
            Rule::Type(rule) => rule.id().as_str(),
        }
    }

    pub fn evaluate(&self, ctx: &AnalysisContext<'_>, thresholds: &Thresholds) -> Vec<RawFinding> {
        match self {
            Rule::Pattern(rule) => rule.evaluate(ctx.text()),
            Rule::Function(rule) => rule.evaluate(ctx, thresholds),
            Rule::Type(rule) => rule.evaluate(ctx, thresholds),
        }
    }
}

/// Evaluates every enabled rule against a source text.
///
/// A runner holds only compiled rules and thresholds; per-text state lives
/// in the `AnalysisContext` built by each `analyze` call, so one runner can
/// be shared across threads.
#[derive(Debug, Clone)]
pub struct Runner {
    rules: Vec<Rule>,
    thresholds: Thresholds,
}

impl Runner {
    /// Compile the rule list for a configuration.
    ///
    /// Order is fixed: built-in pattern rules, custom pattern rules, then
    /// function rules, then type rules. Disabled rules are left out.
    /// Custom rules whose pattern does not compile are skipped with a warning.
    pub fn new(config: &Configuration) -> Self {
        let mut rules: Vec<Rule> = builtin_pattern_rules().into_iter().map(Rule::Pattern).collect();

        for custom in &config.custom_rules {
            match PatternRule::from_custom(custom) {
                Ok(rule) => rules.push(Rule::Pattern(rule)),
                Err(e) => warn!(rule = %custom.id, error = %e, "skipping custom rule"),
            }
        }

        rules.extend(FunctionRule::ALL.iter().copied().map(Rule::Function));
        rules.extend(TypeRule::ALL.iter().copied().map(Rule::Type));
        rules.retain(|rule| config.is_rule_enabled(rule.id()));

        Self {
            rules,
            thresholds: config.thresholds.clone(),
        }
    }

    /// Rules in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Analyze one source text.
    ///
    /// Diagnostics come out grouped by rule in evaluation order, unsorted and
    /// without deduplication. A rule that panics contributes nothing; a
    /// finding whose range cannot be resolved is dropped.
    pub fn analyze(&self, text: &str) -> Vec<Diagnostic> {
        let ctx = AnalysisContext::new(text);
        let mut diagnostics = Vec::new();

        for rule in &self.rules {
            let findings = evaluate_isolated(rule.id(), || rule.evaluate(&ctx, &self.thresholds));
            diagnostics.extend(findings.into_iter().filter_map(|f| resolve(&ctx, f)));
        }

        debug!(
            rules = self.rules.len(),
            diagnostics = diagnostics.len(),
            "analysis finished"
        );
        diagnostics
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new(&Configuration::default())
    }
}

/// Run one rule's evaluation, turning a panic into an empty result.
fn evaluate_isolated<F>(rule: &str, evaluate: F) -> Vec<RawFinding>
where
    F: FnOnce() -> Vec<RawFinding>,
{
    match panic::catch_unwind(AssertUnwindSafe(evaluate)) {
        Ok(findings) => findings,
        Err(_) => {
            warn!(rule, "rule evaluation failed, skipping");
            Vec::new()
        }
    }
}

/// Map a finding's byte range to positions through the pass's index.
fn resolve(ctx: &AnalysisContext<'_>, finding: RawFinding) -> Option<Diagnostic> {
    let end = finding.end_offset();
    let (Some(from), Some(to)) = (ctx.resolve(finding.start_offset), ctx.resolve(end)) else {
        debug!(rule = %finding.rule, offset = finding.start_offset, "dropping unresolvable finding");
        return None;
    };

    Some(Diagnostic {
        rule: finding.rule,
        severity: finding.severity,
        message: finding.message,
        from,
        to,
    })
}
