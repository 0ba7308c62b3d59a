//! Per-pass analysis state.
//!
//! Everything the rules read is built here exactly once per `analyze` call
//! and dropped when the call returns. Nothing is cached across passes, so
//! concurrent passes never share state.

use tracing::debug;

use super::bindings::{extract_bindings, parameter_bindings, Binding};
use super::declarations::{extract_functions, extract_types, Declaration};
use super::position::{Position, PositionIndex};

/// Structures recovered from one source text.
pub struct AnalysisContext<'a> {
    text: &'a str,
    index: PositionIndex,
    functions: Vec<Declaration>,
    types: Vec<Declaration>,
    bindings: Vec<Binding>,
}

impl<'a> AnalysisContext<'a> {
    /// Build the position index, declarations and bindings for `text`.
    pub fn new(text: &'a str) -> Self {
        let index = PositionIndex::new(text);
        let functions = extract_functions(text);
        let types = extract_types(text);
        let bindings = extract_bindings(text);

        debug!(
            lines = index.line_count(),
            functions = functions.len(),
            types = types.len(),
            bindings = bindings.len(),
            "built analysis context"
        );

        Self {
            text,
            index,
            functions,
            types,
            bindings,
        }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn index(&self) -> &PositionIndex {
        &self.index
    }

    /// Functions in discovery order.
    pub fn functions(&self) -> &[Declaration] {
        &self.functions
    }

    /// Types: all enums, then structs, then classes.
    pub fn types(&self) -> &[Declaration] {
        &self.types
    }

    /// `let`/`var` bindings found anywhere in the text.
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Whole-text bindings followed by every function's parameter bindings.
    pub fn all_bindings(&self) -> impl Iterator<Item = Binding> + '_ {
        self.bindings
            .iter()
            .cloned()
            .chain(self.functions.iter().flat_map(parameter_bindings))
    }

    /// Resolve a byte offset through this pass's index.
    pub fn resolve(&self, offset: usize) -> Option<Position> {
        self.index.resolve(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_collects_everything() {
        let text = "struct Point {\n    let x: Int\n    func scaled(by factor: Int) -> Point {\n        return self\n    }\n}\n";
        let ctx = AnalysisContext::new(text);

        assert_eq!(ctx.functions().len(), 1);
        assert_eq!(ctx.types().len(), 1);
        assert_eq!(ctx.bindings().len(), 1);

        let names: Vec<_> = ctx.all_bindings().map(|b| b.name).collect();
        assert_eq!(names, vec!["x", "factor"]);
        assert_eq!(ctx.resolve(text.find("let").unwrap()), Some(Position::new(1, 4)));
    }

    #[test]
    fn test_context_is_empty_for_empty_text() {
        let ctx = AnalysisContext::new("");
        assert!(ctx.functions().is_empty());
        assert!(ctx.types().is_empty());
        assert_eq!(ctx.all_bindings().count(), 0);
    }
}
