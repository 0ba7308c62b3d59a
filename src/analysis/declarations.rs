//! Recovery of function and type declarations by brace-balance scanning.
//!
//! No tokenizer is involved: every `func`/`enum`/`struct`/`class` keyword
//! followed by an identifier seeds a candidate, and the candidate's body is
//! whatever text it takes for the brace depth to climb above zero and come
//! back down. Candidates that never rebalance are dropped without a trace.

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

use super::bindings::{extract_parameters, ParameterList};

lazy_static! {
    static ref FUNCTION_SEED: Regex = seed_pattern("func");
    static ref ENUM_SEED: Regex = seed_pattern("enum");
    static ref STRUCT_SEED: Regex = seed_pattern("struct");
    static ref CLASS_SEED: Regex = seed_pattern("class");
}

/// Words that may follow a container keyword without naming a declaration,
/// e.g. `class func make()` or `class var shared`.
const NON_NAME_WORDS: &[&str] = &[
    "func", "var", "let", "static", "final", "override", "open", "public", "private",
    "fileprivate", "internal", "subscript", "init", "deinit", "case", "protocol",
];

fn seed_pattern(keyword: &str) -> Regex {
    Regex::new(&format!(r"\b{}\s+([A-Za-z_][A-Za-z0-9_]*)", keyword)).unwrap()
}

/// Kind of recovered declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Function,
    Enum,
    Struct,
    Class,
}

impl DeclarationKind {
    /// The three type-container kinds, in the order they are scanned.
    pub const TYPES: [DeclarationKind; 3] = [
        DeclarationKind::Enum,
        DeclarationKind::Struct,
        DeclarationKind::Class,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Function => "function",
            DeclarationKind::Enum => "enum",
            DeclarationKind::Struct => "struct",
            DeclarationKind::Class => "class",
        }
    }

    fn seed(&self) -> &'static Regex {
        match self {
            DeclarationKind::Function => &FUNCTION_SEED,
            DeclarationKind::Enum => &ENUM_SEED,
            DeclarationKind::Struct => &STRUCT_SEED,
            DeclarationKind::Class => &CLASS_SEED,
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A function or type recovered from the source text.
#[derive(Debug, Clone)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub name: String,
    /// Byte offset of the introducing keyword.
    pub start_offset: usize,
    /// Text from the keyword through the closing brace. Always brace-balanced.
    pub body: String,
    /// Deepest brace level reached; the declaration's own brace counts as 1.
    pub max_depth: usize,
    /// Length of the `keyword name` prefix of `body`.
    header_len: usize,
    /// Parameter list, only present for functions.
    pub parameters: Option<ParameterList>,
}

impl Declaration {
    /// The `keyword name` text that introduced this declaration.
    pub fn header(&self) -> &str {
        &self.body[..self.header_len]
    }

    /// Number of lines spanned by the body.
    pub fn line_count(&self) -> usize {
        self.body.split('\n').count()
    }

    /// Text after the declaration's own opening brace.
    pub fn inner_body(&self) -> &str {
        match self.body.find('{') {
            Some(pos) => &self.body[pos + 1..],
            None => "",
        }
    }

    /// Number of parameters (0 for types and parameterless functions).
    pub fn parameter_count(&self) -> usize {
        self.parameters.as_ref().map(|p| p.count).unwrap_or(0)
    }
}

/// Result of scanning forward from a candidate's keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BalancedSpan {
    /// Exclusive end offset (just past the closing brace).
    end: usize,
    max_depth: usize,
}

/// Scan from `start` until brace depth returns to zero.
///
/// Braces preceded by a backslash are skipped. A closing brace seen before
/// any opening brace, or running off the end of the text, fails the scan.
fn scan_balanced(text: &str, start: usize) -> Option<BalancedSpan> {
    let bytes = text.as_bytes();
    let mut depth: usize = 0;
    let mut max_depth = 0;
    let mut prev = 0u8;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        let escaped = prev == b'\\';
        prev = b;
        if escaped {
            continue;
        }
        match b {
            b'{' => {
                depth += 1;
                max_depth = max_depth.max(depth);
            }
            b'}' => {
                if depth == 0 {
                    return None;
                }
                depth -= 1;
                if depth == 0 {
                    return Some(BalancedSpan {
                        end: i + 1,
                        max_depth,
                    });
                }
            }
            _ => {}
        }
    }

    None
}

/// Extract every balanced declaration of one kind, in text order.
pub fn extract_declarations(text: &str, kind: DeclarationKind) -> Vec<Declaration> {
    let mut declarations = Vec::new();

    for caps in kind.seed().captures_iter(text) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if NON_NAME_WORDS.contains(&name.as_str()) {
            continue;
        }

        let Some(span) = scan_balanced(text, whole.start()) else {
            continue;
        };

        let body = text[whole.start()..span.end].to_string();
        let mut declaration = Declaration {
            kind,
            name: name.as_str().to_string(),
            start_offset: whole.start(),
            header_len: whole.len(),
            body,
            max_depth: span.max_depth,
            parameters: None,
        };
        if kind == DeclarationKind::Function {
            declaration.parameters = Some(extract_parameters(&declaration));
        }
        declarations.push(declaration);
    }

    declarations
}

/// Extract all functions, in text order.
pub fn extract_functions(text: &str) -> Vec<Declaration> {
    extract_declarations(text, DeclarationKind::Function)
}

/// Extract all enums, then all structs, then all classes.
///
/// A type nested in another yields its own entry with its own depth count.
pub fn extract_types(text: &str) -> Vec<Declaration> {
    DeclarationKind::TYPES
        .iter()
        .flat_map(|kind| extract_declarations(text, *kind))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balanced_function_depth() {
        let text = "func f() { if (x) { y() } }";
        let funcs = extract_functions(text);
        assert_eq!(funcs.len(), 1);
        assert_eq!(funcs[0].name, "f");
        assert_eq!(funcs[0].max_depth, 2);
        assert_eq!(funcs[0].start_offset, 0);
        assert_eq!(funcs[0].body, text);
        assert_eq!(funcs[0].header(), "func f");
    }

    #[test]
    fn test_truncated_function_is_dropped() {
        assert!(extract_functions("func g() { if (x) {").is_empty());
    }

    #[test]
    fn test_body_stops_at_matching_brace() {
        let text = "func a() {\n    run()\n}\n\nfunc b() { }\n";
        let funcs = extract_functions(text);
        assert_eq!(funcs.len(), 2);
        assert_eq!(funcs[0].body, "func a() {\n    run()\n}");
        assert_eq!(funcs[0].line_count(), 3);
        assert_eq!(funcs[1].name, "b");
        assert_eq!(funcs[1].start_offset, text.find("func b").unwrap());
        assert_eq!(funcs[1].max_depth, 1);
    }

    #[test]
    fn test_escaped_braces_are_ignored() {
        let text = r"func f() { let s = \{ }";
        let funcs = extract_functions(text);
        assert_eq!(funcs.len(), 1);
        assert_eq!(funcs[0].max_depth, 1);
    }

    #[test]
    fn test_closing_brace_first_is_dropped() {
        // Protocol requirement without a body: the first brace seen closes
        // the protocol, so the candidate never opens.
        let text = "protocol P {\n    func run()\n}\n";
        assert!(extract_functions(text).is_empty());
    }

    #[test]
    fn test_nested_types_are_independent() {
        let text = "struct Outer {\n    enum Inner {\n        case a\n    }\n}\n";
        let types = extract_types(text);
        assert_eq!(types.len(), 2);
        // Enums are scanned before structs.
        assert_eq!(types[0].kind, DeclarationKind::Enum);
        assert_eq!(types[0].name, "Inner");
        assert_eq!(types[0].max_depth, 1);
        assert_eq!(types[1].kind, DeclarationKind::Struct);
        assert_eq!(types[1].name, "Outer");
        assert_eq!(types[1].max_depth, 2);
    }

    #[test]
    fn test_class_func_is_not_a_class() {
        let text = "class Store {\n    class func make() -> Store { return Store() }\n}\n";
        let types = extract_types(text);
        assert_eq!(types.len(), 1);
        assert_eq!(types[0].name, "Store");

        let funcs = extract_functions(text);
        assert_eq!(funcs.len(), 1);
        assert_eq!(funcs[0].name, "make");
    }

    #[test]
    fn test_inner_body_excludes_signature() {
        let funcs = extract_functions("func loop() { for x in xs { } }");
        assert_eq!(funcs[0].inner_body(), " for x in xs { } }");
    }

    #[test]
    fn test_functions_carry_parameters_types_do_not() {
        let text = "struct S { func f(a: Int) { } }";
        assert_eq!(extract_functions(text)[0].parameter_count(), 1);
        assert!(extract_types(text)[0].parameters.is_none());
    }
}
