//! Parameter lists and variable bindings.
//!
//! Parameter counting tracks its own parenthesis depth so that a parameter
//! whose type is itself parenthesized, e.g. `(Int, Int) -> Int`, still counts
//! once. Bindings come from `let`/`var` declarations anywhere in the text and
//! from every function's parameter list; both go through the same tuple
//! exploding routine so their names are validated identically.

use lazy_static::lazy_static;
use regex::Regex;

use super::declarations::Declaration;

lazy_static! {
    /// `func name()` / `func name<T>()`: nothing to count.
    static ref ZERO_PARAMETERS: Regex =
        Regex::new(r"^func\s+[A-Za-z_][A-Za-z0-9_]*\s*(?:<[^>]*>)?\s*\(\s*\)").unwrap();

    /// `[static] let|var name`, or the opening paren of `[static] let|var (a, b)`.
    static ref BINDING_DECLARATION: Regex = Regex::new(
        r"\b(?:(static)\s+)?(let|var)\s+(\(|[A-Za-z_][A-Za-z0-9_]*)"
    ).unwrap();
}

/// A function's parameter list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterList {
    /// Top-level parameter count.
    pub count: usize,
    /// Text between the parentheses; empty for parameterless functions.
    pub text: String,
    /// Byte offset of `text` in the source.
    pub offset: usize,
}

/// A named variable, constant or parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    /// Name with a single leading underscore removed.
    pub name: String,
    /// Byte offset of `name` in the source.
    pub start_offset: usize,
    /// `static let` bindings may use ALL-CAPS names.
    pub constant_eligible: bool,
}

/// Derive the parameter list of a function declaration.
pub fn extract_parameters(function: &Declaration) -> ParameterList {
    let body = function.body.as_str();

    let Some(open) = body.find('(') else {
        return empty_parameters(function);
    };
    if ZERO_PARAMETERS.is_match(body) || body.find('{').is_some_and(|brace| brace < open) {
        return ParameterList {
            offset: function.start_offset + open + 1,
            ..Default::default()
        };
    }

    let mut depth = 0usize;
    let mut boundaries = 0;
    let mut close = body.len();
    for (i, b) in body.bytes().enumerate().skip(open) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    close = i;
                    break;
                }
            }
            b',' if depth == 1 => boundaries += 1,
            _ => {}
        }
    }

    let text = &body[open + 1..close];
    let count = if text.trim().is_empty() {
        0
    } else {
        boundaries + 1
    };

    ParameterList {
        count,
        text: text.to_string(),
        offset: function.start_offset + open + 1,
    }
}

fn empty_parameters(function: &Declaration) -> ParameterList {
    ParameterList {
        offset: function.start_offset + function.header().len(),
        ..Default::default()
    }
}

/// Find every `let`/`var` binding in the text, exploding tuples.
pub fn extract_bindings(text: &str) -> Vec<Binding> {
    let mut bindings = Vec::new();

    for caps in BINDING_DECLARATION.captures_iter(text) {
        let Some(target) = caps.get(3) else {
            continue;
        };
        let constant_eligible =
            caps.get(1).is_some() && caps.get(2).map(|m| m.as_str()) == Some("let");
        let end = if target.as_str() == "(" {
            tuple_end(text, target.start())
        } else {
            target.end()
        };

        bindings.extend(explode_bindings(
            &text[target.start()..end],
            target.start(),
            constant_eligible,
        ));
    }

    bindings
}

/// End of the tuple pattern opening at `open`, past its matching `)`.
///
/// An unbalanced tuple stops at the end of its line.
fn tuple_end(text: &str, open: usize) -> usize {
    let mut depth = 0usize;
    for (i, b) in text.bytes().enumerate().skip(open) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i + 1;
                }
            }
            b'\n' => return i,
            _ => {}
        }
    }
    text.len()
}

/// Bindings introduced by a function's parameters.
pub fn parameter_bindings(function: &Declaration) -> Vec<Binding> {
    match &function.parameters {
        Some(params) if !params.text.is_empty() => {
            explode_bindings(&params.text, params.offset, false)
        }
        _ => Vec::new(),
    }
}

/// Split a single name, a `(a, b)` tuple, or a parameter list into bindings.
///
/// Each element contributes the last word before its `:` (so `from start: Int`
/// binds `start`); a nested tuple element is exploded in turn. `offset` is the
/// source offset of `target`.
pub fn explode_bindings(target: &str, offset: usize, constant_eligible: bool) -> Vec<Binding> {
    let (inner, inner_offset) = match target.strip_prefix('(') {
        Some(rest) => (rest.strip_suffix(')').unwrap_or(rest), offset + 1),
        None => (target, offset),
    };

    split_top_level(inner)
        .into_iter()
        .flat_map(|(element_start, element)| {
            let trimmed = element.trim();
            let element_offset = inner_offset + element_start;
            if trimmed.starts_with('(') {
                let lead = element.len() - element.trim_start().len();
                return explode_bindings(trimmed, element_offset + lead, constant_eligible);
            }
            element_name(element)
                .and_then(|(name_start, name)| {
                    make_binding(name, element_offset + name_start, constant_eligible)
                })
                .into_iter()
                .collect()
        })
        .collect()
}

/// Split on commas that sit outside any parentheses, keeping each piece's offset.
fn split_top_level(s: &str) -> Vec<(usize, &str)> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, b) in s.bytes().enumerate() {
        match b {
            b'(' => depth += 1,
            b')' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                pieces.push((start, &s[start..i]));
                start = i + 1;
            }
            _ => {}
        }
    }
    pieces.push((start, &s[start..]));

    pieces
}

/// Locate the bound name inside one tuple or parameter element.
fn element_name(element: &str) -> Option<(usize, &str)> {
    let label_part = match element.find(':') {
        Some(colon) => &element[..colon],
        None => element,
    };
    let trimmed = label_part.trim_end();
    let word_start = trimmed
        .rfind(|c: char| c.is_whitespace())
        .map(|i| i + 1)
        .unwrap_or_else(|| trimmed.len() - trimmed.trim_start().len());
    let name = &trimmed[word_start..];

    is_identifier(name).then_some((word_start, name))
}

fn make_binding(raw: &str, offset: usize, constant_eligible: bool) -> Option<Binding> {
    if raw == "_" {
        return None;
    }
    let (name, start_offset) = match raw.strip_prefix('_') {
        Some(stripped) => (stripped, offset + 1),
        None => (raw, offset),
    };

    Some(Binding {
        name: name.to_string(),
        start_offset,
        constant_eligible,
    })
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}
