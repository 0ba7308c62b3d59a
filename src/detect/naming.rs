//! Naming checks shared by bindings and type declarations.

use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::Binding;
use crate::config::Thresholds;

use super::{RawFinding, RuleId, Severity};

lazy_static! {
    /// Ordinary bindings: lowerCamelCase alphanumerics.
    static ref VARIABLE_NAME: Regex = Regex::new(r"^[a-z][a-zA-Z0-9]*$").unwrap();

    /// `static let` bindings may also be ALL-CAPS.
    static ref CONSTANT_NAME: Regex =
        Regex::new(r"^(?:[a-z][a-zA-Z0-9]*|[A-Z][A-Z0-9]*)$").unwrap();

    /// Types and aliases: UpperCamelCase, 3 to 40 characters.
    static ref TYPE_NAME: Regex = Regex::new(r"^[A-Z][a-zA-Z0-9]{2,39}$").unwrap();
}

/// Validate one binding's name. Returns at most one finding.
///
/// Length checks run first; the shape test only applies to names of an
/// acceptable length.
pub fn check_binding(binding: &Binding, thresholds: &Thresholds) -> Option<RawFinding> {
    let name = binding.name.as_str();
    let length = name.chars().count();
    let finding = |severity, message: String| {
        RawFinding::new(
            RuleId::VariableName.as_str(),
            name,
            binding.start_offset,
            severity,
            message,
        )
    };

    let min = &thresholds.variable_name_min_length;
    if let Some(severity) = min.classify(length) {
        return Some(finding(
            severity,
            format!(
                "Variable name '{}' is too short: it should be at least {} characters long",
                name, min.warning
            ),
        ));
    }

    let max = &thresholds.variable_name_max_length;
    if let Some(severity) = max.classify(length) {
        return Some(finding(
            severity,
            format!(
                "Variable name '{}' is too long: it should be at most {} characters long",
                name, max.warning
            ),
        ));
    }

    if binding.constant_eligible {
        if !CONSTANT_NAME.is_match(name) {
            return Some(finding(
                Severity::Warning,
                format!(
                    "Static constant '{}' should be lowerCamelCase or ALL-CAPS and contain only alphanumeric characters",
                    name
                ),
            ));
        }
    } else if !VARIABLE_NAME.is_match(name) {
        return Some(finding(
            Severity::Warning,
            format!(
                "Variable name '{}' should start with a lowercase letter and contain only alphanumeric characters",
                name
            ),
        ));
    }

    None
}

/// Whether a type or alias name is acceptable.
pub fn is_valid_type_name(name: &str) -> bool {
    TYPE_NAME.is_match(name)
}

/// Validate a type or alias name; `matched_text` starts at `start_offset`.
pub fn check_type_name(name: &str, matched_text: &str, start_offset: usize) -> Option<RawFinding> {
    if is_valid_type_name(name) {
        return None;
    }
    Some(RawFinding::new(
        RuleId::TypeName.as_str(),
        matched_text,
        start_offset,
        Severity::Warning,
        format!(
            "Type name '{}' should start with an uppercase letter, contain only alphanumeric characters and be between 3 and 40 characters long",
            name
        ),
    ))
}
