//! Configuration schema for swiftcheck.
//!
//! A configuration is optional: the default value enables every built-in
//! rule with its standard thresholds.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::detect::{RuleId, Severity};

/// Errors raised while loading or validating a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("reading configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid pattern {pattern:?} in custom rule {id:?}: {source}")]
    InvalidPattern {
        id: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("unknown rule {0:?} in disabled_rules")]
    UnknownRule(String),
    #[error("custom rule id {0:?} collides with a built-in rule")]
    DuplicateRule(String),
    #[error("invalid excluded_paths pattern {pattern:?}: {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Configuration {
    /// Rule ids whose findings are skipped.
    #[serde(default)]
    pub disabled_rules: Vec<String>,
    /// Threshold overrides for the function and type rules.
    #[serde(default)]
    pub thresholds: Thresholds,
    /// Extra pattern rules, evaluated after the built-in catalog.
    #[serde(default)]
    pub custom_rules: Vec<CustomRule>,
    /// Glob patterns for paths the command-line runner skips (e.g., "**/Generated/**")
    #[serde(default)]
    pub excluded_paths: Vec<String>,
}

impl Configuration {
    /// Parse a configuration from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse a configuration from YAML text. Empty text yields the default.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Whether findings from `rule` should be reported.
    pub fn is_rule_enabled(&self, rule: &str) -> bool {
        !self.disabled_rules.iter().any(|r| r == rule)
    }

    /// Check if a path should be excluded based on excluded_paths patterns.
    pub fn is_path_excluded(&self, path: &Path) -> bool {
        if self.excluded_paths.is_empty() {
            return false;
        }

        let path_str = path.to_string_lossy();

        for pattern in &self.excluded_paths {
            if let Ok(glob) = globset::Glob::new(pattern) {
                let matcher = glob.compile_matcher();
                if matcher.is_match(&*path_str) {
                    return true;
                }
            }
        }
        false
    }

    /// Validate rule ids, custom patterns and exclusion globs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for rule in &self.disabled_rules {
            let known = RuleId::parse(rule).is_some()
                || self.custom_rules.iter().any(|c| &c.id == rule);
            if !known {
                return Err(ConfigError::UnknownRule(rule.clone()));
            }
        }

        for custom in &self.custom_rules {
            if RuleId::parse(&custom.id).is_some() {
                return Err(ConfigError::DuplicateRule(custom.id.clone()));
            }
            custom.compile()?;
        }

        for pattern in &self.excluded_paths {
            globset::Glob::new(pattern).map_err(|source| ConfigError::InvalidGlob {
                pattern: pattern.clone(),
                source,
            })?;
        }

        Ok(())
    }
}

/// An upper bound: values above `warning` warn, values above `error` fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Threshold {
    pub warning: usize,
    #[serde(default)]
    pub error: Option<usize>,
}

impl Threshold {
    pub const fn new(warning: usize, error: Option<usize>) -> Self {
        Self { warning, error }
    }

    /// Severity for `value`, or `None` when it is within bounds.
    pub fn classify(&self, value: usize) -> Option<Severity> {
        if self.error.is_some_and(|error| value > error) {
            Some(Severity::Error)
        } else if value > self.warning {
            Some(Severity::Warning)
        } else {
            None
        }
    }
}

/// A lower bound: values below `warning` warn, values below `error` fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct MinimumThreshold {
    pub warning: usize,
    pub error: usize,
}

impl MinimumThreshold {
    pub fn classify(&self, value: usize) -> Option<Severity> {
        if value < self.error {
            Some(Severity::Error)
        } else if value < self.warning {
            Some(Severity::Warning)
        } else {
            None
        }
    }
}

/// Thresholds for the function, type and naming rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Thresholds {
    pub function_complexity: Threshold,
    pub function_body_length: Threshold,
    pub function_parameter_count: Threshold,
    pub function_nesting_depth: Threshold,
    pub type_nesting_depth: Threshold,
    pub type_body_length: Threshold,
    pub variable_name_min_length: MinimumThreshold,
    pub variable_name_max_length: Threshold,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            function_complexity: Threshold::new(10, Some(20)),
            function_body_length: Threshold::new(40, Some(100)),
            function_parameter_count: Threshold::new(5, Some(8)),
            function_nesting_depth: Threshold::new(5, None),
            type_nesting_depth: Threshold::new(1, None),
            type_body_length: Threshold::new(200, Some(350)),
            // Two-character names already fail outright.
            variable_name_min_length: MinimumThreshold {
                warning: 3,
                error: 3,
            },
            variable_name_max_length: Threshold::new(40, Some(60)),
        }
    }
}

/// A user-defined pattern rule.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CustomRule {
    pub id: String,
    pub pattern: String,
    pub message: String,
    #[serde(default = "default_custom_severity")]
    pub severity: Severity,
}

fn default_custom_severity() -> Severity {
    Severity::Warning
}

impl CustomRule {
    /// Compile the rule's pattern.
    pub fn compile(&self) -> Result<regex::Regex, ConfigError> {
        regex::Regex::new(&self.pattern).map_err(|source| ConfigError::InvalidPattern {
            id: self.id.clone(),
            pattern: self.pattern.clone(),
            source,
        })
    }
}
