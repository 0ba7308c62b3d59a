//! Structural recovery from raw source text.
//!
//! - `position`: offset to line/column mapping
//! - `declarations`: functions and types via brace-depth scanning
//! - `bindings`: parameter lists and `let`/`var` bindings
//! - `context`: the per-pass bundle of all of the above

pub mod bindings;
pub mod context;
pub mod declarations;
pub mod position;

pub use bindings::{
    explode_bindings, extract_bindings, extract_parameters, parameter_bindings, Binding,
    ParameterList,
};
pub use context::AnalysisContext;
pub use declarations::{
    extract_declarations, extract_functions, extract_types, Declaration, DeclarationKind,
};
pub use position::{Position, PositionIndex};
