//! Runtime errors raised by primitive-property access.

use std::fmt;

use crate::values::ValueKind;

/// Where a mistyped value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgSite {
    /// Positional parameter of a native method (0-based).
    Param(usize),
    /// Return value of the callback passed to the named method.
    CallbackResult(&'static str),
}

impl fmt::Display for ArgSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgSite::Param(i) => write!(f, "argument #{}", i + 1),
            ArgSite::CallbackResult(method) => write!(f, "result of the {method} callback"),
        }
    }
}

/// Script-visible runtime errors. None of these are host crashes; they abort
/// the current expression and surface to the script's own error handling.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuntimeError {
    #[error("Cannot read prop of {kind}. (reading {name})")]
    UnsupportedType { kind: ValueKind, name: String },
    #[error("No such prop ({name}) in {kind}.")]
    UnknownProperty { kind: ValueKind, name: String },
    #[error("Expect {expected} for {site}, but got {actual}.")]
    ArgumentType {
        site: ArgSite,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("{method} of empty arr with no initial value")]
    EmptyArray { method: &'static str },
    #[error("runtime error: {0}")]
    Runtime(String),
}

impl RuntimeError {
    pub fn argument_type(site: ArgSite, expected: &'static str, actual: &'static str) -> Self {
        RuntimeError::ArgumentType {
            site,
            expected,
            actual,
        }
    }

    /// Short machine-readable tag for the error kind.
    pub fn kind_tag(&self) -> &'static str {
        match self {
            RuntimeError::UnsupportedType { .. } => "UnsupportedType",
            RuntimeError::UnknownProperty { .. } => "UnknownProperty",
            RuntimeError::ArgumentType { .. } => "ArgumentType",
            RuntimeError::EmptyArray { .. } => "EmptyArray",
            RuntimeError::Runtime(_) => "Runtime",
        }
    }
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
