//! Ember Core
//!
//! Value model, canonical strings, errors, and the call capability shared by
//! the evaluator and the primitive-property runtime.

pub mod call;
pub mod error;
pub mod strings;
pub mod values;

pub use call::{Invoke, NativeFuture};
pub use error::{ArgSite, RuntimeError, RuntimeResult};
pub use strings::Str;
pub use values::{ArrRef, ErrorValue, FnValue, NativeFn, ScriptFn, Value, ValueKind};
