//! Ember RT: properties and methods of primitive values.
//!
//! Resolves `value.name` for numbers, strings, arrays and error values into
//! either a plain value or a bound native method. Higher-order array methods
//! call back into the evaluator through [`ember_core::Invoke`].
#![warn(clippy::all)]

pub mod config;
pub mod logging;
pub mod props;
pub mod sort;
pub mod validate;

pub use config::{ConfigError, IterationMode, MapMode, PropsConfig};
pub use props::{resolve_property, Handler, PropResolver, PropTable};
pub use sort::merge_sort;
