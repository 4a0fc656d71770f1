//! The call capability the evaluator injects into native methods.

use futures::future::LocalBoxFuture;

use crate::error::RuntimeError;
use crate::values::{FnValue, Value};

/// Future returned by any callable. Execution is single-threaded, so the
/// future is not `Send`.
pub type NativeFuture<'a> = LocalBoxFuture<'a, Result<Value, RuntimeError>>;

/// Invoke a callable value with already-evaluated arguments.
///
/// Implemented by the evaluator. The returned future suspends the caller
/// until the callee finishes and yields its result, or the error raised
/// while it ran.
pub trait Invoke {
    fn invoke<'a>(&'a self, callee: &'a FnValue, args: Vec<Value>) -> NativeFuture<'a>;
}
