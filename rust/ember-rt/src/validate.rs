//! Argument and callback-result checks for native methods.
//!
//! An argument is *omitted* only when it is absent from the argument list;
//! an explicit `null` is a value like any other and fails a kind check.

use ember_core::{ArgSite, ArrRef, FnValue, RuntimeError, RuntimeResult, Str, Value};

const NOTHING: &str = "nothing";

fn mismatch(pos: usize, expected: &'static str, actual: Option<&Value>) -> RuntimeError {
    RuntimeError::argument_type(
        ArgSite::Param(pos),
        expected,
        actual.map_or(NOTHING, Value::type_name),
    )
}

pub fn expect_any(args: &[Value], pos: usize) -> RuntimeResult<Value> {
    args.get(pos)
        .cloned()
        .ok_or_else(|| mismatch(pos, "anything", None))
}

pub fn expect_str(args: &[Value], pos: usize) -> RuntimeResult<Str> {
    match args.get(pos) {
        Some(Value::Str(s)) => Ok(s.clone()),
        other => Err(mismatch(pos, "str", other)),
    }
}

pub fn expect_num(args: &[Value], pos: usize) -> RuntimeResult<f64> {
    match args.get(pos) {
        Some(Value::Num(n)) => Ok(*n),
        other => Err(mismatch(pos, "num", other)),
    }
}

pub fn expect_arr(args: &[Value], pos: usize) -> RuntimeResult<ArrRef> {
    match args.get(pos) {
        Some(Value::Arr(a)) => Ok(a.clone()),
        other => Err(mismatch(pos, "arr", other)),
    }
}

pub fn expect_fn(args: &[Value], pos: usize) -> RuntimeResult<FnValue> {
    match args.get(pos) {
        Some(Value::Fn(f)) => Ok(f.clone()),
        other => Err(mismatch(pos, "fn", other)),
    }
}

pub fn opt_str(args: &[Value], pos: usize) -> RuntimeResult<Option<Str>> {
    match args.get(pos) {
        None => Ok(None),
        Some(_) => expect_str(args, pos).map(Some),
    }
}

pub fn opt_num(args: &[Value], pos: usize) -> RuntimeResult<Option<f64>> {
    match args.get(pos) {
        None => Ok(None),
        Some(_) => expect_num(args, pos).map(Some),
    }
}

pub fn expect_bool_result(value: &Value, method: &'static str) -> RuntimeResult<bool> {
    value.as_bool().ok_or_else(|| {
        RuntimeError::argument_type(ArgSite::CallbackResult(method), "bool", value.type_name())
    })
}

pub fn expect_num_result(value: &Value, method: &'static str) -> RuntimeResult<f64> {
    value.as_num().ok_or_else(|| {
        RuntimeError::argument_type(ArgSite::CallbackResult(method), "num", value.type_name())
    })
}

/// Integer part of a script number used as an index. NaN becomes 0 and
/// infinities saturate.
pub fn to_index(n: f64) -> i64 {
    n.trunc() as i64
}

/// Resolve a possibly negative, possibly out-of-range index against `len`
/// the way array slicing does: negatives count from the end, then the
/// result is clamped to `0..=len`.
pub fn relative_index(n: f64, len: usize) -> usize {
    let i = to_index(n);
    if i < 0 {
        len.saturating_sub(i.unsigned_abs().min(len as u64) as usize)
    } else {
        (i as u64).min(len as u64) as usize
    }
}

/// Exact non-negative integral index, or `None`.
pub fn exact_index(n: f64) -> Option<usize> {
    if n >= 0.0 && n.fract() == 0.0 && n <= usize::MAX as f64 {
        Some(n as usize)
    } else {
        None
    }
}
