//! Props of `num` values.

use ember_core::values::format_num;
use ember_core::{RuntimeResult, Value};

use super::{Handler, Props};

pub(super) fn register(props: &mut Props<f64>) {
    props.insert("to_str", Handler::Method(to_str));
}

fn to_str(n: &f64, _args: &[Value]) -> RuntimeResult<Value> {
    Ok(Value::str(format_num(*n)))
}
