//! Read-only props of `error` values.

use ember_core::{ErrorValue, Value};

use super::{Handler, Props};

pub(super) fn register(props: &mut Props<ErrorValue>) {
    props.insert("name", Handler::Attr(name));
    props.insert("info", Handler::Attr(info));
}

fn name(e: &ErrorValue) -> Value {
    Value::Str(e.name().clone())
}

fn info(e: &ErrorValue) -> Value {
    e.info().cloned().unwrap_or(Value::Null)
}
