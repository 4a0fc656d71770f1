//! Props of `arr` values.
//!
//! Arrays are shared cells: `push`, `unshift`, `pop`, `shift`, `reverse`
//! and `sort` mutate the sequence every alias sees. Higher-order methods
//! call back into the evaluator; `filter`, `reduce`, `find` and the `sort`
//! comparator are awaited one call at a time.

use std::cell::Cell;

use ember_core::{ArrRef, FnValue, Invoke, NativeFuture, RuntimeError, RuntimeResult, Str, Value};
use futures::future::{self, FutureExt};

use super::{Handler, Props};
use crate::config::{IterationMode, MapMode, PropsConfig};
use crate::sort::merge_sort;
use crate::validate::{
    expect_any, expect_arr, expect_bool_result, expect_fn, expect_num, expect_num_result,
    opt_num, opt_str, relative_index,
};

pub(super) fn register(props: &mut Props<ArrRef>) {
    props.insert("len", Handler::Attr(len));
    props.insert("push", Handler::Method(push));
    props.insert("unshift", Handler::Method(unshift));
    props.insert("pop", Handler::Method(pop));
    props.insert("shift", Handler::Method(shift));
    props.insert("concat", Handler::Method(concat));
    props.insert("slice", Handler::Method(slice));
    props.insert("join", Handler::Method(join));
    props.insert("incl", Handler::Method(incl));
    props.insert("index_of", Handler::Method(index_of));
    props.insert("reverse", Handler::Method(reverse));
    props.insert("copy", Handler::Method(copy));
    props.insert("map", Handler::AsyncMethod(map));
    props.insert("filter", Handler::AsyncMethod(filter));
    props.insert("reduce", Handler::AsyncMethod(reduce));
    props.insert("find", Handler::AsyncMethod(find));
    props.insert("sort", Handler::AsyncMethod(sort));
}

fn index(i: usize) -> Value {
    Value::Num(i as f64)
}

// ---------------------------------------------------------------------------
// Plain methods
// ---------------------------------------------------------------------------

fn len(a: &ArrRef) -> Value {
    Value::Num(a.len() as f64)
}

fn push(a: &ArrRef, args: &[Value]) -> RuntimeResult<Value> {
    a.push(expect_any(args, 0)?);
    Ok(Value::Arr(a.clone()))
}

fn unshift(a: &ArrRef, args: &[Value]) -> RuntimeResult<Value> {
    a.unshift(expect_any(args, 0)?);
    Ok(Value::Arr(a.clone()))
}

fn pop(a: &ArrRef, _args: &[Value]) -> RuntimeResult<Value> {
    Ok(a.pop().unwrap_or(Value::Null))
}

fn shift(a: &ArrRef, _args: &[Value]) -> RuntimeResult<Value> {
    Ok(a.shift().unwrap_or(Value::Null))
}

fn concat(a: &ArrRef, args: &[Value]) -> RuntimeResult<Value> {
    let other = expect_arr(args, 0)?;
    let mut items = a.snapshot();
    items.extend(other.borrow().iter().cloned());
    Ok(Value::arr(items))
}

fn slice(a: &ArrRef, args: &[Value]) -> RuntimeResult<Value> {
    let begin = expect_num(args, 0)?;
    let end = expect_num(args, 1)?;
    let items = a.borrow();
    let begin = relative_index(begin, items.len());
    let end = relative_index(end, items.len());
    if begin >= end {
        return Ok(Value::arr(Vec::new()));
    }
    Ok(Value::arr(items[begin..end].to_vec()))
}

fn join(a: &ArrRef, args: &[Value]) -> RuntimeResult<Value> {
    let sep = opt_str(args, 0)?;
    let items = a.borrow();
    let parts: Vec<&str> = items
        .iter()
        .map(|v| v.as_str().map_or("", Str::as_str))
        .collect();
    Ok(Value::str(parts.join(sep.as_ref().map_or("", Str::as_str))))
}

fn incl(a: &ArrRef, args: &[Value]) -> RuntimeResult<Value> {
    let needle = expect_any(args, 0)?;
    let found = a.borrow().iter().any(|v| v.structural_eq(&needle));
    Ok(Value::Bool(found))
}

fn index_of(a: &ArrRef, args: &[Value]) -> RuntimeResult<Value> {
    let needle = expect_any(args, 0)?;
    let items = a.borrow();
    let from = opt_num(args, 1)?.map_or(0, |n| relative_index(n, items.len()));
    let found = items[from..]
        .iter()
        .position(|v| v.structural_eq(&needle))
        .map_or(-1.0, |i| (i + from) as f64);
    Ok(Value::Num(found))
}

// Returns null rather than the array, unlike the other mutators.
fn reverse(a: &ArrRef, _args: &[Value]) -> RuntimeResult<Value> {
    a.reverse();
    Ok(Value::Null)
}

fn copy(a: &ArrRef, _args: &[Value]) -> RuntimeResult<Value> {
    Ok(Value::arr(a.snapshot()))
}

// ---------------------------------------------------------------------------
// Higher-order methods
// ---------------------------------------------------------------------------

/// Element source for sequential iteration.
enum Elements {
    /// Read through to the shared cell on every step.
    Live(ArrRef),
    Snapshot(Vec<Value>),
}

impl Elements {
    fn new(target: &ArrRef, mode: IterationMode) -> Self {
        match mode {
            IterationMode::Live => Elements::Live(target.clone()),
            IterationMode::Snapshot => Elements::Snapshot(target.snapshot()),
        }
    }

    fn get(&self, i: usize) -> Option<Value> {
        match self {
            Elements::Live(a) => a.get(i),
            Elements::Snapshot(items) => items.get(i).cloned(),
        }
    }
}

async fn call_back(
    invoker: &dyn Invoke,
    callback: &FnValue,
    method: &'static str,
    args: Vec<Value>,
) -> RuntimeResult<Value> {
    tracing::trace!(method, callee = callback.name(), "invoke callback");
    invoker.invoke(callback, args).await
}

fn map<'a>(target: ArrRef, args: Vec<Value>, invoker: &'a dyn Invoke, config: PropsConfig) -> NativeFuture<'a> {
    async move {
        let callback = expect_fn(&args, 0)?;
        let items = target.snapshot();
        let len = items.len();
        let results = match config.map {
            MapMode::Concurrent => {
                let calls = items
                    .into_iter()
                    .enumerate()
                    .map(|(i, item)| call_back(invoker, &callback, "map", vec![item, index(i)]));
                future::try_join_all(calls).await?
            }
            MapMode::Sequential => {
                let mut out = Vec::with_capacity(len);
                for (i, item) in items.into_iter().enumerate() {
                    out.push(call_back(invoker, &callback, "map", vec![item, index(i)]).await?);
                }
                out
            }
        };
        tracing::debug!(len, mode = ?config.map, "map done");
        Ok(Value::arr(results))
    }
    .boxed_local()
}

fn filter<'a>(target: ArrRef, args: Vec<Value>, invoker: &'a dyn Invoke, config: PropsConfig) -> NativeFuture<'a> {
    async move {
        let callback = expect_fn(&args, 0)?;
        let elements = Elements::new(&target, config.iteration);
        let mut kept = Vec::new();
        let mut i = 0;
        while let Some(item) = elements.get(i) {
            let res = call_back(invoker, &callback, "filter", vec![item.clone(), index(i)]).await?;
            if expect_bool_result(&res, "filter")? {
                kept.push(item);
            }
            i += 1;
        }
        Ok(Value::arr(kept))
    }
    .boxed_local()
}

fn reduce<'a>(target: ArrRef, args: Vec<Value>, invoker: &'a dyn Invoke, config: PropsConfig) -> NativeFuture<'a> {
    async move {
        let callback = expect_fn(&args, 0)?;
        let elements = Elements::new(&target, config.iteration);
        let (mut acc, mut i) = match args.get(1) {
            Some(initial) => (initial.clone(), 0),
            None => {
                let first = elements
                    .get(0)
                    .ok_or(RuntimeError::EmptyArray { method: "reduce" })?;
                (first, 1)
            }
        };
        while let Some(item) = elements.get(i) {
            acc = call_back(invoker, &callback, "reduce", vec![acc, item, index(i)]).await?;
            i += 1;
        }
        Ok(acc)
    }
    .boxed_local()
}

fn find<'a>(target: ArrRef, args: Vec<Value>, invoker: &'a dyn Invoke, config: PropsConfig) -> NativeFuture<'a> {
    async move {
        let callback = expect_fn(&args, 0)?;
        let elements = Elements::new(&target, config.iteration);
        let mut i = 0;
        while let Some(item) = elements.get(i) {
            let res = call_back(invoker, &callback, "find", vec![item.clone(), index(i)]).await?;
            if expect_bool_result(&res, "find")? {
                return Ok(item);
            }
            i += 1;
        }
        Ok(Value::Null)
    }
    .boxed_local()
}

fn sort<'a>(target: ArrRef, args: Vec<Value>, invoker: &'a dyn Invoke, _config: PropsConfig) -> NativeFuture<'a> {
    async move {
        let comparator = expect_fn(&args, 0)?;
        let items = target.snapshot();
        let len = items.len();
        let comparisons = Cell::new(0usize);
        let precedes = |a: Value, b: Value| {
            comparisons.set(comparisons.get() + 1);
            let comparator = &comparator;
            async move {
                let res = call_back(invoker, comparator, "sort", vec![a, b]).await?;
                let order = expect_num_result(&res, "sort")?;
                // ties and NaN keep the left element
                Ok::<bool, RuntimeError>(order <= 0.0 || order.is_nan())
            }
            .boxed_local()
        };
        let sorted = merge_sort(items, &precedes).await?;
        target.replace(sorted);
        tracing::debug!(len, comparisons = comparisons.get(), "sort done");
        Ok(Value::Arr(target))
    }
    .boxed_local()
}
