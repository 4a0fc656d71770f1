//! A minimal evaluator for driving primitive props from integration tests.
//!
//! Script functions are Rust closures stored as the opaque payload of a
//! [`ScriptFn`]; the evaluator downcasts and runs them on invocation.
#![allow(dead_code)]

use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};

use ember_core::{FnValue, Invoke, NativeFuture, RuntimeError, ScriptFn, Value};
use ember_rt::{PropResolver, PropsConfig};
use futures::future::{self, FutureExt};

type Body = dyn for<'a> Fn(Vec<Value>, &'a dyn Invoke) -> NativeFuture<'a>;

/// Payload of every test script function.
struct Closure(Box<Body>);

static NEXT_FN_ID: AtomicU64 = AtomicU64::new(1);

/// Wrap an async closure as a script function value.
pub fn script_fn<F>(body: F) -> Value
where
    F: for<'a> Fn(Vec<Value>, &'a dyn Invoke) -> NativeFuture<'a> + 'static,
{
    let id = NEXT_FN_ID.fetch_add(1, Ordering::Relaxed);
    let payload = std::rc::Rc::new(Closure(Box::new(body)));
    Value::Fn(FnValue::Script(ScriptFn::new(id, payload)))
}

/// Wrap a closure that never suspends as a script function value.
pub fn sync_fn<F>(body: F) -> Value
where
    F: Fn(&[Value]) -> Value + 'static,
{
    script_fn(move |args, _| future::ready(Ok(body(&args))).boxed_local())
}

pub fn num(n: f64) -> Value {
    Value::Num(n)
}

pub fn nums(ns: &[f64]) -> Value {
    Value::arr(ns.iter().copied().map(Value::Num).collect())
}

pub fn strs(ss: &[&str]) -> Value {
    Value::arr(ss.iter().map(|s| Value::str(*s)).collect())
}

pub struct Evaluator {
    resolver: PropResolver,
    invocations: Cell<usize>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator::new(PropsConfig::default())
    }
}

impl Evaluator {
    pub fn new(config: PropsConfig) -> Self {
        Evaluator {
            resolver: PropResolver::new(config),
            invocations: Cell::new(0),
        }
    }

    /// Number of calls dispatched through this evaluator so far.
    pub fn invocations(&self) -> usize {
        self.invocations.get()
    }

    /// Evaluate `target.name`.
    pub fn prop(&self, target: &Value, name: &str) -> Result<Value, RuntimeError> {
        self.resolver.resolve(target, name)
    }

    /// Evaluate `target.name(args...)`.
    pub async fn call_method(
        &self,
        target: &Value,
        name: &str,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        match self.prop(target, name)? {
            Value::Fn(method) => self.invoke(&method, args).await,
            other => Err(RuntimeError::Runtime(format!(
                "{name} is a {} and cannot be called",
                other.type_name()
            ))),
        }
    }
}

impl Invoke for Evaluator {
    fn invoke<'a>(&'a self, callee: &'a FnValue, args: Vec<Value>) -> NativeFuture<'a> {
        self.invocations.set(self.invocations.get() + 1);
        match callee {
            FnValue::Native(native) => native.call(args, self),
            FnValue::Script(script) => match script.downcast_ref::<Closure>() {
                Some(closure) => (closure.0)(args, self),
                None => future::ready(Err(RuntimeError::Runtime(format!(
                    "fn #{} is not a test closure",
                    script.id()
                ))))
                .boxed_local(),
            },
        }
    }
}
