//! Property and method dispatch for primitive values.
//!
//! The table is built once: for each supported kind (num, str, arr, error)
//! a map from property name to a [`Handler`]. Resolving either produces the
//! property's value directly or binds the target into a native callable
//! that the evaluator invokes later with its arguments.

mod array;
mod error;
mod number;
mod string;

use std::collections::HashMap;

use ember_core::{
    ArrRef, ErrorValue, Invoke, NativeFn, NativeFuture, RuntimeError, RuntimeResult, Str, Value,
    ValueKind,
};
use futures::future::{self, FutureExt};
use once_cell::sync::Lazy;

use crate::config::PropsConfig;

/// How a registered name behaves once resolved against a target.
pub enum Handler<T: 'static> {
    /// Attribute-style; resolving is the whole operation.
    Attr(fn(&T) -> Value),
    /// Method whose body never suspends.
    Method(fn(&T, &[Value]) -> RuntimeResult<Value>),
    /// Method that re-enters the evaluator through callbacks.
    AsyncMethod(for<'a> fn(T, Vec<Value>, &'a dyn Invoke, PropsConfig) -> NativeFuture<'a>),
}

impl<T: 'static> Clone for Handler<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for Handler<T> {}

impl<T: Clone + 'static> Handler<T> {
    fn bind(self, name: &'static str, target: &T, config: PropsConfig) -> Value {
        match self {
            Handler::Attr(get) => get(target),
            Handler::Method(body) => {
                let target = target.clone();
                NativeFn::new(name, move |args, _invoker| {
                    future::ready(body(&target, &args)).boxed_local()
                })
                .into()
            }
            Handler::AsyncMethod(body) => {
                let target = target.clone();
                NativeFn::new(name, move |args, invoker| {
                    body(target.clone(), args, invoker, config)
                })
                .into()
            }
        }
    }

    fn is_method(&self) -> bool {
        !matches!(self, Handler::Attr(_))
    }
}

type Props<T> = HashMap<&'static str, Handler<T>>;

pub struct PropTable {
    num: Props<f64>,
    str: Props<Str>,
    arr: Props<ArrRef>,
    error: Props<ErrorValue>,
}

static PROP_TABLE: Lazy<PropTable> = Lazy::new(PropTable::build);

impl PropTable {
    fn build() -> Self {
        let mut table = PropTable {
            num: HashMap::new(),
            str: HashMap::new(),
            arr: HashMap::new(),
            error: HashMap::new(),
        };
        number::register(&mut table.num);
        string::register(&mut table.str);
        array::register(&mut table.arr);
        error::register(&mut table.error);
        table
    }

    pub fn global() -> &'static PropTable {
        &PROP_TABLE
    }

    pub fn resolve(&self, target: &Value, name: &str, config: PropsConfig) -> RuntimeResult<Value> {
        let kind = target.kind();
        tracing::debug!(%kind, name, "resolve prop");
        match target {
            Value::Num(n) => lookup(&self.num, kind, n, name, config),
            Value::Str(s) => lookup(&self.str, kind, s, name, config),
            Value::Arr(a) => lookup(&self.arr, kind, a, name, config),
            Value::Error(e) => lookup(&self.error, kind, e, name, config),
            _ => Err(RuntimeError::UnsupportedType {
                kind,
                name: name.to_string(),
            }),
        }
    }

    /// Registered names for `kind`, sorted. Empty for kinds without props.
    pub fn names(&self, kind: ValueKind) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = match kind {
            ValueKind::Num => self.num.keys().copied().collect(),
            ValueKind::Str => self.str.keys().copied().collect(),
            ValueKind::Arr => self.arr.keys().copied().collect(),
            ValueKind::Error => self.error.keys().copied().collect(),
            _ => Vec::new(),
        };
        names.sort_unstable();
        names
    }

    /// `Some(true)` for method-style names, `Some(false)` for attributes,
    /// `None` when the name is not registered for `kind`.
    pub fn is_method(&self, kind: ValueKind, name: &str) -> Option<bool> {
        match kind {
            ValueKind::Num => self.num.get(name).map(Handler::is_method),
            ValueKind::Str => self.str.get(name).map(Handler::is_method),
            ValueKind::Arr => self.arr.get(name).map(Handler::is_method),
            ValueKind::Error => self.error.get(name).map(Handler::is_method),
            _ => None,
        }
    }
}

fn lookup<T: Clone + 'static>(
    props: &Props<T>,
    kind: ValueKind,
    target: &T,
    name: &str,
    config: PropsConfig,
) -> RuntimeResult<Value> {
    let Some((&key, handler)) = props.get_key_value(name) else {
        return Err(RuntimeError::UnknownProperty {
            kind,
            name: name.to_string(),
        });
    };
    Ok(handler.bind(key, target, config))
}

/// The dispatch table paired with the configuration its methods run under.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropResolver {
    config: PropsConfig,
}

impl PropResolver {
    pub fn new(config: PropsConfig) -> Self {
        PropResolver { config }
    }

    pub fn config(&self) -> PropsConfig {
        self.config
    }

    pub fn resolve(&self, target: &Value, name: &str) -> RuntimeResult<Value> {
        PropTable::global().resolve(target, name, self.config)
    }
}

/// Resolve `target.name` under the default configuration.
pub fn resolve_property(target: &Value, name: &str) -> RuntimeResult<Value> {
    PropResolver::default().resolve(target, name)
}
