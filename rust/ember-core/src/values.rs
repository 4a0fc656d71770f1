//! Runtime values seen by the primitive-property runtime.

use std::any::Any;
use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::call::{Invoke, NativeFuture};
use crate::strings::Str;

/// Script-visible kind of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKind {
    Null,
    Bool,
    Num,
    Str,
    Arr,
    Fn,
    Error,
}

impl ValueKind {
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Num => "num",
            ValueKind::Str => "str",
            ValueKind::Arr => "arr",
            ValueKind::Fn => "fn",
            ValueKind::Error => "error",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Num(f64),
    Str(Str),
    Arr(ArrRef),
    Fn(FnValue),
    Error(ErrorValue),
}

impl Value {
    pub fn str(s: impl Into<Str>) -> Self {
        Value::Str(s.into())
    }

    pub fn arr(items: Vec<Value>) -> Self {
        Value::Arr(ArrRef::new(items))
    }

    pub fn error(name: impl Into<Str>, info: Option<Value>) -> Self {
        Value::Error(ErrorValue::new(name, info))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Num(_) => ValueKind::Num,
            Value::Str(_) => ValueKind::Str,
            Value::Arr(_) => ValueKind::Arr,
            Value::Fn(_) => ValueKind::Fn,
            Value::Error(_) => ValueKind::Error,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_num(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&Str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_arr(&self) -> Option<&ArrRef> {
        match self {
            Value::Arr(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_fn(&self) -> Option<&FnValue> {
        match self {
            Value::Fn(f) => Some(f),
            _ => None,
        }
    }

    /// Deep value equality used by membership and search operations.
    ///
    /// Cyclic arrays compare coinductively: a pair of cells met again while
    /// it is still being compared counts as equal.
    pub fn structural_eq(&self, other: &Value) -> bool {
        self.eq_seen(other, &mut Vec::new())
    }

    /// `seen` holds the array pairs on the current comparison path.
    fn eq_seen(&self, other: &Value, seen: &mut Vec<(usize, usize)>) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Num(a), Value::Num(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Arr(a), Value::Arr(b)) => {
                if a.ptr_eq(b) {
                    return true;
                }
                let pair = (a.addr(), b.addr());
                if seen.contains(&pair) {
                    return true;
                }
                seen.push(pair);
                let equal = {
                    let (a, b) = (a.borrow(), b.borrow());
                    a.len() == b.len()
                        && a.iter().zip(b.iter()).all(|(x, y)| x.eq_seen(y, seen))
                };
                seen.pop();
                equal
            }
            (Value::Fn(a), Value::Fn(b)) => a.ptr_eq(b),
            (Value::Error(a), Value::Error(b)) => {
                a.name() == b.name()
                    && match (a.info(), b.info()) {
                        (None, None) => true,
                        (Some(x), Some(y)) => x.eq_seen(y, seen),
                        _ => false,
                    }
            }
            _ => false,
        }
    }

    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>, depth: usize, quoted: bool) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Num(n) => f.write_str(&format_num(*n)),
            Value::Str(s) if quoted => write!(f, "{s:?}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Arr(a) => {
                if depth > MAX_DISPLAY_DEPTH {
                    return f.write_str("[...]");
                }
                let Ok(items) = a.0.try_borrow() else {
                    return f.write_str("[...]");
                };
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    item.fmt_nested(f, depth + 1, true)?;
                }
                f.write_str("]")
            }
            Value::Fn(func) => write!(f, "@{}", func.name()),
            Value::Error(e) => write!(f, "error:{}", e.name()),
        }
    }
}

const MAX_DISPLAY_DEPTH: usize = 32;

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_nested(f, 0, false)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.structural_eq(other)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Num(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::str(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::str(s)
    }
}

/// Default decimal text of a number: integral values have no fractional
/// part, very large and very small magnitudes use exponent notation.
pub fn format_num(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    let abs = n.abs();
    if !(1e-6..1e21).contains(&abs) {
        let s = format!("{n:e}");
        return match s.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => s,
        };
    }
    if n.fract() == 0.0 {
        format!("{n:.0}")
    } else {
        format!("{n}")
    }
}

// ---------------------------------------------------------------------------
// Arrays
// ---------------------------------------------------------------------------

/// Shared, mutable array cell. Clones alias the same sequence.
#[derive(Clone, Default)]
pub struct ArrRef(Rc<RefCell<Vec<Value>>>);

impl ArrRef {
    pub fn new(items: Vec<Value>) -> Self {
        ArrRef(Rc::new(RefCell::new(items)))
    }

    pub fn ptr_eq(&self, other: &ArrRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    pub fn borrow(&self) -> Ref<'_, Vec<Value>> {
        self.0.borrow()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.borrow().get(index).cloned()
    }

    /// Copy of the current elements (same element identity, new container).
    pub fn snapshot(&self) -> Vec<Value> {
        self.0.borrow().clone()
    }

    pub fn push(&self, value: Value) {
        self.0.borrow_mut().push(value);
    }

    pub fn unshift(&self, value: Value) {
        self.0.borrow_mut().insert(0, value);
    }

    pub fn pop(&self) -> Option<Value> {
        self.0.borrow_mut().pop()
    }

    pub fn shift(&self) -> Option<Value> {
        let mut items = self.0.borrow_mut();
        if items.is_empty() {
            None
        } else {
            Some(items.remove(0))
        }
    }

    pub fn reverse(&self) {
        self.0.borrow_mut().reverse();
    }

    /// Replace the whole sequence in place; every alias observes the change.
    pub fn replace(&self, items: Vec<Value>) {
        *self.0.borrow_mut() = items;
    }
}

impl fmt::Debug for ArrRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::Arr(self.clone()))
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct ErrorValue(Rc<ErrorInner>);

struct ErrorInner {
    name: Str,
    info: Option<Value>,
}

impl ErrorValue {
    pub fn new(name: impl Into<Str>, info: Option<Value>) -> Self {
        ErrorValue(Rc::new(ErrorInner {
            name: name.into(),
            info,
        }))
    }

    pub fn name(&self) -> &Str {
        &self.0.name
    }

    pub fn info(&self) -> Option<&Value> {
        self.0.info.as_ref()
    }
}

impl fmt::Debug for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorValue")
            .field("name", &self.0.name)
            .field("info", &self.0.info)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Callables
// ---------------------------------------------------------------------------

type NativeBody = dyn for<'a> Fn(Vec<Value>, &'a dyn Invoke) -> NativeFuture<'a>;

/// Callable implemented by the runtime itself.
#[derive(Clone)]
pub struct NativeFn {
    name: &'static str,
    body: Rc<NativeBody>,
}

impl NativeFn {
    pub fn new<F>(name: &'static str, body: F) -> Self
    where
        F: for<'a> Fn(Vec<Value>, &'a dyn Invoke) -> NativeFuture<'a> + 'static,
    {
        NativeFn {
            name,
            body: Rc::new(body),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Run the native body. `invoker` is handed through so callbacks issued
    /// by the body re-enter the same evaluator.
    pub fn call<'a>(&self, args: Vec<Value>, invoker: &'a dyn Invoke) -> NativeFuture<'a> {
        (self.body)(args, invoker)
    }
}

/// Evaluator-owned callable. The payload is opaque to the runtime and only
/// ever handed back to [`Invoke::invoke`].
#[derive(Clone)]
pub struct ScriptFn {
    id: u64,
    payload: Rc<dyn Any>,
}

impl ScriptFn {
    pub fn new(id: u64, payload: Rc<dyn Any>) -> Self {
        ScriptFn { id, payload }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }
}

#[derive(Clone)]
pub enum FnValue {
    Native(NativeFn),
    Script(ScriptFn),
}

impl FnValue {
    pub fn name(&self) -> &str {
        match self {
            FnValue::Native(n) => n.name(),
            FnValue::Script(_) => "fn",
        }
    }

    pub fn ptr_eq(&self, other: &FnValue) -> bool {
        match (self, other) {
            (FnValue::Native(a), FnValue::Native(b)) => Rc::ptr_eq(&a.body, &b.body),
            (FnValue::Script(a), FnValue::Script(b)) => Rc::ptr_eq(&a.payload, &b.payload),
            _ => false,
        }
    }
}

impl fmt::Debug for FnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FnValue::Native(n) => write!(f, "NativeFn({})", n.name()),
            FnValue::Script(s) => write!(f, "ScriptFn(#{})", s.id()),
        }
    }
}

impl From<NativeFn> for Value {
    fn from(f: NativeFn) -> Self {
        Value::Fn(FnValue::Native(f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nums(ns: &[f64]) -> Value {
        Value::arr(ns.iter().map(|n| Value::Num(*n)).collect())
    }

    #[test]
    fn test_format_num() {
        assert_eq!(format_num(42.0), "42");
        assert_eq!(format_num(-7.0), "-7");
        assert_eq!(format_num(-0.0), "0");
        assert_eq!(format_num(0.1), "0.1");
        assert_eq!(format_num(1.5), "1.5");
        assert_eq!(format_num(1e21), "1e+21");
        assert_eq!(format_num(1.5e-7), "1.5e-7");
        assert_eq!(format_num(123456789012.0), "123456789012");
        assert_eq!(format_num(f64::NAN), "NaN");
        assert_eq!(format_num(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_structural_eq() {
        assert_eq!(nums(&[1.0, 2.0]), nums(&[1.0, 2.0]));
        assert_ne!(nums(&[1.0, 2.0]), nums(&[1.0]));
        assert_ne!(Value::Num(f64::NAN), Value::Num(f64::NAN));
        assert_ne!(Value::Num(1.0), Value::str("1"));
        assert_eq!(
            Value::arr(vec![nums(&[1.0]), Value::str("x")]),
            Value::arr(vec![nums(&[1.0]), Value::str("x")])
        );
        assert_eq!(
            Value::error("e", Some(Value::Num(1.0))),
            Value::error("e", Some(Value::Num(1.0)))
        );
        assert_ne!(Value::error("e", None), Value::error("e", Some(Value::Null)));
    }

    #[test]
    fn test_arr_aliasing() {
        let a = ArrRef::new(vec![Value::Num(1.0)]);
        let alias = a.clone();
        alias.push(Value::Num(2.0));
        assert_eq!(a.len(), 2);
        assert!(a.ptr_eq(&alias));
        assert_eq!(a.shift(), Some(Value::Num(1.0)));
        assert_eq!(alias.snapshot(), vec![Value::Num(2.0)]);
    }

    #[test]
    fn test_self_containing_arr() {
        let a = ArrRef::new(vec![]);
        a.push(Value::Arr(a.clone()));
        let v = Value::Arr(a.clone());
        assert!(v.structural_eq(&v.clone()));
        assert!(v.to_string().contains("[...]"));
        // break the cycle so the test does not leak
        a.replace(vec![]);
    }

    #[test]
    fn test_distinct_cycles_compare_equal() {
        let a = ArrRef::new(vec![]);
        a.push(Value::Arr(a.clone()));
        let b = ArrRef::new(vec![]);
        b.push(Value::Arr(b.clone()));
        assert!(Value::Arr(a.clone()).structural_eq(&Value::Arr(b.clone())));

        // same shape, different leaf under the cycle
        let c = ArrRef::new(vec![Value::Num(1.0)]);
        c.push(Value::Arr(c.clone()));
        let d = ArrRef::new(vec![Value::Num(2.0)]);
        d.push(Value::Arr(d.clone()));
        assert!(!Value::Arr(c.clone()).structural_eq(&Value::Arr(d.clone())));

        // a cycle reached through error info
        let e = Value::error("loop", Some(Value::Arr(a.clone())));
        let f = Value::error("loop", Some(Value::Arr(b.clone())));
        assert_eq!(e, f);

        for cell in [a, b, c, d] {
            cell.replace(vec![]);
        }
    }

    #[test]
    fn test_display() {
        let v = Value::arr(vec![Value::Num(1.0), Value::str("a"), Value::Null]);
        assert_eq!(v.to_string(), "[1, \"a\", null]");
        assert_eq!(Value::str("a").to_string(), "a");
    }
}
