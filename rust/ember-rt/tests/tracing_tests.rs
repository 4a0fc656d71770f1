//! Events emitted while resolving props and running callback methods.
//!
//! Kept in its own test binary so the scoped subscriber never competes with
//! a global one installed by another test.

mod common;

use std::io;
use std::sync::{Arc, Mutex};

use common::{num, nums, sync_fn, Evaluator};
use ember_core::Value;
use tracing::Level;

/// Shared in-memory sink for formatted events.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `body` with a trace-level fmt subscriber and return what it logged.
fn capture(body: impl FnOnce()) -> String {
    let sink = Captured::default();
    let writer = sink.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, body);
    sink.text()
}

fn subtract() -> Value {
    sync_fn(|args| num(args[0].as_num().unwrap_or(0.0) - args[1].as_num().unwrap_or(0.0)))
}

#[test]
fn resolve_emits_debug_event() {
    let out = capture(|| {
        let eval = Evaluator::default();
        eval.prop(&Value::str("abc"), "len").unwrap();
    });
    assert!(out.contains("resolve prop"), "missing resolve event in {out:?}");
    assert!(out.contains("DEBUG"));
    assert!(out.contains("kind=str"));
}

#[test]
fn sort_emits_callback_and_summary_events() {
    let out = capture(|| {
        let eval = Evaluator::default();
        let res = futures::executor::block_on(eval.call_method(
            &nums(&[2.0, 1.0]),
            "sort",
            vec![subtract()],
        ));
        assert_eq!(res, Ok(nums(&[1.0, 2.0])));
    });
    assert!(out.contains("invoke callback"), "missing callback event in {out:?}");
    assert!(out.contains("TRACE"));
    assert!(out.contains("sort done"));
    assert!(out.contains("comparisons=1"));
}

#[test]
fn map_emits_summary_event() {
    let out = capture(|| {
        let eval = Evaluator::default();
        let res = futures::executor::block_on(eval.call_method(
            &nums(&[1.0, 2.0, 3.0]),
            "map",
            vec![sync_fn(|args| args[0].clone())],
        ));
        assert_eq!(res, Ok(nums(&[1.0, 2.0, 3.0])));
    });
    assert!(out.contains("map done"), "missing map event in {out:?}");
    assert!(out.contains("len=3"));
}
