//! Shared fixtures for the operator suite

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::coerce::to_number;
use crate::context::{Context, Event};
use crate::value::json::from_json;
use crate::value::{Callable, CallableFn, Value, ValueFuture};

pub fn v(j: serde_json::Value) -> Value {
    from_json(&j)
}

/* ===================== Recording Context ===================== */

/// Captures emitted events and hands out deterministic generator output
pub struct RecordingContext {
    pub events: RefCell<Vec<Event>>,
    uid_counter: Cell<u32>,
}

impl RecordingContext {
    pub fn new() -> RecordingContext {
        RecordingContext {
            events: RefCell::new(Vec::new()),
            uid_counter: Cell::new(0),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }
}

impl Context for RecordingContext {
    fn emit(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }

    fn new_uid(&self) -> String {
        let n = self.uid_counter.get();
        self.uid_counter.set(n + 1);
        format!("uid-{}", n)
    }

    fn random_word(&self) -> String {
        "banana".to_string()
    }
}

/* ===================== Suspending Callable ===================== */

/// A callable that yields to the runtime mid-computation, recording how
/// many invocations were ever live at once and the order elements were
/// seen in
pub struct SuspendingProbe {
    pub result: fn(&[Value]) -> Value,
    pub in_flight: Cell<u32>,
    pub max_in_flight: Cell<u32>,
    pub seen: RefCell<Vec<Value>>,
}

impl SuspendingProbe {
    pub fn new(result: fn(&[Value]) -> Value) -> Rc<SuspendingProbe> {
        Rc::new(SuspendingProbe {
            result,
            in_flight: Cell::new(0),
            max_in_flight: Cell::new(0),
            seen: RefCell::new(Vec::new()),
        })
    }

    pub fn as_value(self: &Rc<SuspendingProbe>) -> Value {
        Value::Callable(Callable::closure(self.clone()))
    }
}

impl CallableFn for SuspendingProbe {
    fn call<'a>(&'a self, _ctx: &'a dyn Context, args: Vec<Value>) -> ValueFuture<'a> {
        Box::pin(async move {
            self.in_flight.set(self.in_flight.get() + 1);
            self.max_in_flight
                .set(self.max_in_flight.get().max(self.in_flight.get()));
            tokio::task::yield_now().await;
            self.seen.borrow_mut().push(args[0].clone());
            let out = (self.result)(&args);
            self.in_flight.set(self.in_flight.get() - 1);
            Ok(out)
        })
    }
}

/* ===================== Native Callables ===================== */

pub fn native_double() -> Value {
    Value::Callable(Callable::native("double", |_, args| {
        Ok(Value::num(to_number(&args[0]).unwrap_or(0.0) * 2.0))
    }))
}

pub fn native_is_positive() -> Value {
    Value::Callable(Callable::native("is_positive", |_, args| {
        Ok(Value::Bool(to_number(&args[0]).unwrap_or(0.0) > 0.0))
    }))
}
