//! Host context capability
//!
//! The operator library is pure except for one capability it consumes from
//! its host: an event/log emission channel plus two opaque string generators
//! (unique ids and random words). `klog` reports logged values through it,
//! `defaultsTo` reports debug messages, and range-checked operators such as
//! `slice` report recoverable range errors as events instead of hard
//! failures.

use crate::value::Value;
use uuid::Uuid;

/* ===================== Events ===================== */

/// An event emitted by an operator through the host channel
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// `klog` reporting the value being logged
    Klog {
        value: Value,
        message: Option<String>,
    },
    /// Debug notification (e.g. `defaultsTo` substituting a default)
    Debug { message: String },
    /// Recoverable error reported as an event (e.g. `slice` out of bounds)
    Error { message: String },
}

/* ===================== Context Trait ===================== */

/// Capabilities the host provides to the operator library
///
/// Operators hold the context only for the duration of a call; nothing is
/// retained past return.
pub trait Context {
    /// Emit a named event with a structured payload
    fn emit(&self, event: Event);

    /// Generate a fresh unique id string
    fn new_uid(&self) -> String;

    /// Generate a random word string
    fn random_word(&self) -> String;
}

/* ===================== Basic Context ===================== */

/// Words `BasicContext::random_word` draws from
const WORDS: &[&str] = &[
    "amber", "basil", "cedar", "delta", "ember", "fjord", "gleam", "hazel",
    "indigo", "juniper", "kelp", "lumen", "maple", "nectar", "onyx", "pebble",
    "quartz", "raven", "sable", "thistle", "umber", "violet", "willow",
    "xenon", "yarrow", "zephyr",
];

/// Default host context
///
/// Forwards emitted events to `tracing`, generates v4 UUIDs for unique ids,
/// and draws random words from a built-in list. Hosts with their own event
/// plumbing implement [`Context`] directly.
#[derive(Debug, Clone, Default)]
pub struct BasicContext;

impl BasicContext {
    pub fn new() -> Self {
        BasicContext
    }
}

impl Context for BasicContext {
    fn emit(&self, event: Event) {
        match event {
            Event::Klog { value, message } => match message {
                Some(msg) => tracing::info!(target: "lilt", "{}: {:?}", msg, value),
                None => tracing::info!(target: "lilt", "{:?}", value),
            },
            Event::Debug { message } => tracing::debug!(target: "lilt", "{}", message),
            Event::Error { message } => tracing::warn!(target: "lilt", "{}", message),
        }
    }

    fn new_uid(&self) -> String {
        Uuid::new_v4().to_string()
    }

    fn random_word(&self) -> String {
        // UUID bytes double as an entropy source so no extra RNG dependency
        // is needed here
        let n = Uuid::new_v4().as_u128() as usize;
        WORDS[n % WORDS.len()].to_string()
    }
}
