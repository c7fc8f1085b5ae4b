//! Runtime value model
//!
//! Every runtime value belongs to exactly one of nine kinds. The kind is
//! always computed from the value, never cached, so mutation-free operators
//! never risk a stale tag. `Null` is the unique representative of "absent":
//! missing arguments, not-a-number, and explicit absent markers all collapse
//! to it (see [`normalize`](crate::value::normalize)).
//!
//! Arrays and maps are immutable from the operator library's point of view:
//! every operator that "modifies" a composite returns a new composite.

pub mod json;
pub mod normalize;

use crate::context::Context;
use crate::error::OpError;
use indexmap::IndexMap;
use regex::RegexBuilder;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

/// Insertion-ordered map with string keys
pub type ValueMap = IndexMap<String, Value>;

/// Boxed future produced by a callable invocation
///
/// Plain callables wrap an immediate result; suspendable ones yield control
/// before resolving. The iteration engine awaits each one sequentially, so
/// both look identical to callers.
pub type ValueFuture<'a> = Pin<Box<dyn Future<Output = Result<Value, OpError>> + 'a>>;

/* ===================== Value ===================== */

/// A runtime value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Canonical absent value
    Null,
    Bool(bool),
    /// IEEE-754 double; NaN is never a valid Number (it normalizes to Null)
    Num(f64),
    Str(String),
    /// Compiled regular expression plus its source text and flags
    Pattern(Pattern),
    /// Ordered, 0-based, dense sequence; holes read as Null
    Arr(Vec<Value>),
    /// Insertion-ordered mapping from String key to Value
    Map(ValueMap),
    /// Native builtin or user-defined closure; opaque beyond "can be invoked"
    Callable(Callable),
    /// Host action-block reference; non-null, non-comparable, opaque
    Action(ActionRef),
}

/// The tag identifying which variant of the value union a value is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Null,
    Boolean,
    Number,
    String,
    Pattern,
    Array,
    Map,
    Callable,
    Action,
}

impl Kind {
    /// Parse a kind from its display name (as used by the `as` operator)
    pub fn from_name(name: &str) -> Option<Kind> {
        match name {
            "Null" => Some(Kind::Null),
            "Boolean" => Some(Kind::Boolean),
            "Number" => Some(Kind::Number),
            "String" => Some(Kind::String),
            "Pattern" => Some(Kind::Pattern),
            "Array" => Some(Kind::Array),
            "Map" => Some(Kind::Map),
            "Function" => Some(Kind::Callable),
            "Action" => Some(Kind::Action),
            _ => None,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Null => "Null",
            Kind::Boolean => "Boolean",
            Kind::Number => "Number",
            Kind::String => "String",
            Kind::Pattern => "Pattern",
            Kind::Array => "Array",
            Kind::Map => "Map",
            // Matches the "[Function]" text form
            Kind::Callable => "Function",
            Kind::Action => "Action",
        };
        write!(f, "{}", name)
    }
}

impl Value {
    /// Build a Number, normalizing NaN to Null
    pub fn num(n: f64) -> Value {
        if n.is_nan() {
            Value::Null
        } else {
            Value::Num(n)
        }
    }

    /// Classify this value into exactly one of the nine kinds
    ///
    /// A NaN smuggled into a `Num` (bypassing [`Value::num`]) classifies as
    /// `Null`, matching the normalizer.
    pub fn kind_of(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Num(n) if n.is_nan() => Kind::Null,
            Value::Bool(_) => Kind::Boolean,
            Value::Num(_) => Kind::Number,
            Value::Str(_) => Kind::String,
            Value::Pattern(_) => Kind::Pattern,
            Value::Arr(_) => Kind::Array,
            Value::Map(_) => Kind::Map,
            Value::Callable(_) => Kind::Callable,
            Value::Action(_) => Kind::Action,
        }
    }

    /// Check if value is truthy (for conditionals and predicates)
    ///
    /// Null and false are falsy, as are zero and the empty string; every
    /// composite, callable, and action is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Num(n) => !n.is_nan() && *n != 0.0,
            Value::Str(s) => !s.is_empty(),
            _ => true,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Value {
        Value::num(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Value {
        Value::Arr(items)
    }
}

impl From<ValueMap> for Value {
    fn from(map: ValueMap) -> Value {
        Value::Map(map)
    }
}

/* ===================== Pattern ===================== */

/// A compiled regular expression plus its source text and flags
///
/// Equality is by source + flags, not by compiled automaton identity.
/// Recognized flags: `i` (case-insensitive), `m` (multi-line), `g`
/// (global - consumed by `replace`/`extract`, not by the engine).
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    flags: String,
    re: regex::Regex,
}

impl Pattern {
    /// Compile a pattern from source text and flags
    pub fn new(source: &str, flags: &str) -> Result<Pattern, OpError> {
        let re = RegexBuilder::new(source)
            .case_insensitive(flags.contains('i'))
            .multi_line(flags.contains('m'))
            .build()
            .map_err(|e| OpError::Type(format!("invalid pattern re#{}#{}: {}", source, flags, e)))?;
        Ok(Pattern {
            source: source.to_string(),
            flags: flags.to_string(),
            re,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn flags(&self) -> &str {
        &self.flags
    }

    /// Whether the `g` flag is set (match/replace all occurrences)
    pub fn is_global(&self) -> bool {
        self.flags.contains('g')
    }

    pub fn regex(&self) -> &regex::Regex {
        &self.re
    }

    /// Test whether the pattern matches anywhere in `text`
    pub fn matches(&self, text: &str) -> bool {
        self.re.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.flags == other.flags
    }
}

/* ===================== Callables ===================== */

/// Native builtin function signature
pub type NativeFn = fn(&dyn Context, Vec<Value>) -> Result<Value, OpError>;

/// A user-defined callable supplied by the host
///
/// `call` returns a boxed future so a callable may either resolve
/// immediately or suspend (e.g. for a host-mediated long-running
/// evaluation); the iteration engine treats both uniformly.
pub trait CallableFn {
    fn call<'a>(&'a self, ctx: &'a dyn Context, args: Vec<Value>) -> ValueFuture<'a>;
}

/// A function reference: native builtin or host closure
#[derive(Clone)]
pub enum Callable {
    Native { name: &'static str, func: NativeFn },
    Closure(Rc<dyn CallableFn>),
}

impl Callable {
    pub fn native(name: &'static str, func: NativeFn) -> Callable {
        Callable::Native { name, func }
    }

    pub fn closure(f: Rc<dyn CallableFn>) -> Callable {
        Callable::Closure(f)
    }

    /// Invoke with (context, argument-list)
    pub fn call<'a>(&'a self, ctx: &'a dyn Context, args: Vec<Value>) -> ValueFuture<'a> {
        match self {
            Callable::Native { func, .. } => {
                let result = func(ctx, args);
                Box::pin(async move { result })
            }
            Callable::Closure(f) => f.call(ctx, args),
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Native { name, .. } => write!(f, "<native:{}>", name),
            Callable::Closure(_) => write!(f, "<closure>"),
        }
    }
}

impl PartialEq for Callable {
    /// Callables compare by identity
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Callable::Native { name: a, .. }, Callable::Native { name: b, .. }) => a == b,
            (Callable::Closure(a), Callable::Closure(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/* ===================== Actions ===================== */

/// Opaque reference to a host action block
///
/// Behaves as a non-null, non-comparable value; equality is by identity.
#[derive(Debug, Clone)]
pub struct ActionRef {
    label: Rc<String>,
}

impl ActionRef {
    pub fn new(label: impl Into<String>) -> ActionRef {
        ActionRef {
            label: Rc::new(label.into()),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl PartialEq for ActionRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.label, &other.label)
    }
}

/* ===================== Tests ===================== */
