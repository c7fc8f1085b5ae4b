//! Suspension-aware iteration engine
//!
//! The primitive underneath every higher-order operator: walk a container,
//! invoke a possibly-suspending callable per element, and decide whether to
//! continue. Callables return boxed futures (see
//! [`ValueFuture`](crate::value::ValueFuture)), so a plain function and a
//! long-running computation take the same path.
//!
//! Guarantees:
//! 1. Sequential, one-at-a-time invocation - never overlapping or
//!    reordered, even if a callable suspends.
//! 2. No element is visited after the walk has stopped.
//! 3. The walk reads a normalized snapshot taken up front, so callable side
//!    effects cannot perturb it.

use crate::context::Context;
use crate::error::OpError;
use crate::value::normalize::normalize;
use crate::value::Value;

/// Whether the walk continues after an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    Continue,
    Stop,
}

/// The ordered (key, element) sequence of a container
///
/// Arrays yield ascending numeric indices, maps yield keys in insertion
/// order, and a non-container scalar is a single-element sequence with
/// key 0.
pub fn entries(v: &Value) -> Vec<(Value, Value)> {
    match v {
        Value::Arr(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| (Value::Num(i as f64), item.clone()))
            .collect(),
        Value::Map(map) => map
            .iter()
            .map(|(k, val)| (Value::Str(k.clone()), val.clone()))
            .collect(),
        scalar => vec![(Value::Num(0.0), scalar.clone())],
    }
}

/// Invoke a callable value with (context, argument-list)
///
/// Non-callable values are a `Type` failure.
pub async fn invoke(
    ctx: &dyn Context,
    callable: &Value,
    args: Vec<Value>,
) -> Result<Value, OpError> {
    match callable {
        Value::Callable(c) => c.call(ctx, args).await,
        other => Err(OpError::Type(format!(
            "expected a function, got {}",
            other.kind_of()
        ))),
    }
}

/// Walk a container, invoking `callable` once per element in order
///
/// `make_args` builds the argument list for each (element, key, container)
/// triple; `on_result` folds the resolved result into caller state and
/// decides whether to continue. Each invocation is awaited before the next
/// begins.
pub async fn iterate<A, R>(
    ctx: &dyn Context,
    container: &Value,
    callable: &Value,
    mut make_args: A,
    mut on_result: R,
) -> Result<(), OpError>
where
    A: FnMut(&Value, &Value, &Value) -> Vec<Value>,
    R: FnMut(&Value, &Value, Value) -> Walk,
{
    let snapshot = normalize(container);
    for (key, elem) in entries(&snapshot) {
        let args = make_args(&elem, &key, &snapshot);
        let result = invoke(ctx, callable, args).await?;
        if on_result(&elem, &key, result) == Walk::Stop {
            break;
        }
    }
    Ok(())
}

/// The standard (value, key, container) argument list
pub fn element_args(elem: &Value, key: &Value, container: &Value) -> Vec<Value> {
    vec![elem.clone(), key.clone(), container.clone()]
}
