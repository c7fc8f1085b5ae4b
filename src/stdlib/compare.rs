//! Comparison, equality, and membership operators
//!
//! Ordering is partial; the relational operators swallow "incomparable" as
//! false, `<=>` raises on it, and `cmp` sidesteps it by stringifying both
//! sides first.

use crate::coerce::{to_number, to_pattern, to_text};
use crate::context::Context;
use crate::error::OpError;
use crate::order::{order, structural_eq, Order};
use crate::value::Value;

use super::{fold_chain, required};

/* ===================== Relational ===================== */

pub fn lt(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    fold_chain("<", args, |a, b| Ok(Value::Bool(order(a, b) == Order::Less)))
}

pub fn gt(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    fold_chain(">", args, |a, b| Ok(Value::Bool(order(a, b) == Order::Greater)))
}

pub fn lte(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    fold_chain("<=", args, |a, b| {
        Ok(Value::Bool(matches!(order(a, b), Order::Less | Order::Equal)))
    })
}

pub fn gte(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    fold_chain(">=", args, |a, b| {
        Ok(Value::Bool(matches!(order(a, b), Order::Greater | Order::Equal)))
    })
}

/* ===================== Equality ===================== */

pub fn eq(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    fold_chain("==", args, |a, b| Ok(Value::Bool(structural_eq(a, b))))
}

pub fn neq(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    fold_chain("!=", args, |a, b| Ok(Value::Bool(!structural_eq(a, b))))
}

/* ===================== Three-way ===================== */

/// `<=>` - numeric comparison when both operands cast to numbers, raw
/// ordering otherwise; incomparable operands are a Type failure
pub fn seq(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    fold_chain("<=>", args, |a, b| {
        let ord = match (to_number(a), to_number(b)) {
            (Some(x), Some(y)) => {
                if x < y {
                    Order::Less
                } else if x > y {
                    Order::Greater
                } else {
                    Order::Equal
                }
            }
            _ => order(a, b),
        };
        match ord {
            Order::Less => Ok(Value::num(-1.0)),
            Order::Equal => Ok(Value::num(0.0)),
            Order::Greater => Ok(Value::num(1.0)),
            Order::Incomparable => Err(OpError::Type(format!(
                "cannot compare {} ({}) with {} ({})",
                to_text(a),
                a.kind_of(),
                to_text(b),
                b.kind_of()
            ))),
        }
    })
}

/// `cmp` - textual three-way comparison; stringifies both sides, so it
/// never fails
pub fn cmp(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    fold_chain("cmp", args, |a, b| {
        let r = match order(&Value::Str(to_text(a)), &Value::Str(to_text(b))) {
            Order::Less => -1.0,
            Order::Greater => 1.0,
            _ => 0.0,
        };
        Ok(Value::num(r))
    })
}

/* ===================== Membership ===================== */

/// `><` - element of an array, key of a map, or equal to the scalar itself
pub fn contains(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let obj = required("><", args, 0)?;
    let val = required("><", args, 1)?;
    let found = match obj {
        Value::Arr(items) => items.iter().any(|x| structural_eq(x, val)),
        Value::Map(m) => {
            let key = to_text(val);
            m.contains_key(&key)
        }
        _ => structural_eq(obj, val),
    };
    Ok(Value::Bool(found))
}

/// `like` - pattern membership; the right operand is coerced to a pattern
pub fn like(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let val = required("like", args, 0)?;
    let pat = to_pattern(required("like", args, 1)?)?;
    Ok(Value::Bool(pat.matches(&to_text(val))))
}

/* ===================== Tests ===================== */
