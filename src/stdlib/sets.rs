//! Set operators
//!
//! All of these lift a non-array operand into a single-element array,
//! then use structural equality for element identity. Order is always
//! first-seen.

use crate::context::Context;
use crate::error::OpError;
use crate::value::Value;

use super::required;

/* ===================== Helpers ===================== */

fn lift(v: &Value) -> Vec<Value> {
    match v {
        Value::Arr(items) => items.clone(),
        other => vec![other.clone()],
    }
}

// operands arrive normalized, so plain equality is structural
fn found_in(items: &[Value], v: &Value) -> bool {
    items.iter().any(|x| x == v)
}

fn dedup(items: Vec<Value>) -> Vec<Value> {
    let mut out: Vec<Value> = Vec::with_capacity(items.len());
    for v in items {
        if !found_in(&out, &v) {
            out.push(v);
        }
    }
    out
}

/* ===================== Operators ===================== */

/// Elements of the first operand also present in the second, first-seen
/// order, deduplicated
pub fn intersection(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let a = lift(required("intersection", args, 0)?);
    let b = lift(required("intersection", args, 1)?);
    let out = dedup(a).into_iter().filter(|v| found_in(&b, v)).collect();
    Ok(Value::Arr(out))
}

/// Union keeping the first operand's elements then any unseen elements
/// of the second
pub fn union(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let a = lift(required("union", args, 0)?);
    let b = lift(required("union", args, 1)?);
    let mut out = a;
    for v in b {
        if !found_in(&out, &v) {
            out.push(v);
        }
    }
    Ok(Value::Arr(out))
}

/// Elements of the first operand not present in the second; repeats in
/// the first operand are kept
pub fn difference(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let a = lift(required("difference", args, 0)?);
    let b = lift(required("difference", args, 1)?);
    let out = a.into_iter().filter(|v| !found_in(&b, v)).collect();
    Ok(Value::Arr(out))
}

/// Whether every element of the second operand appears in the first
pub fn has(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let a = lift(required("has", args, 0)?);
    let b = lift(required("has", args, 1)?);
    Ok(Value::Bool(b.iter().all(|v| found_in(&a, v))))
}

/// Elements that appear exactly once, in first-seen order
pub fn once(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let items = lift(required("once", args, 0)?);
    let out = items
        .iter()
        .filter(|v| items.iter().filter(|x| x == v).count() == 1)
        .cloned()
        .collect();
    Ok(Value::Arr(out))
}

/// One representative of every element that appears more than once, in
/// first-seen order
pub fn duplicates(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let items = lift(required("duplicates", args, 0)?);
    let reps = dedup(items.clone())
        .into_iter()
        .filter(|v| items.iter().filter(|x| *x == v).count() > 1)
        .collect();
    Ok(Value::Arr(reps))
}

pub fn unique(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    Ok(Value::Arr(dedup(lift(required("unique", args, 0)?))))
}

/* ===================== Tests ===================== */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::BasicContext;
    use crate::value::Value;

    fn ctx() -> BasicContext {
        BasicContext::default()
    }

    fn nums(ns: &[f64]) -> Value {
        Value::Arr(ns.iter().map(|n| Value::num(*n)).collect())
    }

    #[test]
    fn test_intersection_and_union() {
        let c = ctx();
        assert_eq!(
            intersection(&c, &[nums(&[1.0, 2.0, 2.0, 3.0]), nums(&[2.0, 3.0, 4.0])]).unwrap(),
            nums(&[2.0, 3.0])
        );
        assert_eq!(
            union(&c, &[nums(&[1.0, 2.0]), nums(&[2.0, 3.0])]).unwrap(),
            nums(&[1.0, 2.0, 3.0])
        );
    }

    #[test]
    fn test_difference_keeps_repeats() {
        let c = ctx();
        assert_eq!(
            difference(&c, &[nums(&[1.0, 2.0, 2.0, 3.0]), nums(&[3.0])]).unwrap(),
            nums(&[1.0, 2.0, 2.0])
        );
    }

    #[test]
    fn test_has() {
        let c = ctx();
        assert_eq!(
            has(&c, &[nums(&[1.0, 2.0, 3.0]), nums(&[2.0, 3.0])]).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            has(&c, &[nums(&[1.0, 2.0]), nums(&[4.0])]).unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn test_once_duplicates_unique() {
        let c = ctx();
        let v = nums(&[1.0, 2.0, 1.0, 3.0, 3.0, 4.0]);
        assert_eq!(once(&c, &[v.clone()]).unwrap(), nums(&[2.0, 4.0]));
        assert_eq!(duplicates(&c, &[v.clone()]).unwrap(), nums(&[1.0, 3.0]));
        assert_eq!(unique(&c, &[v]).unwrap(), nums(&[1.0, 2.0, 3.0, 4.0]));
    }

    #[test]
    fn test_scalars_are_lifted() {
        let c = ctx();
        assert_eq!(
            union(&c, &[Value::num(1.0), nums(&[2.0])]).unwrap(),
            nums(&[1.0, 2.0])
        );
        assert_eq!(unique(&c, &[Value::num(1.0)]).unwrap(), nums(&[1.0]));
    }
}
