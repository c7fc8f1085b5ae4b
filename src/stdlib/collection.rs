//! Collection operators
//!
//! The higher-order operators are all built on [`crate::iter::iterate`],
//! which awaits each callable invocation before starting the next. A
//! scalar operand is walked as a single-element sequence, which is why
//! `map` on a scalar produces a one-element array.

use indexmap::IndexMap;

use crate::coerce::{to_number, to_text};
use crate::context::{Context, Event};
use crate::error::OpError;
use crate::iter::{element_args, entries, invoke, iterate, Walk};
use crate::order::structural_eq;
use crate::value::normalize::normalize;
use crate::value::{Value, ValueMap};

use super::{need_number, optional, required};

/* ===================== Predicates ===================== */

/// `all` - whether the callable is truthy for every element; stops at
/// the first falsy result
pub async fn all(ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let val = required("all", args, 0)?;
    let iter = required("all", args, 1)?;
    let mut ok = true;
    iterate(ctx, val, iter, element_args, |_, _, r| {
        if r.is_truthy() {
            Walk::Continue
        } else {
            ok = false;
            Walk::Stop
        }
    })
    .await?;
    Ok(Value::Bool(ok))
}

pub async fn notall(ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    match all(ctx, args).await? {
        Value::Bool(b) => Ok(Value::Bool(!b)),
        other => Ok(other),
    }
}

/// `any` - whether the callable is truthy for some element; stops at
/// the first truthy result
pub async fn any(ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let val = required("any", args, 0)?;
    let iter = required("any", args, 1)?;
    let mut found = false;
    iterate(ctx, val, iter, element_args, |_, _, r| {
        if r.is_truthy() {
            found = true;
            Walk::Stop
        } else {
            Walk::Continue
        }
    })
    .await?;
    Ok(Value::Bool(found))
}

pub async fn none(ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    match any(ctx, args).await? {
        Value::Bool(b) => Ok(Value::Bool(!b)),
        other => Ok(other),
    }
}

/* ===================== Transformations ===================== */

/// `map` - apply the callable to every element, preserving the
/// container shape (maps stay maps, everything else becomes an array)
pub async fn map_op(ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let val = required("map", args, 0)?;
    let iter = required("map", args, 1)?;
    let as_map = matches!(val, Value::Map(_));
    let mut arr = Vec::new();
    let mut map = ValueMap::new();
    iterate(ctx, val, iter, element_args, |_, key, r| {
        if as_map {
            map.insert(to_text(key), r);
        } else {
            arr.push(r);
        }
        Walk::Continue
    })
    .await?;
    Ok(if as_map { Value::Map(map) } else { Value::Arr(arr) })
}

/// `filter` - keep elements for which the callable is truthy,
/// preserving the container shape
pub async fn filter(ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let val = required("filter", args, 0)?;
    let iter = required("filter", args, 1)?;
    let as_map = matches!(val, Value::Map(_));
    let mut arr = Vec::new();
    let mut map = ValueMap::new();
    iterate(ctx, val, iter, element_args, |elem, key, r| {
        if r.is_truthy() {
            if as_map {
                map.insert(to_text(key), elem.clone());
            } else {
                arr.push(elem.clone());
            }
        }
        Walk::Continue
    })
    .await?;
    Ok(if as_map { Value::Map(map) } else { Value::Arr(arr) })
}

/// `collect` - group elements by the text form of the callable's
/// result, first-seen group order, per-group insertion order
pub async fn collect(ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let val = required("collect", args, 0)?;
    let iter = required("collect", args, 1)?;
    let mut groups: IndexMap<String, Vec<Value>> = IndexMap::new();
    iterate(ctx, val, iter, element_args, |elem, _, r| {
        groups.entry(to_text(&r)).or_default().push(elem.clone());
        Walk::Continue
    })
    .await?;
    let mut out = ValueMap::new();
    for (k, members) in groups {
        out.insert(k, Value::Arr(members));
    }
    Ok(Value::Map(out))
}

/// `reduce` - left fold. No elements gives 0 (or the default); a single
/// element without a default is returned as-is, the callable untouched.
pub async fn reduce(ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let val = required("reduce", args, 0)?;
    let iter = required("reduce", args, 1)?;
    let default = optional(args, 2);

    let snapshot = normalize(val);
    let items = entries(&snapshot);
    if items.is_empty() {
        return Ok(default.cloned().unwrap_or_else(|| Value::num(0.0)));
    }
    if items.len() == 1 {
        let elem = items[0].1.clone();
        return match default {
            Some(d) => invoke(ctx, iter, vec![d.clone(), elem]).await,
            None => Ok(elem),
        };
    }

    let (mut acc, rest) = match default {
        Some(d) => (d.clone(), &items[..]),
        None => (items[0].1.clone(), &items[1..]),
    };
    for (key, elem) in rest {
        acc = invoke(
            ctx,
            iter,
            vec![acc, elem.clone(), key.clone(), snapshot.clone()],
        )
        .await?;
    }
    Ok(acc)
}

/// `pairwise` - zip two or more sequences through the callable, up to
/// the longest one, padding the shorter with Null
pub async fn pairwise(ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let val = required("pairwise", args, 0)?;
    let iter = required("pairwise", args, 1)?;
    let seqs = match val {
        Value::Arr(seqs) if seqs.len() >= 2 => seqs,
        Value::Arr(_) => {
            return Err(OpError::Type(
                "pairwise needs at least 2 sequences".to_string(),
            ))
        }
        other => {
            return Err(OpError::Type(format!(
                "pairwise operator cannot use {} ({})",
                to_text(other),
                other.kind_of()
            )))
        }
    };
    let lists: Vec<Vec<Value>> = seqs
        .iter()
        .map(|s| match s {
            Value::Arr(items) => items.clone(),
            scalar => vec![scalar.clone()],
        })
        .collect();
    let longest = lists.iter().map(Vec::len).max().unwrap_or(0);
    let mut out = Vec::with_capacity(longest);
    for i in 0..longest {
        let row: Vec<Value> = lists
            .iter()
            .map(|l| l.get(i).cloned().unwrap_or(Value::Null))
            .collect();
        out.push(invoke(ctx, iter, row).await?);
    }
    Ok(Value::Arr(out))
}

/* ===================== Sorting ===================== */

fn sort_key_num(v: &Value) -> f64 {
    to_number(v).unwrap_or(0.0)
}

/// `sort` - sort an array by a named strategy or a comparator callable.
/// Named strategies are stable; the comparator form runs an adjacent
/// swap scan with exactly one comparison in flight at a time, swapping
/// when the result is positive. Non-arrays pass through unchanged.
pub async fn sort(ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let val = required("sort", args, 0)?;
    let mut sorted = match val {
        Value::Arr(items) => items.clone(),
        other => return Ok(other.clone()),
    };
    match optional(args, 1) {
        Some(by @ Value::Callable(_)) => {
            let len = sorted.len();
            for i in (1..len).rev() {
                for j in 1..=i {
                    let r = invoke(ctx, by, vec![sorted[j - 1].clone(), sorted[j].clone()]).await?;
                    if to_number(&r).unwrap_or(0.0) > 0.0 {
                        sorted.swap(j - 1, j);
                    }
                }
            }
        }
        Some(Value::Str(s)) if s == "reverse" => {
            sorted.sort_by(|a, b| to_text(b).cmp(&to_text(a)))
        }
        Some(Value::Str(s)) if s == "numeric" => {
            sorted.sort_by(|a, b| sort_key_num(a).total_cmp(&sort_key_num(b)))
        }
        Some(Value::Str(s)) if s == "ciremun" => {
            sorted.sort_by(|a, b| sort_key_num(b).total_cmp(&sort_key_num(a)))
        }
        _ => sorted.sort_by(|a, b| to_text(a).cmp(&to_text(b))),
    }
    Ok(Value::Arr(sorted))
}

/* ===================== Plain Array Operators ===================== */

/// `append` - concatenate; scalars lift to one-element arrays, array
/// operands flatten one level
pub fn append(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let val = required("append", args, 0)?;
    let mut out = match val {
        Value::Arr(items) => items.clone(),
        other => vec![other.clone()],
    };
    for other in &args[1..] {
        match other {
            Value::Arr(items) => out.extend(items.iter().cloned()),
            v => out.push(v.clone()),
        }
    }
    Ok(Value::Arr(out))
}

pub fn head(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    Ok(match required("head", args, 0)? {
        Value::Arr(items) => items.first().cloned().unwrap_or(Value::Null),
        _ => Value::Null,
    })
}

pub fn tail(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    Ok(match required("tail", args, 0)? {
        Value::Arr(items) => Value::Arr(items.iter().skip(1).cloned().collect()),
        _ => Value::Arr(Vec::new()),
    })
}

/// First index at which the element appears, or -1
pub fn index_of(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let val = required("index", args, 0)?;
    let elm = required("index", args, 1)?;
    let idx = match val {
        Value::Arr(items) => items
            .iter()
            .position(|x| structural_eq(x, elm))
            .map(|i| i as f64)
            .unwrap_or(-1.0),
        _ => -1.0,
    };
    Ok(Value::num(idx))
}

pub fn join(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let val = required("join", args, 0)?;
    let items = match val {
        Value::Arr(items) => items,
        other => return Ok(other.clone()),
    };
    let sep = optional(args, 1).map(to_text).unwrap_or_else(|| ",".to_string());
    let parts: Vec<String> = items.iter().map(to_text).collect();
    Ok(Value::Str(parts.join(&sep)))
}

pub fn length(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let n = match required("length", args, 0)? {
        Value::Arr(items) => items.len(),
        Value::Map(m) => m.len(),
        Value::Str(s) => s.chars().count(),
        _ => 0,
    };
    Ok(Value::num(n as f64))
}

pub fn reverse(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    Ok(match required("reverse", args, 0)? {
        Value::Arr(items) => Value::Arr(items.iter().rev().cloned().collect()),
        other => other.clone(),
    })
}

/// `slice` - inclusive slice; out-of-range bounds are reported as an
/// error event and give Null instead of failing the expression
pub fn slice(ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let val = required("slice", args, 0)?;
    let items = match val {
        Value::Arr(items) => items,
        other => {
            return Err(OpError::Type(format!(
                "slice operator cannot use {} ({})",
                to_text(other),
                other.kind_of()
            )))
        }
    };
    let n = items.len() as f64;
    let a = need_number("slice", required("slice", args, 1)?)?;

    let out_of_range = |bound: f64| {
        ctx.emit(Event::Error {
            message: format!("slice index out of range: {} (length {})", bound, items.len()),
        });
        Value::Null
    };

    match optional(args, 2) {
        None => {
            if a < 0.0 || a > n {
                return Ok(out_of_range(a));
            }
            let end = ((a as usize) + 1).min(items.len());
            Ok(Value::Arr(items[..end].to_vec()))
        }
        Some(b_arg) => {
            let b = need_number("slice", b_arg)?;
            if a < 0.0 || a > n {
                return Ok(out_of_range(a));
            }
            if b < 0.0 || b > n {
                return Ok(out_of_range(b));
            }
            let start = a as usize;
            let end = ((b as usize) + 1).min(items.len());
            if start >= end {
                return Ok(Value::Arr(Vec::new()));
            }
            Ok(Value::Arr(items[start..end].to_vec()))
        }
    }
}

/// `splice` - remove a run of elements, optionally inserting a value in
/// its place (arrays splice in flat); indices clamp to the array
pub fn splice(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let val = required("splice", args, 0)?;
    let items = match val {
        Value::Arr(items) => items,
        other => {
            return Err(OpError::Type(format!(
                "splice operator cannot use {} ({})",
                to_text(other),
                other.kind_of()
            )))
        }
    };
    let start = need_number("splice", required("splice", args, 1)?)?;
    let n_remove = need_number("splice", required("splice", args, 2)?)?;

    let len = items.len();
    let lo = (start.max(0.0) as usize).min(len);
    let hi = (lo + n_remove.max(0.0) as usize).min(len);

    let mut out = items[..lo].to_vec();
    if let Some(insert) = optional(args, 3) {
        match insert {
            Value::Arr(extra) => out.extend(extra.iter().cloned()),
            other => out.push(other.clone()),
        }
    }
    out.extend_from_slice(&items[hi..]);
    Ok(Value::Arr(out))
}

/* ===================== Tests ===================== */
