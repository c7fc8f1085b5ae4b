//! Structural path operators
//!
//! A path is a list of segments; each segment is a Map key as text or a
//! non-negative integer Array index. Updates are copy-on-write along the
//! path, so inputs are never mutated and untouched branches are shared.

use crate::coerce::to_key_path;
use crate::context::Context;
use crate::error::OpError;
use crate::value::{Value, ValueMap};

use super::{optional, required};

/* ===================== Resolution ===================== */

fn resolve<'a>(container: &'a Value, path: &[String]) -> Option<&'a Value> {
    let mut cur = container;
    for seg in path {
        cur = match cur {
            Value::Map(m) => m.get(seg)?,
            Value::Arr(items) => items.get(seg.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(cur)
}

/// `get` - read the value at a path; any resolution failure is Null,
/// never an error
pub fn get(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let obj = required("get", args, 0)?;
    let path = to_key_path(required("get", args, 1)?);
    if !matches!(obj, Value::Arr(_) | Value::Map(_)) {
        return Ok(Value::Null);
    }
    Ok(resolve(obj, &path).cloned().unwrap_or(Value::Null))
}

/* ===================== Set ===================== */

/// `set` - install a value at a path without creating intermediate
/// structure; an unresolvable path leaves the container unchanged
pub fn set(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let obj = required("set", args, 0)?;
    let path = to_key_path(required("set", args, 1)?);
    let val = required("set", args, 2)?;
    if path.is_empty() {
        return Ok(val.clone());
    }
    Ok(set_at(obj, &path, val))
}

fn set_at(cur: &Value, path: &[String], val: &Value) -> Value {
    let (seg, rest) = match path.split_first() {
        Some(p) => p,
        None => return val.clone(),
    };
    match cur {
        Value::Map(m) => {
            if rest.is_empty() {
                let mut m = m.clone();
                m.insert(seg.clone(), val.clone());
                Value::Map(m)
            } else if let Some(inner) = m.get(seg) {
                let updated = set_at(inner, rest, val);
                let mut m = m.clone();
                m.insert(seg.clone(), updated);
                Value::Map(m)
            } else {
                cur.clone()
            }
        }
        Value::Arr(items) => match seg.parse::<usize>() {
            // in-range-or-append only at the final segment
            Ok(idx) if rest.is_empty() && idx <= items.len() => {
                let mut items = items.clone();
                if idx == items.len() {
                    items.push(val.clone());
                } else {
                    items[idx] = val.clone();
                }
                Value::Arr(items)
            }
            Ok(idx) if idx < items.len() => {
                let mut items = items.clone();
                items[idx] = set_at(&items[idx], rest, val);
                Value::Arr(items)
            }
            _ => cur.clone(),
        },
        other => other.clone(),
    }
}

/* ===================== Put ===================== */

/// `put` - install a value at a path, creating intermediate Maps as
/// needed. An Array along the path survives only if the next segment is
/// a safe index (in range or one past the end); otherwise it is
/// converted to a Map keyed by its positional indices as text. The
/// final segment always overwrites. With an empty path, Maps merge
/// shallowly, Arrays overlay positionally, and anything else is
/// replaced wholesale.
pub fn put(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let val = required("put", args, 0)?;
    match args.len() {
        1 => Ok(val.clone()),
        2 => Ok(put_at(val, &[], &args[1])),
        _ => Ok(put_at(val, &to_key_path(&args[1]), &args[2])),
    }
}

fn put_at(cur: &Value, path: &[String], to_set: &Value) -> Value {
    let (seg, rest) = match path.split_first() {
        Some(p) => p,
        None => return merge_root(cur, to_set),
    };
    match cur {
        Value::Map(m) => {
            let mut m = m.clone();
            let updated = if rest.is_empty() {
                to_set.clone()
            } else {
                let inner = m.get(seg).cloned().unwrap_or(Value::Null);
                put_at(&inner, rest, to_set)
            };
            m.insert(seg.clone(), updated);
            Value::Map(m)
        }
        Value::Arr(items) => match safe_index(items, seg) {
            Some(idx) => {
                let mut items = items.clone();
                let updated = if rest.is_empty() {
                    to_set.clone()
                } else {
                    let inner = items.get(idx).cloned().unwrap_or(Value::Null);
                    put_at(&inner, rest, to_set)
                };
                if idx == items.len() {
                    items.push(updated);
                } else {
                    items[idx] = updated;
                }
                Value::Arr(items)
            }
            None => {
                // unsafe index: demote the array to a map of its
                // positional indices, then continue as a map
                let mut m = ValueMap::new();
                for (i, v) in items.iter().enumerate() {
                    m.insert(i.to_string(), v.clone());
                }
                put_at(&Value::Map(m), path, to_set)
            }
        },
        _ => put_at(&Value::Map(ValueMap::new()), path, to_set),
    }
}

fn safe_index(items: &[Value], seg: &str) -> Option<usize> {
    seg.parse::<usize>().ok().filter(|idx| *idx <= items.len())
}

fn merge_root(cur: &Value, to_set: &Value) -> Value {
    match (cur, to_set) {
        (Value::Map(a), Value::Map(b)) => {
            let mut m = a.clone();
            for (k, v) in b {
                m.insert(k.clone(), v.clone());
            }
            Value::Map(m)
        }
        (Value::Arr(a), Value::Arr(b)) => {
            let mut items = a.clone();
            for (i, v) in b.iter().enumerate() {
                if i < items.len() {
                    items[i] = v.clone();
                } else {
                    items.push(v.clone());
                }
            }
            Value::Arr(items)
        }
        _ => to_set.clone(),
    }
}

/* ===================== Delete ===================== */

/// `delete` - remove the value at a path: Map keys are removed, Array
/// positions are unset to Null. An unresolved path is a no-op clone.
pub fn delete(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let obj = required("delete", args, 0)?;
    let path = to_key_path(required("delete", args, 1)?);
    Ok(delete_at(obj, &path))
}

fn delete_at(cur: &Value, path: &[String]) -> Value {
    let (seg, rest) = match path.split_first() {
        Some(p) => p,
        None => return cur.clone(),
    };
    match cur {
        Value::Map(m) => {
            let mut m = m.clone();
            if rest.is_empty() {
                m.shift_remove(seg);
            } else if let Some(inner) = m.get(seg) {
                let updated = delete_at(inner, rest);
                m.insert(seg.clone(), updated);
            }
            Value::Map(m)
        }
        Value::Arr(items) => {
            let mut items = items.clone();
            if let Ok(idx) = seg.parse::<usize>() {
                if idx < items.len() {
                    if rest.is_empty() {
                        items[idx] = Value::Null;
                    } else {
                        items[idx] = delete_at(&items[idx], rest);
                    }
                }
            }
            Value::Arr(items)
        }
        other => other.clone(),
    }
}

/* ===================== Keys and Values ===================== */

/// `keys` - the keys of a Map or the indices of an Array, optionally at
/// a path; `[]` for anything else
pub fn keys(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    project(args, "keys", |target| match target {
        Value::Arr(items) => (0..items.len()).map(|i| Value::num(i as f64)).collect(),
        Value::Map(m) => m.keys().map(|k| Value::Str(k.clone())).collect(),
        _ => Vec::new(),
    })
}

/// `values` - the elements of an Array or the values of a Map,
/// optionally at a path; `[]` for anything else
pub fn values(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    project(args, "values", |target| match target {
        Value::Arr(items) => items.clone(),
        Value::Map(m) => m.values().cloned().collect(),
        _ => Vec::new(),
    })
}

fn project(
    args: &[Value],
    op: &str,
    f: impl Fn(&Value) -> Vec<Value>,
) -> Result<Value, OpError> {
    let obj = required(op, args, 0)?;
    let target = match optional(args, 1) {
        Some(p) => match resolve(obj, &to_key_path(p)) {
            Some(v) => v,
            None => return Ok(Value::Arr(Vec::new())),
        },
        None => obj,
    };
    Ok(Value::Arr(f(target)))
}

/* ===================== Tests ===================== */
