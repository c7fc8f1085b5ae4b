//! Null normalization
//!
//! The language has several "absent" representations at its call boundary
//! (missing argument, not-a-number, explicit absent marker); after
//! normalization there is exactly one: `Value::Null`. Normalization is a
//! deep, non-mutating rebuild even when nothing changes, because callers
//! rely on "normalize implies safe-to-alias-internally".

use crate::value::Value;

/// True for Null-kind values (including a raw NaN number)
pub fn is_absent(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::Num(n) => n.is_nan(),
        _ => false,
    }
}

/// Rewrite a value so every absent marker at any depth becomes canonical Null
///
/// Composites are rebuilt bottom-up with no shared structure. A map's
/// absent-valued entries are normalized in place; the key set is untouched
/// (only `delete` removes keys).
pub fn normalize(v: &Value) -> Value {
    match v {
        Value::Num(n) if n.is_nan() => Value::Null,
        Value::Arr(items) => Value::Arr(items.iter().map(normalize).collect()),
        Value::Map(map) => Value::Map(
            map.iter()
                .map(|(k, val)| (k.clone(), normalize(val)))
                .collect(),
        ),
        other => other.clone(),
    }
}
