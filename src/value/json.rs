//! JSON bridge for `encode`/`decode`
//!
//! The canonical absent value serializes as `null`; `Pattern`, `Callable`,
//! and `Action` serialize as their opaque text forms (`"re#...#..."`,
//! `"[Function]"`, `"[Action]"`) and intentionally do not round-trip.

use crate::coerce::to_text;
use crate::error::OpError;
use crate::value::{Value, ValueMap};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value as JsonValue;

/// Lower a runtime value to a JSON value
pub fn to_json(v: &Value) -> JsonValue {
    match v {
        Value::Null => JsonValue::Null,
        Value::Num(n) if n.is_nan() => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Num(n) => num_to_json(*n),
        Value::Str(s) => JsonValue::String(s.clone()),
        Value::Arr(items) => JsonValue::Array(items.iter().map(to_json).collect()),
        Value::Map(map) => JsonValue::Object(
            map.iter().map(|(k, val)| (k.clone(), to_json(val))).collect(),
        ),
        // Opaque kinds keep their text literal forms
        opaque => JsonValue::String(to_text(opaque)),
    }
}

fn num_to_json(n: f64) -> JsonValue {
    // Integral doubles encode without a fraction part ("1", not "1.0")
    if n.fract() == 0.0 && n.abs() < (i64::MAX as f64) {
        JsonValue::Number((n as i64).into())
    } else {
        serde_json::Number::from_f64(n)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null)
    }
}

/// Lift a JSON value into a runtime value
///
/// Object key order is preserved (serde_json is built with
/// `preserve_order`), so decoded maps keep their insertion order.
pub fn from_json(j: &JsonValue) -> Value {
    match j {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => Value::num(n.as_f64().unwrap_or(f64::NAN)),
        JsonValue::String(s) => Value::Str(s.clone()),
        JsonValue::Array(items) => Value::Arr(items.iter().map(from_json).collect()),
        JsonValue::Object(obj) => Value::Map(
            obj.iter()
                .map(|(k, val)| (k.clone(), from_json(val)))
                .collect::<ValueMap>(),
        ),
    }
}

/// Encode a value as JSON text
///
/// `indent` of 0 is compact; >= 1 pretty-prints with that many spaces.
pub fn encode(v: &Value, indent: usize) -> Result<String, OpError> {
    let j = to_json(v);
    if indent == 0 {
        serde_json::to_string(&j).map_err(|e| OpError::Type(format!("encode failed: {}", e)))
    } else {
        let pad = " ".repeat(indent);
        let mut out = Vec::new();
        let formatter = PrettyFormatter::with_indent(pad.as_bytes());
        let mut ser = Serializer::with_formatter(&mut out, formatter);
        j.serialize(&mut ser)
            .map_err(|e| OpError::Type(format!("encode failed: {}", e)))?;
        String::from_utf8(out).map_err(|e| OpError::Type(format!("encode failed: {}", e)))
    }
}

/// Decode JSON text into a value; `None` when the text is not valid JSON
pub fn decode(text: &str) -> Option<Value> {
    serde_json::from_str::<JsonValue>(text).ok().map(|j| from_json(&j))
}
