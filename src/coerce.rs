//! Coercion engine
//!
//! Directional conversions between kinds (`to_text`, `to_number`,
//! `to_pattern`) and the generic `as` operator built on them. `to_number`
//! signals "cannot cast" with `None`; arithmetic checks for the sentinel
//! before computing and raises a `Type` failure naming the operand.

use crate::error::OpError;
use crate::value::normalize::normalize;
use crate::value::{Kind, Pattern, Value};

/* ===================== Text ===================== */

/// Canonical text form of a value
///
/// Numbers print in decimal with no trailing `.0` for integers; patterns
/// print as `re#<source>#<flags>`; composites and callables print as opaque
/// `[Kind]` literals.
pub fn to_text(v: &Value) -> String {
    match v {
        Value::Str(s) => s.clone(),
        Value::Null => "null".to_string(),
        Value::Num(n) if n.is_nan() => "null".to_string(),
        Value::Bool(b) => if *b { "true" } else { "false" }.to_string(),
        Value::Num(n) => num_to_text(*n),
        Value::Pattern(p) => format!("re#{}#{}", p.source(), p.flags()),
        other => format!("[{}]", other.kind_of()),
    }
}

fn num_to_text(n: f64) -> String {
    if n == 0.0 {
        // Collapses negative zero
        "0".to_string()
    } else {
        format!("{}", n)
    }
}

/// Coerce a value into a map key string
pub fn to_key(v: &Value) -> String {
    to_text(v)
}

/// Coerce a value into a path: a bare non-array argument is a one-segment
/// path, and every segment becomes a key string
pub fn to_key_path(path: &Value) -> Vec<String> {
    match path {
        Value::Arr(items) => items.iter().map(to_key).collect(),
        other => vec![to_key(other)],
    }
}

/* ===================== Numbers ===================== */

/// Numeric form of a value; `None` is the cannot-cast sentinel
pub fn to_number(v: &Value) -> Option<f64> {
    match v {
        Value::Num(n) if n.is_nan() => Some(0.0),
        Value::Num(n) => Some(*n),
        Value::Null => Some(0.0),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Str(s) => parse_float_prefix(s),
        _ => None,
    }
}

/// Parse the leading numeric prefix of a string as a float
///
/// Leading whitespace is skipped; the longest valid prefix of the form
/// `[+-]?digits[.digits][e[+-]digits]` wins; no valid prefix yields `None`.
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut i = 0;

    if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let has_int = i > int_start;
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if !has_int && i == frac_start {
            // Just a sign and/or dot, no digits anywhere
            return None;
        }
    } else if !has_int {
        return None;
    }

    // Optional exponent, only consumed when well formed
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    s[..i].parse::<f64>().ok()
}

/* ===================== Patterns ===================== */

/// Pattern form of a value: a pattern is itself, a string compiles, and
/// every other kind is a coercion failure
pub fn to_pattern(v: &Value) -> Result<Pattern, OpError> {
    match v {
        Value::Pattern(p) => Ok(p.clone()),
        Value::Str(s) => Pattern::new(s, ""),
        other => Err(OpError::Type(format!(
            "cannot coerce {} to a pattern",
            other.kind_of()
        ))),
    }
}

/* ===================== The `as` Operator ===================== */

/// Generic kind conversion
///
/// Same-kind is identity for every kind; otherwise only `Boolean`,
/// `String`, `Number`, and `Pattern` targets are supported. `Number`
/// treats absent as 0 and failing string parses as Null instead of
/// raising, which is deliberately more lenient than arithmetic.
pub fn as_kind(v: &Value, target_name: &str) -> Result<Value, OpError> {
    let target = Kind::from_name(target_name);
    let kind = v.kind_of();
    if target == Some(kind) {
        return Ok(v.clone());
    }

    match target {
        Some(Kind::Boolean) => Ok(Value::Bool(match v {
            Value::Str(s) if s == "false" => false,
            Value::Num(n) if !n.is_nan() => *n != 0.0,
            other => normalize(other).is_truthy(),
        })),
        Some(Kind::String) => Ok(Value::Str(to_text(v))),
        Some(Kind::Number) => match v {
            Value::Null => Ok(Value::Num(0.0)),
            Value::Num(n) if n.is_nan() => Ok(Value::Num(0.0)),
            Value::Bool(b) => Ok(Value::Num(if *b { 1.0 } else { 0.0 })),
            Value::Str(s) => Ok(match parse_float_prefix(s) {
                Some(n) => Value::num(n),
                None => Value::Null,
            }),
            other => Err(cannot_cast(other, target_name)),
        },
        Some(Kind::Pattern) => match v {
            Value::Str(s) => Ok(Value::Pattern(Pattern::new(s, "")?)),
            other => Err(cannot_cast(other, target_name)),
        },
        _ => Err(cannot_cast(v, target_name)),
    }
}

fn cannot_cast(v: &Value, target_name: &str) -> OpError {
    OpError::Type(format!(
        "cannot use .as(\"{}\") operator with {} ({})",
        target_name,
        to_text(v),
        v.kind_of()
    ))
}

/* ===================== Tests ===================== */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueMap;

    #[test]
    fn test_to_text_scalars() {
        assert_eq!(to_text(&Value::Null), "null");
        assert_eq!(to_text(&Value::Bool(true)), "true");
        assert_eq!(to_text(&Value::Bool(false)), "false");
        assert_eq!(to_text(&Value::Str("hi".into())), "hi");
    }

    #[test]
    fn test_to_text_numbers_drop_integer_fraction() {
        assert_eq!(to_text(&Value::Num(1.0)), "1");
        assert_eq!(to_text(&Value::Num(-42.0)), "-42");
        assert_eq!(to_text(&Value::Num(1.5)), "1.5");
        assert_eq!(to_text(&Value::Num(-0.0)), "0");
    }

    #[test]
    fn test_to_text_opaque_forms() {
        assert_eq!(to_text(&Value::Arr(vec![])), "[Array]");
        assert_eq!(to_text(&Value::Map(ValueMap::new())), "[Map]");
        let p = Pattern::new("^a.c$", "i").unwrap();
        assert_eq!(to_text(&Value::Pattern(p)), "re#^a.c$#i");
        let bare = Pattern::new("ab", "").unwrap();
        assert_eq!(to_text(&Value::Pattern(bare)), "re#ab#");
    }

    #[test]
    fn test_parse_float_prefix() {
        assert_eq!(parse_float_prefix("1.23"), Some(1.23));
        assert_eq!(parse_float_prefix(" 1.23"), Some(1.23));
        assert_eq!(parse_float_prefix("-1.23kg"), Some(-1.23));
        assert_eq!(parse_float_prefix("4e2"), Some(400.0));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("7."), Some(7.0));
        assert_eq!(parse_float_prefix("abc"), None);
        assert_eq!(parse_float_prefix(""), None);
        assert_eq!(parse_float_prefix("-"), None);
        assert_eq!(parse_float_prefix("e5"), None);
    }

    #[test]
    fn test_to_number() {
        assert_eq!(to_number(&Value::Num(2.0)), Some(2.0));
        assert_eq!(to_number(&Value::Null), Some(0.0));
        assert_eq!(to_number(&Value::Bool(true)), Some(1.0));
        assert_eq!(to_number(&Value::Str("3.5x".into())), Some(3.5));
        assert_eq!(to_number(&Value::Str("x".into())), None);
        assert_eq!(to_number(&Value::Arr(vec![])), None);
    }

    #[test]
    fn test_as_number_lenient_failures() {
        // String parse failure becomes Null, not an error
        assert_eq!(as_kind(&Value::Str("nope".into()), "Number"), Ok(Value::Null));
        assert_eq!(as_kind(&Value::Str("-1.23".into()), "Number"), Ok(Value::Num(-1.23)));
        assert_eq!(as_kind(&Value::Str(" 1.23".into()), "Number"), Ok(Value::Num(1.23)));
        assert_eq!(as_kind(&Value::Null, "Number"), Ok(Value::Num(0.0)));
    }

    #[test]
    fn test_as_nan_to_string_is_null_text() {
        assert_eq!(
            as_kind(&Value::Num(f64::NAN), "String"),
            Ok(Value::Str("null".into()))
        );
    }

    #[test]
    fn test_as_boolean() {
        assert_eq!(as_kind(&Value::Str("false".into()), "Boolean"), Ok(Value::Bool(false)));
        assert_eq!(as_kind(&Value::Str("x".into()), "Boolean"), Ok(Value::Bool(true)));
        assert_eq!(as_kind(&Value::Str("".into()), "Boolean"), Ok(Value::Bool(false)));
        assert_eq!(as_kind(&Value::Num(0.0), "Boolean"), Ok(Value::Bool(false)));
        assert_eq!(as_kind(&Value::Num(7.0), "Boolean"), Ok(Value::Bool(true)));
        assert_eq!(as_kind(&Value::Null, "Boolean"), Ok(Value::Bool(false)));
        assert_eq!(as_kind(&Value::Arr(vec![]), "Boolean"), Ok(Value::Bool(true)));
    }

    #[test]
    fn test_as_same_kind_identity() {
        let arr = Value::Arr(vec![Value::Num(1.0)]);
        assert_eq!(as_kind(&arr, "Array"), Ok(arr.clone()));
    }

    #[test]
    fn test_as_unsupported_target_fails() {
        let err = as_kind(&Value::Num(1.0), "Array").unwrap_err();
        assert!(matches!(err, OpError::Type(_)));
        let err = as_kind(&Value::Num(1.0), "Widget").unwrap_err();
        assert!(matches!(err, OpError::Type(_)));
    }

    #[test]
    fn test_to_pattern() {
        assert!(to_pattern(&Value::Str("a+b".into())).is_ok());
        assert!(to_pattern(&Value::Num(1.0)).is_err());
    }

    #[test]
    fn test_to_key_path() {
        assert_eq!(to_key_path(&Value::Str("a".into())), vec!["a".to_string()]);
        assert_eq!(
            to_key_path(&Value::Arr(vec![Value::Str("a".into()), Value::Num(3.0)])),
            vec!["a".to_string(), "3".to_string()]
        );
    }
}
