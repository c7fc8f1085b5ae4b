//! General operators
//!
//! Kind introspection, coercion, logging, defaults, and JSON transport.

use crate::coerce::{as_kind, to_number, to_text};
use crate::context::{Context, Event};
use crate::error::OpError;
use crate::value::json;
use crate::value::normalize::is_absent;
use crate::value::Value;

use super::{optional, required};

/* ===================== Kinds and Coercion ===================== */

/// `as` - convert a value to the named target kind
pub fn as_op(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let val = required("as", args, 0)?;
    let target = required("as", args, 1)?;
    match target {
        Value::Str(name) => as_kind(val, name),
        other => Err(OpError::Type(format!(
            "as() unsupported target: {} ({})",
            to_text(other),
            other.kind_of()
        ))),
    }
}

/// Template interpolation step: any value to its text form
pub fn beesting(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let val = required("beesting", args, 0)?;
    Ok(Value::Str(to_text(val)))
}

pub fn isnull(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let val = required("isnull", args, 0)?;
    Ok(Value::Bool(is_absent(val)))
}

pub fn type_of(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let val = required("typeof", args, 0)?;
    Ok(Value::Str(val.kind_of().to_string()))
}

/* ===================== Logging and Defaults ===================== */

/// `klog` - report the value through the host channel and pass it through
/// unchanged, so it can sit in the middle of an operator chain
pub fn klog(ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let val = required("klog", args, 0)?;
    let message = optional(args, 1).filter(|m| !is_absent(m)).map(to_text);
    ctx.emit(Event::Klog {
        value: val.clone(),
        message,
    });
    Ok(val.clone())
}

/// `defaultsTo` - substitute a default when the value is absent. An
/// optional message is reported as a debug event on substitution.
pub fn defaults_to(ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let val = required("defaultsTo", args, 0)?;
    let default = required("defaultsTo", args, 1)?;
    if !is_absent(val) {
        return Ok(val.clone());
    }
    if let Some(msg) = optional(args, 2).filter(|m| !is_absent(m)) {
        ctx.emit(Event::Debug {
            message: format!("[DEFAULTSTO] {}", to_text(msg)),
        });
    }
    Ok(default.clone())
}

/* ===================== JSON Transport ===================== */

/// `encode` - JSON text form; an optional second operand is the pretty
/// print indent width (0 or absent means compact)
pub fn encode(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let val = required("encode", args, 0)?;
    let indent = optional(args, 1)
        .and_then(to_number)
        .map(|n| if n > 0.0 { n as usize } else { 0 })
        .unwrap_or(0);
    Ok(Value::Str(json::encode(val, indent)?))
}

/// `decode` - parse JSON text into a value; non-string or unparseable
/// input passes through unchanged
pub fn decode(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let val = required("decode", args, 0)?;
    match val {
        Value::Str(text) => Ok(json::decode(text).unwrap_or_else(|| val.clone())),
        _ => Ok(val.clone()),
    }
}

/* ===================== Host Generators ===================== */

pub fn uuid(ctx: &dyn Context, _args: &[Value]) -> Result<Value, OpError> {
    Ok(Value::Str(ctx.new_uid()))
}

pub fn random_word(ctx: &dyn Context, _args: &[Value]) -> Result<Value, OpError> {
    Ok(Value::Str(ctx.random_word()))
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

    #[test]
    fn test_as_routes_to_coercion() {
        let c = ctx();
        assert_eq!(
            as_op(&c, &[Value::Str(" 1.23abc".into()), Value::Str("Number".into())]).unwrap(),
            Value::num(1.23)
        );
        assert!(matches!(
            as_op(&c, &[Value::num(1.0), Value::num(2.0)]),
            Err(OpError::Type(_))
        ));
    }

    #[test]
    fn test_isnull_and_typeof() {
        let c = ctx();
        assert_eq!(isnull(&c, &[Value::Null]).unwrap(), Value::Bool(true));
        assert_eq!(isnull(&c, &[Value::num(0.0)]).unwrap(), Value::Bool(false));
        assert_eq!(type_of(&c, &[Value::Str("x".into())]).unwrap(), Value::Str("String".into()));
    }

    #[test]
    fn test_defaults_to() {
        let c = ctx();
        assert_eq!(
            defaults_to(&c, &[Value::Null, Value::num(42.0)]).unwrap(),
            Value::num(42.0)
        );
        assert_eq!(
            defaults_to(&c, &[Value::num(7.0), Value::num(42.0)]).unwrap(),
            Value::num(7.0)
        );
        assert!(matches!(
            defaults_to(&c, &[Value::Null]),
            Err(OpError::General(_))
        ));
    }

    #[test]
    fn test_encode_decode() {
        let c = ctx();
        let v = Value::Arr(vec![Value::num(1.0), Value::Str("a".into())]);
        let text = encode(&c, &[v.clone()]).unwrap();
        assert_eq!(text, Value::Str(r#"[1,"a"]"#.into()));
        assert_eq!(decode(&c, &[text]).unwrap(), v);

        // unparseable input passes through
        let junk = Value::Str("{not json".into());
        assert_eq!(decode(&c, &[junk.clone()]).unwrap(), junk);
        // non-strings too
        assert_eq!(decode(&c, &[Value::num(1.0)]).unwrap(), Value::num(1.0));
    }
}
