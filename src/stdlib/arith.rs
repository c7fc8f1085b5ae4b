//! Arithmetic operators
//!
//! `+` is the odd one out: it concatenates when either side cannot be read
//! as a number. Everything else demands numbers and raises a Type failure
//! naming the offending operand.

use crate::coerce::to_text;
use crate::context::Context;
use crate::error::OpError;
use crate::value::Value;

use super::{fold_chain, need_number, required};

/* ===================== Add / Concatenate ===================== */

/// `+` - numeric addition when both operands actually are numbers,
/// string concatenation otherwise; chains across any number of operands.
/// The dispatch is by kind, not coercion, so `1 + null` concatenates
/// even though null coerces to 0 elsewhere.
pub fn add(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let val = required("+", args, 0)?;
    if args.len() == 1 {
        return Ok(val.clone());
    }
    fold_chain("+", args, |a, b| match (a, b) {
        (Value::Num(x), Value::Num(y)) => Ok(Value::num(x + y)),
        _ => Ok(Value::Str(format!("{}{}", to_text(a), to_text(b)))),
    })
}

/* ===================== Numeric Operators ===================== */

/// `-` - subtraction, or unary negation with a single operand
pub fn sub(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let val = required("-", args, 0)?;
    if args.len() == 1 {
        return Ok(Value::num(-need_number("-", val)?));
    }
    fold_chain("-", args, |a, b| {
        Ok(Value::num(need_number("-", a)? - need_number("-", b)?))
    })
}

pub fn mul(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let val = required("*", args, 0)?;
    if args.len() == 1 {
        return Ok(val.clone());
    }
    fold_chain("*", args, |a, b| {
        Ok(Value::num(need_number("*", a)? * need_number("*", b)?))
    })
}

/// `/` - division; dividing by zero is a Range failure
pub fn div(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let val = required("/", args, 0)?;
    if args.len() == 1 {
        return Ok(val.clone());
    }
    fold_chain("/", args, |a, b| {
        let x = need_number("/", a)?;
        let y = need_number("/", b)?;
        if y == 0.0 {
            return Err(OpError::Range(format!("cannot divide by zero: {} / 0", to_text(a))));
        }
        Ok(Value::num(x / y))
    })
}

/// `%` - remainder; a zero divisor yields 0 rather than failing
pub fn modulo(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let val = required("%", args, 0)?;
    if args.len() == 1 {
        return Ok(val.clone());
    }
    fold_chain("%", args, |a, b| {
        let x = need_number("%", a)?;
        let y = need_number("%", b)?;
        if y == 0.0 {
            return Ok(Value::num(0.0));
        }
        Ok(Value::num(x % y))
    })
}

/* ===================== Codepoints and Ranges ===================== */

/// Numeric codepoint to one-character string; invalid codepoints give Null
pub fn chr(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let n = need_number("chr", required("chr", args, 0)?)?;
    Ok(match char::from_u32(n as u32) {
        Some(c) => Value::Str(c.to_string()),
        None => Value::Null,
    })
}

/// Inclusive range from the first operand up to the second, stepping by 1
pub fn range(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let a = need_number("range", required("range", args, 0)?)?;
    let b = need_number("range", required("range", args, 1)?)?;
    let mut out = Vec::new();
    if a.is_finite() && b.is_finite() {
        let mut x = a;
        while x <= b {
            out.push(Value::num(x));
            x += 1.0;
        }
    }
    Ok(Value::Arr(out))
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
    fn test_add_numbers_and_concat() {
        let c = ctx();
        let r = add(&c, &[Value::num(1.0), Value::num(2.0)]).unwrap();
        assert_eq!(r, Value::num(3.0));

        // one side refuses to be a number -> concatenation
        let r = add(&c, &[Value::num(1.0), Value::Null]).unwrap();
        assert_eq!(r, Value::Str("1null".to_string()));

        let r = add(&c, &[Value::Str("a".into()), Value::num(1.0), Value::num(2.0)]).unwrap();
        assert_eq!(r, Value::Str("a12".to_string()));
    }

    #[test]
    fn test_add_single_operand_passthrough() {
        let c = ctx();
        let r = add(&c, &[Value::Str("x".into())]).unwrap();
        assert_eq!(r, Value::Str("x".to_string()));
    }

    #[test]
    fn test_sub_and_negate() {
        let c = ctx();
        assert_eq!(sub(&c, &[Value::num(5.0), Value::num(2.0)]).unwrap(), Value::num(3.0));
        assert_eq!(sub(&c, &[Value::num(5.0)]).unwrap(), Value::num(-5.0));
        assert!(matches!(
            sub(&c, &[Value::Arr(vec![]), Value::num(1.0)]),
            Err(OpError::Type(_))
        ));
    }

    #[test]
    fn test_div_by_zero_is_range_error() {
        let c = ctx();
        assert!(matches!(
            div(&c, &[Value::num(1.0), Value::num(0.0)]),
            Err(OpError::Range(_))
        ));
        assert_eq!(div(&c, &[Value::num(6.0), Value::num(2.0)]).unwrap(), Value::num(3.0));
    }

    #[test]
    fn test_modulo_by_zero_is_zero() {
        let c = ctx();
        assert_eq!(modulo(&c, &[Value::num(7.0), Value::num(0.0)]).unwrap(), Value::num(0.0));
        assert_eq!(modulo(&c, &[Value::num(7.0), Value::num(4.0)]).unwrap(), Value::num(3.0));
    }

    #[test]
    fn test_chr_and_range() {
        let c = ctx();
        assert_eq!(chr(&c, &[Value::num(65.0)]).unwrap(), Value::Str("A".into()));
        let r = range(&c, &[Value::num(1.0), Value::num(3.0)]).unwrap();
        assert_eq!(
            r,
            Value::Arr(vec![Value::num(1.0), Value::num(2.0), Value::num(3.0)])
        );
        assert_eq!(range(&c, &[Value::num(3.0), Value::num(1.0)]).unwrap(), Value::Arr(vec![]));
    }
}
