//! Text operators
//!
//! Every operator here coerces its primary operand to text first. `substr`
//! is deliberately lenient with its numeric operands: a start or length
//! that cannot be read as a number returns the input text unchanged
//! instead of failing.

use crate::coerce::{to_number, to_pattern, to_text};
use crate::context::Context;
use crate::error::OpError;
use crate::value::Value;

use super::{optional, required};

/* ===================== Case ===================== */

pub fn capitalize(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let text = to_text(required("capitalize", args, 0)?);
    let mut chars = text.chars();
    let out = match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => text,
    };
    Ok(Value::Str(out))
}

pub fn lc(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    Ok(Value::Str(to_text(required("lc", args, 0)?).to_lowercase()))
}

pub fn uc(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    Ok(Value::Str(to_text(required("uc", args, 0)?).to_uppercase()))
}

/* ===================== Splitting and Slicing ===================== */

/// Split on a pattern or a literal separator; an empty literal separator
/// splits into individual characters
pub fn split(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let text = to_text(required("split", args, 0)?);
    let sep = required("split", args, 1)?;
    let parts: Vec<Value> = match sep {
        Value::Pattern(p) => p
            .regex()
            .split(&text)
            .map(|s| Value::Str(s.to_string()))
            .collect(),
        other => {
            let sep = to_text(other);
            if sep.is_empty() {
                text.chars().map(|c| Value::Str(c.to_string())).collect()
            } else {
                text.split(sep.as_str()).map(|s| Value::Str(s.to_string())).collect()
            }
        }
    };
    Ok(Value::Arr(parts))
}

/// Substring by start and optional length; a negative length counts back
/// from the end, and a start past the end gives Null
pub fn substr(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let text = to_text(required("substr", args, 0)?);
    let start_arg = required("substr", args, 1)?;
    let chars: Vec<char> = text.chars().collect();
    let n = chars.len() as f64;

    let start = match to_number(start_arg) {
        Some(s) => s,
        None => return Ok(Value::Str(text)),
    };
    if start > n {
        return Ok(Value::Null);
    }
    let end = match optional(args, 2) {
        None => n,
        Some(len_arg) => match to_number(len_arg) {
            None => return Ok(Value::Str(text)),
            Some(len) => {
                if len > 0.0 {
                    start + len
                } else {
                    n + len
                }
            }
        },
    };

    // clamp both bounds into the string and swap if reversed
    let a = start.max(0.0).min(n) as usize;
    let b = end.max(0.0).min(n) as usize;
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    Ok(Value::Str(chars[lo..hi].iter().collect()))
}

/* ===================== Patterns ===================== */

/// Replace a pattern match with literal text. A string pattern replaces
/// the first literal occurrence; a global pattern replaces every match.
pub fn replace(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let text = to_text(required("replace", args, 0)?);
    let pat = required("replace", args, 1)?;
    let replacement = to_text(required("replace", args, 2)?);
    let out = match pat {
        Value::Pattern(p) => {
            if p.is_global() {
                p.regex().replace_all(&text, replacement.as_str()).into_owned()
            } else {
                p.regex().replace(&text, replacement.as_str()).into_owned()
            }
        }
        other => text.replacen(&to_text(other), &replacement, 1),
    };
    Ok(Value::Str(out))
}

/// Extract matches: a global pattern gives every full match, otherwise
/// the capture groups of the first match
pub fn extract(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let text = to_text(required("extract", args, 0)?);
    let pat = to_pattern(required("extract", args, 1)?)?;
    let out: Vec<Value> = if pat.is_global() {
        pat.regex()
            .find_iter(&text)
            .map(|m| Value::Str(m.as_str().to_string()))
            .collect()
    } else {
        match pat.regex().captures(&text) {
            None => Vec::new(),
            Some(caps) => caps
                .iter()
                .skip(1)
                .map(|g| match g {
                    Some(m) => Value::Str(m.as_str().to_string()),
                    None => Value::Null,
                })
                .collect(),
        }
    };
    Ok(Value::Arr(out))
}

pub fn match_op(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let val = required("match", args, 0)?;
    let pat = to_pattern(required("match", args, 1)?)?;
    Ok(Value::Bool(pat.matches(&to_text(val))))
}

/* ===================== Codepoints ===================== */

/// First codepoint of the text form; empty input gives Null
pub fn ord(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let text = to_text(required("ord", args, 0)?);
    Ok(match text.chars().next() {
        Some(c) => Value::num(c as u32 as f64),
        None => Value::Null,
    })
}

/* ===================== Formatting ===================== */

/// `sprintf` - substitute `%d` (numeric value) or `%s` (text value) into
/// the template. A backslash protects one specifier occurrence and is
/// itself consumed; `\\` is a literal backslash.
pub fn sprintf(_ctx: &dyn Context, args: &[Value]) -> Result<Value, OpError> {
    let val = required("sprintf", args, 0)?;
    let template = to_text(required("sprintf", args, 1)?);
    let (spec, filled) = match val {
        Value::Num(_) => ("%d", to_text(val)),
        Value::Str(s) => ("%s", s.clone()),
        _ => return Ok(Value::Str(template)),
    };

    // pass 1: within each double-backslash-delimited segment, substitute
    // specifier occurrences not protected by a single backslash
    let replaced: Vec<String> = template
        .split(r"\\")
        .map(|seg| substitute_unescaped(seg, spec, &filled))
        .collect();

    // pass 2: reassemble, then strip the protecting backslash from any
    // specifier that survived
    let escaped = format!("\\{}", spec);
    Ok(Value::Str(replaced.join(r"\\").replace(&escaped, spec)))
}

fn substitute_unescaped(seg: &str, spec: &str, filled: &str) -> String {
    let bytes = seg.as_bytes();
    let mut out = String::with_capacity(seg.len());
    let mut i = 0;
    while i < seg.len() {
        if seg[i..].starts_with(spec) && (i == 0 || bytes[i - 1] != b'\\') {
            out.push_str(filled);
            i += spec.len();
        } else {
            let c = seg[i..].chars().next().unwrap();
            out.push(c);
            i += c.len_utf8();
        }
    }
    out
}

/* ===================== Tests ===================== */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::BasicContext;
    use crate::value::{Pattern, Value};

    fn ctx() -> BasicContext {
        BasicContext::default()
    }

    fn s(text: &str) -> Value {
        Value::Str(text.to_string())
    }

    #[test]
    fn test_case_operators() {
        let c = ctx();
        assert_eq!(capitalize(&c, &[s("lower case")]).unwrap(), s("Lower case"));
        assert_eq!(capitalize(&c, &[s("")]).unwrap(), s(""));
        assert_eq!(lc(&c, &[s("AbC")]).unwrap(), s("abc"));
        assert_eq!(uc(&c, &[Value::num(1.0)]).unwrap(), s("1"));
    }

    #[test]
    fn test_split() {
        let c = ctx();
        assert_eq!(
            split(&c, &[s("a;b;c"), s(";")]).unwrap(),
            Value::Arr(vec![s("a"), s("b"), s("c")])
        );
        assert_eq!(
            split(&c, &[s("ab"), s("")]).unwrap(),
            Value::Arr(vec![s("a"), s("b")])
        );
        let pat = Value::Pattern(Pattern::new("[0-9]+", "").unwrap());
        assert_eq!(
            split(&c, &[s("a1b22c"), pat]).unwrap(),
            Value::Arr(vec![s("a"), s("b"), s("c")])
        );
    }

    #[test]
    fn test_substr() {
        let c = ctx();
        assert_eq!(substr(&c, &[s("This is a string"), Value::num(5.0)]).unwrap(), s("is a string"));
        assert_eq!(
            substr(&c, &[s("This is a string"), Value::num(5.0), Value::num(4.0)]).unwrap(),
            s("is a")
        );
        // negative length counts back from the end
        assert_eq!(
            substr(&c, &[s("This is a string"), Value::num(5.0), Value::num(-5.0)]).unwrap(),
            s("is a s")
        );
        // start past the end
        assert_eq!(substr(&c, &[s("abc"), Value::num(25.0)]).unwrap(), Value::Null);
        // uncastable start passes the text through unchanged
        assert_eq!(substr(&c, &[s("abc"), Value::Arr(vec![])]).unwrap(), s("abc"));
    }

    #[test]
    fn test_replace() {
        let c = ctx();
        // literal string pattern: first occurrence only
        assert_eq!(replace(&c, &[s("aaa"), s("a"), s("b")]).unwrap(), s("baa"));
        let global = Value::Pattern(Pattern::new("a", "g").unwrap());
        assert_eq!(replace(&c, &[s("aaa"), global, s("b")]).unwrap(), s("bbb"));
        let first = Value::Pattern(Pattern::new("a", "").unwrap());
        assert_eq!(replace(&c, &[s("aaa"), first, s("b")]).unwrap(), s("baa"));
    }

    #[test]
    fn test_extract() {
        let c = ctx();
        let caps = Value::Pattern(Pattern::new("(s.+).*(.ing)", "").unwrap());
        assert_eq!(
            extract(&c, &[s("This is a string"), caps]).unwrap(),
            Value::Arr(vec![s("s is a st"), s("ring")])
        );
        let global = Value::Pattern(Pattern::new("s.", "g").unwrap());
        assert_eq!(
            extract(&c, &[s("This is a string"), global]).unwrap(),
            Value::Arr(vec![s("s "), s("s "), s("st")])
        );
        let none = Value::Pattern(Pattern::new("xyz", "").unwrap());
        assert_eq!(extract(&c, &[s("abc"), none]).unwrap(), Value::Arr(vec![]));
    }

    #[test]
    fn test_ord() {
        let c = ctx();
        assert_eq!(ord(&c, &[s("Hello")]).unwrap(), Value::num(72.0));
        assert_eq!(ord(&c, &[s("")]).unwrap(), Value::Null);
    }

    #[test]
    fn test_sprintf() {
        let c = ctx();
        assert_eq!(sprintf(&c, &[Value::num(1.0), s("before %d after")]).unwrap(), s("before 1 after"));
        assert_eq!(sprintf(&c, &[s("x"), s("%s %s")]).unwrap(), s("x x"));
        // escaped specifier survives with its backslash consumed
        assert_eq!(sprintf(&c, &[Value::num(1.0), s(r"%d = \%d")]).unwrap(), s("1 = %d"));
        // double backslash is a literal backslash, not an escape
        assert_eq!(sprintf(&c, &[Value::num(1.0), s(r"a\\%d")]).unwrap(), s(r"a\\1"));
        // non-numeric, non-text value leaves the template alone
        assert_eq!(sprintf(&c, &[Value::Arr(vec![]), s("%s")]).unwrap(), s("%s"));
    }
}
