//! Ordering & equality engine
//!
//! Structural equality is total; the order relation is deliberately
//! *partial*: cross-kind or unequal-composite comparisons yield
//! `Incomparable`, which callers turn into operator-specific behavior
//! (relational operators treat it as false, `<=>` raises, `cmp` avoids it
//! by forcing textual ordering first).

use crate::value::normalize::normalize;
use crate::value::Value;

/// Result of the three-way order relation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Less,
    Equal,
    Greater,
    /// No defined relative order (different kinds, or unequal composites)
    Incomparable,
}

/// Structural equality, absent-aware
///
/// Both sides are normalized first, so every absent representation
/// unifies with Null. Arrays compare element-wise, maps compare key sets
/// independent of insertion order, patterns compare source+flags, and
/// callables/actions compare by identity.
pub fn structural_eq(a: &Value, b: &Value) -> bool {
    normalize(a) == normalize(b)
}

/// Partial three-way order
///
/// Different kinds are `Incomparable`. Equal values are `Equal`.
/// Unequal arrays and maps are `Incomparable` (composites only ever
/// compare equal or incomparable). Scalars use their natural ordering:
/// lexicographic strings, numeric numbers, `false < true`.
pub fn order(a: &Value, b: &Value) -> Order {
    let a = normalize(a);
    let b = normalize(b);
    if a.kind_of() != b.kind_of() {
        return Order::Incomparable;
    }
    if a == b {
        return Order::Equal;
    }
    match (&a, &b) {
        (Value::Num(x), Value::Num(y)) => from_partial(x.partial_cmp(y)),
        (Value::Str(x), Value::Str(y)) => from_partial(x.partial_cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => from_partial(x.partial_cmp(y)),
        // Unequal arrays, maps, patterns, callables, actions
        _ => Order::Incomparable,
    }
}

fn from_partial(ord: Option<std::cmp::Ordering>) -> Order {
    match ord {
        Some(std::cmp::Ordering::Less) => Order::Less,
        Some(std::cmp::Ordering::Equal) => Order::Equal,
        Some(std::cmp::Ordering::Greater) => Order::Greater,
        None => Order::Incomparable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{ActionRef, Pattern, ValueMap};

    #[test]
    fn test_cross_kind_is_incomparable() {
        assert_eq!(order(&Value::Num(1.0), &Value::Str("1".into())), Order::Incomparable);
        assert_eq!(order(&Value::Bool(true), &Value::Num(1.0)), Order::Incomparable);
        assert_eq!(order(&Value::Null, &Value::Num(0.0)), Order::Incomparable);
    }

    #[test]
    fn test_reflexive_equal() {
        for v in [
            Value::Null,
            Value::Bool(false),
            Value::Num(3.25),
            Value::Str("abc".into()),
            Value::Arr(vec![Value::Num(1.0)]),
            Value::Map(ValueMap::new()),
        ] {
            assert_eq!(order(&v, &v), Order::Equal);
        }
    }

    #[test]
    fn test_scalar_natural_orderings() {
        assert_eq!(order(&Value::Num(1.0), &Value::Num(2.0)), Order::Less);
        assert_eq!(order(&Value::Str("b".into()), &Value::Str("a".into())), Order::Greater);
        assert_eq!(order(&Value::Bool(false), &Value::Bool(true)), Order::Less);
    }

    #[test]
    fn test_unequal_composites_are_incomparable() {
        let a = Value::Arr(vec![Value::Num(1.0)]);
        let b = Value::Arr(vec![Value::Num(2.0)]);
        assert_eq!(order(&a, &b), Order::Incomparable);

        let mut m1 = ValueMap::new();
        m1.insert("a".into(), Value::Num(1.0));
        let mut m2 = ValueMap::new();
        m2.insert("a".into(), Value::Num(2.0));
        assert_eq!(order(&Value::Map(m1), &Value::Map(m2)), Order::Incomparable);
    }

    #[test]
    fn test_structural_eq_null_family() {
        // NaN and Null unify through normalization
        assert!(structural_eq(&Value::Num(f64::NAN), &Value::Null));
        assert!(!structural_eq(&Value::Num(0.0), &Value::Null));
    }

    #[test]
    fn test_structural_eq_nested() {
        let a = Value::Arr(vec![
            Value::Num(1.0),
            Value::Arr(vec![Value::Str("x".into()), Value::Num(f64::NAN)]),
        ]);
        let b = Value::Arr(vec![
            Value::Num(1.0),
            Value::Arr(vec![Value::Str("x".into()), Value::Null]),
        ]);
        assert!(structural_eq(&a, &b));
    }

    #[test]
    fn test_structural_eq_map_order_independent() {
        let mut m1 = ValueMap::new();
        m1.insert("a".into(), Value::Num(1.0));
        m1.insert("b".into(), Value::Num(2.0));
        let mut m2 = ValueMap::new();
        m2.insert("b".into(), Value::Num(2.0));
        m2.insert("a".into(), Value::Num(1.0));
        assert!(structural_eq(&Value::Map(m1), &Value::Map(m2)));
    }

    #[test]
    fn test_pattern_and_action_ordering() {
        let p1 = Value::Pattern(Pattern::new("a", "").unwrap());
        let p2 = Value::Pattern(Pattern::new("b", "").unwrap());
        assert_eq!(order(&p1, &p2), Order::Incomparable);
        assert_eq!(order(&p1, &p1), Order::Equal);

        let act = Value::Action(ActionRef::new("x"));
        let other = Value::Action(ActionRef::new("x"));
        assert_eq!(order(&act, &other), Order::Incomparable);
        assert_eq!(order(&act, &act), Order::Equal);
    }
}
