//! Operator standard library
//!
//! This module contains all built-in operator implementations organized by
//! category, plus the dispatcher that routes an operator name to its
//! implementation. The uniform surface is
//! `call(ctx, name, operands) -> result-or-failure`.
//!
//! Operands are normalized on entry. Normalization never changes the operand
//! count, so per-operator arity checks still see missing arguments as
//! missing, not as Null.

pub mod arith;
pub mod collection;
pub mod compare;
pub mod general;
pub mod path;
pub mod sets;
pub mod string;

#[cfg(test)]
mod tests;

use crate::coerce::{to_number, to_text};
use crate::context::Context;
use crate::error::OpError;
use crate::value::normalize::normalize;
use crate::value::Value;

/* ===================== Dispatcher ===================== */

/// Call an operator by name
///
/// Scalar operators complete synchronously inside the returned future;
/// higher-order collection operators await their callables sequentially.
pub async fn call(ctx: &dyn Context, op: &str, args: &[Value]) -> Result<Value, OpError> {
    let args: Vec<Value> = args.iter().map(normalize).collect();
    let args = args.as_slice();

    match op {
        // Arithmetic
        "+" => arith::add(ctx, args),
        "-" => arith::sub(ctx, args),
        "*" => arith::mul(ctx, args),
        "/" => arith::div(ctx, args),
        "%" => arith::modulo(ctx, args),
        "chr" => arith::chr(ctx, args),
        "range" => arith::range(ctx, args),

        // Relational / equality / membership
        "<" => compare::lt(ctx, args),
        ">" => compare::gt(ctx, args),
        "<=" => compare::lte(ctx, args),
        ">=" => compare::gte(ctx, args),
        "==" => compare::eq(ctx, args),
        "!=" => compare::neq(ctx, args),
        "<=>" => compare::seq(ctx, args),
        "cmp" => compare::cmp(ctx, args),
        "><" => compare::contains(ctx, args),
        "like" => compare::like(ctx, args),

        // General
        "as" => general::as_op(ctx, args),
        "beesting" => general::beesting(ctx, args),
        "isnull" => general::isnull(ctx, args),
        "typeof" => general::type_of(ctx, args),
        "klog" => general::klog(ctx, args),
        "defaultsTo" => general::defaults_to(ctx, args),
        "encode" => general::encode(ctx, args),
        "decode" => general::decode(ctx, args),
        "uuid" => general::uuid(ctx, args),
        "randomWord" => general::random_word(ctx, args),

        // Text
        "capitalize" => string::capitalize(ctx, args),
        "lc" => string::lc(ctx, args),
        "uc" => string::uc(ctx, args),
        "split" => string::split(ctx, args),
        "substr" => string::substr(ctx, args),
        "replace" => string::replace(ctx, args),
        "extract" => string::extract(ctx, args),
        "match" => string::match_op(ctx, args),
        "ord" => string::ord(ctx, args),
        "sprintf" => string::sprintf(ctx, args),

        // Collections
        "all" => collection::all(ctx, args).await,
        "notall" => collection::notall(ctx, args).await,
        "any" => collection::any(ctx, args).await,
        "none" => collection::none(ctx, args).await,
        "map" => collection::map_op(ctx, args).await,
        "filter" => collection::filter(ctx, args).await,
        "collect" => collection::collect(ctx, args).await,
        "reduce" => collection::reduce(ctx, args).await,
        "pairwise" => collection::pairwise(ctx, args).await,
        "sort" => collection::sort(ctx, args).await,
        "append" => collection::append(ctx, args),
        "head" => collection::head(ctx, args),
        "tail" => collection::tail(ctx, args),
        "index" => collection::index_of(ctx, args),
        "join" => collection::join(ctx, args),
        "length" => collection::length(ctx, args),
        "reverse" => collection::reverse(ctx, args),
        "slice" => collection::slice(ctx, args),
        "splice" => collection::splice(ctx, args),

        // Sets
        "intersection" => sets::intersection(ctx, args),
        "union" => sets::union(ctx, args),
        "difference" => sets::difference(ctx, args),
        "has" => sets::has(ctx, args),
        "once" => sets::once(ctx, args),
        "duplicates" => sets::duplicates(ctx, args),
        "unique" => sets::unique(ctx, args),

        // Structural paths
        "get" => path::get(ctx, args),
        "set" => path::set(ctx, args),
        "put" => path::put(ctx, args),
        "delete" => path::delete(ctx, args),
        "keys" => path::keys(ctx, args),
        "values" => path::values(ctx, args),

        _ => Err(OpError::General(format!("unknown operator: {}", op))),
    }
}

/* ===================== Operand Helpers ===================== */

/// Fetch a required operand; a missing operand is a plain Error-kind
/// failure, checked before any coercion
pub(crate) fn required<'a>(op: &str, args: &'a [Value], idx: usize) -> Result<&'a Value, OpError> {
    args.get(idx)
        .ok_or_else(|| OpError::General(format!("{} expects at least {} arguments", op, idx + 1)))
}

/// Fetch an optional operand
pub(crate) fn optional<'a>(args: &'a [Value], idx: usize) -> Option<&'a Value> {
    args.get(idx)
}

/// Coerce an operand to a number or raise a Type failure naming it
pub(crate) fn need_number(op: &str, v: &Value) -> Result<f64, OpError> {
    to_number(v).ok_or_else(|| {
        OpError::Type(format!(
            "{} operator cannot use {} ({}) as a number",
            op,
            to_text(v),
            v.kind_of()
        ))
    })
}

/// Thread a two-argument operator across N operands as a left fold
///
/// The accumulator feeds back into the next pairwise application, so
/// `op(a, b, c)` is `op(op(a, b), c)`.
pub(crate) fn fold_chain(
    op: &str,
    args: &[Value],
    f: impl Fn(&Value, &Value) -> Result<Value, OpError>,
) -> Result<Value, OpError> {
    if args.len() < 2 {
        return Err(OpError::General(format!("{} expects at least 2 arguments", op)));
    }
    let mut acc = args[0].clone();
    for next in &args[1..] {
        acc = f(&acc, next)?;
    }
    Ok(acc)
}
