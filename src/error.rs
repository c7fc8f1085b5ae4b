//! Operator failure types
//!
//! Every operator entry point returns `Result<Value, OpError>`. There are
//! exactly three failure kinds:
//! - `Type` - operand kind/shape is fundamentally incompatible with the operator
//! - `Range` - operand is the right kind but numerically/positionally invalid
//! - `General` - the caller omitted a required operand (checked before any coercion)
//!
//! Failures propagate synchronously to the immediate caller; the surrounding
//! expression evaluator decides whether to halt or surface a diagnostic.

use thiserror::Error;

/// A failure raised by an operator
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OpError {
    /// "TypeError"-kind: incompatible operand kind or shape
    #[error("TypeError: {0}")]
    Type(String),

    /// "RangeError"-kind: right kind, invalid magnitude or position
    #[error("RangeError: {0}")]
    Range(String),

    /// Plain "Error"-kind: arity violations and unknown operators
    #[error("Error: {0}")]
    General(String),
}
