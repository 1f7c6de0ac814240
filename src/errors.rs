//! Error types for the nlexpr crate.
//!
//! Visitor dispatch is the only fallible surface of the crate: a visitor that
//! does not handle an expression family reports [`ExprError::UnsupportedExpr`],
//! and an expression whose opcode lies outside the domain of the dispatch
//! entry point reports one of the invalid-expression variants. Everything else
//! in the crate signals programming errors through assertions, not `Result`.

use thiserror::Error;

use crate::op::Op;

/// Errors produced by visitor dispatch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
    /// The visitor has no handler, at any fallback level, for this expression.
    #[error("unsupported expression: {0}")]
    UnsupportedExpr(&'static str),
    /// A numeric dispatch entry point was handed a non-numeric expression.
    #[error("invalid numeric expression: {0:?}")]
    InvalidNumericExpr(Op),
    /// A logical dispatch entry point was handed a non-logical expression.
    #[error("invalid logical expression: {0:?}")]
    InvalidLogicalExpr(Op),
}
