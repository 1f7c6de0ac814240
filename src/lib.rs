//! Typed views and visitor dispatch over solver expression trees.
//!
//! A modeling-language front end hands solver back ends a tree of tagged
//! expression records. This crate wraps those records in cheap, typed,
//! non-owning views and provides the machinery a back end needs to consume
//! them:
//!
//! - safe downcasting from an untyped reference to a concrete shape
//!   ([`cast`]),
//! - an [`ExprVisitor`] trait whose layered defaults let a back end handle
//!   whole families of operators at once,
//! - rewriting of logical counting expressions into relational form
//!   ([`convert::ExprConverter`]),
//! - structural comparison ([`equal`]), linear-part iteration
//!   ([`linear::LinearExpr`]) and `numberof` deduplication
//!   ([`numberof::NumberOfMap`]).
//!
//! # Example
//!
//! ```rust
//! use nlexpr::expr::{cast, BinaryExpr, Variable};
//! use nlexpr::{Expr, Node, Op};
//!
//! // x * 3.5, with the records owned by the caller.
//! let x = Node::variable(2);
//! let c = Node::number(3.5);
//! let product = Node::binary(Op::Mult, &x, &c);
//!
//! let e = Expr::new(&product);
//! let binary = cast::<BinaryExpr>(e).unwrap();
//! assert_eq!(binary.op_str(), "*");
//! assert_eq!(cast::<Variable>(binary.lhs().as_expr()).unwrap().index(), 2);
//! ```

pub use errors::ExprError;
pub use expr::{cast, equal, is_zero, Expr, Shape};
pub use node::{FuncInfo, Function, Node};
pub use op::{Kind, Op};
pub use visitor::{ExprVisitor, VisitResult};

pub mod prelude {
    pub use crate::convert::ExprConverter;
    pub use crate::expr::{cast, equal, Expr, LogicalExpr, NumericExpr};
    pub use crate::node::Node;
    pub use crate::op::{Kind, Op};
    pub use crate::visitor::{ExprVisitor, VisitResult};
}

/// Rewriting of logical counting expressions into relational form
pub mod convert;
/// Error types reported by visitor dispatch
pub mod errors;
/// Expression references, typed shapes, casting and structural equality
pub mod expr;
/// Linear parts of objectives and constraints
pub mod linear;
/// Tagged expression records and function metadata
pub mod node;
/// Deduplication of numberof expressions
pub mod numberof;
/// Opcodes, kinds and operator metadata
pub mod op;
/// Visitor dispatch over expression trees
pub mod visitor;
