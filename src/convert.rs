//! Rewriting logical counting expressions into relational form.
//!
//! A logical counting expression compares a bound against a count:
//! `atleast 2 (c1, c2, c3)` holds when at least two of the conditions hold.
//! Most solver back ends have no native counting constraint but do handle a
//! relational comparison whose right-hand side is a count expression, so the
//! six counting forms are rewritten on the fly:
//!
//! | counting form | relational form  |
//! |---------------|------------------|
//! | `atleast`     | `bound <= count` |
//! | `atmost`      | `bound >= count` |
//! | `exactly`     | `bound == count` |
//! | `!atleast`    | `bound > count`  |
//! | `!atmost`     | `bound < count`  |
//! | `!exactly`    | `bound != count` |
//!
//! [`ExprConverter`] supplies the rewrite as a mixin implemented for every
//! visitor. A back end opts in by routing its counting family handler
//! through [`convert_logical_count`](ExprConverter::convert_logical_count);
//! the six specific counting handlers funnel into that family handler by
//! default, and because the rewrite runs inside the visitor's own dispatch
//! chain, counting forms convert wherever they occur, including nested
//! under `not`, `and`/`or` or an `if` condition reached through the
//! visitor's own recursion.
//!
//! ```rust
//! use nlexpr::expr::{LogicalCountExpr, RelationalExpr};
//! use nlexpr::prelude::*;
//!
//! struct Relations(Vec<Op>);
//!
//! impl ExprVisitor for Relations {
//!     type NumResult = ();
//!     type LogResult = ();
//!
//!     fn visit_relational(&mut self, e: RelationalExpr<'_>) -> VisitResult<()> {
//!         self.0.push(e.op());
//!         Ok(())
//!     }
//!
//!     fn visit_logical_count(&mut self, e: LogicalCountExpr<'_>) -> VisitResult<()> {
//!         self.convert_logical_count(e)
//!     }
//! }
//!
//! // atleast 1 (x0 >= 0)
//! let one = Node::number(1.0);
//! let x = Node::variable(0);
//! let zero = Node::number(0.0);
//! let ge = Node::binary(Op::GreaterEqual, &x, &zero);
//! let count = Node::iterated(Op::Count, vec![&ge]);
//! let atleast = Node::binary(Op::AtLeast, &one, &count);
//!
//! let mut v = Relations(Vec::new());
//! let e = cast::<LogicalExpr>(Expr::new(&atleast)).unwrap();
//! assert_eq!(v.visit_logical(e), Ok(()));
//! assert_eq!(v.0, [Op::LessEqual]);
//! ```
//!
//! The rewritten expression is a fresh record carrying the same operand
//! references as the original; it lives only for the duration of the
//! re-dispatch.

use log::trace;

use crate::expr::{Expr, LogicalCountExpr, RelationalExpr, Shape};
use crate::node::{Node, NodeData};
use crate::op::Op;
use crate::visitor::{ExprVisitor, VisitResult};

fn relational_op(count_op: Op) -> Op {
    match count_op {
        Op::AtLeast => Op::LessEqual,
        Op::AtMost => Op::GreaterEqual,
        Op::Exactly => Op::Equal,
        Op::NotAtLeast => Op::Greater,
        Op::NotAtMost => Op::Less,
        Op::NotExactly => Op::NotEqual,
        op => unreachable!("not a counting opcode: {op:?}"),
    }
}

/// Counting-to-relational rewriting, available on every [`ExprVisitor`].
pub trait ExprConverter: ExprVisitor {
    /// Rewrites a counting expression into its relational form and
    /// dispatches the result to this visitor's relational handlers.
    ///
    /// Meant to be called from an overridden
    /// [`visit_logical_count`](ExprVisitor::visit_logical_count), so that
    /// both entry-point dispatch and direct calls to the specific counting
    /// handlers reach the rewrite.
    fn convert_logical_count(&mut self, e: LogicalCountExpr<'_>) -> VisitResult<Self::LogResult> {
        let rel_op = relational_op(e.op());
        let (bound, count) = match *e.as_expr().data() {
            NodeData::Binary(l, r) => (l, r),
            _ => unreachable!("counting record without two operands"),
        };
        trace!("rewriting {} as {}", e.op_str(), rel_op.str());
        let rel = Node::binary(rel_op, bound, count);
        let rel = RelationalExpr::wrap(Expr::new(&rel));
        match rel_op {
            Op::Less => self.visit_less(rel),
            Op::LessEqual => self.visit_less_equal(rel),
            Op::Equal => self.visit_equal(rel),
            Op::GreaterEqual => self.visit_greater_equal(rel),
            Op::Greater => self.visit_greater(rel),
            Op::NotEqual => self.visit_not_equal(rel),
            _ => unreachable!("counting form mapped to a non-relational opcode"),
        }
    }
}

impl<V: ExprVisitor + ?Sized> ExprConverter for V {}
