//! Expression references, typed shapes and safe casting.
//!
//! An [`Expr`] is a copyable, non-owning reference to one expression record.
//! It exposes only the opcode and what can be derived from it; typed access
//! to operands goes through the concrete shape types (`BinaryExpr`,
//! `CallExpr`, ...), each of which pairs a reference with compile-time
//! knowledge of its kind. A shape is obtained with [`cast`], which checks the
//! classification and returns `None` on mismatch, never panicking. A missing
//! ("null") reference is an `Option<Expr>` at the API boundary, so casting a
//! missing reference is just `Option::and_then` composition.
//!
//! Equality on `Expr` is identity: two references are equal when they point
//! at the same record. Deep comparison is the separate [`equal`] function.

use itertools::Itertools;

use crate::node::{Function, Node, NodeData};
use crate::op::{Kind, Op};

/// A reference to an expression record.
///
/// Cheap to copy and pass by value; the referenced record is owned by the
/// builder that produced the tree and must outlive every reference into it.
#[derive(Clone, Copy)]
pub struct Expr<'e> {
    node: &'e Node<'e>,
}

impl<'e> Expr<'e> {
    /// Wraps a reference to an expression record.
    pub fn new(node: &'e Node<'e>) -> Self {
        Expr { node }
    }

    /// Returns the operation code of this expression.
    pub fn op(self) -> Op {
        self.node.op
    }

    /// Returns the kind this expression's opcode classifies into.
    pub fn kind(self) -> Kind {
        self.node.op.kind()
    }

    /// Returns the operator or function name as a string. Expressions with
    /// different opcodes can share a string; all three pow forms print `^`.
    pub fn op_str(self) -> &'static str {
        self.node.op.str()
    }

    /// Returns the operator precedence for expression writers.
    pub fn precedence(self) -> i32 {
        self.node.op.precedence()
    }

    pub(crate) fn data(self) -> &'e NodeData<'e> {
        &self.node.data
    }
}

impl PartialEq for Expr<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.node, other.node)
    }
}

impl Eq for Expr<'_> {}

impl std::fmt::Debug for Expr<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Expr").field("op", &self.op()).finish()
    }
}

/// A typed view over an expression reference.
///
/// Each shape declares which references it accepts via [`Shape::matches`];
/// [`cast`] checks the predicate and wraps on success. Adding a new shape
/// means writing one predicate, not touching the existing ones.
pub trait Shape<'e>: Copy {
    /// Returns true if `e` has this shape's kind.
    fn matches(e: Expr<'e>) -> bool;

    /// Wraps a reference already known to match. Checked by a debug
    /// assertion; out-of-crate callers should use [`cast`] instead.
    #[doc(hidden)]
    fn wrap(e: Expr<'e>) -> Self;
}

/// Casts an expression reference to the shape `T`.
///
/// Returns `None` if the reference's kind does not match; no panic, callers
/// distinguish success by the returned option.
pub fn cast<'e, T: Shape<'e>>(e: Expr<'e>) -> Option<T> {
    T::matches(e).then(|| T::wrap(e))
}

impl<'e> Shape<'e> for Expr<'e> {
    fn matches(_e: Expr<'e>) -> bool {
        // Every constructible record has a classified opcode.
        true
    }

    fn wrap(e: Expr<'e>) -> Self {
        e
    }
}

macro_rules! expr_shape {
    ($(#[$meta:meta])* $name:ident, |$e:ident| $pred:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name<'e>(Expr<'e>);

        impl<'e> Shape<'e> for $name<'e> {
            fn matches($e: Expr<'e>) -> bool {
                $pred
            }

            fn wrap(e: Expr<'e>) -> Self {
                debug_assert!(
                    Self::matches(e),
                    concat!(stringify!($name), " constructed from {:?}"),
                    e.op()
                );
                $name(e)
            }
        }

        impl<'e> $name<'e> {
            /// Returns the untyped expression reference.
            pub fn as_expr(self) -> Expr<'e> {
                self.0
            }
        }

        impl<'e> std::ops::Deref for $name<'e> {
            type Target = Expr<'e>;

            fn deref(&self) -> &Expr<'e> {
                &self.0
            }
        }

        impl<'e> From<$name<'e>> for Expr<'e> {
            fn from(e: $name<'e>) -> Expr<'e> {
                e.0
            }
        }
    };
}

expr_shape!(
    /// Any numeric expression: a reference whose kind lies in the numeric
    /// range.
    NumericExpr,
    |e| e.kind().is_numeric()
);

expr_shape!(
    /// Any logical expression: a reference whose kind lies in the logical
    /// range. Constant records are accepted too, since the constant opcode is
    /// shared between numeric and logical constants.
    LogicalExpr,
    |e| e.kind().is_logical() || e.op() == Op::Number
);

expr_shape!(
    /// A numeric constant. Examples: 42, -1.23e-4
    NumericConstant,
    |e| e.op() == Op::Number
);

impl NumericConstant<'_> {
    /// Returns the value of this constant.
    pub fn value(self) -> f64 {
        match *self.0.data() {
            NodeData::Number(v) => v,
            _ => unreachable!("constant record without a number payload"),
        }
    }
}

expr_shape!(
    /// A reference to a variable. Example: x
    Variable,
    |e| e.op() == Op::Variable
);

impl Variable<'_> {
    /// Returns the index of the referenced variable.
    pub fn index(self) -> u32 {
        match *self.0.data() {
            NodeData::Variable(i) => i,
            _ => unreachable!("variable record without an index payload"),
        }
    }
}

fn unary_arg<'e>(e: Expr<'e>) -> Expr<'e> {
    match *e.data() {
        NodeData::Unary(arg) => Expr::new(arg),
        _ => unreachable!("unary record without a single operand"),
    }
}

fn binary_args<'e>(e: Expr<'e>) -> (Expr<'e>, Expr<'e>) {
    match *e.data() {
        NodeData::Binary(l, r) => (Expr::new(l), Expr::new(r)),
        _ => unreachable!("binary record without two operands"),
    }
}

fn iterated_args<'e>(e: Expr<'e>) -> &'e [&'e Node<'e>] {
    match e.data() {
        NodeData::Args(args) => args,
        _ => unreachable!("iterated record without an argument array"),
    }
}

expr_shape!(
    /// A unary numeric expression or a numeric function of one argument.
    /// Examples: -x, sin(x)
    UnaryExpr,
    |e| e.kind() == Kind::Unary
);

impl<'e> UnaryExpr<'e> {
    /// Returns the argument of this expression.
    pub fn arg(self) -> NumericExpr<'e> {
        NumericExpr::wrap(unary_arg(self.0))
    }
}

expr_shape!(
    /// A binary numeric expression or a numeric function of two arguments.
    /// Examples: x / y, atan2(x, y)
    BinaryExpr,
    |e| e.kind() == Kind::Binary
);

impl<'e> BinaryExpr<'e> {
    /// Returns the left-hand side (the first argument) of this expression.
    pub fn lhs(self) -> NumericExpr<'e> {
        NumericExpr::wrap(binary_args(self.0).0)
    }

    /// Returns the right-hand side (the second argument) of this expression.
    pub fn rhs(self) -> NumericExpr<'e> {
        NumericExpr::wrap(binary_args(self.0).1)
    }
}

expr_shape!(
    /// An if-then-else expression.
    /// Example: if x != 0 then y else z
    IfExpr,
    |e| e.op() == Op::If
);

impl<'e> IfExpr<'e> {
    pub fn condition(self) -> LogicalExpr<'e> {
        match *self.0.data() {
            NodeData::If { condition, .. } => LogicalExpr::wrap(Expr::new(condition)),
            _ => unreachable!("conditional record without branches"),
        }
    }

    pub fn true_expr(self) -> NumericExpr<'e> {
        match *self.0.data() {
            NodeData::If { true_expr, .. } => NumericExpr::wrap(Expr::new(true_expr)),
            _ => unreachable!("conditional record without branches"),
        }
    }

    pub fn false_expr(self) -> NumericExpr<'e> {
        match *self.0.data() {
            NodeData::If { false_expr, .. } => NumericExpr::wrap(Expr::new(false_expr)),
            _ => unreachable!("conditional record without branches"),
        }
    }
}

expr_shape!(
    /// A piecewise-linear term.
    /// Example: <<0; -1, 1>> x
    PiecewiseLinearExpr,
    |e| e.op() == Op::PiecewiseLinear
);

impl PiecewiseLinearExpr<'_> {
    /// Returns the number of slopes in this term. Always at least one.
    pub fn num_slopes(self) -> usize {
        match self.0.data() {
            NodeData::PiecewiseLinear { slopes, .. } => slopes.len(),
            _ => unreachable!("piecewise-linear record without slope data"),
        }
    }

    /// Returns the number of breakpoints in this term, one less than the
    /// number of slopes.
    pub fn num_breakpoints(self) -> usize {
        self.num_slopes() - 1
    }

    /// Returns the breakpoint with the given index.
    pub fn breakpoint(self, index: usize) -> f64 {
        match self.0.data() {
            NodeData::PiecewiseLinear { breakpoints, .. } => breakpoints[index],
            _ => unreachable!("piecewise-linear record without slope data"),
        }
    }

    /// Returns the slope with the given index.
    pub fn slope(self, index: usize) -> f64 {
        match self.0.data() {
            NodeData::PiecewiseLinear { slopes, .. } => slopes[index],
            _ => unreachable!("piecewise-linear record without slope data"),
        }
    }

    /// Returns the index of the variable this term is linear over.
    pub fn var_index(self) -> u32 {
        match *self.0.data() {
            NodeData::PiecewiseLinear { var_index, .. } => var_index,
            _ => unreachable!("piecewise-linear record without slope data"),
        }
    }
}

expr_shape!(
    /// A function call expression.
    /// Example: f(x)
    CallExpr,
    |e| e.op() == Op::Call
);

impl<'e> CallExpr<'e> {
    /// Returns the called function.
    pub fn function(self) -> Function<'e> {
        match self.0.data() {
            NodeData::Call { func, .. } => Function::new(func),
            _ => unreachable!("call record without function metadata"),
        }
    }

    /// Returns the number of arguments.
    pub fn num_args(self) -> usize {
        self.raw_args().len()
    }

    /// Returns the argument with the given index. Call arguments are
    /// untyped: numeric expressions and string literals both occur.
    pub fn arg(self, index: usize) -> Expr<'e> {
        Expr::new(self.raw_args()[index])
    }

    /// Returns an iterator over the arguments.
    pub fn args(self) -> impl ExactSizeIterator<Item = Expr<'e>> {
        self.raw_args().iter().map(|n| Expr::new(*n))
    }

    fn raw_args(self) -> &'e [&'e Node<'e>] {
        match self.0.data() {
            NodeData::Call { args, .. } => args,
            _ => unreachable!("call record without function metadata"),
        }
    }
}

macro_rules! iterated_shape {
    ($(#[$meta:meta])* $name:ident, |$e:ident| $pred:expr, $arg:ident) => {
        expr_shape!($(#[$meta])* $name, |$e| $pred);

        impl<'e> $name<'e> {
            /// Returns the number of arguments.
            pub fn num_args(self) -> usize {
                iterated_args(self.0).len()
            }

            /// Returns the argument with the given index.
            pub fn arg(self, index: usize) -> $arg<'e> {
                $arg::wrap(Expr::new(iterated_args(self.0)[index]))
            }

            /// Returns an iterator over the arguments.
            pub fn args(self) -> impl ExactSizeIterator<Item = $arg<'e>> {
                iterated_args(self.0)
                    .iter()
                    .map(|n| $arg::wrap(Expr::new(*n)))
            }
        }
    };
}

iterated_shape!(
    /// A numeric expression with a variable number of arguments: min or max.
    /// Example: min{i in I} x[i]
    VarArgExpr,
    |e| e.kind() == Kind::VarArg,
    NumericExpr
);

iterated_shape!(
    /// A sum expression.
    /// Example: sum{i in I} x[i]
    SumExpr,
    |e| e.op() == Op::Sum,
    NumericExpr
);

iterated_shape!(
    /// A count expression, counting how many of its logical arguments hold.
    /// Example: count{i in I} (x[i] >= 0)
    CountExpr,
    |e| e.op() == Op::Count,
    LogicalExpr
);

iterated_shape!(
    /// A numberof expression: how many of the trailing arguments equal the
    /// first one.
    /// Example: numberof 42 in ({i in I} x[i])
    NumberOfExpr,
    |e| e.op() == Op::NumberOf,
    NumericExpr
);

iterated_shape!(
    /// An iterated logical expression: forall or exists.
    /// Example: exists{i in I} x[i] >= 0
    IteratedLogicalExpr,
    |e| e.kind() == Kind::IteratedLogical,
    LogicalExpr
);

iterated_shape!(
    /// An alldiff expression over numeric arguments.
    /// Example: alldiff{i in I} x[i]
    AllDiffExpr,
    |e| e.op() == Op::AllDiff,
    NumericExpr
);

expr_shape!(
    /// A logical constant. The record is shared with numeric constants; zero
    /// is false and any other value is true.
    LogicalConstant,
    |e| e.op() == Op::Number
);

impl LogicalConstant<'_> {
    /// Returns the value of this constant.
    pub fn value(self) -> bool {
        match *self.0.data() {
            NodeData::Number(v) => v != 0.0,
            _ => unreachable!("constant record without a number payload"),
        }
    }
}

expr_shape!(
    /// A logical NOT expression.
    /// Example: not a
    NotExpr,
    |e| e.op() == Op::Not
);

impl<'e> NotExpr<'e> {
    /// Returns the argument of this expression.
    pub fn arg(self) -> LogicalExpr<'e> {
        LogicalExpr::wrap(unary_arg(self.0))
    }
}

expr_shape!(
    /// A binary logical expression.
    /// Examples: a || b, a && b
    BinaryLogicalExpr,
    |e| e.kind() == Kind::BinaryLogical
);

impl<'e> BinaryLogicalExpr<'e> {
    /// Returns the left-hand side (the first argument) of this expression.
    pub fn lhs(self) -> LogicalExpr<'e> {
        LogicalExpr::wrap(binary_args(self.0).0)
    }

    /// Returns the right-hand side (the second argument) of this expression.
    pub fn rhs(self) -> LogicalExpr<'e> {
        LogicalExpr::wrap(binary_args(self.0).1)
    }
}

expr_shape!(
    /// A relational expression comparing two numeric operands.
    /// Examples: x < y, x != y
    RelationalExpr,
    |e| e.kind() == Kind::Relational
);

impl<'e> RelationalExpr<'e> {
    /// Returns the left-hand side (the first argument) of this expression.
    pub fn lhs(self) -> NumericExpr<'e> {
        NumericExpr::wrap(binary_args(self.0).0)
    }

    /// Returns the right-hand side (the second argument) of this expression.
    pub fn rhs(self) -> NumericExpr<'e> {
        NumericExpr::wrap(binary_args(self.0).1)
    }
}

expr_shape!(
    /// A logical count expression comparing a count against a bound.
    /// Example: atleast 1 (x < y, x != y)
    LogicalCountExpr,
    |e| e.kind() == Kind::LogicalCount
);

impl<'e> LogicalCountExpr<'e> {
    /// Returns the bound (the first argument) of this expression.
    pub fn lhs(self) -> NumericExpr<'e> {
        NumericExpr::wrap(binary_args(self.0).0)
    }

    /// Returns the count sub-expression (the second argument).
    pub fn rhs(self) -> CountExpr<'e> {
        CountExpr::wrap(binary_args(self.0).1)
    }
}

expr_shape!(
    /// An implication expression.
    /// Example: a ==> b else c
    ImplicationExpr,
    |e| e.op() == Op::Implication
);

impl<'e> ImplicationExpr<'e> {
    pub fn condition(self) -> LogicalExpr<'e> {
        match *self.0.data() {
            NodeData::If { condition, .. } => LogicalExpr::wrap(Expr::new(condition)),
            _ => unreachable!("conditional record without branches"),
        }
    }

    pub fn true_expr(self) -> LogicalExpr<'e> {
        match *self.0.data() {
            NodeData::If { true_expr, .. } => LogicalExpr::wrap(Expr::new(true_expr)),
            _ => unreachable!("conditional record without branches"),
        }
    }

    pub fn false_expr(self) -> LogicalExpr<'e> {
        match *self.0.data() {
            NodeData::If { false_expr, .. } => LogicalExpr::wrap(Expr::new(false_expr)),
            _ => unreachable!("conditional record without branches"),
        }
    }
}

expr_shape!(
    /// A string literal, usable as a function call argument.
    StringLiteral,
    |e| e.op() == Op::StringLiteral
);

impl<'e> StringLiteral<'e> {
    /// Returns the value of this literal.
    pub fn value(self) -> &'e str {
        match self.0.data() {
            NodeData::String(s) => s,
            _ => unreachable!("string record without a string payload"),
        }
    }
}

/// Returns true iff `e` is a constant equal to zero.
pub fn is_zero(e: NumericExpr<'_>) -> bool {
    cast::<NumericConstant>(e.as_expr()).is_some_and(|c| c.value() == 0.0)
}

/// Recursively compares two expression trees.
///
/// Trees are equal when they match in opcode and, recursively, in every
/// operand, constant value, function identity, breakpoint/slope sequence and
/// variable index. Reference identity is sufficient but not necessary; two
/// distinct records with identical content compare equal. Floating-point
/// comparison is exact.
pub fn equal(e1: Expr<'_>, e2: Expr<'_>) -> bool {
    if std::ptr::eq(e1.node, e2.node) {
        return true;
    }
    if e1.op() != e2.op() {
        return false;
    }
    match (e1.data(), e2.data()) {
        (NodeData::Number(a), NodeData::Number(b)) => a == b,
        (NodeData::Variable(a), NodeData::Variable(b)) => a == b,
        (&NodeData::Unary(a), &NodeData::Unary(b)) => equal(Expr::new(a), Expr::new(b)),
        (&NodeData::Binary(l1, r1), &NodeData::Binary(l2, r2)) => {
            equal(Expr::new(l1), Expr::new(l2)) && equal(Expr::new(r1), Expr::new(r2))
        }
        (
            &NodeData::If {
                condition: c1,
                true_expr: t1,
                false_expr: f1,
            },
            &NodeData::If {
                condition: c2,
                true_expr: t2,
                false_expr: f2,
            },
        ) => {
            equal(Expr::new(c1), Expr::new(c2))
                && equal(Expr::new(t1), Expr::new(t2))
                && equal(Expr::new(f1), Expr::new(f2))
        }
        (
            NodeData::PiecewiseLinear {
                slopes: s1,
                breakpoints: b1,
                var_index: v1,
            },
            NodeData::PiecewiseLinear {
                slopes: s2,
                breakpoints: b2,
                var_index: v2,
            },
        ) => v1 == v2 && s1 == s2 && b1 == b2,
        (NodeData::Call { func: f1, args: a1 }, NodeData::Call { func: f2, args: a2 }) => {
            std::ptr::eq(*f1, *f2) && equal_args(a1, a2)
        }
        (NodeData::Args(a1), NodeData::Args(a2)) => equal_args(a1, a2),
        (NodeData::String(a), NodeData::String(b)) => a == b,
        // Equal opcodes imply equal layouts for records built through the
        // tagged constructors.
        _ => false,
    }
}

fn equal_args(a1: &[&Node<'_>], a2: &[&Node<'_>]) -> bool {
    a1.len() == a2.len()
        && a1
            .iter()
            .zip_eq(a2)
            .all(|(&x, &y)| equal(Expr::new(x), Expr::new(y)))
}
