//! Tagged expression records.
//!
//! A [`Node`] is one record of an expression tree: an opcode plus operands
//! laid out according to the opcode's kind. Nodes are owned by whoever built
//! the tree (a front-end builder, or a test); this crate only hands out
//! non-owning [`Expr`](crate::expr::Expr) references into them. Operands are
//! shared references, so a node never outlives its children and sub-trees can
//! be shared between records.
//!
//! Constructors assert that the opcode matches the operand layout. A node
//! with a mismatched layout cannot be built, which is what makes the typed
//! shape accessors in [`expr`](crate::expr) total.

use crate::op::{Kind, Op};

/// Metadata for a callable function referenced by call expressions.
///
/// The metadata table itself is owned externally; call records keep a
/// reference into it, and two [`Function`] handles compare equal only if they
/// point at the same entry.
#[derive(Debug)]
pub struct FuncInfo {
    name: String,
    num_args: usize,
}

impl FuncInfo {
    pub fn new(name: impl Into<String>, num_args: usize) -> Self {
        FuncInfo {
            name: name.into(),
            num_args,
        }
    }
}

/// A lightweight handle to a function's metadata. Identity equality.
#[derive(Debug, Clone, Copy)]
pub struct Function<'e>(&'e FuncInfo);

impl<'e> Function<'e> {
    pub(crate) fn new(fi: &'e FuncInfo) -> Self {
        Function(fi)
    }

    /// Returns the function name.
    pub fn name(&self) -> &'e str {
        &self.0.name
    }

    /// Returns the declared number of arguments.
    pub fn num_args(&self) -> usize {
        self.0.num_args
    }
}

impl PartialEq for Function<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}

impl Eq for Function<'_> {}

/// Operand storage of a node, one variant per record layout.
#[derive(Debug, Clone)]
pub(crate) enum NodeData<'a> {
    Number(f64),
    Variable(u32),
    Unary(&'a Node<'a>),
    Binary(&'a Node<'a>, &'a Node<'a>),
    If {
        condition: &'a Node<'a>,
        true_expr: &'a Node<'a>,
        false_expr: &'a Node<'a>,
    },
    PiecewiseLinear {
        slopes: Vec<f64>,
        breakpoints: Vec<f64>,
        var_index: u32,
    },
    Call {
        func: &'a FuncInfo,
        args: Vec<&'a Node<'a>>,
    },
    Args(Vec<&'a Node<'a>>),
    String(String),
}

/// One expression record: an opcode plus its operands.
#[derive(Debug, Clone)]
pub struct Node<'a> {
    pub(crate) op: Op,
    pub(crate) data: NodeData<'a>,
}

impl<'a> Node<'a> {
    /// Creates a numeric constant record. The same record doubles as a
    /// logical constant (zero is false, anything else is true).
    pub fn number(value: f64) -> Self {
        Node {
            op: Op::Number,
            data: NodeData::Number(value),
        }
    }

    /// Creates a variable reference record.
    pub fn variable(index: u32) -> Self {
        Node {
            op: Op::Variable,
            data: NodeData::Variable(index),
        }
    }

    /// Creates a unary record. `op` must be a unary numeric operator or
    /// logical not.
    pub fn unary(op: Op, arg: &'a Node<'a>) -> Self {
        assert!(
            matches!(op.kind(), Kind::Unary | Kind::Not),
            "not a unary opcode: {op:?}"
        );
        Node {
            op,
            data: NodeData::Unary(arg),
        }
    }

    /// Creates a binary record: a numeric binary operator, a binary logical
    /// operator, a relational comparison, or a logical count comparison.
    pub fn binary(op: Op, lhs: &'a Node<'a>, rhs: &'a Node<'a>) -> Self {
        assert!(
            matches!(
                op.kind(),
                Kind::Binary | Kind::BinaryLogical | Kind::Relational | Kind::LogicalCount
            ),
            "not a binary opcode: {op:?}"
        );
        Node {
            op,
            data: NodeData::Binary(lhs, rhs),
        }
    }

    /// Creates an if-then-else record (`Op::If`) or an implication record
    /// (`Op::Implication`).
    pub fn if_then_else(
        op: Op,
        condition: &'a Node<'a>,
        true_expr: &'a Node<'a>,
        false_expr: &'a Node<'a>,
    ) -> Self {
        assert!(
            matches!(op, Op::If | Op::Implication),
            "not a conditional opcode: {op:?}"
        );
        Node {
            op,
            data: NodeData::If {
                condition,
                true_expr,
                false_expr,
            },
        }
    }

    /// Creates a piecewise-linear term over the variable with the given
    /// index. There must be one more slope than breakpoints.
    pub fn piecewise_linear(slopes: Vec<f64>, breakpoints: Vec<f64>, var_index: u32) -> Self {
        assert!(!slopes.is_empty(), "piecewise-linear term has no slopes");
        assert_eq!(
            slopes.len(),
            breakpoints.len() + 1,
            "piecewise-linear term needs one more slope than breakpoints"
        );
        Node {
            op: Op::PiecewiseLinear,
            data: NodeData::PiecewiseLinear {
                slopes,
                breakpoints,
                var_index,
            },
        }
    }

    /// Creates a function call record.
    pub fn call(func: &'a FuncInfo, args: Vec<&'a Node<'a>>) -> Self {
        Node {
            op: Op::Call,
            data: NodeData::Call { func, args },
        }
    }

    /// Creates an iterated record: min/max, sum, count, numberof, an
    /// iterated logical expression, or alldiff.
    pub fn iterated(op: Op, args: Vec<&'a Node<'a>>) -> Self {
        assert!(
            matches!(
                op.kind(),
                Kind::VarArg
                    | Kind::Sum
                    | Kind::Count
                    | Kind::NumberOf
                    | Kind::IteratedLogical
                    | Kind::AllDiff
            ),
            "not an iterated opcode: {op:?}"
        );
        Node {
            op,
            data: NodeData::Args(args),
        }
    }

    /// Creates a string literal record.
    pub fn string(value: impl Into<String>) -> Self {
        Node {
            op: Op::StringLiteral,
            data: NodeData::String(value.into()),
        }
    }
}
