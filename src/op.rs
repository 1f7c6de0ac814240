//! Opcodes and the kind taxonomy.
//!
//! Every expression record carries an [`Op`], a closed enumeration of all
//! operators a modeling-language front end can produce. An opcode classifies
//! into exactly one [`Kind`], and the kinds form contiguous ranges: the
//! numeric kinds first, then the logical kinds, with the string kind outside
//! both. Family queries ("is this node any binary operator?") are answered by
//! comparing kinds, not opcodes.
//!
//! The `Op -> Kind` mapping is a single total `match`, so a newly added opcode
//! that is not classified fails to compile instead of silently falling into
//! the invalid-expression path of the visitor.

/// Operation code of an expression record.
///
/// Several opcodes share an operator string: `Pow`, `PowConstExp` and
/// `PowConstBase` all print as `^`. The `Number` opcode is shared by numeric
/// and logical constants, as in the storage format this crate wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    // Numeric leaves.
    Number,
    Variable,
    // Unary numeric operators and functions of one argument.
    UnaryMinus,
    Pow2,
    Floor,
    Ceil,
    Abs,
    Tanh,
    Tan,
    Sqrt,
    Sinh,
    Sin,
    Log10,
    Log,
    Exp,
    Cosh,
    Cos,
    Atanh,
    Atan,
    Asinh,
    Asin,
    Acosh,
    Acos,
    // Binary numeric operators and functions of two arguments.
    Plus,
    Minus,
    Mult,
    Div,
    Rem,
    Pow,
    PowConstExp,
    PowConstBase,
    NumericLess,
    IntDiv,
    Atan2,
    Precision,
    Round,
    Trunc,
    // Structured numeric expressions.
    If,
    PiecewiseLinear,
    Call,
    Min,
    Max,
    Sum,
    Count,
    NumberOf,
    // Logical expressions.
    Not,
    Or,
    And,
    Iff,
    Less,
    LessEqual,
    Equal,
    GreaterEqual,
    Greater,
    NotEqual,
    AtLeast,
    AtMost,
    Exactly,
    NotAtLeast,
    NotAtMost,
    NotExactly,
    ForAll,
    Exists,
    Implication,
    AllDiff,
    // String literal, outside the numeric and logical ranges.
    StringLiteral,
}

/// Classification of an expression's shape, derived from its opcode.
///
/// Discriminant order is significant: numeric kinds form one contiguous
/// range and logical kinds another, so range queries are integer comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Kind {
    NumericConstant,
    Variable,
    Unary,
    Binary,
    If,
    PiecewiseLinear,
    Call,
    VarArg,
    Sum,
    Count,
    NumberOf,
    Not,
    BinaryLogical,
    Relational,
    LogicalCount,
    Implication,
    IteratedLogical,
    AllDiff,
    String,
}

impl Kind {
    pub const FIRST_NUMERIC: Kind = Kind::NumericConstant;
    pub const LAST_NUMERIC: Kind = Kind::NumberOf;
    pub const FIRST_LOGICAL: Kind = Kind::Not;
    pub const LAST_LOGICAL: Kind = Kind::AllDiff;

    /// Returns true if this kind lies in the numeric range.
    pub fn is_numeric(self) -> bool {
        Kind::FIRST_NUMERIC <= self && self <= Kind::LAST_NUMERIC
    }

    /// Returns true if this kind lies in the logical range.
    pub fn is_logical(self) -> bool {
        Kind::FIRST_LOGICAL <= self && self <= Kind::LAST_LOGICAL
    }
}

impl Op {
    /// Returns the kind this opcode classifies into.
    pub fn kind(self) -> Kind {
        use Op::*;
        match self {
            Number => Kind::NumericConstant,
            Variable => Kind::Variable,
            UnaryMinus | Pow2 | Floor | Ceil | Abs | Tanh | Tan | Sqrt | Sinh | Sin | Log10
            | Log | Exp | Cosh | Cos | Atanh | Atan | Asinh | Asin | Acosh | Acos => Kind::Unary,
            Plus | Minus | Mult | Div | Rem | Pow | PowConstExp | PowConstBase | NumericLess
            | IntDiv | Atan2 | Precision | Round | Trunc => Kind::Binary,
            If => Kind::If,
            PiecewiseLinear => Kind::PiecewiseLinear,
            Call => Kind::Call,
            Min | Max => Kind::VarArg,
            Sum => Kind::Sum,
            Count => Kind::Count,
            NumberOf => Kind::NumberOf,
            Not => Kind::Not,
            Or | And | Iff => Kind::BinaryLogical,
            Less | LessEqual | Equal | GreaterEqual | Greater | NotEqual => Kind::Relational,
            AtLeast | AtMost | Exactly | NotAtLeast | NotAtMost | NotExactly => Kind::LogicalCount,
            ForAll | Exists => Kind::IteratedLogical,
            Implication => Kind::Implication,
            AllDiff => Kind::AllDiff,
            StringLiteral => Kind::String,
        }
    }

    /// Returns the operator string, suitable for diagnostics and for an
    /// external expression writer. Distinct opcodes may share a string.
    pub fn str(self) -> &'static str {
        use Op::*;
        match self {
            Number => "number",
            Variable => "variable",
            UnaryMinus => "-",
            Pow2 => "^2",
            Floor => "floor",
            Ceil => "ceil",
            Abs => "abs",
            Tanh => "tanh",
            Tan => "tan",
            Sqrt => "sqrt",
            Sinh => "sinh",
            Sin => "sin",
            Log10 => "log10",
            Log => "log",
            Exp => "exp",
            Cosh => "cosh",
            Cos => "cos",
            Atanh => "atanh",
            Atan => "atan",
            Asinh => "asinh",
            Asin => "asin",
            Acosh => "acosh",
            Acos => "acos",
            Plus => "+",
            Minus => "-",
            Mult => "*",
            Div => "/",
            Rem => "mod",
            Pow | PowConstExp | PowConstBase => "^",
            NumericLess => "less",
            IntDiv => "div",
            Atan2 => "atan2",
            Precision => "precision",
            Round => "round",
            Trunc => "trunc",
            If => "if",
            PiecewiseLinear => "pl term",
            Call => "function call",
            Min => "min",
            Max => "max",
            Sum => "sum",
            Count => "count",
            NumberOf => "numberof",
            Not => "!",
            Or => "||",
            And => "&&",
            Iff => "<==>",
            Less => "<",
            LessEqual => "<=",
            Equal => "=",
            GreaterEqual => ">=",
            Greater => ">",
            NotEqual => "!=",
            AtLeast => "atleast",
            AtMost => "atmost",
            Exactly => "exactly",
            NotAtLeast => "!atleast",
            NotAtMost => "!atmost",
            NotExactly => "!exactly",
            ForAll => "forall",
            Exists => "exists",
            Implication => "==>",
            AllDiff => "alldiff",
            StringLiteral => "string",
        }
    }

    /// Returns the operator precedence used by expression writers. Higher
    /// binds tighter; leaf expressions have the highest precedence.
    pub fn precedence(self) -> i32 {
        use Op::*;
        match self {
            If | Implication => 1,
            Iff => 2,
            Or | Exists => 3,
            And | ForAll => 4,
            Not => 5,
            Less | LessEqual | Equal | GreaterEqual | Greater | NotEqual | AtLeast | AtMost
            | Exactly | NotAtLeast | NotAtMost | NotExactly | AllDiff => 6,
            NumericLess => 7,
            Plus | Minus | Sum => 8,
            Mult | Div | Rem | IntDiv => 9,
            UnaryMinus => 10,
            Pow | PowConstExp | PowConstBase | Pow2 => 11,
            Floor | Ceil | Abs | Tanh | Tan | Sqrt | Sinh | Sin | Log10 | Log | Exp | Cosh
            | Cos | Atanh | Atan | Asinh | Asin | Acosh | Acos | Atan2 | Precision | Round
            | Trunc | Min | Max | Count | NumberOf | PiecewiseLinear | Call => 12,
            Number | Variable | StringLiteral => 13,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_OPS: &[Op] = &[
        Op::Number,
        Op::Variable,
        Op::UnaryMinus,
        Op::Pow2,
        Op::Floor,
        Op::Ceil,
        Op::Abs,
        Op::Tanh,
        Op::Tan,
        Op::Sqrt,
        Op::Sinh,
        Op::Sin,
        Op::Log10,
        Op::Log,
        Op::Exp,
        Op::Cosh,
        Op::Cos,
        Op::Atanh,
        Op::Atan,
        Op::Asinh,
        Op::Asin,
        Op::Acosh,
        Op::Acos,
        Op::Plus,
        Op::Minus,
        Op::Mult,
        Op::Div,
        Op::Rem,
        Op::Pow,
        Op::PowConstExp,
        Op::PowConstBase,
        Op::NumericLess,
        Op::IntDiv,
        Op::Atan2,
        Op::Precision,
        Op::Round,
        Op::Trunc,
        Op::If,
        Op::PiecewiseLinear,
        Op::Call,
        Op::Min,
        Op::Max,
        Op::Sum,
        Op::Count,
        Op::NumberOf,
        Op::Not,
        Op::Or,
        Op::And,
        Op::Iff,
        Op::Less,
        Op::LessEqual,
        Op::Equal,
        Op::GreaterEqual,
        Op::Greater,
        Op::NotEqual,
        Op::AtLeast,
        Op::AtMost,
        Op::Exactly,
        Op::NotAtLeast,
        Op::NotAtMost,
        Op::NotExactly,
        Op::ForAll,
        Op::Exists,
        Op::Implication,
        Op::AllDiff,
        Op::StringLiteral,
    ];

    #[test]
    fn every_op_classifies_into_one_range() {
        for &op in ALL_OPS {
            let kind = op.kind();
            let in_numeric = kind.is_numeric();
            let in_logical = kind.is_logical();
            assert!(
                !(in_numeric && in_logical),
                "{op:?} classified into both ranges"
            );
            if kind == Kind::String {
                assert!(!in_numeric && !in_logical);
            } else {
                assert!(in_numeric || in_logical, "{op:?} unclassified");
            }
        }
    }

    #[test]
    fn numeric_and_logical_ranges_are_disjoint() {
        assert!(Kind::LAST_NUMERIC < Kind::FIRST_LOGICAL);
        assert!(Kind::FIRST_NUMERIC.is_numeric());
        assert!(!Kind::FIRST_NUMERIC.is_logical());
        assert!(Kind::LAST_LOGICAL.is_logical());
        assert!(!Kind::String.is_numeric());
        assert!(!Kind::String.is_logical());
    }

    #[test]
    fn operator_strings() {
        assert_eq!(Op::Mult.str(), "*");
        assert_eq!(Op::AtLeast.str(), "atleast");
        assert_eq!(Op::Pow.str(), "^");
        assert_eq!(Op::PowConstExp.str(), "^");
        assert_eq!(Op::LessEqual.str(), "<=");
    }

    #[test]
    fn precedence_orders_arithmetic() {
        assert!(Op::Mult.precedence() > Op::Plus.precedence());
        assert!(Op::Pow.precedence() > Op::Mult.precedence());
        assert!(Op::Number.precedence() > Op::Pow.precedence());
        assert!(Op::Or.precedence() < Op::And.precedence());
    }
}
