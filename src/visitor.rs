//! Visitor dispatch over expression trees.
//!
//! [`ExprVisitor`] turns an opcode into a call on a typed handler method.
//! Implementors override only the methods they care about; every other method
//! has a default body that falls back to a coarser handler:
//!
//! 1. the opcode-specific method (`visit_plus`, `visit_less_equal`, ...),
//! 2. the family method (`visit_binary`, `visit_relational`, ...),
//! 3. `visit_unhandled_numeric` / `visit_unhandled_logical`,
//! 4. which report [`ExprError::UnsupportedExpr`].
//!
//! Dispatch starts at [`visit_numeric`](ExprVisitor::visit_numeric) or
//! [`visit_logical`](ExprVisitor::visit_logical). Both are total matches over
//! the opcode enumeration, so an opcode outside the entry point's range ends
//! up in `visit_invalid_numeric` / `visit_invalid_logical` instead of being
//! silently misrouted.
//!
//! Numeric and logical handlers have separate result types, so a visitor that
//! lowers numeric expressions to one representation and constraints to
//! another does not need a common wrapper type.

use crate::errors::ExprError;
use crate::expr::{
    AllDiffExpr, BinaryExpr, BinaryLogicalExpr, CallExpr, CountExpr, Expr, IfExpr, ImplicationExpr,
    IteratedLogicalExpr, LogicalConstant, LogicalCountExpr, LogicalExpr, NotExpr, NumberOfExpr,
    NumericConstant, NumericExpr, PiecewiseLinearExpr, RelationalExpr, Shape, SumExpr, UnaryExpr,
    VarArgExpr, Variable,
};
use crate::op::Op;

/// Result of one visitor dispatch.
pub type VisitResult<T> = Result<T, ExprError>;

/// A visitor over expression trees.
///
/// Only the handler methods are meant to be overridden; the two `visit_*`
/// entry points and the dispatch they perform are part of this trait's
/// contract.
pub trait ExprVisitor {
    /// Result of visiting a numeric expression.
    type NumResult;
    /// Result of visiting a logical expression.
    type LogResult;

    /// Dispatches a numeric expression to its handler method.
    fn visit_numeric(&mut self, e: NumericExpr<'_>) -> VisitResult<Self::NumResult> {
        let raw = e.as_expr();
        match raw.op() {
            Op::Number => self.visit_numeric_constant(NumericConstant::wrap(raw)),
            Op::Variable => self.visit_variable(Variable::wrap(raw)),
            Op::UnaryMinus => self.visit_unary_minus(UnaryExpr::wrap(raw)),
            Op::Pow2 => self.visit_pow2(UnaryExpr::wrap(raw)),
            Op::Floor => self.visit_floor(UnaryExpr::wrap(raw)),
            Op::Ceil => self.visit_ceil(UnaryExpr::wrap(raw)),
            Op::Abs => self.visit_abs(UnaryExpr::wrap(raw)),
            Op::Tanh => self.visit_tanh(UnaryExpr::wrap(raw)),
            Op::Tan => self.visit_tan(UnaryExpr::wrap(raw)),
            Op::Sqrt => self.visit_sqrt(UnaryExpr::wrap(raw)),
            Op::Sinh => self.visit_sinh(UnaryExpr::wrap(raw)),
            Op::Sin => self.visit_sin(UnaryExpr::wrap(raw)),
            Op::Log10 => self.visit_log10(UnaryExpr::wrap(raw)),
            Op::Log => self.visit_log(UnaryExpr::wrap(raw)),
            Op::Exp => self.visit_exp(UnaryExpr::wrap(raw)),
            Op::Cosh => self.visit_cosh(UnaryExpr::wrap(raw)),
            Op::Cos => self.visit_cos(UnaryExpr::wrap(raw)),
            Op::Atanh => self.visit_atanh(UnaryExpr::wrap(raw)),
            Op::Atan => self.visit_atan(UnaryExpr::wrap(raw)),
            Op::Asinh => self.visit_asinh(UnaryExpr::wrap(raw)),
            Op::Asin => self.visit_asin(UnaryExpr::wrap(raw)),
            Op::Acosh => self.visit_acosh(UnaryExpr::wrap(raw)),
            Op::Acos => self.visit_acos(UnaryExpr::wrap(raw)),
            Op::Plus => self.visit_plus(BinaryExpr::wrap(raw)),
            Op::Minus => self.visit_minus(BinaryExpr::wrap(raw)),
            Op::Mult => self.visit_mult(BinaryExpr::wrap(raw)),
            Op::Div => self.visit_div(BinaryExpr::wrap(raw)),
            Op::Rem => self.visit_rem(BinaryExpr::wrap(raw)),
            Op::Pow => self.visit_pow(BinaryExpr::wrap(raw)),
            Op::PowConstExp => self.visit_pow_const_exp(BinaryExpr::wrap(raw)),
            Op::PowConstBase => self.visit_pow_const_base(BinaryExpr::wrap(raw)),
            Op::NumericLess => self.visit_numeric_less(BinaryExpr::wrap(raw)),
            Op::IntDiv => self.visit_int_div(BinaryExpr::wrap(raw)),
            Op::Atan2 => self.visit_atan2(BinaryExpr::wrap(raw)),
            Op::Precision => self.visit_precision(BinaryExpr::wrap(raw)),
            Op::Round => self.visit_round(BinaryExpr::wrap(raw)),
            Op::Trunc => self.visit_trunc(BinaryExpr::wrap(raw)),
            Op::If => self.visit_if(IfExpr::wrap(raw)),
            Op::PiecewiseLinear => self.visit_piecewise_linear(PiecewiseLinearExpr::wrap(raw)),
            Op::Call => self.visit_call(CallExpr::wrap(raw)),
            Op::Min => self.visit_min(VarArgExpr::wrap(raw)),
            Op::Max => self.visit_max(VarArgExpr::wrap(raw)),
            Op::Sum => self.visit_sum(SumExpr::wrap(raw)),
            Op::Count => self.visit_count(CountExpr::wrap(raw)),
            Op::NumberOf => self.visit_number_of(NumberOfExpr::wrap(raw)),
            _ => self.visit_invalid_numeric(raw),
        }
    }

    /// Dispatches a logical expression to its handler method.
    fn visit_logical(&mut self, e: LogicalExpr<'_>) -> VisitResult<Self::LogResult> {
        let raw = e.as_expr();
        match raw.op() {
            Op::Number => self.visit_logical_constant(LogicalConstant::wrap(raw)),
            Op::Not => self.visit_not(NotExpr::wrap(raw)),
            Op::Or => self.visit_or(BinaryLogicalExpr::wrap(raw)),
            Op::And => self.visit_and(BinaryLogicalExpr::wrap(raw)),
            Op::Iff => self.visit_iff(BinaryLogicalExpr::wrap(raw)),
            Op::Less => self.visit_less(RelationalExpr::wrap(raw)),
            Op::LessEqual => self.visit_less_equal(RelationalExpr::wrap(raw)),
            Op::Equal => self.visit_equal(RelationalExpr::wrap(raw)),
            Op::GreaterEqual => self.visit_greater_equal(RelationalExpr::wrap(raw)),
            Op::Greater => self.visit_greater(RelationalExpr::wrap(raw)),
            Op::NotEqual => self.visit_not_equal(RelationalExpr::wrap(raw)),
            Op::AtLeast => self.visit_at_least(LogicalCountExpr::wrap(raw)),
            Op::AtMost => self.visit_at_most(LogicalCountExpr::wrap(raw)),
            Op::Exactly => self.visit_exactly(LogicalCountExpr::wrap(raw)),
            Op::NotAtLeast => self.visit_not_at_least(LogicalCountExpr::wrap(raw)),
            Op::NotAtMost => self.visit_not_at_most(LogicalCountExpr::wrap(raw)),
            Op::NotExactly => self.visit_not_exactly(LogicalCountExpr::wrap(raw)),
            Op::ForAll => self.visit_forall(IteratedLogicalExpr::wrap(raw)),
            Op::Exists => self.visit_exists(IteratedLogicalExpr::wrap(raw)),
            Op::Implication => self.visit_implication(ImplicationExpr::wrap(raw)),
            Op::AllDiff => self.visit_all_diff(AllDiffExpr::wrap(raw)),
            _ => self.visit_invalid_logical(raw),
        }
    }

    /// Called for a numeric expression no other handler took. The default
    /// reports the expression as unsupported.
    fn visit_unhandled_numeric(&mut self, e: NumericExpr<'_>) -> VisitResult<Self::NumResult> {
        Err(ExprError::UnsupportedExpr(e.op_str()))
    }

    /// Called for a logical expression no other handler took. The default
    /// reports the expression as unsupported.
    fn visit_unhandled_logical(&mut self, e: LogicalExpr<'_>) -> VisitResult<Self::LogResult> {
        Err(ExprError::UnsupportedExpr(e.op_str()))
    }

    /// Called when numeric dispatch meets an opcode outside the numeric
    /// range.
    fn visit_invalid_numeric(&mut self, e: Expr<'_>) -> VisitResult<Self::NumResult> {
        Err(ExprError::InvalidNumericExpr(e.op()))
    }

    /// Called when logical dispatch meets an opcode outside the logical
    /// range.
    fn visit_invalid_logical(&mut self, e: Expr<'_>) -> VisitResult<Self::LogResult> {
        Err(ExprError::InvalidLogicalExpr(e.op()))
    }

    // Numeric leaves.

    fn visit_numeric_constant(&mut self, c: NumericConstant<'_>) -> VisitResult<Self::NumResult> {
        self.visit_unhandled_numeric(NumericExpr::wrap(c.as_expr()))
    }

    fn visit_variable(&mut self, v: Variable<'_>) -> VisitResult<Self::NumResult> {
        self.visit_unhandled_numeric(NumericExpr::wrap(v.as_expr()))
    }

    // Unary numeric expressions. Each specific handler falls back to
    // `visit_unary`.

    fn visit_unary(&mut self, e: UnaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_unhandled_numeric(NumericExpr::wrap(e.as_expr()))
    }

    fn visit_unary_minus(&mut self, e: UnaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_unary(e)
    }

    fn visit_pow2(&mut self, e: UnaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_unary(e)
    }

    fn visit_floor(&mut self, e: UnaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_unary(e)
    }

    fn visit_ceil(&mut self, e: UnaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_unary(e)
    }

    fn visit_abs(&mut self, e: UnaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_unary(e)
    }

    fn visit_tanh(&mut self, e: UnaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_unary(e)
    }

    fn visit_tan(&mut self, e: UnaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_unary(e)
    }

    fn visit_sqrt(&mut self, e: UnaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_unary(e)
    }

    fn visit_sinh(&mut self, e: UnaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_unary(e)
    }

    fn visit_sin(&mut self, e: UnaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_unary(e)
    }

    fn visit_log10(&mut self, e: UnaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_unary(e)
    }

    fn visit_log(&mut self, e: UnaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_unary(e)
    }

    fn visit_exp(&mut self, e: UnaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_unary(e)
    }

    fn visit_cosh(&mut self, e: UnaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_unary(e)
    }

    fn visit_cos(&mut self, e: UnaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_unary(e)
    }

    fn visit_atanh(&mut self, e: UnaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_unary(e)
    }

    fn visit_atan(&mut self, e: UnaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_unary(e)
    }

    fn visit_asinh(&mut self, e: UnaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_unary(e)
    }

    fn visit_asin(&mut self, e: UnaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_unary(e)
    }

    fn visit_acosh(&mut self, e: UnaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_unary(e)
    }

    fn visit_acos(&mut self, e: UnaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_unary(e)
    }

    // Binary numeric expressions. Operators fall back to `visit_binary`;
    // two-argument functions go through `visit_binary_func` first.

    fn visit_binary(&mut self, e: BinaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_unhandled_numeric(NumericExpr::wrap(e.as_expr()))
    }

    fn visit_plus(&mut self, e: BinaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_binary(e)
    }

    fn visit_minus(&mut self, e: BinaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_binary(e)
    }

    fn visit_mult(&mut self, e: BinaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_binary(e)
    }

    fn visit_div(&mut self, e: BinaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_binary(e)
    }

    fn visit_rem(&mut self, e: BinaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_binary(e)
    }

    fn visit_pow(&mut self, e: BinaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_binary(e)
    }

    fn visit_pow_const_exp(&mut self, e: BinaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_binary(e)
    }

    fn visit_pow_const_base(&mut self, e: BinaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_binary(e)
    }

    fn visit_numeric_less(&mut self, e: BinaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_binary(e)
    }

    fn visit_int_div(&mut self, e: BinaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_binary(e)
    }

    fn visit_binary_func(&mut self, e: BinaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_binary(e)
    }

    fn visit_atan2(&mut self, e: BinaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_binary_func(e)
    }

    fn visit_precision(&mut self, e: BinaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_binary_func(e)
    }

    fn visit_round(&mut self, e: BinaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_binary_func(e)
    }

    fn visit_trunc(&mut self, e: BinaryExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_binary_func(e)
    }

    // Structured numeric expressions.

    fn visit_if(&mut self, e: IfExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_unhandled_numeric(NumericExpr::wrap(e.as_expr()))
    }

    fn visit_piecewise_linear(&mut self, e: PiecewiseLinearExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_unhandled_numeric(NumericExpr::wrap(e.as_expr()))
    }

    fn visit_call(&mut self, e: CallExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_unhandled_numeric(NumericExpr::wrap(e.as_expr()))
    }

    fn visit_vararg(&mut self, e: VarArgExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_unhandled_numeric(NumericExpr::wrap(e.as_expr()))
    }

    fn visit_min(&mut self, e: VarArgExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_vararg(e)
    }

    fn visit_max(&mut self, e: VarArgExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_vararg(e)
    }

    fn visit_sum(&mut self, e: SumExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_unhandled_numeric(NumericExpr::wrap(e.as_expr()))
    }

    fn visit_count(&mut self, e: CountExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_unhandled_numeric(NumericExpr::wrap(e.as_expr()))
    }

    fn visit_number_of(&mut self, e: NumberOfExpr<'_>) -> VisitResult<Self::NumResult> {
        self.visit_unhandled_numeric(NumericExpr::wrap(e.as_expr()))
    }

    // Logical expressions.

    fn visit_logical_constant(&mut self, c: LogicalConstant<'_>) -> VisitResult<Self::LogResult> {
        self.visit_unhandled_logical(LogicalExpr::wrap(c.as_expr()))
    }

    fn visit_not(&mut self, e: NotExpr<'_>) -> VisitResult<Self::LogResult> {
        self.visit_unhandled_logical(LogicalExpr::wrap(e.as_expr()))
    }

    fn visit_binary_logical(&mut self, e: BinaryLogicalExpr<'_>) -> VisitResult<Self::LogResult> {
        self.visit_unhandled_logical(LogicalExpr::wrap(e.as_expr()))
    }

    fn visit_or(&mut self, e: BinaryLogicalExpr<'_>) -> VisitResult<Self::LogResult> {
        self.visit_binary_logical(e)
    }

    fn visit_and(&mut self, e: BinaryLogicalExpr<'_>) -> VisitResult<Self::LogResult> {
        self.visit_binary_logical(e)
    }

    fn visit_iff(&mut self, e: BinaryLogicalExpr<'_>) -> VisitResult<Self::LogResult> {
        self.visit_binary_logical(e)
    }

    fn visit_relational(&mut self, e: RelationalExpr<'_>) -> VisitResult<Self::LogResult> {
        self.visit_unhandled_logical(LogicalExpr::wrap(e.as_expr()))
    }

    fn visit_less(&mut self, e: RelationalExpr<'_>) -> VisitResult<Self::LogResult> {
        self.visit_relational(e)
    }

    fn visit_less_equal(&mut self, e: RelationalExpr<'_>) -> VisitResult<Self::LogResult> {
        self.visit_relational(e)
    }

    fn visit_equal(&mut self, e: RelationalExpr<'_>) -> VisitResult<Self::LogResult> {
        self.visit_relational(e)
    }

    fn visit_greater_equal(&mut self, e: RelationalExpr<'_>) -> VisitResult<Self::LogResult> {
        self.visit_relational(e)
    }

    fn visit_greater(&mut self, e: RelationalExpr<'_>) -> VisitResult<Self::LogResult> {
        self.visit_relational(e)
    }

    fn visit_not_equal(&mut self, e: RelationalExpr<'_>) -> VisitResult<Self::LogResult> {
        self.visit_relational(e)
    }

    fn visit_logical_count(&mut self, e: LogicalCountExpr<'_>) -> VisitResult<Self::LogResult> {
        self.visit_unhandled_logical(LogicalExpr::wrap(e.as_expr()))
    }

    fn visit_at_least(&mut self, e: LogicalCountExpr<'_>) -> VisitResult<Self::LogResult> {
        self.visit_logical_count(e)
    }

    fn visit_at_most(&mut self, e: LogicalCountExpr<'_>) -> VisitResult<Self::LogResult> {
        self.visit_logical_count(e)
    }

    fn visit_exactly(&mut self, e: LogicalCountExpr<'_>) -> VisitResult<Self::LogResult> {
        self.visit_logical_count(e)
    }

    fn visit_not_at_least(&mut self, e: LogicalCountExpr<'_>) -> VisitResult<Self::LogResult> {
        self.visit_logical_count(e)
    }

    fn visit_not_at_most(&mut self, e: LogicalCountExpr<'_>) -> VisitResult<Self::LogResult> {
        self.visit_logical_count(e)
    }

    fn visit_not_exactly(&mut self, e: LogicalCountExpr<'_>) -> VisitResult<Self::LogResult> {
        self.visit_logical_count(e)
    }

    fn visit_iterated_logical(
        &mut self,
        e: IteratedLogicalExpr<'_>,
    ) -> VisitResult<Self::LogResult> {
        self.visit_unhandled_logical(LogicalExpr::wrap(e.as_expr()))
    }

    fn visit_forall(&mut self, e: IteratedLogicalExpr<'_>) -> VisitResult<Self::LogResult> {
        self.visit_iterated_logical(e)
    }

    fn visit_exists(&mut self, e: IteratedLogicalExpr<'_>) -> VisitResult<Self::LogResult> {
        self.visit_iterated_logical(e)
    }

    fn visit_implication(&mut self, e: ImplicationExpr<'_>) -> VisitResult<Self::LogResult> {
        self.visit_unhandled_logical(LogicalExpr::wrap(e.as_expr()))
    }

    fn visit_all_diff(&mut self, e: AllDiffExpr<'_>) -> VisitResult<Self::LogResult> {
        self.visit_unhandled_logical(LogicalExpr::wrap(e.as_expr()))
    }
}
