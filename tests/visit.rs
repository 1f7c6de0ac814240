//! End-to-end scenarios: a back end walking whole trees through the visitor,
//! the counting-expression rewriter, and numberof deduplication.

use nlexpr::expr::{
    BinaryExpr, BinaryLogicalExpr, CountExpr, IfExpr, LogicalCountExpr, NumberOfExpr,
    NumericConstant, RelationalExpr, UnaryExpr, Variable,
};
use nlexpr::numberof::NumberOfMap;
use nlexpr::prelude::*;

/// Renders expressions as fully parenthesized infix text, handling operator
/// families rather than individual opcodes.
struct Stringify;

impl ExprVisitor for Stringify {
    type NumResult = String;
    type LogResult = String;

    fn visit_numeric_constant(&mut self, c: NumericConstant<'_>) -> VisitResult<String> {
        Ok(c.value().to_string())
    }

    fn visit_variable(&mut self, v: Variable<'_>) -> VisitResult<String> {
        Ok(format!("x{}", v.index()))
    }

    fn visit_unary(&mut self, e: UnaryExpr<'_>) -> VisitResult<String> {
        Ok(format!("{}({})", e.op_str(), self.visit_numeric(e.arg())?))
    }

    fn visit_binary(&mut self, e: BinaryExpr<'_>) -> VisitResult<String> {
        Ok(format!(
            "({} {} {})",
            self.visit_numeric(e.lhs())?,
            e.op_str(),
            self.visit_numeric(e.rhs())?
        ))
    }

    fn visit_if(&mut self, e: IfExpr<'_>) -> VisitResult<String> {
        Ok(format!(
            "(if {} then {} else {})",
            self.visit_logical(e.condition())?,
            self.visit_numeric(e.true_expr())?,
            self.visit_numeric(e.false_expr())?
        ))
    }

    fn visit_count(&mut self, e: CountExpr<'_>) -> VisitResult<String> {
        let args: Result<Vec<_>, _> = e.args().map(|a| self.visit_logical(a)).collect();
        Ok(format!("count({})", args?.join(", ")))
    }

    fn visit_relational(&mut self, e: RelationalExpr<'_>) -> VisitResult<String> {
        Ok(format!(
            "({} {} {})",
            self.visit_numeric(e.lhs())?,
            e.op_str(),
            self.visit_numeric(e.rhs())?
        ))
    }

    fn visit_binary_logical(&mut self, e: BinaryLogicalExpr<'_>) -> VisitResult<String> {
        Ok(format!(
            "({} {} {})",
            self.visit_logical(e.lhs())?,
            e.op_str(),
            self.visit_logical(e.rhs())?
        ))
    }

    fn visit_logical_count(&mut self, e: LogicalCountExpr<'_>) -> VisitResult<String> {
        self.convert_logical_count(e)
    }
}

fn numeric<'e>(node: &'e Node<'e>) -> NumericExpr<'e> {
    cast(Expr::new(node)).unwrap()
}

fn logical<'e>(node: &'e Node<'e>) -> LogicalExpr<'e> {
    cast(Expr::new(node)).unwrap()
}

#[test]
fn family_handlers_cover_whole_trees() {
    // sin(x0) * (x1 + 2)
    let x0 = Node::variable(0);
    let x1 = Node::variable(1);
    let two = Node::number(2.0);
    let sin = Node::unary(Op::Sin, &x0);
    let sum = Node::binary(Op::Plus, &x1, &two);
    let prod = Node::binary(Op::Mult, &sin, &sum);

    let mut v = Stringify;
    assert_eq!(v.visit_numeric(numeric(&prod)).unwrap(), "(sin(x0) * (x1 + 2))");
}

#[test]
fn conditional_crosses_between_numeric_and_logical_dispatch() {
    // if x0 <= 5 || x1 < 0 then x0 else -(x1)
    let x0 = Node::variable(0);
    let x1 = Node::variable(1);
    let five = Node::number(5.0);
    let zero = Node::number(0.0);
    let le = Node::binary(Op::LessEqual, &x0, &five);
    let lt = Node::binary(Op::Less, &x1, &zero);
    let or = Node::binary(Op::Or, &le, &lt);
    let neg = Node::unary(Op::UnaryMinus, &x1);
    let ite = Node::if_then_else(Op::If, &or, &x0, &neg);

    let mut v = Stringify;
    assert_eq!(
        v.visit_numeric(numeric(&ite)).unwrap(),
        "(if ((x0 <= 5) || (x1 < 0)) then x0 else -(x1))"
    );
}

#[test]
fn converter_feeds_rewritten_form_to_the_visitor() {
    // atleast 1 (x0 <= 2, x1 < 0) reads like 1 <= count(...) downstream.
    let one = Node::number(1.0);
    let x0 = Node::variable(0);
    let x1 = Node::variable(1);
    let two = Node::number(2.0);
    let zero = Node::number(0.0);
    let le = Node::binary(Op::LessEqual, &x0, &two);
    let lt = Node::binary(Op::Less, &x1, &zero);
    let count = Node::iterated(Op::Count, vec![&le, &lt]);
    let atleast = Node::binary(Op::AtLeast, &one, &count);

    let mut v = Stringify;
    assert_eq!(
        v.visit_logical(logical(&atleast)).unwrap(),
        "(1 <= count((x0 <= 2), (x1 < 0)))"
    );
}

#[test]
fn counting_form_in_a_conditional_converts_during_recursion() {
    // if atleast 1 (x0 <= 2) then x0 else 0: the counting form is only
    // reachable through the visitor's own walk of the condition.
    let one = Node::number(1.0);
    let x0 = Node::variable(0);
    let two = Node::number(2.0);
    let zero = Node::number(0.0);
    let le = Node::binary(Op::LessEqual, &x0, &two);
    let count = Node::iterated(Op::Count, vec![&le]);
    let atleast = Node::binary(Op::AtLeast, &one, &count);
    let ite = Node::if_then_else(Op::If, &atleast, &x0, &zero);

    let mut v = Stringify;
    assert_eq!(
        v.visit_numeric(numeric(&ite)).unwrap(),
        "(if (1 <= count((x0 <= 2))) then x0 else 0)"
    );
}

/// Checks the expression the wrapped visitor receives against an expected
/// tree, structurally.
struct ExpectRelational<'e> {
    expected: Expr<'e>,
}

impl ExprVisitor for ExpectRelational<'_> {
    type NumResult = ();
    type LogResult = bool;

    fn visit_relational(&mut self, e: RelationalExpr<'_>) -> VisitResult<bool> {
        Ok(equal(e.as_expr(), self.expected))
    }

    fn visit_logical_count(&mut self, e: LogicalCountExpr<'_>) -> VisitResult<bool> {
        self.convert_logical_count(e)
    }
}

#[test]
fn rewritten_expression_matches_a_hand_built_relational() {
    let two = Node::number(2.0);
    let x = Node::variable(0);
    let zero = Node::number(0.0);
    let cond = Node::binary(Op::GreaterEqual, &x, &zero);
    let count = Node::iterated(Op::Count, vec![&cond]);
    let atmost = Node::binary(Op::AtMost, &two, &count);

    // atmost 2 (...) rewrites to 2 >= count(...).
    let expected = Node::binary(Op::GreaterEqual, &two, &count);
    let mut v = ExpectRelational {
        expected: Expr::new(&expected),
    };
    assert_eq!(v.visit_logical(logical(&atmost)), Ok(true));
}

#[test]
fn numberof_pipeline_shares_variables_per_value() {
    // Two occurrences of numberof 2 in (x0, x1) and one of numberof 5 in
    // (x0, x1): one group, two auxiliary variables.
    let two = Node::number(2.0);
    let five = Node::number(5.0);
    let x0 = Node::variable(0);
    let x1 = Node::variable(1);
    let n1 = Node::iterated(Op::NumberOf, vec![&two, &x0, &x1]);
    let n2 = Node::iterated(Op::NumberOf, vec![&two, &x0, &x1]);
    let n3 = Node::iterated(Op::NumberOf, vec![&five, &x0, &x1]);

    let mut next_var = 100;
    let mut map = NumberOfMap::new(|| {
        next_var += 1;
        next_var
    });
    let number_of = |node| cast::<NumberOfExpr>(Expr::new(node)).unwrap();
    let v1 = map.add(2.0, number_of(&n1));
    let v2 = map.add(2.0, number_of(&n2));
    let v3 = map.add(5.0, number_of(&n3));
    assert_eq!(v1, 101);
    assert_eq!(v2, 101);
    assert_eq!(v3, 102);
    assert_eq!(map.len(), 1);

    let group = map.iter().next().unwrap();
    assert_eq!(group.expr().as_expr(), Expr::new(&n1));
    let values: Vec<_> = group.values().map(|(value, &var)| (value, var)).collect();
    assert_eq!(values, [(2.0, 101), (5.0, 102)]);
}
