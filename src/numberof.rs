//! Deduplication of `numberof` expressions.
//!
//! A `numberof` expression counts how many of its trailing arguments equal
//! its first argument, the counted value. Back ends linearize it with one
//! auxiliary variable per distinct (argument set, counted value) pair, so two
//! expressions `numberof 2 in (x, y)` and `numberof 5 in (x, y)` share one
//! group of counting constraints over `(x, y)` with two auxiliary variables.
//!
//! [`NumberOfMap`] performs that grouping. Argument sets are compared
//! structurally (the counted value is excluded), groups are kept in creation
//! order, and within a group the counted values are kept in ascending order.
//! The variable-creating collaborator is called at most once per pair.

use std::collections::hash_map::Entry;
use std::hash::{Hash, Hasher};

use log::debug;
use rustc_hash::FxHashMap;

use crate::expr::{cast, equal, Expr, NumberOfExpr, NumericConstant};
use crate::node::NodeData;

/// One group of deduplicated `numberof` expressions: a representative
/// expression and the counted values seen for its argument set, each mapped
/// to the variable created for it.
pub struct NumberOf<'e, V> {
    expr: NumberOfExpr<'e>,
    values: Vec<(f64, V)>,
}

impl<'e, V> NumberOf<'e, V> {
    /// Returns the first expression added with this group's argument set.
    pub fn expr(&self) -> NumberOfExpr<'e> {
        self.expr
    }

    /// Returns the (counted value, variable) pairs in ascending value order.
    pub fn values(&self) -> impl ExactSizeIterator<Item = (f64, &V)> {
        self.values.iter().map(|(value, var)| (*value, var))
    }
}

/// Hashes an expression tree structurally, consistently with
/// [`equal`](crate::expr::equal).
fn hash_expr<H: Hasher>(e: Expr<'_>, state: &mut H) {
    e.op().hash(state);
    match e.data() {
        NodeData::Number(v) => hash_f64(*v, state),
        NodeData::Variable(i) => i.hash(state),
        &NodeData::Unary(a) => hash_expr(Expr::new(a), state),
        &NodeData::Binary(l, r) => {
            hash_expr(Expr::new(l), state);
            hash_expr(Expr::new(r), state);
        }
        &NodeData::If {
            condition,
            true_expr,
            false_expr,
        } => {
            hash_expr(Expr::new(condition), state);
            hash_expr(Expr::new(true_expr), state);
            hash_expr(Expr::new(false_expr), state);
        }
        NodeData::PiecewiseLinear {
            slopes,
            breakpoints,
            var_index,
        } => {
            var_index.hash(state);
            slopes.len().hash(state);
            for &s in slopes {
                hash_f64(s, state);
            }
            for &b in breakpoints {
                hash_f64(b, state);
            }
        }
        NodeData::Call { func, args } => {
            std::ptr::hash(*func, state);
            args.len().hash(state);
            for &a in args {
                hash_expr(Expr::new(a), state);
            }
        }
        NodeData::Args(args) => {
            args.len().hash(state);
            for &a in args {
                hash_expr(Expr::new(a), state);
            }
        }
        NodeData::String(s) => s.hash(state),
    }
}

fn hash_f64<H: Hasher>(value: f64, state: &mut H) {
    // Structural equality treats 0.0 and -0.0 as equal, so they must hash
    // alike.
    let value = if value == 0.0 { 0.0 } else { value };
    value.to_bits().hash(state);
}

/// Hash-map key: the argument set of a `numberof` expression, without the
/// counted value.
struct ArgSet<'e>(NumberOfExpr<'e>);

impl ArgSet<'_> {
    fn args(&self) -> impl Iterator<Item = Expr<'_>> {
        self.0.args().skip(1).map(|a| a.as_expr())
    }
}

impl Hash for ArgSet<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.0.num_args() - 1).hash(state);
        for arg in self.args() {
            hash_expr(arg, state);
        }
    }
}

impl PartialEq for ArgSet<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.0.num_args() == other.0.num_args()
            && self.args().zip(other.args()).all(|(a, b)| equal(a, b))
    }
}

impl Eq for ArgSet<'_> {}

/// Deduplicating map from `numberof` expressions to auxiliary variables.
///
/// `F` creates one variable per distinct (argument set, counted value) pair;
/// it is never called for a pair already seen. Counted values must not be
/// NaN; the ordering stays deterministic if one slips through, but two NaN
/// values never compare equal structurally and would each get a variable.
pub struct NumberOfMap<'e, V, F: FnMut() -> V> {
    create_var: F,
    index: FxHashMap<ArgSet<'e>, usize>,
    groups: Vec<NumberOf<'e, V>>,
}

impl<'e, V, F: FnMut() -> V> NumberOfMap<'e, V, F> {
    /// Creates an empty map using `create_var` to make auxiliary variables.
    pub fn new(create_var: F) -> Self {
        NumberOfMap {
            create_var,
            index: FxHashMap::default(),
            groups: Vec::new(),
        }
    }

    /// Returns the number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns true if no expression has been added.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns an iterator over the groups in creation order.
    pub fn iter(&self) -> std::slice::Iter<'_, NumberOf<'e, V>> {
        self.groups.iter()
    }

    /// Adds a `numberof` expression whose counted value is the constant
    /// `value` and returns the variable for its (argument set, value) pair,
    /// creating it on first sight.
    pub fn add(&mut self, value: f64, e: NumberOfExpr<'e>) -> V
    where
        V: Clone,
    {
        debug_assert!(
            cast::<NumericConstant>(e.arg(0).as_expr()).is_some_and(|c| c.value() == value),
            "counted value is not the constant first argument"
        );
        // Structural equality treats 0.0 and -0.0 as the same value, so they
        // must share one entry, like they share one hash in `hash_f64`.
        let value = if value == 0.0 { 0.0 } else { value };
        let group = match self.index.entry(ArgSet(e)) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let group = self.groups.len();
                debug!(
                    "new numberof group {group} over {} arguments",
                    e.num_args() - 1
                );
                self.groups.push(NumberOf {
                    expr: e,
                    values: Vec::new(),
                });
                *entry.insert(group)
            }
        };
        let values = &mut self.groups[group].values;
        match values.binary_search_by(|(v, _)| v.total_cmp(&value)) {
            Ok(i) => values[i].1.clone(),
            Err(i) => {
                let var = (self.create_var)();
                values.insert(i, (value, var.clone()));
                var
            }
        }
    }
}

impl<'m, 'e, V, F: FnMut() -> V> IntoIterator for &'m NumberOfMap<'e, V, F> {
    type Item = &'m NumberOf<'e, V>;
    type IntoIter = std::slice::Iter<'m, NumberOf<'e, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use crate::op::Op;

    fn number_of<'e>(node: &'e Node<'e>) -> NumberOfExpr<'e> {
        cast(Expr::new(node)).unwrap()
    }

    #[test]
    fn repeated_pair_creates_one_variable() {
        let value = Node::number(2.0);
        let x = Node::variable(0);
        let y = Node::variable(1);
        let e1 = Node::iterated(Op::NumberOf, vec![&value, &x, &y]);
        let e2 = Node::iterated(Op::NumberOf, vec![&value, &x, &y]);

        let mut created = 0;
        let mut map = NumberOfMap::new(|| {
            created += 1;
            created
        });
        let v1 = map.add(2.0, number_of(&e1));
        let v2 = map.add(2.0, number_of(&e2));
        assert_eq!(v1, v2);
        drop(map);
        assert_eq!(created, 1);
    }

    #[test]
    fn distinct_values_share_a_group() {
        let two = Node::number(2.0);
        let five = Node::number(5.0);
        let x = Node::variable(0);
        let y = Node::variable(1);
        let e1 = Node::iterated(Op::NumberOf, vec![&two, &x, &y]);
        let e2 = Node::iterated(Op::NumberOf, vec![&five, &x, &y]);

        let mut next = 0;
        let mut map = NumberOfMap::new(|| {
            next += 1;
            next
        });
        let v1 = map.add(2.0, number_of(&e1));
        let v2 = map.add(5.0, number_of(&e2));
        assert_ne!(v1, v2);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn negative_zero_shares_the_zero_variable() {
        let zero = Node::number(0.0);
        let neg_zero = Node::number(-0.0);
        let x = Node::variable(0);
        let e1 = Node::iterated(Op::NumberOf, vec![&zero, &x]);
        let e2 = Node::iterated(Op::NumberOf, vec![&neg_zero, &x]);

        let mut created = 0;
        let mut map = NumberOfMap::new(|| {
            created += 1;
            created
        });
        let v1 = map.add(0.0, number_of(&e1));
        let v2 = map.add(-0.0, number_of(&e2));
        assert_eq!(v1, v2);
        drop(map);
        assert_eq!(created, 1);
    }

    #[test]
    fn structural_grouping_ignores_record_identity() {
        // Same argument set built twice from distinct records.
        let two = Node::number(2.0);
        let x1 = Node::variable(0);
        let x2 = Node::variable(0);
        let e1 = Node::iterated(Op::NumberOf, vec![&two, &x1]);
        let e2 = Node::iterated(Op::NumberOf, vec![&two, &x2]);

        let mut map = NumberOfMap::new(|| 0u32);
        map.add(2.0, number_of(&e1));
        map.add(2.0, number_of(&e2));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn different_argument_sets_get_different_groups() {
        let two = Node::number(2.0);
        let x = Node::variable(0);
        let y = Node::variable(1);
        let e1 = Node::iterated(Op::NumberOf, vec![&two, &x]);
        let e2 = Node::iterated(Op::NumberOf, vec![&two, &y]);

        let mut map = NumberOfMap::new(|| 0u32);
        map.add(2.0, number_of(&e1));
        map.add(2.0, number_of(&e2));
        assert_eq!(map.len(), 2);
        // Groups come back in creation order, with the representative
        // expression of the first addition.
        let groups: Vec<_> = map.iter().map(|g| g.expr()).collect();
        assert_eq!(groups[0].as_expr(), Expr::new(&e1));
        assert_eq!(groups[1].as_expr(), Expr::new(&e2));
    }

    #[test]
    fn values_iterate_in_ascending_order() {
        let five = Node::number(5.0);
        let two = Node::number(2.0);
        let nine = Node::number(9.0);
        let x = Node::variable(0);
        let e1 = Node::iterated(Op::NumberOf, vec![&five, &x]);
        let e2 = Node::iterated(Op::NumberOf, vec![&two, &x]);
        let e3 = Node::iterated(Op::NumberOf, vec![&nine, &x]);

        let mut next = 0;
        let mut map = NumberOfMap::new(|| {
            next += 1;
            next
        });
        map.add(5.0, number_of(&e1));
        map.add(2.0, number_of(&e2));
        map.add(9.0, number_of(&e3));
        assert_eq!(map.len(), 1);
        let group = map.iter().next().unwrap();
        let values: Vec<_> = group.values().map(|(v, &var)| (v, var)).collect();
        // Creation order was 5, 2, 9; iteration is ascending.
        assert_eq!(values, [(2.0, 2), (5.0, 1), (9.0, 3)]);
    }
}
