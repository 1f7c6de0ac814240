//! Linear parts of objectives and constraints.
//!
//! The linear part of an algebraic expression is kept separate from the
//! nonlinear tree: a chain of (coefficient, variable index) records linked in
//! the order the front end emitted them. [`LinearExpr`] is a non-owning view
//! over such a chain; iterating it is forward-only but restartable, since the
//! view itself is a cheap copy of the chain head.

/// One record of a linear-term chain. Records are owned externally, like
/// expression records; the chain is threaded through `next`.
#[derive(Debug)]
pub struct LinearTermRec<'a> {
    pub coef: f64,
    pub var_index: u32,
    pub next: Option<&'a LinearTermRec<'a>>,
}

impl<'a> LinearTermRec<'a> {
    pub fn new(coef: f64, var_index: u32, next: Option<&'a LinearTermRec<'a>>) -> Self {
        LinearTermRec {
            coef,
            var_index,
            next,
        }
    }
}

/// A single linear term, yielded by iteration.
#[derive(Debug, Clone, Copy)]
pub struct LinearTerm<'a> {
    rec: &'a LinearTermRec<'a>,
}

impl LinearTerm<'_> {
    /// Returns the coefficient of this term.
    pub fn coef(self) -> f64 {
        self.rec.coef
    }

    /// Returns the index of the variable this term multiplies.
    pub fn var_index(self) -> u32 {
        self.rec.var_index
    }
}

/// A view over the linear part of an expression.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearExpr<'a> {
    first: Option<&'a LinearTermRec<'a>>,
}

impl<'a> LinearExpr<'a> {
    /// Creates a view starting at the given record, or an empty view for
    /// `None`.
    pub fn new(first: Option<&'a LinearTermRec<'a>>) -> Self {
        LinearExpr { first }
    }

    /// Returns true if the linear part has no terms.
    pub fn is_empty(self) -> bool {
        self.first.is_none()
    }

    /// Returns an iterator over the terms, front to back. Each call starts
    /// over from the first term.
    pub fn terms(self) -> Terms<'a> {
        Terms { cur: self.first }
    }
}

impl<'a> IntoIterator for LinearExpr<'a> {
    type Item = LinearTerm<'a>;
    type IntoIter = Terms<'a>;

    fn into_iter(self) -> Terms<'a> {
        self.terms()
    }
}

/// Iterator over the terms of a [`LinearExpr`].
#[derive(Debug, Clone)]
pub struct Terms<'a> {
    cur: Option<&'a LinearTermRec<'a>>,
}

impl<'a> Iterator for Terms<'a> {
    type Item = LinearTerm<'a>;

    fn next(&mut self) -> Option<LinearTerm<'a>> {
        let rec = self.cur?;
        self.cur = rec.next;
        Some(LinearTerm { rec })
    }
}
