use std::collections::BTreeSet;
use std::fmt;

use num_rational::BigRational;

use crate::solver::adapter::Relation;

/// Real-valued term of the built-in solver.
///
/// Terms keep the exact operator tree they were built from; their linear
/// form travels alongside in a [`LinearTerm`](crate::solver::LinearTerm).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Var(String),
    Lit(BigRational),
    Add(Box<Term>, Box<Term>),
    Sub(Box<Term>, Box<Term>),
    Mul(Box<Term>, Box<Term>),
    Div(Box<Term>, Box<Term>),
}

impl Term {
    fn operands(&self) -> Option<(&Term, &Term)> {
        match self {
            Term::Var(_) | Term::Lit(_) => None,
            Term::Add(l, r) | Term::Sub(l, r) | Term::Mul(l, r) | Term::Div(l, r) => {
                Some((l.as_ref(), r.as_ref()))
            }
        }
    }

    pub fn is_ground(&self) -> bool {
        self.variables().is_empty()
    }

    /// Names of every variable occurring in the term
    pub fn variables(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        let mut stack = vec![self];
        while let Some(term) = stack.pop() {
            match term.operands() {
                Some((l, r)) => {
                    stack.push(r);
                    stack.push(l);
                }
                None => {
                    if let Term::Var(name) = term {
                        names.insert(name.as_str());
                    }
                }
            }
        }
        names
    }

    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((term, level)) = stack.pop() {
            deepest = deepest.max(level);
            if let Some((l, r)) = term.operands() {
                stack.push((r, level + 1));
                stack.push((l, level + 1));
            }
        }
        deepest
    }

    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(term) = stack.pop() {
            count += 1;
            if let Some((l, r)) = term.operands() {
                stack.push(r);
                stack.push(l);
            }
        }
        count
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Term::Var(name) => write!(f, "{}", name),
            Term::Lit(value) => write!(f, "{}", value),
            Term::Add(l, r) => write!(f, "({} + {})", l, r),
            Term::Sub(l, r) => write!(f, "({} - {})", l, r),
            Term::Mul(l, r) => write!(f, "({} * {})", l, r),
            Term::Div(l, r) => write!(f, "({} / {})", l, r),
        }
    }
}

/// Comparison between two terms, the unit of assertion of the built-in solver
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Constraint {
    pub lhs: Term,
    pub relation: Relation,
    pub rhs: Term,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.relation, self.rhs)
    }
}
