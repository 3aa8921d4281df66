use std::cmp::Ordering;
use std::fmt;

use num_rational::BigRational;

use crate::solver::errors::SolverError;
use crate::solver::model::Model;

/// Comparison used to turn two arithmetic terms into a constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Eq,
    Le,
    Lt,
    Ge,
    Gt,
}

impl Relation {
    pub fn holds<T: Ord>(self, left: &T, right: &T) -> bool {
        let ordering = left.cmp(right);
        match self {
            Relation::Eq => ordering == Ordering::Equal,
            Relation::Le => ordering != Ordering::Greater,
            Relation::Lt => ordering == Ordering::Less,
            Relation::Ge => ordering != Ordering::Less,
            Relation::Gt => ordering == Ordering::Greater,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match self {
            Relation::Eq => "=",
            Relation::Le => "<=",
            Relation::Lt => "<",
            Relation::Ge => ">=",
            Relation::Gt => ">",
        };
        write!(f, "{}", text)
    }
}

/// Outcome of a satisfiability query
#[derive(Debug, Clone, PartialEq)]
pub enum SolveResult {
    Sat(Model),
    Unsat,
}

impl SolveResult {
    pub fn is_sat(&self) -> bool {
        matches!(self, SolveResult::Sat(_))
    }

    pub fn model(&self) -> Option<&Model> {
        match self {
            SolveResult::Sat(model) => Some(model),
            SolveResult::Unsat => None,
        }
    }

    pub fn into_model(self) -> Option<Model> {
        match self {
            SolveResult::Sat(model) => Some(model),
            SolveResult::Unsat => None,
        }
    }
}

/// Narrow interface to a real-arithmetic constraint solver.
///
/// Term builders take `&self` and never touch the assertion state, so a
/// translation [`Context`](crate::Context) can share the solver while terms
/// are built; only `add_constraint`, `solve` and the scope methods need
/// exclusive access.
pub trait Solver {
    /// Real-valued solver expression
    type Term: Clone + fmt::Debug;
    /// Boolean solver expression accepted by `add_constraint`
    type Formula: Clone + fmt::Debug;

    fn name(&self) -> &str;

    fn real_var(&self, name: &str) -> Self::Term;

    fn real_lit(&self, value: &BigRational) -> Self::Term;

    /// # Errors
    ///
    /// Returns `Unsupported` if the theory cannot express the sum.
    fn add(&self, left: Self::Term, right: Self::Term) -> Result<Self::Term, SolverError>;

    /// # Errors
    ///
    /// Returns `Unsupported` if the theory cannot express the difference.
    fn sub(&self, left: Self::Term, right: Self::Term) -> Result<Self::Term, SolverError>;

    /// # Errors
    ///
    /// Returns `Unsupported` if the theory cannot express the product.
    fn mul(&self, left: Self::Term, right: Self::Term) -> Result<Self::Term, SolverError>;

    /// # Errors
    ///
    /// Returns `Unsupported` if the theory cannot express the quotient.
    fn div(&self, left: Self::Term, right: Self::Term) -> Result<Self::Term, SolverError>;

    /// # Errors
    ///
    /// Returns `Unsupported` if the comparison cannot be expressed.
    fn compare(
        &self,
        relation: Relation,
        left: Self::Term,
        right: Self::Term,
    ) -> Result<Self::Formula, SolverError>;

    /// # Errors
    ///
    /// Returns an error if the backend rejects the constraint.
    fn add_constraint(&mut self, constraint: Self::Formula) -> Result<(), SolverError>;

    /// Decide the conjunction of every constraint currently asserted.
    ///
    /// # Errors
    ///
    /// Returns an error when the backend fails to reach a verdict.
    fn solve(&mut self) -> Result<SolveResult, SolverError>;

    /// Open an assertion scope
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot open the scope.
    fn push(&mut self) -> Result<(), SolverError>;

    /// Drop every constraint added since the matching `push`.
    ///
    /// # Errors
    ///
    /// Returns `EmptyScope` if no scope is open.
    fn pop(&mut self) -> Result<(), SolverError>;

    /// Drop every constraint and scope
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be returned to its initial state.
    fn reset(&mut self) -> Result<(), SolverError>;
}
