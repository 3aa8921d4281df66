//! Symex - symbolic arithmetic expressions with two interpretations
//!
//! An [`Expression`] tree built from symbols, rational constants and binary
//! operations can either be evaluated against a [`Binding`] of symbols to
//! replacement expressions, or translated through a [`Context`] into the term
//! language of any [`Solver`] and checked for satisfiability.

pub mod expression;
pub mod solver;
pub mod utils;

// Re-export the main public API
pub use expression::{
    Binding, Constant, Context, Expression, ExpressionError, Operation, Operator, Symbol,
};
pub use solver::{LinearSolver, Model, Relation, SolveResult, Solver, SolverConfig, SolverError};
#[cfg(feature = "smt")]
pub use solver::SmtSolver;
pub use utils::{UtilsError, parse_rational, validate_symbol_name};

/// Ask the built-in linear solver for an assignment making `lhs ⋈ rhs` true
///
/// This is a convenience function that creates a default solver, asserts the
/// single constraint and solves it.
///
/// # Returns
///
/// * `Ok(SolveResult::Sat(model))` - If some assignment satisfies the constraint
/// * `Ok(SolveResult::Unsat)` - If none does
/// * `Err(SolverError)` - If the constraint leaves linear real arithmetic
///
/// # Errors
///
/// This function will return an error if:
/// * Either side multiplies two non-constant terms
/// * Either side divides by a non-constant term or by zero
///
/// # Examples
///
/// ```
/// use symex::{Expression, Relation, Symbol, find_model};
///
/// let x = Symbol::new("x");
/// let y = Symbol::new("y");
/// let expr = &x - &y * 2;
///
/// match find_model(&expr, Relation::Eq, &Expression::constant(10)) {
///     Ok(result) => match result.model() {
///         Some(model) => println!("Found: {}", model),
///         None => println!("No solution found"),
///     },
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
pub fn find_model(
    lhs: &Expression,
    relation: Relation,
    rhs: &Expression,
) -> Result<SolveResult, SolverError> {
    let mut solver = LinearSolver::new();
    let constraint = Context::new(&solver).constraint(lhs, relation, rhs)?;
    solver.add_constraint(constraint)?;
    solver.solve()
}
