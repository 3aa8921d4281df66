//! Solver adapter interface, the built-in linear arithmetic backend and,
//! with the `smt` feature, an adapter for external SMT-LIB solvers

mod adapter;
pub mod constants;
mod core;
mod errors;
mod linear;
mod model;
mod simplex;
#[cfg(feature = "smt")]
mod smt;
mod term;

pub use adapter::{Relation, SolveResult, Solver};
pub use self::core::{LinearSolver, SolverConfig};
pub use errors::SolverError;
pub use linear::{LinearExpr, LinearTerm};
pub use model::Model;
#[cfg(feature = "smt")]
pub use smt::SmtSolver;
pub use term::{Constraint, Term};

#[cfg(test)]
mod tests;
