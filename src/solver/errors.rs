use thiserror::Error;

/// Failures of a solver adapter. An unsatisfiable query is not one of them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Not expressible in the solver theory: {0}")]
    Unsupported(String),
    #[error("Gave up after {0} pivots")]
    PivotLimit(usize),
    #[error("No assertion scope to pop")]
    EmptyScope,
    #[error("Solver backend error: {0}")]
    Backend(String),
}
