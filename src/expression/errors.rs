use thiserror::Error;

/// Errors that can occur while building or evaluating expressions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExpressionError {
    #[error("Unbound symbol: {0}")]
    UnboundSymbol(String),
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),
    #[error("Binding for symbol {0} refers back to itself")]
    CyclicBinding(String),
    #[error("Invalid constant: {0}")]
    InvalidConstant(String),
}
