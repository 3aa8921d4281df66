use thiserror::Error;

/// Errors that can occur in utility functions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UtilsError {
    #[error("Symbol name cannot be empty")]
    EmptySymbolName,
    #[error("Symbol name must be an identifier: {0}")]
    InvalidSymbolName(String),
    #[error("Not a rational number: {0}")]
    InvalidNumber(String),
}
