//! Utils module split into submodules

mod errors;
mod numbers;
mod validation;

pub use errors::UtilsError;
pub use numbers::parse_rational;
pub use validation::validate_symbol_name;
