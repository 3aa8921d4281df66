//! Expression module split into submodules for clarity

mod ast;
mod binding;
mod display;
mod errors;
mod eval;
mod ops;
mod translate;

pub use ast::{Constant, Expression, Operation, Operator, Symbol};
pub use binding::Binding;
pub use errors::ExpressionError;
pub use translate::Context;
