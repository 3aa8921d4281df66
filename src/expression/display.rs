use std::fmt;

use crate::expression::ast::{Constant, Expression, Operation, Operator, Symbol};

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

// Fully parenthesized: the text mirrors the tree shape exactly.
impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({} {} {})", self.left(), self.operator(), self.right())
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expression::Symbol(s) => fmt::Display::fmt(s, f),
            Expression::Constant(c) => fmt::Display::fmt(c, f),
            Expression::Operation(op) => fmt::Display::fmt(op, f),
        }
    }
}

impl Expression {
    pub fn render(&self) -> String {
        self.to_string()
    }
}
