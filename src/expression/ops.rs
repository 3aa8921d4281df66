use std::ops::{Add, Div, Mul, Neg, Sub};

use num_rational::BigRational;

use crate::expression::ast::{Constant, Expression, Operation, Operator, Symbol};

impl From<Symbol> for Expression {
    fn from(symbol: Symbol) -> Self {
        Expression::Symbol(symbol)
    }
}

impl From<&Symbol> for Expression {
    fn from(symbol: &Symbol) -> Self {
        Expression::Symbol(symbol.clone())
    }
}

impl From<Constant> for Expression {
    fn from(constant: Constant) -> Self {
        Expression::Constant(constant)
    }
}

impl From<Operation> for Expression {
    fn from(operation: Operation) -> Self {
        Expression::Operation(operation)
    }
}

impl From<&Expression> for Expression {
    fn from(expr: &Expression) -> Self {
        expr.clone()
    }
}

impl From<BigRational> for Expression {
    fn from(value: BigRational) -> Self {
        Expression::Constant(Constant::new(value))
    }
}

impl From<i64> for Expression {
    fn from(value: i64) -> Self {
        Expression::constant(value)
    }
}

impl From<i32> for Expression {
    fn from(value: i32) -> Self {
        Expression::constant(i64::from(value))
    }
}

macro_rules! impl_binary_op {
    ($op_trait:ident, $method:ident, $operator:expr) => {
        impl<R: Into<Expression>> $op_trait<R> for Expression {
            type Output = Expression;

            fn $method(self, rhs: R) -> Expression {
                Expression::binary(self, $operator, rhs)
            }
        }

        impl<R: Into<Expression>> $op_trait<R> for &Expression {
            type Output = Expression;

            fn $method(self, rhs: R) -> Expression {
                Expression::binary(self, $operator, rhs)
            }
        }

        impl<R: Into<Expression>> $op_trait<R> for Symbol {
            type Output = Expression;

            fn $method(self, rhs: R) -> Expression {
                Expression::binary(self, $operator, rhs)
            }
        }

        impl<R: Into<Expression>> $op_trait<R> for &Symbol {
            type Output = Expression;

            fn $method(self, rhs: R) -> Expression {
                Expression::binary(self, $operator, rhs)
            }
        }

        impl<R: Into<Expression>> $op_trait<R> for Constant {
            type Output = Expression;

            fn $method(self, rhs: R) -> Expression {
                Expression::binary(self, $operator, rhs)
            }
        }
    };
}

impl_binary_op!(Add, add, Operator::Add);
impl_binary_op!(Sub, sub, Operator::Sub);
impl_binary_op!(Mul, mul, Operator::Mul);
impl_binary_op!(Div, div, Operator::Div);

/// Negation is spelled `(0 - e)` so trees stay binary.
impl Neg for Expression {
    type Output = Expression;

    fn neg(self) -> Expression {
        Expression::binary(0, Operator::Sub, self)
    }
}
