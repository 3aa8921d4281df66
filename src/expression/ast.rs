use std::collections::BTreeSet;
use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;

use crate::expression::errors::ExpressionError;
use crate::utils::{UtilsError, parse_rational, validate_symbol_name};

/// Binary arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    pub const ALL: [Operator; 4] = [Operator::Add, Operator::Sub, Operator::Mul, Operator::Div];

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
        }
    }
}

impl TryFrom<char> for Operator {
    type Error = ExpressionError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            '+' => Ok(Operator::Add),
            '-' => Ok(Operator::Sub),
            '*' => Ok(Operator::Mul),
            '/' => Ok(Operator::Div),
            other => Err(ExpressionError::UnsupportedOperator(other.to_string())),
        }
    }
}

impl FromStr for Operator {
    type Err = ExpressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Operator::try_from(c),
            _ => Err(ExpressionError::UnsupportedOperator(s.to_string())),
        }
    }
}

/// Named placeholder for an unbound value.
///
/// Two symbols with the same name are the same variable, both for bindings
/// and for solver translation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol {
    name: String,
}

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// # Errors
    ///
    /// Returns an error if the name is not an identifier.
    pub fn try_new(name: impl Into<String>) -> Result<Self, UtilsError> {
        let name = name.into();
        validate_symbol_name(&name)?;
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.name
    }
}

impl From<&Symbol> for String {
    fn from(symbol: &Symbol) -> Self {
        symbol.name.clone()
    }
}

/// Fixed rational literal
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Constant {
    value: BigRational,
}

impl Constant {
    pub fn new(value: BigRational) -> Self {
        Self { value }
    }

    pub fn integer(value: i64) -> Self {
        Self::new(BigRational::from_integer(BigInt::from(value)))
    }

    /// # Errors
    ///
    /// Returns an error if `denom` is zero.
    pub fn ratio(numer: i64, denom: i64) -> Result<Self, ExpressionError> {
        if denom == 0 {
            return Err(ExpressionError::InvalidConstant(format!(
                "{}/{}",
                numer, denom
            )));
        }
        Ok(Self::new(BigRational::new(
            BigInt::from(numer),
            BigInt::from(denom),
        )))
    }

    /// Exact rational value of a finite float.
    ///
    /// # Errors
    ///
    /// Returns an error for NaN and infinities.
    pub fn from_f64(value: f64) -> Result<Self, ExpressionError> {
        BigRational::from_float(value)
            .map(Self::new)
            .ok_or_else(|| ExpressionError::InvalidConstant(value.to_string()))
    }

    pub fn value(&self) -> &BigRational {
        &self.value
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }
}

impl FromStr for Constant {
    type Err = ExpressionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_rational(s)
            .map(Self::new)
            .map_err(|_| ExpressionError::InvalidConstant(s.to_string()))
    }
}

/// Binary node owning both of its operands
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Operation {
    left: Box<Expression>,
    operator: Operator,
    right: Box<Expression>,
}

impl Operation {
    pub fn new(
        left: impl Into<Expression>,
        operator: Operator,
        right: impl Into<Expression>,
    ) -> Self {
        Self {
            left: Box::new(left.into()),
            operator,
            right: Box::new(right.into()),
        }
    }

    pub fn left(&self) -> &Expression {
        &self.left
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn right(&self) -> &Expression {
        &self.right
    }
}

/// Arithmetic expression over symbols and rational constants.
///
/// `symbols`, `depth`, `size` and `is_ground` walk the tree with an explicit
/// stack. Evaluation, translation, rendering, cloning and dropping recurse
/// once per level, so trees nested deeper than a few thousand levels need a
/// thread with a larger stack.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expression {
    Symbol(Symbol),
    Constant(Constant),
    Operation(Operation),
}

impl Expression {
    pub fn symbol(name: impl Into<String>) -> Self {
        Expression::Symbol(Symbol::new(name))
    }

    pub fn constant(value: i64) -> Self {
        Expression::Constant(Constant::integer(value))
    }

    pub fn binary(
        left: impl Into<Expression>,
        operator: Operator,
        right: impl Into<Expression>,
    ) -> Self {
        Expression::Operation(Operation::new(left, operator, right))
    }

    /// Names of every symbol reachable from this node
    pub fn symbols(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        let mut stack = vec![self];
        while let Some(expr) = stack.pop() {
            match expr {
                Expression::Symbol(s) => {
                    names.insert(s.name());
                }
                Expression::Constant(_) => {}
                Expression::Operation(op) => {
                    stack.push(op.right());
                    stack.push(op.left());
                }
            }
        }
        names
    }

    pub fn is_ground(&self) -> bool {
        self.symbols().is_empty()
    }

    /// Number of nodes on the longest root-to-leaf path
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((expr, level)) = stack.pop() {
            deepest = deepest.max(level);
            if let Expression::Operation(op) = expr {
                stack.push((op.right(), level + 1));
                stack.push((op.left(), level + 1));
            }
        }
        deepest
    }

    /// Total number of nodes
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(expr) = stack.pop() {
            count += 1;
            if let Expression::Operation(op) = expr {
                stack.push(op.right());
                stack.push(op.left());
            }
        }
        count
    }
}
