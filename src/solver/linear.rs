use std::collections::BTreeMap;
use std::fmt;

use num_rational::BigRational;
use num_traits::{One, Zero};

use crate::solver::errors::SolverError;
use crate::solver::term::Term;

/// `Σ aᵢ·xᵢ + c` with exact rational coefficients; zero coefficients are never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearExpr {
    coefficients: BTreeMap<String, BigRational>,
    constant: BigRational,
}

impl LinearExpr {
    pub fn constant(value: BigRational) -> Self {
        Self {
            coefficients: BTreeMap::new(),
            constant: value,
        }
    }

    pub fn variable(name: &str) -> Self {
        let mut coefficients = BTreeMap::new();
        coefficients.insert(name.to_string(), BigRational::one());
        Self {
            coefficients,
            constant: BigRational::zero(),
        }
    }

    /// # Errors
    ///
    /// Returns `Unsupported` for products of two non-constant factors and for
    /// divisions by a non-constant or zero divisor.
    pub fn from_term(term: &Term) -> Result<Self, SolverError> {
        match term {
            Term::Var(name) => Ok(Self::variable(name)),
            Term::Lit(value) => Ok(Self::constant(value.clone())),
            Term::Add(l, r) | Term::Sub(l, r) | Term::Mul(l, r) | Term::Div(l, r) => {
                let left = Self::from_term(l)?;
                let right = Self::from_term(r)?;
                left.combine(term, right)
            }
        }
    }

    /// Linear form of `node` given the forms of its two operands.
    ///
    /// # Errors
    ///
    /// Same as [`LinearExpr::from_term`], for the top node only.
    pub fn combine(self, node: &Term, right: LinearExpr) -> Result<Self, SolverError> {
        match node {
            Term::Var(_) | Term::Lit(_) => Err(SolverError::Backend(format!(
                "{} has no operands",
                node
            ))),
            Term::Add(..) => Ok(self.plus(&right)),
            Term::Sub(..) => Ok(self.minus(&right)),
            Term::Mul(..) => {
                if self.is_constant() {
                    Ok(right.scaled(&self.constant))
                } else if right.is_constant() {
                    Ok(self.scaled(&right.constant))
                } else {
                    Err(SolverError::Unsupported(format!(
                        "nonlinear product {}",
                        node
                    )))
                }
            }
            Term::Div(_, divisor) => {
                if !right.is_constant() {
                    Err(SolverError::Unsupported(format!(
                        "division by non-constant term {}",
                        divisor
                    )))
                } else if right.constant.is_zero() {
                    Err(SolverError::Unsupported(format!(
                        "division by constant zero in {}",
                        node
                    )))
                } else {
                    Ok(self.scaled(&right.constant.recip()))
                }
            }
        }
    }

    pub fn is_constant(&self) -> bool {
        self.coefficients.is_empty()
    }

    pub fn constant_part(&self) -> &BigRational {
        &self.constant
    }

    pub fn coefficients(&self) -> &BTreeMap<String, BigRational> {
        &self.coefficients
    }

    pub fn plus(mut self, other: &LinearExpr) -> LinearExpr {
        for (name, coefficient) in &other.coefficients {
            let entry = self
                .coefficients
                .entry(name.clone())
                .or_insert_with(BigRational::zero);
            *entry += coefficient;
            if entry.is_zero() {
                self.coefficients.remove(name);
            }
        }
        self.constant += &other.constant;
        self
    }

    pub fn minus(self, other: &LinearExpr) -> LinearExpr {
        self.plus(&other.clone().scaled(&-BigRational::one()))
    }

    pub fn scaled(self, factor: &BigRational) -> LinearExpr {
        if factor.is_zero() {
            return Self::constant(BigRational::zero());
        }
        Self {
            coefficients: self
                .coefficients
                .into_iter()
                .map(|(name, coefficient)| (name, coefficient * factor))
                .collect(),
            constant: self.constant * factor,
        }
    }
}

/// Term of the built-in solver paired with its linear form.
///
/// The form is extended node by node as the term is built, so translating a
/// tree linearizes each node once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearTerm {
    term: Term,
    linear: LinearExpr,
}

impl LinearTerm {
    pub(crate) fn variable(name: &str) -> Self {
        Self {
            term: Term::Var(name.to_string()),
            linear: LinearExpr::variable(name),
        }
    }

    pub(crate) fn literal(value: &BigRational) -> Self {
        Self {
            term: Term::Lit(value.clone()),
            linear: LinearExpr::constant(value.clone()),
        }
    }

    /// # Errors
    ///
    /// Returns `Unsupported` if the new node leaves linear arithmetic.
    pub(crate) fn node(
        build: fn(Box<Term>, Box<Term>) -> Term,
        left: LinearTerm,
        right: LinearTerm,
    ) -> Result<Self, SolverError> {
        let term = build(Box::new(left.term), Box::new(right.term));
        let linear = left.linear.combine(&term, right.linear)?;
        Ok(Self { term, linear })
    }

    pub fn term(&self) -> &Term {
        &self.term
    }

    pub fn linear(&self) -> &LinearExpr {
        &self.linear
    }

    pub fn into_term(self) -> Term {
        self.term
    }

    pub fn depth(&self) -> usize {
        self.term.depth()
    }

    pub fn size(&self) -> usize {
        self.term.size()
    }
}

impl fmt::Display for LinearTerm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.term, f)
    }
}

#[cfg(test)]
mod tests_inner_helpers {
    use num_bigint::BigInt;
    use num_rational::BigRational;

    use super::{LinearExpr, LinearTerm};
    use crate::solver::errors::SolverError;
    use crate::solver::term::Term;

    fn lit(value: i64) -> Box<Term> {
        Box::new(Term::Lit(BigRational::from_integer(BigInt::from(value))))
    }

    fn var(name: &str) -> Box<Term> {
        Box::new(Term::Var(name.to_string()))
    }

    #[test]
    fn test_linearize_cancels_terms() {
        let term = Term::Sub(var("x"), var("x"));
        let linear = LinearExpr::from_term(&term);
        assert_eq!(linear, Ok(LinearExpr::constant(BigRational::from_integer(BigInt::from(0)))));
    }

    #[test]
    fn test_linearize_scaled_difference() {
        // x - y * 2
        let term = Term::Sub(var("x"), Box::new(Term::Mul(var("y"), lit(2))));
        let linear = LinearExpr::from_term(&term);
        assert!(linear.is_ok());
        if let Ok(linear) = linear {
            assert_eq!(linear.coefficients().len(), 2);
            assert_eq!(
                linear.coefficients().get("y"),
                Some(&BigRational::from_integer(BigInt::from(-2)))
            );
        }
    }

    #[test]
    fn test_linearize_division_by_constant() {
        let term = Term::Div(var("x"), lit(4));
        let linear = LinearExpr::from_term(&term);
        assert!(linear.is_ok());
        if let Ok(linear) = linear {
            assert_eq!(
                linear.coefficients().get("x"),
                Some(&BigRational::new(BigInt::from(1), BigInt::from(4)))
            );
        }
    }

    #[test]
    fn test_linearize_rejects_nonlinear() {
        let product = Term::Mul(var("x"), var("y"));
        assert!(matches!(
            LinearExpr::from_term(&product),
            Err(SolverError::Unsupported(_))
        ));

        let quotient = Term::Div(lit(1), var("y"));
        assert!(matches!(
            LinearExpr::from_term(&quotient),
            Err(SolverError::Unsupported(_))
        ));

        let by_zero = Term::Div(var("x"), Box::new(Term::Sub(lit(2), lit(2))));
        assert!(matches!(
            LinearExpr::from_term(&by_zero),
            Err(SolverError::Unsupported(_))
        ));
    }

    #[test]
    fn test_linear_term_tracks_form_per_node() {
        let x = LinearTerm::variable("x");
        let two = LinearTerm::literal(&BigRational::from_integer(BigInt::from(2)));
        let doubled = LinearTerm::node(Term::Mul, x.clone(), two);
        assert!(doubled.is_ok());
        if let Ok(doubled) = doubled {
            assert_eq!(doubled.to_string(), "(x * 2)");
            assert_eq!(
                doubled.linear().coefficients().get("x"),
                Some(&BigRational::from_integer(BigInt::from(2)))
            );
            let cancelled = LinearTerm::node(Term::Sub, doubled.clone(), doubled);
            assert!(cancelled.is_ok_and(|t| t.linear().is_constant()));
        }

        let squared = LinearTerm::node(Term::Mul, x.clone(), x);
        assert!(matches!(squared, Err(SolverError::Unsupported(_))));
    }

    #[test]
    fn test_combine_agrees_with_from_term() {
        // (x + 3) / 2 - y
        let term = Term::Sub(
            Box::new(Term::Div(Box::new(Term::Add(var("x"), lit(3))), lit(2))),
            var("y"),
        );
        let three = LinearTerm::literal(&BigRational::from_integer(BigInt::from(3)));
        let two = LinearTerm::literal(&BigRational::from_integer(BigInt::from(2)));
        let built = LinearTerm::node(Term::Add, LinearTerm::variable("x"), three)
            .and_then(|sum| LinearTerm::node(Term::Div, sum, two))
            .and_then(|half| LinearTerm::node(Term::Sub, half, LinearTerm::variable("y")));

        assert_eq!(built.as_ref().map(LinearTerm::term), Ok(&term));
        assert_eq!(built.map(|t| t.linear().clone()), LinearExpr::from_term(&term));
    }
}
