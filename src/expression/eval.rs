use std::collections::HashMap;

use log::{debug, info};
use num_rational::BigRational;
use num_traits::Zero;
use rayon::prelude::*;

use crate::expression::ast::{Expression, Operator};
use crate::expression::binding::Binding;
use crate::expression::errors::ExpressionError;

impl Operator {
    /// # Errors
    ///
    /// Returns `DivisionByZero` when dividing by exactly zero.
    pub fn apply(
        self,
        left: BigRational,
        right: BigRational,
    ) -> Result<BigRational, ExpressionError> {
        match self {
            Operator::Add => Ok(left + right),
            Operator::Sub => Ok(left - right),
            Operator::Mul => Ok(left * right),
            Operator::Div => {
                if right.is_zero() {
                    debug!("Division by zero attempted");
                    Err(ExpressionError::DivisionByZero)
                } else {
                    Ok(left / right)
                }
            }
        }
    }
}

impl Expression {
    /// # Errors
    ///
    /// Returns an error when:
    /// - a reachable symbol has no entry in `binding`
    /// - a divisor evaluates to zero
    /// - substituting a symbol leads back to that same symbol
    ///
    /// Each bound symbol is resolved at most once per call. Evaluation
    /// recurses over the tree, so its depth is bounded by the thread stack.
    pub fn evaluate(&self, binding: &Binding) -> Result<BigRational, ExpressionError> {
        debug!("Evaluating expression: {}", self);

        let mut resolving = Vec::new();
        let mut resolved = HashMap::new();
        let result = self.evaluate_in(binding, &mut resolving, &mut resolved);

        match &result {
            Ok(value) => debug!("Expression evaluated to: {}", value),
            Err(e) => debug!("Expression evaluation failed: {}", e),
        }

        result
    }

    /// Evaluate against many bindings in parallel, preserving input order
    pub fn evaluate_all(&self, bindings: &[Binding]) -> Vec<Result<BigRational, ExpressionError>> {
        info!(
            "Evaluating {} against {} bindings",
            self,
            bindings.len()
        );

        bindings
            .par_iter()
            .map(|binding| self.evaluate(binding))
            .collect()
    }

    // `resolving` holds the symbols currently being substituted along this path,
    // `resolved` the values of symbols already substituted during this call.
    fn evaluate_in<'b>(
        &self,
        binding: &'b Binding,
        resolving: &mut Vec<&'b str>,
        resolved: &mut HashMap<&'b str, BigRational>,
    ) -> Result<BigRational, ExpressionError> {
        match self {
            Expression::Constant(c) => Ok(c.value().clone()),
            Expression::Symbol(s) => {
                let (name, replacement) = binding
                    .get_key_value(s.name())
                    .ok_or_else(|| ExpressionError::UnboundSymbol(s.name().to_string()))?;

                if let Some(value) = resolved.get(name.as_str()) {
                    return Ok(value.clone());
                }

                if resolving.contains(&name.as_str()) {
                    debug!("Cyclic substitution through symbol '{}'", name);
                    return Err(ExpressionError::CyclicBinding(name.clone()));
                }

                resolving.push(name);
                let value = replacement.evaluate_in(binding, resolving, resolved);
                resolving.pop();

                let value = value?;
                resolved.insert(name.as_str(), value.clone());
                Ok(value)
            }
            Expression::Operation(op) => {
                let left = op.left().evaluate_in(binding, resolving, resolved)?;
                let right = op.right().evaluate_in(binding, resolving, resolved)?;
                op.operator().apply(left, right)
            }
        }
    }
}

#[cfg(test)]
mod tests_inner_helpers {
    use num_bigint::BigInt;
    use num_rational::BigRational;

    use crate::expression::ast::Operator;
    use crate::expression::errors::ExpressionError;

    fn int(value: i64) -> BigRational {
        BigRational::from_integer(BigInt::from(value))
    }

    #[test]
    fn test_apply_total_operators() {
        assert_eq!(Operator::Add.apply(int(2), int(3)), Ok(int(5)));
        assert_eq!(Operator::Sub.apply(int(2), int(3)), Ok(int(-1)));
        assert_eq!(Operator::Mul.apply(int(2), int(3)), Ok(int(6)));
    }

    #[test]
    fn test_apply_division_is_exact() {
        assert_eq!(
            Operator::Div.apply(int(1), int(3)),
            Ok(BigRational::new(BigInt::from(1), BigInt::from(3)))
        );
    }

    #[test]
    fn test_apply_division_by_zero() {
        assert_eq!(
            Operator::Div.apply(int(1), int(0)),
            Err(ExpressionError::DivisionByZero)
        );
    }
}
