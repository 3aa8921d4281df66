use std::collections::HashMap;

use log::debug;

use crate::expression::ast::{Expression, Operator};
use crate::solver::{Relation, Solver, SolverError};

/// Translation scope: one solver variable per symbol name.
///
/// The context borrows the solver only to build terms; once the formulas are
/// built it can be dropped and the solver used mutably again.
pub struct Context<'s, S: Solver> {
    solver: &'s S,
    variables: HashMap<String, S::Term>,
}

impl<'s, S: Solver> Context<'s, S> {
    pub fn new(solver: &'s S) -> Self {
        Self {
            solver,
            variables: HashMap::new(),
        }
    }

    pub fn solver(&self) -> &'s S {
        self.solver
    }

    /// Solver variable for `name`, declared on first request
    pub fn variable(&mut self, name: &str) -> S::Term {
        if let Some(term) = self.variables.get(name) {
            return term.clone();
        }

        debug!("Declaring real variable '{}' on {}", name, self.solver.name());
        let term = self.solver.real_var(name);
        self.variables.insert(name.to_string(), term.clone());
        term
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Number of distinct variables declared so far
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// # Errors
    ///
    /// Returns an error if either side or the comparison cannot be expressed
    /// by the solver.
    pub fn constraint(
        &mut self,
        lhs: &Expression,
        relation: Relation,
        rhs: &Expression,
    ) -> Result<S::Formula, SolverError> {
        let left = lhs.to_solver_expr(self)?;
        let right = rhs.to_solver_expr(self)?;
        self.solver.compare(relation, left, right)
    }

    /// # Errors
    ///
    /// See [`Context::constraint`].
    pub fn eq(&mut self, lhs: &Expression, rhs: &Expression) -> Result<S::Formula, SolverError> {
        self.constraint(lhs, Relation::Eq, rhs)
    }

    /// # Errors
    ///
    /// See [`Context::constraint`].
    pub fn le(&mut self, lhs: &Expression, rhs: &Expression) -> Result<S::Formula, SolverError> {
        self.constraint(lhs, Relation::Le, rhs)
    }

    /// # Errors
    ///
    /// See [`Context::constraint`].
    pub fn lt(&mut self, lhs: &Expression, rhs: &Expression) -> Result<S::Formula, SolverError> {
        self.constraint(lhs, Relation::Lt, rhs)
    }

    /// # Errors
    ///
    /// See [`Context::constraint`].
    pub fn ge(&mut self, lhs: &Expression, rhs: &Expression) -> Result<S::Formula, SolverError> {
        self.constraint(lhs, Relation::Ge, rhs)
    }

    /// # Errors
    ///
    /// See [`Context::constraint`].
    pub fn gt(&mut self, lhs: &Expression, rhs: &Expression) -> Result<S::Formula, SolverError> {
        self.constraint(lhs, Relation::Gt, rhs)
    }
}

impl Expression {
    /// Translate into the solver's term language, node for node.
    ///
    /// Recurses once per tree level, like [`Expression::evaluate`].
    ///
    /// # Errors
    ///
    /// Returns `Unsupported` when the solver theory cannot express one of the
    /// operations.
    pub fn to_solver_expr<S: Solver>(&self, ctx: &mut Context<'_, S>) -> Result<S::Term, SolverError> {
        match self {
            Expression::Symbol(s) => Ok(ctx.variable(s.name())),
            Expression::Constant(c) => Ok(ctx.solver().real_lit(c.value())),
            Expression::Operation(op) => {
                let left = op.left().to_solver_expr(ctx)?;
                let right = op.right().to_solver_expr(ctx)?;
                let solver = ctx.solver();
                let result = match op.operator() {
                    Operator::Add => solver.add(left, right),
                    Operator::Sub => solver.sub(left, right),
                    Operator::Mul => solver.mul(left, right),
                    Operator::Div => solver.div(left, right),
                };
                if let Err(e) = &result {
                    debug!("Translation of {} failed: {}", op, e);
                }
                result
            }
        }
    }
}
