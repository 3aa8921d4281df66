use std::collections::BTreeSet;

use log::{debug, info};
use num_rational::BigRational;
use num_traits::Zero;

use crate::solver::adapter::{Relation, SolveResult, Solver};
use crate::solver::constants::DEFAULT_MAX_PIVOTS;
use crate::solver::errors::SolverError;
use crate::solver::linear::{LinearExpr, LinearTerm};
use crate::solver::simplex::{Feasibility, Simplex};
use crate::solver::term::{Constraint, Term};

/// Configuration for the built-in solver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    pub max_pivots: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_pivots: DEFAULT_MAX_PIVOTS,
        }
    }
}

/// Decision procedure for conjunctions of linear real arithmetic constraints
#[derive(Debug, Clone, Default)]
pub struct LinearSolver {
    config: SolverConfig,
    assertions: Vec<Constraint>,
    forms: Vec<LinearExpr>,
    scopes: Vec<usize>,
}

impl LinearSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Constraints currently asserted, oldest first
    pub fn assertions(&self) -> &[Constraint] {
        &self.assertions
    }

    /// Every variable occurring in an asserted constraint
    pub fn variables(&self) -> BTreeSet<&str> {
        self.assertions
            .iter()
            .flat_map(|c| c.lhs.variables().into_iter().chain(c.rhs.variables()))
            .collect()
    }
}

impl Solver for LinearSolver {
    type Term = LinearTerm;
    type Formula = Constraint;

    fn name(&self) -> &str {
        "linear-simplex"
    }

    fn real_var(&self, name: &str) -> LinearTerm {
        LinearTerm::variable(name)
    }

    fn real_lit(&self, value: &BigRational) -> LinearTerm {
        LinearTerm::literal(value)
    }

    fn add(&self, left: LinearTerm, right: LinearTerm) -> Result<LinearTerm, SolverError> {
        LinearTerm::node(Term::Add, left, right)
    }

    fn sub(&self, left: LinearTerm, right: LinearTerm) -> Result<LinearTerm, SolverError> {
        LinearTerm::node(Term::Sub, left, right)
    }

    fn mul(&self, left: LinearTerm, right: LinearTerm) -> Result<LinearTerm, SolverError> {
        LinearTerm::node(Term::Mul, left, right)
    }

    fn div(&self, left: LinearTerm, right: LinearTerm) -> Result<LinearTerm, SolverError> {
        LinearTerm::node(Term::Div, left, right)
    }

    fn compare(
        &self,
        relation: Relation,
        left: LinearTerm,
        right: LinearTerm,
    ) -> Result<Constraint, SolverError> {
        Ok(Constraint {
            lhs: left.into_term(),
            relation,
            rhs: right.into_term(),
        })
    }

    fn add_constraint(&mut self, constraint: Constraint) -> Result<(), SolverError> {
        let form = LinearExpr::from_term(&constraint.lhs)?
            .minus(&LinearExpr::from_term(&constraint.rhs)?);
        debug!("Asserting constraint: {}", constraint);
        self.assertions.push(constraint);
        self.forms.push(form);
        Ok(())
    }

    fn solve(&mut self) -> Result<SolveResult, SolverError> {
        info!("Solving {} constraints", self.assertions.len());

        let mut simplex = Simplex::new(self.config.max_pivots);
        for (constraint, form) in self.assertions.iter().zip(&self.forms) {
            if form.is_constant() {
                if constraint.relation.holds(form.constant_part(), &BigRational::zero()) {
                    debug!("Constant constraint holds: {}", constraint);
                    continue;
                }
                info!("Constant constraint is false: {}", constraint);
                return Ok(SolveResult::Unsat);
            }

            if simplex.assert(form.coefficients(), form.constant_part(), constraint.relation)
                == Feasibility::Infeasible
            {
                info!("Bounds conflict while asserting: {}", constraint);
                return Ok(SolveResult::Unsat);
            }
        }

        match simplex.check()? {
            Feasibility::Feasible => {
                let mut model = simplex.model();
                // Variables that cancel out everywhere are unconstrained.
                for name in self.variables() {
                    if model.get(name).is_none() {
                        model.insert(name, BigRational::zero());
                    }
                }
                info!("Satisfiable: {}", model);
                Ok(SolveResult::Sat(model))
            }
            Feasibility::Infeasible => {
                info!("Unsatisfiable after {} pivots", simplex.pivots());
                Ok(SolveResult::Unsat)
            }
        }
    }

    fn push(&mut self) -> Result<(), SolverError> {
        self.scopes.push(self.assertions.len());
        Ok(())
    }

    fn pop(&mut self) -> Result<(), SolverError> {
        let mark = self.scopes.pop().ok_or(SolverError::EmptyScope)?;
        self.assertions.truncate(mark);
        self.forms.truncate(mark);
        Ok(())
    }

    fn reset(&mut self) -> Result<(), SolverError> {
        self.assertions.clear();
        self.forms.clear();
        self.scopes.clear();
        Ok(())
    }
}
