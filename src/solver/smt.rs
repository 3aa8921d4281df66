use std::collections::BTreeSet;
use std::io;

use easy_smt::{Context as SmtContext, Response, SExpr, SExprData};
use log::{debug, info};
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};

use crate::solver::adapter::{Relation, SolveResult, Solver};
use crate::solver::errors::SolverError;
use crate::solver::model::Model;
use crate::utils::parse_rational;

fn backend(err: io::Error) -> SolverError {
    SolverError::Backend(err.to_string())
}

/// Adapter over an external SMT-LIB 2 solver process such as z3.
///
/// Terms are s-expressions over the `Real` sort. Variables are declared
/// lazily, the first time a constraint mentioning them is asserted, and
/// every assertion lives inside a base scope so that `reset` can discard
/// everything without restarting the process.
pub struct SmtSolver {
    ctx: SmtContext,
    program: String,
    declared: Vec<String>,
    scopes: Vec<usize>,
}

impl SmtSolver {
    /// # Errors
    ///
    /// Returns `Backend` if the process cannot be started or rejects the
    /// initial commands.
    pub fn new(program: &str, args: &[&str]) -> Result<Self, SolverError> {
        info!("Starting SMT solver: {} {}", program, args.join(" "));
        let mut ctx = SmtContext::new(program, args).map_err(backend)?;
        ctx.push().map_err(backend)?;
        Ok(Self {
            ctx,
            program: program.to_string(),
            declared: Vec::new(),
            scopes: Vec::new(),
        })
    }

    /// `z3` from `PATH`, reading SMT-LIB 2 on stdin
    ///
    /// # Errors
    ///
    /// See [`SmtSolver::new`].
    pub fn z3() -> Result<Self, SolverError> {
        Self::new("z3", &["-smt2", "-in"])
    }

    /// Variables declared in the open scopes, in declaration order
    pub fn declared(&self) -> &[String] {
        &self.declared
    }

    /// Render a term or formula as SMT-LIB text
    pub fn render(&self, expr: SExpr) -> String {
        self.ctx.display(expr).to_string()
    }

    fn is_atom(&self, expr: SExpr, text: &str) -> bool {
        matches!(self.ctx.get(expr), SExprData::Atom(atom) if atom == text)
    }

    fn magnitude(&self, value: &BigInt) -> SExpr {
        self.ctx.atom(format!("{}.0", value.magnitude()))
    }

    // Every atom outside operator position that is not a numeral.
    fn free_names(&self, formula: SExpr) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        let mut stack = vec![formula];
        while let Some(expr) = stack.pop() {
            match self.ctx.get(expr) {
                SExprData::Atom(atom) => {
                    if !atom.starts_with(|c: char| c.is_ascii_digit()) {
                        names.insert(atom.to_string());
                    }
                }
                SExprData::List(items) => stack.extend(items.iter().skip(1).copied()),
            }
        }
        names
    }

    fn rational(&self, value: SExpr) -> Result<BigRational, SolverError> {
        let unexpected =
            || SolverError::Backend(format!("Unexpected model value {}", self.render(value)));

        match self.ctx.get(value) {
            SExprData::Atom(text) => parse_rational(text).map_err(|_| unexpected()),
            SExprData::List([op, arg]) if self.is_atom(*op, "-") => Ok(-self.rational(*arg)?),
            SExprData::List([op, numer, denom]) if self.is_atom(*op, "/") => {
                let numer = self.rational(*numer)?;
                let denom = self.rational(*denom)?;
                if denom.is_zero() {
                    return Err(unexpected());
                }
                Ok(numer / denom)
            }
            _ => Err(unexpected()),
        }
    }

    fn model(&mut self) -> Result<Model, SolverError> {
        if self.declared.is_empty() {
            return Ok(Model::new());
        }

        let atoms = self
            .declared
            .iter()
            .map(|name| self.ctx.atom(name.as_str()))
            .collect();
        let values = self.ctx.get_value(atoms).map_err(backend)?;

        let mut model = Model::new();
        for (name, value) in values {
            let name = match self.ctx.get(name) {
                SExprData::Atom(atom) => atom.to_string(),
                SExprData::List(_) => self.render(name),
            };
            let value = self.rational(value)?;
            model.insert(name, value);
        }
        Ok(model)
    }
}

impl Solver for SmtSolver {
    type Term = SExpr;
    type Formula = SExpr;

    fn name(&self) -> &str {
        &self.program
    }

    fn real_var(&self, name: &str) -> SExpr {
        self.ctx.atom(name)
    }

    fn real_lit(&self, value: &BigRational) -> SExpr {
        let magnitude = if value.is_integer() {
            self.magnitude(value.numer())
        } else {
            self.ctx.list(vec![
                self.ctx.atom("/"),
                self.magnitude(value.numer()),
                self.magnitude(value.denom()),
            ])
        };

        if value.is_negative() {
            self.ctx.negate(magnitude)
        } else {
            magnitude
        }
    }

    fn add(&self, left: SExpr, right: SExpr) -> Result<SExpr, SolverError> {
        Ok(self.ctx.plus(left, right))
    }

    fn sub(&self, left: SExpr, right: SExpr) -> Result<SExpr, SolverError> {
        Ok(self.ctx.sub(left, right))
    }

    fn mul(&self, left: SExpr, right: SExpr) -> Result<SExpr, SolverError> {
        Ok(self.ctx.times(left, right))
    }

    fn div(&self, left: SExpr, right: SExpr) -> Result<SExpr, SolverError> {
        Ok(self.ctx.list(vec![self.ctx.atom("/"), left, right]))
    }

    fn compare(&self, relation: Relation, left: SExpr, right: SExpr) -> Result<SExpr, SolverError> {
        Ok(match relation {
            Relation::Eq => self.ctx.eq(left, right),
            Relation::Le => self.ctx.lte(left, right),
            Relation::Lt => self.ctx.lt(left, right),
            Relation::Ge => self.ctx.gte(left, right),
            Relation::Gt => self.ctx.gt(left, right),
        })
    }

    fn add_constraint(&mut self, constraint: SExpr) -> Result<(), SolverError> {
        let real = self.ctx.atom("Real");
        for name in self.free_names(constraint) {
            if self.declared.contains(&name) {
                continue;
            }
            debug!("Declaring {} : Real", name);
            self.ctx.declare(name.as_str(), real).map_err(backend)?;
            self.declared.push(name);
        }

        debug!("Asserting constraint: {}", self.render(constraint));
        self.ctx.assert(constraint).map_err(backend)
    }

    fn solve(&mut self) -> Result<SolveResult, SolverError> {
        info!("Checking satisfiability with {}", self.program);
        match self.ctx.check().map_err(backend)? {
            Response::Sat => {
                let model = self.model()?;
                info!("Satisfiable: {}", model);
                Ok(SolveResult::Sat(model))
            }
            Response::Unsat => {
                info!("Unsatisfiable");
                Ok(SolveResult::Unsat)
            }
            Response::Unknown => Err(SolverError::Backend(format!(
                "{} returned unknown",
                self.program
            ))),
        }
    }

    fn push(&mut self) -> Result<(), SolverError> {
        self.ctx.push().map_err(backend)?;
        self.scopes.push(self.declared.len());
        Ok(())
    }

    // Declarations made inside the scope are dropped with it.
    fn pop(&mut self) -> Result<(), SolverError> {
        let mark = self.scopes.pop().ok_or(SolverError::EmptyScope)?;
        self.ctx.pop().map_err(backend)?;
        self.declared.truncate(mark);
        Ok(())
    }

    fn reset(&mut self) -> Result<(), SolverError> {
        self.ctx.pop_many(self.scopes.len() + 1).map_err(backend)?;
        self.ctx.push().map_err(backend)?;
        self.declared.clear();
        self.scopes.clear();
        Ok(())
    }
}
