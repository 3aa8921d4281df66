use std::collections::BTreeMap;

use log::{debug, trace};
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use crate::solver::adapter::Relation;
use crate::solver::errors::SolverError;
use crate::solver::model::Model;

/// `real + delta·δ` for an infinitesimal δ > 0; the derived ordering is lexicographic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct DeltaRational {
    real: BigRational,
    delta: BigRational,
}

impl DeltaRational {
    pub(crate) fn new(real: BigRational, delta: BigRational) -> Self {
        Self { real, delta }
    }

    fn zero() -> Self {
        Self::new(BigRational::zero(), BigRational::zero())
    }

    fn plus(&self, other: &DeltaRational) -> DeltaRational {
        Self::new(&self.real + &other.real, &self.delta + &other.delta)
    }

    fn minus(&self, other: &DeltaRational) -> DeltaRational {
        Self::new(&self.real - &other.real, &self.delta - &other.delta)
    }

    fn scaled(&self, factor: &BigRational) -> DeltaRational {
        Self::new(&self.real * factor, &self.delta * factor)
    }

    /// Concrete value once δ is fixed
    fn at(&self, delta: &BigRational) -> BigRational {
        &self.real + &self.delta * delta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Feasibility {
    Feasible,
    Infeasible,
}

type Row = BTreeMap<usize, BigRational>;

/// General simplex over delta-rationals.
///
/// Every asserted linear form gets a slack variable; bounds only ever sit on
/// slacks, so problem variables start nonbasic and unbounded at zero. Rows map
/// each basic variable to its definition over the nonbasic ones. Variable ids
/// are ordered by creation and Bland's rule picks the smallest eligible id.
#[derive(Debug)]
pub(crate) struct Simplex {
    names: Vec<Option<String>>,
    ids: BTreeMap<String, usize>,
    slacks: BTreeMap<Row, usize>,
    rows: BTreeMap<usize, Row>,
    lower: Vec<Option<DeltaRational>>,
    upper: Vec<Option<DeltaRational>>,
    values: Vec<DeltaRational>,
    max_pivots: usize,
    pivots: usize,
}

impl Simplex {
    pub(crate) fn new(max_pivots: usize) -> Self {
        Self {
            names: Vec::new(),
            ids: BTreeMap::new(),
            slacks: BTreeMap::new(),
            rows: BTreeMap::new(),
            lower: Vec::new(),
            upper: Vec::new(),
            values: Vec::new(),
            max_pivots,
            pivots: 0,
        }
    }

    pub(crate) fn pivots(&self) -> usize {
        self.pivots
    }

    fn new_variable(&mut self, name: Option<String>) -> usize {
        let id = self.names.len();
        self.names.push(name);
        self.lower.push(None);
        self.upper.push(None);
        self.values.push(DeltaRational::zero());
        id
    }

    fn variable(&mut self, name: &str) -> usize {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = self.new_variable(Some(name.to_string()));
        self.ids.insert(name.to_string(), id);
        id
    }

    fn slack(&mut self, row: Row) -> usize {
        if let Some(&id) = self.slacks.get(&row) {
            return id;
        }
        let id = self.new_variable(None);
        let value = row
            .iter()
            .fold(DeltaRational::zero(), |acc, (&var, coefficient)| {
                acc.plus(&self.values[var].scaled(coefficient))
            });
        self.values[id] = value;
        self.rows.insert(id, row.clone());
        self.slacks.insert(row, id);
        id
    }

    /// Record `Σ coefficients·x + constant ⋈ 0`.
    ///
    /// Returns `Infeasible` when the new bound contradicts an earlier bound on
    /// the same linear form. Must be called before `check`.
    pub(crate) fn assert(
        &mut self,
        coefficients: &BTreeMap<String, BigRational>,
        constant: &BigRational,
        relation: Relation,
    ) -> Feasibility {
        let row: Row = coefficients
            .iter()
            .map(|(name, coefficient)| (self.variable(name), coefficient.clone()))
            .collect();
        let slack = self.slack(row);
        let bound = -constant;

        let zero = BigRational::zero();
        let one = BigRational::one();
        match relation {
            Relation::Eq => {
                self.tighten_lower(slack, DeltaRational::new(bound.clone(), zero.clone()));
                self.tighten_upper(slack, DeltaRational::new(bound, zero));
            }
            Relation::Le => self.tighten_upper(slack, DeltaRational::new(bound, zero)),
            Relation::Lt => self.tighten_upper(slack, DeltaRational::new(bound, -one)),
            Relation::Ge => self.tighten_lower(slack, DeltaRational::new(bound, zero)),
            Relation::Gt => self.tighten_lower(slack, DeltaRational::new(bound, one)),
        }

        match (&self.lower[slack], &self.upper[slack]) {
            (Some(lower), Some(upper)) if lower > upper => {
                debug!("Conflicting bounds on slack {}", slack);
                Feasibility::Infeasible
            }
            _ => Feasibility::Feasible,
        }
    }

    fn tighten_lower(&mut self, var: usize, bound: DeltaRational) {
        if self.lower[var].as_ref().is_none_or(|current| bound > *current) {
            self.lower[var] = Some(bound);
        }
    }

    fn tighten_upper(&mut self, var: usize, bound: DeltaRational) {
        if self.upper[var].as_ref().is_none_or(|current| bound < *current) {
            self.upper[var] = Some(bound);
        }
    }

    fn below_lower(&self, var: usize) -> bool {
        self.lower[var]
            .as_ref()
            .is_some_and(|lower| self.values[var] < *lower)
    }

    fn above_upper(&self, var: usize) -> bool {
        self.upper[var]
            .as_ref()
            .is_some_and(|upper| self.values[var] > *upper)
    }

    fn can_increase(&self, var: usize) -> bool {
        self.upper[var]
            .as_ref()
            .is_none_or(|upper| self.values[var] < *upper)
    }

    fn can_decrease(&self, var: usize) -> bool {
        self.lower[var]
            .as_ref()
            .is_none_or(|lower| self.values[var] > *lower)
    }

    /// # Errors
    ///
    /// Returns `PivotLimit` if the configured number of pivots is exhausted.
    pub(crate) fn check(&mut self) -> Result<Feasibility, SolverError> {
        loop {
            let violated = self
                .rows
                .keys()
                .copied()
                .find(|&basic| self.below_lower(basic) || self.above_upper(basic));
            let Some(basic) = violated else {
                debug!("Simplex feasible after {} pivots", self.pivots);
                return Ok(Feasibility::Feasible);
            };

            let increase = self.below_lower(basic);
            let target = if increase {
                self.lower[basic].clone()
            } else {
                self.upper[basic].clone()
            };
            let Some(target) = target else {
                return Ok(Feasibility::Feasible);
            };

            let entering = self.rows.get(&basic).and_then(|row| {
                row.iter()
                    .find(|&(&var, coefficient)| {
                        if coefficient.is_positive() == increase {
                            self.can_increase(var)
                        } else {
                            self.can_decrease(var)
                        }
                    })
                    .map(|(&var, _)| var)
            });
            let Some(entering) = entering else {
                debug!("Row of basic variable {} admits no repair", basic);
                return Ok(Feasibility::Infeasible);
            };

            if self.pivots >= self.max_pivots {
                return Err(SolverError::PivotLimit(self.max_pivots));
            }
            self.pivots += 1;
            trace!(
                "Pivot {}: variable {} leaves, variable {} enters",
                self.pivots, basic, entering
            );
            self.pivot_and_update(basic, entering, target);
        }
    }

    fn pivot_and_update(&mut self, basic: usize, entering: usize, target: DeltaRational) {
        let Some(coefficient) = self
            .rows
            .get(&basic)
            .and_then(|row| row.get(&entering))
            .cloned()
        else {
            return;
        };

        let theta = target
            .minus(&self.values[basic])
            .scaled(&coefficient.recip());
        self.values[basic] = target;
        self.values[entering] = self.values[entering].plus(&theta);
        for (&other, row) in &self.rows {
            if other == basic {
                continue;
            }
            if let Some(a) = row.get(&entering) {
                self.values[other] = self.values[other].plus(&theta.scaled(a));
            }
        }

        self.pivot(basic, entering);
    }

    // Swap roles: `entering` becomes basic, `leaving` becomes nonbasic.
    fn pivot(&mut self, leaving: usize, entering: usize) {
        let Some(mut row) = self.rows.remove(&leaving) else {
            return;
        };
        let Some(coefficient) = row.remove(&entering) else {
            self.rows.insert(leaving, row);
            return;
        };

        let inverse = coefficient.recip();
        let mut definition: Row = row
            .into_iter()
            .map(|(var, a)| (var, -(a * &inverse)))
            .collect();
        definition.insert(leaving, inverse);

        for other in self.rows.values_mut() {
            let Some(factor) = other.remove(&entering) else {
                continue;
            };
            for (&var, a) in &definition {
                let entry = other.entry(var).or_insert_with(BigRational::zero);
                *entry += &factor * a;
                if entry.is_zero() {
                    other.remove(&var);
                }
            }
        }

        self.rows.insert(entering, definition);
    }

    /// Concrete δ small enough for every strict bound to hold
    fn concrete_delta(&self) -> BigRational {
        let mut delta = BigRational::one();
        for (var, value) in self.values.iter().enumerate() {
            if let Some(lower) = &self.lower[var]
                && lower.real < value.real
                && lower.delta > value.delta
            {
                let limit = (&value.real - &lower.real) / (&lower.delta - &value.delta);
                delta = delta.min(limit);
            }
            if let Some(upper) = &self.upper[var]
                && value.real < upper.real
                && value.delta > upper.delta
            {
                let limit = (&upper.real - &value.real) / (&value.delta - &upper.delta);
                delta = delta.min(limit);
            }
        }
        delta
    }

    /// Values of the problem variables; only meaningful after a feasible `check`
    pub(crate) fn model(&self) -> Model {
        let delta = self.concrete_delta();
        self.names
            .iter()
            .enumerate()
            .filter_map(|(var, name)| {
                name.as_ref()
                    .map(|name| (name.clone(), self.values[var].at(&delta)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests_inner_helpers {
    use std::collections::BTreeMap;

    use num_bigint::BigInt;
    use num_rational::BigRational;

    use super::{DeltaRational, Feasibility, Simplex};
    use crate::solver::adapter::Relation;

    fn int(value: i64) -> BigRational {
        BigRational::from_integer(BigInt::from(value))
    }

    fn form(entries: &[(&str, i64)]) -> BTreeMap<String, BigRational> {
        entries
            .iter()
            .map(|&(name, coefficient)| (name.to_string(), int(coefficient)))
            .collect()
    }

    #[test]
    fn test_delta_rational_ordering() {
        let just_below_one = DeltaRational::new(int(1), int(-1));
        let one = DeltaRational::new(int(1), int(0));
        let just_above_one = DeltaRational::new(int(1), int(1));
        assert!(just_below_one < one);
        assert!(one < just_above_one);
        assert!(DeltaRational::new(int(0), int(100)) < just_below_one);
    }

    #[test]
    fn test_single_equality_needs_one_pivot() {
        // x - 2y = 10
        let mut simplex = Simplex::new(10);
        let feasibility = simplex.assert(&form(&[("x", 1), ("y", -2)]), &int(-10), Relation::Eq);
        assert_eq!(feasibility, Feasibility::Feasible);
        assert_eq!(simplex.check(), Ok(Feasibility::Feasible));
        assert_eq!(simplex.pivots(), 1);

        let model = simplex.model();
        assert_eq!(model.get("x"), Some(&int(10)));
        assert_eq!(model.get("y"), Some(&int(0)));
    }

    #[test]
    fn test_same_form_shares_slack() {
        let mut simplex = Simplex::new(10);
        simplex.assert(&form(&[("x", 1)]), &int(0), Relation::Gt);
        let feasibility = simplex.assert(&form(&[("x", 1)]), &int(0), Relation::Lt);
        assert_eq!(feasibility, Feasibility::Infeasible);
    }

    #[test]
    fn test_row_conflict_is_infeasible() {
        // x + y >= 4, x <= 1, y <= 1
        let mut simplex = Simplex::new(100);
        simplex.assert(&form(&[("x", 1), ("y", 1)]), &int(-4), Relation::Ge);
        simplex.assert(&form(&[("x", 1)]), &int(-1), Relation::Le);
        simplex.assert(&form(&[("y", 1)]), &int(-1), Relation::Le);
        assert_eq!(simplex.check(), Ok(Feasibility::Infeasible));
    }
}
