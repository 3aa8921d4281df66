use num_bigint::BigInt;
use num_rational::BigRational;

use crate::expression::{Binding, Context, Expression, Symbol};
use crate::find_model;
use crate::solver::{
    Constraint, LinearSolver, Model, Relation, SolveResult, Solver, SolverConfig, SolverError,
    Term,
};

fn int(value: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(value))
}

fn assert_constraint(
    solver: &mut LinearSolver,
    lhs: &Expression,
    relation: Relation,
    rhs: &Expression,
) {
    let constraint = Context::new(&*solver).constraint(lhs, relation, rhs);
    assert!(constraint.is_ok(), "translation failed: {:?}", constraint);
    if let Ok(constraint) = constraint {
        assert!(solver.add_constraint(constraint).is_ok());
    }
}

fn satisfies(model: &Model, lhs: &Expression, relation: Relation, rhs: &Expression) -> bool {
    let binding = model.to_binding();
    match (lhs.evaluate(&binding), rhs.evaluate(&binding)) {
        (Ok(left), Ok(right)) => relation.holds(&left, &right),
        _ => false,
    }
}

#[test]
fn test_concrete_scenario_is_satisfiable() {
    let x = Symbol::new("x");
    let y = Symbol::new("y");
    let expr = &x - &y * 2;
    let target = Expression::constant(10);

    let mut solver = LinearSolver::new();
    assert_constraint(&mut solver, &expr, Relation::Eq, &target);

    let result = solver.solve();
    assert!(matches!(result, Ok(SolveResult::Sat(_))));
    if let Ok(SolveResult::Sat(model)) = result {
        assert!(model.get("x").is_some());
        assert!(model.get("y").is_some());
        assert!(satisfies(&model, &expr, Relation::Eq, &target));
    }
}

#[test]
fn test_find_model_convenience() {
    let expr = Symbol::new("x") - Symbol::new("y") * 2;
    let result = find_model(&expr, Relation::Eq, &Expression::constant(10));
    assert!(result.is_ok());
    if let Ok(result) = result {
        assert!(result.is_sat());
        assert_eq!(result.model().map(Model::len), Some(2));
    }
}

#[test]
fn test_linear_system_with_unique_solution() {
    // x + y = 10, x - y = 2
    let x = Symbol::new("x");
    let y = Symbol::new("y");
    let mut solver = LinearSolver::new();
    assert_constraint(&mut solver, &(&x + &y), Relation::Eq, &Expression::constant(10));
    assert_constraint(&mut solver, &(&x - &y), Relation::Eq, &Expression::constant(2));

    let model = solver.solve().ok().and_then(SolveResult::into_model);
    assert!(model.is_some());
    if let Some(model) = model {
        assert_eq!(model.get("x"), Some(&int(6)));
        assert_eq!(model.get("y"), Some(&int(4)));
        assert_eq!(model.to_string(), "[x = 6, y = 4]");
    }
}

#[test]
fn test_contradictory_strict_bounds_are_unsat() {
    let x = Expression::symbol("x");
    let one = Expression::constant(1);
    let mut solver = LinearSolver::new();
    assert_constraint(&mut solver, &x, Relation::Lt, &one);
    assert_constraint(&mut solver, &x, Relation::Gt, &one);

    assert_eq!(solver.solve(), Ok(SolveResult::Unsat));
}

#[test]
fn test_strict_interval_model_lies_inside() {
    let x = Expression::symbol("x");
    let mut solver = LinearSolver::new();
    assert_constraint(&mut solver, &x, Relation::Gt, &Expression::constant(0));
    assert_constraint(&mut solver, &x, Relation::Lt, &Expression::constant(1));

    let model = solver.solve().ok().and_then(SolveResult::into_model);
    assert!(model.is_some());
    if let Some(model) = model {
        let value = model.get("x").cloned().unwrap_or_else(|| int(-1));
        assert!(value > int(0));
        assert!(value < int(1));
    }
}

#[test]
fn test_infeasible_combination_needs_pivoting() {
    // x + y >= 4, x <= 1, y <= 1
    let x = Expression::symbol("x");
    let y = Expression::symbol("y");
    let mut solver = LinearSolver::new();
    assert_constraint(&mut solver, &(&x + &y), Relation::Ge, &Expression::constant(4));
    assert_constraint(&mut solver, &x, Relation::Le, &Expression::constant(1));
    assert_constraint(&mut solver, &y, Relation::Le, &Expression::constant(1));

    assert_eq!(solver.solve(), Ok(SolveResult::Unsat));
}

#[test]
fn test_mixed_constraints_model_satisfies_all() {
    let x = Symbol::new("x");
    let y = Symbol::new("y");
    let z = Symbol::new("z");
    let constraints = vec![
        (&x + &y * 3, Relation::Le, Expression::constant(12)),
        (&x - &z, Relation::Gt, Expression::constant(2)),
        (Expression::from(&y) / 2 + &z, Relation::Ge, Expression::constant(1)),
        (&x + &y + &z, Relation::Eq, Expression::constant(7)),
    ];

    let mut solver = LinearSolver::new();
    for (lhs, relation, rhs) in &constraints {
        assert_constraint(&mut solver, lhs, *relation, rhs);
    }

    let model = solver.solve().ok().and_then(SolveResult::into_model);
    assert!(model.is_some());
    if let Some(model) = model {
        for (lhs, relation, rhs) in &constraints {
            assert!(
                satisfies(&model, lhs, *relation, rhs),
                "{} {} {} violated by {}",
                lhs,
                relation,
                rhs,
                model
            );
        }
    }
}

#[test]
fn test_cancelled_symbols_still_get_a_value() {
    // (x - x) + y = 1, z * 0 <= y
    let x = Symbol::new("x");
    let y = Symbol::new("y");
    let z = Symbol::new("z");
    let constraints = vec![
        ((&x - &x) + &y, Relation::Eq, Expression::constant(1)),
        (&z * 0, Relation::Le, Expression::from(&y)),
    ];

    let mut solver = LinearSolver::new();
    for (lhs, relation, rhs) in &constraints {
        assert_constraint(&mut solver, lhs, *relation, rhs);
    }
    assert_eq!(solver.variables().into_iter().collect::<Vec<_>>(), vec!["x", "y", "z"]);

    let model = solver.solve().ok().and_then(SolveResult::into_model);
    assert!(model.is_some());
    if let Some(model) = model {
        assert!(model.get("x").is_some());
        assert!(model.get("z").is_some());
        assert_eq!(model.get("y"), Some(&int(1)));
        for (lhs, relation, rhs) in &constraints {
            assert!(satisfies(&model, lhs, *relation, rhs));
        }
    }

    assert_eq!(solver.push(), Ok(()));
    assert_constraint(&mut solver, &Expression::symbol("w"), Relation::Ge, &Expression::constant(2));
    assert_eq!(solver.pop(), Ok(()));
    let model = solver.solve().ok().and_then(SolveResult::into_model);
    assert_eq!(model.map(|m| m.get("w").is_none()), Some(true));
}

#[test]
fn test_long_sum_translates_and_solves() {
    // x0 + x1 + ... + x59 = 60 with every xi >= 1
    let names: Vec<String> = (0..60).map(|i| format!("x{}", i)).collect();
    let sum = names
        .iter()
        .skip(1)
        .fold(Expression::symbol(names[0].as_str()), |acc, name| {
            acc + Symbol::new(name.as_str())
        });

    let mut solver = LinearSolver::new();
    assert_constraint(&mut solver, &sum, Relation::Eq, &Expression::constant(60));
    for name in &names {
        assert_constraint(
            &mut solver,
            &Expression::symbol(name.as_str()),
            Relation::Ge,
            &Expression::constant(1),
        );
    }

    let model = solver.solve().ok().and_then(SolveResult::into_model);
    assert_eq!(model.as_ref().map(Model::len), Some(60));
    if let Some(model) = model {
        assert!(satisfies(&model, &sum, Relation::Eq, &Expression::constant(60)));
        assert!(model.iter().all(|(_, value)| *value == int(1)));
    }
}

#[test]
fn test_constant_constraints() {
    let mut solver = LinearSolver::new();
    assert_constraint(
        &mut solver,
        &(Expression::constant(1) + 1),
        Relation::Eq,
        &Expression::constant(2),
    );
    assert_eq!(solver.solve(), Ok(SolveResult::Sat(Model::new())));

    // x - x cancels, leaving 0 > 0
    let x = Symbol::new("x");
    assert_constraint(&mut solver, &(&x - &x), Relation::Gt, &Expression::constant(0));
    assert_eq!(solver.solve(), Ok(SolveResult::Unsat));
}

#[test]
fn test_nonlinear_constraints_are_unsupported() {
    let solver = LinearSolver::new();
    let mut ctx = Context::new(&solver);
    let product = Symbol::new("x") * Symbol::new("y");

    let result = ctx.eq(&product, &Expression::constant(1));
    assert!(matches!(result, Err(SolverError::Unsupported(_))));
}

#[test]
fn test_hand_built_nonlinear_constraint_is_rejected() {
    let mut solver = LinearSolver::new();
    let constraint = Constraint {
        lhs: Term::Mul(
            Box::new(Term::Var("x".to_string())),
            Box::new(Term::Var("x".to_string())),
        ),
        relation: Relation::Eq,
        rhs: Term::Lit(int(4)),
    };
    assert!(matches!(
        solver.add_constraint(constraint),
        Err(SolverError::Unsupported(_))
    ));
    assert!(solver.assertions().is_empty());
}

#[test]
fn test_push_and_pop_restore_satisfiability() {
    let x = Expression::symbol("x");
    let mut solver = LinearSolver::new();
    assert_constraint(&mut solver, &x, Relation::Ge, &Expression::constant(5));

    assert_eq!(solver.push(), Ok(()));
    assert_constraint(&mut solver, &x, Relation::Le, &Expression::constant(4));
    assert_eq!(solver.solve(), Ok(SolveResult::Unsat));

    assert_eq!(solver.pop(), Ok(()));
    assert_eq!(solver.assertions().len(), 1);
    assert!(solver.solve().is_ok_and(|result| result.is_sat()));

    assert_eq!(solver.pop(), Err(SolverError::EmptyScope));
}

#[test]
fn test_reset_clears_everything() {
    let x = Expression::symbol("x");
    let mut solver = LinearSolver::new();
    assert_eq!(solver.push(), Ok(()));
    assert_constraint(&mut solver, &x, Relation::Lt, &x);
    assert_eq!(solver.solve(), Ok(SolveResult::Unsat));

    assert_eq!(solver.reset(), Ok(()));
    assert!(solver.assertions().is_empty());
    assert_eq!(solver.pop(), Err(SolverError::EmptyScope));
    assert_eq!(solver.solve(), Ok(SolveResult::Sat(Model::new())));
}

#[test]
fn test_pivot_limit_is_an_error_not_unsat() {
    let x = Symbol::new("x");
    let y = Symbol::new("y");
    let mut solver = LinearSolver::with_config(SolverConfig { max_pivots: 0 });
    assert_eq!(solver.config().max_pivots, 0);
    assert_constraint(&mut solver, &(&x - &y * 2), Relation::Eq, &Expression::constant(10));

    assert_eq!(solver.solve(), Err(SolverError::PivotLimit(0)));
}

#[test]
fn test_solve_is_repeatable() {
    let x = Symbol::new("x");
    let mut solver = LinearSolver::new();
    assert_constraint(&mut solver, &(&x * 3), Relation::Eq, &Expression::constant(2));

    let first = solver.solve();
    let second = solver.solve();
    assert_eq!(first, second);
    assert_eq!(
        first.ok().and_then(SolveResult::into_model).and_then(|m| m.get("x").cloned()),
        Some(BigRational::new(BigInt::from(2), BigInt::from(3)))
    );
}

#[test]
fn test_model_to_binding_round_trip() {
    let model: Model = vec![("a".to_string(), int(2)), ("b".to_string(), int(-1))]
        .into_iter()
        .collect();
    let binding: Binding = model.to_binding();
    assert_eq!(binding.len(), 2);

    let expr = Symbol::new("a") * Symbol::new("b");
    assert_eq!(expr.evaluate(&binding), Ok(int(-2)));
    assert_eq!(model.to_string(), "[a = 2, b = -1]");
}
