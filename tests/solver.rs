use rail_solver::{Cmp, LinExpr, Model, Sense, SolveStatus, SolverError, VarKind};

#[test]
fn minimizes_a_small_continuous_model() {
    let mut model = Model::new();
    let x = model.add_var("x", VarKind::Continuous, 0.0, f64::INFINITY);
    let y = model.add_var("y", VarKind::Continuous, 0.0, f64::INFINITY);

    let mut sum = LinExpr::variable(x);
    sum.add_term(y, 1.0);
    model.add_constraint(sum.clone(), Cmp::Ge, 2.0);

    let mut objective = LinExpr::variable(x);
    objective.add_term(y, 3.0);
    model.set_objective(objective.clone(), Sense::Minimize);

    let solution = model.optimize().unwrap();
    assert_eq!(solution.status, SolveStatus::Optimal);
    // All the weight lands on the cheap variable.
    assert!((solution.value(x) - 2.0).abs() < 1e-6);
    assert!(solution.value(y).abs() < 1e-6);
    assert!((solution.eval(&objective) - 2.0).abs() < 1e-6);
    assert!((solution.eval(&sum) - 2.0).abs() < 1e-6);
}

#[test]
fn binary_variables_round_to_integers() {
    let mut model = Model::new();
    let x = model.add_var("x", VarKind::Binary, 0.0, 1.0);
    model.add_constraint(LinExpr::variable(x), Cmp::Ge, 0.5);
    model.set_objective(LinExpr::variable(x), Sense::Minimize);

    let solution = model.optimize().unwrap();
    assert!((solution.value(x) - 1.0).abs() < 1e-6);
}

#[test]
fn infeasible_models_are_an_explicit_error() {
    let mut model = Model::new();
    let x = model.add_var("x", VarKind::Continuous, 0.0, f64::INFINITY);
    model.add_constraint(LinExpr::variable(x), Cmp::Ge, 2.0);
    model.add_constraint(LinExpr::variable(x), Cmp::Le, 1.0);
    model.set_objective(LinExpr::variable(x), Sense::Minimize);

    assert!(matches!(model.optimize(), Err(SolverError::Infeasible)));
}

#[test]
fn constant_rows_are_recorded_but_not_forwarded() {
    let mut model = Model::new();
    let x = model.add_var("x", VarKind::Continuous, 0.0, 10.0);
    // A variable-free row, even a violated one, must not poison the solve.
    model.add_constraint(LinExpr::constant(1.0), Cmp::Le, 0.0);
    model.add_constraint(LinExpr::variable(x), Cmp::Ge, 3.0);
    model.set_objective(LinExpr::variable(x), Sense::Minimize);

    assert_eq!(model.constraints().len(), 2);
    let solution = model.optimize().unwrap();
    assert!((solution.value(x) - 3.0).abs() < 1e-6);
}

#[test]
fn maximization_respects_upper_bounds() {
    let mut model = Model::new();
    let x = model.add_var("x", VarKind::Continuous, 0.0, 7.0);
    model.set_objective(LinExpr::variable(x), Sense::Maximize);
    let solution = model.optimize().unwrap();
    assert!((solution.value(x) - 7.0).abs() < 1e-6);
}

#[test]
fn expression_arithmetic() {
    let mut model = Model::new();
    let x = model.add_var("x", VarKind::Continuous, 0.0, 1.0);
    let y = model.add_var("y", VarKind::Continuous, 0.0, 1.0);

    let mut expr = LinExpr::term(x, 2.0);
    expr.add_constant(1.0);
    expr.add_scaled(&LinExpr::variable(y), 3.0);
    let doubled = expr.scaled(2.0);
    let diff = doubled.minus(&expr);

    let value = diff.eval_with(|v| if v == x { 0.5 } else { 1.0 });
    // diff == expr, i.e. 2*0.5 + 3*1 + 1.
    assert!((value - 5.0).abs() < 1e-12);
    assert!(!diff.is_constant());
    assert!(LinExpr::constant(4.0).is_constant());
}
