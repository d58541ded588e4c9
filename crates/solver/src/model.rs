//! Model assembly and the `good_lp` backend bridge.

use good_lp::{
    Expression, ProblemVariables, ResolutionError, Solution as _, SolverModel, Variable, constraint,
    microlp, variable,
};

use crate::{LinExpr, SolverError, VarId};

/// Kind of a decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Continuous,
    Binary,
}

/// Objective sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Minimize,
    Maximize,
}

/// Comparison operator of a linear constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmp {
    Le,
    Eq,
    Ge,
}

/// Reported quality of a returned solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Proven optimal.
    Optimal,
    /// Feasible but not proven optimal.
    Feasible,
}

/// A registered decision variable.
#[derive(Debug, Clone)]
pub struct VariableDef {
    pub name: String,
    pub kind: VarKind,
    pub lower: f64,
    pub upper: f64,
}

/// A registered linear constraint `expr cmp rhs`.
#[derive(Debug, Clone)]
pub struct ConstraintDef {
    pub expr: LinExpr,
    pub cmp: Cmp,
    pub rhs: f64,
}

/// A mixed-integer linear model under construction.
///
/// One engine instance owns one `Model`; nothing is shared across solves.
#[derive(Debug, Default)]
pub struct Model {
    variables: Vec<VariableDef>,
    constraints: Vec<ConstraintDef>,
    objective: LinExpr,
    sense: Option<Sense>,
}

impl Model {
    pub fn new() -> Self {
        Model::default()
    }

    /// Register a decision variable and return its handle.
    ///
    /// Pass `f64::NEG_INFINITY` / `f64::INFINITY` for unbounded sides.
    /// Binary variables ignore the supplied bounds.
    pub fn add_var(&mut self, name: impl Into<String>, kind: VarKind, lower: f64, upper: f64) -> VarId {
        let id = VarId(self.variables.len());
        self.variables.push(VariableDef {
            name: name.into(),
            kind,
            lower,
            upper,
        });
        id
    }

    /// Register `expr cmp rhs`.
    ///
    /// Rows without any variable term are recorded for introspection but
    /// never forwarded to the backend; the upstream model builder drops
    /// constant rows the same way.
    pub fn add_constraint(&mut self, expr: LinExpr, cmp: Cmp, rhs: f64) {
        self.constraints.push(ConstraintDef { expr, cmp, rhs });
    }

    /// Set the linear objective.
    pub fn set_objective(&mut self, expr: LinExpr, sense: Sense) {
        self.objective = expr;
        self.sense = Some(sense);
    }

    /// Registered variables, in registration order.
    pub fn variables(&self) -> &[VariableDef] {
        &self.variables
    }

    /// Registered constraints, in registration order.
    pub fn constraints(&self) -> &[ConstraintDef] {
        &self.constraints
    }

    /// Solve the model through the backend. Blocks until the backend
    /// returns; infeasibility is an explicit error, not a panic.
    pub fn optimize(&self) -> Result<Solution, SolverError> {
        let mut problem = ProblemVariables::new();
        let handles: Vec<Variable> = self
            .variables
            .iter()
            .map(|def| {
                let mut builder = variable().name(&def.name);
                match def.kind {
                    VarKind::Binary => builder = builder.binary(),
                    VarKind::Continuous => {
                        if def.lower.is_finite() {
                            builder = builder.min(def.lower);
                        }
                        if def.upper.is_finite() {
                            builder = builder.max(def.upper);
                        }
                    }
                }
                problem.add(builder)
            })
            .collect();

        let objective = to_expression(&self.objective, &handles);
        let mut solver = match self.sense.unwrap_or(Sense::Minimize) {
            Sense::Minimize => problem.minimise(objective).using(microlp),
            Sense::Maximize => problem.maximise(objective).using(microlp),
        };

        for def in &self.constraints {
            if def.expr.is_constant() {
                continue;
            }
            let lhs = to_expression(&def.expr, &handles);
            let rhs = Expression::from_other_affine(def.rhs);
            let cons = match def.cmp {
                Cmp::Le => constraint::leq(lhs, rhs),
                Cmp::Eq => constraint::eq(lhs, rhs),
                Cmp::Ge => constraint::geq(lhs, rhs),
            };
            solver = solver.with(cons);
        }

        let solved = solver.solve().map_err(|err| match err {
            ResolutionError::Infeasible => SolverError::Infeasible,
            ResolutionError::Unbounded => SolverError::Unbounded,
            other => SolverError::Backend(other.to_string()),
        })?;

        let values = handles.iter().map(|v| solved.value(*v)).collect();
        Ok(Solution {
            status: SolveStatus::Optimal,
            values,
        })
    }
}

/// Variable values extracted from a successful solve.
#[derive(Debug, Clone)]
pub struct Solution {
    pub status: SolveStatus,
    values: Vec<f64>,
}

impl Solution {
    /// Value of `var` in the solution.
    pub fn value(&self, var: VarId) -> f64 {
        self.values[var.index()]
    }

    /// Evaluate a linear expression under the solution.
    pub fn eval(&self, expr: &LinExpr) -> f64 {
        expr.eval_with(|v| self.value(v))
    }
}

fn to_expression(expr: &LinExpr, handles: &[Variable]) -> Expression {
    let mut out = Expression::from_other_affine(expr.constant_part());
    for (var, coeff) in expr.terms() {
        out += *coeff * handles[var.index()];
    }
    out
}
