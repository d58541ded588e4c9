//! Mixed-integer assembly and solve of the linearized trajectory problem.
//!
//! The decision variables are, per segment `k`, the constant traction force
//! `u_k`, and per boundary `k`, a 3-vector of piece-selector binaries `d_k`
//! with a continuous 3-vector `z_k` linearizing the products
//! `E_k * d_k`. The kinetic-energy/time state
//! `X_k` is never a variable: it is carried forward symbolically through the
//! affine recurrence, so the model stays small and exactly consistent.

use rail_core::energy::{kinetic_energy, velocity_from_energy};
use rail_math::Piecewise;
use rail_model::{Track, Train};
use rail_solver::{Cmp, LinExpr, Model, Sense, SolverError, VarId, VarKind};

use crate::coefficients::Coefficients;
use crate::table::PiecewiseTable;
use crate::DynamicsError;

/// Kinetic-energy floor (m²/s²). Boundaries at or below it count as
/// standstill and use the dedicated start/end table entries.
pub const MIN_KINETIC_ENERGY: f64 = 0.1;

/// Default weight of the arrival-delay term in the objective.
pub const PUNCTUALITY_WEIGHT: f64 = 1e5;

/// Default weight of the traction-smoothness term in the objective.
pub const SMOOTHNESS_WEIGHT: f64 = 1.0;

/// One trajectory query against a fixed train and track.
#[derive(Debug, Clone)]
pub struct LinearizedRequest {
    /// Scheduled running time (s); arriving later is charged through the
    /// delay term, arriving earlier is forbidden.
    pub timespan_s: f64,
    /// Departure clock time (s).
    pub start_time_s: f64,
    pub start_velocity_m_s: f64,
    pub end_velocity_m_s: f64,
    pub smoothness_weight: f64,
    pub punctuality_weight: f64,
}

impl LinearizedRequest {
    /// A request departing at rest at time zero and arriving at rest, with
    /// the default objective weights.
    pub fn new(timespan_s: f64) -> Self {
        LinearizedRequest {
            timespan_s,
            start_time_s: 0.0,
            start_velocity_m_s: 0.0,
            end_velocity_m_s: 0.0,
            smoothness_weight: SMOOTHNESS_WEIGHT,
            punctuality_weight: PUNCTUALITY_WEIGHT,
        }
    }
}

/// Solved trajectory in the kinetic-energy/time state space. Vectors indexed
/// by boundary hold `track.len() + 1` entries; vectors indexed by segment
/// hold `track.len()`.
#[derive(Debug, Clone)]
pub struct LinearizedSolution {
    /// Piece-selector binaries per boundary.
    pub piece_selectors: Vec<[f64; 3]>,
    /// Linearized `E_k * d_k` products per boundary.
    pub slacks: Vec<[f64; 3]>,
    /// Constant traction (positive) or braking (negative) force per
    /// segment (N).
    pub traction_n: Vec<f64>,
    /// Absolute force change between consecutive segments (N).
    pub smoothness: Vec<f64>,
    /// Arrival delay past the scheduled time (s).
    pub delay_s: f64,
    /// Kinetic energy per boundary (m²/s²).
    pub kinetic_energy: Vec<f64>,
    /// Clock time per boundary (s).
    pub time_s: Vec<f64>,
    /// Velocity per boundary (m/s).
    pub velocity_m_s: Vec<f64>,
}

impl LinearizedSolution {
    /// Total running time, departure to arrival (s).
    pub fn total_time_s(&self) -> f64 {
        match (self.time_s.first(), self.time_s.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }
}

/// Trajectory engine over the piecewise-linearized train dynamics.
pub struct LinearizedEngine<'a> {
    train: &'a Train,
    track: &'a Track,
    table: PiecewiseTable,
}

impl<'a> LinearizedEngine<'a> {
    /// Bind an engine to one train, track, and linearization table. Every
    /// speed limit on the track must have a table entry.
    pub fn new(
        train: &'a Train,
        track: &'a Track,
        table: PiecewiseTable,
    ) -> Result<Self, DynamicsError> {
        table.validate_for(track)?;
        Ok(LinearizedEngine {
            train,
            track,
            table,
        })
    }

    /// Solve one request to optimality.
    pub fn solve(&self, request: &LinearizedRequest) -> Result<LinearizedSolution, DynamicsError> {
        if !(request.timespan_s > 0.0) {
            return Err(DynamicsError::InvalidRequest(format!(
                "timespan must be positive, got {}",
                request.timespan_s
            )));
        }
        let n = self.track.len();
        let last_limit = self.track.segment(n - 1).max_speed_m_s;
        if request.end_velocity_m_s > last_limit {
            return Err(DynamicsError::InfeasibleTrajectory(format!(
                "end velocity {} m/s exceeds the final speed limit {} m/s",
                request.end_velocity_m_s, last_limit
            )));
        }

        let e_start = boundary_energy(request.start_velocity_m_s);
        let e_end = boundary_energy(request.end_velocity_m_s);
        let pieces = self.resolve_pieces(n, e_start, e_end)?;
        let coefficients = Coefficients::build(self.train, self.track, &pieces)?;

        let mut model = Model::new();
        let mut d: Vec<[VarId; 3]> = Vec::with_capacity(n);
        let mut z: Vec<[VarId; 3]> = Vec::with_capacity(n);
        for k in 0..n {
            d.push([0, 1, 2].map(|i| {
                model.add_var(format!("d_{k}_{i}"), VarKind::Binary, 0.0, 1.0)
            }));
            z.push([0, 1, 2].map(|i| {
                model.add_var(
                    format!("z_{k}_{i}"),
                    VarKind::Continuous,
                    f64::NEG_INFINITY,
                    f64::INFINITY,
                )
            }));
        }
        let u: Vec<VarId> = (0..n)
            .map(|k| {
                model.add_var(
                    format!("u_{k}"),
                    VarKind::Continuous,
                    -self.train.max_brake_n(),
                    self.train.max_traction_n,
                )
            })
            .collect();
        let w: Vec<VarId> = (0..n.saturating_sub(1))
            .map(|k| model.add_var(format!("w_{k}"), VarKind::Continuous, 0.0, f64::INFINITY))
            .collect();
        let delay = model.add_var("delay", VarKind::Continuous, 0.0, f64::INFINITY);

        // Carry the state forward; the last step is kept partial, without
        // the exit-boundary correction terms, and pinned by the end
        // conditions instead of a selector system of its own.
        let mut state: Vec<[LinExpr; 2]> = Vec::with_capacity(n);
        state.push([
            LinExpr::constant(e_start),
            LinExpr::constant(request.start_time_s),
        ]);
        for k in 0..n - 1 {
            let next = next_state(&coefficients, k, &state[k], &d, &z, &u, true);
            state.push(next);
        }
        let arrival = next_state(&coefficients, n - 1, &state[n - 1], &d, &z, &u, false);

        // Selector system: R1·d + R3·z + R5·u + R6·X <= R7, row-wise, at
        // every boundary that carries selectors.
        for k in 0..n {
            let r1 = &coefficients.r1[k];
            let r7 = &coefficients.r7[k];
            for row in 0..r1.rows() {
                let mut expr = LinExpr::zero();
                for j in 0..3 {
                    expr.add_term(d[k][j], r1.get(row, j));
                    expr.add_term(z[k][j], coefficients.r3.get(row, j));
                }
                expr.add_term(u[k], coefficients.r5.get(row, 0));
                for j in 0..2 {
                    expr.add_scaled(&state[k][j], coefficients.r6.get(row, j));
                }
                model.add_constraint(expr, Cmp::Le, r7.get(row, 0));
            }
        }

        // End conditions: exact arrival energy, no early arrival, and the
        // delay variable measuring lateness.
        let scheduled_arrival = request.start_time_s + request.timespan_s;
        model.add_constraint(arrival[0].clone(), Cmp::Eq, e_end);
        model.add_constraint(arrival[1].clone(), Cmp::Ge, scheduled_arrival);
        let mut late = arrival[1].clone();
        late.add_term(delay, -1.0);
        model.add_constraint(late, Cmp::Eq, scheduled_arrival);

        // Smoothness envelope |u_{k+1} - u_k| <= w_k.
        for k in 0..w.len() {
            let step = LinExpr::variable(u[k + 1]).minus(&LinExpr::variable(u[k]));
            let mut upper = step.clone();
            upper.add_term(w[k], -1.0);
            model.add_constraint(upper, Cmp::Le, 0.0);
            let mut lower = step.scaled(-1.0);
            lower.add_term(w[k], -1.0);
            model.add_constraint(lower, Cmp::Le, 0.0);
        }

        let mut objective = LinExpr::zero();
        for k in 0..n {
            objective.add_term(u[k], self.track.segment(k).length_m);
        }
        for &var in &w {
            objective.add_term(var, request.smoothness_weight);
        }
        objective.add_term(delay, request.punctuality_weight);
        model.set_objective(objective, Sense::Minimize);

        let solution = model.optimize().map_err(|err| match err {
            SolverError::Infeasible => DynamicsError::InfeasibleTrajectory(
                "the linearized constraint system admits no trajectory".into(),
            ),
            other => DynamicsError::Solver(other),
        })?;

        let mut kinetic_energy = Vec::with_capacity(n + 1);
        let mut time_s = Vec::with_capacity(n + 1);
        for boundary in state.iter().chain(std::iter::once(&arrival)) {
            kinetic_energy.push(solution.eval(&boundary[0]));
            time_s.push(solution.eval(&boundary[1]));
        }
        // Roundoff can push an energy slightly negative at standstill.
        let velocity_m_s = kinetic_energy
            .iter()
            .map(|&e| velocity_from_energy(e.max(0.0)))
            .collect();

        Ok(LinearizedSolution {
            piece_selectors: d
                .iter()
                .map(|vars| vars.map(|v| solution.value(v)))
                .collect(),
            slacks: z
                .iter()
                .map(|vars| vars.map(|v| solution.value(v)))
                .collect(),
            traction_n: u.iter().map(|&v| solution.value(v)).collect(),
            smoothness: w.iter().map(|&v| solution.value(v)).collect(),
            delay_s: solution.value(delay),
            kinetic_energy,
            time_s,
            velocity_m_s,
        })
    }

    /// Resolve the piecewise approximation for each of the `n + 1`
    /// boundaries: the dedicated entries for a standstill start or end, the
    /// speed-limit entry everywhere else. The final boundary falls under the
    /// last segment's limit.
    fn resolve_pieces(
        &self,
        n: usize,
        e_start: f64,
        e_end: f64,
    ) -> Result<Vec<Piecewise>, DynamicsError> {
        let mut pieces = Vec::with_capacity(n + 1);
        for k in 0..=n {
            if k == 0 && e_start <= MIN_KINETIC_ENERGY {
                pieces.push(self.table.init().clone());
                continue;
            }
            if k == n && e_end <= MIN_KINETIC_ENERGY {
                pieces.push(self.table.end().clone());
                continue;
            }
            let limit = self.track.segment(k.min(n - 1)).max_speed_m_s;
            let entry = self
                .table
                .for_limit(limit)
                .ok_or(DynamicsError::MissingSpeedLimit(limit))?;
            pieces.push(entry.clone());
        }
        Ok(pieces)
    }
}

/// Kinetic energy of a boundary velocity, floored at [`MIN_KINETIC_ENERGY`].
fn boundary_energy(velocity: f64) -> f64 {
    kinetic_energy(velocity).max(MIN_KINETIC_ENERGY)
}

/// The state one boundary downstream of `state`:
/// `A_k X_k + B_k u_k + C1_k d_k + D1_k z_k + e_k`, plus the exit-boundary
/// corrections `C2_k d_{k+1} + D2_k z_{k+1}` unless the step is the partial
/// final one.
fn next_state(
    coefficients: &Coefficients,
    k: usize,
    state: &[LinExpr; 2],
    d: &[[VarId; 3]],
    z: &[[VarId; 3]],
    u: &[VarId],
    with_exit: bool,
) -> [LinExpr; 2] {
    [0, 1].map(|i| {
        let mut out = LinExpr::zero();
        for j in 0..2 {
            out.add_scaled(&state[j], coefficients.a_mat[k].get(i, j));
        }
        out.add_term(u[k], coefficients.b_mat[k].get(i, 0));
        for j in 0..3 {
            out.add_term(d[k][j], coefficients.c1_mat[k].get(i, j));
            out.add_term(z[k][j], coefficients.d1_mat[k].get(i, j));
            if with_exit {
                out.add_term(d[k + 1][j], coefficients.c2_mat[k].get(i, j));
                out.add_term(z[k + 1][j], coefficients.d2_mat[k].get(i, j));
            }
        }
        out.add_constant(coefficients.e_vec[k].get(i, 0));
        out
    })
}
