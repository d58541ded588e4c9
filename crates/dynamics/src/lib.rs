//! Piecewise-linearized trajectory engine.
//!
//! A higher-fidelity reformulation of the optimal-trajectory problem: the
//! train's nonlinear dynamics are rewritten over the kinetic-energy/time
//! state `X_k = (E_k, t_k)` and linearized through per-segment
//! piecewise-affine approximations of the velocity-dependent term, selected
//! by binary variables. The result is an exact mixed-integer-linear encoding
//! of `X_{k+1} = f(X_k, u_k)` rather than the sampling approximation of the
//! profile engine.

pub mod coefficients;
pub mod engine;
pub mod table;

pub use coefficients::Coefficients;
pub use engine::{LinearizedEngine, LinearizedRequest, LinearizedSolution};
pub use table::PiecewiseTable;

use thiserror::Error;

/// Failures surfaced by the linearized engine.
#[derive(Debug, Error)]
pub enum DynamicsError {
    /// The constraint system admits no trajectory. An expected outcome for
    /// physically unreachable requests, not a defect.
    #[error("no feasible trajectory: {0}")]
    InfeasibleTrajectory(String),
    #[error("no linearization table entry for speed limit {0} m/s")]
    MissingSpeedLimit(f64),
    #[error("linearization table entries must have exactly {expected} pieces, got {got}")]
    TableShape { expected: usize, got: usize },
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Math(#[from] rail_math::MathError),
    #[error(transparent)]
    Solver(rail_solver::SolverError),
}
