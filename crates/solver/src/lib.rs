//! Mixed-integer model-builder facade.
//!
//! The trajectory engines register variables and linear constraints against
//! a [`Model`], set a linear objective, and call [`Model::optimize`]; the
//! actual solve is delegated to an external backend (`good_lp` with the
//! pure-Rust `microlp` solver). The backend is an opaque, blocking
//! collaborator: a solve either returns a [`Solution`] or an explicit
//! [`SolverError`].

pub mod expr;
pub mod model;

pub use expr::{LinExpr, VarId};
pub use model::{Cmp, Model, Sense, SolveStatus, Solution, VarKind};

use thiserror::Error;

/// Failures surfaced by the optimisation backend.
#[derive(Debug, Error)]
pub enum SolverError {
    /// The constraint system admits no solution. An expected outcome for
    /// physically unreachable trajectories, not a defect.
    #[error("model is infeasible")]
    Infeasible,
    #[error("model is unbounded")]
    Unbounded,
    #[error("solver backend failed: {0}")]
    Backend(String),
}
