//! Discretized optimal-velocity profile engine.
//!
//! The continuous optimal-control problem is discretized into a layered
//! directed graph of (segment-boundary, velocity-sample) states. Each edge
//! assumes constant acceleration across one segment and carries a binary
//! decision variable; a unit of flow from origin to destination selects one
//! velocity profile. The solver minimises traction work plus heavy penalties
//! on missing the travel-time window.

pub mod engine;
pub mod export;
pub mod graph;
pub mod work;

pub use engine::{ProfileEngine, ProfileRequest, SegmentRecord, TrajectoryNode, TrajectoryPlan};
pub use export::MotionSample;
pub use graph::{DecisionGraph, Edge, ForceLaw, Node, NodeId};
pub use work::{ZERO_THRESHOLD, traction_work};

use thiserror::Error;

/// Failures surfaced by the profile engine.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The requested trajectory is physically unreachable (insufficient
    /// traction, impossible boundary velocity, empty decision graph). An
    /// expected outcome, not a defect.
    #[error("no feasible trajectory: {0}")]
    InfeasibleTrajectory(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Solver(rail_solver::SolverError),
}
