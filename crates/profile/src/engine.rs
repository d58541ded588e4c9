//! Profile-engine orchestration: request validation, graph construction,
//! solve, and unit-flow path extraction.

use rail_model::{Track, Train};
use rail_solver::{Model, SolverError};

use crate::ProfileError;
use crate::graph::{DecisionGraph, ForceLaw, WORK_SCALE};

/// Inputs of one profile computation.
#[derive(Debug, Clone)]
pub struct ProfileRequest {
    /// Travel-time window `(A, B)` in seconds; enforced softly.
    pub timespan_s: (f64, f64),
    /// Velocity at the first boundary; the train's current velocity when
    /// unset.
    pub start_velocity_m_s: Option<f64>,
    /// Required velocity at the last boundary.
    pub end_velocity_m_s: f64,
    /// Number of velocity samples per boundary. Higher is more precise and
    /// more expensive.
    pub approximation: usize,
}

impl ProfileRequest {
    pub fn new(timespan_s: (f64, f64)) -> Self {
        ProfileRequest {
            timespan_s,
            start_velocity_m_s: None,
            end_velocity_m_s: 0.0,
            approximation: 20,
        }
    }
}

/// One boundary of the computed trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryNode {
    pub time_s: f64,
    pub velocity_m_s: f64,
}

/// Per-segment physics of the computed trajectory.
#[derive(Debug, Clone, Copy)]
pub struct SegmentRecord {
    pub timespan_s: f64,
    /// Traction work over the segment (J), unscaled.
    pub work_j: f64,
    pub jerk: f64,
    pub force: ForceLaw,
    pub acceleration_m_s2: f64,
}

/// An ordered trajectory: N+1 boundary nodes and N segment records.
#[derive(Debug, Clone)]
pub struct TrajectoryPlan {
    pub nodes: Vec<TrajectoryNode>,
    pub segments: Vec<SegmentRecord>,
}

impl TrajectoryPlan {
    /// Total elapsed time (s).
    pub fn total_time_s(&self) -> f64 {
        self.nodes.last().map(|n| n.time_s).unwrap_or(0.0)
    }

    /// Total traction work (J).
    pub fn total_work_j(&self) -> f64 {
        self.segments.iter().map(|s| s.work_j).sum()
    }

    /// Total jerk surrogate.
    pub fn total_jerk(&self) -> f64 {
        self.segments.iter().map(|s| s.jerk).sum()
    }
}

/// Computes energy-optimal velocity profiles for one train on one track.
pub struct ProfileEngine<'a> {
    train: &'a Train,
    track: &'a Track,
}

impl<'a> ProfileEngine<'a> {
    pub fn new(train: &'a Train, track: &'a Track) -> Self {
        ProfileEngine { train, track }
    }

    /// Compute the optimal piecewise-constant-acceleration trajectory.
    ///
    /// The train must traverse the track within the request's time window;
    /// when that is physically impossible the engine minimises the window
    /// miss instead (soft slack). Physical unreachability (insufficient
    /// traction on a climb, impossible boundary velocity) surfaces as
    /// [`ProfileError::InfeasibleTrajectory`].
    pub fn optimal_profile(
        &self,
        request: &ProfileRequest,
    ) -> Result<TrajectoryPlan, ProfileError> {
        let (window_start, window_end) = request.timespan_s;
        if !(window_start <= window_end) {
            return Err(ProfileError::InvalidRequest(format!(
                "time window ({window_start}, {window_end}) is inverted"
            )));
        }
        if request.approximation < 2 {
            return Err(ProfileError::InvalidRequest(
                "approximation must be at least 2".to_string(),
            ));
        }
        let start_velocity = request
            .start_velocity_m_s
            .unwrap_or(self.train.velocity_m_s);

        // A required end velocity above the binding limit of the final
        // segment can never be met by a legal trajectory.
        let final_limit = self.track.segment(self.track.len() - 1).max_speed_m_s;
        if request.end_velocity_m_s > final_limit {
            return Err(ProfileError::InfeasibleTrajectory(format!(
                "end velocity {} exceeds the final segment's speed limit {}",
                request.end_velocity_m_s, final_limit
            )));
        }

        let mut model = Model::new();
        let graph = DecisionGraph::build(
            self.train,
            self.track,
            start_velocity,
            request.end_velocity_m_s,
            request.approximation,
            request.timespan_s,
            &mut model,
        );

        let solution = match model.optimize() {
            Ok(solution) => solution,
            Err(SolverError::Infeasible) => {
                return Err(ProfileError::InfeasibleTrajectory(
                    "the decision graph admits no unit flow within the train's force limits"
                        .to_string(),
                ));
            }
            Err(err) => return Err(ProfileError::Solver(err)),
        };

        // Trace the unit flow in increasing boundary order.
        let mut chosen: Vec<&crate::graph::Edge> = graph
            .edges()
            .iter()
            .filter(|edge| solution.value(edge.var) > 0.5)
            .collect();
        chosen.sort_by_key(|edge| {
            graph
                .node(edge.from)
                .map(|node| node.boundary)
                .unwrap_or(usize::MAX)
        });
        if chosen.len() != self.track.len() {
            return Err(ProfileError::InfeasibleTrajectory(format!(
                "solver selected {} of {} segment transitions",
                chosen.len(),
                self.track.len()
            )));
        }

        let mut nodes = Vec::with_capacity(self.track.len() + 1);
        let mut segments = Vec::with_capacity(self.track.len());
        let mut time = 0.0;
        nodes.push(TrajectoryNode {
            time_s: 0.0,
            velocity_m_s: start_velocity,
        });
        for edge in chosen {
            time += edge.timespan_s;
            let velocity = graph
                .node(edge.to)
                .map(|node| node.velocity_m_s)
                .unwrap_or(request.end_velocity_m_s);
            nodes.push(TrajectoryNode {
                time_s: time,
                velocity_m_s: velocity,
            });
            segments.push(SegmentRecord {
                timespan_s: edge.timespan_s,
                work_j: edge.work_scaled * WORK_SCALE,
                jerk: edge.jerk,
                force: edge.force,
                acceleration_m_s2: edge.acceleration_m_s2,
            });
        }

        Ok(TrajectoryPlan { nodes, segments })
    }
}
