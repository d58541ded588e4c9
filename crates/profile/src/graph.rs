//! Layered decision graph over (segment-boundary, velocity-sample) states.

use std::collections::{HashMap, VecDeque};

use rail_model::{Track, Train};
use rail_solver::{Cmp, LinExpr, Model, Sense, VarId, VarKind};

use crate::work::{ZERO_THRESHOLD, traction_work};

/// Weight of the soft time-window slack variables in the objective.
pub const PUNCTUALITY_FACTOR: f64 = 1e5;
/// Traction-work terms are divided by this before entering the objective to
/// keep the coefficients comparable with the slack penalties.
pub const WORK_SCALE: f64 = 1e5;

/// Key of a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeId {
    /// Sentinel supplying one unit of flow at the first boundary.
    Origin,
    /// Sentinel demanding one unit of flow past the last boundary.
    Destination,
    /// Candidate velocity `sample` at segment boundary `boundary`.
    State { boundary: usize, sample: usize },
}

impl NodeId {
    fn label(&self) -> String {
        match self {
            NodeId::Origin => "origin".to_string(),
            NodeId::Destination => "destination".to_string(),
            NodeId::State { boundary, sample } => format!("{boundary}.{sample}"),
        }
    }
}

/// One graph node: a candidate velocity at a segment boundary.
#[derive(Debug)]
pub struct Node {
    pub velocity_m_s: f64,
    /// Segment-boundary index; 0 is the start of the first segment and
    /// `track.len()` lies past the last segment.
    pub boundary: usize,
    /// Unit flow injected here (1 for the origin).
    pub supply: f64,
    /// Unit flow absorbed here (1 for the destination).
    pub demand: f64,
    pub visited: bool,
    /// Indices into the edge arena.
    pub incoming: Vec<usize>,
    pub outgoing: Vec<usize>,
}

/// Force as a function of velocity: `F(v) = constant + quadratic·v²`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceLaw {
    pub constant_n: f64,
    pub quadratic: f64,
}

impl ForceLaw {
    /// Force (N) at `velocity`.
    #[inline]
    pub fn eval(&self, velocity: f64) -> f64 {
        self.constant_n + self.quadratic * velocity * velocity
    }
}

/// One feasible constant-acceleration transition across a segment.
#[derive(Debug)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    /// Binary decision variable: 1 when the edge lies on the chosen path.
    pub var: VarId,
    pub timespan_s: f64,
    /// Traction work divided by [`WORK_SCALE`].
    pub work_scaled: f64,
    pub jerk: f64,
    pub force: ForceLaw,
    pub acceleration_m_s2: f64,
}

/// The layered decision graph plus the flow/time expressions accumulated
/// while registering it against a [`Model`].
pub struct DecisionGraph<'a> {
    train: &'a Train,
    track: &'a Track,
    end_velocity: f64,
    approximation: usize,
    nodes: HashMap<NodeId, Node>,
    edges: Vec<Edge>,
    total_time: LinExpr,
    objective: LinExpr,
    early_slack: VarId,
    late_slack: VarId,
}

impl<'a> DecisionGraph<'a> {
    /// Build the graph breadth-first from the origin, registering one binary
    /// variable per transition, one flow-conservation row per node, the soft
    /// time-window rows, and the minimised objective.
    pub fn build(
        train: &'a Train,
        track: &'a Track,
        start_velocity: f64,
        end_velocity: f64,
        approximation: usize,
        window: (f64, f64),
        model: &mut Model,
    ) -> Self {
        let early_slack = model.add_var("s", VarKind::Continuous, 0.0, f64::INFINITY);
        let late_slack = model.add_var("S", VarKind::Continuous, 0.0, f64::INFINITY);
        let mut objective = LinExpr::zero();
        objective.add_term(early_slack, PUNCTUALITY_FACTOR);
        objective.add_term(late_slack, PUNCTUALITY_FACTOR);

        let mut graph = DecisionGraph {
            train,
            track,
            end_velocity,
            approximation,
            nodes: HashMap::new(),
            edges: Vec::new(),
            total_time: LinExpr::zero(),
            objective,
            early_slack,
            late_slack,
        };
        graph.nodes.insert(
            NodeId::Origin,
            Node {
                velocity_m_s: start_velocity,
                boundary: 0,
                supply: 1.0,
                demand: 0.0,
                visited: false,
                incoming: Vec::new(),
                outgoing: Vec::new(),
            },
        );
        graph.nodes.insert(
            NodeId::Destination,
            Node {
                velocity_m_s: end_velocity,
                boundary: track.len(),
                supply: 0.0,
                demand: 1.0,
                visited: false,
                incoming: Vec::new(),
                outgoing: Vec::new(),
            },
        );

        let mut pending = VecDeque::new();
        pending.push_back(NodeId::Origin);
        while let Some(id) = pending.pop_front() {
            for next in graph.expand(model, id) {
                pending.push_back(next);
            }
        }

        // Soft travel-time window: A - s <= total_time <= B + S.
        let mut lower = graph.total_time.clone();
        lower.add_term(early_slack, 1.0);
        model.add_constraint(lower, Cmp::Ge, window.0);
        let mut upper = graph.total_time.clone();
        upper.add_term(late_slack, -1.0);
        model.add_constraint(upper, Cmp::Le, window.1);

        model.set_objective(graph.objective.clone(), Sense::Minimize);
        graph
    }

    /// Expand one node: enumerate feasible transitions into the next
    /// boundary, register their edges, and emit the node's
    /// flow-conservation row. Expanding an already-visited node is a no-op
    /// and returns nothing, so idempotent re-queueing cannot alter the
    /// graph.
    pub fn expand(&mut self, model: &mut Model, id: NodeId) -> Vec<NodeId> {
        let (boundary, velocity, supply, demand, incoming) = {
            let Some(node) = self.nodes.get(&id) else {
                return Vec::new();
            };
            if node.visited {
                return Vec::new();
            }
            (
                node.boundary,
                node.velocity_m_s,
                node.supply,
                node.demand,
                node.incoming.clone(),
            )
        };

        // All predecessors live in earlier layers and are already expanded,
        // so the incoming edge set is complete by the time we get here.
        let mut inflow = LinExpr::constant(supply);
        for edge_index in incoming {
            inflow.add_term(self.edges[edge_index].var, 1.0);
        }
        let mut outflow = LinExpr::constant(demand);

        let mut enqueued = Vec::new();
        let mut outgoing = Vec::new();
        if boundary < self.track.len() {
            let segment = *self.track.segment(boundary);
            let ds = segment.length_m;
            let last_boundary = boundary == self.track.len() - 1;

            // Binding speed interval for the next boundary: the tighter of
            // the current and next segment's limits; the final boundary is
            // pinned to the required end velocity.
            let (lo, hi) = if last_boundary {
                (self.end_velocity, self.end_velocity)
            } else {
                let next_limit = self.track.segment(boundary + 1).max_speed_m_s;
                (
                    segment.min_speed_m_s,
                    segment.max_speed_m_s.min(next_limit),
                )
            };

            let c1 = self.train.resistance(&segment, 0.0);
            let c2 = self.train.resistance(&segment, 1.0) - c1;
            let effective_mass = self.train.effective_mass_kg();

            let count = if (hi - lo).abs() > ZERO_THRESHOLD {
                self.approximation
            } else {
                1
            };
            for sample in 0..count {
                let next_velocity = if count == 1 {
                    lo
                } else {
                    lo + (hi - lo) * sample as f64 / (count - 1) as f64
                };
                if velocity + next_velocity < ZERO_THRESHOLD {
                    continue;
                }
                let dt = 2.0 * ds / (velocity + next_velocity);
                let accel = (next_velocity - velocity) / dt;

                // Required force at entry (traction side) and at exit
                // (brake side); transitions beyond the train's capability
                // are excluded.
                let traction_needed = effective_mass * accel + c1 + c2 * velocity * velocity;
                let brake_needed =
                    effective_mass * accel + c1 + c2 * next_velocity * next_velocity;
                if traction_needed > self.train.max_traction_n
                    || brake_needed.abs() > self.train.max_brake_n()
                {
                    continue;
                }

                let force = ForceLaw {
                    constant_n: effective_mass * accel + c1,
                    quadratic: c2,
                };
                let work_scaled =
                    traction_work(effective_mass, c1, c2, accel, velocity, dt) / WORK_SCALE;
                let jerk = 2.0 * c2 * accel.abs() * ds;

                let next_id = if last_boundary {
                    NodeId::Destination
                } else {
                    NodeId::State {
                        boundary: boundary + 1,
                        sample,
                    }
                };
                let var = model.add_var(
                    format!("{}-{}", id.label(), next_id.label()),
                    VarKind::Binary,
                    0.0,
                    1.0,
                );
                let edge_index = self.edges.len();
                self.edges.push(Edge {
                    from: id,
                    to: next_id,
                    var,
                    timespan_s: dt,
                    work_scaled,
                    jerk,
                    force,
                    acceleration_m_s2: accel,
                });
                outgoing.push(edge_index);
                self.nodes
                    .entry(next_id)
                    .or_insert_with(|| Node {
                        velocity_m_s: next_velocity,
                        boundary: boundary + 1,
                        supply: 0.0,
                        demand: 0.0,
                        visited: false,
                        incoming: Vec::new(),
                        outgoing: Vec::new(),
                    })
                    .incoming
                    .push(edge_index);

                self.total_time.add_term(var, dt);
                outflow.add_term(var, 1.0);
                self.objective.add_term(var, work_scaled);
                enqueued.push(next_id);
            }
        }

        if let Some(node) = self.nodes.get_mut(&id) {
            node.visited = true;
            node.outgoing.extend(outgoing);
        }
        model.add_constraint(outflow.minus(&inflow), Cmp::Eq, 0.0);
        enqueued
    }

    /// All registered edges, in creation order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Node lookup.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Number of nodes, sentinels included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Total-elapsed-time expression over the edge variables.
    pub fn total_time_expr(&self) -> &LinExpr {
        &self.total_time
    }

    /// Soft time-window slack handles `(early, late)`.
    pub fn slack_vars(&self) -> (VarId, VarId) {
        (self.early_slack, self.late_slack)
    }
}
