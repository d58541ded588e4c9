//! Energy- and time-optimal train trajectory optimization.
//!
//! The workspace splits into small crates re-exported here:
//!
//! - [`core`]: physical constants and unit helpers.
//! - [`math`]: dense matrices and validated piecewise-affine functions.
//! - [`model`]: track geometry, train constants, and resistance forces.
//! - [`solver`]: mixed-integer linear model assembly over a MILP backend.
//! - [`config`]: YAML/TOML loading of tracks and trains.
//! - [`profile`]: the discretized speed-profile engine and its sampler.
//! - [`dynamics`]: the piecewise-linearized kinetic-energy/time engine.
//!
//! A typical session loads a [`model::Track`] and [`model::Train`] through
//! [`config`], runs [`profile::ProfileEngine::optimal_profile`] for a
//! velocity profile, and samples the resulting plan at a fixed timestep for
//! downstream consumers.

pub use rail_config as config;
pub use rail_core as core;
pub use rail_dynamics as dynamics;
pub use rail_math as math;
pub use rail_model as model;
pub use rail_profile as profile;
pub use rail_solver as solver;

use thiserror::Error;

/// Any failure a planning session can surface, across all layers.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] rail_config::ConfigError),
    #[error(transparent)]
    Model(#[from] rail_model::ModelError),
    #[error(transparent)]
    Math(#[from] rail_math::MathError),
    #[error(transparent)]
    Solver(#[from] rail_solver::SolverError),
    #[error(transparent)]
    Profile(#[from] rail_profile::ProfileError),
    #[error(transparent)]
    Dynamics(#[from] rail_dynamics::DynamicsError),
}
