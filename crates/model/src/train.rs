//! Train physical constants and resistance-force equations.
//!
//! The motion of the train follows Newton's law
//! `m·rho·dv/dt = u(t) − Rb(v) − Rline(x, v)` where `u` is the signed
//! traction (positive) or braking (negative) force, `Rb` the basic
//! resistance `m·(a + b·v²)`, and `Rline` the sum of slope, curve, and
//! tunnel resistance of the segment under the train.

use rail_core::constants::GRAVITY_ACCELERATION;

use crate::{ModelError, Segment};

/// Physical description of one train.
#[derive(Debug, Clone)]
pub struct Train {
    /// Mass (kg).
    pub mass_kg: f64,
    /// Rotating-mass factor; >= 1.
    pub mass_factor: f64,
    /// Current velocity (m/s), used when a resistance query passes no
    /// explicit velocity.
    pub velocity_m_s: f64,
    /// Maximum service brake force magnitude (N).
    max_brake_n: f64,
    /// Maximum traction force (N).
    pub max_traction_n: f64,
    /// Basic-resistance parameters `(a, b)` so `Rb(v) = m·(a + b·v²)`.
    pub basic_resistance: (f64, f64),
}

impl Train {
    /// Validate constants and build the train. `max_brake_n` is stored as a
    /// magnitude regardless of the sign supplied.
    pub fn new(
        mass_kg: f64,
        mass_factor: f64,
        velocity_m_s: f64,
        max_brake_n: f64,
        max_traction_n: f64,
        basic_resistance: (f64, f64),
    ) -> Result<Self, ModelError> {
        if !(mass_kg > 0.0) {
            return Err(ModelError::InvalidTrain(format!(
                "mass must be positive, got {mass_kg}"
            )));
        }
        if mass_factor < 1.0 {
            return Err(ModelError::InvalidTrain(format!(
                "mass factor must be >= 1, got {mass_factor}"
            )));
        }
        if velocity_m_s < 0.0 {
            return Err(ModelError::InvalidTrain(format!(
                "velocity must be non-negative, got {velocity_m_s}"
            )));
        }
        if !(max_traction_n > 0.0) {
            return Err(ModelError::InvalidTrain(format!(
                "max traction must be positive, got {max_traction_n}"
            )));
        }
        Ok(Train {
            mass_kg,
            mass_factor,
            velocity_m_s,
            max_brake_n: max_brake_n.abs(),
            max_traction_n,
            basic_resistance,
        })
    }

    /// Maximum service brake force magnitude (N).
    pub fn max_brake_n(&self) -> f64 {
        self.max_brake_n
    }

    /// Effective inertial mass `m·rho` (kg).
    pub fn effective_mass_kg(&self) -> f64 {
        self.mass_kg * self.mass_factor
    }

    /// Basic (rolling + aerodynamic) resistance at `velocity` (N).
    pub fn basic_resistance(&self, velocity: f64) -> f64 {
        let (a, b) = self.basic_resistance;
        self.mass_kg * (a + b * velocity * velocity)
    }

    /// Grade resistance over `segment` (N); negative downhill.
    pub fn slope_resistance(&self, segment: &Segment) -> f64 {
        self.mass_kg * GRAVITY_ACCELERATION * segment.slope_rad.sin()
    }

    /// Curve resistance over `segment` (N).
    ///
    /// Radii at or below 30 m are impassable and return `+inf`; the two
    /// empirical branches below/above 300 m are not continuous at the
    /// boundary, which matches the published coefficients.
    pub fn curve_resistance(&self, segment: &Segment) -> f64 {
        let radius = segment.bend_radius_m;
        if radius <= 30.0 {
            f64::INFINITY
        } else if radius < 300.0 {
            self.mass_kg * 4.91 / (radius - 30.0)
        } else {
            self.mass_kg * 6.3 / (radius - 55.0)
        }
    }

    /// Tunnel air resistance over `segment` at `velocity` (N); zero outside
    /// tunnels.
    pub fn tunnel_resistance(&self, segment: &Segment, velocity: f64) -> f64 {
        if !segment.tunnel {
            return 0.0;
        }
        1.296e-9 * segment.length_m * self.mass_kg * GRAVITY_ACCELERATION * velocity * velocity
    }

    /// Line resistance: slope + curve + tunnel (N).
    ///
    /// The curve term only applies to a moving train; a stationary wheelset
    /// exerts no flange friction, so it is omitted when `velocity == 0`.
    pub fn line_resistance(&self, segment: &Segment, velocity: f64) -> f64 {
        let curve = if velocity != 0.0 {
            self.curve_resistance(segment)
        } else {
            0.0
        };
        self.slope_resistance(segment) + curve + self.tunnel_resistance(segment, velocity)
    }

    /// Total resistance: basic + line (N).
    pub fn resistance(&self, segment: &Segment, velocity: f64) -> f64 {
        self.basic_resistance(velocity) + self.line_resistance(segment, velocity)
    }
}
