//! Core constants and shared primitives for the rail trajectory planner workspace.

/// Physical constants expressed in SI units.
pub mod constants {
    /// Standard gravity at Earth's surface (m/s²).
    pub const GRAVITY_ACCELERATION: f64 = 9.80665;
}

/// Kinetic-energy helpers.
///
/// The linearized trajectory engine integrates specific kinetic energy
/// `E = v²/2` instead of velocity, so conversions in both directions show up
/// at every boundary condition.
pub mod energy {
    /// Specific kinetic energy (J/kg) of a train moving at `velocity_m_s`.
    #[inline]
    pub fn kinetic_energy(velocity_m_s: f64) -> f64 {
        0.5 * velocity_m_s * velocity_m_s
    }

    /// Velocity (m/s) recovered from a specific kinetic energy (J/kg).
    #[inline]
    pub fn velocity_from_energy(energy: f64) -> f64 {
        (2.0 * energy).sqrt()
    }
}

/// Basic unit conversion helpers.
pub mod units {
    /// Convert kilometres per hour to metres per second.
    #[inline]
    pub fn kmh_to_ms(v: f64) -> f64 {
        v / 3.6
    }

    /// Convert metres per second to kilometres per hour.
    #[inline]
    pub fn ms_to_kmh(v: f64) -> f64 {
        v * 3.6
    }
}
