//! Closed-form traction-work integral for a constant-acceleration segment.
//!
//! With resistance approximated as `R(v) = C1 + C2·v²` and acceleration `a`
//! held constant, the force the propulsion system must supply at time `t`
//! after entering the segment at velocity `v` is
//! `F(t) = m·rho·a + C1 + C2·(v + a·t)²`. The work done *by traction alone*
//! differs from the total work whenever `F` changes sign inside the window:
//! past the sign change the train brakes or coasts and traction contributes
//! nothing. The sign analysis reduces to one scalar, `switch`, derived from
//! the discriminant of `F` as a polynomial in `t`.

/// Values below this threshold are treated as zero.
pub const ZERO_THRESHOLD: f64 = 1e-6;

/// Work done by the traction force over `[0, dt]`.
///
/// `effective_mass` is `mass · massfactor`; `c1`/`c2` the resistance
/// coefficients at the segment (`R(v) = c1 + c2·v²`); `accel` the constant
/// acceleration; `velocity` the entry velocity. Degenerate timespans yield
/// zero regardless of the other parameters.
pub fn traction_work(
    effective_mass: f64,
    c1: f64,
    c2: f64,
    accel: f64,
    velocity: f64,
    dt: f64,
) -> f64 {
    if dt < ZERO_THRESHOLD {
        return 0.0;
    }

    // Force at t = 0.
    let a = effective_mass * accel + c1 + c2 * velocity * velocity;
    if a.abs() < ZERO_THRESHOLD {
        return 0.0;
    }

    // Derivative terms of F(t); the sign analysis hinges on `switch`, the
    // squared time offset (from dt) at which the force sign flips.
    let b = 2.0 * velocity * c2 * accel * accel;
    let c = c2 * accel * accel * accel;
    let switch = (b * b - 4.0 * a * c) / (2.0 * a);

    if switch.abs() <= ZERO_THRESHOLD {
        if c1 >= 0.0 { c1 } else { 0.0 }
    } else if switch < 0.0 {
        // Force keeps its sign in-window: integrate the full expression.
        total_work(effective_mass, c1, c2, accel, velocity, dt)
    } else {
        // Sign change at dt - sqrt(switch): integrate only the
        // traction-active remainder.
        total_work(
            effective_mass,
            c1,
            c2,
            accel,
            velocity,
            (dt - switch.sqrt()).max(0.0),
        )
    }
}

/// Work done by the net force over `[0, dt]`, closed form.
fn total_work(effective_mass: f64, c1: f64, c2: f64, accel: f64, velocity: f64, dt: f64) -> f64 {
    if dt < ZERO_THRESHOLD {
        return 0.0;
    }
    let v_end = velocity + accel * dt;
    0.5 * (effective_mass * accel + c1) * (v_end * v_end - velocity * velocity)
        + 0.25 * c2 * (v_end.powi(4) - velocity.powi(4))
}
