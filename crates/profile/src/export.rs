//! Fixed-timestep sampling of a computed trajectory.
//!
//! Integrates position forward per segment with the known constant
//! acceleration and re-derives instantaneous force, power, work, and jerk at
//! each sample. Steps are clamped to segment boundaries, so each segment's
//! last sample lands exactly on the boundary time.

use serde::Serialize;

use rail_model::Track;

use crate::ProfileError;
use crate::engine::TrajectoryPlan;
use crate::work::ZERO_THRESHOLD;

/// One sampled instant of the train's motion.
#[derive(Debug, Clone, Serialize)]
pub struct MotionSample {
    pub time_s: f64,
    pub segment: usize,
    pub position_m: f64,
    pub velocity_m_s: f64,
    pub acceleration_m_s2: f64,
    pub force_n: f64,
    pub power_w: f64,
    /// Work done by the net force since the previous sample (J).
    pub work_j: f64,
    /// Work done by traction only since the previous sample (J).
    pub traction_work_j: f64,
    pub jerk: f64,
    pub slope_rad: f64,
    pub max_speed_m_s: f64,
    pub bend_radius_m: f64,
    pub tunnel: bool,
}

impl TrajectoryPlan {
    /// Sample the plan every `timestep` seconds against the track it was
    /// computed for.
    pub fn sample(&self, track: &Track, timestep: f64) -> Result<Vec<MotionSample>, ProfileError> {
        if !(timestep > 0.0) {
            return Err(ProfileError::InvalidRequest(format!(
                "timestep must be positive, got {timestep}"
            )));
        }

        let mut samples = Vec::new();
        let mut breakpoint = 0.0;
        for (index, (node, record)) in self.nodes.iter().zip(&self.segments).enumerate() {
            let segment = track.segment(index);
            let accel = record.acceleration_m_s2;
            let time_end = node.time_s + record.timespan_s;

            let mut time_now = node.time_s;
            let mut time_then = (node.time_s + timestep).min(time_end);
            let mut dt = time_then - time_now;
            let mut velocity_now = node.velocity_m_s;
            let mut velocity_then = node.velocity_m_s + accel * dt;
            let mut position_then = breakpoint + 0.5 * (velocity_now + velocity_then) * dt;
            let mut ds = position_then - breakpoint;

            loop {
                let force = record.force.eval(velocity_then);
                samples.push(MotionSample {
                    time_s: time_then,
                    segment: index,
                    position_m: position_then,
                    velocity_m_s: velocity_then,
                    acceleration_m_s2: accel,
                    force_n: force,
                    power_w: force * velocity_then,
                    work_j: force * ds,
                    traction_work_j: force.max(0.0) * ds,
                    jerk: 2.0 * record.force.quadratic * accel.abs() * ds,
                    slope_rad: segment.slope_rad,
                    max_speed_m_s: segment.max_speed_m_s,
                    bend_radius_m: segment.bend_radius_m,
                    tunnel: segment.tunnel,
                });

                if (time_end - time_then).abs() <= ZERO_THRESHOLD {
                    break;
                }
                time_now = time_then;
                time_then = (time_then + timestep).min(time_end);
                dt = time_then - time_now;
                velocity_now = velocity_then;
                velocity_then += accel * dt;
                let position_now = position_then;
                position_then += 0.5 * (velocity_now + velocity_then) * dt;
                ds = position_then - position_now;
            }

            breakpoint += segment.length_m;
        }
        Ok(samples)
    }
}
