//! Physical models consumed by the trajectory engines.
//!
//! A [`Track`] is an ordered sequence of immutable [`Segment`]s; a [`Train`]
//! bundles the physical constants and resistance-force equations of one
//! vehicle. Both are read-only inputs once built.

pub mod track;
pub mod train;

pub use track::{Segment, Track, TrackColumns};
pub use train::Train;

use thiserror::Error;

/// Validation failures raised while building model values.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("track column {0} has {2} entries, expected {1}")]
    ColumnLengthMismatch(&'static str, usize, usize),
    #[error("track has no segments")]
    EmptyTrack,
    #[error("segment {0}: {1}")]
    InvalidSegment(usize, String),
    #[error("train: {0}")]
    InvalidTrain(String),
}
