//! Small numeric building blocks shared by the optimisation engines.
//!
//! `matrix` provides the dense block-matrix algebra used to assemble the
//! linearized engine's constraint recurrences; `piecewise` provides validated
//! piecewise-affine functions.

pub mod matrix;
pub mod piecewise;

pub use matrix::Matrix;
pub use piecewise::{Piece, Piecewise};

use thiserror::Error;

/// Validation failures raised by the math helpers.
#[derive(Debug, Error)]
pub enum MathError {
    #[error("matrix dimensions {0}x{1} and {2}x{3} are incompatible for {4}")]
    DimensionMismatch(usize, usize, usize, usize, &'static str),
    #[error("piecewise function needs at least one piece")]
    EmptyPiecewise,
    #[error("piece {0} has an empty or inverted domain [{1}, {2}]")]
    InvertedDomain(usize, f64, f64),
    #[error("pieces {0} and {1} are not contiguous ({2} != {3})")]
    NonContiguous(usize, usize, f64, f64),
    #[error("pieces {0} and {1} disagree at the shared boundary ({2} vs {3})")]
    Discontinuous(usize, usize, f64, f64),
    #[error("point {0} lies outside the piecewise domain [{1}, {2}]")]
    OutOfDomain(f64, f64, f64),
}
