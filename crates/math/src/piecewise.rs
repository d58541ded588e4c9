//! Validated piecewise-affine functions.

use crate::MathError;

/// Adjacent pieces must agree at the shared boundary to within this value.
///
/// The published linearization tables are the output of a least-squares fit
/// and only approximately continuous, so the tolerance is loose by design.
pub const CONTINUITY_TOL: f64 = 1e-2;

/// One affine piece `f(x) = a*x + b` valid on `[domain.0, domain.1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Piece {
    pub a: f64,
    pub b: f64,
    pub domain: (f64, f64),
}

impl Piece {
    pub fn new(a: f64, b: f64, domain: (f64, f64)) -> Self {
        Piece { a, b, domain }
    }

    /// Affine evaluation without a domain check.
    #[inline]
    pub fn eval(&self, x: f64) -> f64 {
        self.a * x + self.b
    }
}

/// An ordered sequence of contiguous affine pieces covering one interval.
#[derive(Debug, Clone, PartialEq)]
pub struct Piecewise {
    pieces: Vec<Piece>,
}

impl Piecewise {
    /// Build a piecewise function. Pieces must come pre-ordered from lowest
    /// to highest domain, be contiguous, and agree in value at every shared
    /// boundary.
    pub fn new(pieces: Vec<Piece>) -> Result<Self, MathError> {
        if pieces.is_empty() {
            return Err(MathError::EmptyPiecewise);
        }
        for (i, piece) in pieces.iter().enumerate() {
            let (lo, hi) = piece.domain;
            if !(lo < hi) {
                return Err(MathError::InvertedDomain(i, lo, hi));
            }
        }
        for i in 1..pieces.len() {
            let prev = &pieces[i - 1];
            let next = &pieces[i];
            if (prev.domain.1 - next.domain.0).abs() > CONTINUITY_TOL {
                return Err(MathError::NonContiguous(
                    i - 1,
                    i,
                    prev.domain.1,
                    next.domain.0,
                ));
            }
            let at_boundary = prev.domain.1;
            let left = prev.eval(at_boundary);
            let right = next.eval(at_boundary);
            if (left - right).abs() > CONTINUITY_TOL {
                return Err(MathError::Discontinuous(i - 1, i, left, right));
            }
        }
        Ok(Piecewise { pieces })
    }

    /// Number of pieces.
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Piece at ordinal `index`.
    pub fn piece(&self, index: usize) -> &Piece {
        &self.pieces[index]
    }

    /// The full covered domain `[lo, hi]`.
    pub fn domain(&self) -> (f64, f64) {
        (
            self.pieces[0].domain.0,
            self.pieces[self.pieces.len() - 1].domain.1,
        )
    }

    /// Evaluate at `x`; fails when `x` lies outside the covered domain.
    pub fn eval(&self, x: f64) -> Result<f64, MathError> {
        let (lo, hi) = self.domain();
        for piece in &self.pieces {
            if x >= piece.domain.0 && x <= piece.domain.1 {
                return Ok(piece.eval(x));
            }
        }
        Err(MathError::OutOfDomain(x, lo, hi))
    }
}
