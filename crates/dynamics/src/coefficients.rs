//! Per-segment coefficients and constraint blocks of the linearized model.
//!
//! Everything here is a pure function of the train, the track, and the
//! resolved per-boundary piecewise approximations; it is computed once into
//! arrays indexed by the discretization step `k` when the engine assembles
//! its model.

use rail_math::{MathError, Matrix, Piecewise};
use rail_model::{Track, Train};

/// Big-M bracketing margin used in the domain-membership rows.
pub const EPS: f64 = 1e-8;

/// Precomputed scalars and matrices, one entry per segment `k` (per-boundary
/// quantities come from the resolved piecewise slice the engine passes in).
#[derive(Debug)]
pub struct Coefficients {
    /// `1 / (mass * massfactor)`.
    pub zeta: f64,
    pub eta: Vec<f64>,
    pub gamma: Vec<f64>,
    pub a: Vec<f64>,
    pub b: Vec<f64>,
    pub c: Vec<f64>,
    /// 2x2 state-transition matrices.
    pub a_mat: Vec<Matrix>,
    /// 2x1 force-input columns.
    pub b_mat: Vec<Matrix>,
    /// 2x3 selector corrections at the entry boundary.
    pub c1_mat: Vec<Matrix>,
    /// 2x3 selector corrections at the exit boundary.
    pub c2_mat: Vec<Matrix>,
    /// 2x3 slack corrections at the entry boundary.
    pub d1_mat: Vec<Matrix>,
    /// 2x3 slack corrections at the exit boundary.
    pub d2_mat: Vec<Matrix>,
    /// 2x1 constant offsets.
    pub e_vec: Vec<Matrix>,
    /// 21x3 selector blocks of the R-system.
    pub r1: Vec<Matrix>,
    /// 21x3 slack block (step-independent).
    pub r3: Matrix,
    /// 21x1 force block (step-independent, all zero).
    pub r5: Matrix,
    /// 21x2 state block (step-independent).
    pub r6: Matrix,
    /// 21x1 independent terms.
    pub r7: Vec<Matrix>,
}

impl Coefficients {
    /// Build all per-`k` arrays. `f` holds the resolved piecewise
    /// approximation per boundary, `track.len() + 1` entries.
    pub fn build(train: &Train, track: &Track, f: &[Piecewise]) -> Result<Self, MathError> {
        let n = track.len();
        debug_assert_eq!(f.len(), n + 1);

        let zeta = 1.0 / train.effective_mass_kg();
        let (basic_a, basic_b) = train.basic_resistance;

        let mut eta = Vec::with_capacity(n);
        let mut gamma = Vec::with_capacity(n);
        let mut a = Vec::with_capacity(n);
        let mut b = Vec::with_capacity(n);
        let mut c = Vec::with_capacity(n);
        for k in 0..n {
            let segment = track.segment(k);
            // Per-unit-mass line-resistance split: constant part (slope +
            // curve) and the coefficient of v² (tunnel drag at v = 1).
            let line_const = (train.slope_resistance(segment) + train.curve_resistance(segment))
                / train.mass_kg;
            let line_quad = train.tunnel_resistance(segment, 1.0) / train.mass_kg;

            let eta_k = -2.0 * (basic_b + line_quad) / train.mass_factor;
            let gamma_k = -(basic_a + line_const) / train.mass_factor;
            let a_k = (eta_k * segment.length_m).exp();
            eta.push(eta_k);
            gamma.push(gamma_k);
            a.push(a_k);
            b.push((a_k - 1.0) * zeta / eta_k);
            c.push((a_k - 1.0) * gamma_k / eta_k);
        }

        let mut a_mat = Vec::with_capacity(n);
        let mut b_mat = Vec::with_capacity(n);
        let mut c1_mat = Vec::with_capacity(n);
        let mut c2_mat = Vec::with_capacity(n);
        let mut d1_mat = Vec::with_capacity(n);
        let mut d2_mat = Vec::with_capacity(n);
        let mut e_vec = Vec::with_capacity(n);
        let mut r1 = Vec::with_capacity(n);
        let mut r7 = Vec::with_capacity(n);

        for k in 0..n {
            let length = track.segment(k).length_m;
            let fk = &f[k];
            let fkk = &f[k + 1];

            a_mat.push(Matrix::from_rows(vec![
                vec![a[k], 0.0],
                vec![
                    length * (fk.piece(2).a + a[k] * fkk.piece(2).a),
                    1.0,
                ],
            ])?);
            b_mat.push(Matrix::from_rows(vec![
                vec![b[k]],
                vec![length * fkk.piece(2).a * b[k]],
            ])?);
            c1_mat.push(selector_offsets(fk, length, PieceField::B)?);
            c2_mat.push(selector_offsets(fkk, length, PieceField::B)?);
            d1_mat.push(selector_offsets(fk, length, PieceField::A)?);
            d2_mat.push(selector_offsets(fkk, length, PieceField::A)?);
            e_vec.push(Matrix::from_rows(vec![
                vec![c[k]],
                vec![length * (fkk.piece(2).a * c[k] + fk.piece(2).b + fkk.piece(2).b)],
            ])?);
            r1.push(selector_rows(fk)?);
            r7.push(independent_rows(fk)?);
        }

        Ok(Coefficients {
            zeta,
            eta,
            gamma,
            a,
            b,
            c,
            a_mat,
            b_mat,
            c1_mat,
            c2_mat,
            d1_mat,
            d2_mat,
            e_vec,
            r1,
            r3: slack_rows()?,
            r5: force_rows()?,
            r6: state_rows()?,
            r7,
        })
    }
}

enum PieceField {
    A,
    B,
}

/// The 2x3 correction block: zero top row, telescoping piece coefficients in
/// the bottom row, scaled by the segment length.
fn selector_offsets(
    pieces: &Piecewise,
    length: f64,
    field: PieceField,
) -> Result<Matrix, MathError> {
    let value = |i: usize| match field {
        PieceField::A => pieces.piece(i).a,
        PieceField::B => pieces.piece(i).b,
    };
    let (p0, p1, p2) = (value(0), value(1), value(2));
    Ok(Matrix::from_rows(vec![
        vec![0.0, 0.0, 0.0],
        vec![-p2, p1 - p2, p0 - p1 + p2],
    ])?
    .scale(length))
}

/// Stack blocks vertically, preserving order.
fn stack(first: Matrix, rest: Vec<Matrix>) -> Result<Matrix, MathError> {
    let mut out = first;
    for block in rest {
        out = out.vertical_concat(&block)?;
    }
    Ok(out)
}

/// 21x3 block multiplying the selector binaries `d_k`.
///
/// The pattern rows pin `d0 = d2 <= d1`, leaving exactly three selector
/// patterns: `(1,1,1)` marks piece 0, `(0,1,0)` piece 1, and `(0,0,0)`
/// piece 2. Under those patterns the telescoped correction columns
/// `(-p2, p1 - p2, p0 - p1 + p2)` collapse to the active piece's
/// coefficient, so the recurrence applies one affine map per boundary.
///
/// The remaining blocks linearize the products `z_i = E * d_i` and tie the
/// pattern to domain membership: `d_i = 1` is feasible only while `E` sits
/// at or below piece `i`'s upper edge, `d_i = 0` only strictly above it.
fn selector_rows(pieces: &Piecewise) -> Result<Matrix, MathError> {
    let lo0 = pieces.piece(0).domain.0;
    let hi = |i: usize| pieces.piece(i).domain.1;
    let top = hi(2);

    stack(
        // Pattern rows: d0 <= d1, d2 <= d0, d0 <= d2.
        Matrix::from_rows(vec![
            vec![1.0, -1.0, 0.0],
            vec![-1.0, 0.0, 1.0],
            vec![1.0, 0.0, -1.0],
        ])?,
        vec![
            // z_i bracketed inside the table domain while selected,
            // squeezed to zero otherwise.
            Matrix::diagonal(&[lo0, lo0, lo0]),
            Matrix::diagonal(&[-hi(0), -hi(1), -hi(2)]),
            // z_i pinned to E while selected.
            Matrix::diagonal(&[top, top, top]),
            Matrix::diagonal(&[-lo0, -lo0, -lo0]),
            // Membership, both directions; piece 2 needs no upper-edge
            // indicator beyond the table domain itself.
            Matrix::diagonal(&[top - hi(0), top - hi(1), 0.0]),
            Matrix::diagonal(&[lo0 - hi(0) - EPS, lo0 - hi(1) - EPS, 0.0]),
        ],
    )
}

/// 21x3 block multiplying the slack vector `z_k`.
fn slack_rows() -> Result<Matrix, MathError> {
    stack(
        Matrix::zeros(3, 3),
        vec![
            Matrix::identity(3).scale(-1.0),
            Matrix::identity(3),
            Matrix::identity(3).scale(-1.0),
            Matrix::identity(3),
            Matrix::zeros(3, 3),
            Matrix::zeros(3, 3),
        ],
    )
}

/// 21x1 block multiplying the force `u_k` (the R-system never touches it).
fn force_rows() -> Result<Matrix, MathError> {
    Ok(Matrix::zeros(21, 1))
}

/// 21x2 block multiplying the state `X_k`.
fn state_rows() -> Result<Matrix, MathError> {
    stack(
        Matrix::zeros(9, 2),
        vec![
            Matrix::from_rows(vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![1.0, 0.0]])?,
            Matrix::from_rows(vec![
                vec![-1.0, 0.0],
                vec![-1.0, 0.0],
                vec![-1.0, 0.0],
            ])?,
            Matrix::from_rows(vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![1.0, 0.0]])?,
            Matrix::from_rows(vec![
                vec![-1.0, 0.0],
                vec![-1.0, 0.0],
                vec![0.0, 0.0],
            ])?,
        ],
    )
}

/// 21x1 independent term.
fn independent_rows(pieces: &Piecewise) -> Result<Matrix, MathError> {
    let lo0 = pieces.piece(0).domain.0;
    let hi = |i: usize| pieces.piece(i).domain.1;
    let top = hi(2);

    stack(
        Matrix::zeros(9, 1),
        vec![
            Matrix::column(&[top, top, top]),
            Matrix::column(&[lo0, lo0, lo0]).scale(-1.0),
            Matrix::column(&[top, top, top]),
            Matrix::column(&[-hi(0) - EPS, -hi(1) - EPS, 0.0]),
        ],
    )
}
