//! Speed-limit-keyed piecewise linearization tables.

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

use rail_math::{MathError, Piece, Piecewise};
use rail_model::Track;

use crate::DynamicsError;

/// Number of linear pieces every table entry must carry; the engine's
/// selector vectors and constraint blocks are dimensioned for it.
pub const PIECES_PER_ENTRY: usize = 3;

/// Piecewise-affine approximations of the inverse-kinetic-energy term, one
/// per speed limit, plus dedicated entries for the near-standstill start and
/// end boundaries.
#[derive(Debug, Clone)]
pub struct PiecewiseTable {
    init: Piecewise,
    end: Piecewise,
    by_limit: BTreeMap<OrderedFloat<f64>, Piecewise>,
}

impl PiecewiseTable {
    /// Assemble a table, checking that every entry has exactly
    /// [`PIECES_PER_ENTRY`] pieces.
    pub fn new(
        init: Piecewise,
        end: Piecewise,
        by_limit: BTreeMap<OrderedFloat<f64>, Piecewise>,
    ) -> Result<Self, DynamicsError> {
        for entry in [&init, &end].into_iter().chain(by_limit.values()) {
            if entry.len() != PIECES_PER_ENTRY {
                return Err(DynamicsError::TableShape {
                    expected: PIECES_PER_ENTRY,
                    got: entry.len(),
                });
            }
        }
        Ok(PiecewiseTable {
            init,
            end,
            by_limit,
        })
    }

    /// The published reference table for metro speed limits of 15, 20, 30,
    /// 40, and 50 m/s. `e_start` anchors the lower domain edge of every
    /// first piece (the boundary kinetic energy the trajectory starts from).
    ///
    /// The anchor doubles as the energy floor the linearized engine holds
    /// at every selector boundary, so a run that may dip below its
    /// departure energy should anchor at the standstill floor instead of
    /// the start energy.
    pub fn reference(e_start: f64) -> Result<Self, DynamicsError> {
        let entry = |rows: [(f64, f64, f64, f64); PIECES_PER_ENTRY]| -> Result<Piecewise, MathError> {
            Piecewise::new(
                rows.iter()
                    .map(|&(a, b, lo, hi)| Piece::new(a, b, (lo, hi)))
                    .collect(),
            )
        };

        let init = entry([
            (-4.6463e-4, 0.0734, e_start, 80.8),
            (-4.6463e-4, 0.0734, 80.8, 200.0),
            (-4.6463e-4, 0.0734, 200.0, 312.5),
        ])?;
        let end = entry([
            (-1.4458e-4, 0.0534, e_start, 229.9),
            (-1.4514e-6, 0.0235, 229.9, 320.0),
            (-1.4514e-6, 0.0235, 320.0, 450.0),
        ])?;

        let mut by_limit = BTreeMap::new();
        by_limit.insert(
            OrderedFloat(15.0),
            entry([
                (-5.0943e-4, 0.0767, e_start, 71.2),
                (-1.7393e-4, 0.0528, 71.2, 100.0),
                (-1.7393e-4, 0.0528, 100.0, 122.5),
            ])?,
        );
        by_limit.insert(
            OrderedFloat(20.0),
            entry([
                (-3.1153e-4, 0.0665, e_start, 115.0),
                (-6.7188e-5, 0.0384, 115.0, 150.0),
                (-6.7188e-5, 0.0384, 150.0, 200.0),
            ])?,
        );
        by_limit.insert(
            OrderedFloat(30.0),
            entry([
                (-9.4977e-5, 0.0443, e_start, 240.0),
                (-2.3470e-5, 0.0272, 240.0, 300.0),
                (-2.3470e-5, 0.0272, 300.0, 450.0),
            ])?,
        );
        by_limit.insert(
            OrderedFloat(40.0),
            entry([
                (-4.4240e-5, 0.0346, e_start, 415.0),
                (-9.6462e-6, 0.0202, 415.0, 600.0),
                (-9.6462e-6, 0.0202, 600.0, 800.0),
            ])?,
        );
        by_limit.insert(
            OrderedFloat(50.0),
            entry([
                (-1.8122e-5, 0.0251, e_start, 640.0),
                (-6.2127e-6, 0.0175, 640.0, 900.0),
                (-6.2127e-6, 0.0175, 900.0, 1250.0),
            ])?,
        );

        PiecewiseTable::new(init, end, by_limit)
    }

    /// Entry for the near-standstill start boundary.
    pub fn init(&self) -> &Piecewise {
        &self.init
    }

    /// Entry for the near-standstill end boundary.
    pub fn end(&self) -> &Piecewise {
        &self.end
    }

    /// Entry for an ordinary boundary under the given speed limit.
    pub fn for_limit(&self, limit: f64) -> Option<&Piecewise> {
        self.by_limit.get(&OrderedFloat(limit))
    }

    /// Check that every distinct speed limit present on `track` has an
    /// entry. Fails fast before any model assembly.
    pub fn validate_for(&self, track: &Track) -> Result<(), DynamicsError> {
        for limit in track.distinct_speed_limits() {
            if self.for_limit(limit).is_none() {
                return Err(DynamicsError::MissingSpeedLimit(limit));
            }
        }
        Ok(())
    }
}
