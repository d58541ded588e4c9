//! Track geometry: an ordered sequence of physical segments.

use crate::ModelError;

/// One fixed-length section of track with uniform physical attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Segment length (m). Always positive.
    pub length_m: f64,
    /// Speed limit over the segment (m/s).
    pub max_speed_m_s: f64,
    /// Minimum commercial speed over the segment (m/s). Only the profile
    /// engine consumes it; zero when the loader leaves it unset.
    pub min_speed_m_s: f64,
    /// Slope angle (rad); positive uphill.
    pub slope_rad: f64,
    /// Bend radius (m); `f64::INFINITY` for a straight segment.
    pub bend_radius_m: f64,
    /// Whether the segment runs inside a tunnel.
    pub tunnel: bool,
}

/// Per-attribute columns describing a track, as produced by loaders.
#[derive(Debug, Clone, Default)]
pub struct TrackColumns {
    pub length_m: Vec<f64>,
    pub max_speed_m_s: Vec<f64>,
    /// Empty means "no minimum" (all zeros).
    pub min_speed_m_s: Vec<f64>,
    pub slope_rad: Vec<f64>,
    pub bend_radius_m: Vec<f64>,
    pub tunnel: Vec<bool>,
}

/// An ordered sequence of [`Segment`]s, index 0..N-1 in direction of travel.
#[derive(Debug, Clone)]
pub struct Track {
    segments: Vec<Segment>,
}

impl Track {
    /// Validate attribute columns and assemble the track.
    ///
    /// All columns must have the same length N (an empty `min_speed_m_s`
    /// column defaults to zeros), and every segment must satisfy its
    /// invariants: positive length, non-negative speed bounds with
    /// `min <= max`, positive bend radius.
    pub fn from_columns(columns: TrackColumns) -> Result<Self, ModelError> {
        let n = columns.length_m.len();
        if n == 0 {
            return Err(ModelError::EmptyTrack);
        }
        let min_speed = if columns.min_speed_m_s.is_empty() {
            vec![0.0; n]
        } else {
            columns.min_speed_m_s
        };
        for (len, name) in [
            (columns.max_speed_m_s.len(), "max_speed"),
            (min_speed.len(), "min_speed"),
            (columns.slope_rad.len(), "slope"),
            (columns.bend_radius_m.len(), "bend_radius"),
            (columns.tunnel.len(), "tunnel"),
        ] {
            if len != n {
                return Err(ModelError::ColumnLengthMismatch(name, n, len));
            }
        }

        let mut segments = Vec::with_capacity(n);
        for i in 0..n {
            let segment = Segment {
                length_m: columns.length_m[i],
                max_speed_m_s: columns.max_speed_m_s[i],
                min_speed_m_s: min_speed[i],
                slope_rad: columns.slope_rad[i],
                bend_radius_m: columns.bend_radius_m[i],
                tunnel: columns.tunnel[i],
            };
            validate_segment(i, &segment)?;
            segments.push(segment);
        }
        Ok(Track { segments })
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segment at `index` (panics out of bounds, like slice indexing).
    pub fn segment(&self, index: usize) -> &Segment {
        &self.segments[index]
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    /// Total track length (m).
    pub fn total_length_m(&self) -> f64 {
        self.segments.iter().map(|s| s.length_m).sum()
    }

    /// The distinct speed limits present on the track, ascending.
    pub fn distinct_speed_limits(&self) -> Vec<f64> {
        let mut limits: Vec<f64> = self.segments.iter().map(|s| s.max_speed_m_s).collect();
        limits.sort_by(|a, b| a.total_cmp(b));
        limits.dedup_by(|a, b| *a == *b);
        limits
    }
}

fn validate_segment(index: usize, segment: &Segment) -> Result<(), ModelError> {
    if !(segment.length_m > 0.0) {
        return Err(ModelError::InvalidSegment(
            index,
            format!("length must be positive, got {}", segment.length_m),
        ));
    }
    if segment.max_speed_m_s < 0.0 {
        return Err(ModelError::InvalidSegment(
            index,
            format!("max speed must be non-negative, got {}", segment.max_speed_m_s),
        ));
    }
    if segment.min_speed_m_s < 0.0 || segment.min_speed_m_s > segment.max_speed_m_s {
        return Err(ModelError::InvalidSegment(
            index,
            format!(
                "min speed {} outside [0, {}]",
                segment.min_speed_m_s, segment.max_speed_m_s
            ),
        ));
    }
    if !(segment.bend_radius_m > 0.0) {
        return Err(ModelError::InvalidSegment(
            index,
            format!("bend radius must be positive, got {}", segment.bend_radius_m),
        ));
    }
    Ok(())
}
