use rail_model::{ModelError, Track, TrackColumns, Train};

fn columns(n: usize) -> TrackColumns {
    TrackColumns {
        length_m: vec![500.0; n],
        max_speed_m_s: vec![30.0; n],
        min_speed_m_s: Vec::new(),
        slope_rad: vec![0.0; n],
        bend_radius_m: vec![f64::INFINITY; n],
        tunnel: vec![false; n],
    }
}

#[test]
fn track_from_columns_builds_segments() {
    let track = Track::from_columns(columns(4)).unwrap();
    assert_eq!(track.len(), 4);
    assert!((track.total_length_m() - 2000.0).abs() < 1e-9);
    assert!((track.segment(2).max_speed_m_s - 30.0).abs() < 1e-9);
    assert_eq!(track.segment(0).min_speed_m_s, 0.0);
}

#[test]
fn empty_track_is_rejected() {
    let err = Track::from_columns(columns(0)).unwrap_err();
    assert!(matches!(err, ModelError::EmptyTrack));
}

#[test]
fn mismatched_columns_are_rejected() {
    let mut cols = columns(3);
    cols.slope_rad.pop();
    let err = Track::from_columns(cols).unwrap_err();
    assert!(matches!(err, ModelError::ColumnLengthMismatch("slope", 3, 2)));
}

#[test]
fn min_speed_above_max_is_rejected() {
    let mut cols = columns(2);
    cols.min_speed_m_s = vec![10.0, 40.0];
    let err = Track::from_columns(cols).unwrap_err();
    assert!(matches!(err, ModelError::InvalidSegment(1, _)));
}

#[test]
fn non_positive_length_is_rejected() {
    let mut cols = columns(2);
    cols.length_m[0] = 0.0;
    assert!(Track::from_columns(cols).is_err());
}

#[test]
fn distinct_speed_limits_are_sorted_and_deduplicated() {
    let mut cols = columns(5);
    cols.max_speed_m_s = vec![50.0, 30.0, 30.0, 15.0, 50.0];
    let track = Track::from_columns(cols).unwrap();
    assert_eq!(track.distinct_speed_limits(), vec![15.0, 30.0, 50.0]);
}

#[test]
fn train_validation() {
    assert!(Train::new(0.0, 1.06, 0.0, 4000.0, 3000.0, (0.01, 0.001)).is_err());
    assert!(Train::new(1000.0, 0.9, 0.0, 4000.0, 3000.0, (0.01, 0.001)).is_err());
    assert!(Train::new(1000.0, 1.06, -1.0, 4000.0, 3000.0, (0.01, 0.001)).is_err());
    assert!(Train::new(1000.0, 1.06, 0.0, 4000.0, 0.0, (0.01, 0.001)).is_err());
}

#[test]
fn brake_force_is_stored_as_magnitude() {
    let train = Train::new(1000.0, 1.06, 0.0, -4000.0, 3000.0, (0.01, 0.001)).unwrap();
    assert!((train.max_brake_n() - 4000.0).abs() < 1e-9);
    assert!((train.effective_mass_kg() - 1060.0).abs() < 1e-9);
}
