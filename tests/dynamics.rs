use rail_dynamics::{
    Coefficients, DynamicsError, LinearizedEngine, LinearizedRequest, PiecewiseTable,
};
use rail_math::{Piece, Piecewise};
use rail_model::{Track, TrackColumns, Train};

fn metro_train() -> Train {
    Train::new(
        5.07e5,
        1.06,
        0.0,
        4.475e5,
        3e5,
        (0.014 / 5.07e5, 2.564e-5 / 5.07e5),
    )
    .unwrap()
}

fn flat_track(segments: usize, limit_m_s: f64) -> Track {
    Track::from_columns(TrackColumns {
        length_m: vec![500.0; segments],
        max_speed_m_s: vec![limit_m_s; segments],
        min_speed_m_s: Vec::new(),
        slope_rad: vec![0.0; segments],
        bend_radius_m: vec![f64::INFINITY; segments],
        tunnel: vec![false; segments],
    })
    .unwrap()
}

#[test]
fn reference_table_covers_the_metro_limits() {
    let table = PiecewiseTable::reference(0.1).unwrap();
    for limit in [15.0, 20.0, 30.0, 40.0, 50.0] {
        assert!(table.for_limit(limit).is_some(), "missing {limit}");
    }
    assert!(table.for_limit(25.0).is_none());
    assert_eq!(table.init().len(), 3);
    assert_eq!(table.end().len(), 3);
}

#[test]
fn uncovered_speed_limit_fails_validation() {
    let table = PiecewiseTable::reference(0.1).unwrap();
    let track = flat_track(2, 25.0);
    let err = table.validate_for(&track).unwrap_err();
    assert!(matches!(err, DynamicsError::MissingSpeedLimit(limit) if limit == 25.0));
}

#[test]
fn table_entries_must_have_three_pieces() {
    let two_pieces = Piecewise::new(vec![
        Piece::new(0.0, 1.0, (0.0, 1.0)),
        Piece::new(0.0, 1.0, (1.0, 2.0)),
    ])
    .unwrap();
    let err = PiecewiseTable::new(
        two_pieces.clone(),
        two_pieces,
        std::collections::BTreeMap::new(),
    )
    .unwrap_err();
    assert!(matches!(err, DynamicsError::TableShape { expected: 3, got: 2 }));
}

#[test]
fn coefficient_blocks_have_the_expected_shapes() {
    let train = metro_train();
    let track = flat_track(2, 30.0);
    let table = PiecewiseTable::reference(0.1).unwrap();
    let entry = table.for_limit(30.0).unwrap().clone();
    let pieces = vec![entry.clone(), entry.clone(), entry];

    let coefficients = Coefficients::build(&train, &track, &pieces).unwrap();
    assert_eq!(coefficients.a.len(), 2);
    for k in 0..2 {
        // Friction only ever drains energy, so the decay factor sits in
        // (0, 1).
        assert!(coefficients.eta[k] < 0.0);
        assert!(coefficients.a[k] > 0.0 && coefficients.a[k] < 1.0);
        assert!(coefficients.b[k] > 0.0);
        assert_eq!(coefficients.a_mat[k].rows(), 2);
        assert_eq!(coefficients.a_mat[k].cols(), 2);
        assert_eq!(coefficients.b_mat[k].rows(), 2);
        assert_eq!(coefficients.b_mat[k].cols(), 1);
        assert_eq!(coefficients.c1_mat[k].rows(), 2);
        assert_eq!(coefficients.c1_mat[k].cols(), 3);
        assert_eq!(coefficients.r1[k].rows(), 21);
        assert_eq!(coefficients.r1[k].cols(), 3);
        assert_eq!(coefficients.r7[k].rows(), 21);
        assert_eq!(coefficients.r7[k].cols(), 1);
    }
    assert_eq!(coefficients.r3.rows(), 21);
    assert_eq!(coefficients.r3.cols(), 3);
    assert_eq!(coefficients.r5.rows(), 21);
    assert_eq!(coefficients.r5.cols(), 1);
    assert_eq!(coefficients.r6.rows(), 21);
    assert_eq!(coefficients.r6.cols(), 2);
}

#[test]
fn non_positive_timespan_is_rejected() {
    let train = metro_train();
    let track = flat_track(2, 30.0);
    let table = PiecewiseTable::reference(0.1).unwrap();
    let engine = LinearizedEngine::new(&train, &track, table).unwrap();
    let err = engine.solve(&LinearizedRequest::new(0.0)).unwrap_err();
    assert!(matches!(err, DynamicsError::InvalidRequest(_)));
}

#[test]
fn end_velocity_above_the_final_limit_is_infeasible() {
    let train = metro_train();
    let track = flat_track(2, 30.0);
    let table = PiecewiseTable::reference(0.1).unwrap();
    let engine = LinearizedEngine::new(&train, &track, table).unwrap();
    let mut request = LinearizedRequest::new(80.0);
    request.end_velocity_m_s = 35.0;
    let err = engine.solve(&request).unwrap_err();
    assert!(matches!(err, DynamicsError::InfeasibleTrajectory(_)));
}

#[test]
fn rest_to_rest_run_on_a_short_flat_line() {
    let train = metro_train();
    let track = flat_track(2, 30.0);
    let table = PiecewiseTable::reference(0.1).unwrap();
    let engine = LinearizedEngine::new(&train, &track, table).unwrap();
    let solution = engine.solve(&LinearizedRequest::new(80.0)).unwrap();

    assert_eq!(solution.kinetic_energy.len(), 3);
    assert_eq!(solution.time_s.len(), 3);
    assert_eq!(solution.velocity_m_s.len(), 3);
    assert_eq!(solution.traction_n.len(), 2);
    assert_eq!(solution.piece_selectors.len(), 2);
    assert_eq!(solution.slacks.len(), 2);
    assert_eq!(solution.smoothness.len(), 1);

    // Boundary conditions: the standstill energy floor at both ends and a
    // departure at the requested clock time.
    assert!((solution.kinetic_energy[0] - 0.1).abs() < 1e-9);
    assert!((solution.kinetic_energy[2] - 0.1).abs() < 1e-6);
    assert!(solution.time_s[0].abs() < 1e-9);

    // No early arrival, and lateness matches the delay variable.
    let arrival = solution.time_s[2];
    assert!(arrival >= 80.0 - 1e-6, "arrival {arrival}");
    assert!(solution.delay_s >= -1e-9);
    assert!((arrival - 80.0 - solution.delay_s).abs() < 1e-6);
    assert!(solution.delay_s < 5.0, "delay {}", solution.delay_s);
    assert!((solution.total_time_s() - arrival).abs() < 1e-9);

    // Clock and force stay physical throughout.
    assert!(solution.time_s[1] > 0.0 && solution.time_s[1] < arrival);
    for &u in &solution.traction_n {
        assert!(u <= 3e5 + 1e-6);
        assert!(u >= -4.475e5 - 1e-6);
    }
    for &e in &solution.kinetic_energy {
        assert!(e >= 0.1 - 1e-6);
        assert!(e <= 450.0 + 1e-6);
    }
    for &v in &solution.velocity_m_s {
        assert!(v <= 30.0 + 1e-6);
    }
    for selectors in &solution.piece_selectors {
        for &d in selectors {
            assert!(d.abs() < 1e-4 || (d - 1.0).abs() < 1e-4);
        }
    }
}

#[test]
fn tight_schedule_crosses_into_the_second_table_piece() {
    let train = metro_train();
    let track = flat_track(2, 30.0);
    let table = PiecewiseTable::reference(0.1).unwrap();
    let engine = LinearizedEngine::new(&train, &track, table).unwrap();
    let solution = engine.solve(&LinearizedRequest::new(69.5)).unwrap();

    // Holding 69.5 s over the kilometre needs a mid-run boundary energy
    // past the first knee of the 30 m/s table; the knee must not cap it.
    assert!(solution.delay_s < 1.0, "delay {}", solution.delay_s);
    let mid = solution.kinetic_energy[1];
    assert!(mid > 240.0, "mid-boundary energy {mid}");
    assert!(mid <= 300.0 + 1e-6, "mid-boundary energy {mid}");

    // The interior boundary selects the second piece, and its slack tracks
    // the boundary energy on the active piece only.
    let [d0, d1, d2] = solution.piece_selectors[1];
    assert!(d0.abs() < 1e-4 && d2.abs() < 1e-4, "selectors {d0} {d1} {d2}");
    assert!((d1 - 1.0).abs() < 1e-4, "selectors {d0} {d1} {d2}");
    let [z0, z1, z2] = solution.slacks[1];
    assert!(z0.abs() < 1e-3 && z2.abs() < 1e-3);
    assert!((z1 - mid).abs() < 1e-3, "slack {z1} energy {mid}");

    // Both legs stay within the train's force envelope.
    for &u in &solution.traction_n {
        assert!(u <= 3e5 + 1e-6);
        assert!(u >= -4.475e5 - 1e-6);
    }
}
