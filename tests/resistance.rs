use rail_model::{Segment, Train};

fn train() -> Train {
    Train::new(1000.0, 1.06, 0.0, 4000.0, 3000.0, (0.01, 0.001)).unwrap()
}

fn segment() -> Segment {
    Segment {
        length_m: 500.0,
        max_speed_m_s: 30.0,
        min_speed_m_s: 0.0,
        slope_rad: 0.0,
        bend_radius_m: f64::INFINITY,
        tunnel: false,
    }
}

#[test]
fn basic_resistance_is_quadratic_in_velocity() {
    let train = train();
    assert!((train.basic_resistance(0.0) - 10.0).abs() < 1e-9);
    assert!((train.basic_resistance(10.0) - 110.0).abs() < 1e-9);
}

#[test]
fn slope_resistance_follows_the_grade_angle() {
    let train = train();
    let mut seg = segment();
    seg.slope_rad = 0.01;
    assert!((train.slope_resistance(&seg) - 98.06486556650552).abs() < 1e-6);
    seg.slope_rad = -0.01;
    assert!((train.slope_resistance(&seg) + 98.06486556650552).abs() < 1e-6);
}

#[test]
fn curve_resistance_branches_on_radius() {
    let train = train();
    let mut seg = segment();

    seg.bend_radius_m = 20.0;
    assert!(train.curve_resistance(&seg).is_infinite());
    seg.bend_radius_m = 30.0;
    assert!(train.curve_resistance(&seg).is_infinite());

    seg.bend_radius_m = 130.0;
    assert!((train.curve_resistance(&seg) - 49.1).abs() < 1e-9);
    seg.bend_radius_m = 330.0;
    assert!((train.curve_resistance(&seg) - 22.90909090909091).abs() < 1e-9);

    // Resistance falls off as the curve opens up.
    seg.bend_radius_m = 100.0;
    let tight = train.curve_resistance(&seg);
    seg.bend_radius_m = 200.0;
    let wide = train.curve_resistance(&seg);
    assert!(tight > wide);

    // The two empirical branches do not meet at 300 m.
    seg.bend_radius_m = 299.0;
    let below = train.curve_resistance(&seg);
    seg.bend_radius_m = 300.0;
    let at = train.curve_resistance(&seg);
    assert!((below - 18.25278810408922).abs() < 1e-9);
    assert!((at - 25.714285714285715).abs() < 1e-9);
}

#[test]
fn straight_segments_have_negligible_curve_resistance() {
    let train = train();
    let seg = segment();
    assert!(train.curve_resistance(&seg).abs() < 1e-9);
}

#[test]
fn tunnel_resistance_applies_only_inside_tunnels() {
    let train = train();
    let mut seg = segment();
    assert_eq!(train.tunnel_resistance(&seg, 10.0), 0.0);
    seg.tunnel = true;
    assert!((train.tunnel_resistance(&seg, 10.0) - 0.63547092).abs() < 1e-9);
    assert_eq!(train.tunnel_resistance(&seg, 0.0), 0.0);
}

#[test]
fn stationary_train_has_no_curve_resistance() {
    let train = train();
    let mut seg = segment();
    seg.bend_radius_m = 130.0;
    seg.slope_rad = 0.01;
    // At standstill only the grade pulls on the train.
    assert!((train.line_resistance(&seg, 0.0) - train.slope_resistance(&seg)).abs() < 1e-9);
    // Any motion brings the flange friction back.
    let moving = train.line_resistance(&seg, 1.0);
    assert!((moving - train.slope_resistance(&seg) - 49.1).abs() < 1e-9);
}

#[test]
fn quadratic_coefficient_recovered_from_unit_velocity() {
    // The profile engine derives R(v) = C1 + C2·v² from two probes; on a
    // straight non-tunnel segment C2 is exactly mass·b.
    let train = train();
    let seg = segment();
    let c1 = train.resistance(&seg, 0.0);
    let c2 = train.resistance(&seg, 1.0) - c1;
    assert!((c1 - 10.0).abs() < 1e-9);
    assert!((c2 - 1.0).abs() < 1e-9);
    assert!((c1 + c2 * 100.0 - train.resistance(&seg, 10.0)).abs() < 1e-9);
}

#[test]
fn total_resistance_is_basic_plus_line() {
    let train = train();
    let mut seg = segment();
    seg.slope_rad = 0.01;
    seg.tunnel = true;
    let expected = train.basic_resistance(10.0) + train.line_resistance(&seg, 10.0);
    assert!((train.resistance(&seg, 10.0) - expected).abs() < 1e-9);
}
