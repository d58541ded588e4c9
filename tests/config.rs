use std::io::Write as _;

use rail_config::{ConfigError, load_track, load_train};

fn write_file(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn loads_a_track_from_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "track.yaml",
        r#"
length_m: [500.0, 500.0]
max_speed_m_s: [30.0, 15.0]
slope_rad: [0.005, -0.002]
bend_radius_m: [.inf, 250.0]
tunnel: [false, true]
"#,
    );
    let track = load_track(&path).unwrap();
    assert_eq!(track.len(), 2);
    assert!(track.segment(0).bend_radius_m.is_infinite());
    assert!((track.segment(1).bend_radius_m - 250.0).abs() < 1e-9);
    assert!(track.segment(1).tunnel);
    // min speed defaults to zero when the column is omitted.
    assert_eq!(track.segment(0).min_speed_m_s, 0.0);
}

#[test]
fn loads_a_track_from_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "track.toml",
        r#"
length_m = [500.0]
max_speed_m_s = [30.0]
min_speed_m_s = [5.0]
slope_rad = [0.0]
bend_radius_m = [inf]
tunnel = [false]
"#,
    );
    let track = load_track(&path).unwrap();
    assert_eq!(track.len(), 1);
    assert!((track.segment(0).min_speed_m_s - 5.0).abs() < 1e-9);
    assert!(track.segment(0).bend_radius_m.is_infinite());
}

#[test]
fn speed_limits_quoted_in_kmh_are_converted() {
    use rail_core::units::{kmh_to_ms, ms_to_kmh};

    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "track.yaml",
        r#"
length_m: [500.0, 500.0]
max_speed_kmh: [108.0, 54.0]
slope_rad: [0.0, 0.0]
bend_radius_m: [.inf, .inf]
tunnel: [false, false]
"#,
    );
    let track = load_track(&path).unwrap();
    assert!((track.segment(0).max_speed_m_s - 30.0).abs() < 1e-9);
    assert!((track.segment(1).max_speed_m_s - kmh_to_ms(54.0)).abs() < 1e-9);
    assert!((ms_to_kmh(track.segment(1).max_speed_m_s) - 54.0).abs() < 1e-9);
}

#[test]
fn loads_a_train_from_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "train.yaml",
        r#"
mass_kg: 507000.0
mass_factor: 1.06
max_brake_n: 447500.0
max_traction_n: 300000.0
basic_resistance: [2.7613412228796843e-8, 5.057199211045365e-11]
"#,
    );
    let train = load_train(&path).unwrap();
    assert!((train.mass_kg - 507000.0).abs() < 1e-9);
    assert_eq!(train.velocity_m_s, 0.0);
    assert!((train.max_brake_n() - 447500.0).abs() < 1e-9);
}

#[test]
fn loads_a_train_from_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "train.toml",
        r#"
mass_kg = 50000.0
mass_factor = 1.06
velocity_m_s = 10.0
max_brake_n = 200000.0
max_traction_n = 200000.0
basic_resistance = [0.002, 5e-5]
"#,
    );
    let train = load_train(&path).unwrap();
    assert!((train.velocity_m_s - 10.0).abs() < 1e-9);
    assert!((train.basic_resistance.1 - 5e-5).abs() < 1e-15);
}

#[test]
fn model_validation_failures_surface_as_config_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "track.yaml",
        r#"
length_m: [500.0]
max_speed_m_s: [10.0]
min_speed_m_s: [20.0]
slope_rad: [0.0]
bend_radius_m: [.inf]
tunnel: [false]
"#,
    );
    let err = load_track(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Model(_)));
}

#[test]
fn malformed_yaml_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "track.yaml", "length_m: [not a number]");
    let err = load_track(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load_track("/nonexistent/track.yaml").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}
