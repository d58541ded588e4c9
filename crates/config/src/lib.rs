//! Configuration models and loaders for the rail trajectory planner.
//!
//! Track and train records are plain structured data; the core engines only
//! require that the loader produces a [`Track`] and a [`Train`] satisfying
//! the model invariants. Files may be YAML or TOML; dispatch is by file
//! extension.

use std::fs::File;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use rail_model::{ModelError, Track, TrackColumns, Train};

/// Track description parsed from scenario manifests: per-attribute columns,
/// row `i` of every column describing segment `i`.
#[derive(Debug, Deserialize, Clone)]
pub struct TrackConfig {
    pub length_m: Vec<f64>,
    /// Speed limits in m/s; manifests quoting limits in km/h use
    /// `max_speed_kmh` instead.
    #[serde(default)]
    pub max_speed_m_s: Vec<f64>,
    /// Speed limits in km/h, ignored when `max_speed_m_s` is present.
    #[serde(default)]
    pub max_speed_kmh: Vec<f64>,
    /// Optional; zero for every segment when omitted.
    #[serde(default)]
    pub min_speed_m_s: Vec<f64>,
    pub slope_rad: Vec<f64>,
    /// Use `.inf` (YAML) or `inf` (TOML) for straight segments.
    pub bend_radius_m: Vec<f64>,
    pub tunnel: Vec<bool>,
}

/// Train description parsed from scenario manifests.
#[derive(Debug, Deserialize, Clone)]
pub struct TrainConfig {
    pub mass_kg: f64,
    pub mass_factor: f64,
    #[serde(default)]
    pub velocity_m_s: f64,
    pub max_brake_n: f64,
    pub max_traction_n: f64,
    /// Basic-resistance parameters `(a, b)`.
    pub basic_resistance: (f64, f64),
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid model data: {0}")]
    Model(#[from] ModelError),
}

impl TryFrom<TrackConfig> for Track {
    type Error = ModelError;

    fn try_from(config: TrackConfig) -> Result<Self, Self::Error> {
        let max_speed_m_s = if config.max_speed_m_s.is_empty() {
            config
                .max_speed_kmh
                .iter()
                .map(|&v| rail_core::units::kmh_to_ms(v))
                .collect()
        } else {
            config.max_speed_m_s
        };
        Track::from_columns(TrackColumns {
            length_m: config.length_m,
            max_speed_m_s,
            min_speed_m_s: config.min_speed_m_s,
            slope_rad: config.slope_rad,
            bend_radius_m: config.bend_radius_m,
            tunnel: config.tunnel,
        })
    }
}

impl TryFrom<TrainConfig> for Train {
    type Error = ModelError;

    fn try_from(config: TrainConfig) -> Result<Self, Self::Error> {
        Train::new(
            config.mass_kg,
            config.mass_factor,
            config.velocity_m_s,
            config.max_brake_n,
            config.max_traction_n,
            config.basic_resistance,
        )
    }
}

/// Load a validated [`Track`] from a YAML or TOML file.
pub fn load_track<P: AsRef<Path>>(path: P) -> Result<Track, ConfigError> {
    let config: TrackConfig = load_record(path)?;
    Ok(config.try_into()?)
}

/// Load a validated [`Train`] from a YAML or TOML file.
pub fn load_train<P: AsRef<Path>>(path: P) -> Result<Train, ConfigError> {
    let config: TrainConfig = load_record(path)?;
    Ok(config.try_into()?)
}

fn load_record<T, P>(path: P) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}
