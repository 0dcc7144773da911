use crate::batch::{BatchJob, OutputSettings};
use crate::domain::{EndpointPair, GeoPoint, PropertyBag};
use crate::geodesy::{GeodesyError, SamplingSpec};
use crate::gis_writer::{OutputFormat, WGS84_EPSG};
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default)]
    sampling: Sampling,
    output: Output,
    lines: Vec<Line>,
    #[serde(default)]
    properties: Vec<PropertyBag>,
}

impl AppConfig {
    /// Layers `config.toml`, an optional `config_local.toml` and `GEODESIC__*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config").required(true))
            .add_source(File::with_name("config_local").required(false))
            .add_source(Environment::with_prefix("GEODESIC").separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Config::builder().add_source(File::from_str(content, FileFormat::Toml)).build()?.try_deserialize()
    }

    pub fn log_level(&self) -> Result<Level, AppConfigError> {
        self.log_level.parse().map_err(|_| AppConfigError::InvalidLogLevel(self.log_level.clone()))
    }

    pub fn sampling(&self) -> &Sampling {
        &self.sampling
    }

    pub fn output(&self) -> &Output {
        &self.output
    }

    pub fn batch_job(&self) -> Result<BatchJob, AppConfigError> {
        Ok(BatchJob {
            entries: self.lines.iter().map(|line| EndpointPair::new(line.start, line.end)).collect(),
            properties: self.properties.clone(),
            sampling: SamplingSpec::new(self.sampling.spacing_km)?,
            output: OutputSettings {
                directory: self.output.directory.clone(),
                layer_name: self.output.layer_name.clone(),
                format: self.output.format,
                epsg: self.output.epsg,
                also_geojson: self.output.also_geojson,
                antimeridian_cutting: self.output.antimeridian_cutting,
            },
        })
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize)]
pub struct Sampling {
    spacing_km: f64,
}

impl Sampling {
    pub fn spacing_km(&self) -> f64 {
        self.spacing_km
    }
}

impl Default for Sampling {
    fn default() -> Self {
        Sampling {
            spacing_km: SamplingSpec::default().spacing_km(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Output {
    directory: PathBuf,
    layer_name: String,
    #[serde(default = "default_format")]
    format: OutputFormat,
    #[serde(default = "default_epsg")]
    epsg: u32,
    #[serde(default = "enabled")]
    also_geojson: bool,
    #[serde(default = "enabled")]
    antimeridian_cutting: bool,
}

impl Output {
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

fn default_format() -> OutputFormat {
    OutputFormat::Shapefile
}

fn default_epsg() -> u32 {
    WGS84_EPSG
}

fn enabled() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct Line {
    start: GeoPoint,
    end: GeoPoint,
}

#[derive(Error, Debug)]
pub enum AppConfigError {
    #[error("invalid log level '{0}', expected trace, debug, info, warn or error")]
    InvalidLogLevel(String),
    #[error("invalid sampling configuration: {0}")]
    InvalidSampling(#[from] GeodesyError),
}
