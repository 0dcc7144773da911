mod esri_shapefile;
mod file_writer;
mod geojson_file;
mod output_format;
mod output_format_deserializer;

use crate::domain::{NormalizedGeometry, PropertyBag};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use file_writer::FileGisWriter;
pub use output_format::OutputFormat;

pub const WGS84_EPSG: u32 = 4326;

/// Everything needed to persist one feature.
#[derive(Debug, Clone, Copy)]
pub struct WriteRequest<'a> {
    pub geometry: &'a NormalizedGeometry,
    pub properties: &'a PropertyBag,
    pub format: OutputFormat,
    pub directory: &'a Path,
    pub layer_name: &'a str,
    pub epsg: u32,
}

pub trait GisWriter: Send + Sync {
    /// Writes the feature and returns the path of the primary file written.
    fn write(&self, request: &WriteRequest) -> Result<PathBuf, WriteError>;
}

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("output directory '{0}' does not exist, set a valid directory to store the file")]
    MissingDirectory(PathBuf),
    #[error("unsupported output format '{0}', expected 'ESRI Shapefile' or 'GeoJSON'")]
    UnsupportedFormat(String),
    #[error("unsupported coordinate reference system EPSG:{0}, only EPSG:4326 is supported")]
    UnsupportedCrs(u32),
    #[error("invalid attribute name '{name}': {reason}")]
    InvalidFieldName { name: String, reason: String },
    #[error("attribute '{0}' exceeds 254 bytes")]
    AttributeTooLong(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("failed to encode GeoJSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write shapefile: {0}")]
    Shapefile(#[from] shapefile::Error),
}
