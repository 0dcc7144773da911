use crate::gis_writer::WriteError;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Shapefile,
    GeoJson,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Shapefile => "shp",
            OutputFormat::GeoJson => "geojson",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = WriteError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "esri shapefile" | "shapefile" | "shp" => Ok(OutputFormat::Shapefile),
            "geojson" | "json" => Ok(OutputFormat::GeoJson),
            _ => Err(WriteError::UnsupportedFormat(value.to_string())),
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Shapefile => write!(f, "ESRI Shapefile"),
            OutputFormat::GeoJson => write!(f, "GeoJSON"),
        }
    }
}
