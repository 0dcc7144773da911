//! Densified geodesic lines between WGS84 points, cut at the antimeridian so that GIS clients
//! draw them without a stray segment across the whole map.
//!
//! [`geodesy::compute`] samples the line, [`antimeridian::normalize`] splits it where it wraps
//! around ±180° and [`gis_writer`] persists the result as GeoJSON or ESRI Shapefile.

pub mod antimeridian;
pub mod app_config;
pub mod batch;
pub mod domain;
mod extensions;
mod geo_point_deserializer;
pub mod geodesy;
pub mod gis_writer;
