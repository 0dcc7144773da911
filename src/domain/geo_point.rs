use crate::geodesy::GeodesyError;
use std::fmt::Display;

/// A WGS84 longitude/latitude pair in decimal degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    longitude: f64,
    latitude: f64,
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, GeodesyError> {
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeodesyError::InvalidLongitude(longitude));
        }

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeodesyError::InvalidLatitude(latitude));
        }

        Ok(GeoPoint { longitude, latitude })
    }

    // Caller guarantees both values are already within range
    pub(crate) fn from_valid(longitude: f64, latitude: f64) -> Self {
        debug_assert!((-180.0..=180.0).contains(&longitude) && (-90.0..=90.0).contains(&latitude));
        GeoPoint { longitude, latitude }
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }
}

impl Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.longitude, self.latitude)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EndpointPair {
    start: GeoPoint,
    end: GeoPoint,
}

impl EndpointPair {
    pub fn new(start: GeoPoint, end: GeoPoint) -> Self {
        EndpointPair { start, end }
    }

    /// Builds a pair from `(start longitude, start latitude, end longitude, end latitude)`.
    pub fn from_lons_lats(lons_lats: (f64, f64, f64, f64)) -> Result<Self, GeodesyError> {
        let (start_lon, start_lat, end_lon, end_lat) = lons_lats;
        Ok(EndpointPair {
            start: GeoPoint::new(start_lon, start_lat)?,
            end: GeoPoint::new(end_lon, end_lat)?,
        })
    }

    pub fn start(&self) -> GeoPoint {
        self.start
    }

    pub fn end(&self) -> GeoPoint {
        self.end
    }
}

impl Display for EndpointPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.start, self.end)
    }
}
