use crate::domain::{EndpointPair, GeoPoint, GeodesicLine};
use geographiclib_rs::{DirectGeodesic, Geodesic, InverseGeodesic};
use thiserror::Error;
use tracing::{debug, info, instrument};

const DEFAULT_SPACING_KM: f64 = 20.0;

/// Upper bound on the intermediate points of a single line.
pub const MAX_POINTS: usize = 10_000_000;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplingSpec {
    spacing_km: f64,
}

impl SamplingSpec {
    pub fn new(spacing_km: f64) -> Result<Self, GeodesyError> {
        if !(spacing_km.is_finite() && spacing_km > 0.0) {
            return Err(GeodesyError::InvalidSpacing(spacing_km));
        }

        Ok(SamplingSpec { spacing_km })
    }

    pub fn spacing_km(&self) -> f64 {
        self.spacing_km
    }

    /// Number of intermediate points for a line of `distance_m` meters.
    pub fn point_count(&self, distance_m: f64) -> Result<usize, GeodesyError> {
        let count = (distance_m.ceil() / (self.spacing_km * 1000.0)).trunc();
        if !(count.is_finite() && count <= MAX_POINTS as f64) {
            return Err(GeodesyError::TooManyPoints {
                spacing_km: self.spacing_km,
                distance_m,
            });
        }

        Ok(count as usize)
    }
}

impl Default for SamplingSpec {
    fn default() -> Self {
        SamplingSpec {
            spacing_km: DEFAULT_SPACING_KM,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InverseSolution {
    pub distance_m: f64,
    pub azimuth_deg: f64,
}

/// Solves the inverse geodesic problem between the endpoints on the WGS84 ellipsoid.
pub fn inverse(pair: &EndpointPair) -> Result<InverseSolution, GeodesyError> {
    let (start, end) = (pair.start(), pair.end());
    let (distance_m, azimuth_deg, _back_azimuth, _arc): (f64, f64, f64, f64) =
        Geodesic::wgs84().inverse(start.latitude(), start.longitude(), end.latitude(), end.longitude());

    if !(distance_m.is_finite() && azimuth_deg.is_finite()) {
        return Err(GeodesyError::NonConvergence { pair: *pair });
    }

    Ok(InverseSolution { distance_m, azimuth_deg })
}

/// Densifies the geodesic between the endpoints into a polyline with roughly `spec.spacing_km()`
/// between consecutive vertices. The endpoints are always part of the result, so a zero length
/// line comes back as `[start, end]`.
#[instrument(fields(pair = %pair), skip_all)]
pub fn compute(pair: &EndpointPair, spec: &SamplingSpec) -> Result<GeodesicLine, GeodesyError> {
    let geodesic = Geodesic::wgs84();
    let solution = inverse(pair)?;
    let count = spec.point_count(solution.distance_m)?;
    debug!(distance_m = solution.distance_m, azimuth = solution.azimuth_deg, "🌐 Solved inverse problem");

    let start = pair.start();
    let step = solution.distance_m / count.saturating_add(1) as f64;

    let mut points = Vec::with_capacity(count.saturating_add(2));
    points.push(start);
    for i in 1..=count {
        let (latitude, longitude): (f64, f64) = geodesic.direct(start.latitude(), start.longitude(), solution.azimuth_deg, step * i as f64);
        points.push(solved_point(pair, longitude, latitude)?);
    }
    points.push(pair.end());

    info!("🌐 Geodesic line successfully created");
    info!("🌐 Total points = {}", count);
    info!("🌐 {:.4} km", solution.distance_m / 1000.0);

    GeodesicLine::new(points).map_err(|_| GeodesyError::NonConvergence { pair: *pair })
}

fn solved_point(pair: &EndpointPair, longitude: f64, latitude: f64) -> Result<GeoPoint, GeodesyError> {
    if !(longitude.is_finite() && latitude.is_finite()) {
        return Err(GeodesyError::NonConvergence { pair: *pair });
    }

    // The solver reports longitudes in [-180, 180] but may overshoot the poles by an ulp
    Ok(GeoPoint::from_valid(longitude.clamp(-180.0, 180.0), latitude.clamp(-90.0, 90.0)))
}

#[derive(Error, Debug)]
pub enum GeodesyError {
    #[error("invalid longitude: {0}, must be between -180 and 180")]
    InvalidLongitude(f64),
    #[error("invalid latitude: {0}, must be between -90 and 90")]
    InvalidLatitude(f64),
    #[error("invalid point spacing: {0} km, must be greater than 0")]
    InvalidSpacing(f64),
    #[error("a spacing of {spacing_km} km over {distance_m} m needs more than {max} points", max = MAX_POINTS)]
    TooManyPoints { spacing_km: f64, distance_m: f64 },
    #[error("the geodesic solver did not converge for {pair}")]
    NonConvergence { pair: EndpointPair },
}
