use crate::domain::{GeoPoint, GeodesicLine, NormalizedGeometry};
use thiserror::Error;
use tracing::{debug, instrument};

/// Cuts a polyline wherever consecutive vertices jump more than 180° in longitude.
///
/// A line without such a jump comes back unchanged as a single part. Otherwise every jump is
/// treated as a wrap over the antimeridian: the next vertex is offset by ±360° so the crossing can
/// be located on a continuous axis, a vertex at ±180° is interpolated at the crossing latitude, and
/// the line is split there with each part keeping its own side of the antimeridian.
#[instrument(fields(points = points.len()), skip_all)]
pub fn normalize(points: &[GeoPoint]) -> Result<NormalizedGeometry, GeometryError> {
    if points.len() < 2 {
        return Err(GeometryError::TooFewPoints(points.len()));
    }

    let mut parts: Vec<Vec<GeoPoint>> = Vec::new();
    let mut current = vec![points[0]];

    for pair in points.windows(2) {
        let (from, to) = (&pair[0], &pair[1]);
        if let Some(crossing) = Crossing::between(from, to) {
            debug!(at = crossing.latitude, "✂️ Antimeridian crossing between {} and {}", from, to);
            current.push(crossing.exit());
            parts.push(std::mem::replace(&mut current, vec![crossing.entry()]));
        }
        current.push(*to);
    }

    if parts.is_empty() {
        return Ok(NormalizedGeometry::Single(GeodesicLine::new(current)?));
    }

    parts.push(current);
    debug!("✂️ Split line into {} parts", parts.len());

    let segments = parts.into_iter().map(GeodesicLine::new).collect::<Result<Vec<_>, _>>()?;
    Ok(NormalizedGeometry::Multi(segments))
}

/// Whether any pair of consecutive vertices wraps over the antimeridian.
pub fn crosses_antimeridian(points: &[GeoPoint]) -> bool {
    points.windows(2).any(|pair| is_wrapped(pair[0].longitude(), pair[1].longitude()))
}

fn is_wrapped(from: f64, to: f64) -> bool {
    (to - from).abs() > 180.0
}

struct Crossing {
    // Longitude of the antimeridian as seen from the side the line leaves, +180 when heading east
    boundary: f64,
    latitude: f64,
}

impl Crossing {
    fn between(from: &GeoPoint, to: &GeoPoint) -> Option<Crossing> {
        if !is_wrapped(from.longitude(), to.longitude()) {
            return None;
        }

        let delta = to.longitude() - from.longitude();
        let (offset, boundary) = if delta < 0.0 { (360.0, 180.0) } else { (-360.0, -180.0) };

        let span = to.longitude() + offset - from.longitude();
        let t = if span == 0.0 { 0.0 } else { (boundary - from.longitude()) / span };
        let latitude = from.latitude() + t * (to.latitude() - from.latitude());

        Some(Crossing { boundary, latitude })
    }

    fn exit(&self) -> GeoPoint {
        GeoPoint::from_valid(self.boundary, self.latitude)
    }

    fn entry(&self) -> GeoPoint {
        GeoPoint::from_valid(-self.boundary, self.latitude)
    }
}

#[derive(Error, Debug)]
pub enum GeometryError {
    #[error("a line needs at least 2 points, found {0}")]
    TooFewPoints(usize),
}
