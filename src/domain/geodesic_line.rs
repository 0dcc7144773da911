use crate::antimeridian::GeometryError;
use crate::domain::GeoPoint;

/// An ordered polyline of at least two vertices.
#[derive(Clone, Debug, PartialEq)]
pub struct GeodesicLine {
    points: Vec<GeoPoint>,
}

impl GeodesicLine {
    pub fn new(points: Vec<GeoPoint>) -> Result<Self, GeometryError> {
        if points.len() < 2 {
            return Err(GeometryError::TooFewPoints(points.len()));
        }

        Ok(GeodesicLine { points })
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn start(&self) -> GeoPoint {
        self.points[0]
    }

    pub fn end(&self) -> GeoPoint {
        self.points[self.points.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn into_points(self) -> Vec<GeoPoint> {
        self.points
    }
}

/// Output of the antimeridian normalizer.
///
/// A `Multi` geometry holds the parts of a line that was cut at ±180°. Every part but the last ends
/// with a synthetic vertex on the antimeridian and every part but the first starts with its mirror
/// image on the opposite side.
#[derive(Clone, Debug, PartialEq)]
pub enum NormalizedGeometry {
    Single(GeodesicLine),
    Multi(Vec<GeodesicLine>),
}

impl NormalizedGeometry {
    pub fn is_multi(&self) -> bool {
        matches!(self, NormalizedGeometry::Multi(_))
    }

    pub fn segments(&self) -> &[GeodesicLine] {
        match self {
            NormalizedGeometry::Single(line) => std::slice::from_ref(line),
            NormalizedGeometry::Multi(segments) => segments,
        }
    }

    /// Rebuilds the vertex sequence that was normalized by dropping the synthetic split vertices.
    pub fn rejoin(&self) -> Vec<GeoPoint> {
        let segments = self.segments();
        let Some(last) = segments.len().checked_sub(1) else {
            return Vec::new();
        };

        segments
            .iter()
            .enumerate()
            .flat_map(|(i, segment)| {
                let points = segment.points();
                let from = if i == 0 { 0 } else { 1 };
                let to = if i == last { points.len() } else { points.len() - 1 };
                points[from..to].iter().copied()
            })
            .collect()
    }
}
