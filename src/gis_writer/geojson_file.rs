use crate::domain::{GeodesicLine, NormalizedGeometry, PropertyBag};
use crate::gis_writer::{WriteError, WriteRequest};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Serialize)]
#[serde(tag = "type")]
struct FeatureCollection<'a> {
    name: &'a str,
    features: Vec<Feature<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
struct Feature<'a> {
    properties: &'a PropertyBag,
    geometry: Geometry,
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(tag = "type")]
enum Geometry {
    LineString { coordinates: Vec<[f64; 2]> },
    MultiLineString { coordinates: Vec<Vec<[f64; 2]>> },
}

impl From<&NormalizedGeometry> for Geometry {
    fn from(geometry: &NormalizedGeometry) -> Self {
        match geometry {
            NormalizedGeometry::Single(line) => Geometry::LineString { coordinates: positions(line) },
            NormalizedGeometry::Multi(segments) => Geometry::MultiLineString {
                coordinates: segments.iter().map(positions).collect(),
            },
        }
    }
}

fn positions(line: &GeodesicLine) -> Vec<[f64; 2]> {
    line.points().iter().map(|p| [p.longitude(), p.latitude()]).collect()
}

// Replaces an existing file at `path`
pub(super) fn write(path: &Path, request: &WriteRequest) -> Result<(), WriteError> {
    let collection = FeatureCollection {
        name: request.layer_name,
        features: vec![Feature {
            properties: request.properties,
            geometry: Geometry::from(request.geometry),
        }],
    };

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, &collection)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GeoPoint;
    use crate::gis_writer::{OutputFormat, WGS84_EPSG};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use std::env::temp_dir;
    use std::fs;

    fn line(points: &[(f64, f64)]) -> GeodesicLine {
        GeodesicLine::new(points.iter().map(|&(lon, lat)| GeoPoint::new(lon, lat).unwrap()).collect()).unwrap()
    }

    #[test]
    fn a_single_geometry_becomes_a_line_string() {
        let geometry = NormalizedGeometry::Single(line(&[(10.0, 0.0), (20.0, 5.0)]));

        assert_eq!(
            Geometry::from(&geometry),
            Geometry::LineString {
                coordinates: vec![[10.0, 0.0], [20.0, 5.0]]
            }
        );
    }

    #[test]
    fn a_multi_geometry_becomes_a_multi_line_string() {
        let geometry = NormalizedGeometry::Multi(vec![line(&[(179.0, 0.0), (180.0, 1.0)]), line(&[(-180.0, 1.0), (-179.0, 2.0)])]);

        let value = serde_json::to_value(Geometry::from(&geometry)).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "MultiLineString",
                "coordinates": [[[179.0, 0.0], [180.0, 1.0]], [[-180.0, 1.0], [-179.0, 2.0]]]
            })
        );
    }

    #[test]
    fn write_replaces_an_existing_file_with_a_feature_collection() -> Result<(), WriteError> {
        let directory = temp_dir().join("geodesic-lines-geojson");
        fs::create_dir_all(&directory)?;
        let path = directory.join("replaced.geojson");
        fs::write(&path, "stale content")?;

        let geometry = NormalizedGeometry::Single(line(&[(10.0, 0.0), (20.0, 5.0)]));
        let properties = PropertyBag::new().with("prop", "madrid-la");
        let request = WriteRequest {
            geometry: &geometry,
            properties: &properties,
            format: OutputFormat::GeoJson,
            directory: &directory,
            layer_name: "replaced",
            epsg: WGS84_EPSG,
        };

        write(&path, &request)?;

        let value: Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
        assert_eq!(
            value,
            json!({
                "type": "FeatureCollection",
                "name": "replaced",
                "features": [{
                    "type": "Feature",
                    "properties": { "prop": "madrid-la" },
                    "geometry": { "type": "LineString", "coordinates": [[10.0, 0.0], [20.0, 5.0]] }
                }]
            })
        );
        Ok(())
    }
}
