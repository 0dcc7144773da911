use crate::domain::PropertyBag;
use crate::gis_writer::{WriteError, WriteRequest};
use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};
use shapefile::{Point, Polyline, Writer};
use std::fs;
use std::path::Path;

const WGS84_WKT: &str = r#"GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137.0,298.257223563]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]]"#;

// Column written when a feature has no attributes, a dBase table needs at least one field
const DEFAULT_FIELD: &str = "prop";
const MAX_FIELD_LENGTH: usize = 254;

/// Writes the geometry as a single polyline record with one part per segment.
pub(super) fn write(path: &Path, request: &WriteRequest) -> Result<(), WriteError> {
    let (table_builder, record) = attribute_table(request.properties)?;

    let parts = request
        .geometry
        .segments()
        .iter()
        .map(|segment| segment.points().iter().map(|p| Point::new(p.longitude(), p.latitude())).collect())
        .collect();
    let polyline = Polyline::with_parts(parts);

    let mut writer = Writer::from_path(path, table_builder)?;
    writer.write_shape_and_record(&polyline, &record)?;
    drop(writer);

    fs::write(path.with_extension("prj"), WGS84_WKT)?;
    Ok(())
}

fn attribute_table(properties: &PropertyBag) -> Result<(TableWriterBuilder, Record), WriteError> {
    let mut table_builder = TableWriterBuilder::new();
    let mut record = Record::default();

    if properties.is_empty() {
        let name = field_name(DEFAULT_FIELD)?;
        table_builder = table_builder.add_character_field(name, 80);
        record.insert(DEFAULT_FIELD.to_string(), FieldValue::Character(None));
        return Ok((table_builder, record));
    }

    for (key, value) in properties.iter() {
        if value.len() > MAX_FIELD_LENGTH {
            return Err(WriteError::AttributeTooLong(key.to_string()));
        }

        table_builder = table_builder.add_character_field(field_name(key)?, value.len().max(1) as u8);
        record.insert(key.to_string(), FieldValue::Character(Some(value.to_string())));
    }

    Ok((table_builder, record))
}

fn field_name(name: &str) -> Result<FieldName, WriteError> {
    FieldName::try_from(name).map_err(|e| WriteError::InvalidFieldName {
        name: name.to_string(),
        reason: format!("{:?}", e),
    })
}
