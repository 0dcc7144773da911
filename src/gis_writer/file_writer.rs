use crate::extensions::path_ext::LayerPath;
use crate::gis_writer::{GisWriter, OutputFormat, WGS84_EPSG, WriteError, WriteRequest, esri_shapefile, geojson_file};
use std::path::PathBuf;
use tracing::{info, instrument};

/// Writes features to GeoJSON or ESRI Shapefile files on the local file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileGisWriter;

impl GisWriter for FileGisWriter {
    #[instrument(fields(layer = request.layer_name, format = %request.format), skip_all)]
    fn write(&self, request: &WriteRequest) -> Result<PathBuf, WriteError> {
        if !request.directory.is_dir() {
            return Err(WriteError::MissingDirectory(request.directory.to_path_buf()));
        }

        if request.epsg != WGS84_EPSG {
            return Err(WriteError::UnsupportedCrs(request.epsg));
        }

        let path = request.directory.layer_file(request.layer_name, request.format);
        info!("💾 Writing '{}'...", path.string_file_name());

        match request.format {
            OutputFormat::GeoJson => geojson_file::write(&path, request)?,
            OutputFormat::Shapefile => esri_shapefile::write(&path, request)?,
        }

        info!("💾 Writing '{}'... OK", path.string_file_name());
        Ok(path)
    }
}
