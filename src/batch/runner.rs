use crate::antimeridian::{self, GeometryError};
use crate::domain::{EndpointPair, NormalizedGeometry, PropertyBag};
use crate::geodesy::{self, GeodesyError, SamplingSpec};
use crate::gis_writer::{GisWriter, OutputFormat, WriteError, WriteRequest};
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::{self, JoinError};
use tracing::{info, instrument, warn};

#[derive(Clone, Debug, PartialEq)]
pub struct OutputSettings {
    pub directory: PathBuf,
    pub layer_name: String,
    pub format: OutputFormat,
    pub epsg: u32,
    pub also_geojson: bool,
    pub antimeridian_cutting: bool,
}

#[derive(Clone, Debug)]
pub struct BatchJob {
    pub entries: Vec<EndpointPair>,
    pub properties: Vec<PropertyBag>,
    pub sampling: SamplingSpec,
    pub output: OutputSettings,
}

impl BatchJob {
    // Either no properties at all or exactly one bag per entry
    fn properties_per_entry(&self) -> Result<Vec<PropertyBag>, BatchError> {
        match self.properties.len() {
            0 => Ok(vec![PropertyBag::new(); self.entries.len()]),
            n if n == self.entries.len() => Ok(self.properties.clone()),
            n => Err(BatchError::PropertyCountMismatch {
                entries: self.entries.len(),
                properties: n,
            }),
        }
    }
}

/// Computes, normalizes and writes every entry of the job concurrently.
///
/// A failing entry does not stop the others, it is reported in the returned [`BatchReport`].
#[instrument(fields(entries = job.entries.len()), skip_all)]
pub async fn run_batch(job: BatchJob, writer: Arc<dyn GisWriter>) -> Result<BatchReport, BatchError> {
    let properties = job.properties_per_entry()?;
    info!("🚀 Running batch...");

    let output = Arc::new(job.output);
    let sampling = job.sampling;

    let results: Vec<Result<EntryOutput, EntryFailure>> = FuturesUnordered::from_iter(job.entries.into_iter().zip(properties).enumerate().map(
        |(index, (pair, properties))| {
            let output = output.clone();
            let writer = writer.clone();
            async move {
                let result = task::spawn_blocking(move || process_entry(index, &pair, &properties, &sampling, &output, writer.as_ref()))
                    .await
                    .unwrap_or_else(|e| Err(EntryError::Join(e)));

                result.map(|files| EntryOutput { index, files }).map_err(|error| EntryFailure { index, pair, error })
            }
        },
    ))
    .collect()
    .await;

    let mut report = BatchReport::default();
    for result in results {
        match result {
            Ok(output) => report.written.push(output),
            Err(failure) => {
                warn!("⚠️ Entry {} ({}) failed: {}", failure.index, failure.pair, failure.error);
                report.failures.push(failure);
            }
        }
    }
    report.written.sort_by_key(|output| output.index);
    report.failures.sort_by_key(|failure| failure.index);

    info!("🚀 Running batch... OK, {} written, {} failed", report.written.len(), report.failures.len());
    Ok(report)
}

#[instrument(fields(entry = index), skip_all)]
fn process_entry(
    index: usize,
    pair: &EndpointPair,
    properties: &PropertyBag,
    sampling: &SamplingSpec,
    output: &OutputSettings,
    writer: &dyn GisWriter,
) -> Result<Vec<PathBuf>, EntryError> {
    let line = geodesy::compute(pair, sampling)?;
    let geometry = if output.antimeridian_cutting {
        antimeridian::normalize(line.points())?
    } else {
        NormalizedGeometry::Single(line)
    };

    let layer_name = format!("{}{}", output.layer_name, index);
    let mut formats = vec![output.format];
    if output.also_geojson && output.format != OutputFormat::GeoJson {
        formats.push(OutputFormat::GeoJson);
    }

    formats
        .into_iter()
        .map(|format| {
            let request = WriteRequest {
                geometry: &geometry,
                properties,
                format,
                directory: &output.directory,
                layer_name: &layer_name,
                epsg: output.epsg,
            };
            writer.write(&request).map_err(EntryError::from)
        })
        .collect()
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub written: Vec<EntryOutput>,
    pub failures: Vec<EntryFailure>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, PartialEq)]
pub struct EntryOutput {
    pub index: usize,
    pub files: Vec<PathBuf>,
}

#[derive(Debug)]
pub struct EntryFailure {
    pub index: usize,
    pub pair: EndpointPair,
    pub error: EntryError,
}

#[derive(Error, Debug)]
pub enum EntryError {
    #[error(transparent)]
    Geodesy(#[from] GeodesyError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Write(#[from] WriteError),
    #[error(transparent)]
    Join(#[from] JoinError),
}

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("found {properties} property sets for {entries} lines, provide none or exactly one per line")]
    PropertyCountMismatch { entries: usize, properties: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gis_writer::{FileGisWriter, WGS84_EPSG};
    use pretty_assertions::assert_eq;
    use std::env::temp_dir;
    use std::fs;
    use std::sync::Mutex;
    use test_log::test;

    #[derive(Debug, Clone, PartialEq)]
    struct RecordedWrite {
        layer_name: String,
        format: OutputFormat,
        multi: bool,
        properties: PropertyBag,
    }

    #[derive(Default)]
    struct RecordingWriter {
        writes: Mutex<Vec<RecordedWrite>>,
        failing_layer: Option<String>,
    }

    impl RecordingWriter {
        fn failing_on(layer_name: &str) -> Self {
            RecordingWriter {
                writes: Mutex::new(vec![]),
                failing_layer: Some(layer_name.to_string()),
            }
        }

        fn writes(&self) -> Vec<RecordedWrite> {
            let mut writes = self.writes.lock().unwrap().clone();
            writes.sort_by(|a, b| (&a.layer_name, a.format.extension()).cmp(&(&b.layer_name, b.format.extension())));
            writes
        }
    }

    impl GisWriter for RecordingWriter {
        fn write(&self, request: &WriteRequest) -> Result<PathBuf, WriteError> {
            if self.failing_layer.as_deref() == Some(request.layer_name) {
                return Err(WriteError::MissingDirectory(request.directory.to_path_buf()));
            }

            self.writes.lock().unwrap().push(RecordedWrite {
                layer_name: request.layer_name.to_string(),
                format: request.format,
                multi: request.geometry.is_multi(),
                properties: request.properties.clone(),
            });
            Ok(request.directory.join(request.layer_name))
        }
    }

    fn entries(lons_lats: &[(f64, f64, f64, f64)]) -> Vec<EndpointPair> {
        lons_lats.iter().map(|&l| EndpointPair::from_lons_lats(l).unwrap()).collect()
    }

    fn job(entries: Vec<EndpointPair>, properties: Vec<PropertyBag>) -> BatchJob {
        BatchJob {
            entries,
            properties,
            sampling: SamplingSpec::default(),
            output: OutputSettings {
                directory: temp_dir(),
                layer_name: "geodesicline".to_string(),
                format: OutputFormat::Shapefile,
                epsg: WGS84_EPSG,
                also_geojson: false,
                antimeridian_cutting: true,
            },
        }
    }

    fn write(layer_name: &str, format: OutputFormat, multi: bool) -> RecordedWrite {
        RecordedWrite {
            layer_name: layer_name.to_string(),
            format,
            multi,
            properties: PropertyBag::new(),
        }
    }

    #[test(tokio::test)]
    async fn fails_fast_when_the_property_count_does_not_match() {
        let writer = Arc::new(RecordingWriter::default());
        let job = job(entries(&[(-6.0, 37.0, -145.0, 11.0), (-150.0, 37.0, 140.0, 11.0)]), vec![PropertyBag::new()]);

        let result = run_batch(job, writer.clone()).await;

        assert!(matches!(result, Err(BatchError::PropertyCountMismatch { entries: 2, properties: 1 })));
        assert!(writer.writes().is_empty());
    }

    #[test(tokio::test)]
    async fn names_each_entry_after_its_ordinal() -> Result<(), BatchError> {
        let writer = Arc::new(RecordingWriter::default());
        let job = job(entries(&[(-3.6, 40.5, -118.4, 33.9), (-150.0, 37.0, 140.0, 11.0)]), vec![]);

        let report = run_batch(job, writer.clone()).await?;

        assert!(report.is_success());
        assert_eq!(report.written.iter().map(|o| o.index).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(
            writer.writes(),
            vec![write("geodesicline0", OutputFormat::Shapefile, false), write("geodesicline1", OutputFormat::Shapefile, true)]
        );
        Ok(())
    }

    #[test(tokio::test)]
    async fn attaches_the_properties_of_each_entry() -> Result<(), BatchError> {
        let writer = Arc::new(RecordingWriter::default());
        let properties = vec![PropertyBag::new().with("prop", "first"), PropertyBag::new().with("prop", "second")];
        let job = job(entries(&[(-6.0, 37.0, 120.0, 50.0), (-118.4, 33.9, 104.0, 1.35)]), properties.clone());

        run_batch(job, writer.clone()).await?;

        let written = writer.writes().into_iter().map(|w| w.properties).collect::<Vec<_>>();
        assert_eq!(written, properties);
        Ok(())
    }

    #[test(tokio::test)]
    async fn writes_an_additional_geojson_file_when_requested() -> Result<(), BatchError> {
        let writer = Arc::new(RecordingWriter::default());
        let mut job = job(entries(&[(-3.6, 40.5, -118.4, 33.9)]), vec![]);
        job.output.also_geojson = true;

        let report = run_batch(job, writer.clone()).await?;

        assert_eq!(report.written[0].files.len(), 2);
        assert_eq!(
            writer.writes(),
            vec![write("geodesicline0", OutputFormat::GeoJson, false), write("geodesicline0", OutputFormat::Shapefile, false)]
        );
        Ok(())
    }

    #[test(tokio::test)]
    async fn writes_the_unsplit_line_when_cutting_is_disabled() -> Result<(), BatchError> {
        let writer = Arc::new(RecordingWriter::default());
        let mut job = job(entries(&[(-150.0, 37.0, 140.0, 11.0)]), vec![]);
        job.output.antimeridian_cutting = false;

        run_batch(job, writer.clone()).await?;

        assert_eq!(writer.writes(), vec![write("geodesicline0", OutputFormat::Shapefile, false)]);
        Ok(())
    }

    #[test(tokio::test)]
    async fn continues_with_the_remaining_entries_after_a_failure() -> Result<(), BatchError> {
        let writer = Arc::new(RecordingWriter::failing_on("geodesicline1"));
        let job = job(entries(&[(-6.0, 37.0, -145.0, 11.0), (-150.0, 37.0, 140.0, 11.0), (-20.4, 33.9, 178.0, -33.9)]), vec![]);

        let report = run_batch(job, writer.clone()).await?;

        assert!(!report.is_success());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].index, 1);
        assert!(matches!(report.failures[0].error, EntryError::Write(WriteError::MissingDirectory(_))));
        assert_eq!(report.written.iter().map(|o| o.index).collect::<Vec<_>>(), vec![0, 2]);
        Ok(())
    }

    #[test(tokio::test)]
    async fn writes_files_for_every_entry() -> Result<(), Box<dyn std::error::Error>> {
        let directory = temp_dir().join("geodesic-lines-batch");
        fs::create_dir_all(&directory)?;
        let mut job = job(
            entries(&[
                (-6.0, 37.0, -145.0, 11.0),
                (-150.0, 37.0, 140.0, 11.0),
                (-6.0, 37.0, 120.0, 50.0),
                (-3.6, 40.5, -118.4, 33.9),
                (-118.4, 33.9, 139.8, 35.5),
                (-118.4, 33.9, 104.0, 1.35),
                (-118.4, 33.9, 151.0, -33.9),
                (-20.4, 33.9, 178.0, -33.9),
            ]),
            vec![],
        );
        job.output.directory = directory.clone();
        job.output.also_geojson = true;

        let report = run_batch(job, Arc::new(FileGisWriter)).await?;

        assert!(report.is_success(), "failures: {:?}", report.failures);
        for i in 0..8 {
            assert!(directory.join(format!("geodesicline{}.shp", i)).is_file());
            assert!(directory.join(format!("geodesicline{}.geojson", i)).is_file());
        }
        Ok(())
    }
}
