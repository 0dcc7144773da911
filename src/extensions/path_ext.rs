use crate::gis_writer::OutputFormat;
use std::path::{Path, PathBuf};

pub trait LayerPath {
    /// Path of the file holding `layer_name` in `format` inside this directory.
    fn layer_file(&self, layer_name: &str, format: OutputFormat) -> PathBuf;

    fn string_file_name(&self) -> &str;
}

impl LayerPath for Path {
    fn layer_file(&self, layer_name: &str, format: OutputFormat) -> PathBuf {
        self.join(format!("{}.{}", layer_name, format.extension()))
    }

    fn string_file_name(&self) -> &str {
        self.file_name().and_then(|s| s.to_str()).unwrap_or("unknown")
    }
}
