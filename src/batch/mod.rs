mod runner;

pub use runner::{BatchError, BatchJob, BatchReport, EntryError, EntryFailure, EntryOutput, OutputSettings, run_batch};
