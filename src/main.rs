use geodesic_lines::app_config::AppConfig;
use geodesic_lines::batch::run_batch;
use geodesic_lines::gis_writer::FileGisWriter;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    tracing_subscriber::fmt().with_max_level(config.log_level()?).init();

    info!("🪵 Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let job = config.batch_job()?;
    let total = job.entries.len();
    info!("✅  Loaded configuration, {} line(s) to '{}'", total, config.output().directory().display());

    let report = run_batch(job, Arc::new(FileGisWriter)).await?;
    if !report.is_success() {
        for failure in &report.failures {
            error!("❌ Line {} ({}): {}", failure.index, failure.pair, failure.error);
        }
        return Err(format!("{} of {} line(s) failed", report.failures.len(), total).into());
    }

    info!("🔥 Wrote {} line(s)", report.written.len());
    Ok(())
}
