//! Command-line entry point: parse arguments, load options, run the export.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;

use cli::Cli;
use post_export::{ExportConfig, run};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!(version = env!("CARGO_PKG_VERSION"), "post_export starting up");

    let args = Cli::parse();
    debug!(?args.site_dir, ?args.build_dir, ?args.config, "Parsed CLI arguments");

    let config = match ExportConfig::load(args.config.as_deref()).await {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid export options");
            return Err(e.into());
        }
    };
    debug!(?config, "Export options");

    let summary = match run(&config, &args.site_dir, &args.build_dir).await {
        Ok(summary) => summary,
        Err(e) => {
            error!(error = %e, "Export aborted");
            return Err(e.into());
        }
    };

    for path in &summary.paths {
        info!(
            export_path = %path.export_path,
            found = path.found,
            admitted = path.admitted,
            excluded = path.excluded,
            skipped = path.skipped,
            files_written = path.files_written,
            "Export path summary"
        );
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        output = %summary.output_root.display(),
        "Execution complete"
    );

    Ok(())
}
