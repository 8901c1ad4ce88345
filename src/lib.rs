//! # DrillKit
//!
//! Converts the raw drill file of a PCB fabrication export into the files
//! used at the workshop drill stations:
//!
//! - a cleaned `.exc` file for the drill plotter
//! - a tool table report flagging drills that are not in stock
//! - a line-numbered NC drilling program with speeds and feeds
//!
//! ## Architecture
//!
//! DrillKit is organized as a workspace with multiple crates:
//!
//! 1. **drillkit-core** - Shared errors, coordinate format, unit conversion
//! 2. **drillkit-camtools** - Drill file reader, cleaner, report and NC generators
//! 3. **drillkit-settings** - Configuration files
//! 4. **drillkit** - Export pipeline, transactional output and the CLI

pub mod export;
pub mod output;

pub use drillkit_camtools::{
    CalculationResult, CleanedDrillFile, DrillFile, DrillFileReader, DrillHit, ExcellonCleaner,
    NcProgram, NcProgramGenerator, NcProgramParameters, SpeedsFeedsCalculator, Tool, ToolTable,
    ToolReportParameters, ToolTableFormatter,
};
pub use drillkit_core::{CoordinateFormat, DrillFileError, Error, OutputError, Result};
pub use drillkit_settings::{Config, OutputSettings};
pub use export::{ExportSummary, FabricationExport, OutputPaths};
pub use output::OutputTransaction;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Log filter: `RUST_LOG` when set, INFO otherwise; `verbose` adds DEBUG
fn log_filter(verbose: bool, rust_log: Option<&str>) -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::EnvFilter;

    let default = tracing::Level::INFO.as_str();
    let filter = rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default));

    if verbose {
        filter.add_directive(tracing::Level::DEBUG.into())
    } else {
        filter
    }
}

/// Initialize logging
///
/// Log lines go to stderr so stdout stays free for the JSON summary.
pub fn init_logging(verbose: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let rust_log = std::env::var(tracing_subscriber::EnvFilter::DEFAULT_ENV).ok();
    let env_filter = log_filter(verbose, rust_log.as_deref());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_level(true)
        .with_line_number(verbose);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
