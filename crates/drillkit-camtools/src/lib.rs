//! # DrillKit CAM Tools
//!
//! Converts the drill file written by the PCB exporter into the artifacts
//! used in the workshop.
//!
//! ## CAM Tools Included
//!
//! - **Drill File Reader**: Tool table and per-tool hit lists from the raw drill file
//! - **Excellon Cleaner**: Plotter-ready `.exc` file
//! - **Tool Table Formatter**: Human-readable drill report with stock warnings
//! - **Speeds and Feeds**: Spindle speed and feed rate from the drill diameter
//! - **NC Program Generator**: Line-numbered drilling program

pub mod error;
pub mod exc_cleaner;
pub mod excellon;
pub mod nc_program;
pub mod speeds_feeds;
pub mod tool_table;

// Re-export commonly used items
pub use error::{CamToolError, CamToolResult, ParameterError, ParameterResult};
pub use exc_cleaner::{CleanedDrillFile, ExcellonCleaner};
pub use excellon::{
    CoordinateBlock, CoordinateBlocks, DrillFile, DrillFileReader, DrillHit, Tool, ToolTable,
};
pub use nc_program::{NcProgram, NcProgramGenerator, NcProgramParameters};
pub use speeds_feeds::{CalculationResult, SpeedsFeedsCalculator};
pub use tool_table::{ToolReportParameters, ToolTableFormatter};
