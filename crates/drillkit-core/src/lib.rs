//! # DrillKit Core
//!
//! Core types and utilities for DrillKit.
//! Provides the shared error types and the unit conversions used by the
//! drill file reader, report writer and machining program generator.

pub mod error;
pub mod units;

pub use error::{DrillFileError, Error, OutputError, Result};
pub use units::{encode_latin1, format_mm, inch_to_mm, CoordinateFormat, MM_PER_INCH};
