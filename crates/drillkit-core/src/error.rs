//! Error handling for DrillKit
//!
//! Provides error types shared by every layer of the conversion pipeline:
//! - Drill file errors (tool list parsing)
//! - Output errors (writing and committing derived artifacts), wrapped with
//!   I/O errors in the crate `Error`
//!
//! All error types use `thiserror` for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

/// Drill file error type
///
/// Represents errors raised while reading the raw drill file. Every variant
/// is fatal for the run; no partial tool table is ever returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DrillFileError {
    /// No line starting with the first tool marker was found
    #[error("No tool list found: expected a line starting with {marker}")]
    MissingToolList {
        /// The marker that opens the tool list.
        marker: String,
    },

    /// A tool list entry could not be parsed
    #[error("Malformed tool entry at line {line_number} ({line:?}): {reason}")]
    MalformedToolEntry {
        /// The 1-based line number of the entry.
        line_number: usize,
        /// The offending line, trimmed.
        line: String,
        /// Why the entry was rejected.
        reason: String,
    },

    /// Input ended before the tool list sentinel
    #[error("Unexpected end of input while reading the tool list (no '%' sentinel)")]
    UnterminatedToolList,

    /// The same tool identifier was declared twice
    #[error("Tool {tool_id} declared more than once")]
    DuplicateTool {
        /// The repeated identifier.
        tool_id: String,
    },
}

/// Output error type
///
/// Represents errors while producing the derived artifacts on disk.
#[derive(Error, Debug)]
pub enum OutputError {
    /// Input file does not exist
    #[error("Input file does not exist: {}", path.display())]
    InputNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// Input path has no usable base name
    #[error("Cannot derive an output name from {}", path.display())]
    InvalidInputName {
        /// The path without a file stem.
        path: PathBuf,
    },

    /// A derived artifact would replace the input file
    #[error("Output {} would overwrite the input file", path.display())]
    OverwritesInput {
        /// The conflicting output path.
        path: PathBuf,
    },

    /// A derived artifact could not be finalized
    #[error("Failed to commit {}: {reason}", path.display())]
    CommitFailed {
        /// The destination path.
        path: PathBuf,
        /// The reason the commit failed.
        reason: String,
    },
}

/// Main error type for DrillKit
///
/// Errors of the output layer, including the I/O underneath it.
#[derive(Error, Debug)]
pub enum Error {
    /// Output error
    #[error(transparent)]
    Output(#[from] OutputError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
