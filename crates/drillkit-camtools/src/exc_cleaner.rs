//! Plotter file cleaner
//!
//! Produces the `.exc` file consumed by the drill plotter: the drill body
//! following the tool list sentinel, without any line carrying a `G` code and
//! with every `Y-` rewritten to `Y`. The header and the tool list are not
//! part of the plotter file. The rewrite is textual and only touches Y;
//! negative X values pass through unchanged.

use drillkit_core::DrillFileError;
use tracing::debug;

use crate::excellon::{DrillFileReader, ToolTable, FIRST_TOOL_MARKER, TOOL_LIST_SENTINEL};

/// Result of the cleaning pass
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedDrillFile {
    /// Tool table parsed by this pass
    pub tools: ToolTable,
    /// Cleaned file contents
    pub text: String,
    /// Number of lines dropped because they carried a `G` code
    pub dropped_lines: usize,
}

/// Textual cleaning pass over the raw drill file
#[derive(Debug, Default)]
pub struct ExcellonCleaner;

impl ExcellonCleaner {
    /// Parse the tool list, then clean the body that follows it.
    ///
    /// Nothing is produced when the tool list is malformed.
    pub fn clean(text: &str) -> Result<CleanedDrillFile, DrillFileError> {
        let tools = DrillFileReader::read_tool_table(text)?;
        let (text, dropped_lines) = Self::clean_text(drill_body(text));
        debug!("Cleaned drill file, {} G lines dropped", dropped_lines);
        Ok(CleanedDrillFile {
            tools,
            text,
            dropped_lines,
        })
    }

    /// Drop `G` lines and strip the sign after `Y`, keeping line endings as-is
    pub fn clean_text(text: &str) -> (String, usize) {
        let mut cleaned = String::with_capacity(text.len());
        let mut dropped = 0;
        for line in text.split_inclusive('\n') {
            if line.contains('G') {
                dropped += 1;
                continue;
            }
            cleaned.push_str(&line.replace("Y-", "Y"));
        }
        (cleaned, dropped)
    }
}

/// Text after the line that closes the tool list
fn drill_body(text: &str) -> &str {
    let mut in_tool_list = false;
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        offset += line.len();
        if !in_tool_list && line.trim_start().starts_with(FIRST_TOOL_MARKER) {
            in_tool_list = true;
        }
        if in_tool_list && line.contains(TOOL_LIST_SENTINEL) {
            return &text[offset..];
        }
    }
    ""
}
