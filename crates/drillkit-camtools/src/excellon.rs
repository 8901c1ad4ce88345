//! Drill file reader
//!
//! Parses the drill file written by the PCB exporter (absolute coordinates,
//! suppressed leading zeros, inch units, minimal header) into a sorted
//! [`ToolTable`] and one ordered [`CoordinateBlock`] per tool.
//!
//! The reader is a tagged-state scanner over the input lines:
//!
//! ```text
//! HeaderScan --"T1..."--> ToolList --"%"--> CoordScan --EOF--> Done
//! ```
//!
//! Running out of input in `HeaderScan` or `ToolList` is fatal, running out
//! in `CoordScan` simply ends the scan.

use std::collections::HashMap;
use std::sync::OnceLock;

use drillkit_core::{inch_to_mm, DrillFileError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Marker that opens the tool list
pub const FIRST_TOOL_MARKER: &str = "T1";

/// Character that terminates the tool list
pub const TOOL_LIST_SENTINEL: char = '%';

/// A drill tool declared in the tool list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Identifier as written in the file, e.g. `T1`
    pub id: String,
    /// Diameter in millimeters
    pub diameter_mm: f64,
}

impl Tool {
    /// Create a tool from its identifier and diameter in millimeters
    pub fn new(id: impl Into<String>, diameter_mm: f64) -> Self {
        Self {
            id: id.into(),
            diameter_mm,
        }
    }
}

/// Tools sorted ascending by diameter.
///
/// The sort is stable, so tools with equal diameters keep their file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolTable {
    tools: Vec<Tool>,
}

impl ToolTable {
    /// Build a table from tools in declaration order
    pub fn from_declared(mut tools: Vec<Tool>) -> Self {
        tools.sort_by(|a, b| a.diameter_mm.total_cmp(&b.diameter_mm));
        Self { tools }
    }

    /// Tools in sorted order
    pub fn iter(&self) -> std::slice::Iter<'_, Tool> {
        self.tools.iter()
    }

    /// Tools paired with their 1-based sequence number
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &Tool)> {
        self.tools.iter().enumerate().map(|(i, tool)| (i + 1, tool))
    }

    /// Look up a tool by identifier
    pub fn get(&self, id: &str) -> Option<&Tool> {
        self.tools.iter().find(|tool| tool.id == id)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn as_slice(&self) -> &[Tool] {
        &self.tools
    }
}

impl<'a> IntoIterator for &'a ToolTable {
    type Item = &'a Tool;
    type IntoIter = std::slice::Iter<'a, Tool>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A drilled position in native file units (fixed implicit decimal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrillHit {
    pub x: i64,
    pub y: i64,
}

impl DrillHit {
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Hits of one tool in file order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateBlock {
    pub tool_id: String,
    pub hits: Vec<DrillHit>,
}

/// Coordinate blocks keyed by tool identifier
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinateBlocks {
    blocks: Vec<CoordinateBlock>,
    index: HashMap<String, usize>,
}

impl CoordinateBlocks {
    /// Hits recorded for a tool; empty when the tool was never selected
    pub fn hits(&self, tool_id: &str) -> &[DrillHit] {
        self.index
            .get(tool_id)
            .and_then(|&i| self.blocks.get(i))
            .map(|block| block.hits.as_slice())
            .unwrap_or(&[])
    }

    /// Blocks in the order their tools were first selected
    pub fn iter(&self) -> std::slice::Iter<'_, CoordinateBlock> {
        self.blocks.iter()
    }

    /// Total number of hits over all tools
    pub fn hit_count(&self) -> usize {
        self.blocks.iter().map(|block| block.hits.len()).sum()
    }
}

/// Accumulates coordinate blocks during the scan
#[derive(Debug, Default)]
struct CoordinateBlocksBuilder {
    blocks: CoordinateBlocks,
}

impl CoordinateBlocksBuilder {
    /// Open the block for `tool_id`; a reselected tool continues its block
    fn open(&mut self, tool_id: &str) -> usize {
        if let Some(&i) = self.blocks.index.get(tool_id) {
            return i;
        }
        let i = self.blocks.blocks.len();
        self.blocks.blocks.push(CoordinateBlock {
            tool_id: tool_id.to_string(),
            hits: Vec::new(),
        });
        self.blocks.index.insert(tool_id.to_string(), i);
        i
    }

    fn push(&mut self, block: usize, hit: DrillHit) {
        if let Some(block) = self.blocks.blocks.get_mut(block) {
            block.hits.push(hit);
        }
    }

    fn build(self) -> CoordinateBlocks {
        self.blocks
    }
}

/// Everything extracted from one drill file
#[derive(Debug, Clone, PartialEq)]
pub struct DrillFile {
    pub tools: ToolTable,
    pub blocks: CoordinateBlocks,
}

impl DrillFile {
    /// Tools that have at least one hit, in table order
    pub fn drilled_tools(&self) -> impl Iterator<Item = (&Tool, &[DrillHit])> {
        self.tools
            .iter()
            .map(|tool| (tool, self.blocks.hits(&tool.id)))
            .filter(|(_, hits)| !hits.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    HeaderScan,
    ToolList,
    /// Index of the open coordinate block, if any
    CoordScan(Option<usize>),
    Done,
}

/// Line-oriented drill file reader with an explicit cursor
pub struct DrillFileReader<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    state: ScanState,
    declared: Vec<Tool>,
    blocks: CoordinateBlocksBuilder,
}

impl<'a> DrillFileReader<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
            state: ScanState::HeaderScan,
            declared: Vec::new(),
            blocks: CoordinateBlocksBuilder::default(),
        }
    }

    /// Parse the tool table only, stopping at the tool list sentinel
    pub fn read_tool_table(text: &'a str) -> Result<ToolTable, DrillFileError> {
        let mut reader = Self::new(text);
        while !matches!(reader.state, ScanState::CoordScan(_) | ScanState::Done) {
            reader.step()?;
        }
        Ok(ToolTable::from_declared(reader.declared))
    }

    /// Parse the tool table and every coordinate block
    pub fn parse(text: &'a str) -> Result<DrillFile, DrillFileError> {
        let mut reader = Self::new(text);
        while reader.state != ScanState::Done {
            reader.step()?;
        }

        let blocks = reader.blocks.build();
        let tools = ToolTable::from_declared(reader.declared);
        for block in blocks.iter() {
            if tools.get(&block.tool_id).is_none() && !block.hits.is_empty() {
                warn!(
                    "{} hits for undeclared tool {} are ignored",
                    block.hits.len(),
                    block.tool_id
                );
            }
        }
        debug!(
            "Parsed {} tools and {} hits",
            tools.len(),
            blocks.hit_count()
        );

        Ok(DrillFile { tools, blocks })
    }

    fn step(&mut self) -> Result<(), DrillFileError> {
        let Some((index, line)) = self.lines.next() else {
            return match self.state {
                ScanState::HeaderScan => Err(DrillFileError::MissingToolList {
                    marker: FIRST_TOOL_MARKER.to_string(),
                }),
                ScanState::ToolList => Err(DrillFileError::UnterminatedToolList),
                ScanState::CoordScan(_) | ScanState::Done => {
                    self.state = ScanState::Done;
                    Ok(())
                }
            };
        };
        let line_number = index + 1;

        match self.state {
            ScanState::HeaderScan => {
                if line.trim_start().starts_with(FIRST_TOOL_MARKER) {
                    debug!("Tool list starts at line {}", line_number);
                    self.state = ScanState::ToolList;
                    self.tool_list_line(line_number, line)?;
                }
            }
            ScanState::ToolList => self.tool_list_line(line_number, line)?,
            ScanState::CoordScan(open) => {
                self.state = ScanState::CoordScan(self.coordinate_line(open, line));
            }
            ScanState::Done => {}
        }
        Ok(())
    }

    fn tool_list_line(&mut self, line_number: usize, line: &str) -> Result<(), DrillFileError> {
        if line.contains(TOOL_LIST_SENTINEL) {
            debug!(
                "Tool list ends at line {} with {} tools",
                line_number,
                self.declared.len()
            );
            self.state = ScanState::CoordScan(None);
            return Ok(());
        }

        let tool = parse_tool_entry(line_number, line)?;
        if self.declared.iter().any(|t| t.id == tool.id) {
            return Err(DrillFileError::DuplicateTool { tool_id: tool.id });
        }
        self.declared.push(tool);
        Ok(())
    }

    /// Handle one body line and return the block that stays open afterwards
    fn coordinate_line(&mut self, open: Option<usize>, line: &str) -> Option<usize> {
        let line = line.trim();
        if is_administrative(line) {
            return None;
        }
        if is_tool_selector(line) {
            return Some(self.blocks.open(line));
        }
        match (open, parse_coordinate(line)) {
            (Some(block), Some(hit)) => {
                self.blocks.push(block, hit);
                Some(block)
            }
            _ => None,
        }
    }
}

/// Parse a `<id>C<diameter_inches>` tool list entry
pub fn parse_tool_entry(line_number: usize, line: &str) -> Result<Tool, DrillFileError> {
    let trimmed = line.trim();
    let malformed = |reason: String| DrillFileError::MalformedToolEntry {
        line_number,
        line: trimmed.to_string(),
        reason,
    };

    let (id, diameter) = trimmed
        .split_once('C')
        .ok_or_else(|| malformed("missing 'C' separator".to_string()))?;
    if id.is_empty() {
        return Err(malformed("missing tool identifier".to_string()));
    }

    let inches: f64 = diameter
        .parse()
        .map_err(|e| malformed(format!("invalid diameter {diameter:?}: {e}")))?;
    if !inches.is_finite() || inches < 0.0 {
        return Err(malformed(format!("diameter {inches} is not a size")));
    }

    Ok(Tool::new(id, inch_to_mm(inches)))
}

/// Lines carrying a `G` or `M` code are administrative
fn is_administrative(line: &str) -> bool {
    line.contains('G') || line.contains('M')
}

fn is_tool_selector(line: &str) -> bool {
    static SELECTOR: OnceLock<Regex> = OnceLock::new();
    SELECTOR
        .get_or_init(|| Regex::new(r"^T\d+$").expect("invalid selector regex"))
        .is_match(line)
}

/// Parse an `X<digits>Y<digits>` line with optional signs
pub fn parse_coordinate(line: &str) -> Option<DrillHit> {
    static COORDINATE: OnceLock<Regex> = OnceLock::new();
    let caps = COORDINATE
        .get_or_init(|| Regex::new(r"^X([+-]?\d+)Y([+-]?\d+)$").expect("invalid coordinate regex"))
        .captures(line.trim())?;
    let x = caps.get(1)?.as_str().parse().ok()?;
    let y = caps.get(2)?.as_str().parse().ok()?;
    Some(DrillHit::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tool_entry() {
        let tool = parse_tool_entry(3, "T1C0.0315\n").unwrap();
        assert_eq!(tool.id, "T1");
        assert!((tool.diameter_mm - 0.8001).abs() < 1e-9);
    }

    #[test]
    fn test_parse_tool_entry_rejects_garbage() {
        assert!(matches!(
            parse_tool_entry(4, "T2"),
            Err(DrillFileError::MalformedToolEntry { line_number: 4, .. })
        ));
        assert!(parse_tool_entry(4, "T2Cabc").is_err());
        assert!(parse_tool_entry(4, "C0.1").is_err());
        assert!(parse_tool_entry(4, "T2C-0.1").is_err());
        assert!(parse_tool_entry(4, "").is_err());
    }

    #[test]
    fn test_parse_coordinate() {
        assert_eq!(parse_coordinate("X100Y-200"), Some(DrillHit::new(100, -200)));
        assert_eq!(parse_coordinate("X-5Y+7"), Some(DrillHit::new(-5, 7)));
        assert_eq!(parse_coordinate("X100"), None);
        assert_eq!(parse_coordinate("G85X1Y2"), None);
    }

    #[test]
    fn test_tool_selector() {
        assert!(is_tool_selector("T1"));
        assert!(is_tool_selector("T12"));
        assert!(!is_tool_selector("T1C0.03"));
        assert!(!is_tool_selector("X1Y2"));
    }

    #[test]
    fn test_stable_sort() {
        let table = ToolTable::from_declared(vec![
            Tool::new("T1", 1.0),
            Tool::new("T2", 0.5),
            Tool::new("T3", 1.0),
            Tool::new("T4", 0.5),
        ]);
        let ids: Vec<_> = table.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["T2", "T4", "T1", "T3"]);
    }

    #[test]
    fn test_numbered_starts_at_one() {
        let table = ToolTable::from_declared(vec![Tool::new("T7", 2.0), Tool::new("T3", 1.0)]);
        let numbered: Vec<_> = table.numbered().map(|(n, t)| (n, t.id.clone())).collect();
        assert_eq!(numbered, vec![(1, "T3".to_string()), (2, "T7".to_string())]);
    }

    #[test]
    fn test_reselected_tool_continues_block() {
        let text = "T1C0.04\nT2C0.05\n%\nT1\nX1Y1\nT2\nX2Y2\nT1\nX3Y3\n";
        let file = DrillFileReader::parse(text).unwrap();
        assert_eq!(
            file.blocks.hits("T1"),
            &[DrillHit::new(1, 1), DrillHit::new(3, 3)]
        );
    }
}
