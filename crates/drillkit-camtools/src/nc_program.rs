//! NC drilling program generator
//!
//! Turns the sorted tool table and the per-tool hits into a line-numbered
//! drilling program. Tools run in table order (smallest drill first); tools
//! without hits are left out entirely.
//!
//! Per tool the program holds a tool change block, a spin-up block that
//! drills the first hole with a canned `G81` cycle, one modal motion line per
//! following hole and a `G80` cycle cancel:
//!
//! ```text
//! N0003 (DRILL 0.8 MM)
//! N0004 T1 M9
//! N0005 M6
//! N0006 G0 X0.254 Y-0.508 Z5.000
//! N0007 M3 S15800
//! N0008 G81 X0.254 Y-0.508 Z-2.000 R1.000 F800
//! N0009 X1.270
//! N0010 G80
//! ```

use drillkit_core::{encode_latin1, format_mm, CoordinateFormat};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CamToolResult, ParameterError, ParameterResult};
use crate::excellon::{DrillFile, DrillHit, Tool};
use crate::speeds_feeds::SpeedsFeedsCalculator;

/// Parameters for the generated drilling program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NcProgramParameters {
    /// Height for rapid moves to the first hole of a tool (mm)
    pub safe_height_mm: f64,
    /// Final Z of the drill cycle (mm)
    pub drill_depth_mm: f64,
    /// Retract plane of the drill cycle (mm)
    pub retract_height_mm: f64,
    /// Digits of the zero-padded `N` line number
    pub line_number_width: usize,
    /// Implicit decimal layout of the drill file coordinates
    pub coordinate_format: CoordinateFormat,
}

impl Default for NcProgramParameters {
    fn default() -> Self {
        Self {
            safe_height_mm: 5.0,
            drill_depth_mm: -2.0,
            retract_height_mm: 1.0,
            line_number_width: 4,
            coordinate_format: CoordinateFormat::default(),
        }
    }
}

impl NcProgramParameters {
    pub fn validate(&self) -> ParameterResult<()> {
        for (name, value) in [
            ("safe_height_mm", self.safe_height_mm),
            ("drill_depth_mm", self.drill_depth_mm),
            ("retract_height_mm", self.retract_height_mm),
        ] {
            if !value.is_finite() {
                return Err(ParameterError::InvalidValue {
                    name: name.to_string(),
                    reason: "must be finite".to_string(),
                });
            }
        }
        if self.retract_height_mm <= self.drill_depth_mm {
            return Err(ParameterError::Incompatible(
                "retract height must be above the drill depth".to_string(),
            ));
        }
        if self.safe_height_mm < self.retract_height_mm {
            return Err(ParameterError::Incompatible(
                "safe height must not be below the retract height".to_string(),
            ));
        }
        if !(1..=9).contains(&self.line_number_width) {
            return Err(ParameterError::OutOfRange {
                name: "line_number_width".to_string(),
                value: self.line_number_width as f64,
                min: 1.0,
                max: 9.0,
            });
        }
        Ok(())
    }
}

/// A generated program, one entry per block before numbering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NcProgram {
    lines: Vec<String>,
    line_number_width: usize,
}

impl NcProgram {
    /// Number of program lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Blocks without line numbers
    pub fn blocks(&self) -> &[String] {
        &self.lines
    }

    /// Width of the `N` numbers; grows past the configured width when the
    /// program has more lines than it can hold
    pub fn line_number_width(&self) -> usize {
        self.line_number_width.max(self.lines.len().to_string().len())
    }

    /// Blocks prefixed with `N` numbers counting up from 1, all of equal width
    pub fn numbered_lines(&self) -> impl Iterator<Item = String> + '_ {
        let width = self.line_number_width();
        self.lines
            .iter()
            .enumerate()
            .map(move |(i, line)| format!("N{:0width$} {}", i + 1, line, width = width))
    }

    /// Full program text, newline terminated
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for line in self.numbered_lines() {
            text.push_str(&line);
            text.push('\n');
        }
        text
    }

    /// Program bytes in ISO-8859-1
    pub fn to_latin1(&self) -> Vec<u8> {
        encode_latin1(&self.to_text())
    }
}

/// Generator for drilling programs
pub struct NcProgramGenerator {
    params: NcProgramParameters,
}

impl NcProgramGenerator {
    /// Create a new generator with the given parameters
    pub fn new(params: NcProgramParameters) -> Self {
        Self { params }
    }

    /// Generate the program for a parsed drill file
    pub fn generate(&self, program_name: &str, drill_file: &DrillFile) -> CamToolResult<NcProgram> {
        self.params.validate()?;

        let mut lines = Vec::new();
        lines.push(format!("({})", comment_text(program_name)));
        lines.push("G90 G17".to_string());

        let mut tool_count = 0;
        for (tool, hits) in drill_file.drilled_tools() {
            self.generate_tool(tool, hits, &mut lines);
            tool_count += 1;
        }
        for tool in drill_file.tools.iter() {
            if drill_file.blocks.hits(&tool.id).is_empty() {
                debug!("Tool {} has no hits, no tool change emitted", tool.id);
            }
        }

        lines.push("M30".to_string());

        info!(
            "Generated NC program {:?}: {} tools, {} lines",
            program_name,
            tool_count,
            lines.len()
        );

        Ok(NcProgram {
            lines,
            line_number_width: self.params.line_number_width,
        })
    }

    /// Tool change, spin-up, follow-up holes and cycle cancel for one tool
    fn generate_tool(&self, tool: &Tool, hits: &[DrillHit], lines: &mut Vec<String>) {
        let p = &self.params;
        let Some((first, rest)) = hits.split_first() else {
            return;
        };
        let speeds = SpeedsFeedsCalculator::calculate(tool.diameter_mm);
        let x = self.coordinate(first.x);
        let y = self.coordinate(first.y);

        // Tool change
        lines.push(format!("(DRILL {:.1} MM)", tool.diameter_mm));
        lines.push(format!("{} M9", tool.id));
        lines.push("M6".to_string());

        // Spin-up
        lines.push(format!("G0 X{} Y{} Z{}", x, y, format_mm(p.safe_height_mm)));
        lines.push(format!("M3 S{}", speeds.spindle_speed));
        lines.push(format!(
            "G81 X{} Y{} Z{} R{} F{}",
            x,
            y,
            format_mm(p.drill_depth_mm),
            format_mm(p.retract_height_mm),
            speeds.feed_rate
        ));

        // Modal holes: only the words of axes that moved. A hit moving both
        // axes becomes one `X.. Y..` line; split words would drill a stray
        // hole at the intermediate position under the active G81 cycle.
        let mut last = *first;
        for hit in rest {
            let mut words = Vec::with_capacity(2);
            if hit.x != last.x {
                words.push(format!("X{}", self.coordinate(hit.x)));
                last.x = hit.x;
            }
            if hit.y != last.y {
                words.push(format!("Y{}", self.coordinate(hit.y)));
                last.y = hit.y;
            }
            if !words.is_empty() {
                lines.push(words.join(" "));
            }
        }

        lines.push("G80".to_string());
    }

    fn coordinate(&self, native: i64) -> String {
        format_mm(self.params.coordinate_format.native_to_mm(native as f64))
    }
}

impl Default for NcProgramGenerator {
    fn default() -> Self {
        Self::new(NcProgramParameters::default())
    }
}

/// Program names go into a comment, so parentheses are replaced
fn comment_text(name: &str) -> String {
    name.replace(['(', ')'], "_")
}
