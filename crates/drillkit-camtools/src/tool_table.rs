//! Tool table report
//!
//! Renders the sorted tool table as the plain-text report handed to the
//! plotter operator:
//!
//! ```text
//! Bohrplotter        OG-ID
//! ========================
//! T001  0.6 mm (!)   T3
//! T002  0.8 mm       T1
//!
//! (!) Nicht im Sortiment
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ParameterError, ParameterResult};
use crate::excellon::ToolTable;

/// Parameters for the tool table report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolReportParameters {
    /// Left header label
    pub title: String,
    /// Header label above the original tool identifiers
    pub id_column: String,
    /// Suffix of the report file name (`<name>-<suffix>.txt`)
    pub file_suffix: String,
    /// Drills strictly smaller than this are not stocked (mm)
    pub stock_min_diameter_mm: f64,
    /// Marker placed on rows of drills that are not stocked
    pub stock_marker: String,
    /// Footer line written when any row carries the marker
    pub stock_warning: String,
}

impl Default for ToolReportParameters {
    fn default() -> Self {
        Self {
            title: "Bohrplotter".to_string(),
            id_column: "OG-ID".to_string(),
            file_suffix: "Bohrer".to_string(),
            stock_min_diameter_mm: 0.8,
            stock_marker: "(!)".to_string(),
            stock_warning: "(!) Nicht im Sortiment".to_string(),
        }
    }
}

impl ToolReportParameters {
    pub fn validate(&self) -> ParameterResult<()> {
        if !self.stock_min_diameter_mm.is_finite() || self.stock_min_diameter_mm < 0.0 {
            return Err(ParameterError::InvalidValue {
                name: "stock_min_diameter_mm".to_string(),
                reason: "must be a finite, non-negative diameter".to_string(),
            });
        }
        if self.file_suffix.trim().is_empty() {
            return Err(ParameterError::InvalidValue {
                name: "file_suffix".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Formatter for the tool table report
pub struct ToolTableFormatter {
    params: ToolReportParameters,
}

impl ToolTableFormatter {
    pub fn new(params: ToolReportParameters) -> Self {
        Self { params }
    }

    /// Whether a drill of this diameter gets the stock marker
    pub fn is_unstocked(&self, diameter_mm: f64) -> bool {
        diameter_mm < self.params.stock_min_diameter_mm
    }

    /// Render the report
    pub fn format(&self, tools: &ToolTable) -> String {
        let p = &self.params;
        let mut report = String::new();

        let header = format!("{}        {}", p.title, p.id_column);
        let rule = "=".repeat(header.chars().count());
        let blank_marker = " ".repeat(p.stock_marker.chars().count());

        report.push_str(&format!("{header}\n{rule}\n"));

        let mut missing_tool_warning = false;
        for (seq, tool) in tools.numbered() {
            let marker = if self.is_unstocked(tool.diameter_mm) {
                missing_tool_warning = true;
                p.stock_marker.as_str()
            } else {
                blank_marker.as_str()
            };
            report.push_str(&format!(
                "T{:03} {:4.1} mm {}   {}\n",
                seq, tool.diameter_mm, marker, tool.id
            ));
        }

        if missing_tool_warning {
            report.push_str(&format!("\n{}\n", p.stock_warning));
        }

        report
    }
}

impl Default for ToolTableFormatter {
    fn default() -> Self {
        Self::new(ToolReportParameters::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::excellon::Tool;

    fn table(tools: &[(&str, f64)]) -> ToolTable {
        ToolTable::from_declared(tools.iter().map(|&(id, d)| Tool::new(id, d)).collect())
    }

    #[test]
    fn test_report_layout() {
        let report = ToolTableFormatter::default().format(&table(&[("T1", 1.0), ("T2", 0.6)]));
        assert_eq!(
            report,
            "Bohrplotter        OG-ID\n\
             ========================\n\
             T001  0.6 mm (!)   T2\n\
             T002  1.0 mm       T1\n\
             \n\
             (!) Nicht im Sortiment\n"
        );
    }

    #[test]
    fn test_no_footer_without_marker() {
        let report = ToolTableFormatter::default().format(&table(&[("T1", 0.8), ("T2", 3.2)]));
        assert!(!report.contains("(!)"));
        assert!(report.ends_with("T002  3.2 mm       T2\n"));
    }

    #[test]
    fn test_stock_boundary_is_exclusive() {
        let formatter = ToolTableFormatter::default();
        assert!(formatter.is_unstocked(0.79));
        assert!(!formatter.is_unstocked(0.8));
        assert!(!formatter.is_unstocked(0.8001));
    }

    #[test]
    fn test_sequence_numbers_ignore_tool_ids() {
        let report = ToolTableFormatter::default().format(&table(&[("T9", 2.0), ("T4", 1.0)]));
        let rows: Vec<_> = report.lines().skip(2).collect();
        assert_eq!(rows, ["T001  1.0 mm       T4", "T002  2.0 mm       T9"]);
    }

    #[test]
    fn test_wide_diameter_column() {
        let report = ToolTableFormatter::default().format(&table(&[("T1", 12.34)]));
        assert!(report.contains("T001 12.3 mm       T1"));
    }

    #[test]
    fn test_validate() {
        assert!(ToolReportParameters::default().validate().is_ok());
        let params = ToolReportParameters {
            file_suffix: " ".to_string(),
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }
}
