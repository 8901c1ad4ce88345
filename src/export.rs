//! Fabrication export pipeline
//!
//! Reads the raw drill file once, runs the cleaning pass and the coordinate
//! pass over it and writes three artifacts named after the input:
//!
//! - `<name>.exc`: plotter drill file
//! - `<name>-<suffix>.txt`: tool table report
//! - `<name>.NC`: drilling program (ISO-8859-1)
//!
//! The raw drill file is removed only after all three were committed.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use drillkit_camtools::{
    DrillFileReader, ExcellonCleaner, NcProgramGenerator, ToolTableFormatter,
};
use drillkit_core::OutputError;
use drillkit_settings::Config;
use serde::Serialize;
use tracing::{info, warn};

use crate::output::OutputTransaction;

/// What a successful export produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportSummary {
    pub exc_file: PathBuf,
    pub tool_report: PathBuf,
    pub nc_program: PathBuf,
    /// Tools declared in the drill file
    pub tool_count: usize,
    /// Holes drilled by declared tools
    pub hole_count: usize,
    /// Declared tools without any hole
    pub skipped_tools: Vec<String>,
    /// Whether the raw drill file was removed
    pub raw_input_removed: bool,
}

/// Output paths derived from the input file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub program_name: String,
    pub exc_file: PathBuf,
    pub tool_report: PathBuf,
    pub nc_program: PathBuf,
}

impl OutputPaths {
    /// Derive output paths for `input` inside `directory`
    pub fn derive(input: &Path, directory: &Path, report_suffix: &str) -> Result<Self> {
        let program_name = input
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| OutputError::InvalidInputName {
                path: input.to_path_buf(),
            })?;

        Ok(Self {
            exc_file: directory.join(format!("{program_name}.exc")),
            tool_report: directory.join(format!("{program_name}-{report_suffix}.txt")),
            nc_program: directory.join(format!("{program_name}.NC")),
            program_name,
        })
    }

    /// All output paths in write order
    pub fn all(&self) -> [&Path; 3] {
        [&self.exc_file, &self.tool_report, &self.nc_program]
    }
}

/// Whether `output` names the existing file at `input`
fn is_same_file(input: &Path, output: &Path) -> bool {
    match (fs::canonicalize(input), fs::canonicalize(output)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Drill file to plotter file, tool report and NC program
pub struct FabricationExport {
    config: Config,
}

impl FabricationExport {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the whole conversion for one raw drill file
    pub fn run(&self, input: &Path) -> Result<ExportSummary> {
        if !input.is_file() {
            return Err(OutputError::InputNotFound {
                path: input.to_path_buf(),
            }
            .into());
        }
        self.config.validate().context("Invalid configuration")?;

        let directory = match &self.config.output.output_directory {
            Some(dir) => dir.clone(),
            None => input
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf),
        };
        let paths = OutputPaths::derive(input, &directory, &self.config.report.file_suffix)?;
        if let Some(path) = paths.all().into_iter().find(|p| is_same_file(input, p)) {
            return Err(OutputError::OverwritesInput {
                path: path.to_path_buf(),
            }
            .into());
        }

        let text = fs::read_to_string(input)
            .with_context(|| format!("Failed to read drill file {}", input.display()))?;
        info!("Converting {} ({} bytes)", input.display(), text.len());

        let cleaned = ExcellonCleaner::clean(&text)
            .with_context(|| format!("Failed to parse tool list of {}", input.display()))?;
        let drill_file = DrillFileReader::parse(&text)
            .with_context(|| format!("Failed to parse {}", input.display()))?;
        if cleaned.tools != drill_file.tools {
            bail!("Cleaning and coordinate passes disagree on the tool table");
        }

        let report = ToolTableFormatter::new(self.config.report.clone()).format(&drill_file.tools);
        let program = NcProgramGenerator::new(self.config.machining.clone())
            .generate(&paths.program_name, &drill_file)
            .context("Failed to generate NC program")?;

        let skipped_tools: Vec<String> = drill_file
            .tools
            .iter()
            .filter(|tool| drill_file.blocks.hits(&tool.id).is_empty())
            .map(|tool| tool.id.clone())
            .collect();
        for tool in &skipped_tools {
            warn!("Tool {} has no holes and is left out of the NC program", tool);
        }
        let hole_count = drill_file
            .drilled_tools()
            .map(|(_, hits)| hits.len())
            .sum();

        let mut tx = OutputTransaction::new();
        tx.stage(&paths.exc_file, cleaned.text.as_bytes())?;
        tx.stage(&paths.tool_report, report.as_bytes())?;
        tx.stage(&paths.nc_program, &program.to_latin1())?;
        for path in tx.commit()? {
            info!("Wrote {}", path.display());
        }

        let raw_input_removed = self.config.output.delete_raw_input;
        if raw_input_removed {
            fs::remove_file(input)
                .with_context(|| format!("Failed to remove {}", input.display()))?;
            info!("Removed raw drill file {}", input.display());
        }

        Ok(ExportSummary {
            exc_file: paths.exc_file,
            tool_report: paths.tool_report,
            nc_program: paths.nc_program,
            tool_count: drill_file.tools.len(),
            hole_count,
            skipped_tools,
            raw_input_removed,
        })
    }
}
