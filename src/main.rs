use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use drillkit::{init_logging, Config, FabricationExport, BUILD_DATE};

#[derive(Parser, Debug)]
#[command(
    name = "drillkit",
    version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")"),
    about = "Convert a PCB drill file into a plotter file, tool report and NC drilling program"
)]
struct Cli {
    /// Raw drill file written by the PCB exporter
    input: PathBuf,

    /// Configuration file (TOML or JSON). Defaults to the user config file
    /// when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for the outputs. Defaults to the input's directory.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Keep the raw drill file after a successful export.
    #[arg(long)]
    keep_raw: bool,

    /// Print the export summary as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Debug logging.
    #[arg(long, short)]
    verbose: bool,
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load_default().context("Failed to load default config")?,
    };
    if let Some(dir) = &cli.output_dir {
        config.output.output_directory = Some(dir.clone());
    }
    if cli.keep_raw {
        config.output.delete_raw_input = false;
    }
    Ok(config)
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let summary = FabricationExport::new(config).run(&cli.input)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", summary.exc_file.display());
        println!("{}", summary.tool_report.display());
        println!("{}", summary.nc_program.display());
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
    }
    tracing::debug!("drillkit {} built {}", drillkit::VERSION, BUILD_DATE);

    if let Err(e) = run(&cli) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
