//! Metric center CLI
//!
//! Finds the point of a 2-D point set whose farthest neighbour is nearest.
//!
//! Usage:
//!     metric-center points.txt
//!     metric-center --units 8 --lanes 256 points.txt
//!     metric-center --format json points.txt

use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use metric_center_backends::{Backend, CpuBackend};
use metric_center_core::{pipeline, Error, ExecutionConfig, OutputFormat, PointSet, Result};
use metric_center_tracing::{init_global_tracing, TracingConfig};
use std::path::PathBuf;
use std::process::ExitCode;

/// Brute-force metric center of a 2-D point set
#[derive(Parser, Debug)]
#[command(name = "metric-center")]
#[command(version)]
#[command(about = "Brute-force metric center of a 2-D point set", long_about = None)]
struct Cli {
    /// File of whitespace separated coordinates, read pairwise as x y
    points_file: PathBuf,

    /// Execution units (default: backend compute units)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    units: Option<u32>,

    /// Lanes per unit (default: 1024)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    lanes: Option<u32>,

    /// Report format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Index and coordinates, then the radius
    Text,
    /// A single JSON object
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => err.exit(),
        Err(err) => return fail(&usage_error(&err)),
    };

    if let Err(err) = init_global_tracing(&TracingConfig::from_env()) {
        eprintln!("metric-center: logging disabled: {err}");
    }

    match run(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => fail(&err),
    }
}

/// Load, search and render; nothing is printed here
fn run(cli: &Cli) -> Result<String> {
    let points = PointSet::from_path(&cli.points_file)?;

    let mut backend = CpuBackend::new();
    let config = ExecutionConfig::from_env(&backend.device_info())?.with_overrides(cli.units, cli.lanes)?;
    tracing::debug!(device = %backend.device_info(), %config, points = points.len(), "starting search");

    let report = pipeline::solve_report(&mut backend, &points, &config)?;
    report.render(cli.format.into())
}

/// Collapse a clap parse failure into a one-line usage error
fn usage_error(err: &clap::Error) -> Error {
    // clap's first paragraph is the message, the rest is the usage banner.
    let rendered = err.render().to_string();
    let message = rendered
        .lines()
        .map(str::trim)
        .skip_while(|line| line.is_empty())
        .take_while(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let message = message.trim_start_matches("error:").trim();
    Error::Usage(if message.is_empty() {
        "invalid arguments".to_string()
    } else {
        message.to_string()
    })
}

fn fail(err: &Error) -> ExitCode {
    eprintln!("metric-center: {err}");
    ExitCode::from(err.exit_code())
}
