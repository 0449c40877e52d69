//! CLI argument parsing with clap.

use clap::Parser;
use std::path::PathBuf;

use stitch_chart::chart::Job;
use stitch_chart::config::Config;
use stitch_chart::normalize::{validate_resolution, validate_threshold};

/// Parse and validate resolution (1-1000 cells)
fn parse_resolution(s: &str) -> Result<u32, String> {
    let resolution: u32 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid resolution", s))?;
    validate_resolution(resolution)
}

/// Parse and validate threshold percent (1-100), with or without a `%` suffix
fn parse_threshold(s: &str) -> Result<u8, String> {
    let digits = s.strip_suffix('%').unwrap_or(s);
    let threshold: u8 = digits
        .parse()
        .map_err(|_| format!("'{}' is not a valid threshold", s))?;
    validate_threshold(threshold)
}

/// Convert an image into a stitch chart
#[derive(Parser, Debug)]
#[command(name = "stitch-chart")]
#[command(version, about = "Convert an image into a row-oriented stitch chart", long_about = None)]
#[command(after_help = "EXAMPLES:
    # Print the chart and write heart.xml next to the input
    stitch-chart heart.png

    # Finer chart, written somewhere else
    stitch-chart -r 60 -o charts/heart.xml heart.png")]
pub struct Args {
    /// Input image
    pub input: Option<PathBuf>,

    /// Output file (default: input path with an .xml extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Maximum chart width and height in cells
    #[arg(short, long, value_parser = parse_resolution)]
    pub resolution: Option<u32>,

    /// Binarization threshold in percent
    #[arg(short, long, value_parser = parse_threshold)]
    pub threshold: Option<u8>,

    /// ImageMagick convert executable
    #[arg(long)]
    pub converter: Option<String>,

    /// Do not print the chart to stdout
    #[arg(long)]
    pub no_grid: bool,

    /// Config file path
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Write a default config file and exit
    #[arg(long)]
    pub init_config: bool,

    /// Log progress to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Log debug details to stderr
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// Build the conversion job for `input`.
    ///
    /// Settings merge as CLI > config file > built-in defaults.
    pub fn job(&self, input: PathBuf, config: &Config) -> Job {
        let mut settings = config.normalize_settings();
        if let Some(resolution) = self.resolution {
            settings.resolution = resolution;
        }
        if let Some(threshold) = self.threshold {
            settings.threshold = threshold;
        }
        if let Some(ref converter) = self.converter {
            settings.program = converter.clone();
        }

        let mut job = Job::new(input, settings);
        if let Some(ref output) = self.output {
            job.output = output.clone();
        }
        job.print_grid = config.output.grid && !self.no_grid;
        job
    }
}

/// Usage line printed when no input is given.
pub fn usage(program: &str) -> String {
    format!("{} <inputfile>", program)
}
