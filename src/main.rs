mod analysis;
mod config;
mod data;
mod error;
mod report;

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};

use analysis::Analysis;
use config::{AnalysisConfig, HeaderPolicy};
use data::model::TemperatureKey;
use report::OutputFormat;

#[derive(Parser)]
#[command(name = "station-sets")]
#[command(about = "Set algebra over the distinct temperatures of two weather stations")]
#[command(version)]
struct Cli {
    #[arg(help = "CSV file with date,north,northeast rows")]
    input: PathBuf,
    #[arg(long, short, value_enum, default_value = "text", help = "Output format")]
    format: OutputFormat,
    #[arg(long, value_name = "PATH", help = "JSON file with analysis settings")]
    config: Option<PathBuf>,
    #[arg(long, env = "STATION_SETS_THRESHOLD", help = "Universe threshold in °C (strictly above)")]
    threshold: Option<TemperatureKey>,
    #[arg(
        long,
        value_name = "N",
        env = "STATION_SETS_POWER_SET_CEILING",
        help = "Largest intersection whose power set is enumerated in full"
    )]
    power_set_ceiling: Option<usize>,
    #[arg(long, value_name = "N", help = "Subsets listed in the text report")]
    display_limit: Option<usize>,
    #[arg(long, value_enum, help = "How to treat the first row")]
    header: Option<HeaderPolicy>,
    #[arg(short, long, action = ArgAction::Count, help = "More log output (-v info, -vv debug)")]
    verbose: u8,
}

impl Cli {
    /// Defaults, then the config file, then flags and environment.
    fn resolve_config(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_json_file(path)?,
            None => AnalysisConfig::default(),
        };
        if let Some(threshold) = &self.threshold {
            config.threshold = threshold.clone();
        }
        if let Some(ceiling) = self.power_set_ceiling {
            config.power_set_ceiling = ceiling;
        }
        if let Some(limit) = self.display_limit {
            config.display_limit = limit;
        }
        if let Some(header) = self.header {
            config.header = header;
        }
        config.validate()?;
        Ok(config)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.resolve_config().context("resolving configuration")?;
    log::debug!("Using {config:?}");

    let analysis = Analysis::from_file(&cli.input, &config)
        .with_context(|| format!("analysing {}", cli.input.display()))?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    report::write_report(&mut out, &analysis, &config, cli.format)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    finish(run(&cli), &mut io::stderr())
}

/// Map the run result to an exit code, printing a failure once to `err`.
fn finish<W: Write>(result: Result<()>, err: &mut W) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = writeln!(err, "Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
