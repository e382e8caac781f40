use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "weather-aggregator")]
#[command(about = "Monthly precipitation and temperature reports from daily station observations")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Only log warnings and errors")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Settings file (TOML, JSON or YAML)")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Total precipitation and mean temperature per station and month from 2014 on
    Monthly {
        #[arg(help = "Observation CSV file")]
        input: PathBuf,

        #[arg(help = "Report output file")]
        output: PathBuf,

        #[arg(short, long, help = "Station reference file [default: locationData.csv]")]
        stations: Option<PathBuf>,

        #[command(flatten)]
        options: PipelineArgs,
    },

    /// The calendar month with the highest total precipitation
    MaxPrecipitation {
        #[arg(help = "Observation CSV file")]
        input: PathBuf,

        #[arg(help = "Report output file")]
        output: PathBuf,

        #[arg(long, help = "Also write the total of every month to this file")]
        totals: Option<PathBuf>,

        #[command(flatten)]
        options: PipelineArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct PipelineArgs {
    #[arg(long, help = "Map worker threads [default: number of CPUs]")]
    pub max_workers: Option<usize>,

    #[arg(long, help = "Data lines per input split [default: 10000]")]
    pub chunk_size: Option<usize>,

    #[arg(long, help = "Reducer threads for the merge stage [default: 4]")]
    pub reducers: Option<usize>,

    #[arg(long, help = "Write run statistics as JSON to this file")]
    pub stats_json: Option<PathBuf>,
}

impl Cli {
    /// Default log filter for the chosen verbosity
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }
}
