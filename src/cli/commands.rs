use crate::cli::args::{Cli, Commands, PipelineArgs};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::processors::{monthly_report, peak_report};
use crate::readers::{ObservationReader, RequiredFields, StationReader};
use crate::utils::progress::ProgressReporter;
use crate::writers::{format_monthly_report, format_peak, format_total, ReportWriter};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};
use validator::Validate;

pub async fn run(cli: Cli) -> Result<()> {
    setup_logging(&cli)?;

    let settings = PipelineConfig::load(cli.config.as_deref())?;
    let quiet = cli.quiet;

    match cli.command {
        Commands::Monthly {
            input,
            output,
            stations,
            options,
        } => {
            let settings = apply_overrides(settings.with_stations_file(stations), &options)?;
            run_monthly(input, output, settings, options.stats_json, quiet).await
        }

        Commands::MaxPrecipitation {
            input,
            output,
            totals,
            options,
        } => {
            let settings = apply_overrides(settings, &options)?;
            run_max_precipitation(input, output, totals, settings, options.stats_json, quiet).await
        }
    }
}

fn apply_overrides(settings: PipelineConfig, options: &PipelineArgs) -> Result<PipelineConfig> {
    let settings = settings
        .with_max_workers(options.max_workers)
        .with_chunk_size(options.chunk_size)
        .with_reducers(options.reducers);
    settings.validate()?;
    Ok(settings)
}

async fn run_monthly(
    input: PathBuf,
    output: PathBuf,
    settings: PipelineConfig,
    stats_json: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    log_banner("Monthly Weather Analysis", &input, &output, &settings);

    let progress = Arc::new(ProgressReporter::new_spinner(
        "Loading stations and observations...",
        quiet,
    ));

    // Station names must be available before any key is finalized
    let stations_path = settings.stations_file.clone();
    let directory_task =
        tokio::task::spawn_blocking(move || StationReader::new().read_directory(&stations_path));
    let reader = ObservationReader::new(
        settings.columns.clone(),
        RequiredFields::PrecipitationAndTemperature,
    )
    .with_chunk_size(settings.chunk_size);
    let input_path = input.clone();
    let input_task = tokio::task::spawn_blocking(move || reader.read_path(&input_path));

    let (directory, observations) = tokio::try_join!(directory_task, input_task)?;
    let directory = directory?;
    let observations = observations?;

    let report = {
        let progress = progress.clone();
        tokio::task::spawn_blocking(move || {
            monthly_report(&observations, &directory, &settings, Some(progress.as_ref()))
        })
        .await??
    };

    let writer = ReportWriter::new();
    writer.write_lines(&output, format_monthly_report(&report.summaries))?;
    if let Some(path) = stats_json {
        writer.write_json(&path, &report.stats)?;
    }

    progress.finish_with_message(&report.stats.summary());
    info!("{}", report.stats.summary());
    info!("Job completed, output at {}", output.display());
    Ok(())
}

async fn run_max_precipitation(
    input: PathBuf,
    output: PathBuf,
    totals: Option<PathBuf>,
    settings: PipelineConfig,
    stats_json: Option<PathBuf>,
    quiet: bool,
) -> Result<()> {
    log_banner("Maximum Precipitation Month", &input, &output, &settings);

    let progress = Arc::new(ProgressReporter::new_spinner("Loading observations...", quiet));

    let reader =
        ObservationReader::new(settings.columns.clone(), RequiredFields::PrecipitationOnly)
            .with_chunk_size(settings.chunk_size);
    let input_path = input.clone();
    let observations =
        tokio::task::spawn_blocking(move || reader.read_path(&input_path)).await??;

    let report = {
        let progress = progress.clone();
        tokio::task::spawn_blocking(move || {
            peak_report(&observations, &settings, Some(progress.as_ref()))
        })
        .await??
    };

    let writer = ReportWriter::new();
    match report.peak {
        Some(ref peak) => {
            info!(
                "Wettest month is {} with {:.2} hours",
                peak.key, peak.total_precipitation
            );
            writer.write_lines(&output, [format_peak(peak)])?;
        }
        None => {
            warn!("No observations survived extraction; writing an empty report");
            writer.write_lines(&output, Vec::<String>::new())?;
        }
    }

    if let Some(path) = totals {
        writer.write_lines(&path, report.totals.iter().map(format_total))?;
    }
    if let Some(path) = stats_json {
        writer.write_json(&path, &report.stats)?;
    }

    progress.finish_with_message(&report.stats.summary());
    info!("{}", report.stats.summary());
    info!("Job completed, output at {}", output.display());
    Ok(())
}

fn log_banner(job: &str, input: &Path, output: &Path, settings: &PipelineConfig) {
    info!("Job: {}", job);
    info!("Input path: {}", input.display());
    info!("Output path: {}", output.display());
    info!(
        "Workers: {}, reducers: {}, chunk size: {}",
        settings.max_workers, settings.reducers, settings.chunk_size
    );
    debug!("Settings: {:?}", settings);
}

/// Set up structured logging based on CLI arguments
fn setup_logging(cli: &Cli) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let log_level = cli.log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("weather_aggregator={}", log_level)));

    let initialized = match cli.log_file {
        Some(ref path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()
        }
        None => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };
    match initialized {
        Ok(()) => debug!("Logging initialized at level: {}", log_level),
        // A subscriber installed earlier in this process keeps receiving events
        Err(e) => debug!("Keeping existing log subscriber: {}", e),
    }
    Ok(())
}
