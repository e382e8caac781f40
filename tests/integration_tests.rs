use clap::Parser;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use weather_aggregator::cli::{run, Cli};
use weather_aggregator::config::{ColumnNames, PipelineConfig};
use weather_aggregator::error::ProcessingError;
use weather_aggregator::processors::{monthly_report, peak_report};
use weather_aggregator::readers::{ObservationReader, RequiredFields, StationReader};
use weather_aggregator::writers::{format_monthly_report, format_peak, ReportWriter};

const OBSERVATIONS: &str = "\
location_id,date,weather_code (wmo code),temperature_2m_max (°C),temperature_2m_min (°C),temperature_2m_mean (°C),precipitation_sum (mm),precipitation_hours (h)
0,1/1/2014,51,30.1,22.9,26.0,0.5,2.0
0,1/2/2019,51,30.0,23.0,27.0,1.5,4.0
0,1/2/2013,51,30.0,23.0,40.0,9.9,50.0
1,2/1/2016,61,29.0,22.0,25.0,3.0,10.5
1,2/2/2016,61,29.0,22.0,25.5,3.0,12.0
25,2/3/2016,61,29.0,22.0,18.0,8.0,24.0
26,2/3/2016,61,29.0,22.0,18.0,8.0,24.0
3,6/14/2015,63,31.0,25.0,27.0,5.0,6.0
3,6/14/2020,63,31.0,25.0,29.0,5.0,8.0
3,not-a-date,63,31.0,25.0,29.0,5.0,8.0
3,6/15/2020,63
";

const LOCATIONS: &str = "\
location_id,latitude,longitude,elevation,utc_offset_seconds,timezone,timezone_abbreviation,city_name
0,6.93,79.85,5,19800,Asia/Colombo,+0530,Colombo
1,7.29,80.63,500,19800,Asia/Colombo,+0530,Kandy
25,6.84,80.93,1200,19800,Asia/Colombo,+0530,Welimada
26,6.83,80.98,1225,19800,Asia/Colombo,+0530,Bandarawela
";

fn settings(workers: usize, reducers: usize, chunk_size: usize) -> PipelineConfig {
    PipelineConfig::default()
        .with_max_workers(Some(workers))
        .with_reducers(Some(reducers))
        .with_chunk_size(Some(chunk_size))
}

fn monthly_lines(observations: &str, settings: &PipelineConfig) -> Vec<String> {
    let input = ObservationReader::new(
        settings.columns.clone(),
        RequiredFields::PrecipitationAndTemperature,
    )
    .with_chunk_size(settings.chunk_size)
    .read_str(observations)
    .unwrap();
    let directory = StationReader::new().parse_directory(LOCATIONS).unwrap();

    let report = monthly_report(&input, &directory, settings, None).unwrap();
    format_monthly_report(&report.summaries)
}

fn peak_lines(observations: &str, settings: &PipelineConfig) -> Vec<String> {
    let input = ObservationReader::new(settings.columns.clone(), RequiredFields::PrecipitationOnly)
        .with_chunk_size(settings.chunk_size)
        .read_str(observations)
        .unwrap();

    let report = peak_report(&input, settings, None).unwrap();
    report.peak.iter().map(format_peak).collect()
}

#[test]
fn test_monthly_report_end_to_end() {
    let lines = monthly_lines(OBSERVATIONS, &settings(2, 3, 2));

    assert_eq!(
        lines,
        vec![
            "Colombo had a total precipitation of 6 hours with a mean temperature of 27 for 1st month",
            "Kandy had a total precipitation of 23 hours with a mean temperature of 25 for 2nd month",
            "Location_3 had a total precipitation of 14 hours with a mean temperature of 28 for 6th month",
        ]
    );
}

#[test]
fn test_excluded_stations_never_reported() {
    let lines = monthly_lines(OBSERVATIONS, &settings(4, 4, 1));
    assert!(lines.iter().all(|l| !l.contains("Welimada")));
    assert!(lines.iter().all(|l| !l.contains("Bandarawela")));
}

#[test]
fn test_monthly_output_identical_across_runs_and_topologies() {
    let baseline = monthly_lines(OBSERVATIONS, &settings(1, 1, 10_000));

    assert_eq!(monthly_lines(OBSERVATIONS, &settings(1, 1, 10_000)), baseline);
    assert_eq!(monthly_lines(OBSERVATIONS, &settings(3, 2, 1)), baseline);
    assert_eq!(monthly_lines(OBSERVATIONS, &settings(8, 7, 3)), baseline);
}

#[test]
fn test_peak_report_end_to_end() {
    // 2/2016 totals 10.5 + 12 + 24 + 24 with the resort towns included
    let lines = peak_lines(OBSERVATIONS, &settings(2, 2, 3));
    assert_eq!(
        lines,
        vec!["2nd month in 2016 had the highest total precipitation of 71 hours"]
    );
}

#[test]
fn test_peak_tie_goes_to_earliest_month() {
    let observations = "\
location_id,date,precipitation_hours (h)
1,3/1/2020,300
1,1/1/2019,120
2,2/1/2019,100
3,2/2/2019,200
";
    for (workers, reducers, chunk) in [(1, 1, 10), (4, 3, 1), (2, 5, 2)] {
        let lines = peak_lines(observations, &settings(workers, reducers, chunk));
        assert_eq!(
            lines,
            vec!["2nd month in 2019 had the highest total precipitation of 300 hours"]
        );
    }
}

#[test]
fn test_no_valid_records_means_no_output() {
    let observations = "\
location_id,date,temperature_2m_mean (°C),precipitation_hours (h)
25,1/1/2016,20.0,3.0
4,1/1/2010,20.0,3.0
4,garbage,20.0,3.0
";
    assert!(monthly_lines(observations, &settings(2, 2, 1)).is_empty());

    let header_only = "location_id,date,temperature_2m_mean (°C),precipitation_hours (h)\n";
    assert!(peak_lines(header_only, &settings(2, 2, 1)).is_empty());
}

#[test]
fn test_missing_required_column_is_fatal() {
    let result = ObservationReader::new(
        ColumnNames::default(),
        RequiredFields::PrecipitationAndTemperature,
    )
    .read_str("location_id,date,precipitation_hours (h)\n1,1/1/2016,3\n");

    assert!(matches!(result, Err(ProcessingError::MissingColumn(_))));
}

fn cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("weather-aggregator").chain(args.iter().copied()))
        .expect("valid command line")
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

#[tokio::test]
async fn test_missing_reference_file_halts_before_output() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let input = dir.path().join("weatherData.csv");
    fs::write(&input, OBSERVATIONS).unwrap();
    let output = dir.path().join("out").join("monthly.txt");
    let stations = dir.path().join("missing.csv");

    let result = run(cli(&[
        "-q",
        "monthly",
        &path_arg(&input),
        &path_arg(&output),
        "--stations",
        &path_arg(&stations),
    ]))
    .await;

    assert!(matches!(result, Err(ProcessingError::ReferenceLoad { .. })));
    assert!(!output.exists());
    assert!(!dir.path().join("out").exists());
}

#[tokio::test]
async fn test_monthly_job_end_to_end() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let input = dir.path().join("weatherData.csv");
    let stations = dir.path().join("locationData.csv");
    fs::write(&input, OBSERVATIONS).unwrap();
    fs::write(&stations, LOCATIONS).unwrap();
    let output = dir.path().join("monthly.txt");

    run(cli(&[
        "-q",
        "monthly",
        &path_arg(&input),
        &path_arg(&output),
        "--stations",
        &path_arg(&stations),
        "--reducers",
        "3",
        "--chunk-size",
        "2",
    ]))
    .await
    .unwrap();

    let contents = fs::read_to_string(&output).unwrap();
    assert_eq!(contents.lines().count(), 3);
    assert!(contents.starts_with("Colombo had a total precipitation of 6 hours"));
}

#[tokio::test]
async fn test_max_precipitation_job_writes_peak_and_totals() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let input = dir.path().join("weatherData.csv");
    fs::write(&input, OBSERVATIONS).unwrap();
    let output = dir.path().join("peak.txt");
    let totals = dir.path().join("totals.txt");
    let stats = dir.path().join("stats.json");

    run(cli(&[
        "-q",
        "max-precipitation",
        &path_arg(&input),
        &path_arg(&output),
        "--totals",
        &path_arg(&totals),
        "--stats-json",
        &path_arg(&stats),
        "--chunk-size",
        "3",
    ]))
    .await
    .unwrap();

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "2nd month in 2016 had the highest total precipitation of 71 hours\n"
    );

    let totals = fs::read_to_string(&totals).unwrap();
    assert_eq!(
        totals.lines().collect::<Vec<_>>(),
        vec![
            "1-2013\tTotal Precipitation: 50.00 hours (from 1 records)",
            "1-2014\tTotal Precipitation: 2.00 hours (from 1 records)",
            "6-2015\tTotal Precipitation: 6.00 hours (from 1 records)",
            "2-2016\tTotal Precipitation: 70.50 hours (from 4 records)",
            "1-2019\tTotal Precipitation: 4.00 hours (from 1 records)",
            "6-2020\tTotal Precipitation: 8.00 hours (from 1 records)",
        ]
    );

    let stats: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&stats).unwrap()).unwrap();
    assert_eq!(stats["lines_read"], 11);
    assert_eq!(stats["records_aggregated"], 9);
    assert_eq!(stats["output_lines"], 1);
}

#[test]
fn test_stray_quote_does_not_hide_later_lines() {
    let observations = "\
location_id,date,precipitation_hours (h)
1,1/1/2019,5
2,\"1/2/2019,5
3,1/3/2019,5
4,1/4/2019,5
5,2/1/2019,9
";
    let settings = settings(2, 2, 2);
    let input = ObservationReader::new(settings.columns.clone(), RequiredFields::PrecipitationOnly)
        .with_chunk_size(settings.chunk_size)
        .read_str(observations)
        .unwrap();

    let report = peak_report(&input, &settings, None).unwrap();

    assert_eq!(report.stats.lines_read, 5);
    assert_eq!(report.stats.records_aggregated, 4);
    assert_eq!(report.stats.total_skipped(), 1);
    assert_eq!(
        report.peak.iter().map(format_peak).collect::<Vec<_>>(),
        vec!["1st month in 2019 had the highest total precipitation of 15 hours"]
    );
}

#[test]
fn test_reports_written_to_disk() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let observations_path = dir.path().join("weatherData.csv");
    let locations_path = dir.path().join("locationData.csv");
    fs::write(&observations_path, OBSERVATIONS).unwrap();
    fs::write(&locations_path, LOCATIONS).unwrap();

    let settings = settings(2, 2, 4);
    let input = ObservationReader::new(
        settings.columns.clone(),
        RequiredFields::PrecipitationAndTemperature,
    )
    .with_chunk_size(settings.chunk_size)
    .read_path(&observations_path)
    .unwrap();
    let directory = StationReader::new().read_directory(&locations_path).unwrap();
    let report = monthly_report(&input, &directory, &settings, None).unwrap();

    let output = dir.path().join("out").join("monthly.txt");
    let written = ReportWriter::new()
        .write_lines(&output, format_monthly_report(&report.summaries))
        .unwrap();

    assert_eq!(written, 3);
    let contents = fs::read_to_string(&output).unwrap();
    assert!(contents.starts_with("Colombo had a total precipitation of 6 hours"));
    assert_eq!(report.stats.lines_read, 11);
    assert_eq!(report.stats.records_aggregated, 6);
    assert_eq!(report.stats.total_skipped(), 5);

    let stats_path = dir.path().join("stats.json");
    ReportWriter::new().write_json(&stats_path, &report.stats).unwrap();
    assert!(Path::new(&stats_path).exists());
}
