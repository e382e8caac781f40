use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::{
    MonthYearTotal, MonthlySummary, PrecipitationPeak, RunStats, StationDirectory,
};
use crate::processors::{GlobalMaxReducer, MonthYearKeys, ParallelProcessor, StationMonthKeys};
use crate::readers::ObservationInput;
use crate::utils::progress::ProgressReporter;
use crate::writers::report_formatter::summarize_monthly;

/// Sorted per-station monthly summaries
#[derive(Debug, Clone)]
pub struct MonthlyReport {
    pub summaries: Vec<MonthlySummary>,
    pub stats: RunStats,
}

/// Wettest calendar month plus the per-month totals it was chosen from
#[derive(Debug, Clone)]
pub struct PeakReport {
    pub peak: Option<PrecipitationPeak>,
    pub totals: Vec<MonthYearTotal>,
    pub stats: RunStats,
}

/// Station-month totals and means across the decade, many reducers in parallel
pub fn monthly_report(
    input: &ObservationInput,
    directory: &StationDirectory,
    config: &PipelineConfig,
    progress: Option<&ProgressReporter>,
) -> Result<MonthlyReport> {
    let keys = StationMonthKeys::from_config(config);
    let (groups, mut stats) =
        ParallelProcessor::from_config(config).aggregate(input, &keys, progress)?;

    let summaries = summarize_monthly(groups, directory);
    stats.output_lines = summaries.len();

    Ok(MonthlyReport { summaries, stats })
}

/// Month-year totals merged in parallel, then one global maximum over all of them
pub fn peak_report(
    input: &ObservationInput,
    config: &PipelineConfig,
    progress: Option<&ProgressReporter>,
) -> Result<PeakReport> {
    let (groups, mut stats) =
        ParallelProcessor::from_config(config).aggregate(input, &MonthYearKeys, progress)?;

    let totals: Vec<MonthYearTotal> = groups
        .iter()
        .map(|(key, aggregate)| MonthYearTotal {
            key: *key,
            total_precipitation: aggregate.total_precipitation(),
            records: aggregate.count(),
        })
        .collect();

    if let Some(p) = progress {
        p.set_message("Finding wettest month...");
    }
    let peak = GlobalMaxReducer::reduce(groups);
    stats.output_lines = usize::from(peak.is_some());

    Ok(PeakReport {
        peak,
        totals,
        stats,
    })
}
