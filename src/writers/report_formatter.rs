use crate::models::{
    MonthYearTotal, MonthlySummary, PrecipitationPeak, StationDirectory, StationMonth,
};
use crate::processors::FinalizedGroups;
use tracing::debug;

/// English ordinal for a month number: 1st, 2nd, 3rd, 4th, 11th, 21st
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 100, n % 10) {
        (11..=13, _) => "th",
        (_, 1) => "st",
        (_, 2) => "nd",
        (_, 3) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

/// Round half away from zero to a whole number, without a negative zero
fn whole(value: f64) -> String {
    format!("{:.0}", value.round() + 0.0)
}

/// Resolve station names and put summaries in report order
pub fn summarize_monthly(
    groups: FinalizedGroups<StationMonth>,
    directory: &StationDirectory,
) -> Vec<MonthlySummary> {
    let mut summaries: Vec<MonthlySummary> = groups
        .into_iter()
        .map(|(key, aggregate)| {
            if !directory.contains(key.station_id) {
                debug!(
                    "Station {} has no reference entry, reporting it by placeholder",
                    key.station_id
                );
            }
            MonthlySummary::new(
                directory.resolve(key.station_id).into_owned(),
                key.month,
                &aggregate,
            )
        })
        .collect();

    summaries.sort_by(MonthlySummary::report_order);
    summaries
}

pub fn format_monthly(summary: &MonthlySummary) -> String {
    format!(
        "{} had a total precipitation of {} hours with a mean temperature of {} for {} month",
        summary.station_name,
        whole(summary.total_precipitation),
        whole(summary.mean_temperature),
        ordinal(summary.month)
    )
}

pub fn format_monthly_report(summaries: &[MonthlySummary]) -> Vec<String> {
    summaries.iter().map(format_monthly).collect()
}

pub fn format_peak(peak: &PrecipitationPeak) -> String {
    format!(
        "{} month in {} had the highest total precipitation of {} hours",
        ordinal(peak.key.month),
        peak.key.year,
        whole(peak.total_precipitation)
    )
}

pub fn format_total(total: &MonthYearTotal) -> String {
    format!(
        "{}\tTotal Precipitation: {:.2} hours (from {} records)",
        total.key, total.total_precipitation, total.records
    )
}
