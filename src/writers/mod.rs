pub mod report_formatter;
pub mod report_writer;

pub use report_formatter::{
    format_monthly, format_monthly_report, format_peak, format_total, ordinal, summarize_monthly,
};
pub use report_writer::ReportWriter;
