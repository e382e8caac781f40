use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to load station reference data from {}: {source}", path.display())]
    ReferenceLoad {
        path: PathBuf,
        #[source]
        source: Box<ProcessingError>,
    },

    #[error("Input has no header line")]
    MissingHeader,

    #[error("Required column '{0}' not found in header")]
    MissingColumn(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Settings error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Output serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Shuffle error: {0}")]
    Shuffle(String),

    #[error("Worker thread panicked during {0}")]
    WorkerPanic(&'static str),

    #[error("Async task error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// Why a single observation line was dropped. Never fatal to a run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkipReason {
    #[error("expected at least {expected} fields, found {found}")]
    TooFewFields { expected: usize, found: usize },

    #[error("invalid station id '{0}'")]
    InvalidStationId(String),

    #[error("station column was not read")]
    MissingStationId,

    #[error("invalid number '{value}' in column '{column}'")]
    InvalidNumber { column: String, value: String },

    #[error("negative precipitation {0}")]
    NegativePrecipitation(f64),

    #[error("malformed date '{0}', expected month/day/year")]
    MalformedDate(String),

    #[error("impossible calendar date '{0}'")]
    InvalidDate(String),

    #[error("station {0} is excluded")]
    ExcludedStation(u32),

    #[error("year {year} is before {cutoff}")]
    BeforeCutoff { year: i32, cutoff: i32 },

    #[error("unreadable line: {0}")]
    Unreadable(String),
}

impl SkipReason {
    /// Stable short label used to bucket skip counts.
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::TooFewFields { .. } => "too_few_fields",
            SkipReason::InvalidStationId(_) => "invalid_station_id",
            SkipReason::MissingStationId => "missing_station_id",
            SkipReason::InvalidNumber { .. } => "invalid_number",
            SkipReason::NegativePrecipitation(_) => "negative_precipitation",
            SkipReason::MalformedDate(_) => "malformed_date",
            SkipReason::InvalidDate(_) => "invalid_date",
            SkipReason::ExcludedStation(_) => "excluded_station",
            SkipReason::BeforeCutoff { .. } => "before_cutoff",
            SkipReason::Unreadable(_) => "unreadable",
        }
    }

    /// True for records dropped by a deliberate filter rather than bad data.
    pub fn is_filtered(&self) -> bool {
        matches!(
            self,
            SkipReason::ExcludedStation(_) | SkipReason::BeforeCutoff { .. }
        )
    }
}
