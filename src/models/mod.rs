pub mod aggregate;
pub mod key;
pub mod observation;
pub mod report;
pub mod station;
pub mod stats;

pub use aggregate::{FinalAggregate, PartialAggregate};
pub use key::{MonthYear, StationMonth};
pub use observation::{parse_observation_date, ObservationRecord};
pub use report::{MonthYearTotal, MonthlySummary, PrecipitationPeak};
pub use station::StationDirectory;
pub use stats::RunStats;
