pub mod global_max;
pub mod group_merger;
pub mod key_function;
pub mod parallel_processor;
pub mod partial_aggregator;
pub mod pipeline;

pub use global_max::GlobalMaxReducer;
pub use group_merger::{FinalizedGroups, GroupMerger};
pub use key_function::{KeyFunction, MonthYearKeys, StationMonthKeys};
pub use parallel_processor::ParallelProcessor;
pub use partial_aggregator::{reducer_for, PartialAggregator, SplitAggregate};
pub use pipeline::{monthly_report, peak_report, MonthlyReport, PeakReport};
