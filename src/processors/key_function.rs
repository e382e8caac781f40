use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

use crate::config::PipelineConfig;
use crate::error::SkipReason;
use crate::models::{MonthYear, ObservationRecord, StationMonth};

/// Maps an observation to its aggregation key, or rejects it
pub trait KeyFunction: Sync {
    type Key: Copy + Eq + Hash + Ord + Debug + Send;

    fn key_for(&self, record: &ObservationRecord) -> Result<Self::Key, SkipReason>;

    /// Early station check, run before the rest of the line is parsed
    fn admit_station(&self, _station_id: u32) -> Result<(), SkipReason> {
        Ok(())
    }
}

/// Monthly report keys: excluded stations and years before the decade are
/// dropped, years are collapsed.
#[derive(Debug, Clone)]
pub struct StationMonthKeys {
    excluded_stations: HashSet<u32>,
    start_year: i32,
}

impl StationMonthKeys {
    pub fn new(excluded_stations: impl IntoIterator<Item = u32>, start_year: i32) -> Self {
        Self {
            excluded_stations: excluded_stations.into_iter().collect(),
            start_year,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(
            config.excluded_stations.iter().copied(),
            config.decade_start_year,
        )
    }
}

impl KeyFunction for StationMonthKeys {
    type Key = StationMonth;

    fn key_for(&self, record: &ObservationRecord) -> Result<StationMonth, SkipReason> {
        let station_id = record.station_id.ok_or(SkipReason::MissingStationId)?;
        self.admit_station(station_id)?;

        let year = record.year();
        if year < self.start_year {
            return Err(SkipReason::BeforeCutoff {
                year,
                cutoff: self.start_year,
            });
        }

        Ok(StationMonth::new(station_id, record.month()))
    }

    fn admit_station(&self, station_id: u32) -> Result<(), SkipReason> {
        if self.excluded_stations.contains(&station_id) {
            return Err(SkipReason::ExcludedStation(station_id));
        }
        Ok(())
    }
}

/// Peak report keys: every station and year counts, each calendar month is
/// its own bucket.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonthYearKeys;

impl KeyFunction for MonthYearKeys {
    type Key = MonthYear;

    fn key_for(&self, record: &ObservationRecord) -> Result<MonthYear, SkipReason> {
        Ok(MonthYear::new(record.month(), record.year()))
    }
}
