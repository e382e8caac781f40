use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::SkipReason;

/// One day of weather at one station. `station_id` is `None` when the
/// station column was not read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRecord {
    pub station_id: Option<u32>,
    pub date: NaiveDate,
    pub temperature_mean: f64,
    pub precipitation_hours: f64,
}

impl ObservationRecord {
    pub fn new(
        station_id: Option<u32>,
        date: NaiveDate,
        temperature_mean: f64,
        precipitation_hours: f64,
    ) -> Self {
        Self {
            station_id,
            date,
            temperature_mean,
            precipitation_hours,
        }
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }
}

/// Parse a `month/day/year` triple such as `1/31/2015`.
pub fn parse_observation_date(value: &str) -> std::result::Result<NaiveDate, SkipReason> {
    let parts: Vec<&str> = value.trim().split('/').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(SkipReason::MalformedDate(value.to_string()));
    }

    let invalid = || SkipReason::InvalidDate(value.to_string());
    let month = parts[0].parse::<u32>().map_err(|_| invalid())?;
    let day = parts[1].parse::<u32>().map_err(|_| invalid())?;
    let year = parts[2].parse::<i32>().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}
