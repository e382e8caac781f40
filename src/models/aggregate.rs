use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

use crate::models::ObservationRecord;

/// Running totals for one aggregation key.
///
/// Merging is a field-wise sum, so partials built from any split of the input
/// can be combined in any grouping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialAggregate {
    pub precipitation_sum: f64,
    pub temperature_sum: f64,
    pub count: u64,
}

impl PartialAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_observation(record: &ObservationRecord) -> Self {
        Self {
            precipitation_sum: record.precipitation_hours,
            temperature_sum: record.temperature_mean,
            count: 1,
        }
    }

    /// Fold one observation into the running totals
    pub fn combine(self, record: &ObservationRecord) -> Self {
        Self {
            precipitation_sum: self.precipitation_sum + record.precipitation_hours,
            temperature_sum: self.temperature_sum + record.temperature_mean,
            count: self.count + 1,
        }
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            precipitation_sum: self.precipitation_sum + other.precipitation_sum,
            temperature_sum: self.temperature_sum + other.temperature_sum,
            count: self.count + other.count,
        }
    }

    pub fn mean_temperature(&self) -> f64 {
        if self.count > 0 {
            self.temperature_sum / self.count as f64
        } else {
            0.0
        }
    }

    /// Close the accumulator. The mean is computed here, once.
    pub fn finalize(self) -> FinalAggregate {
        FinalAggregate {
            total_precipitation: self.precipitation_sum,
            mean_temperature: self.mean_temperature(),
            count: self.count,
        }
    }
}

impl Add for PartialAggregate {
    type Output = PartialAggregate;

    fn add(self, other: Self) -> Self::Output {
        self.merge(other)
    }
}

impl AddAssign for PartialAggregate {
    fn add_assign(&mut self, other: Self) {
        *self = self.merge(other);
    }
}

/// Closed aggregate for one key. Read-only once built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FinalAggregate {
    total_precipitation: f64,
    mean_temperature: f64,
    count: u64,
}

impl FinalAggregate {
    pub fn total_precipitation(&self) -> f64 {
        self.total_precipitation
    }

    pub fn mean_temperature(&self) -> f64 {
        self.mean_temperature
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}
