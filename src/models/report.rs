use serde::Serialize;
use std::cmp::Ordering;

use crate::models::{FinalAggregate, MonthYear};

/// One line of the monthly report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub station_name: String,
    pub month: u32,
    pub total_precipitation: f64,
    pub mean_temperature: f64,
}

impl MonthlySummary {
    pub fn new(station_name: String, month: u32, aggregate: &FinalAggregate) -> Self {
        Self {
            station_name,
            month,
            total_precipitation: aggregate.total_precipitation(),
            mean_temperature: aggregate.mean_temperature(),
        }
    }

    /// Report order: station name, then month
    pub fn report_order(&self, other: &Self) -> Ordering {
        self.station_name
            .cmp(&other.station_name)
            .then_with(|| self.month.cmp(&other.month))
    }
}

/// Wettest calendar month found so far
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PrecipitationPeak {
    pub key: MonthYear,
    pub total_precipitation: f64,
}

impl PrecipitationPeak {
    pub fn new(key: MonthYear, total_precipitation: f64) -> Self {
        Self {
            key,
            total_precipitation,
        }
    }

    /// True if `self` should replace `incumbent`.
    ///
    /// A strictly larger total wins. Equal totals go to the earlier month, which
    /// makes `max` associative and commutative and so independent of scan order.
    pub fn beats(&self, incumbent: &Self) -> bool {
        match self
            .total_precipitation
            .total_cmp(&incumbent.total_precipitation)
        {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => self.key < incumbent.key,
        }
    }

    pub fn max(self, other: Self) -> Self {
        if other.beats(&self) {
            other
        } else {
            self
        }
    }
}

/// Total for one calendar month, as listed by `--totals`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthYearTotal {
    pub key: MonthYear,
    pub total_precipitation: f64,
    pub records: u64,
}
