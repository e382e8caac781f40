use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::AddAssign;

use crate::error::SkipReason;

/// Per-run counters, mergeable across partitions
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunStats {
    pub lines_read: u64,
    pub records_aggregated: u64,
    pub skipped: BTreeMap<String, u64>,
    pub distinct_keys: usize,
    pub output_lines: usize,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_skip(&mut self, reason: &SkipReason) {
        *self.skipped.entry(reason.label().to_string()).or_default() += 1;
    }

    pub fn total_skipped(&self) -> u64 {
        self.skipped.values().sum()
    }

    pub fn summary(&self) -> String {
        format!(
            "Read {} lines: {} aggregated, {} skipped, {} keys, {} output lines",
            self.lines_read,
            self.records_aggregated,
            self.total_skipped(),
            self.distinct_keys,
            self.output_lines
        )
    }
}

impl AddAssign for RunStats {
    fn add_assign(&mut self, other: Self) {
        self.lines_read += other.lines_read;
        self.records_aggregated += other.records_aggregated;
        for (reason, count) in other.skipped {
            *self.skipped.entry(reason).or_default() += count;
        }
        self.distinct_keys += other.distinct_keys;
        self.output_lines += other.output_lines;
    }
}
