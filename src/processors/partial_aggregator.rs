use csv::StringRecord;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use tracing::{debug, warn};

use crate::models::{PartialAggregate, RunStats};
use crate::processors::KeyFunction;
use crate::readers::{InputSplit, ObservationSchema};

/// Local pre-combine result of one input split
#[derive(Debug, Clone)]
pub struct SplitAggregate<K> {
    pub split_index: usize,
    pub partials: HashMap<K, PartialAggregate>,
    pub stats: RunStats,
}

impl<K: Hash + Eq> SplitAggregate<K> {
    /// Route each key's partial to the reducer that owns it
    pub fn into_buckets(self, reducers: usize) -> Vec<HashMap<K, PartialAggregate>> {
        let mut buckets: Vec<HashMap<K, PartialAggregate>> =
            (0..reducers).map(|_| HashMap::new()).collect();

        for (key, partial) in self.partials {
            buckets[reducer_for(&key, reducers)].insert(key, partial);
        }

        buckets
    }
}

/// Reducer index owning `key`. Stable across runs and processes.
pub fn reducer_for<K: Hash>(key: &K, reducers: usize) -> usize {
    let mut hasher = DefaultHasher::new();
    key.hash(&mut hasher);
    (hasher.finish() % reducers.max(1) as u64) as usize
}

/// Map-side extraction, keying and local combine for one split
pub struct PartialAggregator<'a, F: KeyFunction> {
    schema: &'a ObservationSchema,
    keys: &'a F,
}

impl<'a, F: KeyFunction> PartialAggregator<'a, F> {
    pub fn new(schema: &'a ObservationSchema, keys: &'a F) -> Self {
        Self { schema, keys }
    }

    pub fn aggregate_split(&self, split: &InputSplit) -> SplitAggregate<F::Key> {
        let mut partials: HashMap<F::Key, PartialAggregate> = HashMap::new();
        let mut stats = RunStats::new();

        for record in &split.records {
            let keyed = self
                .schema
                .parse_record_with(record, |id| self.keys.admit_station(id))
                .and_then(|obs| self.keys.key_for(&obs).map(|key| (key, obs)));

            match keyed {
                Ok((key, obs)) => {
                    partials
                        .entry(key)
                        .and_modify(|acc| *acc = acc.combine(&obs))
                        .or_insert_with(|| PartialAggregate::from_observation(&obs));
                    stats.records_aggregated += 1;
                }
                Err(reason) => {
                    let line = line_number(record);
                    if reason.is_filtered() {
                        debug!("Filtered line {}: {} ({})", line, render(record), reason);
                    } else {
                        warn!("Skipping line {}: {} ({})", line, render(record), reason);
                    }
                    stats.record_skip(&reason);
                }
            }
        }

        SplitAggregate {
            split_index: split.index,
            partials,
            stats,
        }
    }
}

fn line_number(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or_default()
}

fn render(record: &StringRecord) -> String {
    record.iter().collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColumnNames, PipelineConfig};
    use crate::models::{MonthYear, StationMonth};
    use crate::processors::{MonthYearKeys, StationMonthKeys};
    use crate::readers::{ObservationReader, RequiredFields};

    const INPUT: &str = "location_id,date,temperature_2m_mean (°C),precipitation_hours (h)
3,6/1/2015,27.0,2.0
3,6/2/2020,29.0,4.0
25,6/1/2015,20.0,9.0
3,6/3/2013,30.0,8.0
3,bad,30.0,8.0
4,7/1/2016,25.0,1.5
";

    #[test]
    fn test_split_is_pre_combined_per_key() {
        let input = ObservationReader::new(
            ColumnNames::default(),
            RequiredFields::PrecipitationAndTemperature,
        )
        .read_str(INPUT)
        .unwrap();
        let keys = StationMonthKeys::from_config(&PipelineConfig::default());
        let aggregator = PartialAggregator::new(&input.schema, &keys);

        let output = aggregator.aggregate_split(&input.splits[0]);

        assert_eq!(output.partials.len(), 2);
        let june = output.partials[&StationMonth::new(3, 6)];
        assert_eq!(june.count, 2);
        assert_eq!(june.precipitation_sum, 6.0);
        assert_eq!(june.temperature_sum, 56.0);

        assert_eq!(output.stats.records_aggregated, 3);
        assert_eq!(output.stats.skipped["excluded_station"], 1);
        assert_eq!(output.stats.skipped["before_cutoff"], 1);
        assert_eq!(output.stats.skipped["malformed_date"], 1);
    }

    #[test]
    fn test_excluded_station_counted_as_filtered_even_with_bad_date() {
        let input = ObservationReader::new(
            ColumnNames::default(),
            RequiredFields::PrecipitationAndTemperature,
        )
        .read_str(
            "location_id,date,temperature_2m_mean (°C),precipitation_hours (h)
25,garbage,20.0,9.0
26,13/45/2016,20.0,9.0
",
        )
        .unwrap();
        let keys = StationMonthKeys::from_config(&PipelineConfig::default());

        let output =
            PartialAggregator::new(&input.schema, &keys).aggregate_split(&input.splits[0]);

        assert!(output.partials.is_empty());
        assert_eq!(output.stats.skipped["excluded_station"], 2);
        assert!(!output.stats.skipped.contains_key("malformed_date"));
        assert!(!output.stats.skipped.contains_key("invalid_date"));
    }

    #[test]
    fn test_peak_keys_ignore_station_field() {
        let input =
            ObservationReader::new(ColumnNames::default(), RequiredFields::PrecipitationOnly)
                .read_str("location_id,date,precipitation_hours (h)\n7,2/1/2019,4.0\nn/a,2/2/2019,5.0\n")
                .unwrap();

        let output =
            PartialAggregator::new(&input.schema, &MonthYearKeys).aggregate_split(&input.splits[0]);

        let february = output.partials[&MonthYear::new(2, 2019)];
        assert_eq!(february.count, 2);
        assert_eq!(february.precipitation_sum, 9.0);
    }

    #[test]
    fn test_buckets_follow_reducer_assignment() {
        let mut partials = HashMap::new();
        for station in 0..20 {
            partials.insert(StationMonth::new(station, 1), PartialAggregate::new());
        }
        let output = SplitAggregate {
            split_index: 0,
            partials,
            stats: RunStats::new(),
        };

        let buckets = output.into_buckets(3);

        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets.iter().map(HashMap::len).sum::<usize>(), 20);
        for (index, bucket) in buckets.iter().enumerate() {
            for key in bucket.keys() {
                assert_eq!(reducer_for(key, 3), index);
            }
        }
    }
}
