use crate::config::PipelineConfig;
use crate::error::{ProcessingError, Result};
use crate::models::{PartialAggregate, RunStats};
use crate::processors::{FinalizedGroups, GroupMerger, KeyFunction, PartialAggregator};
use crate::readers::ObservationInput;
use crate::utils::constants::DEFAULT_REDUCERS;
use crate::utils::progress::ProgressReporter;
use crossbeam::channel::{unbounded, Receiver, Sender};
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

/// Partials from one split destined for one reducer
struct Delivery<K> {
    split_index: usize,
    partials: HashMap<K, PartialAggregate>,
}

pub struct ParallelProcessor {
    max_workers: usize,
    reducers: usize,
}

impl ParallelProcessor {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers,
            reducers: DEFAULT_REDUCERS,
        }
    }

    pub fn with_reducers(mut self, reducers: usize) -> Self {
        self.reducers = reducers.max(1);
        self
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.max_workers).with_reducers(config.reducers)
    }

    pub fn reducers(&self) -> usize {
        self.reducers
    }

    /// Run map, shuffle and merge over every split of `input`.
    ///
    /// Splits are extracted and pre-combined in parallel on a rayon pool, then
    /// each key's partial is sent to the reducer thread that owns it. Reducers
    /// finalize once every split has been mapped and all senders are closed.
    pub fn aggregate<F: KeyFunction>(
        &self,
        input: &ObservationInput,
        keys: &F,
        progress: Option<&ProgressReporter>,
    ) -> Result<(FinalizedGroups<F::Key>, RunStats)> {
        let reducers = self.reducers.max(1);
        let total_splits = input.splits.len();
        let processed_count = AtomicUsize::new(0);

        info!(
            "Aggregating {} splits on {} workers into {} reducers",
            total_splits, self.max_workers, reducers
        );
        if let Some(p) = progress {
            p.set_message(&format!("Mapping {} splits...", total_splits));
        }

        // Configure Rayon thread pool
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| ProcessingError::Config(e.to_string()))?;

        let (senders, receivers): (Vec<Sender<Delivery<F::Key>>>, Vec<Receiver<Delivery<F::Key>>>) =
            (0..reducers).map(|_| unbounded()).unzip();
        let aggregator = PartialAggregator::new(&input.schema, keys);

        let (mapped, merged) = crossbeam::thread::scope(|scope| {
            let handles: Vec<_> = receivers
                .into_iter()
                .enumerate()
                .map(|(index, receiver)| {
                    scope.spawn(move |_| {
                        let mut merger = GroupMerger::new();
                        for delivery in receiver.iter() {
                            merger.accept_bucket(delivery.split_index, delivery.partials);
                        }
                        debug!("Reducer {} finalizing {} keys", index, merger.key_count());
                        merger.finalize()
                    })
                })
                .collect();

            let mapped: Result<Vec<RunStats>> = pool.install(|| {
                input
                    .splits
                    .par_iter()
                    .map(|split| {
                        let mut output = aggregator.aggregate_split(split);
                        let stats = std::mem::take(&mut output.stats);
                        let split_index = output.split_index;

                        for (reducer, bucket) in
                            output.into_buckets(reducers).into_iter().enumerate()
                        {
                            if bucket.is_empty() {
                                continue;
                            }
                            senders[reducer]
                                .send(Delivery {
                                    split_index,
                                    partials: bucket,
                                })
                                .map_err(|_| {
                                    ProcessingError::Shuffle(format!(
                                        "reducer {} stopped receiving",
                                        reducer
                                    ))
                                })?;
                        }

                        // Update progress
                        let count = processed_count.fetch_add(1, Ordering::Relaxed) + 1;
                        if let Some(p) = progress {
                            p.update(count as u64);
                        }

                        Ok(stats)
                    })
                    .collect()
            });

            // All splits are mapped; closing the senders releases the reducers
            drop(senders);

            let merged: Result<Vec<FinalizedGroups<F::Key>>> = handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .map_err(|_| ProcessingError::WorkerPanic("group merge"))
                })
                .collect();

            (mapped, merged)
        })
        .map_err(|_| ProcessingError::WorkerPanic("shuffle"))?;

        let mut stats = input.stats.clone();
        for split_stats in mapped? {
            stats += split_stats;
        }

        let groups = merged?
            .into_iter()
            .fold(FinalizedGroups::empty(), FinalizedGroups::union);
        stats.distinct_keys = groups.len();

        info!(
            "Aggregated {} records into {} keys ({} skipped)",
            stats.records_aggregated,
            stats.distinct_keys,
            stats.total_skipped()
        );

        Ok((groups, stats))
    }
}

impl Default for ParallelProcessor {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}
