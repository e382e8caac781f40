//! Reduce side of the shuffle.
//!
//! A [`GroupMerger`] accumulates partials for the keys its reducer owns, in
//! whatever order splits deliver them. [`GroupMerger::finalize`] consumes it and
//! yields [`FinalizedGroups`], which cannot be added to.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::models::{FinalAggregate, PartialAggregate};

#[derive(Debug, Clone)]
pub struct GroupMerger<K> {
    pending: HashMap<K, BTreeMap<usize, PartialAggregate>>,
}

impl<K: Copy + Eq + Hash + Ord> GroupMerger<K> {
    pub fn new() -> Self {
        Self {
            pending: HashMap::new(),
        }
    }

    /// Accept one partial produced by split `split_index`
    pub fn accept(&mut self, split_index: usize, key: K, partial: PartialAggregate) {
        *self
            .pending
            .entry(key)
            .or_default()
            .entry(split_index)
            .or_default() += partial;
    }

    pub fn accept_bucket(&mut self, split_index: usize, bucket: HashMap<K, PartialAggregate>) {
        for (key, partial) in bucket {
            self.accept(split_index, key, partial);
        }
    }

    pub fn key_count(&self) -> usize {
        self.pending.len()
    }

    /// Close every key. Partials are summed in split order, so the result does
    /// not depend on arrival order.
    pub fn finalize(self) -> FinalizedGroups<K> {
        let groups = self
            .pending
            .into_iter()
            .map(|(key, by_split)| {
                let total = by_split
                    .into_values()
                    .fold(PartialAggregate::new(), PartialAggregate::merge);
                (key, total.finalize())
            })
            .collect();

        FinalizedGroups { groups }
    }
}

impl<K: Copy + Eq + Hash + Ord> Default for GroupMerger<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Finalized aggregates in key order
#[derive(Debug, Clone)]
pub struct FinalizedGroups<K> {
    groups: BTreeMap<K, FinalAggregate>,
}

impl<K: Ord> FinalizedGroups<K> {
    pub fn empty() -> Self {
        Self {
            groups: BTreeMap::new(),
        }
    }

    /// Combine the outputs of reducers that own disjoint key sets
    pub fn union(mut self, other: Self) -> Self {
        self.groups.extend(other.groups);
        self
    }

    pub fn get(&self, key: &K) -> Option<&FinalAggregate> {
        self.groups.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &FinalAggregate)> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<K> IntoIterator for FinalizedGroups<K> {
    type Item = (K, FinalAggregate);
    type IntoIter = std::collections::btree_map::IntoIter<K, FinalAggregate>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}
