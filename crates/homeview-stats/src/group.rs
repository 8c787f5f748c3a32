//! Grouped aggregates
//!
//! A `GroupedAggregate` is the equivalent of a group-by followed by a
//! mean or count: values are bucketed by key and each bucket keeps a
//! running count and sum. Keys are kept in sorted order so series come
//! out ready to plot.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Aggregation applied to each group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    Mean,
    Count,
}

/// Running totals for one group
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GroupTotals {
    pub count: usize,
    pub sum: f64,
}

impl GroupTotals {
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    pub fn value(&self, aggregation: Aggregation) -> Option<f64> {
        match aggregation {
            Aggregation::Mean => self.mean(),
            Aggregation::Count => Some(self.count as f64),
        }
    }
}

/// Values grouped by key
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedAggregate<K: Ord> {
    groups: BTreeMap<K, GroupTotals>,
}

impl<K: Ord> Default for GroupedAggregate<K> {
    fn default() -> Self {
        Self {
            groups: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Clone> GroupedAggregate<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group items by `key`, aggregating `value`. Non-finite values are skipped.
    pub fn from_items<T>(
        items: impl IntoIterator<Item = T>,
        key: impl Fn(&T) -> K,
        value: impl Fn(&T) -> f64,
    ) -> Self {
        let mut aggregate = Self::new();
        for item in items {
            aggregate.add(key(&item), value(&item));
        }
        aggregate
    }

    /// Add one value to a group
    pub fn add(&mut self, key: K, value: f64) {
        if !value.is_finite() {
            return;
        }
        let totals = self.groups.entry(key).or_default();
        totals.count += 1;
        totals.sum += value;
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Totals for a group
    pub fn get(&self, key: &K) -> Option<&GroupTotals> {
        self.groups.get(key)
    }

    /// Mean of a group
    pub fn mean(&self, key: &K) -> Option<f64> {
        self.get(key).and_then(GroupTotals::mean)
    }

    /// Number of values in a group (0 for unknown keys)
    pub fn count(&self, key: &K) -> usize {
        self.get(key).map(|t| t.count).unwrap_or(0)
    }

    /// Sorted keys
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.groups.keys()
    }

    /// (key, aggregate) pairs in key order
    pub fn series(&self, aggregation: Aggregation) -> Vec<(K, f64)> {
        self.groups
            .iter()
            .filter_map(|(k, t)| t.value(aggregation).map(|v| (k.clone(), v)))
            .collect()
    }

    /// Group with the largest aggregate among those accepted by `filter`
    pub fn max_by(&self, aggregation: Aggregation, filter: impl Fn(&K) -> bool) -> Option<(K, f64)> {
        self.series(aggregation)
            .into_iter()
            .filter(|(k, _)| filter(k))
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }
}

/// Totally ordered `f64` for use as a group key
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FloatKey(pub f64);

impl PartialEq for FloatKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatKey {}

impl PartialOrd for FloatKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for FloatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
