//! Rolling metric history for sparklines

use super::MetricSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of retained snapshots
pub const DEFAULT_HISTORY_CAPACITY: usize = 60;

/// Scalar field extracted by [`MetricsHistory::series`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[allow(missing_docs)]
pub enum MetricField {
    Throughput,
    LatencyP50,
    LatencyP95,
    LatencyP99,
    Availability,
    ErrorRate,
    ScalabilityScore,
    MonthlyCost,
    QueueDepth,
    CacheHitRate,
}

impl MetricField {
    /// Read the field, `None` when the snapshot omits it
    #[must_use]
    pub fn read(self, snapshot: &MetricSnapshot) -> Option<f64> {
        match self {
            Self::Throughput => Some(snapshot.throughput),
            Self::LatencyP50 => Some(snapshot.latency_p50_ms),
            Self::LatencyP95 => Some(snapshot.latency_p95_ms),
            Self::LatencyP99 => Some(snapshot.latency_p99_ms),
            Self::Availability => Some(snapshot.availability),
            Self::ErrorRate => Some(snapshot.error_rate),
            Self::ScalabilityScore => Some(snapshot.scalability_score),
            Self::MonthlyCost => Some(snapshot.monthly_cost),
            Self::QueueDepth => snapshot.queue_depth,
            Self::CacheHitRate => snapshot.cache_hit_rate,
        }
    }
}

/// Bounded window of recent snapshots, oldest first
#[derive(Debug, Clone)]
pub struct MetricsHistory {
    capacity: usize,
    snapshots: VecDeque<MetricSnapshot>,
}

impl MetricsHistory {
    /// Create a history retaining at most `capacity` snapshots
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            snapshots: VecDeque::with_capacity(capacity),
        }
    }

    /// Append a snapshot, evicting the oldest when full
    pub fn push(&mut self, snapshot: MetricSnapshot) {
        if self.snapshots.len() == self.capacity {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(snapshot);
    }

    /// Most recent snapshot
    #[inline]
    #[must_use]
    pub fn latest(&self) -> Option<&MetricSnapshot> {
        self.snapshots.back()
    }

    /// Values of one field, oldest first, skipping snapshots that omit it
    #[must_use]
    pub fn series(&self, field: MetricField) -> Vec<f64> {
        self.snapshots.iter().filter_map(|s| field.read(s)).collect()
    }

    /// Snapshots oldest first
    pub fn iter(&self) -> impl Iterator<Item = &MetricSnapshot> {
        self.snapshots.iter()
    }

    /// Number of retained snapshots
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Check if no snapshot is retained
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Maximum number of retained snapshots
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every snapshot, keeping the capacity
    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}

impl Default for MetricsHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(throughput: f64) -> MetricSnapshot {
        MetricSnapshot {
            throughput,
            ..MetricSnapshot::default()
        }
    }

    #[test]
    fn evicts_oldest() {
        let mut history = MetricsHistory::new(3);
        for t in 1..=5 {
            history.push(snapshot(f64::from(t)));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.series(MetricField::Throughput), vec![3.0, 4.0, 5.0]);
        assert_eq!(history.latest().map(|s| s.throughput), Some(5.0));
    }

    #[test]
    fn optional_fields_are_skipped() {
        let mut history = MetricsHistory::default();
        history.push(snapshot(1.0));
        history.push(MetricSnapshot {
            queue_depth: Some(4.0),
            ..MetricSnapshot::default()
        });
        assert_eq!(history.series(MetricField::QueueDepth), vec![4.0]);
        assert_eq!(history.capacity(), DEFAULT_HISTORY_CAPACITY);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut history = MetricsHistory::new(4);
        history.push(snapshot(1.0));
        history.push(snapshot(2.0));
        assert_eq!(history.len(), 2);
        history.clear();
        assert!(history.is_empty());
        assert!(history.latest().is_none());
        assert_eq!(history.capacity(), 4);
    }
}
