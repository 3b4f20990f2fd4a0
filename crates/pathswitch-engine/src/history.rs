//! Bounded decision history for analytics and export

use crate::engine::DecisionRecord;
use pathswitch_common::PathId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// Records kept when no capacity is configured
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Largest accepted history capacity
pub const MAX_HISTORY_CAPACITY: usize = 1_000_000;

/// Fixed-capacity FIFO of committed decisions, oldest first
#[derive(Debug, Clone)]
pub struct History {
    records: VecDeque<DecisionRecord>,
    capacity: usize,
}

impl History {
    /// Create an empty history; capacity is at least one
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY)),
            capacity,
        }
    }

    pub(crate) fn push(&mut self, record: DecisionRecord) {
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }

    /// Maximum number of records
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of records held
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no decision has been recorded
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in chronological order
    pub fn iter(&self) -> impl Iterator<Item = &DecisionRecord> {
        self.records.iter()
    }

    /// Most recent record
    pub fn latest(&self) -> Option<&DecisionRecord> {
        self.records.back()
    }

    /// Owned copy of the records in chronological order
    pub fn to_vec(&self) -> Vec<DecisionRecord> {
        self.records.iter().copied().collect()
    }

    /// JSON array of the records in chronological order
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.records)
    }

    /// Aggregate statistics over the retained window
    pub fn summary(&self) -> HistorySummary {
        let samples = self.records.len();
        let mut summary = HistorySummary {
            samples,
            ..Default::default()
        };
        if samples == 0 {
            return summary;
        }

        let mut previous: Option<PathId> = None;
        for record in &self.records {
            summary.avg_throughput += record.throughput;
            summary.avg_delay += record.delay;
            summary.avg_packet_loss += record.packet_loss;
            summary.avg_score += record.score;
            *summary.records_per_path.entry(record.active_path).or_insert(0) += 1;

            if previous.is_some_and(|p| p != record.active_path) {
                summary.switches += 1;
            }
            previous = Some(record.active_path);
        }

        let n = samples as f64;
        summary.avg_throughput /= n;
        summary.avg_delay /= n;
        summary.avg_packet_loss /= n;
        summary.avg_score /= n;
        summary
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

/// Aggregates over the retained history window
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    /// Number of records
    pub samples: usize,
    /// Mean throughput of the active path
    pub avg_throughput: f64,
    /// Mean delay of the active path
    pub avg_delay: f64,
    /// Mean packet loss of the active path
    pub avg_packet_loss: f64,
    /// Mean score of the active path
    pub avg_score: f64,
    /// Active-path changes between consecutive records
    pub switches: usize,
    /// How many records each path was active for
    pub records_per_path: BTreeMap<PathId, usize>,
}
