//! Engine configuration and the live, atomically swapped copy ticks read

use crate::history::{DEFAULT_HISTORY_CAPACITY, MAX_HISTORY_CAPACITY};
use arc_swap::ArcSwap;
use pathswitch_common::{DecisionParameters, EngineError, EngineResult, WeightVector};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Reading substituted when a path's telemetry is unavailable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Zero throughput, zero delay, 100 % loss
    #[default]
    WorstCase,
    /// Last good reading for that path, worst case if there is none
    LastKnown,
}

/// What a challenger's score is compared against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Baseline {
    /// Incumbent re-scored with this tick's telemetry
    #[default]
    CurrentTick,
    /// Incumbent's score as committed on the previous tick
    Stored,
}

/// Decision engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Scoring weights
    pub weights: WeightVector,
    /// Minimum advantage required to switch
    pub switching_margin: f64,
    /// Scheduler period (ms)
    pub decision_interval_ms: u64,
    /// Per-path telemetry timeout (ms)
    pub probe_timeout_ms: u64,
    /// Substitute reading policy
    pub fallback: FallbackPolicy,
    /// Comparison baseline (fixed for the engine's lifetime)
    pub baseline: Baseline,
    /// Number of decision records retained
    pub history_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            weights: WeightVector::BALANCED,
            switching_margin: DecisionParameters::DEFAULT_MARGIN,
            decision_interval_ms: DecisionParameters::DEFAULT_INTERVAL_MS,
            probe_timeout_ms: 250,
            fallback: FallbackPolicy::WorstCase,
            baseline: Baseline::CurrentTick,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Margin and interval
    pub fn params(&self) -> DecisionParameters {
        DecisionParameters::new(self.switching_margin, self.decision_interval_ms)
    }

    /// Scheduler period
    pub fn decision_interval(&self) -> Duration {
        self.params().interval()
    }

    /// Telemetry timeout
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Validate every field
    pub fn validate(&self) -> EngineResult<()> {
        self.weights.validate()?;
        self.params().validate()?;
        if self.probe_timeout_ms == 0 {
            return Err(EngineError::Configuration(
                "probe timeout must be greater than zero".into(),
            ));
        }
        if self.history_capacity == 0 || self.history_capacity > MAX_HISTORY_CAPACITY {
            return Err(EngineError::Configuration(format!(
                "history capacity must be between 1 and {MAX_HISTORY_CAPACITY}, got {}",
                self.history_capacity
            )));
        }
        Ok(())
    }
}

/// Shared configuration cell
///
/// Writers validate and publish a new snapshot; each tick loads exactly one
/// snapshot at its start and uses it for every candidate.
#[derive(Debug)]
pub struct LiveConfig(ArcSwap<EngineConfig>);

impl LiveConfig {
    /// Wrap a validated configuration
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self(ArcSwap::from_pointee(config)))
    }

    /// Current snapshot
    #[inline]
    pub fn snapshot(&self) -> Arc<EngineConfig> {
        self.0.load_full()
    }

    /// Replace the weights
    pub fn set_weights(&self, weights: WeightVector) -> EngineResult<()> {
        weights.validate()?;
        self.publish(|c| c.weights = weights);
        Ok(())
    }

    /// Replace margin and interval
    pub fn set_params(&self, params: DecisionParameters) -> EngineResult<()> {
        params.validate()?;
        self.publish(|c| {
            c.switching_margin = params.switching_margin;
            c.decision_interval_ms = params.decision_interval;
        });
        Ok(())
    }

    /// Replace weights, margin and interval in one swap
    pub fn set_all(&self, weights: WeightVector, params: DecisionParameters) -> EngineResult<()> {
        weights.validate()?;
        params.validate()?;
        self.publish(|c| {
            c.weights = weights;
            c.switching_margin = params.switching_margin;
            c.decision_interval_ms = params.decision_interval;
        });
        Ok(())
    }

    fn publish(&self, edit: impl Fn(&mut EngineConfig)) {
        self.0.rcu(|current| {
            let mut next = EngineConfig::clone(current);
            edit(&mut next);
            Arc::new(next)
        });
    }
}
