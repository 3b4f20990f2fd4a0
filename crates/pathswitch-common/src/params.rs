//! Scoring weights and switching parameters

use crate::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Scoring weights for throughput, delay and loss
///
/// Weights are expected in [0, 1] and conventionally sum to 1, but any
/// finite value is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightVector {
    /// Throughput weight
    pub w1: f64,
    /// Delay weight
    pub w2: f64,
    /// Loss weight
    pub w3: f64,
}

impl WeightVector {
    /// Balanced default profile
    pub const BALANCED: Self = Self::new(0.4, 0.3, 0.3);

    /// Create weights
    pub const fn new(w1: f64, w2: f64, w3: f64) -> Self {
        Self { w1, w2, w3 }
    }

    /// Reject non-finite weights
    pub fn validate(&self) -> EngineResult<()> {
        for (name, value) in [("w1", self.w1), ("w2", self.w2), ("w3", self.w3)] {
            if !value.is_finite() {
                return Err(EngineError::Configuration(format!(
                    "weight {name} must be finite, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for WeightVector {
    fn default() -> Self {
        Self::BALANCED
    }
}

/// Hysteresis margin and scheduler period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionParameters {
    /// Minimum score advantage a challenger needs over the incumbent
    pub switching_margin: f64,
    /// Scheduler period in milliseconds
    pub decision_interval: u64,
}

impl DecisionParameters {
    /// Default margin
    pub const DEFAULT_MARGIN: f64 = 5.0;
    /// Default period (ms)
    pub const DEFAULT_INTERVAL_MS: u64 = 1000;

    /// Create parameters
    pub const fn new(switching_margin: f64, decision_interval: u64) -> Self {
        Self {
            switching_margin,
            decision_interval,
        }
    }

    /// Margin must be finite and non-negative, interval strictly positive
    pub fn validate(&self) -> EngineResult<()> {
        if !self.switching_margin.is_finite() || self.switching_margin < 0.0 {
            return Err(EngineError::Configuration(format!(
                "switching margin must be a non-negative number, got {}",
                self.switching_margin
            )));
        }
        if self.decision_interval == 0 {
            return Err(EngineError::Configuration(
                "decision interval must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Scheduler period
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.decision_interval)
    }
}

impl Default for DecisionParameters {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MARGIN, Self::DEFAULT_INTERVAL_MS)
    }
}
