//! Hysteresis-Gated Path Switching Engine
//!
//! Periodically scores every candidate path from fresh telemetry and moves
//! traffic to a challenger only when it beats the incumbent by more than the
//! switching margin.
//!
//! # Components
//!
//! - [`PathScorer`]: weighted score over throughput, delay and loss
//! - [`DecisionEngine`]: incumbent tracking and the margin rule
//! - [`History`]: bounded ring of committed decisions
//! - [`TelemetryCollector`]: bounded-latency probing with fallback readings
//! - [`Scheduler`]: periodic driver with start/pause/reset
//!
//! ```text
//!   Scheduler ──tick──▶ TelemetryCollector ──▶ PathScorer ──▶ DecisionEngine ──▶ History
//!       ▲                                                          │
//!       └──────────── start / pause / reset / snapshot ◀──────────┘
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod engine;
pub mod history;
pub mod scheduler;
pub mod scorer;
pub mod telemetry;

pub use config::{Baseline, EngineConfig, FallbackPolicy, LiveConfig};
pub use engine::{Decision, DecisionEngine, DecisionRecord};
pub use history::{History, HistorySummary, DEFAULT_HISTORY_CAPACITY, MAX_HISTORY_CAPACITY};
pub use scheduler::{EngineSnapshot, RunState, Scheduler};
pub use scorer::PathScorer;
pub use telemetry::{SyntheticTelemetry, TelemetryCollector, TelemetrySource};

pub use pathswitch_common::{
    DecisionParameters, EngineError, EngineResult, PathId, PathTable, Telemetry, WeightVector,
};
