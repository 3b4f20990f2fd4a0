//! Periodic driver for the decision engine
//!
//! One tokio task per run fires a tick every `decision_interval`. The period
//! is re-read before every sleep, so a new interval applies from the next
//! fire. Scheduled and manual ticks run one at a time end to end, each with
//! the config snapshot current when it begins. Ticks gather telemetry
//! without holding the engine lock and then commit under it, and only if
//! the run they belong to is still current;
//! `pause` and `reset` bump the run epoch under the same lock, so nothing
//! scheduled before them can land afterwards. The task itself is cancelled
//! and awaited before the control call returns.

use crate::config::{EngineConfig, LiveConfig};
use crate::engine::{DecisionEngine, DecisionRecord};
use crate::history::HistorySummary;
use crate::telemetry::{TelemetryCollector, TelemetrySource};
use parking_lot::Mutex;
use pathswitch_common::{DecisionParameters, EngineResult, PathId, WeightVector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Scheduler state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Initial state, and the state after reset
    Idle,
    /// Ticking
    Running,
    /// Stopped with state preserved
    Paused,
}

/// Point-in-time view of the engine for external consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSnapshot {
    /// Whether ticks are firing
    pub is_running: bool,
    /// Scheduler state
    pub state: RunState,
    /// Currently active path
    pub active_path: PathId,
    /// Score of the active path from its last tick
    pub active_score: f64,
    /// Last committed decision
    pub current: Option<DecisionRecord>,
    /// Every path's score from the last tick, keyed by path label
    pub last_scores: BTreeMap<PathId, f64>,
    /// Ticks committed since start-up or last reset
    pub ticks: u64,
    /// Switches since start-up or last reset
    pub switches: u64,
    /// Records currently held in history
    pub history_len: usize,
}

struct EngineCell {
    engine: DecisionEngine,
    state: RunState,
    epoch: u64,
    ticks: u64,
}

struct Shared {
    cell: Mutex<EngineCell>,
    // Held from snapshot to commit
    tick_gate: tokio::sync::Mutex<()>,
    config: LiveConfig,
    collector: TelemetryCollector,
}

impl Shared {
    /// Run one tick for `epoch`; `None` if the run ended before commit
    async fn tick(&self, epoch: u64) -> Option<DecisionRecord> {
        let _gate = self.tick_gate.lock().await;
        let config = self.config.snapshot();
        let telemetry = self
            .collector
            .collect(config.probe_timeout(), config.fallback)
            .await;

        let mut cell = self.cell.lock();
        if cell.state != RunState::Running || cell.epoch != epoch {
            metrics::counter!("pathswitch_ticks_discarded_total").increment(1);
            debug!(epoch, current = cell.epoch, "discarding tick from finished run");
            return None;
        }

        let record = cell
            .engine
            .evaluate_tick(&telemetry, &config.weights, config.switching_margin);
        cell.ticks += 1;
        metrics::counter!("pathswitch_ticks_total").increment(1);
        Some(record)
    }
}

struct RunningTask {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl RunningTask {
    async fn stop(self) {
        let _ = self.shutdown.send(());
        if let Err(err) = self.handle.await {
            warn!(error = %err, "scheduler task ended abnormally");
        }
    }
}

async fn run_loop(shared: Arc<Shared>, epoch: u64, mut shutdown: oneshot::Receiver<()>) {
    loop {
        let period = shared.config.snapshot().decision_interval();
        tokio::select! {
            _ = &mut shutdown => break,
            _ = tokio::time::sleep(period) => {}
        }

        tokio::select! {
            _ = &mut shutdown => break,
            record = shared.tick(epoch) => {
                if record.is_none() {
                    break;
                }
            }
        }
    }
    debug!(epoch, "scheduler loop stopped");
}

/// Owner of the decision engine and its periodic driver
///
/// Shared by handle (`Arc<Scheduler>`); control operations are serialized
/// and never fail.
pub struct Scheduler {
    shared: Arc<Shared>,
    task: tokio::sync::Mutex<Option<RunningTask>>,
}

impl Scheduler {
    /// Create an idle scheduler
    pub fn new(config: EngineConfig, source: Arc<dyn TelemetrySource>) -> EngineResult<Self> {
        let config = LiveConfig::new(config)?;
        let initial = config.snapshot();
        let engine = DecisionEngine::with_baseline(initial.history_capacity, initial.baseline);

        Ok(Self {
            shared: Arc::new(Shared {
                cell: Mutex::new(EngineCell {
                    engine,
                    state: RunState::Idle,
                    epoch: 0,
                    ticks: 0,
                }),
                tick_gate: tokio::sync::Mutex::new(()),
                config,
                collector: TelemetryCollector::new(source),
            }),
            task: tokio::sync::Mutex::new(None),
        })
    }

    /// Begin ticking; no-op while already running
    pub async fn start(&self) {
        let mut task = self.task.lock().await;

        let epoch = {
            let mut cell = self.shared.cell.lock();
            if cell.state == RunState::Running {
                return;
            }
            cell.state = RunState::Running;
            cell.epoch += 1;
            cell.epoch
        };

        if let Some(stale) = task.take() {
            stale.stop().await;
        }

        let (shutdown, rx) = oneshot::channel();
        let handle = tokio::spawn(run_loop(self.shared.clone(), epoch, rx));
        *task = Some(RunningTask { shutdown, handle });

        let config = self.shared.config.snapshot();
        info!(
            interval_ms = config.decision_interval_ms,
            margin = config.switching_margin,
            "decision engine started"
        );
    }

    /// Stop ticking and keep state
    pub async fn pause(&self) {
        let mut task = self.task.lock().await;
        {
            let mut cell = self.shared.cell.lock();
            if cell.state == RunState::Running {
                cell.state = RunState::Paused;
                cell.epoch += 1;
                info!(active = %cell.engine.active_path(), "decision engine paused");
            }
        }
        if let Some(running) = task.take() {
            running.stop().await;
        }
    }

    /// Stop ticking and return to the initial state
    pub async fn reset(&self) {
        let mut task = self.task.lock().await;
        {
            let mut cell = self.shared.cell.lock();
            cell.state = RunState::Idle;
            cell.epoch += 1;
            cell.ticks = 0;
            cell.engine.reset();
        }
        self.shared.collector.clear();
        if let Some(running) = task.take() {
            running.stop().await;
        }
        info!("decision engine reset");
    }

    /// Run one tick immediately if running; `None` otherwise
    pub async fn step(&self) -> Option<DecisionRecord> {
        let epoch = {
            let cell = self.shared.cell.lock();
            if cell.state != RunState::Running {
                return None;
            }
            cell.epoch
        };
        self.shared.tick(epoch).await
    }

    /// Replace the scoring weights
    pub fn set_weights(&self, weights: WeightVector) -> EngineResult<()> {
        self.shared.config.set_weights(weights)?;
        info!(w1 = weights.w1, w2 = weights.w2, w3 = weights.w3, "weights updated");
        Ok(())
    }

    /// Replace margin and interval; applies from the next scheduled fire
    pub fn set_params(&self, params: DecisionParameters) -> EngineResult<()> {
        self.shared.config.set_params(params)?;
        info!(
            margin = params.switching_margin,
            interval_ms = params.decision_interval,
            "parameters updated"
        );
        Ok(())
    }

    /// Replace weights, margin and interval together
    pub fn apply(&self, weights: WeightVector, params: DecisionParameters) -> EngineResult<()> {
        self.shared.config.set_all(weights, params)?;
        info!(
            w1 = weights.w1,
            w2 = weights.w2,
            w3 = weights.w3,
            margin = params.switching_margin,
            interval_ms = params.decision_interval,
            "profile applied"
        );
        Ok(())
    }

    /// Current configuration
    pub fn config(&self) -> Arc<EngineConfig> {
        self.shared.config.snapshot()
    }

    /// Current scheduler state
    pub fn state(&self) -> RunState {
        self.shared.cell.lock().state
    }

    /// Whether ticks are firing
    pub fn is_running(&self) -> bool {
        self.state() == RunState::Running
    }

    /// Point-in-time engine view
    pub fn snapshot(&self) -> EngineSnapshot {
        let cell = self.shared.cell.lock();
        let engine = &cell.engine;
        EngineSnapshot {
            is_running: cell.state == RunState::Running,
            state: cell.state,
            active_path: engine.active_path(),
            active_score: engine.active_score(),
            current: engine.history().latest().copied(),
            last_scores: engine
                .last_scores()
                .iter()
                .map(|(path, &score)| (path, score))
                .collect(),
            ticks: cell.ticks,
            switches: engine.switch_count(),
            history_len: engine.history().len(),
        }
    }

    /// History records in chronological order
    pub fn history(&self) -> Vec<DecisionRecord> {
        self.shared.cell.lock().engine.history().to_vec()
    }

    /// Aggregates over the history window
    pub fn history_summary(&self) -> HistorySummary {
        self.shared.cell.lock().engine.history().summary()
    }
}
