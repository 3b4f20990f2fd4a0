//! Telemetry sources and bounded-latency collection

use crate::config::FallbackPolicy;
use async_trait::async_trait;
use parking_lot::Mutex;
use pathswitch_common::{EngineError, EngineResult, PathId, PathTable, Telemetry};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Produces a fresh reading for a path on demand
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Measure one path
    async fn telemetry(&self, path: PathId) -> EngineResult<Telemetry>;
}

/// Random per-path readings around fixed baselines
///
/// | path   | throughput (Mbps) | delay (ms) |
/// |--------|-------------------|------------|
/// | Path-1 | 80 ± 20           | 100 ± 25   |
/// | Path-2 | 50 ± 20           | 40 ± 25    |
/// | Path-3 | 30 ± 20           | 150 ± 25   |
///
/// Throughput is floored at 0, delay at 10 ms, loss is uniform in [0, 5) %.
pub struct SyntheticTelemetry {
    rng: Mutex<StdRng>,
}

impl SyntheticTelemetry {
    const THROUGHPUT_SPREAD: f64 = 20.0;
    const DELAY_SPREAD: f64 = 25.0;
    const MIN_DELAY: f64 = 10.0;
    const MAX_LOSS: f64 = 5.0;

    /// Reproducible source
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Source seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    fn baseline(path: PathId) -> (f64, f64) {
        match path {
            PathId::Path1 => (80.0, 100.0),
            PathId::Path2 => (50.0, 40.0),
            PathId::Path3 => (30.0, 150.0),
        }
    }

    /// Draw one reading
    pub fn sample(&self, path: PathId) -> Telemetry {
        let (base_throughput, base_delay) = Self::baseline(path);
        let mut rng = self.rng.lock();

        let throughput = (base_throughput
            + rng.gen_range(-Self::THROUGHPUT_SPREAD..Self::THROUGHPUT_SPREAD))
        .max(0.0);
        let delay = (base_delay + rng.gen_range(-Self::DELAY_SPREAD..Self::DELAY_SPREAD))
            .max(Self::MIN_DELAY);
        let packet_loss = rng.gen_range(0.0..Self::MAX_LOSS);

        Telemetry::new(throughput, delay, packet_loss)
    }
}

impl Default for SyntheticTelemetry {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[async_trait]
impl TelemetrySource for SyntheticTelemetry {
    async fn telemetry(&self, path: PathId) -> EngineResult<Telemetry> {
        Ok(self.sample(path))
    }
}

/// Queries a source for every path with a timeout and substitutes a
/// fallback reading when a path cannot be measured
pub struct TelemetryCollector {
    source: Arc<dyn TelemetrySource>,
    last_known: Mutex<PathTable<Option<Telemetry>>>,
}

impl TelemetryCollector {
    /// Wrap a source
    pub fn new(source: Arc<dyn TelemetrySource>) -> Self {
        Self {
            source,
            last_known: Mutex::new(PathTable::default()),
        }
    }

    /// One reading per path, in declaration order
    ///
    /// Never fails: unavailable paths get the fallback reading.
    pub async fn collect(
        &self,
        timeout: Duration,
        fallback: FallbackPolicy,
    ) -> PathTable<Telemetry> {
        let mut readings = PathTable::default();
        for path in PathId::ALL {
            readings[path] = match self.probe(path, timeout).await {
                Ok(reading) => {
                    self.last_known.lock()[path] = Some(reading);
                    reading
                }
                Err(err) => {
                    let substitute = self.fallback_for(path, fallback);
                    metrics::counter!(
                        "pathswitch_telemetry_fallbacks_total",
                        "path" => path.as_str()
                    )
                    .increment(1);
                    warn!(%path, error = %err, ?fallback, "telemetry unavailable, using fallback");
                    substitute
                }
            };
        }
        readings
    }

    /// Probe one path, bounded by `timeout`
    pub async fn probe(&self, path: PathId, timeout: Duration) -> EngineResult<Telemetry> {
        let reading = tokio::time::timeout(timeout, self.source.telemetry(path))
            .await
            .map_err(|_| EngineError::TelemetryUnavailable {
                path,
                reason: format!("timed out after {}ms", timeout.as_millis()),
            })??;

        if !reading.is_valid() {
            return Err(EngineError::TelemetryUnavailable {
                path,
                reason: format!("reading out of range: {reading:?}"),
            });
        }
        Ok(reading)
    }

    fn fallback_for(&self, path: PathId, policy: FallbackPolicy) -> Telemetry {
        match policy {
            FallbackPolicy::WorstCase => Telemetry::WORST_CASE,
            FallbackPolicy::LastKnown => {
                self.last_known.lock()[path].unwrap_or(Telemetry::WORST_CASE)
            }
        }
    }

    /// Forget last-known readings
    pub fn clear(&self) {
        *self.last_known.lock() = PathTable::default();
    }
}
