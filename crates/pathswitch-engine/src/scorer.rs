//! Path scoring with weighted telemetry
//!
//! `S = w1·T − w2·(D / 10) − w3·(L · 10)`
//!
//! Delay (tens to hundreds of ms) is divided by 10 and loss (0-5 % typical)
//! is multiplied by 10 so both land on the same magnitude as throughput in
//! Mbps. The constants are fixed; recorded scores depend on them.

use pathswitch_common::{PathId, PathTable, Telemetry, WeightVector};

/// Divisor applied to delay
pub const DELAY_SCALE: f64 = 10.0;

/// Multiplier applied to packet loss
pub const LOSS_SCALE: f64 = 10.0;

/// Stateless path scorer
#[derive(Debug, Default, Clone, Copy)]
pub struct PathScorer;

impl PathScorer {
    /// Score one reading. Unclamped; may be negative.
    #[inline]
    pub fn score(telemetry: &Telemetry, weights: &WeightVector) -> f64 {
        weights.w1 * telemetry.throughput
            - weights.w2 * (telemetry.delay / DELAY_SCALE)
            - weights.w3 * (telemetry.packet_loss * LOSS_SCALE)
    }

    /// Score every path with the same weight snapshot
    pub fn score_all(telemetry: &PathTable<Telemetry>, weights: &WeightVector) -> PathTable<f64> {
        telemetry.map(|_, t| Self::score(t, weights))
    }

    /// Paths ordered by descending score; equal scores keep declaration order
    pub fn rank(scores: &PathTable<f64>) -> Vec<(PathId, f64)> {
        let mut ranked: Vec<_> = scores.iter().map(|(p, s)| (p, *s)).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}
