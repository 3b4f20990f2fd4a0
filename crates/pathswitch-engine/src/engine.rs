//! Decision engine - incumbent tracking and the hysteresis rule
//!
//! A challenger only takes over when its score is strictly greater than the
//! baseline plus the switching margin. Among eligible challengers the highest
//! score wins and ties go to the earliest path in declaration order. There is
//! no dwell timer; the margin is the only damping.

use crate::config::Baseline;
use crate::history::History;
use crate::scorer::PathScorer;
use chrono::{DateTime, Utc};
use pathswitch_common::{PathId, PathTable, Telemetry, WeightVector};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Committed result of one tick
///
/// Telemetry and score belong to the path that is active after the tick,
/// rounded for display (throughput/delay 1 decimal, loss and score 2).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRecord {
    /// Decision time
    pub timestamp: DateTime<Utc>,
    /// Throughput of the winning path (Mbps)
    pub throughput: f64,
    /// Delay of the winning path (ms)
    pub delay: f64,
    /// Packet loss of the winning path (%)
    pub packet_loss: f64,
    /// Path active after this tick
    pub active_path: PathId,
    /// Score of the active path on this tick
    pub score: f64,
}

impl DecisionRecord {
    fn new(timestamp: DateTime<Utc>, path: PathId, telemetry: &Telemetry, score: f64) -> Self {
        Self {
            timestamp,
            throughput: round_to(telemetry.throughput, 1),
            delay: round_to(telemetry.delay, 1),
            packet_loss: round_to(telemetry.packet_loss, 2),
            active_path: path,
            score: round_to(score, 2),
        }
    }
}

#[inline]
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Outcome of the switching rule, before it is committed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    /// Path that should be active
    pub path: PathId,
    /// Full-precision score of that path on this tick
    pub score: f64,
    /// Whether this moves away from the incumbent
    pub switched: bool,
}

/// Stateful decision engine
#[derive(Debug)]
pub struct DecisionEngine {
    active_path: PathId,
    active_score: f64,
    baseline: Baseline,
    last_scores: PathTable<f64>,
    history: History,
    switches: u64,
}

impl DecisionEngine {
    /// Create engine on the default path with zero score
    pub fn new(history_capacity: usize) -> Self {
        Self::with_baseline(history_capacity, Baseline::default())
    }

    /// Create engine with an explicit comparison baseline
    pub fn with_baseline(history_capacity: usize, baseline: Baseline) -> Self {
        Self {
            active_path: PathId::default(),
            active_score: 0.0,
            baseline,
            last_scores: PathTable::default(),
            history: History::new(history_capacity),
            switches: 0,
        }
    }

    /// Apply the switching rule to a score table without committing anything
    pub fn decide(&self, scores: &PathTable<f64>, margin: f64) -> Decision {
        let incumbent = self.active_path;
        let incumbent_score = scores[incumbent];
        let baseline = match self.baseline {
            Baseline::CurrentTick => incumbent_score,
            Baseline::Stored => self.active_score,
        };
        let threshold = baseline + margin;

        let mut best = incumbent;
        let mut best_score = baseline;
        for (path, &score) in scores.iter() {
            if path == incumbent {
                continue;
            }
            // Strict comparison keeps the earliest path on ties
            if score > threshold && score > best_score {
                best = path;
                best_score = score;
            }
        }

        if best == incumbent {
            Decision {
                path: incumbent,
                score: incumbent_score,
                switched: false,
            }
        } else {
            Decision {
                path: best,
                score: best_score,
                switched: true,
            }
        }
    }

    /// Score every path, apply the margin rule, record and commit the result
    pub fn evaluate_tick(
        &mut self,
        telemetry: &PathTable<Telemetry>,
        weights: &WeightVector,
        margin: f64,
    ) -> DecisionRecord {
        self.evaluate_tick_at(Utc::now(), telemetry, weights, margin)
    }

    /// [`evaluate_tick`](Self::evaluate_tick) with an explicit timestamp
    pub fn evaluate_tick_at(
        &mut self,
        timestamp: DateTime<Utc>,
        telemetry: &PathTable<Telemetry>,
        weights: &WeightVector,
        margin: f64,
    ) -> DecisionRecord {
        let scores = PathScorer::score_all(telemetry, weights);
        let decision = self.decide(&scores, margin);

        if decision.switched {
            self.switches += 1;
            metrics::counter!("pathswitch_switches_total").increment(1);
            info!(
                from = %self.active_path,
                to = %decision.path,
                from_score = scores[self.active_path],
                to_score = decision.score,
                margin,
                "path switched"
            );
        }

        let record = DecisionRecord::new(
            timestamp,
            decision.path,
            &telemetry[decision.path],
            decision.score,
        );
        debug!(
            active = %record.active_path,
            score = record.score,
            ranking = ?PathScorer::rank(&scores),
            "tick evaluated"
        );

        self.active_path = decision.path;
        self.active_score = decision.score;
        self.last_scores = scores;
        self.history.push(record);
        record
    }

    /// Return to the initial state: default path, zero score, empty history
    pub fn reset(&mut self) {
        self.active_path = PathId::default();
        self.active_score = 0.0;
        self.last_scores = PathTable::default();
        self.history.clear();
        self.switches = 0;
    }

    /// Currently active path
    pub fn active_path(&self) -> PathId {
        self.active_path
    }

    /// Full-precision score of the active path from its last tick
    pub fn active_score(&self) -> f64 {
        self.active_score
    }

    /// Scores of every path from the last tick
    pub fn last_scores(&self) -> &PathTable<f64> {
        &self.last_scores
    }

    /// Comparison baseline in use
    pub fn baseline(&self) -> Baseline {
        self.baseline
    }

    /// Switches since creation or last reset
    pub fn switch_count(&self) -> u64 {
        self.switches
    }

    /// Committed decisions
    pub fn history(&self) -> &History {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn table(p1: Telemetry, p2: Telemetry, p3: Telemetry) -> PathTable<Telemetry> {
        PathTable::from_fn(|p| match p {
            PathId::Path1 => p1,
            PathId::Path2 => p2,
            PathId::Path3 => p3,
        })
    }

    /// Telemetry whose score under `throughput_only()` is exactly `score`
    fn scored(score: f64) -> Telemetry {
        Telemetry::new(score, 0.0, 0.0)
    }

    fn throughput_only() -> WeightVector {
        WeightVector::new(1.0, 0.0, 0.0)
    }

    #[test]
    fn test_reference_example_no_switch() {
        let mut engine = DecisionEngine::new(100);
        let telemetry = table(
            Telemetry::new(80.0, 100.0, 1.0),
            Telemetry::new(50.0, 40.0, 0.5),
            Telemetry::new(30.0, 150.0, 2.0),
        );

        let record = engine.evaluate_tick(&telemetry, &WeightVector::new(0.4, 0.3, 0.3), 5.0);

        assert_eq!(record.active_path, PathId::Path1);
        assert_eq!(record.score, 26.0);
        assert_eq!(record.throughput, 80.0);
        assert_eq!(record.delay, 100.0);
        assert_eq!(record.packet_loss, 1.0);
        assert_eq!(engine.active_path(), PathId::Path1);
        assert_eq!(engine.history().len(), 1);
        assert_eq!(engine.switch_count(), 0);
    }

    #[test]
    fn test_switch_above_margin() {
        let mut engine = DecisionEngine::new(100);
        let telemetry = table(scored(10.0), scored(15.5), scored(12.0));

        let record = engine.evaluate_tick(&telemetry, &throughput_only(), 5.0);

        assert_eq!(record.active_path, PathId::Path2);
        assert_eq!(record.score, 15.5);
        assert_eq!(engine.active_score(), 15.5);
        assert_eq!(engine.switch_count(), 1);
    }

    #[test]
    fn test_margin_is_strict() {
        let mut engine = DecisionEngine::new(100);
        let telemetry = table(scored(10.0), scored(15.0), scored(15.0));

        let record = engine.evaluate_tick(&telemetry, &throughput_only(), 5.0);

        assert_eq!(record.active_path, PathId::Path1);
        assert_eq!(record.score, 10.0);
    }

    #[test]
    fn test_best_eligible_challenger_wins() {
        let mut engine = DecisionEngine::new(100);
        let telemetry = table(scored(10.0), scored(16.0), scored(30.0));

        let record = engine.evaluate_tick(&telemetry, &throughput_only(), 5.0);

        assert_eq!(record.active_path, PathId::Path3);
        assert_eq!(record.score, 30.0);
    }

    #[test]
    fn test_tie_break_by_declaration_order() {
        for _ in 0..10 {
            let mut engine = DecisionEngine::new(100);
            let telemetry = table(scored(10.0), scored(20.0), scored(20.0));

            let record = engine.evaluate_tick(&telemetry, &throughput_only(), 5.0);
            assert_eq!(record.active_path, PathId::Path2);
        }

        // From Path-2, the tie between Path-1 and Path-3 goes to Path-1
        let mut engine = DecisionEngine::new(100);
        engine.evaluate_tick(
            &table(scored(0.0), scored(10.0), scored(0.0)),
            &throughput_only(),
            5.0,
        );
        assert_eq!(engine.active_path(), PathId::Path2);
        engine.evaluate_tick(
            &table(scored(40.0), scored(10.0), scored(40.0)),
            &throughput_only(),
            5.0,
        );
        assert_eq!(engine.active_path(), PathId::Path1);
    }

    #[test]
    fn test_incumbent_rescored_each_tick() {
        let mut engine = DecisionEngine::new(100);
        let weights = throughput_only();

        engine.evaluate_tick(&table(scored(50.0), scored(0.0), scored(0.0)), &weights, 5.0);
        assert_eq!(engine.active_score(), 50.0);

        // Incumbent degrades to 20; Path-2 at 24 is within margin of the fresh score
        let record =
            engine.evaluate_tick(&table(scored(20.0), scored(24.0), scored(0.0)), &weights, 5.0);
        assert_eq!(record.active_path, PathId::Path1);
        assert_eq!(record.score, 20.0);

        // Path-2 at 26 clears 20 + 5
        let record =
            engine.evaluate_tick(&table(scored(20.0), scored(26.0), scored(0.0)), &weights, 5.0);
        assert_eq!(record.active_path, PathId::Path2);
    }

    #[test]
    fn test_stored_baseline() {
        let mut engine = DecisionEngine::with_baseline(100, Baseline::Stored);
        let weights = throughput_only();

        // First tick compares against the initial zero score
        let record =
            engine.evaluate_tick(&table(scored(3.0), scored(6.0), scored(0.0)), &weights, 5.0);
        assert_eq!(record.active_path, PathId::Path2);
        assert_eq!(engine.active_score(), 6.0);

        // Incumbent improved to 20, yet 12 clears the stored 6 + 5
        let record =
            engine.evaluate_tick(&table(scored(12.0), scored(20.0), scored(0.0)), &weights, 5.0);
        assert_eq!(record.active_path, PathId::Path1);
        assert_eq!(record.score, 12.0);

        // Incumbent collapsed to 1, yet 16 does not clear the stored 12 + 5
        let record =
            engine.evaluate_tick(&table(scored(1.0), scored(16.0), scored(0.0)), &weights, 5.0);
        assert_eq!(record.active_path, PathId::Path1);
        // Committed score is the incumbent's fresh score
        assert_eq!(record.score, 1.0);
        assert_eq!(engine.active_score(), 1.0);

        // Next tick the stored baseline is 1, so 6.5 is enough
        let record =
            engine.evaluate_tick(&table(scored(0.0), scored(6.5), scored(0.0)), &weights, 5.0);
        assert_eq!(record.active_path, PathId::Path2);
    }

    #[test]
    fn test_baselines_diverge() {
        let weights = throughput_only();
        let ticks = [
            table(scored(30.0), scored(0.0), scored(0.0)),
            table(scored(1.0), scored(16.0), scored(0.0)),
        ];

        let mut current = DecisionEngine::with_baseline(100, Baseline::CurrentTick);
        let mut stored = DecisionEngine::with_baseline(100, Baseline::Stored);
        for telemetry in &ticks {
            current.evaluate_tick(telemetry, &weights, 5.0);
            stored.evaluate_tick(telemetry, &weights, 5.0);
        }

        // 16 > 1 + 5 against the fresh incumbent, but not > 30 + 5 against the stored one
        assert_eq!(current.active_path(), PathId::Path2);
        assert_eq!(stored.active_path(), PathId::Path1);
    }

    #[test]
    fn test_record_rounding_and_full_precision_compare() {
        let mut engine = DecisionEngine::new(100);
        let weights = throughput_only();

        // 15.004 rounds to 15.00 for display but still clears 10 + 5
        let telemetry = table(
            scored(10.0),
            Telemetry::new(15.004, 12.345, 0.456),
            scored(0.0),
        );
        let record = engine.evaluate_tick(&telemetry, &weights, 5.0);

        assert_eq!(record.active_path, PathId::Path2);
        assert_eq!(record.score, 15.0);
        assert_eq!(record.throughput, 15.0);
        assert_eq!(record.delay, 12.3);
        assert_eq!(record.packet_loss, 0.46);
        assert!((engine.active_score() - 15.004).abs() < 1e-12);
    }

    #[test]
    fn test_reset() {
        let mut engine = DecisionEngine::new(100);
        engine.evaluate_tick(
            &table(scored(0.0), scored(0.0), scored(50.0)),
            &throughput_only(),
            5.0,
        );
        assert_eq!(engine.active_path(), PathId::Path3);

        engine.reset();

        assert_eq!(engine.active_path(), PathId::Path1);
        assert_eq!(engine.active_score(), 0.0);
        assert!(engine.history().is_empty());
        assert_eq!(engine.switch_count(), 0);
    }

    #[test]
    fn test_history_keeps_latest_window() {
        let capacity = 100;
        let ticks = 250u32;
        let mut engine = DecisionEngine::new(capacity);

        // Throughput encodes the tick number; Path-1 never loses
        for tick in 1..=ticks {
            let telemetry = table(scored(1000.0 + tick as f64), scored(0.0), scored(0.0));
            engine.evaluate_tick(&telemetry, &throughput_only(), 5.0);
        }

        let history = engine.history().to_vec();
        assert_eq!(history.len(), capacity);
        assert_eq!(history[0].throughput, 1000.0 + (ticks - capacity as u32 + 1) as f64);
        assert_eq!(history[capacity - 1].throughput, 1000.0 + ticks as f64);
        assert!(history.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    fn telemetry_strategy() -> impl Strategy<Value = Telemetry> {
        (0.0..200.0f64, 0.0..500.0f64, 0.0..100.0f64).prop_map(|(t, d, l)| Telemetry::new(t, d, l))
    }

    fn weights_strategy() -> impl Strategy<Value = WeightVector> {
        (0.0..1.0f64, 0.0..1.0f64, 0.0..1.0f64).prop_map(|(a, b, c)| WeightVector::new(a, b, c))
    }

    proptest! {
        #[test]
        fn prop_no_switch_below_margin(
            ticks in prop::collection::vec(
                (telemetry_strategy(), telemetry_strategy(), telemetry_strategy()),
                1..20,
            ),
            weights in weights_strategy(),
            margin in 0.0..50.0f64,
        ) {
            let mut engine = DecisionEngine::new(100);
            for (a, b, c) in ticks {
                let telemetry = table(a, b, c);
                let scores = PathScorer::score_all(&telemetry, &weights);
                let before = engine.active_path();
                let threshold = scores[before] + margin;
                let any_eligible = PathId::ALL
                    .into_iter()
                    .any(|p| p != before && scores[p] > threshold);

                let record = engine.evaluate_tick(&telemetry, &weights, margin);

                if any_eligible {
                    prop_assert_ne!(record.active_path, before);
                    prop_assert!(scores[record.active_path] > threshold);
                } else {
                    prop_assert_eq!(record.active_path, before);
                }
                // Committed score is the scorer's output for the committed path
                prop_assert_eq!(engine.active_score(), scores[record.active_path]);
            }
        }

        #[test]
        fn prop_history_bounded(capacity in 1usize..20, ticks in 0usize..60) {
            let mut engine = DecisionEngine::new(capacity);
            for tick in 0..ticks {
                let telemetry = table(scored(tick as f64), scored(0.0), scored(0.0));
                engine.evaluate_tick(&telemetry, &WeightVector::new(1.0, 0.0, 0.0), 1000.0);
            }

            let history = engine.history();
            prop_assert_eq!(history.len(), ticks.min(capacity));
            let first = history.iter().next();
            if let Some(first) = first {
                prop_assert_eq!(first.throughput, ticks.saturating_sub(capacity) as f64);
            }
        }
    }
}
