//! Per-path quality telemetry

use serde::{Deserialize, Serialize};

/// One telemetry reading for one path
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Telemetry {
    /// Throughput in Mbps
    pub throughput: f64,
    /// End-to-end delay in milliseconds
    pub delay: f64,
    /// Packet loss percentage (0-100)
    pub packet_loss: f64,
}

impl Telemetry {
    /// Reading substituted when a path cannot be measured
    pub const WORST_CASE: Self = Self::new(0.0, 0.0, 100.0);

    /// Create a reading
    pub const fn new(throughput: f64, delay: f64, packet_loss: f64) -> Self {
        Self {
            throughput,
            delay,
            packet_loss,
        }
    }

    /// Whether every field is finite and inside its documented range
    pub fn is_valid(&self) -> bool {
        self.throughput.is_finite()
            && self.delay.is_finite()
            && self.packet_loss.is_finite()
            && self.throughput >= 0.0
            && self.delay >= 0.0
            && (0.0..=100.0).contains(&self.packet_loss)
    }
}
