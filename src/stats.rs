use std::time::Instant;

use crate::models::RunningStats;

/// Running statistics for the current recognition session. Updates are O(1)
/// from monotonic accumulators; the bounded history buffer never constrains
/// these numbers.
#[derive(Debug, Default)]
pub struct StatsAggregator {
    total: u64,
    confidence_sum: f64,
    started_at: Option<Instant>,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the accumulators and anchors the rate clock at `now`.
    pub fn begin(&mut self, now: Instant) {
        self.total = 0;
        self.confidence_sum = 0.0;
        self.started_at = Some(now);
    }

    pub fn record(&mut self, confidence: f64) {
        self.total += 1;
        self.confidence_sum += confidence;
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn snapshot(&self) -> RunningStats {
        if self.total == 0 {
            return RunningStats::default();
        }

        let elapsed = self
            .started_at
            .map(|anchor| anchor.elapsed().as_secs_f64())
            .unwrap_or(0.0);

        // The first event can land inside clock resolution; report the count
        // itself rather than dividing by zero.
        let rate_per_second = if elapsed > 0.0 {
            self.total as f64 / elapsed
        } else {
            self.total as f64
        };

        RunningStats {
            total: self.total,
            avg_confidence: self.confidence_sum / self.total as f64,
            rate_per_second,
        }
    }
}
