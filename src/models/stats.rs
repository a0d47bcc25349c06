use serde::{Deserialize, Serialize};

/// Aggregate numbers for the current recognition session, recomputed O(1)
/// from accumulators on every confirmed gesture.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RunningStats {
    pub total: u64,
    pub avg_confidence: f64,
    pub rate_per_second: f64,
}
