use std::time::Instant;

use serde::{Deserialize, Serialize};

/// One camera sample handed to the classifier. The recognition core treats
/// it as opaque and drops it as soon as inference returns.
#[derive(Clone, Debug)]
pub struct Frame {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub captured_at: Instant,
}

/// One gesture class with the confidence the model assigned it this frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GesturePrediction {
    pub gesture: String,
    pub confidence: f64,
}

/// A gesture that cleared the confirmation policy. Immutable once created;
/// copies flow into the history buffer, the stats and the session store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedGesture {
    /// Wall-clock time of confirmation, 24-hour `HH:MM:SS`.
    pub timestamp: String,
    pub gesture: String,
    pub confidence: f64,
}
