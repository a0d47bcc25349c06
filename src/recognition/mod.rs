pub mod config;
pub mod controller;
pub mod engine;
mod loop_worker;

pub use config::RecognitionConfig;
pub use controller::RecognitionController;
pub use engine::{CycleOutput, RecognitionEngine};

use serde::Serialize;

use crate::models::{ConfirmedGesture, GesturePrediction, RunningStats};

/// Control-surface state; transitions only through explicit start/stop
/// intents.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RecognitionState {
    #[default]
    Idle,
    Active,
}

/// Read-only view published to the presentation layer after every cycle.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionSnapshot {
    pub state: RecognitionState,
    pub current_gesture: Option<String>,
    pub current_confidence: f64,
    /// Full ranked set for the confidence meter, updated unconditionally.
    pub predictions: Vec<GesturePrediction>,
    pub stats: RunningStats,
    pub history: Vec<ConfirmedGesture>,
}
