//! Real-time hand gesture recognition core.
//!
//! Drives a camera feed through a gesture classification model and turns the
//! noisy per-frame predictions into a stable stream of confirmed gesture
//! events, with running statistics, a bounded history, optional speech
//! feedback, and best-effort session persistence. The model, the camera and
//! the renderer are the host's; this crate owns the loop between them.

pub mod classifier;
pub mod history;
pub mod models;
pub mod persistence;
pub mod recognition;
pub mod speech;
pub mod stats;
mod utils;

pub use classifier::{FrameSource, GestureClassifier};
pub use history::HistoryBuffer;
pub use models::{
    ConfirmedGesture, Frame, GesturePrediction, NewPrediction, NewSession, RunningStats,
    SessionRecord, SessionUpdate,
};
pub use persistence::{
    HttpPersistence, InMemoryPersistence, PersistenceService, SessionCoordinator,
};
pub use recognition::{
    RecognitionConfig, RecognitionController, RecognitionSnapshot, RecognitionState,
};
pub use speech::{SpeechNotifier, SpeechOutput};
pub use stats::StatsAggregator;

/// Initializes logging for hosts that have not set up their own
/// (reads the `RUST_LOG` env var).
pub fn init_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}
