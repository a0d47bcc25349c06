use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;

use crate::{
    classifier::{FrameSource, GestureClassifier},
    persistence::SessionCoordinator,
    speech::SpeechNotifier,
};

use super::{engine::RecognitionEngine, RecognitionSnapshot, RecognitionState};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

pub(crate) struct LoopContext {
    pub classifier: Arc<dyn GestureClassifier>,
    pub frames: Arc<dyn FrameSource>,
    pub engine: Arc<Mutex<RecognitionEngine>>,
    pub coordinator: SessionCoordinator,
    pub notifier: Arc<SpeechNotifier>,
    pub snapshot_tx: watch::Sender<RecognitionSnapshot>,
    pub cancel_token: CancellationToken,
}

/// Drives recognition until cancelled: one frame, one inference, one ranked
/// set per cycle, strictly sequential. The frame source paces the loop to
/// the camera's presentation rate.
pub(crate) async fn recognition_loop(ctx: LoopContext) {
    loop {
        tokio::select! {
            biased;
            _ = ctx.cancel_token.cancelled() => {
                log_info!("recognition loop shutting down");
                break;
            }
            _ = run_cycle(&ctx) => {}
        }
    }
}

async fn run_cycle(ctx: &LoopContext) {
    let Some(frame) = ctx.frames.next_frame().await else {
        // Camera not ready yet; try again next cycle.
        return;
    };

    let predictions = match ctx.classifier.infer(&frame).await {
        Ok(predictions) => predictions,
        Err(err) => {
            log_error!("inference failed, skipping frame: {err:?}");
            return;
        }
    };
    drop(frame);

    let (snapshot, confirmed) = {
        let mut engine = ctx.engine.lock().await;
        let output = engine.observe(predictions);
        let snapshot = RecognitionSnapshot {
            state: RecognitionState::Active,
            current_gesture: engine.current().map(|p| p.gesture.clone()),
            current_confidence: engine.current().map(|p| p.confidence).unwrap_or(0.0),
            predictions: output.ranked,
            stats: engine.stats(),
            history: engine.history(),
        };
        (snapshot, output.confirmed)
    };

    let stats = snapshot.stats;
    let _ = ctx.snapshot_tx.send(snapshot);

    if let Some(event) = confirmed {
        log_info!(
            "confirmed {} at {:.0}% ({})",
            event.gesture,
            event.confidence * 100.0,
            event.timestamp
        );
        // Both side calls are dispatched without awaiting; neither delays
        // the next cycle.
        ctx.notifier.announce(&event.gesture);
        ctx.coordinator.record(&event, stats);
    }
}
