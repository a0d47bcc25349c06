use std::{sync::Arc, time::Instant};

use anyhow::{Context, Result};
use chrono::Utc;
use log::info;
use tokio::{
    sync::{watch, Mutex},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

use crate::{
    classifier::{FrameSource, GestureClassifier},
    persistence::{PersistenceService, SessionCoordinator},
    speech::{SpeechNotifier, SpeechOutput},
};

use super::{
    config::RecognitionConfig,
    engine::RecognitionEngine,
    loop_worker::{recognition_loop, LoopContext},
    RecognitionSnapshot, RecognitionState,
};

/// Control surface for the recognition loop: start/stop intents, the speech
/// toggle, and read-only snapshots for the presentation layer.
pub struct RecognitionController {
    classifier: Option<Arc<dyn GestureClassifier>>,
    frames: Arc<dyn FrameSource>,
    engine: Arc<Mutex<RecognitionEngine>>,
    coordinator: SessionCoordinator,
    notifier: Arc<SpeechNotifier>,
    snapshot_tx: watch::Sender<RecognitionSnapshot>,
    snapshot_rx: watch::Receiver<RecognitionSnapshot>,
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl RecognitionController {
    pub fn new(
        config: RecognitionConfig,
        frames: Arc<dyn FrameSource>,
        persistence: Arc<dyn PersistenceService>,
        speech: Arc<dyn SpeechOutput>,
    ) -> Self {
        let notifier = Arc::new(SpeechNotifier::new(speech, config.speech_rate));
        let engine = Arc::new(Mutex::new(RecognitionEngine::new(config)));
        let (snapshot_tx, snapshot_rx) = watch::channel(RecognitionSnapshot::default());

        Self {
            classifier: None,
            frames,
            engine,
            coordinator: SessionCoordinator::new(persistence),
            notifier,
            snapshot_tx,
            snapshot_rx,
            handle: None,
            cancel_token: None,
        }
    }

    /// Hands the loaded model to the controller. The model loads
    /// asynchronously on the host side; until it arrives, `start` is a
    /// no-op.
    pub fn set_classifier(&mut self, classifier: Arc<dyn GestureClassifier>) {
        self.classifier = Some(classifier);
    }

    /// Starts a recognition run: per-session accumulators reset (history
    /// survives), a fresh session record is requested, the loop spawns.
    /// Silently ignored while the model is still loading or a run is
    /// already active.
    pub async fn start(&mut self) -> Result<()> {
        if self.handle.is_some() {
            info!("recognition already active, ignoring start");
            return Ok(());
        }

        let Some(classifier) = self.classifier.clone() else {
            info!("model not loaded yet, ignoring start");
            return Ok(());
        };

        self.engine.lock().await.begin(Instant::now());

        // Best effort; recognition runs locally whether or not the session
        // store answers.
        self.coordinator.open();

        let cancel_token = CancellationToken::new();
        let ctx = LoopContext {
            classifier,
            frames: self.frames.clone(),
            engine: self.engine.clone(),
            coordinator: self.coordinator.clone(),
            notifier: self.notifier.clone(),
            snapshot_tx: self.snapshot_tx.clone(),
            cancel_token: cancel_token.clone(),
        };

        self.handle = Some(tokio::spawn(recognition_loop(ctx)));
        self.cancel_token = Some(cancel_token);
        self.publish_state(RecognitionState::Active);
        Ok(())
    }

    /// Stops the run: no further inference once this returns, the session
    /// record gets its end time. Stats and history stay up for display
    /// until the next `start`.
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("recognition loop task failed to join")?;
        }

        self.coordinator.close(Utc::now());
        self.publish_state(RecognitionState::Idle);
        Ok(())
    }

    pub fn state(&self) -> RecognitionState {
        if self.handle.is_some() {
            RecognitionState::Active
        } else {
            RecognitionState::Idle
        }
    }

    pub fn set_speech_enabled(&self, enabled: bool) {
        self.notifier.set_enabled(enabled);
    }

    pub fn is_speech_enabled(&self) -> bool {
        self.notifier.is_enabled()
    }

    /// Latest published view; the presentation layer only ever reads these.
    pub fn snapshot(&self) -> RecognitionSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Live subscription for render loops that want change notifications.
    pub fn subscribe(&self) -> watch::Receiver<RecognitionSnapshot> {
        self.snapshot_rx.clone()
    }

    fn publish_state(&self, state: RecognitionState) {
        self.snapshot_tx.send_modify(|snapshot| snapshot.state = state);
    }
}
