use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// The text-to-speech facility. Fire and forget: `speak` enqueues and
/// returns, `cancel` drops anything queued or mid-utterance.
pub trait SpeechOutput: Send + Sync {
    fn speak(&self, text: &str, rate: f32);
    fn cancel(&self);
}

/// Handle in front of the speech facility. Announcements go out only while
/// the user has speech toggled on.
pub struct SpeechNotifier {
    output: Arc<dyn SpeechOutput>,
    enabled: AtomicBool,
    rate: f32,
}

impl SpeechNotifier {
    pub fn new(output: Arc<dyn SpeechOutput>, rate: f32) -> Self {
        Self {
            output,
            enabled: AtomicBool::new(false),
            rate,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Toggling speech off also cancels any in-flight utterance.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
        if !enabled {
            self.output.cancel();
        }
    }

    /// Announces a confirmed gesture at the configured speaking rate.
    pub fn announce(&self, gesture: &str) {
        if self.is_enabled() {
            self.output.speak(gesture, self.rate);
        }
    }
}
