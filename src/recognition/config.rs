/// Tunable thresholds for the recognition loop.
#[derive(Debug, Clone)]
pub struct RecognitionConfig {
    /// A top prediction above this drives the on-screen gesture card.
    pub display_threshold: f64,

    /// A top prediction must clear this before it can confirm.
    pub confirm_threshold: f64,

    /// Confirmed gestures kept for the history panel.
    pub history_capacity: usize,

    /// Speaking rate handed to the speech facility.
    pub speech_rate: f32,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            display_threshold: 0.70,
            confirm_threshold: 0.80,
            history_capacity: 10,
            speech_rate: 1.2,
        }
    }
}
