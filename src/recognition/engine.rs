use std::cmp::Ordering;
use std::time::Instant;

use chrono::Local;

use crate::{
    history::HistoryBuffer,
    models::{ConfirmedGesture, GesturePrediction, RunningStats},
    stats::StatsAggregator,
};

use super::config::RecognitionConfig;

/// Outcome of feeding one frame's predictions through the engine.
#[derive(Debug, Clone)]
pub struct CycleOutput {
    /// The full ranked set, published unconditionally so the confidence
    /// meter updates even below both thresholds.
    pub ranked: Vec<GesturePrediction>,
    pub confirmed: Option<ConfirmedGesture>,
}

/// Per-cycle recognition state machine: ranking, the two confidence tiers,
/// debouncing, and the accumulators behind stats and history. Synchronous on
/// purpose; the async loop around it stays free of policy.
pub struct RecognitionEngine {
    config: RecognitionConfig,
    last_confirmed: Option<String>,
    current: Option<GesturePrediction>,
    stats: StatsAggregator,
    history: HistoryBuffer,
}

impl RecognitionEngine {
    pub fn new(config: RecognitionConfig) -> Self {
        let history = HistoryBuffer::new(config.history_capacity);
        Self {
            config,
            last_confirmed: None,
            current: None,
            stats: StatsAggregator::new(),
            history,
        }
    }

    /// Starts a fresh session: accumulators, debounce state and the display
    /// slot reset, the history buffer survives.
    pub fn begin(&mut self, now: Instant) {
        self.last_confirmed = None;
        self.current = None;
        self.stats.begin(now);
    }

    /// Runs one frame's predictions through ranking, the display threshold
    /// and the confirmation policy.
    pub fn observe(&mut self, mut predictions: Vec<GesturePrediction>) -> CycleOutput {
        // Stable sort: equal confidences keep classifier order, no
        // deterministic tie-break is promised.
        predictions.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        });

        let top = predictions.first().cloned();

        // Display tier: the gesture card tracks the leader only above the
        // display threshold, otherwise it goes blank. The ranked set below
        // is published either way.
        self.current = top
            .as_ref()
            .filter(|p| p.confidence > self.config.display_threshold)
            .cloned();

        // Confirmation tier: stricter threshold plus debounce against the
        // previously confirmed gesture, so a held pose fires once rather
        // than once per frame. Independent of the display tier.
        let confirmed = top
            .filter(|p| {
                p.confidence > self.config.confirm_threshold
                    && self.last_confirmed.as_deref() != Some(p.gesture.as_str())
            })
            .map(|p| {
                self.last_confirmed = Some(p.gesture.clone());
                self.stats.record(p.confidence);

                let event = ConfirmedGesture {
                    timestamp: Local::now().format("%H:%M:%S").to_string(),
                    gesture: p.gesture,
                    confidence: p.confidence,
                };
                self.history.push(event.clone());
                event
            });

        CycleOutput {
            ranked: predictions,
            confirmed,
        }
    }

    /// The gesture currently shown on the card, if any cleared the display
    /// threshold this cycle.
    pub fn current(&self) -> Option<&GesturePrediction> {
        self.current.as_ref()
    }

    pub fn stats(&self) -> RunningStats {
        self.stats.snapshot()
    }

    pub fn history(&self) -> Vec<ConfirmedGesture> {
        self.history.entries()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> RecognitionEngine {
        let mut engine = RecognitionEngine::new(RecognitionConfig::default());
        engine.begin(Instant::now());
        engine
    }

    fn prediction(gesture: &str, confidence: f64) -> GesturePrediction {
        GesturePrediction {
            gesture: gesture.to_string(),
            confidence,
        }
    }

    #[test]
    fn ranks_predictions_by_descending_confidence() {
        let mut engine = engine();
        let output = engine.observe(vec![
            prediction("Yes", 0.1),
            prediction("Stop", 0.6),
            prediction("No", 0.3),
        ]);

        let order: Vec<&str> = output.ranked.iter().map(|p| p.gesture.as_str()).collect();
        assert_eq!(order, ["Stop", "No", "Yes"]);
        assert!(output.confirmed.is_none());
    }

    #[test]
    fn display_slot_clears_below_the_display_threshold() {
        let mut engine = engine();

        engine.observe(vec![prediction("Stop", 0.75)]);
        assert_eq!(engine.current().unwrap().gesture, "Stop");

        engine.observe(vec![prediction("Stop", 0.60)]);
        assert!(engine.current().is_none());
    }

    #[test]
    fn confirmation_needs_threshold_and_a_new_gesture() {
        let mut engine = engine();

        // Above display but below confirmation.
        assert!(engine
            .observe(vec![prediction("Stop", 0.78)])
            .confirmed
            .is_none());

        let event = engine
            .observe(vec![prediction("Stop", 0.92)])
            .confirmed
            .expect("should confirm");
        assert_eq!(event.gesture, "Stop");
        assert_eq!(event.confidence, 0.92);
        assert_eq!(event.timestamp.len(), 8);
        assert_eq!(event.timestamp.matches(':').count(), 2);
    }

    #[test]
    fn a_held_gesture_confirms_exactly_once() {
        let mut engine = engine();

        let mut confirmations = 0;
        for _ in 0..5 {
            if engine
                .observe(vec![prediction("Stop", 0.91)])
                .confirmed
                .is_some()
            {
                confirmations += 1;
            }
        }

        assert_eq!(confirmations, 1);
        assert_eq!(engine.stats().total, 1);
    }

    #[test]
    fn stop_yes_scenario_confirms_twice() {
        let mut engine = engine();
        let cycles = [
            ("Stop", 0.92),
            ("Stop", 0.95),
            ("Yes", 0.83),
            ("Yes", 0.83),
            ("Yes", 0.60),
        ];

        let mut confirmed = Vec::new();
        for (gesture, confidence) in cycles {
            if let Some(event) = engine.observe(vec![prediction(gesture, confidence)]).confirmed {
                confirmed.push(event.gesture);
            }
        }

        assert_eq!(confirmed, ["Stop", "Yes"]);

        let stats = engine.stats();
        assert_eq!(stats.total, 2);
        assert!((stats.avg_confidence - 0.875).abs() < 1e-12);
    }

    #[test]
    fn begin_resets_debounce_but_keeps_history() {
        let mut engine = engine();
        engine.observe(vec![prediction("Stop", 0.9)]);
        assert_eq!(engine.history().len(), 1);

        engine.begin(Instant::now());
        assert_eq!(engine.stats().total, 0);
        assert_eq!(engine.history().len(), 1);

        // Same gesture confirms again after the reset.
        assert!(engine
            .observe(vec![prediction("Stop", 0.9)])
            .confirmed
            .is_some());
    }

    #[test]
    fn empty_prediction_set_is_a_quiet_cycle() {
        let mut engine = engine();
        let output = engine.observe(Vec::new());

        assert!(output.ranked.is_empty());
        assert!(output.confirmed.is_none());
        assert!(engine.current().is_none());
    }
}
