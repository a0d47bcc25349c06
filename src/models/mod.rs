mod prediction;
mod session;
mod stats;

pub use prediction::{ConfirmedGesture, Frame, GesturePrediction};
pub use session::{NewPrediction, NewSession, SessionRecord, SessionUpdate};
pub use stats::RunningStats;
