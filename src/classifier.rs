use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Frame, GesturePrediction};

/// The trained gesture model, loaded and owned by the embedder. A failed
/// inference only costs the current frame; the loop moves on.
#[async_trait]
pub trait GestureClassifier: Send + Sync {
    /// Runs one inference pass over `frame` and returns one prediction per
    /// known gesture class. Output order is unspecified; ranking is the
    /// caller's job.
    async fn infer(&self, frame: &Frame) -> Result<Vec<GesturePrediction>>;
}

/// The camera-capture side of the host. Pull based: the recognition loop
/// asks for each frame in turn, which keeps ordering and cancellation
/// trivial and avoids queueing callbacks.
#[async_trait]
pub trait FrameSource: Send + Sync {
    /// Resolves with the next frame once the camera presents one, pacing the
    /// loop to the capture rate. `None` means the camera is not ready yet;
    /// the caller skips the cycle and asks again.
    async fn next_frame(&self) -> Option<Frame>;
}
