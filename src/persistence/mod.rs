mod coordinator;
mod http;
mod memory;

pub use coordinator::SessionCoordinator;
pub use http::HttpPersistence;
pub use memory::InMemoryPersistence;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{NewPrediction, NewSession, SessionRecord, SessionUpdate};

/// Remote store for sessions and their confirmed predictions. Best effort
/// from the recognition loop's point of view: local state stays
/// authoritative whether or not any of these calls land.
#[async_trait]
pub trait PersistenceService: Send + Sync {
    async fn create_session(&self, session: NewSession) -> Result<SessionRecord>;
    async fn update_session(&self, id: &str, update: SessionUpdate) -> Result<()>;
    async fn save_prediction(&self, prediction: NewPrediction) -> Result<()>;
}
