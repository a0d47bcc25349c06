use std::sync::{Mutex, MutexGuard};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::models::{NewPrediction, NewSession, SessionRecord, SessionUpdate};

use super::PersistenceService;

/// Process-local session store, for embedding without a backend and for
/// tests.
#[derive(Default)]
pub struct InMemoryPersistence {
    sessions: Mutex<Vec<SessionRecord>>,
    predictions: Mutex<Vec<NewPrediction>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sessions(&self) -> Vec<SessionRecord> {
        lock(&self.sessions).clone()
    }

    pub fn predictions(&self) -> Vec<NewPrediction> {
        lock(&self.predictions).clone()
    }
}

#[async_trait]
impl PersistenceService for InMemoryPersistence {
    async fn create_session(&self, session: NewSession) -> Result<SessionRecord> {
        let record = SessionRecord {
            id: Uuid::new_v4().to_string(),
            total_recognitions: session.total_recognitions,
            average_confidence: session.average_confidence,
            start_time: Some(Utc::now()),
            end_time: None,
        };

        lock(&self.sessions).push(record.clone());
        Ok(record)
    }

    async fn update_session(&self, id: &str, update: SessionUpdate) -> Result<()> {
        let mut sessions = lock(&self.sessions);
        let session = sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| anyhow!("unknown session '{id}'"))?;

        if let Some(total) = update.total_recognitions {
            session.total_recognitions = total;
        }
        if let Some(average) = update.average_confidence {
            session.average_confidence = average;
        }
        if let Some(end_time) = update.end_time {
            session.end_time = Some(end_time);
        }

        Ok(())
    }

    async fn save_prediction(&self, prediction: NewPrediction) -> Result<()> {
        lock(&self.predictions).push(prediction);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn updates_apply_only_the_set_fields() {
        let store = InMemoryPersistence::new();
        let record = store.create_session(NewSession::default()).await.unwrap();

        store
            .update_session(
                &record.id,
                SessionUpdate {
                    total_recognitions: Some(4),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let sessions = store.sessions();
        assert_eq!(sessions[0].total_recognitions, 4);
        assert_eq!(sessions[0].average_confidence, 0.0);
        assert!(sessions[0].end_time.is_none());
    }

    #[tokio::test]
    async fn updating_an_unknown_session_fails() {
        let store = InMemoryPersistence::new();
        let result = store
            .update_session("nope", SessionUpdate::default())
            .await;
        assert!(result.is_err());
    }
}
