use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

use crate::models::{NewPrediction, NewSession, SessionRecord, SessionUpdate};

use super::PersistenceService;

/// JSON client for the session-store API:
/// `POST /sessions`, `PATCH /sessions/{id}`, `POST /predictions`.
pub struct HttpPersistence {
    client: Client,
    base_url: String,
}

impl HttpPersistence {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl PersistenceService for HttpPersistence {
    async fn create_session(&self, session: NewSession) -> Result<SessionRecord> {
        let record = self
            .client
            .post(format!("{}/sessions", self.base_url))
            .json(&session)
            .send()
            .await
            .context("create-session request failed")?
            .error_for_status()
            .context("create-session rejected")?
            .json()
            .await
            .context("create-session response was not valid JSON")?;

        Ok(record)
    }

    async fn update_session(&self, id: &str, update: SessionUpdate) -> Result<()> {
        self.client
            .patch(format!("{}/sessions/{}", self.base_url, id))
            .json(&update)
            .send()
            .await
            .context("update-session request failed")?
            .error_for_status()
            .context("update-session rejected")?;

        Ok(())
    }

    async fn save_prediction(&self, prediction: NewPrediction) -> Result<()> {
        self.client
            .post(format!("{}/predictions", self.base_url))
            .json(&prediction)
            .send()
            .await
            .context("save-prediction request failed")?
            .error_for_status()
            .context("save-prediction rejected")?;

        Ok(())
    }
}
