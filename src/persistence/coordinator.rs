use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, MutexGuard,
};

use chrono::{DateTime, Utc};
use log::{error, info};

use crate::models::{ConfirmedGesture, NewPrediction, NewSession, RunningStats, SessionUpdate};

use super::PersistenceService;

/// Lifecycle of the persisted record backing one recognition run.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionPhase {
    NoSession,
    Creating,
    Active { id: String },
    Closed,
}

/// Bridges the recognition loop to the session store. Every call is
/// dispatched without blocking the loop; failures are logged once and local
/// state stays authoritative.
#[derive(Clone)]
pub struct SessionCoordinator {
    service: Arc<dyn PersistenceService>,
    phase: Arc<Mutex<SessionPhase>>,
    /// Bumped on every open/close so a response that arrives after the run
    /// has moved on cannot touch the current phase.
    epoch: Arc<AtomicU64>,
}

impl SessionCoordinator {
    pub fn new(service: Arc<dyn PersistenceService>) -> Self {
        Self {
            service,
            phase: Arc::new(Mutex::new(SessionPhase::NoSession)),
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    fn lock_phase(&self) -> MutexGuard<'_, SessionPhase> {
        match self.phase.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Requests a brand-new session record. Non-blocking: recognition
    /// proceeds whether or not the create call ever lands, and a failure
    /// simply leaves the run session-less.
    pub fn open(&self) {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        *self.lock_phase() = SessionPhase::Creating;

        let this = self.clone();
        tokio::spawn(async move {
            match this.service.create_session(NewSession::default()).await {
                Ok(record) => {
                    let mut phase = this.lock_phase();
                    if this.epoch.load(Ordering::SeqCst) == epoch
                        && *phase == SessionPhase::Creating
                    {
                        info!("session {} created", record.id);
                        *phase = SessionPhase::Active { id: record.id };
                    }
                }
                Err(err) => {
                    error!("failed to create session: {err:?}");
                    let mut phase = this.lock_phase();
                    if this.epoch.load(Ordering::SeqCst) == epoch
                        && *phase == SessionPhase::Creating
                    {
                        *phase = SessionPhase::NoSession;
                    }
                }
            }
        });
    }

    /// Relays one confirmed gesture plus the refreshed totals, as two
    /// independent fire-and-forget requests. No-op without an active
    /// session id.
    pub fn record(&self, event: &ConfirmedGesture, stats: RunningStats) {
        let id = match &*self.lock_phase() {
            SessionPhase::Active { id } => id.clone(),
            _ => return,
        };

        let prediction = NewPrediction {
            session_id: id.clone(),
            gesture: event.gesture.clone(),
            confidence: event.confidence,
        };

        let service = self.service.clone();
        tokio::spawn(async move {
            if let Err(err) = service.save_prediction(prediction).await {
                error!("failed to save prediction: {err:?}");
            }
        });

        let service = self.service.clone();
        let update = SessionUpdate {
            total_recognitions: Some(stats.total),
            average_confidence: Some(stats.avg_confidence),
            end_time: None,
        };
        tokio::spawn(async move {
            if let Err(err) = service.update_session(&id, update).await {
                error!("failed to update session: {err:?}");
            }
        });
    }

    /// Ends the active session with `end_time`. Exactly one end-time update
    /// goes out per session; later calls are no-ops.
    pub fn close(&self, end_time: DateTime<Utc>) {
        self.epoch.fetch_add(1, Ordering::SeqCst);

        let id = {
            let mut phase = self.lock_phase();
            match std::mem::replace(&mut *phase, SessionPhase::Closed) {
                SessionPhase::Active { id } => Some(id),
                SessionPhase::NoSession => {
                    *phase = SessionPhase::NoSession;
                    None
                }
                _ => None,
            }
        };

        let Some(id) = id else { return };

        let service = self.service.clone();
        let update = SessionUpdate {
            end_time: Some(end_time),
            ..Default::default()
        };
        tokio::spawn(async move {
            if let Err(err) = service.update_session(&id, update).await {
                error!("failed to close session: {err:?}");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionRecord;
    use crate::persistence::InMemoryPersistence;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    fn event(gesture: &str, confidence: f64) -> ConfirmedGesture {
        ConfirmedGesture {
            timestamp: "10:15:00".to_string(),
            gesture: gesture.to_string(),
            confidence,
        }
    }

    fn stats(total: u64, avg: f64) -> RunningStats {
        RunningStats {
            total,
            avg_confidence: avg,
            rate_per_second: 0.0,
        }
    }

    /// Lets fire-and-forget tasks run on the current-thread test runtime.
    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[derive(Default)]
    struct OfflineStore {
        creates: AtomicUsize,
        updates: AtomicUsize,
        predictions: AtomicUsize,
    }

    #[async_trait]
    impl PersistenceService for OfflineStore {
        async fn create_session(&self, _session: NewSession) -> anyhow::Result<SessionRecord> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            Err(anyhow!("store unreachable"))
        }

        async fn update_session(&self, _id: &str, _update: SessionUpdate) -> anyhow::Result<()> {
            self.updates.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn save_prediction(&self, _prediction: NewPrediction) -> anyhow::Result<()> {
            self.predictions.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn records_flow_to_the_active_session() {
        let store = Arc::new(InMemoryPersistence::new());
        let coordinator = SessionCoordinator::new(store.clone());

        coordinator.open();
        settle().await;

        coordinator.record(&event("Stop", 0.92), stats(1, 0.92));
        settle().await;

        let sessions = store.sessions();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].total_recognitions, 1);

        let predictions = store.predictions();
        assert_eq!(predictions.len(), 1);
        assert_eq!(predictions[0].session_id, sessions[0].id);
        assert_eq!(predictions[0].gesture, "Stop");
    }

    #[tokio::test]
    async fn create_failure_leaves_the_run_sessionless() {
        let store = Arc::new(OfflineStore::default());
        let coordinator = SessionCoordinator::new(store.clone());

        coordinator.open();
        settle().await;

        // No session id: nothing must reach the store.
        coordinator.record(&event("Stop", 0.92), stats(1, 0.92));
        coordinator.close(Utc::now());
        settle().await;

        assert_eq!(store.creates.load(Ordering::SeqCst), 1);
        assert_eq!(store.predictions.load(Ordering::SeqCst), 0);
        assert_eq!(store.updates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn close_sends_exactly_one_end_time() {
        let store = Arc::new(InMemoryPersistence::new());
        let coordinator = SessionCoordinator::new(store.clone());

        coordinator.open();
        settle().await;

        coordinator.close(Utc::now());
        coordinator.close(Utc::now());
        settle().await;

        let sessions = store.sessions();
        assert_eq!(sessions.len(), 1);
        assert!(sessions[0].end_time.is_some());
    }

    #[tokio::test]
    async fn records_after_close_are_dropped() {
        let store = Arc::new(InMemoryPersistence::new());
        let coordinator = SessionCoordinator::new(store.clone());

        coordinator.open();
        settle().await;
        coordinator.close(Utc::now());

        coordinator.record(&event("Yes", 0.85), stats(1, 0.85));
        settle().await;

        assert!(store.predictions().is_empty());
    }

    #[tokio::test]
    async fn a_stale_create_response_cannot_revive_a_closed_run() {
        let store = Arc::new(InMemoryPersistence::new());
        let coordinator = SessionCoordinator::new(store.clone());

        // Close before the spawned create task gets to run; its late
        // success must not flip the phase back to active.
        coordinator.open();
        coordinator.close(Utc::now());
        settle().await;

        coordinator.record(&event("Stop", 0.9), stats(1, 0.9));
        settle().await;

        assert!(store.predictions().is_empty());
    }
}
