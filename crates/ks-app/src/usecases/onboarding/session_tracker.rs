use std::sync::Arc;

use anyhow::Context;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use ks_core::onboarding::keys::ONBOARDING_ANALYTICS_KEY;
use ks_core::ports::{ClockPort, KeyValueStorePort};
use ks_core::{AnalyticsLog, Intent, Mode, OnboardingSessionId, SessionRecord, StepId, Variant};

/// Default cap on retained session records. `0` keeps every record, so the
/// log stays append-only unless a cap is configured.
pub const DEFAULT_MAX_SESSIONS: usize = 0;

/// Reads the analytics log. A missing, unreadable or corrupt log reads as empty.
pub(crate) async fn load_analytics_log(store: &dyn KeyValueStorePort) -> AnalyticsLog {
    let raw = match store.get(ONBOARDING_ANALYTICS_KEY).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return AnalyticsLog::default(),
        Err(err) => {
            warn!(error = %err, "failed to read onboarding analytics log");
            return AnalyticsLog::default();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|err| {
        warn!(error = %err, "onboarding analytics log is corrupt, starting from empty");
        AnalyticsLog::default()
    })
}

/// Records per-session funnel events into the persisted analytics log.
///
/// Every operation is a read-modify-write of the whole document. Unknown
/// session ids and terminal records are left untouched without error.
pub struct SessionTracker {
    store: Arc<dyn KeyValueStorePort>,
    clock: Arc<dyn ClockPort>,
    max_sessions: usize,
    write_lock: Mutex<()>,
}

impl SessionTracker {
    pub fn new(store: Arc<dyn KeyValueStorePort>, clock: Arc<dyn ClockPort>) -> Self {
        Self::with_max_sessions(store, clock, DEFAULT_MAX_SESSIONS)
    }

    /// `max_sessions == 0` keeps every record.
    pub fn with_max_sessions(
        store: Arc<dyn KeyValueStorePort>,
        clock: Arc<dyn ClockPort>,
        max_sessions: usize,
    ) -> Self {
        Self {
            store,
            clock,
            max_sessions,
            write_lock: Mutex::new(()),
        }
    }

    /// Creates the record for `session_id` if it does not exist yet.
    pub async fn ensure_session(
        &self,
        session_id: &OnboardingSessionId,
        variant: Variant,
        intent: Intent,
        mode: Mode,
        started_at: i64,
    ) -> anyhow::Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut log = load_analytics_log(self.store.as_ref()).await;
        if log.contains(session_id) {
            return Ok(());
        }

        log.sessions.push(SessionRecord::new(
            session_id.clone(),
            variant,
            intent,
            mode,
            started_at,
        ));
        let evicted = log.enforce_retention(self.max_sessions);
        if evicted > 0 {
            info!(
                evicted,
                max_sessions = self.max_sessions,
                "evicted old onboarding sessions"
            );
        }
        self.save(log).await?;
        debug!(session_id = %session_id, variant = %variant, "onboarding session created");
        Ok(())
    }

    pub async fn record_step_viewed(
        &self,
        session_id: &OnboardingSessionId,
        step: StepId,
        intent: Intent,
        mode: Mode,
    ) -> anyhow::Result<()> {
        self.update(session_id, |record, _| record.mark_viewed(step, intent, mode))
            .await
    }

    /// Accumulates dwell time; non-positive durations are discarded.
    pub async fn record_step_duration(
        &self,
        session_id: &OnboardingSessionId,
        step: StepId,
        duration_ms: i64,
    ) -> anyhow::Result<()> {
        if duration_ms <= 0 {
            return Ok(());
        }
        self.update(session_id, |record, _| record.add_duration(step, duration_ms))
            .await
    }

    pub async fn complete_session(
        &self,
        session_id: &OnboardingSessionId,
        intent: Intent,
        mode: Mode,
    ) -> anyhow::Result<()> {
        self.update(session_id, |record, now| record.complete(now, intent, mode))
            .await
    }

    pub async fn skip_session(
        &self,
        session_id: &OnboardingSessionId,
        drop_off_step: StepId,
        intent: Intent,
        mode: Mode,
    ) -> anyhow::Result<()> {
        self.update(session_id, |record, now| {
            record.skip(now, drop_off_step, intent, mode)
        })
        .await
    }

    /// Whether `session_id` already reached a terminal status. Unknown ids
    /// are not finished.
    pub async fn is_session_finished(&self, session_id: &OnboardingSessionId) -> bool {
        load_analytics_log(self.store.as_ref())
            .await
            .find(session_id)
            .is_some_and(SessionRecord::is_terminal)
    }

    async fn update<F>(&self, session_id: &OnboardingSessionId, apply: F) -> anyhow::Result<()>
    where
        F: FnOnce(&mut SessionRecord, i64) -> bool,
    {
        let _guard = self.write_lock.lock().await;
        let mut log = load_analytics_log(self.store.as_ref()).await;
        let now = self.clock.now_ms();
        let Some(record) = log.find_mut(session_id) else {
            debug!(session_id = %session_id, "ignoring analytics event for unknown session");
            return Ok(());
        };
        if !apply(record, now) {
            return Ok(());
        }
        self.save(log).await
    }

    async fn save(&self, mut log: AnalyticsLog) -> anyhow::Result<()> {
        log.updated_at = self.clock.now_ms();
        let encoded =
            serde_json::to_string(&log).context("Failed to encode onboarding analytics log")?;
        self.store
            .set(ONBOARDING_ANALYTICS_KEY, &encoded)
            .await
            .context("Failed to save onboarding analytics log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ks_core::SessionStatus;
    use ks_infra::{InMemoryKeyValueStore, ManualClock};

    struct Fixture {
        store: Arc<InMemoryKeyValueStore>,
        clock: Arc<ManualClock>,
        tracker: SessionTracker,
    }

    fn fixture(max_sessions: usize) -> Fixture {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let clock = Arc::new(ManualClock::new(1_000));
        let tracker = SessionTracker::with_max_sessions(store.clone(), clock.clone(), max_sessions);
        Fixture {
            store,
            clock,
            tracker,
        }
    }

    async fn start(tracker: &SessionTracker, id: &str) -> OnboardingSessionId {
        let session_id = OnboardingSessionId::from(id);
        tracker
            .ensure_session(
                &session_id,
                Variant::Control,
                Intent::Journaling,
                Mode::Full,
                1_000,
            )
            .await
            .unwrap();
        session_id
    }

    async fn log(fixture: &Fixture) -> AnalyticsLog {
        load_analytics_log(fixture.store.as_ref()).await
    }

    #[tokio::test]
    async fn test_ensure_session_is_idempotent() {
        let f = fixture(0);
        start(&f.tracker, "s").await;
        start(&f.tracker, "s").await;

        let log = log(&f).await;
        assert_eq!(log.sessions.len(), 1);
        assert_eq!(log.sessions[0].status, SessionStatus::InProgress);
    }

    #[tokio::test]
    async fn test_step_views_form_a_set() {
        let f = fixture(0);
        let id = start(&f.tracker, "s").await;

        for step in [StepId::Welcome, StepId::Intent, StepId::Welcome] {
            f.tracker
                .record_step_viewed(&id, step, Intent::Legacy, Mode::Quick)
                .await
                .unwrap();
        }

        let log = log(&f).await;
        let record = log.find(&id).unwrap();
        assert_eq!(record.steps_viewed.len(), 2);
        assert_eq!(record.intent, Intent::Legacy);
        assert_eq!(record.mode, Mode::Quick);
    }

    #[tokio::test]
    async fn test_durations_accumulate_and_ignore_non_positive() {
        let f = fixture(0);
        let id = start(&f.tracker, "s").await;

        for duration in [300, 0, -50, 200] {
            f.tracker
                .record_step_duration(&id, StepId::Privacy, duration)
                .await
                .unwrap();
        }

        let log = log(&f).await;
        let record = log.find(&id).unwrap();
        assert_eq!(record.step_durations_ms.get(&StepId::Privacy), Some(&500));
    }

    #[tokio::test]
    async fn test_skip_records_drop_off_and_freezes_record() {
        let f = fixture(0);
        let id = start(&f.tracker, "s").await;
        f.clock.set(5_000);

        f.tracker
            .skip_session(&id, StepId::Passcode, Intent::Journaling, Mode::Full)
            .await
            .unwrap();
        f.tracker
            .complete_session(&id, Intent::Journaling, Mode::Full)
            .await
            .unwrap();
        f.tracker
            .record_step_duration(&id, StepId::Passcode, 100)
            .await
            .unwrap();

        let log = log(&f).await;
        let record = log.find(&id).unwrap();
        assert_eq!(record.status, SessionStatus::Skipped);
        assert_eq!(record.skipped_at, Some(5_000));
        assert_eq!(record.completed_at, None);
        assert_eq!(record.drop_off_step, Some(StepId::Passcode));
        assert!(record.step_durations_ms.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_session_is_ignored() {
        let f = fixture(0);
        start(&f.tracker, "known").await;
        let before = log(&f).await;

        f.tracker
            .complete_session(
                &OnboardingSessionId::from("ghost"),
                Intent::Therapy,
                Mode::Full,
            )
            .await
            .unwrap();

        assert_eq!(log(&f).await, before);
    }

    #[tokio::test]
    async fn test_corrupt_log_is_treated_as_empty() {
        let f = fixture(0);
        f.store.set(ONBOARDING_ANALYTICS_KEY, "[[[").await.unwrap();

        start(&f.tracker, "fresh").await;

        let log = log(&f).await;
        assert_eq!(log.sessions.len(), 1);
        assert_eq!(log.updated_at, 1_000);
    }

    #[tokio::test]
    async fn test_retention_evicts_oldest_terminal_session() {
        let f = fixture(2);
        let first = start(&f.tracker, "a").await;
        start(&f.tracker, "b").await;
        f.tracker
            .complete_session(
                &OnboardingSessionId::from("b"),
                Intent::Journaling,
                Mode::Full,
            )
            .await
            .unwrap();

        start(&f.tracker, "c").await;

        let log = log(&f).await;
        let ids: Vec<&str> = log.sessions.iter().map(|s| s.session_id.as_str()).collect();
        assert_eq!(ids, vec![first.as_str(), "c"]);
    }

    #[tokio::test]
    async fn test_default_tracker_keeps_every_session() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let tracker = SessionTracker::new(store.clone(), Arc::new(ManualClock::new(0)));

        for id in ["a", "b", "c"] {
            let session_id = start(&tracker, id).await;
            tracker
                .complete_session(&session_id, Intent::Journaling, Mode::Full)
                .await
                .unwrap();
        }

        let log = load_analytics_log(store.as_ref()).await;
        assert_eq!(log.sessions.len(), 3);
    }

    #[tokio::test]
    async fn test_is_session_finished_tracks_terminal_status() {
        let f = fixture(0);
        let id = start(&f.tracker, "s").await;
        assert!(!f.tracker.is_session_finished(&id).await);

        f.tracker
            .complete_session(&id, Intent::Journaling, Mode::Full)
            .await
            .unwrap();

        assert!(f.tracker.is_session_finished(&id).await);
        let unknown = OnboardingSessionId::from("ghost");
        assert!(!f.tracker.is_session_finished(&unknown).await);
    }
}
