//! Onboarding analytics records.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::{Intent, Mode, StepId, Variant};
use crate::ids::OnboardingSessionId;

/// Lifecycle of one onboarding attempt.
///
/// 一次引导尝试的生命周期。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Still on a step of the wizard.
    ///
    /// 仍在向导的某一步。
    InProgress,
    /// Reached the end or imported a backup.
    ///
    /// 已走完流程或导入了备份。
    Completed,
    /// Abandoned before the end.
    ///
    /// 在结束前放弃。
    Skipped,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionStatus::InProgress)
    }
}

/// Analytics row for one onboarding attempt.
///
/// Once the status is terminal the record no longer accepts mutations.
///
/// 一次引导尝试的分析记录。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub session_id: OnboardingSessionId,
    pub variant: Variant,
    pub intent: Intent,
    pub mode: Mode,
    pub status: SessionStatus,
    pub started_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drop_off_step: Option<StepId>,
    #[serde(default)]
    pub steps_viewed: BTreeSet<StepId>,
    #[serde(default)]
    pub step_durations_ms: BTreeMap<StepId, u64>,
}

impl SessionRecord {
    pub fn new(
        session_id: OnboardingSessionId,
        variant: Variant,
        intent: Intent,
        mode: Mode,
        started_at: i64,
    ) -> Self {
        Self {
            session_id,
            variant,
            intent,
            mode,
            status: SessionStatus::InProgress,
            started_at,
            completed_at: None,
            skipped_at: None,
            drop_off_step: None,
            steps_viewed: BTreeSet::new(),
            step_durations_ms: BTreeMap::new(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Marks a step as viewed and refreshes the path actually taken.
    ///
    /// Returns `false` when the record is terminal and nothing changed.
    pub fn mark_viewed(&mut self, step: StepId, intent: Intent, mode: Mode) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.steps_viewed.insert(step);
        self.intent = intent;
        self.mode = mode;
        true
    }

    /// Adds dwell time to a step's running total. Non-positive durations are dropped.
    pub fn add_duration(&mut self, step: StepId, duration_ms: i64) -> bool {
        if self.is_terminal() || duration_ms <= 0 {
            return false;
        }
        let total = self.step_durations_ms.entry(step).or_insert(0);
        *total = total.saturating_add(duration_ms as u64);
        true
    }

    pub fn complete(&mut self, at: i64, intent: Intent, mode: Mode) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.status = SessionStatus::Completed;
        self.completed_at = Some(at);
        self.intent = intent;
        self.mode = mode;
        true
    }

    pub fn skip(&mut self, at: i64, drop_off_step: StepId, intent: Intent, mode: Mode) -> bool {
        if self.is_terminal() {
            return false;
        }
        self.status = SessionStatus::Skipped;
        self.skipped_at = Some(at);
        self.drop_off_step = Some(drop_off_step);
        self.intent = intent;
        self.mode = mode;
        true
    }
}

/// Persisted analytics document: `{ sessions, updatedAt }`.
///
/// 持久化的分析文档。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsLog {
    pub sessions: Vec<SessionRecord>,
    pub updated_at: i64,
}

impl AnalyticsLog {
    pub fn contains(&self, session_id: &OnboardingSessionId) -> bool {
        self.sessions.iter().any(|s| &s.session_id == session_id)
    }

    pub fn find(&self, session_id: &OnboardingSessionId) -> Option<&SessionRecord> {
        self.sessions.iter().find(|s| &s.session_id == session_id)
    }

    pub fn find_mut(&mut self, session_id: &OnboardingSessionId) -> Option<&mut SessionRecord> {
        self.sessions.iter_mut().find(|s| &s.session_id == session_id)
    }

    /// Caps the log at `max_sessions` records, oldest terminal records first.
    ///
    /// `0` disables the cap. Returns how many records were evicted.
    pub fn enforce_retention(&mut self, max_sessions: usize) -> usize {
        if max_sessions == 0 {
            return 0;
        }
        let mut evicted = 0;
        while self.sessions.len() > max_sessions {
            let victim = self
                .sessions
                .iter()
                .position(SessionRecord::is_terminal)
                .unwrap_or(0);
            self.sessions.remove(victim);
            evicted += 1;
        }
        evicted
    }
}
