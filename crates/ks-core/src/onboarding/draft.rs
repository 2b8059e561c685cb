//! Resumable wizard draft.

use serde::{Deserialize, Serialize};

use super::{build_steps, Intent, Mode, StepId, Variant};
use crate::ids::OnboardingSessionId;

/// Errors raised while decoding a persisted draft.
///
/// 解码持久化草稿时的错误。
#[derive(Debug, thiserror::Error)]
pub enum DraftDecodeError {
    #[error("draft is not a valid document: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("draft has an empty session id")]
    MissingSessionId,
}

/// Serializable snapshot of in-progress wizard state.
///
/// Every field is required on decode; an unknown enum value or a missing field
/// rejects the whole document.
///
/// 进行中向导状态的可序列化快照。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub session_id: OnboardingSessionId,
    pub variant: Variant,
    pub intent: Intent,
    /// Whether the user explicitly picked an intent at least once.
    pub intent_chosen: bool,
    pub mode: Mode,
    pub current_step_index: usize,
    pub passcode_confirmed: bool,
    pub data_reclamation_enabled: bool,
    pub started_at: i64,
    pub updated_at: i64,
}

impl Draft {
    /// Fresh draft positioned on the first step.
    pub fn new(session_id: OnboardingSessionId, variant: Variant, now_ms: i64) -> Self {
        Self {
            session_id,
            variant,
            intent: Intent::default(),
            intent_chosen: false,
            mode: Mode::default(),
            current_step_index: 0,
            passcode_confirmed: false,
            data_reclamation_enabled: false,
            started_at: now_ms,
            updated_at: now_ms,
        }
    }

    /// Strictly decodes a persisted draft.
    pub fn decode(raw: &str) -> Result<Self, DraftDecodeError> {
        let draft: Draft = serde_json::from_str(raw)?;
        if draft.session_id.is_empty() {
            return Err(DraftDecodeError::MissingSessionId);
        }
        Ok(draft)
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Current step list for this draft's selections.
    pub fn steps(&self) -> Vec<StepId> {
        build_steps(self.intent, self.mode, self.variant)
    }

    /// Snaps `current_step_index` into the bounds of the current step list.
    pub fn clamp_step_index(&mut self) {
        let last = self.steps().len().saturating_sub(1);
        if self.current_step_index > last {
            self.current_step_index = last;
        }
    }

    /// Step at the (clamped) current index.
    pub fn current_step(&self) -> StepId {
        let steps = self.steps();
        let index = self.current_step_index.min(steps.len().saturating_sub(1));
        steps.get(index).copied().unwrap_or(StepId::Welcome)
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step_index + 1 >= self.steps().len()
    }
}
