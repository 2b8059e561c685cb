//! Onboarding wizard controller.
//!
//! This module coordinates the wizard state machine and its side effects:
//! draft persistence, funnel analytics, the completion flag, and the
//! external collaborators.

use std::sync::Arc;

use tracing::{debug, info, info_span, warn, Instrument};

use ks_core::onboarding::wizard::{
    StepGate, WizardAction, WizardEvent, WizardPhase, WizardState, WizardStateMachine,
};
use ks_core::ports::{
    BackupImportError, BackupImportPort, ClockPort, OnboardingNotifierPort,
    PasscodeConfirmationPort, SkipConfirmationPort,
};
use ks_core::{
    Draft, Intent, Mode, OnboardingSessionId, StepCatalog, StepDefinition, StepId, Variant,
};

use super::context::{WizardContext, WizardSnapshot};
use crate::usecases::onboarding::{AssignVariant, CompleteOnboarding, DraftStore, SessionTracker};

/// Errors produced by the wizard controller.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("wizard has not been started")]
    NotStarted,
    /// Draft or completion flag could not be written. The transition was not applied.
    #[error("failed to persist onboarding state: {0}")]
    Persistence(#[source] anyhow::Error),
    #[error("passcode confirmation failed: {0}")]
    PasscodeConfirmation(#[source] anyhow::Error),
}

/// Read-only snapshot of the wizard for the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardView {
    pub phase: WizardPhase,
    pub session_id: OnboardingSessionId,
    pub variant: Variant,
    pub intent: Intent,
    pub mode: Mode,
    pub steps: Vec<StepId>,
    pub current_index: usize,
    pub current_step: StepDefinition,
    /// Why `next()` is currently refused, if it is.
    pub gate: Option<StepGate>,
    pub intent_chosen: bool,
    pub passcode_confirmed: bool,
    pub data_reclamation_enabled: bool,
    pub last_error: Option<String>,
}

impl WizardView {
    fn from_state(state: &WizardState, last_error: Option<String>) -> Self {
        let draft = &state.draft;
        let steps = draft.steps();
        let current_index = draft.current_step_index.min(steps.len().saturating_sub(1));
        Self {
            phase: state.phase,
            session_id: draft.session_id.clone(),
            variant: draft.variant,
            intent: draft.intent,
            mode: draft.mode,
            current_step: *StepCatalog::resolve(draft.current_step()),
            steps,
            current_index,
            gate: if state.phase.is_terminal() {
                None
            } else {
                WizardStateMachine::gate(draft)
            },
            intent_chosen: draft.intent_chosen,
            passcode_confirmed: draft.passcode_confirmed,
            data_reclamation_enabled: draft.data_reclamation_enabled,
            last_error,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }
}

/// Collaborators and use cases the controller drives.
pub struct WizardDeps {
    pub assign_variant: Arc<AssignVariant>,
    pub draft_store: Arc<DraftStore>,
    pub session_tracker: Arc<SessionTracker>,
    pub complete_onboarding: Arc<CompleteOnboarding>,
    pub clock: Arc<dyn ClockPort>,
    pub notifier: Arc<dyn OnboardingNotifierPort>,
    pub backup_import: Arc<dyn BackupImportPort>,
    pub passcode: Arc<dyn PasscodeConfirmationPort>,
    pub skip_confirmation: Arc<dyn SkipConfirmationPort>,
}

/// Controller that drives the onboarding wizard.
pub struct WizardController {
    context: Arc<WizardContext>,
    deps: WizardDeps,
}

impl WizardController {
    pub fn new(deps: WizardDeps) -> Self {
        Self {
            context: WizardContext::default().arc(),
            deps,
        }
    }

    /// Resumes the persisted draft if it validates and its session is still in
    /// progress, otherwise starts a fresh attempt. Calling it again on a
    /// started wizard returns the current view.
    pub async fn start(&self) -> Result<WizardView, WizardError> {
        let _dispatch_guard = self.context.acquire_dispatch_lock().await;

        let span = info_span!("usecase.wizard_controller.start");
        async {
            let snapshot = self.context.snapshot().await;
            if snapshot.wizard.is_some() {
                return Self::render(&snapshot);
            }

            let now = self.deps.clock.now_ms();
            let (mut draft, resumed) = match self.load_resumable_draft().await {
                Some(mut draft) => {
                    draft.clamp_step_index();
                    (draft, true)
                }
                None => {
                    let variant = self.deps.assign_variant.get_or_assign().await;
                    (Draft::new(OnboardingSessionId::new(), variant, now), false)
                }
            };
            draft.updated_at = now;
            let step = draft.current_step();

            self.deps
                .draft_store
                .save(&draft)
                .await
                .map_err(WizardError::Persistence)?;

            let tracker = &self.deps.session_tracker;
            self.track(
                "ensure_session",
                tracker
                    .ensure_session(
                        &draft.session_id,
                        draft.variant,
                        draft.intent,
                        draft.mode,
                        draft.started_at,
                    )
                    .await,
            );
            self.track(
                "record_step_viewed",
                tracker
                    .record_step_viewed(&draft.session_id, step, draft.intent, draft.mode)
                    .await,
            );

            info!(
                session_id = %draft.session_id,
                variant = %draft.variant,
                step = %step,
                resumed,
                "onboarding wizard started"
            );

            let state = WizardState::active(draft);
            self.context.commit(state.clone(), now).await;
            Ok(WizardView::from_state(&state, None))
        }
        .instrument(span)
        .await
    }

    /// Loads the persisted draft unless its session already finished. A
    /// finished session's draft is left behind when clearing it failed; it
    /// is overwritten by the fresh draft.
    async fn load_resumable_draft(&self) -> Option<Draft> {
        let draft = self.deps.draft_store.load().await?;
        if self
            .deps
            .session_tracker
            .is_session_finished(&draft.session_id)
            .await
        {
            warn!(
                session_id = %draft.session_id,
                "discarding draft of a finished onboarding session"
            );
            return None;
        }
        Some(draft)
    }

    pub async fn next(&self) -> Result<WizardView, WizardError> {
        self.dispatch(WizardEvent::Next).await
    }

    pub async fn back(&self) -> Result<WizardView, WizardError> {
        self.dispatch(WizardEvent::Back).await
    }

    pub async fn select_intent(&self, intent: Intent) -> Result<WizardView, WizardError> {
        self.dispatch(WizardEvent::SelectIntent { intent }).await
    }

    pub async fn select_mode(&self, mode: Mode) -> Result<WizardView, WizardError> {
        self.dispatch(WizardEvent::SelectMode { mode }).await
    }

    pub async fn set_data_reclamation(&self, enabled: bool) -> Result<WizardView, WizardError> {
        self.dispatch(WizardEvent::SetDataReclamation { enabled })
            .await
    }

    /// Abandons onboarding after the user confirms. A declined confirmation
    /// changes nothing.
    pub async fn skip(&self) -> Result<WizardView, WizardError> {
        let _dispatch_guard = self.context.acquire_dispatch_lock().await;

        let snapshot = self.context.snapshot().await;
        let state = snapshot.wizard.as_ref().ok_or(WizardError::NotStarted)?;
        if state.phase.is_terminal() {
            return Self::render(&snapshot);
        }

        if !self.deps.skip_confirmation.confirm_skip().await {
            info!(step = %state.draft.current_step(), "onboarding skip declined");
            return Self::render(&snapshot);
        }
        self.dispatch_locked(WizardEvent::SkipConfirmed).await
    }

    /// Runs the passcode entry sub-flow and records a successful confirmation.
    pub async fn confirm_passcode(&self) -> Result<WizardView, WizardError> {
        let _dispatch_guard = self.context.acquire_dispatch_lock().await;

        let snapshot = self.context.snapshot().await;
        let state = snapshot.wizard.as_ref().ok_or(WizardError::NotStarted)?;
        if state.phase.is_terminal() {
            return Self::render(&snapshot);
        }

        match self.deps.passcode.confirm().await {
            Ok(true) => self.dispatch_locked(WizardEvent::PasscodeConfirmed).await,
            Ok(false) => {
                info!("passcode sub-flow ended without confirmation");
                Self::render(&snapshot)
            }
            Err(err) => {
                warn!(error = %err, "passcode sub-flow failed");
                Err(WizardError::PasscodeConfirmation(err))
            }
        }
    }

    /// Restores a previous archive from the welcome step. Success finishes
    /// onboarding; failure leaves the wizard in place with a message in
    /// [`WizardView::last_error`].
    pub async fn import_backup(&self) -> Result<WizardView, WizardError> {
        let _dispatch_guard = self.context.acquire_dispatch_lock().await;

        let snapshot = self.context.snapshot().await;
        let state = snapshot.wizard.as_ref().ok_or(WizardError::NotStarted)?;
        if state.phase.is_terminal() || state.draft.current_step() != StepId::Welcome {
            debug!("backup import is only offered on the welcome step");
            return Self::render(&snapshot);
        }

        match self.deps.backup_import.import_backup().await {
            Ok(()) => {
                info!(
                    session_id = %state.draft.session_id,
                    "backup imported, finishing onboarding"
                );
                self.dispatch_locked(WizardEvent::BackupImported).await
            }
            Err(BackupImportError::Cancelled) => {
                info!("backup import cancelled");
                Self::render(&snapshot)
            }
            Err(err) => {
                warn!(error = %err, "backup import failed");
                self.context.set_last_error(Some(err.user_message())).await;
                Self::render(&self.context.snapshot().await)
            }
        }
    }

    /// Current view, `None` before [`WizardController::start`].
    pub async fn view(&self) -> Option<WizardView> {
        Self::render(&self.context.snapshot().await).ok()
    }

    fn render(snapshot: &WizardSnapshot) -> Result<WizardView, WizardError> {
        snapshot
            .wizard
            .as_ref()
            .map(|state| WizardView::from_state(state, snapshot.last_error.clone()))
            .ok_or(WizardError::NotStarted)
    }

    async fn dispatch(&self, event: WizardEvent) -> Result<WizardView, WizardError> {
        // Serialize operations so two callers never act on the same state.
        let _dispatch_guard = self.context.acquire_dispatch_lock().await;
        self.dispatch_locked(event).await
    }

    /// Must be called with the dispatch lock held.
    async fn dispatch_locked(&self, event: WizardEvent) -> Result<WizardView, WizardError> {
        let span = info_span!("usecase.wizard_controller.dispatch", event = ?event);
        async {
            let snapshot = self.context.snapshot().await;
            let current = snapshot.wizard.clone().ok_or(WizardError::NotStarted)?;
            let from_phase = current.phase;
            let from_index = current.draft.current_step_index;

            let (mut next, actions) = WizardStateMachine::transition(current, event);
            if actions.is_empty() {
                debug!(phase = ?from_phase, step_index = from_index, "wizard event had no effect");
                return Self::render(&snapshot);
            }

            let now = self.deps.clock.now_ms();
            next.draft.updated_at = now;
            info!(
                from_phase = ?from_phase,
                to_phase = ?next.phase,
                from_index,
                to_index = next.draft.current_step_index,
                "wizard transition"
            );

            let step_entered_at = self
                .execute_actions(&next, actions, snapshot.step_entered_at, now)
                .await?;
            self.context.commit(next.clone(), step_entered_at).await;
            Ok(WizardView::from_state(&next, None))
        }
        .instrument(span)
        .await
    }

    /// Runs the actions of one transition and returns the new dwell clock start.
    ///
    /// Persistence actions run first; if one fails nothing else has happened
    /// and the caller does not commit the new state. Analytics, draft clearing
    /// and notifications follow and never fail the transition.
    async fn execute_actions(
        &self,
        next: &WizardState,
        actions: Vec<WizardAction>,
        step_entered_at: i64,
        now: i64,
    ) -> Result<i64, WizardError> {
        let draft = &next.draft;
        let (persistence, effects): (Vec<_>, Vec<_>) = actions.into_iter().partition(|action| {
            matches!(
                action,
                WizardAction::PersistDraft | WizardAction::MarkOnboardingComplete
            )
        });

        for action in persistence {
            debug!(?action, "wizard executing action");
            match action {
                WizardAction::PersistDraft => self
                    .deps
                    .draft_store
                    .save(draft)
                    .await
                    .map_err(WizardError::Persistence)?,
                WizardAction::MarkOnboardingComplete => self
                    .deps
                    .complete_onboarding
                    .execute()
                    .await
                    .map_err(WizardError::Persistence)?,
                _ => {}
            }
        }

        let tracker = &self.deps.session_tracker;
        let mut entered_at = step_entered_at;
        for action in effects {
            debug!(?action, "wizard executing action");
            match action {
                WizardAction::LeaveStep { step } => self.track(
                    "record_step_duration",
                    tracker
                        .record_step_duration(
                            &draft.session_id,
                            step,
                            now.saturating_sub(step_entered_at),
                        )
                        .await,
                ),
                WizardAction::EnterStep { step } => {
                    entered_at = now;
                    self.track(
                        "record_step_viewed",
                        tracker
                            .record_step_viewed(&draft.session_id, step, draft.intent, draft.mode)
                            .await,
                    );
                }
                WizardAction::CompleteSession => self.track(
                    "complete_session",
                    tracker
                        .complete_session(&draft.session_id, draft.intent, draft.mode)
                        .await,
                ),
                WizardAction::SkipSession { drop_off } => self.track(
                    "skip_session",
                    tracker
                        .skip_session(&draft.session_id, drop_off, draft.intent, draft.mode)
                        .await,
                ),
                WizardAction::ClearDraft => {
                    if let Err(err) = self.deps.draft_store.clear().await {
                        warn!(error = %err, "failed to clear onboarding draft");
                    }
                }
                WizardAction::NotifyCompleted => self.deps.notifier.on_complete().await,
                WizardAction::NotifySkipped => self.deps.notifier.on_skip().await,
                WizardAction::PersistDraft | WizardAction::MarkOnboardingComplete => {}
            }
        }

        Ok(entered_at)
    }

    fn track(&self, operation: &'static str, result: anyhow::Result<()>) {
        if let Err(err) = result {
            warn!(operation, error = %err, "onboarding analytics write failed");
        }
    }
}
