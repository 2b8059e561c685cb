use std::sync::Arc;

use ks_core::onboarding::wizard::WizardState;
use tokio::sync::Mutex;

/// Mutable controller state: the wizard itself plus what the state machine
/// does not model.
#[derive(Debug, Clone, Default)]
pub(crate) struct WizardSnapshot {
    /// `None` until the wizard is started.
    pub wizard: Option<WizardState>,
    /// When the current step was entered (dwell clock start).
    pub step_entered_at: i64,
    /// User-visible message from the last failed collaborator call.
    pub last_error: Option<String>,
}

/// Shared wizard context containing state and dispatch lock.
///
/// ## Lock Ordering
/// When acquiring both locks, acquire `dispatch_lock` first, then `state`.
/// - `dispatch_lock`: held for a whole operation, including awaited
///   collaborators, so only one operation is in flight per wizard.
/// - `state`: held only for short reads and writes.
#[derive(Clone, Default)]
pub(crate) struct WizardContext {
    state: Arc<Mutex<WizardSnapshot>>,
    dispatch_lock: Arc<Mutex<()>>,
}

impl WizardContext {
    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Lightweight read that does NOT acquire `dispatch_lock`.
    pub async fn snapshot(&self) -> WizardSnapshot {
        self.state.lock().await.clone()
    }

    pub async fn acquire_dispatch_lock(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.dispatch_lock.lock().await
    }

    /// Replaces the state. Only call while holding `dispatch_lock`.
    pub async fn commit(&self, wizard: WizardState, step_entered_at: i64) {
        let mut guard = self.state.lock().await;
        guard.wizard = Some(wizard);
        guard.step_entered_at = step_entered_at;
        guard.last_error = None;
    }

    pub async fn set_last_error(&self, message: Option<String>) {
        self.state.lock().await.last_error = message;
    }
}
