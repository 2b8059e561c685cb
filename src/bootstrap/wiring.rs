//! # Dependency Injection
//!
//! ## Responsibilities
//!
//! - Resolve configuration defaults (data directory, retention cap)
//! - Create infra implementations (file store, clock, random source)
//! - Inject them into the onboarding use cases and the wizard controller
//!
//! ## Prohibited
//!
//! - No business logic: this module assembles, it does not decide.
//!
//! > **This is the only place allowed to depend on ks-infra + ks-app simultaneously.**

use std::path::PathBuf;
use std::sync::Arc;

use ks_app::usecases::onboarding::DEFAULT_MAX_SESSIONS;
use ks_app::{
    AssignVariant, CompleteOnboarding, DraftStore, GetOnboardingState, ResetOnboarding,
    SessionTracker, SummarizeOnboardingAnalytics, WizardController, WizardDeps,
};
use ks_core::ports::{
    BackupImportPort, ClockPort, KeyValueStorePort, OnboardingNotifierPort,
    PasscodeConfirmationPort, RandomSourcePort, SkipConfirmationPort,
};
use ks_core::AppConfig;
use ks_infra::{FileKeyValueStore, OsRandomSource, SystemClock};

pub const APP_DIR_NAME: &str = "keepsake";
pub const LOGS_DIR_NAME: &str = "logs";

/// Result type for wiring operations
pub type WiringResult<T> = Result<T, WiringError>;

/// Errors during dependency injection
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("No data directory configured and the platform data directory is unknown")]
    DataDirUnavailable,
}

/// Collaborators supplied by whichever host runs the wizard.
pub struct WizardCollaborators {
    pub notifier: Arc<dyn OnboardingNotifierPort>,
    pub backup_import: Arc<dyn BackupImportPort>,
    pub passcode: Arc<dyn PasscodeConfirmationPort>,
    pub skip_confirmation: Arc<dyn SkipConfirmationPort>,
}

/// Assembled application services.
pub struct AppServices {
    store: Arc<dyn KeyValueStorePort>,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomSourcePort>,
    max_sessions: usize,
    data_dir: PathBuf,
}

impl AppServices {
    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    pub fn get_onboarding_state(&self) -> GetOnboardingState {
        GetOnboardingState::new(self.store.clone())
    }

    pub fn summarize_analytics(&self) -> SummarizeOnboardingAnalytics {
        SummarizeOnboardingAnalytics::new(self.store.clone())
    }

    pub fn reset_onboarding(&self) -> ResetOnboarding {
        ResetOnboarding::new(self.store.clone())
    }

    pub fn wizard_controller(&self, collaborators: WizardCollaborators) -> WizardController {
        WizardController::new(WizardDeps {
            assign_variant: Arc::new(AssignVariant::new(
                self.store.clone(),
                self.random.clone(),
                self.clock.clone(),
            )),
            draft_store: Arc::new(DraftStore::new(self.store.clone())),
            session_tracker: Arc::new(SessionTracker::with_max_sessions(
                self.store.clone(),
                self.clock.clone(),
                self.max_sessions,
            )),
            complete_onboarding: Arc::new(CompleteOnboarding::new(self.store.clone())),
            clock: self.clock.clone(),
            notifier: collaborators.notifier,
            backup_import: collaborators.backup_import,
            passcode: collaborators.passcode,
            skip_confirmation: collaborators.skip_confirmation,
        })
    }
}

/// Configured data directory, or the platform data directory when unset.
pub fn resolve_data_dir(config: &AppConfig) -> WiringResult<PathBuf> {
    if !config.data_dir.as_os_str().is_empty() {
        return Ok(config.data_dir.clone());
    }
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or(WiringError::DataDirUnavailable)
}

pub fn resolve_max_sessions(config: &AppConfig) -> usize {
    config.max_sessions.unwrap_or(DEFAULT_MAX_SESSIONS)
}

pub fn wire_services(config: &AppConfig) -> WiringResult<AppServices> {
    let data_dir = resolve_data_dir(config)?;
    Ok(AppServices {
        store: Arc::new(FileKeyValueStore::with_defaults(data_dir.clone())),
        clock: Arc::new(SystemClock),
        random: Arc::new(OsRandomSource),
        max_sessions: resolve_max_sessions(config),
        data_dir,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_data_dir_wins() {
        let config = AppConfig {
            data_dir: PathBuf::from("/srv/keepsake"),
            ..Default::default()
        };

        let data_dir = resolve_data_dir(&config).unwrap();
        assert_eq!(data_dir, PathBuf::from("/srv/keepsake"));
    }

    #[test]
    fn test_max_sessions_defaults_to_unbounded() {
        let default = resolve_max_sessions(&AppConfig::default());
        assert_eq!(default, DEFAULT_MAX_SESSIONS);
        assert_eq!(default, 0);

        let capped = AppConfig {
            max_sessions: Some(25),
            ..Default::default()
        };
        assert_eq!(resolve_max_sessions(&capped), 25);
    }

    #[tokio::test]
    async fn test_wired_services_use_the_data_dir() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config = AppConfig {
            data_dir: temp_dir.path().to_path_buf(),
            ..Default::default()
        };
        let services = wire_services(&config).unwrap();

        services.reset_onboarding().execute().await.unwrap();
        let state = services.get_onboarding_state().execute().await.unwrap();

        assert!(!state.has_completed);
        assert_eq!(services.data_dir(), &temp_dir.path().to_path_buf());
    }
}
