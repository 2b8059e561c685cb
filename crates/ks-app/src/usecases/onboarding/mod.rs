//! Onboarding use cases
//!
//! This module contains use cases for the first-run wizard: variant
//! assignment, draft persistence, funnel analytics, completion state, and
//! the wizard controller that ties them together.

pub mod analytics;
pub mod complete;
pub mod draft_store;
pub mod get_state;
pub mod reset;
pub mod session_tracker;
pub mod variant;
pub mod wizard;

pub use analytics::SummarizeOnboardingAnalytics;
pub use complete::CompleteOnboarding;
pub use draft_store::DraftStore;
pub use get_state::GetOnboardingState;
pub use reset::ResetOnboarding;
pub use session_tracker::{SessionTracker, DEFAULT_MAX_SESSIONS};
pub use variant::AssignVariant;
pub use wizard::{WizardController, WizardDeps, WizardError, WizardView};

use ks_core::Variant;

/// Data transfer object for onboarding state, read by the router on launch.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct OnboardingStateDto {
    pub has_completed: bool,
    pub has_resumable_draft: bool,
    /// `None` until the device has been bucketed.
    pub variant: Option<Variant>,
}
