//! Onboarding domain models
//!
//! This module defines the core domain models for the first-run wizard:
//! which steps exist, in what order, how in-progress state is resumed, and
//! what is measured about the user's path through them.

pub mod catalog;
pub mod draft;
pub mod flow;
pub mod keys;
pub mod model;
pub mod session;
pub mod summary;
pub mod wizard;

pub use catalog::{StepCatalog, StepDefinition};
pub use draft::{Draft, DraftDecodeError};
pub use flow::build_steps;
pub use model::{Intent, Mode, ParseOnboardingValueError, StepId, Variant};
pub use session::{AnalyticsLog, SessionRecord, SessionStatus};
pub use summary::AnalyticsSummary;

/// Onboarding completion status persisted across app restarts.
///
/// 跨应用重启持久化的引导完成状态。
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OnboardingStatus {
    /// Whether onboarding has been finished or skipped
    pub has_completed: bool,
}

impl OnboardingStatus {
    /// Parses the boolean-as-text completion flag. Anything but `"true"` is `false`.
    pub fn from_flag(raw: Option<&str>) -> Self {
        Self {
            has_completed: matches!(raw.map(str::trim), Some("true")),
        }
    }

    pub fn as_flag(&self) -> &'static str {
        if self.has_completed {
            "true"
        } else {
            "false"
        }
    }
}
