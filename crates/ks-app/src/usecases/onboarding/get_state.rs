use std::sync::Arc;

use tracing::warn;

use ks_core::onboarding::keys::{ONBOARDING_COMPLETED_KEY, ONBOARDING_VARIANT_KEY};
use ks_core::onboarding::OnboardingStatus;
use ks_core::ports::KeyValueStorePort;
use ks_core::Variant;

use super::{DraftStore, OnboardingStateDto};

/// Use case for getting current onboarding state.
///
/// Returns the current state of onboarding including:
/// - Whether onboarding is completed (finished or skipped)
/// - Whether a valid draft can be resumed
/// - The assigned variant, if any. Reading never assigns one.
pub struct GetOnboardingState {
    store: Arc<dyn KeyValueStorePort>,
    drafts: DraftStore,
}

impl GetOnboardingState {
    /// Create a new GetOnboardingState use case from trait objects.
    pub fn new(store: Arc<dyn KeyValueStorePort>) -> Self {
        Self {
            drafts: DraftStore::new(store.clone()),
            store,
        }
    }

    /// Get current onboarding state.
    pub async fn execute(&self) -> anyhow::Result<OnboardingStateDto> {
        let flag = self.store.get(ONBOARDING_COMPLETED_KEY).await?;
        let status = OnboardingStatus::from_flag(flag.as_deref());

        let variant = match self.store.get(ONBOARDING_VARIANT_KEY).await? {
            Some(raw) => match raw.trim().parse::<Variant>() {
                Ok(variant) => Some(variant),
                Err(err) => {
                    warn!(error = %err, "stored onboarding variant is invalid");
                    None
                }
            },
            None => None,
        };

        Ok(OnboardingStateDto {
            has_completed: status.has_completed,
            has_resumable_draft: self.drafts.load().await.is_some(),
            variant,
        })
    }
}
