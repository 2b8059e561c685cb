use std::sync::Arc;

use anyhow::Context;

use ks_core::onboarding::keys::ONBOARDING_COMPLETED_KEY;
use ks_core::onboarding::OnboardingStatus;
use ks_core::ports::KeyValueStorePort;

/// Use case for completing onboarding.
///
/// Marks the onboarding process as complete in the persistent store. Both a
/// finished and a skipped wizard count as complete.
pub struct CompleteOnboarding {
    store: Arc<dyn KeyValueStorePort>,
}

impl CompleteOnboarding {
    /// Create a new CompleteOnboarding use case from trait objects.
    pub fn new(store: Arc<dyn KeyValueStorePort>) -> Self {
        Self { store }
    }

    /// Mark onboarding as complete.
    pub async fn execute(&self) -> anyhow::Result<()> {
        let status = OnboardingStatus {
            has_completed: true,
        };
        self.store
            .set(ONBOARDING_COMPLETED_KEY, status.as_flag())
            .await
            .context("Failed to mark onboarding complete")
    }
}
