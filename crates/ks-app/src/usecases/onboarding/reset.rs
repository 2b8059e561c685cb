use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use ks_core::onboarding::keys::{ONBOARDING_COMPLETED_KEY, ONBOARDING_DRAFT_KEY};
use ks_core::ports::KeyValueStorePort;

/// Use case for resetting onboarding so the wizard runs again.
///
/// Clears the completion flag and any draft. The variant and the analytics
/// log are kept: a device is never re-bucketed.
pub struct ResetOnboarding {
    store: Arc<dyn KeyValueStorePort>,
}

impl ResetOnboarding {
    pub fn new(store: Arc<dyn KeyValueStorePort>) -> Self {
        Self { store }
    }

    pub async fn execute(&self) -> anyhow::Result<()> {
        self.store
            .remove(ONBOARDING_COMPLETED_KEY)
            .await
            .context("Failed to clear onboarding completion flag")?;
        self.store
            .remove(ONBOARDING_DRAFT_KEY)
            .await
            .context("Failed to clear onboarding draft")?;
        info!("onboarding reset");
        Ok(())
    }
}
