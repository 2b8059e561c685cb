use std::sync::Arc;

use tracing::debug;

use ks_core::ports::KeyValueStorePort;
use ks_core::AnalyticsSummary;

use super::session_tracker::load_analytics_log;

/// Use case for summarizing the onboarding funnel.
///
/// Read-only; the summary is recomputed from the whole log on every call.
pub struct SummarizeOnboardingAnalytics {
    store: Arc<dyn KeyValueStorePort>,
}

impl SummarizeOnboardingAnalytics {
    pub fn new(store: Arc<dyn KeyValueStorePort>) -> Self {
        Self { store }
    }

    pub async fn execute(&self) -> AnalyticsSummary {
        let log = load_analytics_log(self.store.as_ref()).await;
        let summary = AnalyticsSummary::from_sessions(&log.sessions);
        debug!(
            total = summary.total_sessions,
            completed = summary.completed_sessions,
            skipped = summary.skipped_sessions,
            "onboarding analytics summarized"
        );
        summary
    }
}
