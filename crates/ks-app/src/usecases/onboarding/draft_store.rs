use std::sync::Arc;

use anyhow::Context;
use tracing::{debug, warn};

use ks_core::onboarding::keys::ONBOARDING_DRAFT_KEY;
use ks_core::ports::KeyValueStorePort;
use ks_core::Draft;

/// Single-slot persistence for the in-progress wizard draft.
///
/// There is one draft per store. A second concurrent wizard overwrites the
/// first one's draft.
pub struct DraftStore {
    store: Arc<dyn KeyValueStorePort>,
}

impl DraftStore {
    pub fn new(store: Arc<dyn KeyValueStorePort>) -> Self {
        Self { store }
    }

    pub async fn save(&self, draft: &Draft) -> anyhow::Result<()> {
        let encoded = draft.encode().context("Failed to encode onboarding draft")?;
        self.store
            .set(ONBOARDING_DRAFT_KEY, &encoded)
            .await
            .context("Failed to save onboarding draft")?;
        debug!(
            session_id = %draft.session_id,
            step_index = draft.current_step_index,
            "onboarding draft saved"
        );
        Ok(())
    }

    /// Restores the draft, or `None` when there is none or it does not validate.
    pub async fn load(&self) -> Option<Draft> {
        let raw = match self.store.get(ONBOARDING_DRAFT_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(error = %err, "failed to read onboarding draft");
                return None;
            }
        };

        match Draft::decode(&raw) {
            Ok(draft) => Some(draft),
            Err(err) => {
                warn!(error = %err, "discarding invalid onboarding draft");
                None
            }
        }
    }

    pub async fn clear(&self) -> anyhow::Result<()> {
        self.store
            .remove(ONBOARDING_DRAFT_KEY)
            .await
            .context("Failed to clear onboarding draft")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ks_core::{Intent, Mode, OnboardingSessionId, Variant};
    use ks_infra::InMemoryKeyValueStore;

    fn sample_draft() -> Draft {
        let mut draft = Draft::new(OnboardingSessionId::from("s-1"), Variant::Control, 1_000);
        draft.intent = Intent::Therapy;
        draft.intent_chosen = true;
        draft.mode = Mode::Quick;
        draft.current_step_index = 2;
        draft
    }

    #[tokio::test]
    async fn test_save_then_load_returns_equal_draft() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let drafts = DraftStore::new(store);

        drafts.save(&sample_draft()).await.unwrap();

        assert_eq!(drafts.load().await, Some(sample_draft()));
    }

    #[tokio::test]
    async fn test_load_returns_none_when_empty() {
        let drafts = DraftStore::new(Arc::new(InMemoryKeyValueStore::new()));
        assert_eq!(drafts.load().await, None);
    }

    #[tokio::test]
    async fn test_load_rejects_invalid_enum_value() {
        let raw = r#"{"sessionId":"s","variant":"control","intent":"hobby","intentChosen":true,
            "mode":"full","currentStepIndex":0,"passcodeConfirmed":false,
            "dataReclamationEnabled":false,"startedAt":1,"updatedAt":1}"#;
        let store = Arc::new(InMemoryKeyValueStore::with_entries([(ONBOARDING_DRAFT_KEY, raw)]));

        assert_eq!(DraftStore::new(store).load().await, None);
    }

    #[tokio::test]
    async fn test_load_rejects_garbage() {
        let store = Arc::new(InMemoryKeyValueStore::with_entries([(
            ONBOARDING_DRAFT_KEY,
            "{not json",
        )]));

        assert_eq!(DraftStore::new(store).load().await, None);
    }

    #[tokio::test]
    async fn test_clear_removes_slot() {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let drafts = DraftStore::new(store.clone());
        drafts.save(&sample_draft()).await.unwrap();

        drafts.clear().await.unwrap();

        assert_eq!(drafts.load().await, None);
        assert!(store.snapshot().await.is_empty());
    }
}
