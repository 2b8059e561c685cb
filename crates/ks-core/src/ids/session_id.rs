use serde::{Deserialize, Serialize};

use super::id_macro::impl_id;

/// Onboarding attempt identifier.
///
/// Correlates one [`Draft`](crate::onboarding::Draft) with one
/// [`SessionRecord`](crate::onboarding::SessionRecord) across reloads.
/// Format: UUID v4.
///
/// 引导尝试标识。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OnboardingSessionId(String);

impl_id!(OnboardingSessionId);
