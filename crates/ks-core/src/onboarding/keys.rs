//! Well-known key-value slots owned by the onboarding engine.

/// Completion flag, `"true"` / `"false"`. Read by the router to decide whether
/// to present the wizard at all.
///
/// 完成标记。路由据此决定是否展示向导。
pub const ONBOARDING_COMPLETED_KEY: &str = "onboarding.completed";

/// The single in-flight draft.
///
/// 唯一的进行中草稿。
pub const ONBOARDING_DRAFT_KEY: &str = "onboarding.draft";

/// Per-device A/B bucket, `control` / `streamlined`.
///
/// 每台设备的 A/B 分组。
pub const ONBOARDING_VARIANT_KEY: &str = "onboarding.variant";

/// Analytics log document.
///
/// 分析日志文档。
pub const ONBOARDING_ANALYTICS_KEY: &str = "onboarding.analytics";
