//! # ks-core
//!
//! Core domain models and business logic for the Keepsake onboarding engine.
//!
//! This crate contains pure business logic without any infrastructure dependencies.
//! Every side effect (persistence, time, randomness, UI collaborators) is reached
//! through a port defined in [`ports`].

// Public module exports
pub mod config;
pub mod ids;
pub mod onboarding;
pub mod ports;

// Re-export commonly used types at the crate root
pub use config::AppConfig;
pub use ids::OnboardingSessionId;
pub use onboarding::{
    build_steps, AnalyticsLog, AnalyticsSummary, Draft, Intent, Mode, SessionRecord,
    SessionStatus, StepCatalog, StepDefinition, StepId, Variant,
};
