//! Keepsake onboarding application layer
//!
//! This crate contains the onboarding use cases and the wizard orchestrator
//! that drives the pure state machine from `ks-core` against the ports.

pub mod usecases;

pub use usecases::onboarding::{
    AssignVariant, CompleteOnboarding, DraftStore, GetOnboardingState, OnboardingStateDto,
    ResetOnboarding, SessionTracker, SummarizeOnboardingAnalytics, WizardController, WizardDeps,
    WizardError, WizardView,
};
