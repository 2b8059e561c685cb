//! Port interfaces for the application layer
//!
//! Ports define the contract between the application logic (use cases)
//! and infrastructure implementations. This follows Hexagonal Architecture
//! principles, allowing the onboarding engine to be exercised against
//! in-memory fakes instead of a real host-provided store.
//!
//! ## Port Placement Guidelines
//!
//! Before adding a new port to `ks-core/ports`, ask yourself three questions:
//!
//! 1. **Does this port represent a business capability?**
//! 2. **Will it be depended upon by multiple use cases?**
//! 3. **Is it implemented by the infrastructure layer or an external collaborator?**
//!
//! If all three answers are **yes**, place it in `ks-core/ports`.

mod clock;
pub mod kv_store;
pub mod onboarding;
mod random;

pub use clock::*;
pub use random::*;

pub use kv_store::{KeyValueStoreError, KeyValueStorePort};
pub use onboarding::{
    BackupImportError, BackupImportPort, OnboardingNotifierPort, PasscodeConfirmationPort,
    SkipConfirmationPort,
};
