//! Onboarding collaborator ports
//!
//! Narrow interfaces to the collaborators the wizard consumes or notifies.
//! Their internals (routing, backup parsing, passcode hashing, dialogs) live
//! outside this engine.

use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by the backup-import collaborator.
///
/// 备份导入协作者报告的失败。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackupImportError {
    #[error("Import cancelled")]
    Cancelled,
    #[error("Backup file is invalid: {0}")]
    InvalidBackup(String),
    #[error("Import failed: {0}")]
    Failed(String),
}

impl BackupImportError {
    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            BackupImportError::Cancelled => "Import was cancelled.".to_string(),
            BackupImportError::InvalidBackup(_) => {
                "That file doesn't look like a Keepsake backup.".to_string()
            }
            BackupImportError::Failed(_) => {
                "We couldn't import your backup. Please try again.".to_string()
            }
        }
    }
}

/// Receives terminal wizard transitions (consumed by the router).
///
/// 接收向导的终态转换（由路由消费）。
#[async_trait]
pub trait OnboardingNotifierPort: Send + Sync {
    async fn on_complete(&self);
    async fn on_skip(&self);
}

/// Restores a previous archive from the welcome step.
#[async_trait]
pub trait BackupImportPort: Send + Sync {
    async fn import_backup(&self) -> Result<(), BackupImportError>;
}

/// Runs the passcode entry and confirmation sub-flow.
#[async_trait]
pub trait PasscodeConfirmationPort: Send + Sync {
    /// `Ok(true)` once the user entered and confirmed a passcode.
    async fn confirm(&self) -> anyhow::Result<bool>;
}

/// Asks the user to confirm abandoning onboarding.
#[async_trait]
pub trait SkipConfirmationPort: Send + Sync {
    async fn confirm_skip(&self) -> bool;
}
