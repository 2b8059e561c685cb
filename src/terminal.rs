//! Terminal stand-ins for the wizard's external collaborators.
//!
//! The real host renders steps and runs the passcode, backup and dialog
//! flows itself. These adapters let the engine be driven from a shell.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing::{info, warn};

use ks_core::ports::{
    BackupImportError, BackupImportPort, OnboardingNotifierPort, PasscodeConfirmationPort,
    SkipConfirmationPort,
};

/// Line-oriented stdin shared by the command loop and the collaborators.
pub struct TerminalPrompt {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }

    /// Prints `question` and reads one trimmed line. `None` on end of input.
    pub async fn ask(&self, question: &str) -> anyhow::Result<Option<String>> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(question.as_bytes()).await?;
        stdout.flush().await?;

        let mut lines = self.lines.lock().await;
        Ok(lines.next_line().await?.map(|line| line.trim().to_string()))
    }
}

pub struct TerminalSkipConfirmation {
    prompt: Arc<TerminalPrompt>,
}

impl TerminalSkipConfirmation {
    pub fn new(prompt: Arc<TerminalPrompt>) -> Self {
        Self { prompt }
    }
}

#[async_trait]
impl SkipConfirmationPort for TerminalSkipConfirmation {
    async fn confirm_skip(&self) -> bool {
        match self.prompt.ask("Skip onboarding? You can restart it later. [y/N] ").await {
            Ok(Some(answer)) => is_yes(&answer),
            Ok(None) => false,
            Err(err) => {
                warn!(error = %err, "failed to read skip confirmation");
                false
            }
        }
    }
}

/// Asks for the passcode twice. Nothing is stored; hashing and key storage
/// belong to the vault.
pub struct TerminalPasscodeConfirmation {
    prompt: Arc<TerminalPrompt>,
}

impl TerminalPasscodeConfirmation {
    pub fn new(prompt: Arc<TerminalPrompt>) -> Self {
        Self { prompt }
    }
}

#[async_trait]
impl PasscodeConfirmationPort for TerminalPasscodeConfirmation {
    async fn confirm(&self) -> anyhow::Result<bool> {
        let Some(first) = self.prompt.ask("Choose a passcode: ").await? else {
            return Ok(false);
        };
        if first.is_empty() {
            return Ok(false);
        }
        let second = self.prompt.ask("Repeat the passcode: ").await?;
        if second.as_deref() != Some(first.as_str()) {
            println!("Passcodes did not match.");
            return Ok(false);
        }
        Ok(true)
    }
}

/// Checks that the chosen file exists and is a JSON document. Restoring its
/// content is the archive's job.
pub struct TerminalBackupImport {
    prompt: Arc<TerminalPrompt>,
}

impl TerminalBackupImport {
    pub fn new(prompt: Arc<TerminalPrompt>) -> Self {
        Self { prompt }
    }
}

#[async_trait]
impl BackupImportPort for TerminalBackupImport {
    async fn import_backup(&self) -> Result<(), BackupImportError> {
        let answer = self
            .prompt
            .ask("Backup file path (empty to cancel): ")
            .await
            .map_err(|err| BackupImportError::Failed(err.to_string()))?;
        let path = match answer {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => return Err(BackupImportError::Cancelled),
        };

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|err| BackupImportError::Failed(format!("{}: {err}", path.display())))?;
        serde_json::from_str::<serde_json::Value>(&content)
            .map_err(|err| BackupImportError::InvalidBackup(err.to_string()))?;

        info!(path = %path.display(), "backup accepted");
        Ok(())
    }
}

#[derive(Default)]
pub struct ConsoleNotifier;

#[async_trait]
impl OnboardingNotifierPort for ConsoleNotifier {
    async fn on_complete(&self) {
        println!("Onboarding complete. Welcome to Keepsake.");
    }

    async fn on_skip(&self) {
        println!("Onboarding skipped. Run `keepsake reset` to see it again.");
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_answers() {
        assert!(is_yes("y"));
        assert!(is_yes("YES"));
        assert!(!is_yes(""));
        assert!(!is_yes("no"));
    }
}
