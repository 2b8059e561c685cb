//! Static step metadata.

use super::StepId;

/// Descriptive metadata for one wizard screen.
///
/// 单个向导页面的描述信息。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDefinition {
    pub id: StepId,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub help_text: &'static str,
    /// Visual theme / icon key consumed by the renderer.
    pub theme: &'static str,
}

const WELCOME: StepDefinition = StepDefinition {
    id: StepId::Welcome,
    title: "Welcome to Keepsake",
    subtitle: "A private place for the stories worth keeping",
    help_text: "Start fresh, or restore an existing backup to pick up where you left off.",
    theme: "sunrise",
};

const INTENT: StepDefinition = StepDefinition {
    id: StepId::Intent,
    title: "What brings you here?",
    subtitle: "Choose what matters most right now",
    help_text: "Your choice shapes the next few steps. You can change it later in settings.",
    theme: "compass",
};

const PRIVACY: StepDefinition = StepDefinition {
    id: StepId::Privacy,
    title: "Your words stay yours",
    subtitle: "Everything is stored on this device",
    help_text: "Entries are encrypted locally and never leave your device unless you export them.",
    theme: "shield",
};

const PASSCODE: StepDefinition = StepDefinition {
    id: StepId::Passcode,
    title: "Set a passcode",
    subtitle: "Lock your archive",
    help_text: "Enter the passcode twice. A lost passcode cannot be recovered.",
    theme: "lock",
};

const DATA_RECLAMATION: StepDefinition = StepDefinition {
    id: StepId::DataReclamation,
    title: "Reclaim your data",
    subtitle: "Bring in what other services hold about you",
    help_text: "Optional. You can enable imports from data exports at any time.",
    theme: "archive",
};

const EXTENSION: StepDefinition = StepDefinition {
    id: StepId::Extension,
    title: "Capture from anywhere",
    subtitle: "Install the browser extension",
    help_text: "Save snippets and pages straight into your archive while you browse.",
    theme: "puzzle",
};

const SUMMARY: StepDefinition = StepDefinition {
    id: StepId::Summary,
    title: "You're all set",
    subtitle: "Here is how your archive is configured",
    help_text: "Review your choices, then start your first entry.",
    theme: "check",
};

/// Lookup from step identifier to its static definition.
///
/// 由步骤标识查找其静态定义。
pub struct StepCatalog;

impl StepCatalog {
    /// Resolves a step to its metadata.
    ///
    /// The match is exhaustive, so a step without a definition fails to compile.
    pub fn resolve(step: StepId) -> &'static StepDefinition {
        match step {
            StepId::Welcome => &WELCOME,
            StepId::Intent => &INTENT,
            StepId::Privacy => &PRIVACY,
            StepId::Passcode => &PASSCODE,
            StepId::DataReclamation => &DATA_RECLAMATION,
            StepId::Extension => &EXTENSION,
            StepId::Summary => &SUMMARY,
        }
    }

    /// Resolves every step of a flow, preserving order.
    pub fn resolve_all(steps: &[StepId]) -> Vec<&'static StepDefinition> {
        steps.iter().map(|step| Self::resolve(*step)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_step_resolves_to_its_own_definition() {
        for step in StepId::ALL {
            let definition = StepCatalog::resolve(*step);
            assert_eq!(definition.id, *step);
            assert!(!definition.title.is_empty());
            assert!(!definition.theme.is_empty());
        }
    }

    #[test]
    fn test_resolve_all_preserves_order() {
        let defs = StepCatalog::resolve_all(&[StepId::Summary, StepId::Welcome]);
        let ids: Vec<_> = defs.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![StepId::Summary, StepId::Welcome]);
    }
}
