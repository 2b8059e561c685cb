//! Subcommand handlers.

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, info_span, warn, Instrument};

use ks_app::{WizardController, WizardView};
use ks_core::onboarding::wizard::StepGate;
use ks_core::{build_steps, Intent, Mode, StepCatalog, Variant};

use crate::bootstrap::{AppServices, WizardCollaborators};
use crate::cli::Command;
use crate::terminal::{
    ConsoleNotifier, TerminalBackupImport, TerminalPasscodeConfirmation, TerminalPrompt,
    TerminalSkipConfirmation,
};

pub async fn run(command: Command, services: &AppServices) -> anyhow::Result<()> {
    let span = info_span!("command", name = ?command);
    async {
        match command {
            Command::Status => status(services).await,
            Command::Report { pretty } => report(services, pretty).await,
            Command::Flow {
                intent,
                mode,
                variant,
            } => {
                print!("{}", render_flow(intent, mode, variant));
                Ok(())
            }
            Command::Reset => {
                services.reset_onboarding().execute().await?;
                println!("Onboarding reset.");
                Ok(())
            }
            Command::Wizard => wizard(services).await,
        }
    }
    .instrument(span)
    .await
}

async fn status(services: &AppServices) -> anyhow::Result<()> {
    let state = services
        .get_onboarding_state()
        .execute()
        .await
        .context("Failed to read onboarding state")?;
    println!("data dir:        {}", services.data_dir().display());
    println!("completed:       {}", yes_no(state.has_completed));
    println!("resumable draft: {}", yes_no(state.has_resumable_draft));
    println!(
        "variant:         {}",
        state
            .variant
            .map(|variant| variant.to_string())
            .unwrap_or_else(|| "unassigned".to_string())
    );
    Ok(())
}

async fn report(services: &AppServices, pretty: bool) -> anyhow::Result<()> {
    let summary = services.summarize_analytics().execute().await;
    let json = if pretty {
        serde_json::to_string_pretty(&summary)?
    } else {
        serde_json::to_string(&summary)?
    };
    println!("{json}");
    if let Some(step) = summary.top_drop_off_step() {
        info!(step = %step, "most common drop-off step");
    }
    Ok(())
}

fn render_flow(intent: Intent, mode: Mode, variant: Variant) -> String {
    let steps = build_steps(intent, mode, variant);
    let mut out = format!("{intent} / {mode} / {variant}: {} steps\n", steps.len());
    for (index, definition) in StepCatalog::resolve_all(&steps).into_iter().enumerate() {
        out.push_str(&format!(
            "{:>2}. {:<16} {}\n",
            index + 1,
            definition.id.as_str(),
            definition.title
        ));
    }
    out
}

/// One line of wizard input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum WizardInput {
    Next,
    Back,
    Skip,
    Intent(Intent),
    Mode(Mode),
    Passcode,
    Reclaim(bool),
    Import,
    Help,
    Quit,
}

const WIZARD_HELP: &str = "commands: next | back | skip | intent <journaling|therapy|legacy> | \
mode <full|quick> | passcode | reclaim <on|off> | import | help | quit";

fn parse_input(line: &str) -> Result<WizardInput, String> {
    let mut words = line.split_whitespace();
    let command = words.next().unwrap_or("next");
    let argument = words.next();
    match (command, argument) {
        ("next" | "n", None) => Ok(WizardInput::Next),
        ("back" | "b", None) => Ok(WizardInput::Back),
        ("skip", None) => Ok(WizardInput::Skip),
        ("intent", Some(value)) => value
            .parse()
            .map(WizardInput::Intent)
            .map_err(|err| format!("{err}")),
        ("mode", Some(value)) => value
            .parse()
            .map(WizardInput::Mode)
            .map_err(|err| format!("{err}")),
        ("passcode", None) => Ok(WizardInput::Passcode),
        ("reclaim", Some("on")) => Ok(WizardInput::Reclaim(true)),
        ("reclaim", Some("off")) => Ok(WizardInput::Reclaim(false)),
        ("import", None) => Ok(WizardInput::Import),
        ("help" | "?", None) => Ok(WizardInput::Help),
        ("quit" | "q", None) => Ok(WizardInput::Quit),
        _ => Err(format!("unrecognized input '{line}'. {WIZARD_HELP}")),
    }
}

fn render_view(view: &WizardView) -> String {
    let step = &view.current_step;
    let mut out = format!(
        "\n[{}/{}] {}\n{}\n{}\n",
        view.current_index + 1,
        view.steps.len(),
        step.title,
        step.subtitle,
        step.help_text
    );
    out.push_str(&format!(
        "intent: {}{}  mode: {}  data reclamation: {}\n",
        view.intent,
        if view.intent_chosen { "" } else { " (not chosen)" },
        view.mode,
        if view.data_reclamation_enabled { "on" } else { "off" }
    ));
    match view.gate {
        Some(StepGate::IntentNotChosen) => out.push_str("Choose an intent to continue.\n"),
        Some(StepGate::PasscodeNotConfirmed) => {
            out.push_str("Set a passcode (`passcode`) to continue.\n")
        }
        None => {}
    }
    if let Some(message) = &view.last_error {
        out.push_str(&format!("! {message}\n"));
    }
    out
}

async fn wizard(services: &AppServices) -> anyhow::Result<()> {
    let prompt = Arc::new(TerminalPrompt::new());
    let controller = services.wizard_controller(WizardCollaborators {
        notifier: Arc::new(ConsoleNotifier),
        backup_import: Arc::new(TerminalBackupImport::new(prompt.clone())),
        passcode: Arc::new(TerminalPasscodeConfirmation::new(prompt.clone())),
        skip_confirmation: Arc::new(TerminalSkipConfirmation::new(prompt.clone())),
    });

    let mut view = controller.start().await?;
    println!("{WIZARD_HELP}");
    while !view.is_terminal() {
        print!("{}", render_view(&view));
        let Some(line) = prompt.ask("> ").await? else {
            break;
        };
        let input = match parse_input(&line) {
            Ok(WizardInput::Quit) => break,
            Ok(WizardInput::Help) => {
                println!("{WIZARD_HELP}");
                continue;
            }
            Ok(input) => input,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        match apply_input(&controller, input).await {
            Ok(next) => view = next,
            Err(err) => {
                warn!(error = %err, "wizard operation failed");
                println!("! {err}");
            }
        }
    }

    if !view.is_terminal() {
        println!("Progress saved. Run `keepsake wizard` to resume.");
    }
    Ok(())
}

async fn apply_input(
    controller: &WizardController,
    input: WizardInput,
) -> Result<WizardView, ks_app::WizardError> {
    match input {
        WizardInput::Next => controller.next().await,
        WizardInput::Back => controller.back().await,
        WizardInput::Skip => controller.skip().await,
        WizardInput::Intent(intent) => controller.select_intent(intent).await,
        WizardInput::Mode(mode) => controller.select_mode(mode).await,
        WizardInput::Passcode => controller.confirm_passcode().await,
        WizardInput::Reclaim(enabled) => controller.set_data_reclamation(enabled).await,
        WizardInput::Import => controller.import_backup().await,
        // Handled by the loop; a fresh view keeps the signature total.
        WizardInput::Help | WizardInput::Quit => controller
            .view()
            .await
            .ok_or(ks_app::WizardError::NotStarted),
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
