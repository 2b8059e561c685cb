//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ks_core::{Intent, Mode, Variant};

/// Keepsake onboarding engine
#[derive(Parser, Debug)]
#[command(name = "keepsake")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show completion flag, resumable draft and assigned variant
    Status,

    /// Print the onboarding funnel summary as JSON
    Report {
        /// Pretty-print the JSON
        #[arg(short, long)]
        pretty: bool,
    },

    /// Preview the step sequence for a combination of selections
    Flow {
        #[arg(long, default_value = "journaling")]
        intent: Intent,

        #[arg(long, default_value = "full")]
        mode: Mode,

        #[arg(long, default_value = "control")]
        variant: Variant,
    },

    /// Clear the completion flag and any draft so the wizard runs again
    Reset,

    /// Run the onboarding wizard in the terminal
    Wizard,
}
