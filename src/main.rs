mod bootstrap;
mod cli;
mod commands;
mod terminal;

use clap::Parser;
use tracing::debug;

use crate::bootstrap::{
    init_tracing_subscriber, resolve_config, resolve_data_dir, wire_services, LOGS_DIR_NAME,
};
use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = resolve_config(cli.config.clone())?;
    let data_dir = resolve_data_dir(&config)?;
    let log_dir = config.file_logging.then(|| data_dir.join(LOGS_DIR_NAME));
    init_tracing_subscriber(log_dir.as_deref())?;
    debug!(data_dir = %data_dir.display(), ?config, "configuration loaded");

    let services = wire_services(&config)?;
    commands::run(cli.command, &services).await
}
