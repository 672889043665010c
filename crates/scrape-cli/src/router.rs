//! Command routing logic for CLI

use std::io::IsTerminal;
use std::sync::Arc;

use scrape_core::{AppConfig, HttpFetcher, JsonFileEntryStore};

use crate::args::{Cli, Commands};
use crate::commands::{self, CommandContext};

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    let store_path = cli.store.clone().unwrap_or_else(|| config.entries_path());
    tracing::debug!(store = %store_path.display(), "Opening entry store");

    let ctx = CommandContext {
        store: Arc::new(JsonFileEntryStore::open(&store_path)?),
        fetcher: Arc::new(HttpFetcher::new(config.user_agent.clone())),
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Add {
            connection,
            sensor,
            non_interactive,
        } => commands::add::run(&ctx, &connection, &sensor, interactive(non_interactive)).await,
        Commands::Options {
            entry_id,
            sensor_index,
            connection,
            sensor,
            non_interactive,
        } => {
            commands::options::run(
                &ctx,
                &entry_id,
                sensor_index,
                &connection,
                &sensor,
                interactive(non_interactive),
            )
            .await
        }
        Commands::List { json } => commands::list::run(&ctx, json),
        Commands::Show { entry_id, json } => commands::show::run(&ctx, entry_id.as_deref(), json).await,
        Commands::Remove { entry_id } => commands::remove::run(&ctx, &entry_id),
    }
}

/// Prompts need a terminal on stdin
fn interactive(non_interactive: bool) -> bool {
    let is_tty = std::io::stdin().is_terminal();
    tracing::debug!(is_tty, non_interactive, "TTY detection");
    !non_interactive && is_tty
}
