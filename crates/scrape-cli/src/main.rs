//! Scrape CLI
//!
//! Set up, reconfigure and read CSS-selector scrape sensors from the terminal.
//!
//! # Installation
//!
//! ```bash
//! cargo install --path crates/scrape-cli
//! ```
//!
//! # Commands
//!
//! - `scrape add` walks through the connection and sensor forms. Every value
//!   can be given as a flag; with `--non-interactive` nothing is prompted and a
//!   rejected form ends the command with an error.
//! - `scrape options <entry>` reruns both forms, prefilled from the stored
//!   entry, and replaces its configuration in place.
//! - `scrape list`, `scrape show` and `scrape remove` inspect the entry store.
//!
//! Logging goes to stderr. `RUST_LOG` wins over the configured level.

mod args;
mod commands;
mod console;
mod router;

use clap::Parser;
use scrape_core::LoggingConfig;
use scrape_core::config::load_config;
use tracing_subscriber::EnvFilter;

use crate::args::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    init_logging(&config.logging, cli.verbose);

    router::route(cli, config).await
}

fn init_logging(logging: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if logging.is_json() {
        builder.json().init();
    } else {
        builder.init();
    }
}
