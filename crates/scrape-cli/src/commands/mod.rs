//! CLI command implementations

pub mod add;
pub mod list;
pub mod options;
pub mod prompts;
pub mod remove;
pub mod show;

use std::sync::Arc;

use scrape_core::{HttpFetcher, JsonFileEntryStore, ResourceValidator};

use crate::console::CliConsole;

/// Shared handles every command works with
pub struct CommandContext {
    pub store: Arc<JsonFileEntryStore>,
    pub fetcher: Arc<HttpFetcher>,
    pub verbose: bool,
}

impl CommandContext {
    pub fn validator(&self) -> ResourceValidator {
        ResourceValidator::new(self.fetcher.clone())
    }

    pub fn console(&self) -> CliConsole {
        CliConsole::new(self.verbose)
    }
}
