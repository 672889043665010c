//! `scrape remove`

use anyhow::Result;
use scrape_core::{EntryHandle, EntryStore};

use super::CommandContext;

pub fn run(ctx: &CommandContext, entry_id: &str) -> Result<()> {
    let removed = ctx.store.remove_entry(&EntryHandle::new(entry_id))?;
    ctx.console()
        .success(&format!("Removed {} ({})", removed.entry_id, removed.title));
    Ok(())
}
