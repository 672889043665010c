//! `scrape list`

use anyhow::Result;
use colored::*;
use scrape_core::{ConfigEntry, EntryStore};

use super::CommandContext;

const REDACTED: &str = "********";

pub fn run(ctx: &CommandContext, json: bool) -> Result<()> {
    let entries = ctx.store.entries();

    if json {
        let redacted: Vec<_> = entries.into_iter().map(redact).collect();
        println!("{}", serde_json::to_string_pretty(&redacted)?);
        return Ok(());
    }

    let console = ctx.console();
    if entries.is_empty() {
        console.warn("No entries configured. Run `scrape add` to create one.");
        return Ok(());
    }

    console.print_header(&format!("{} entr{}", entries.len(), if entries.len() == 1 { "y" } else { "ies" }));
    for entry in &entries {
        println!();
        println!("{} {}", entry.title.bold(), entry.entry_id.dimmed());
        let conn = &entry.options.connection;
        console.field("Method", conn.method.as_str());
        console.field("Timeout", &format!("{}s", conn.timeout));
        if !conn.verify_ssl {
            console.field("Verify SSL", "no");
        }
        if let Some(username) = &conn.username {
            console.field("Username", username);
        }
        for def in &entry.options.entities {
            println!(
                "  {} {} {} [{}]",
                "•".dimmed(),
                def.name.cyan(),
                def.select,
                def.index
            );
        }
    }
    Ok(())
}

fn redact(mut entry: ConfigEntry) -> ConfigEntry {
    if entry.options.connection.password.is_some() {
        entry.options.connection.password = Some(REDACTED.to_string());
    }
    entry
}
