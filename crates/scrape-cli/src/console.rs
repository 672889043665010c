//! CLI console utilities

use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use scrape_core::FlowResult;

/// CLI console for formatted output
pub struct CliConsole {
    verbose: bool,
}

impl CliConsole {
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Print an info message (verbose only)
    pub fn info(&self, message: &str) {
        if self.verbose {
            println!("{} {}", "ℹ".blue().bold(), message);
        }
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", "✓".green().bold(), message.green());
    }

    pub fn warn(&self, message: &str) {
        println!("{} {}", "⚠".yellow().bold(), message.yellow());
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red().bold(), message.red());
    }

    pub fn print_header(&self, title: &str) {
        println!();
        println!("{}", title.bold().underline());
        println!("{}", "=".repeat(title.len()).dimmed());
    }

    /// Print a `label: value` line
    pub fn field(&self, label: &str, value: &str) {
        println!("  {} {}", format!("{}:", label).dimmed(), value);
    }

    /// Print the errors of a redisplayed form
    pub fn form_errors(&self, result: &FlowResult) {
        for (field, code) in &result.errors {
            self.error(&format!("{}: {}", field, describe_error(code)));
        }
    }
}

/// Human readable text for a form error code
pub fn describe_error(code: &str) -> &'static str {
    match code {
        "resource_error" => "the resource could not be fetched",
        "invalid_url" => "not a valid http(s) URL",
        "invalid_timeout" => "timeout must be more than 0 and at most 3600 seconds",
        "username_required" => "a password needs a username",
        "name_required" => "a sensor name is required",
        "name_exists" => "another sensor already uses this name",
        "select_required" => "a CSS selector is required",
        "invalid_selector" => "not a valid CSS selector",
        "invalid_index" => "index must be zero or a positive number",
        _ => "invalid value",
    }
}

/// Spinner shown while the resource is probed
pub struct ValidationSpinner {
    bar: ProgressBar,
}

impl ValidationSpinner {
    pub fn new(message: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.blue} {msg}")
        {
            bar.set_style(style);
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    pub fn finish_success(&self, message: &str) {
        self.bar.finish_with_message(format!("{} {}", "✓".green(), message));
    }

    pub fn finish_error(&self, message: &str) {
        self.bar.finish_with_message(format!("{} {}", "✗".red(), message));
    }
}
