//! CLI argument definitions using clap
//!
//! - scrape add                 # Interactive setup of a new scrape sensor
//! - scrape options <entry>     # Reconfigure an existing entry
//! - scrape list                # List stored entries
//! - scrape show [entry]        # Fetch and print sensor states
//! - scrape remove <entry>      # Delete an entry

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use scrape_core::{ConnectionParameters, EntityInput, HttpMethod};

#[derive(Parser)]
#[command(name = "scrape")]
#[command(about = "Configure and read CSS-selector scrape sensors")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (JSON or TOML)
    #[arg(long, global = true, env = "SCRAPE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Entry store file, overrides the configured location
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up a new scrape sensor
    Add {
        #[command(flatten)]
        connection: ConnectionArgs,

        #[command(flatten)]
        sensor: SensorArgs,

        /// Fail instead of prompting for missing or rejected values
        #[arg(long)]
        non_interactive: bool,
    },

    /// Reconfigure an existing entry in place
    Options {
        /// Entry id, as printed by `scrape list`
        entry_id: String,

        /// Position of the sensor to edit
        #[arg(long, default_value_t = 0)]
        sensor_index: usize,

        #[command(flatten)]
        connection: ConnectionArgs,

        #[command(flatten)]
        sensor: SensorArgs,

        /// Fail instead of prompting for missing or rejected values
        #[arg(long)]
        non_interactive: bool,
    },

    /// List stored entries
    List {
        /// Print entries as JSON (passwords redacted)
        #[arg(long)]
        json: bool,
    },

    /// Fetch resources and print sensor states
    Show {
        /// Only refresh this entry
        entry_id: Option<String>,

        /// Print states as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete an entry
    Remove {
        entry_id: String,
    },
}

/// Connection step values given on the command line
#[derive(Args, Clone, Debug, Default)]
pub struct ConnectionArgs {
    /// Resource URL
    #[arg(long)]
    pub resource: Option<String>,

    /// HTTP method (GET or POST)
    #[arg(long)]
    pub method: Option<HttpMethod>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<f64>,

    /// Do not verify TLS certificates
    #[arg(long)]
    pub insecure: bool,

    #[arg(long)]
    pub username: Option<String>,

    #[arg(long)]
    pub password: Option<String>,

    /// Extra request header, KEY=VALUE (repeatable)
    #[arg(long = "header", value_name = "KEY=VALUE")]
    pub headers: Vec<String>,

    /// Request body
    #[arg(long)]
    pub payload: Option<String>,
}

impl ConnectionArgs {
    /// Merge the flags over `base`
    pub fn apply_to(&self, mut base: ConnectionParameters) -> anyhow::Result<ConnectionParameters> {
        if let Some(resource) = &self.resource {
            base.resource = resource.clone();
        }
        if let Some(method) = self.method {
            base.method = method;
        }
        if let Some(timeout) = self.timeout {
            base.timeout = timeout;
        }
        if self.insecure {
            base.verify_ssl = false;
        }
        if let Some(username) = &self.username {
            base.username = Some(username.clone());
        }
        if let Some(password) = &self.password {
            base.password = Some(password.clone());
        }
        if !self.headers.is_empty() {
            base.headers = parse_headers(&self.headers)?;
        }
        if let Some(payload) = &self.payload {
            base.payload = Some(payload.clone());
        }
        Ok(base)
    }
}

fn parse_headers(raw: &[String]) -> anyhow::Result<BTreeMap<String, String>> {
    let mut headers = BTreeMap::new();
    for item in raw {
        let (key, value) = item
            .split_once('=')
            .with_context(|| format!("Header '{}' is not KEY=VALUE", item))?;
        if key.trim().is_empty() {
            bail!("Header '{}' has an empty name", item);
        }
        headers.insert(key.trim().to_string(), value.trim().to_string());
    }
    Ok(headers)
}

/// Sensor step values given on the command line
#[derive(Args, Clone, Debug, Default)]
pub struct SensorArgs {
    /// Sensor name
    #[arg(long)]
    pub name: Option<String>,

    /// CSS selector
    #[arg(long)]
    pub select: Option<String>,

    /// Which selector match to read
    #[arg(long)]
    pub index: Option<i64>,

    /// Read this attribute instead of the element text
    #[arg(long)]
    pub attribute: Option<String>,

    #[arg(long)]
    pub unit: Option<String>,
}

impl SensorArgs {
    /// Merge the flags over `base`
    pub fn apply_to(&self, mut base: EntityInput) -> EntityInput {
        if let Some(name) = &self.name {
            base.name = name.clone();
        }
        if let Some(select) = &self.select {
            base.select = select.clone();
        }
        if let Some(index) = self.index {
            base.index = index;
        }
        if let Some(attribute) = &self.attribute {
            base.attribute = Some(attribute.clone());
        }
        if let Some(unit) = &self.unit {
            base.unit_of_measurement = Some(unit.clone());
        }
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add_flags() {
        let cli = Cli::parse_from([
            "scrape",
            "add",
            "--resource",
            "https://example.org",
            "--method",
            "post",
            "--insecure",
            "--header",
            "X-Token=abc",
            "--name",
            "Title",
            "--select",
            "h1",
            "--non-interactive",
        ]);

        let Commands::Add {
            connection,
            sensor,
            non_interactive,
        } = cli.command
        else {
            panic!("expected add command");
        };
        assert!(non_interactive);

        let params = connection
            .apply_to(ConnectionParameters::new(""))
            .unwrap();
        assert_eq!(params.resource, "https://example.org");
        assert_eq!(params.method, HttpMethod::Post);
        assert!(!params.verify_ssl);
        assert_eq!(params.headers["X-Token"], "abc");

        let input = sensor.apply_to(EntityInput::default());
        assert_eq!(input, EntityInput::new("Title", "h1", 0));
    }

    #[test]
    fn test_bad_header() {
        let args = ConnectionArgs {
            headers: vec!["no-equals".to_string()],
            ..Default::default()
        };
        assert!(args.apply_to(ConnectionParameters::new("https://example.org")).is_err());
    }

    #[test]
    fn test_options_defaults() {
        let cli = Cli::parse_from(["scrape", "options", "abc"]);
        match cli.command {
            Commands::Options {
                entry_id,
                sensor_index,
                ..
            } => {
                assert_eq!(entry_id, "abc");
                assert_eq!(sensor_index, 0);
            }
            _ => panic!("expected options command"),
        }
    }
}
