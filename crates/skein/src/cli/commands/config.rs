//! Config command - inspect and try out configuration values

use clap::Args;
use console::style;
use serde_json::Value;
use tracing::info;

use skein_core::config::init_config;
use skein_core::Config;
use skein_tasks::{NoExecutionContext, Orchestrator};

use super::workspace_config;
use crate::cli::{output, Cli, OutputFormat};

/// Show the effective configuration, or check a new value for a key
#[derive(Debug, Args)]
pub struct ConfigCommand {
    /// Key to show or assign (`min`, `base`, `paths`, or any custom key)
    pub key: Option<String>,

    /// Value to assign; parsed as JSON, otherwise taken as a string
    #[arg(requires = "key")]
    pub value: Option<String>,

    /// Write a default `skein.toml` into the working directory
    #[arg(long, conflicts_with = "key")]
    pub init: bool,

    /// Overwrite an existing `skein.toml` (with `--init`)
    #[arg(long, requires = "init")]
    pub force: bool,
}

impl ConfigCommand {
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(key = ?self.key, init = self.init, "executing config command");
        if self.init {
            let path = init_config(&std::env::current_dir()?, self.force)?;
            if !cli.quiet {
                output::success(&format!("Wrote {}", path.display()));
            }
            return Ok(());
        }

        let (location, config, path) = workspace_config(&std::env::current_dir()?)?;

        let config = match (&self.key, &self.value) {
            (Some(key), Some(raw)) => {
                let orchestrator =
                    Orchestrator::new(location, config, std::sync::Arc::new(NoExecutionContext));
                orchestrator.config_set(key, parse_value(raw))?;
                orchestrator.config()
            }
            _ => config,
        };

        match &self.key {
            Some(key) => self.show_key(cli, &config, key),
            None => {
                match cli.format {
                    OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
                    OutputFormat::Text => {
                        if !cli.quiet {
                            match &path {
                                Some(path) => println!(
                                    "{}",
                                    output::header(&format!("Configuration from {}", path.display()))
                                ),
                                None => println!(
                                    "{} {}",
                                    output::header("Configuration"),
                                    style("(defaults)").yellow()
                                ),
                            }
                        }
                        print!("{}", toml::to_string_pretty(&config)?);
                    }
                }
                Ok(())
            }
        }
    }

    fn show_key(&self, cli: &Cli, config: &Config, key: &str) -> anyhow::Result<()> {
        let value = config.get(key).unwrap_or(Value::Null);
        match cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&value)?),
            OutputFormat::Text => {
                println!("{}", output::key_value(key, &value.to_string()));
                if self.value.is_some() && !cli.quiet {
                    output::success("Value accepted (not written to disk)");
                }
            }
        }
        Ok(())
    }
}

/// JSON when it parses, plain string otherwise
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
