//! Plugins command

use std::sync::Arc;

use clap::Args;
use tracing::info;

use super::workspace_orchestrator;
use crate::cli::{output, Cli, OutputFormat};
use crate::environment::FsEnvironment;

/// List loader plugins in resolution order
#[derive(Debug, Args)]
pub struct PluginsCommand {}

impl PluginsCommand {
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!("executing plugins command");

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let _enter = runtime.enter();

        let orchestrator = workspace_orchestrator(
            &std::env::current_dir()?,
            Arc::new(FsEnvironment::new()?),
        )?;
        let names = orchestrator.loaders();

        match cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&names)?),
            OutputFormat::Text => {
                if !cli.quiet {
                    println!("{}", output::header("Loaders (first match wins):"));
                }
                for (position, name) in names.iter().enumerate() {
                    println!("  {}. {}", position + 1, name);
                }
            }
        }

        Ok(())
    }
}
