//! Plan command - resolve specifiers without loading anything

use std::sync::Arc;

use clap::Args;
use tracing::info;

use super::{build_group, print_tasks, workspace_orchestrator};
use crate::cli::{output, Cli, OutputFormat};
use crate::environment::FsEnvironment;

/// Show the tasks a load would create
#[derive(Debug, Args)]
pub struct PlanCommand {
    /// Resources to plan
    #[arg(required = true)]
    pub specs: Vec<String>,

    /// Plan a parallel root instead of a series
    #[arg(long)]
    pub parallel: bool,
}

impl PlanCommand {
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(specs = ?self.specs, parallel = self.parallel, "executing plan command");

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let _enter = runtime.enter();

        let orchestrator = workspace_orchestrator(
            &std::env::current_dir()?,
            Arc::new(FsEnvironment::new()?),
        )?;
        let root = build_group(&orchestrator, &self.specs, self.parallel)?;
        let tasks = orchestrator.tasks();

        match cli.format {
            OutputFormat::Json => {
                let output = serde_json::json!({
                    "root": root,
                    "tasks": tasks,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    println!("{}", output::header(&format!("Plan for {} {}:", root.kind, root.id)));
                }
                print_tasks(&tasks);
            }
        }

        Ok(())
    }
}
