//! Load command - resolve resources and drive them to completion

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::info;

use skein_tasks::{Event, Orchestrator, TaskId, TaskInfo, TaskState};

use super::{build_group, print_tasks, workspace_orchestrator};
use crate::cli::{output, Cli, OutputFormat};
use crate::environment::FsEnvironment;

/// Load resources in order (or in parallel) and wait for them
#[derive(Debug, Args)]
pub struct LoadCommand {
    /// Resources to load (paths, `css:` / `js:` / `polyfill:` specifiers)
    #[arg(required = true)]
    pub specs: Vec<String>,

    /// Load without ordering between the resources
    #[arg(long)]
    pub parallel: bool,

    /// Give up after this many seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Treat a feature as natively supported (can be repeated)
    #[arg(long = "feature", value_name = "FEATURE")]
    pub features: Vec<String>,
}

/// Ways a load can end without success
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{failed} of {total} tasks failed")]
    Failed { failed: usize, total: usize },

    #[error("timed out after {0}s waiting for {1}")]
    TimedOut(u64, TaskId),
}

#[derive(Debug, Serialize)]
struct LoadSummary<'a> {
    root: TaskId,
    state: TaskState,
    elapsed_ms: u128,
    tasks: &'a [TaskInfo],
}

impl LoadCommand {
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let cwd = std::env::current_dir()?;
        runtime.block_on(self.load_in(cli, &cwd))
    }

    /// Load against the workspace rooted at `dir`
    async fn load_in(&self, cli: &Cli, dir: &Path) -> anyhow::Result<()> {
        info!(specs = ?self.specs, parallel = self.parallel, "executing load command");
        let started = Instant::now();

        let environment = Arc::new(FsEnvironment::new()?);
        for feature in &self.features {
            environment.features().set(feature.as_str(), true);
        }
        let orchestrator = workspace_orchestrator(dir, environment)?;

        let group = build_group(&orchestrator, &self.specs, self.parallel)?;
        let finished = settled(&orchestrator, group.id)?;
        let root = orchestrator.start(group)?;

        let state = match tokio::time::timeout(Duration::from_secs(self.timeout), finished).await {
            Ok(Ok(state)) => state,
            Ok(Err(_)) => TaskState::Failed,
            Err(_) => orchestrator.state(root).unwrap_or(TaskState::Failed),
        };

        let tasks = orchestrator.tasks();
        self.report(cli, root, state, started.elapsed(), &tasks)?;

        match state {
            TaskState::Succeeded => Ok(()),
            TaskState::Failed => Err(LoadError::Failed {
                failed: tasks.iter().filter(|t| t.state == TaskState::Failed).count(),
                total: tasks.len(),
            }
            .into()),
            _ => Err(LoadError::TimedOut(self.timeout, root).into()),
        }
    }

    fn report(
        &self,
        cli: &Cli,
        root: TaskId,
        state: TaskState,
        elapsed: Duration,
        tasks: &[TaskInfo],
    ) -> anyhow::Result<()> {
        if cli.format == OutputFormat::Json {
            let summary = LoadSummary {
                root,
                state,
                elapsed_ms: elapsed.as_millis(),
                tasks,
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
            return Ok(());
        }

        if cli.quiet {
            return Ok(());
        }

        if cli.verbose || state != TaskState::Succeeded {
            println!("{}", output::header("Tasks:"));
            print_tasks(tasks);
            println!();
        }

        let resources = tasks.iter().filter(|t| !t.kind.is_group()).count();
        let message = format!(
            "{} resource{} in {:.2}s",
            resources,
            if resources == 1 { "" } else { "s" },
            elapsed.as_secs_f64()
        );
        match state {
            TaskState::Succeeded => output::success(&format!("Loaded {}", message)),
            TaskState::Failed => output::error(&format!("Failed loading {}", message)),
            _ => output::warning(&format!(
                "Root {} still {} after {}s",
                root,
                style(state).yellow(),
                self.timeout
            )),
        }
        Ok(())
    }
}

/// Receiver for the terminal state of `root`
fn settled(
    orchestrator: &Orchestrator,
    root: TaskId,
) -> skein_tasks::Result<oneshot::Receiver<TaskState>> {
    let (tx, rx) = oneshot::channel();
    let tx = Arc::new(Mutex::new(Some(tx)));

    for event in [Event::Success, Event::Error] {
        let tx = tx.clone();
        orchestrator.once(root, event, move |info| {
            if let Some(tx) = tx.lock().unwrap_or_else(PoisonError::into_inner).take() {
                let _ = tx.send(info.state);
            }
        })?;
    }
    Ok(rx)
}
