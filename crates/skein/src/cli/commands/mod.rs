//! CLI commands

mod completions;
mod config;
mod load;
mod plan;
mod plugins;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use skein_core::config::load_config_or_default;
use skein_core::Config;
use skein_tasks::{GroupHandle, Orchestrator, TaskInfo};
use url::Url;

use crate::environment::FsEnvironment;

pub use completions::CompletionsCommand;
pub use config::ConfigCommand;
pub use load::{LoadCommand, LoadError};
pub use plan::PlanCommand;
pub use plugins::PluginsCommand;

/// Configuration for `dir` and where it came from
fn workspace_config(dir: &Path) -> anyhow::Result<(Url, Config, Option<PathBuf>)> {
    let (config, path) = load_config_or_default(dir)?;
    let location = Url::from_directory_path(dir)
        .map_err(|_| anyhow::anyhow!("{} cannot be used as a location", dir.display()))?;
    Ok((location, config, path))
}

/// Orchestrator with the default loaders over `dir`
fn workspace_orchestrator(
    dir: &Path,
    environment: Arc<FsEnvironment>,
) -> anyhow::Result<Orchestrator> {
    let (location, config, path) = workspace_config(dir)?;
    if let Some(path) = path {
        tracing::debug!("Using configuration from {}", path.display());
    }
    Ok(Orchestrator::with_defaults(location, config, environment))
}

/// Root group over the command-line specifiers, built but not started
fn build_group(
    orchestrator: &Orchestrator,
    specs: &[String],
    parallel: bool,
) -> skein_tasks::Result<GroupHandle> {
    if parallel {
        orchestrator.parallel(specs)
    } else {
        orchestrator.series(specs)
    }
}

/// One line per task: status mark, id, kind and source
fn print_tasks(tasks: &[TaskInfo]) {
    for task in tasks {
        println!(
            "  {} {:>4} {:<9} {}",
            crate::cli::output::state_mark(task.state),
            task.id.to_string(),
            task.kind.to_string(),
            crate::cli::output::path_style().apply_to(&task.source)
        );
    }
}
