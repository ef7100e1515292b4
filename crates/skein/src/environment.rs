//! Filesystem-backed environment for the command line
//!
//! Scripts are `file://` URLs. A script "runs" by being read; every line of
//! the form `// @load <specifier> <specifier>...` becomes a nested `load` call issued
//! while that script is the current resource. Stylesheets only need to
//! exist.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Context;
use tokio::runtime::Handle;
use tracing::{debug, error};
use url::Url;

use skein_tasks::{
    Completion, CurrentResource, Environment, ExecutionContext, FeatureDetectors, ResourceRef,
};

const DIRECTIVE: &str = "// @load";

/// Environment that reads scripts and stylesheets from disk
pub struct FsEnvironment {
    runtime: Handle,
    current: CurrentResource,
    features: FeatureDetectors,
    next_resource: AtomicU64,
}

impl FsEnvironment {
    /// Must be called from inside a tokio runtime
    pub fn new() -> anyhow::Result<Self> {
        let runtime = Handle::try_current().context("no tokio runtime for script loading")?;
        Ok(Self {
            runtime,
            current: CurrentResource::new(),
            features: FeatureDetectors::new(),
            next_resource: AtomicU64::new(1),
        })
    }

    /// Feature answers consulted by `polyfill:` resources
    pub fn features(&self) -> &FeatureDetectors {
        &self.features
    }
}

impl Environment for FsEnvironment {
    fn inject_script(&self, url: &Url, completion: Completion) -> ResourceRef {
        let resource = ResourceRef::new(self.next_resource.fetch_add(1, Ordering::SeqCst));
        debug!("Injecting {} as {}", url, resource);
        self.runtime.spawn(run_script(
            url.clone(),
            resource,
            self.current.clone(),
            completion,
        ));
        resource
    }

    fn inject_stylesheet(&self, url: &Url) -> anyhow::Result<()> {
        let path = file_path(url)?;
        if !path.is_file() {
            anyhow::bail!("stylesheet not found: {}", path.display());
        }
        Ok(())
    }

    fn supports(&self, feature: &str) -> bool {
        self.features.supports(feature)
    }
}

impl ExecutionContext for FsEnvironment {
    fn current_resource(&self) -> Option<ResourceRef> {
        self.current.get()
    }
}

async fn run_script(url: Url, resource: ResourceRef, current: CurrentResource, completion: Completion) {
    let source = match read_script(&url).await {
        Ok(source) => source,
        Err(err) => {
            error!("Failed to load {}: {:#}", url, err);
            completion.fail();
            return;
        }
    };

    let orchestrator = completion.orchestrator();
    let result = {
        let _running = current.enter(resource);
        directives(&source)
            .into_iter()
            .try_for_each(|specs| orchestrator.load(specs).map(|_| ()))
    };

    match result {
        Ok(()) => completion.succeed(),
        Err(err) => {
            error!("{}: {}", url, err);
            completion.fail();
        }
    }
}

async fn read_script(url: &Url) -> anyhow::Result<String> {
    let path = file_path(url)?;
    tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("reading {}", path.display()))
}

fn file_path(url: &Url) -> anyhow::Result<PathBuf> {
    url.to_file_path()
        .map_err(|_| anyhow::anyhow!("{} is not a local file", url))
}

/// Specifier lists from every `// @load` line
fn directives(source: &str) -> Vec<Vec<String>> {
    source
        .lines()
        .filter_map(|line| line.trim().strip_prefix(DIRECTIVE))
        .map(|rest| rest.split_whitespace().map(str::to_string).collect::<Vec<_>>())
        .filter(|specs| !specs.is_empty())
        .collect()
}
