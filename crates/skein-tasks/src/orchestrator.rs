//! Public entry point
//!
//! An [`Orchestrator`] owns one task graph, its loader plugins and its
//! configuration. It is cheap to clone; clones share the same graph.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use skein_core::config::validate_config;
use skein_core::Config;
use url::Url;

use crate::bus::{Event, Subscription};
use crate::error::Result;
use crate::group::GroupHandle;
use crate::host::{ExecutionContext, NoExecutionContext};
use crate::loader::Loader;
use crate::loaders::{register_defaults, Environment};
use crate::reporter::TaskReporter;
use crate::scheduler::Scheduler;
use crate::specifier::Specifier;
use crate::task::{TaskId, TaskInfo, TaskState};

/// Dependency-aware resource orchestrator
#[derive(Clone)]
pub struct Orchestrator {
    scheduler: Arc<Scheduler>,
}

impl Orchestrator {
    /// Orchestrator with only the built-in callable loader
    pub fn new(location: Url, config: Config, context: Arc<dyn ExecutionContext>) -> Self {
        Self {
            scheduler: Arc::new(Scheduler::new(location, config, context)),
        }
    }

    /// Orchestrator with default configuration and no execution context
    pub fn standalone(location: Url) -> Self {
        Self::new(location, Config::default(), Arc::new(NoExecutionContext))
    }

    /// Orchestrator with the `js`, `polyfill` and `css` loaders wired to
    /// `environment`, which also serves as the execution context
    pub fn with_defaults<E>(location: Url, config: Config, environment: Arc<E>) -> Self
    where
        E: Environment + ExecutionContext + 'static,
    {
        let orchestrator = Self::new(location, config, environment.clone());
        register_defaults(&orchestrator, environment);
        orchestrator
    }

    pub(crate) fn from_scheduler(scheduler: Arc<Scheduler>) -> Self {
        Self { scheduler }
    }

    /// Add a loader plugin; `false` if its name is reserved or taken
    pub fn register<L: Loader + 'static>(&self, loader: L) -> bool {
        self.scheduler.register(Arc::new(loader))
    }

    /// Loader names in the order they are asked to resolve
    pub fn loaders(&self) -> Vec<String> {
        self.scheduler.loaders().names()
    }

    /// Build a series group without starting it
    pub fn series<I, S>(&self, specifiers: I) -> Result<GroupHandle>
    where
        I: IntoIterator<Item = S>,
        S: Into<Specifier>,
    {
        self.scheduler.series(collect(specifiers))
    }

    /// Build a parallel group without starting it
    pub fn parallel<I, S>(&self, specifiers: I) -> Result<GroupHandle>
    where
        I: IntoIterator<Item = S>,
        S: Into<Specifier>,
    {
        self.scheduler.parallel(collect(specifiers))
    }

    /// Build a series and run it, nested under the loading task that issued
    /// the call if there is one
    pub fn load<I, S>(&self, specifiers: I) -> Result<GroupHandle>
    where
        I: IntoIterator<Item = S>,
        S: Into<Specifier>,
    {
        self.scheduler.load(collect(specifiers))
    }

    /// Start a group or task built earlier as a root
    pub fn start(&self, target: impl Into<Specifier>) -> Result<TaskId> {
        let id = self.scheduler.find_or_create(target.into())?;
        self.scheduler.start(id);
        Ok(id)
    }

    /// Resolve a single specifier to its task
    pub fn find_or_create(&self, specifier: impl Into<Specifier>) -> Result<TaskId> {
        self.scheduler.find_or_create(specifier.into())
    }

    /// Call `listener` every time `target` emits `event`
    pub fn on<F>(&self, target: impl Into<TaskId>, event: Event, listener: F) -> Result<()>
    where
        F: Fn(&TaskInfo) + Send + Sync + 'static,
    {
        self.scheduler
            .listen(target.into(), event, Arc::new(listener), Subscription::Persistent)
    }

    /// Call `listener` the next time `target` emits `event`.
    ///
    /// A task that already succeeded (or failed) calls a success (or error)
    /// listener immediately.
    pub fn once<F>(&self, target: impl Into<TaskId>, event: Event, listener: F) -> Result<()>
    where
        F: Fn(&TaskInfo) + Send + Sync + 'static,
    {
        self.scheduler
            .listen(target.into(), event, Arc::new(listener), Subscription::Once)
    }

    pub fn state(&self, id: TaskId) -> Option<TaskState> {
        self.scheduler.info(id).map(|info| info.state)
    }

    pub fn task(&self, id: TaskId) -> Option<TaskInfo> {
        self.scheduler.info(id)
    }

    /// Every task in creation order
    pub fn tasks(&self) -> Vec<TaskInfo> {
        self.scheduler.tasks().iter().map(|task| task.info()).collect()
    }

    /// Snapshot of the configuration
    pub fn config(&self) -> Config {
        self.scheduler.config().clone()
    }

    pub fn config_get(&self, key: &str) -> Option<Value> {
        self.scheduler.config().get(key)
    }

    /// Assign one configuration key; the change applies to later resolutions
    pub fn config_set(&self, key: &str, value: Value) -> skein_core::Result<()> {
        let mut next = self.config();
        next.set(key, value)?;
        validate_config(&next)?;
        *self.scheduler.config_mut() = next;
        Ok(())
    }

    /// Assign every key of an object at once
    pub fn configure(&self, values: serde_json::Map<String, Value>) -> skein_core::Result<()> {
        let mut next = self.config();
        next.merge(values)?;
        validate_config(&next)?;
        *self.scheduler.config_mut() = next;
        Ok(())
    }

    /// Observe graph changes
    pub fn add_reporter(&self, reporter: Arc<dyn TaskReporter>) {
        self.scheduler.add_reporter(reporter);
    }

    /// Working location specifiers resolve against
    pub fn location(&self) -> &Url {
        self.scheduler.location()
    }
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("location", &self.location().as_str())
            .field("tasks", &self.scheduler.tasks().len())
            .finish()
    }
}

impl From<GroupHandle> for TaskId {
    fn from(handle: GroupHandle) -> Self {
        handle.id
    }
}

fn collect<I, S>(specifiers: I) -> Vec<Specifier>
where
    I: IntoIterator<Item = S>,
    S: Into<Specifier>,
{
    specifiers.into_iter().map(Into::into).collect()
}
