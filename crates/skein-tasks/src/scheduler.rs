//! Task graph engine
//!
//! Every change follows the same shape: lock the registry, apply one state
//! transition, take the snapshot of callbacks that transition fired, unlock,
//! then report and run the snapshot. Nothing user-supplied (loaders,
//! listeners, reporters) ever runs while a lock is held, so any of them may
//! call straight back into the engine.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use skein_core::Config;
use tracing::{debug, error, instrument, warn};
use url::Url;

use crate::bus::{Event, Subscription};
use crate::error::{Result, TaskError};
use crate::host::{ExecutionContext, ResourceRef};
use crate::loader::{Loader, LoaderRegistry, Signal, TaskAgent};
use crate::location::UrlHelper;
use crate::registry::TaskRegistry;
use crate::reporter::{TaskEvent, TaskReporter, TaskReporterRegistry};
use crate::specifier::Specifier;
use crate::task::{Callback, Listener, Source, Task, TaskId, TaskInfo, TaskKind, TaskState, Transition};

/// Shared state behind an orchestrator
pub(crate) struct Scheduler {
    tasks: Mutex<TaskRegistry>,
    loaders: RwLock<LoaderRegistry>,
    config: RwLock<Config>,
    location: Url,
    context: Arc<dyn ExecutionContext>,
    reporters: RwLock<TaskReporterRegistry>,
}

impl Scheduler {
    pub fn new(location: Url, config: Config, context: Arc<dyn ExecutionContext>) -> Self {
        Self {
            tasks: Mutex::new(TaskRegistry::new()),
            loaders: RwLock::new(LoaderRegistry::new()),
            config: RwLock::new(config),
            location,
            context,
            reporters: RwLock::new(TaskReporterRegistry::new()),
        }
    }

    pub(crate) fn tasks(&self) -> MutexGuard<'_, TaskRegistry> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn loaders(&self) -> RwLockReadGuard<'_, LoaderRegistry> {
        self.loaders.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn config(&self) -> RwLockReadGuard<'_, Config> {
        self.config.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn config_mut(&self) -> RwLockWriteGuard<'_, Config> {
        self.config.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn location(&self) -> &Url {
        &self.location
    }

    pub(crate) fn context(&self) -> &dyn ExecutionContext {
        self.context.as_ref()
    }

    pub(crate) fn add_reporter(&self, reporter: Arc<dyn TaskReporter>) {
        self.reporters
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .register(reporter);
    }

    pub(crate) fn report(&self, event: TaskEvent) {
        let reporters = self
            .reporters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .all()
            .to_vec();
        for reporter in reporters {
            reporter.report(&event);
        }
    }

    /// Add a loader plugin
    pub fn register(&self, loader: Arc<dyn Loader>) -> bool {
        let name = loader.name().to_string();
        let accepted = self
            .loaders
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .register(loader);
        if accepted {
            self.report(TaskEvent::LoaderRegistered { name });
        } else {
            self.report(TaskEvent::LoaderRejected { name });
        }
        accepted
    }

    /// URL helper for the current configuration
    pub fn url_helper(&self) -> Result<UrlHelper> {
        UrlHelper::new(&self.location, &self.config())
    }

    pub fn info(&self, id: TaskId) -> Option<TaskInfo> {
        self.tasks().get(id).map(Task::info)
    }

    pub fn create(&self, source: Source, kind: TaskKind) -> TaskId {
        let id = self.tasks().create(source.clone(), kind.clone());
        self.report(TaskEvent::Created {
            id,
            kind,
            source: source.describe(),
        });
        id
    }

    /// Resolve a specifier to a task, creating one when needed.
    ///
    /// Strings go through the loader chain; the first loader to claim one
    /// decides its kind and canonical key. Callables always belong to the
    /// callable loader. A task already cached under that kind and key is
    /// reused.
    #[instrument(skip_all, fields(specifier = %specifier.describe()))]
    pub fn find_or_create(self: &Arc<Self>, specifier: Specifier) -> Result<TaskId> {
        match specifier {
            Specifier::Task(id) => self.existing(id),
            Specifier::Group(handle) => self.existing(handle.id),
            Specifier::List(items) => Ok(self.parallel(items)?.id),
            primitive => {
                let claimed = match primitive {
                    Specifier::Callable(_) => self.loaders().resolve_callable(&primitive),
                    _ => {
                        let urls = self.url_helper()?;
                        self.loaders().resolve(&primitive, &urls)
                    }
                };
                let (loader, resolved) =
                    claimed.ok_or_else(|| TaskError::Unresolved(primitive.describe()))?;
                let kind = TaskKind::Plugin(loader.name().to_string());

                let id = {
                    let mut tasks = self.tasks();
                    if let Some(id) = resolved
                        .key
                        .as_deref()
                        .and_then(|key| tasks.lookup(kind.name(), key))
                    {
                        debug!("Reusing {} for {}", id, primitive.describe());
                        return Ok(id);
                    }
                    let id = tasks.create(resolved.source.clone(), kind.clone());
                    if let Some(key) = resolved.key.as_deref() {
                        tasks.remember(key, id);
                    }
                    id
                };

                self.report(TaskEvent::Created {
                    id,
                    kind,
                    source: resolved.source.describe(),
                });
                Ok(id)
            }
        }
    }

    fn existing(&self, id: TaskId) -> Result<TaskId> {
        if self.tasks().contains(id) {
            Ok(id)
        } else {
            Err(TaskError::UnknownTask(id))
        }
    }

    /// Dormant -> Waiting, then on as far as the graph allows
    pub fn start(self: &Arc<Self>, id: TaskId) {
        self.step(id, Task::enter_waiting);
    }

    /// Make `task` wait for `dependency` to succeed.
    ///
    /// Ignored once `task` has started. A dependency that already failed
    /// leaves `task` pending for good.
    pub fn add_dependence(&self, task: TaskId, dependency: TaskId) -> bool {
        if task == dependency {
            debug!("Ignoring self-dependence of {}", task);
            return false;
        }

        let mut tasks = self.tasks();
        let dependency_state = match tasks.get(dependency) {
            Some(dep) => dep.state,
            None => return false,
        };
        match tasks.get_mut(task) {
            Some(dependent) if dependent.accepts_dependence() => {
                if dependency_state != TaskState::Succeeded {
                    dependent.pending += 1;
                }
            }
            _ => return false,
        }
        if !dependency_state.is_terminal() {
            if let Some(dep) = tasks.get_mut(dependency) {
                dep.events.one(Event::Success, Callback::ReleaseDependent(task));
            }
        }
        true
    }

    /// Attach `child` as a branch of `parent`.
    ///
    /// Refused once `parent` has finished its own load. A child attached to
    /// a parent that is already loading starts right away.
    pub fn add_branch(self: &Arc<Self>, parent: TaskId, child: TaskId) -> bool {
        enum Settled {
            Pending,
            Succeeded,
            Failed,
        }

        let (parent_state, settled) = {
            let mut tasks = self.tasks();
            let child_state = match tasks.get(child) {
                Some(task) => task.state,
                None => return false,
            };
            let (parent_state, accepts) = match tasks.get(parent) {
                Some(task) => (task.state, task.accepts_branch()),
                None => return false,
            };
            if !accepts {
                drop(tasks);
                self.report(TaskEvent::BranchRejected { parent, child });
                return false;
            }
            if let Some(task) = tasks.get_mut(parent) {
                task.branches.push(child);
            }

            let settled = match child_state {
                TaskState::Succeeded => Settled::Succeeded,
                TaskState::Failed => Settled::Failed,
                _ => {
                    if let Some(task) = tasks.get_mut(child) {
                        task.events.one(Event::Success, Callback::DetachBranch(parent));
                        task.events.one(Event::Error, Callback::FailParent(parent));
                    }
                    Settled::Pending
                }
            };
            (parent_state, settled)
        };

        match settled {
            Settled::Succeeded => self.detach_branch(parent, child),
            Settled::Failed => self.fail(parent),
            Settled::Pending => {
                if parent_state == TaskState::Loading {
                    self.start(child);
                }
            }
        }
        true
    }

    /// Record the resource a loader is working with
    pub fn bind(&self, id: TaskId, resource: ResourceRef) {
        if let Some(task) = self.tasks().get_mut(id) {
            task.resource = Some(resource);
        }
    }

    /// Progress reported by a loader
    pub fn signal(self: &Arc<Self>, id: TaskId, signal: Signal) {
        match signal {
            Signal::Loading => self.step(id, Task::enter_loading),
            Signal::Load => {
                // a loader that finishes before announcing the start
                self.step(id, Task::enter_loading);
                self.step(id, Task::enter_loaded);
            }
            Signal::Error => self.fail(id),
        }
    }

    pub fn fail(self: &Arc<Self>, id: TaskId) {
        self.step(id, Task::enter_failed);
    }

    /// Subscribe a user listener.
    ///
    /// Listening for the terminal event of a task that already reached it
    /// calls the listener straight away; a persistent listener is then kept
    /// as well.
    pub fn listen(
        &self,
        id: TaskId,
        event: Event,
        listener: Listener,
        subscription: Subscription,
    ) -> Result<()> {
        let (info, fire_now) = {
            let mut tasks = self.tasks();
            let task = tasks.get_mut(id).ok_or(TaskError::UnknownTask(id))?;
            let fire_now = matches!(
                (event, task.state),
                (Event::Success, TaskState::Succeeded) | (Event::Error, TaskState::Failed)
            );
            if !fire_now || subscription == Subscription::Persistent {
                task.events
                    .subscribe(event, Callback::Listener(listener.clone()), subscription);
            }
            (task.info(), fire_now)
        };

        if fire_now {
            listener(&info);
        }
        Ok(())
    }

    fn release_dependent(self: &Arc<Self>, id: TaskId) {
        self.step(id, |task| {
            task.pending -= 1;
            task.enter_ready()
        });
    }

    fn detach_branch(self: &Arc<Self>, parent: TaskId, child: TaskId) {
        self.step(parent, |task| {
            task.detach_branch(child);
            task.enter_succeeded()
        });
    }

    /// Run the task's own load logic
    fn exec(self: &Arc<Self>, id: TaskId) {
        let Some((kind, source)) = self
            .tasks()
            .get(id)
            .map(|task| (task.kind.clone(), task.source.clone()))
        else {
            return;
        };

        match kind {
            TaskKind::Series | TaskKind::Parallel => {
                self.signal(id, Signal::Loading);
                self.signal(id, Signal::Load);
            }
            TaskKind::Plugin(name) => {
                let loader = self.loaders().get(&name);
                match loader {
                    Some(loader) => loader.load(TaskAgent::new(id, source, self.clone())),
                    None => {
                        error!("No loader named '{}' for {}", name, id);
                        self.fail(id);
                    }
                }
            }
        }
    }

    /// Apply one transition to `id` and follow it through
    fn step<F>(self: &Arc<Self>, id: TaskId, transition: F)
    where
        F: FnOnce(&mut Task) -> Option<Transition>,
    {
        let outcome = {
            let mut tasks = self.tasks();
            let Some(task) = tasks.get_mut(id) else {
                warn!("Transition requested for unknown task {}", id);
                return;
            };
            transition(task).map(|change| (change, task.info()))
        };

        if let Some((change, info)) = outcome {
            self.follow(info, change);
        }
    }

    fn follow(self: &Arc<Self>, info: TaskInfo, change: Transition) {
        let id = info.id;
        self.report(TaskEvent::Transition {
            id,
            from: change.from,
            to: change.to,
        });

        for callback in change.callbacks {
            match callback {
                Callback::ReleaseDependent(dependent) => self.release_dependent(dependent),
                Callback::DetachBranch(parent) => self.detach_branch(parent, id),
                Callback::FailParent(parent) => self.fail(parent),
                Callback::Listener(listener) => listener(&info),
            }
        }

        match change.to {
            TaskState::Waiting => self.step(id, Task::enter_ready),
            TaskState::Ready => self.exec(id),
            TaskState::Loading => {
                for branch in change.branches {
                    self.start(branch);
                }
            }
            TaskState::Loaded => self.step(id, Task::enter_succeeded),
            TaskState::Dormant | TaskState::Succeeded | TaskState::Failed => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::NoExecutionContext;
    use crate::reporter::CollectingReporter;

    fn scheduler() -> (Arc<Scheduler>, Arc<CollectingReporter>) {
        let location = Url::parse("http://example.com/").unwrap();
        let scheduler = Arc::new(Scheduler::new(
            location,
            Config::default(),
            Arc::new(NoExecutionContext),
        ));
        let reporter = Arc::new(CollectingReporter::default());
        scheduler.add_reporter(reporter.clone());
        (scheduler, reporter)
    }

    /// Plugin task whose loader is never found, so it stays where it is put
    fn manual(scheduler: &Scheduler) -> TaskId {
        scheduler.create(Source::None, TaskKind::Plugin("manual".into()))
    }

    fn state(scheduler: &Scheduler, id: TaskId) -> TaskState {
        scheduler.info(id).unwrap().state
    }

    fn set_state(scheduler: &Scheduler, id: TaskId, state: TaskState) {
        scheduler.tasks().get_mut(id).unwrap().state = state;
    }

    #[test]
    fn test_container_runs_to_success() {
        let (scheduler, reporter) = scheduler();
        let id = scheduler.create(Source::None, TaskKind::Parallel);
        scheduler.start(id);

        assert_eq!(state(&scheduler, id), TaskState::Succeeded);
        assert_eq!(
            reporter.states_of(id),
            vec![
                TaskState::Waiting,
                TaskState::Ready,
                TaskState::Loading,
                TaskState::Loaded,
                TaskState::Succeeded,
            ]
        );
    }

    #[test]
    fn test_callables_resolve_without_usable_location() {
        let scheduler = Arc::new(Scheduler::new(
            Url::parse("data:text/plain,skein").unwrap(),
            Config::default(),
            Arc::new(NoExecutionContext),
        ));

        let id = scheduler
            .find_or_create(Specifier::callable(|_| Ok(())))
            .unwrap();
        assert_eq!(scheduler.info(id).unwrap().kind.name(), "function");

        assert!(matches!(
            scheduler.find_or_create(Specifier::from("app.js")),
            Err(TaskError::Location(_))
        ));
    }

    #[test]
    fn test_missing_loader_fails_task() {
        let (scheduler, _) = scheduler();
        let id = manual(&scheduler);
        scheduler.start(id);
        assert_eq!(state(&scheduler, id), TaskState::Failed);
    }

    #[test]
    fn test_dependency_gates_ready() {
        let (scheduler, _) = scheduler();
        let first = scheduler.create(Source::None, TaskKind::Series);
        let second = scheduler.create(Source::None, TaskKind::Series);
        assert!(scheduler.add_dependence(second, first));

        scheduler.start(second);
        assert_eq!(state(&scheduler, second), TaskState::Waiting);

        scheduler.start(first);
        assert_eq!(state(&scheduler, first), TaskState::Succeeded);
        assert_eq!(state(&scheduler, second), TaskState::Succeeded);
    }

    #[test]
    fn test_dependence_only_while_dormant() {
        let (scheduler, _) = scheduler();
        let first = manual(&scheduler);
        let second = scheduler.create(Source::None, TaskKind::Series);
        scheduler.start(second);

        assert!(!scheduler.add_dependence(second, first));
        assert_eq!(scheduler.info(second).unwrap().pending_dependencies, 0);
    }

    #[test]
    fn test_self_dependence_is_ignored() {
        let (scheduler, _) = scheduler();
        let id = scheduler.create(Source::None, TaskKind::Series);
        assert!(!scheduler.add_dependence(id, id));
        scheduler.start(id);
        assert_eq!(state(&scheduler, id), TaskState::Succeeded);
    }

    #[test]
    fn test_succeeded_dependency_counts_as_released() {
        let (scheduler, _) = scheduler();
        let first = scheduler.create(Source::None, TaskKind::Series);
        scheduler.start(first);
        let second = scheduler.create(Source::None, TaskKind::Series);
        assert!(scheduler.add_dependence(second, first));

        scheduler.start(second);
        assert_eq!(state(&scheduler, second), TaskState::Succeeded);
    }

    #[test]
    fn test_failed_dependency_leaves_dependent_waiting() {
        let (scheduler, _) = scheduler();
        let first = manual(&scheduler);
        let second = scheduler.create(Source::None, TaskKind::Series);
        scheduler.add_dependence(second, first);

        scheduler.start(first);
        scheduler.start(second);

        assert_eq!(state(&scheduler, first), TaskState::Failed);
        assert_eq!(state(&scheduler, second), TaskState::Waiting);
    }

    #[test]
    fn test_branches_start_with_parent() {
        let (scheduler, _) = scheduler();
        let parent = scheduler.create(Source::None, TaskKind::Parallel);
        let child = scheduler.create(Source::None, TaskKind::Series);
        assert!(scheduler.add_branch(parent, child));
        assert_eq!(state(&scheduler, child), TaskState::Dormant);

        scheduler.start(parent);
        assert_eq!(state(&scheduler, child), TaskState::Succeeded);
        assert_eq!(state(&scheduler, parent), TaskState::Succeeded);
        assert!(scheduler.info(parent).unwrap().branches.is_empty());
    }

    #[test]
    fn test_parent_waits_for_branch() {
        let (scheduler, _) = scheduler();
        let parent = scheduler.create(Source::None, TaskKind::Parallel);
        let child = manual(&scheduler);
        scheduler.add_branch(parent, child);
        // keep the child loading instead of failing on the missing loader
        scheduler.tasks().get_mut(child).unwrap().state = TaskState::Waiting;
        scheduler.tasks().get_mut(child).unwrap().pending = 1;

        scheduler.start(parent);
        assert_eq!(state(&scheduler, parent), TaskState::Loaded);

        set_state(&scheduler, child, TaskState::Loading);
        scheduler.signal(child, Signal::Load);
        assert_eq!(state(&scheduler, child), TaskState::Succeeded);
        assert_eq!(state(&scheduler, parent), TaskState::Succeeded);
    }

    #[test]
    fn test_branch_failure_fails_parent() {
        let (scheduler, reporter) = scheduler();
        let root = scheduler.create(Source::None, TaskKind::Series);
        let parent = scheduler.create(Source::None, TaskKind::Parallel);
        let child = manual(&scheduler);
        scheduler.add_branch(root, parent);
        scheduler.add_branch(parent, child);

        scheduler.start(root);

        assert_eq!(state(&scheduler, child), TaskState::Failed);
        assert_eq!(state(&scheduler, parent), TaskState::Failed);
        assert_eq!(state(&scheduler, root), TaskState::Failed);
        assert!(!reporter.states_of(root).contains(&TaskState::Succeeded));
    }

    #[test]
    fn test_late_branch_is_rejected() {
        let (scheduler, reporter) = scheduler();
        let parent = scheduler.create(Source::None, TaskKind::Parallel);
        scheduler.start(parent);
        let child = scheduler.create(Source::None, TaskKind::Series);

        assert!(!scheduler.add_branch(parent, child));
        assert!(scheduler.info(parent).unwrap().branches.is_empty());
        assert_eq!(state(&scheduler, child), TaskState::Dormant);
        assert!(reporter
            .events()
            .contains(&TaskEvent::BranchRejected { parent, child }));
    }

    #[test]
    fn test_branch_on_failed_container_is_rejected() {
        let (scheduler, reporter) = scheduler();
        let parent = manual(&scheduler);
        scheduler.start(parent);
        assert_eq!(state(&scheduler, parent), TaskState::Failed);
        let child = scheduler.create(Source::None, TaskKind::Series);

        assert!(!scheduler.add_branch(parent, child));
        assert!(scheduler.info(parent).unwrap().branches.is_empty());
        assert_eq!(state(&scheduler, parent), TaskState::Failed);
        assert_eq!(state(&scheduler, child), TaskState::Dormant);
        assert_eq!(reporter.states_of(parent).last(), Some(&TaskState::Failed));
        assert!(reporter
            .events()
            .contains(&TaskEvent::BranchRejected { parent, child }));
    }

    #[test]
    fn test_failed_branch_fails_loading_container_at_once() {
        let (scheduler, _) = scheduler();
        let parent = manual(&scheduler);
        set_state(&scheduler, parent, TaskState::Loading);
        let child = manual(&scheduler);
        scheduler.start(child);
        assert_eq!(state(&scheduler, child), TaskState::Failed);

        assert!(scheduler.add_branch(parent, child));
        assert_eq!(state(&scheduler, parent), TaskState::Failed);

        // a late load signal does not revive the container
        scheduler.signal(parent, Signal::Load);
        assert_eq!(state(&scheduler, parent), TaskState::Failed);
    }

    #[test]
    fn test_branch_added_while_loading_starts_now() {
        let (scheduler, _) = scheduler();
        let parent = manual(&scheduler);
        set_state(&scheduler, parent, TaskState::Loading);
        let child = scheduler.create(Source::None, TaskKind::Series);

        assert!(scheduler.add_branch(parent, child));
        assert_eq!(state(&scheduler, child), TaskState::Succeeded);
        assert!(scheduler.info(parent).unwrap().branches.is_empty());

        scheduler.signal(parent, Signal::Load);
        assert_eq!(state(&scheduler, parent), TaskState::Succeeded);
    }

    #[test]
    fn test_failed_branch_fails_parent_on_attach() {
        let (scheduler, _) = scheduler();
        let child = manual(&scheduler);
        scheduler.start(child);
        let parent = scheduler.create(Source::None, TaskKind::Series);

        assert!(scheduler.add_branch(parent, child));
        assert_eq!(state(&scheduler, parent), TaskState::Failed);
    }

    #[test]
    fn test_failure_reported_once() {
        let (scheduler, reporter) = scheduler();
        let id = manual(&scheduler);
        scheduler.fail(id);
        scheduler.fail(id);
        assert_eq!(reporter.states_of(id), vec![TaskState::Failed]);
    }

    #[test]
    fn test_load_signal_while_ready_passes_through_loading() {
        let (scheduler, reporter) = scheduler();
        let id = manual(&scheduler);
        set_state(&scheduler, id, TaskState::Ready);

        scheduler.signal(id, Signal::Load);
        assert_eq!(
            reporter.states_of(id),
            vec![TaskState::Loading, TaskState::Loaded, TaskState::Succeeded]
        );
        scheduler.signal(id, Signal::Loading);
        assert_eq!(state(&scheduler, id), TaskState::Succeeded);
    }

    #[test]
    fn test_listener_fires_once_and_late() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let (scheduler, _) = scheduler();
        let id = scheduler.create(Source::None, TaskKind::Series);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let listener: Listener = Arc::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        scheduler
            .listen(id, Event::Success, listener.clone(), Subscription::Once)
            .unwrap();
        scheduler.start(id);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        scheduler
            .listen(id, Event::Success, listener, Subscription::Once)
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            scheduler.tasks().get(id).unwrap().events.listener_count(Event::Success),
            0
        );
    }

    #[test]
    fn test_listen_unknown_task() {
        let (scheduler, _) = scheduler();
        let listener: Listener = Arc::new(|_| {});
        let result = scheduler.listen(TaskId::new(99), Event::Load, listener, Subscription::Once);
        assert!(matches!(result, Err(TaskError::UnknownTask(_))));
    }

    #[test]
    fn test_find_or_create_existing() {
        let (scheduler, _) = scheduler();
        let id = scheduler.create(Source::None, TaskKind::Series);
        assert_eq!(scheduler.find_or_create(Specifier::Task(id)).unwrap(), id);
        assert!(matches!(
            scheduler.find_or_create(Specifier::Task(TaskId::new(42))),
            Err(TaskError::UnknownTask(_))
        ));
    }

    #[test]
    fn test_find_or_create_unclaimed_string() {
        let (scheduler, _) = scheduler();
        let result = scheduler.find_or_create(Specifier::from("a.js"));
        assert!(matches!(result, Err(TaskError::Unresolved(s)) if s == "a.js"));
    }

    #[test]
    fn test_callables_are_never_shared() {
        let (scheduler, _) = scheduler();
        let body = Specifier::callable(|_| Ok(()));
        let first = scheduler.find_or_create(body.clone()).unwrap();
        let second = scheduler.find_or_create(body).unwrap();
        assert_ne!(first, second);
    }
}
