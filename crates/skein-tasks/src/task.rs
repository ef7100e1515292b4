//! Task types and the per-task state machine

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::bus::{Event, EventBus};
use crate::host::ResourceRef;
use crate::orchestrator::Orchestrator;

/// Name of the built-in loader that runs callables
pub const CALLABLE_KIND: &str = "function";

/// Process-unique task identifier, increasing in creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle state of a task.
///
/// Variants are declared in lifecycle order; `Failed` sorts after every
/// other state, so "past loading" is `state > TaskState::Loading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskState {
    /// Created; dependencies and branches may be attached
    Dormant,
    /// Started; blocked on outstanding dependencies
    Waiting,
    /// All dependencies satisfied
    Ready,
    /// Own load logic running; branches are running
    Loading,
    /// Own load logic finished; waiting for branches
    Loaded,
    /// Loaded and every branch succeeded
    Succeeded,
    /// Terminal failure
    Failed,
}

impl TaskState {
    /// Get state as string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dormant => "dormant",
            Self::Waiting => "waiting",
            Self::Ready => "ready",
            Self::Loading => "loading",
            Self::Loaded => "loaded",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }

    /// Whether no further transition can happen
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// Event fired on entering this state, if any
    fn event(&self) -> Option<Event> {
        match self {
            Self::Loading => Some(Event::Loading),
            Self::Loaded => Some(Event::Load),
            Self::Succeeded => Some(Event::Success),
            Self::Failed => Some(Event::Error),
            Self::Dormant | Self::Waiting | Self::Ready => None,
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who executes a task
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Container whose branches run one after another
    Series,
    /// Container whose branches run without ordering
    Parallel,
    /// Resource handled by the named loader plugin
    Plugin(String),
}

impl TaskKind {
    /// Kind name; plugin kinds use the plugin name
    pub fn name(&self) -> &str {
        match self {
            Self::Series => "series",
            Self::Parallel => "parallel",
            Self::Plugin(name) => name,
        }
    }

    /// Whether this is a series or parallel container
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Series | Self::Parallel)
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for TaskKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Body of an inline callable resource
pub type Callable = Arc<dyn Fn(&Orchestrator) -> anyhow::Result<()> + Send + Sync>;

/// User callback attached through the orchestrator
pub type Listener = Arc<dyn Fn(&TaskInfo) + Send + Sync>;

/// Payload a task carries to its loader
#[derive(Clone, Default)]
pub enum Source {
    /// Containers have no payload
    #[default]
    None,
    /// Canonical string source, usually a URL
    Text(String),
    /// Inline callable
    Callable(Callable),
}

impl Source {
    /// Text payload, if any
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Short human-readable description
    pub fn describe(&self) -> String {
        match self {
            Self::None => String::new(),
            Self::Text(text) => text.clone(),
            Self::Callable(_) => "<callable>".to_string(),
        }
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Callable(_) => f.write_str("Callable(..)"),
        }
    }
}

/// Work queued on a task's bus.
///
/// The graph's own bookkeeping travels through the same lists as user
/// listeners, so both obey the same ordering and fire-once rules.
#[derive(Clone)]
pub(crate) enum Callback {
    /// Dependency succeeded: decrement the dependent's pending count
    ReleaseDependent(TaskId),
    /// Branch succeeded: detach it from this parent
    DetachBranch(TaskId),
    /// Branch failed: fail this parent
    FailParent(TaskId),
    /// User callback
    Listener(Listener),
}

/// Read-only snapshot of a task
#[derive(Debug, Clone, Serialize)]
pub struct TaskInfo {
    pub id: TaskId,
    pub kind: TaskKind,
    pub state: TaskState,
    /// Canonical source, empty for containers
    pub source: String,
    pub pending_dependencies: i64,
    pub branches: Vec<TaskId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<ResourceRef>,
}

/// Result of a state change: what to report and what to run afterwards
pub(crate) struct Transition {
    pub from: TaskState,
    pub to: TaskState,
    /// Snapshot of the fired bus entries
    pub callbacks: Vec<Callback>,
    /// Branches to start (entering `Loading` only)
    pub branches: Vec<TaskId>,
}

/// A single unit of deferred work
pub(crate) struct Task {
    pub id: TaskId,
    pub source: Source,
    pub kind: TaskKind,
    pub state: TaskState,
    pub pending: i64,
    pub branches: Vec<TaskId>,
    pub events: EventBus<Callback>,
    pub resource: Option<ResourceRef>,
}

impl Task {
    pub fn new(id: TaskId, source: Source, kind: TaskKind) -> Self {
        Self {
            id,
            source,
            kind,
            state: TaskState::Dormant,
            pending: 0,
            branches: Vec::new(),
            events: EventBus::new(),
            resource: None,
        }
    }

    pub fn info(&self) -> TaskInfo {
        TaskInfo {
            id: self.id,
            kind: self.kind.clone(),
            state: self.state,
            source: self.source.describe(),
            pending_dependencies: self.pending,
            branches: self.branches.clone(),
            resource: self.resource,
        }
    }

    /// Dependencies can only be attached before the task is started
    pub fn accepts_dependence(&self) -> bool {
        self.state == TaskState::Dormant
    }

    /// Branches can be attached until the task's own load has finished
    pub fn accepts_branch(&self) -> bool {
        self.state <= TaskState::Loading
    }

    /// Dormant -> Waiting
    pub fn enter_waiting(&mut self) -> Option<Transition> {
        (self.state == TaskState::Dormant).then(|| self.move_to(TaskState::Waiting))
    }

    /// Waiting -> Ready, once nothing is pending
    pub fn enter_ready(&mut self) -> Option<Transition> {
        (self.state == TaskState::Waiting && self.pending <= 0)
            .then(|| self.move_to(TaskState::Ready))
    }

    /// Ready -> Loading; carries the branches queued so far
    pub fn enter_loading(&mut self) -> Option<Transition> {
        (self.state == TaskState::Ready).then(|| {
            let mut transition = self.move_to(TaskState::Loading);
            transition.branches = self.branches.clone();
            transition
        })
    }

    /// Loading -> Loaded
    pub fn enter_loaded(&mut self) -> Option<Transition> {
        (self.state == TaskState::Loading).then(|| self.move_to(TaskState::Loaded))
    }

    /// Loaded -> Succeeded, once every branch is gone
    pub fn enter_succeeded(&mut self) -> Option<Transition> {
        (self.state == TaskState::Loaded && self.branches.is_empty())
            .then(|| self.move_to(TaskState::Succeeded))
    }

    /// Any -> Failed; re-entering is a no-op
    pub fn enter_failed(&mut self) -> Option<Transition> {
        (self.state != TaskState::Failed).then(|| self.move_to(TaskState::Failed))
    }

    /// Remove the first occurrence of `child` from the branch list
    pub fn detach_branch(&mut self, child: TaskId) -> bool {
        match self.branches.iter().position(|id| *id == child) {
            Some(index) => {
                self.branches.remove(index);
                true
            }
            None => false,
        }
    }

    fn move_to(&mut self, to: TaskState) -> Transition {
        let from = self.state;
        self.state = to;
        let callbacks = to.event().map(|event| self.events.fire(event)).unwrap_or_default();
        Transition {
            from,
            to,
            callbacks,
            branches: Vec::new(),
        }
    }
}
