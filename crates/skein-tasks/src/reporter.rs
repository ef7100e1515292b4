//! Task graph reporting

use std::sync::{Arc, Mutex, PoisonError};

use crate::task::{TaskId, TaskKind, TaskState};

/// Events emitted while the graph changes
#[derive(Debug, Clone, PartialEq)]
pub enum TaskEvent {
    /// A task was created
    Created {
        id: TaskId,
        kind: TaskKind,
        source: String,
    },
    /// A task changed state
    Transition {
        id: TaskId,
        from: TaskState,
        to: TaskState,
    },
    /// A branch arrived after its parent finished loading and was ignored
    BranchRejected { parent: TaskId, child: TaskId },
    /// A loader plugin was added
    LoaderRegistered { name: String },
    /// A loader plugin was refused
    LoaderRejected { name: String },
    /// A `load` call started a new root
    RootStarted { id: TaskId },
    /// A `load` call was attached to a running host
    Nested { host: TaskId, id: TaskId },
}

/// Trait for observing the task graph
pub trait TaskReporter: Send + Sync {
    /// Handle a task event
    fn report(&self, event: &TaskEvent);
}

/// Simple reporter that logs to tracing
#[derive(Debug, Default)]
pub struct TracingReporter;

impl TaskReporter for TracingReporter {
    fn report(&self, event: &TaskEvent) {
        match event {
            TaskEvent::Created { id, kind, source } => {
                tracing::debug!("Created {} ({}) {}", id, kind, source);
            }
            TaskEvent::Transition { id, from, to } => {
                if *to == TaskState::Failed {
                    tracing::warn!("{} failed (was {})", id, from);
                } else {
                    tracing::debug!("{}: {} -> {}", id, from, to);
                }
            }
            TaskEvent::BranchRejected { parent, child } => {
                tracing::warn!("Ignoring branch {} of {}: parent already loaded", child, parent);
            }
            TaskEvent::LoaderRegistered { name } => {
                tracing::debug!("Registered loader '{}'", name);
            }
            TaskEvent::LoaderRejected { name } => {
                tracing::warn!("Loader '{}' rejected: name is reserved or taken", name);
            }
            TaskEvent::RootStarted { id } => {
                tracing::info!("Starting root {}", id);
            }
            TaskEvent::Nested { host, id } => {
                tracing::debug!("{} nested under host {}", id, host);
            }
        }
    }
}

/// Reporter that collects events for later inspection (useful for testing)
#[derive(Debug, Default)]
pub struct CollectingReporter {
    events: Mutex<Vec<TaskEvent>>,
}

impl CollectingReporter {
    /// Get all collected events
    pub fn events(&self) -> Vec<TaskEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// States `id` passed through, in order
    pub fn states_of(&self, id: TaskId) -> Vec<TaskState> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                TaskEvent::Transition { id: seen, to, .. } if seen == id => Some(to),
                _ => None,
            })
            .collect()
    }

    /// Tasks in the order they reached `state`
    pub fn reached(&self, state: TaskState) -> Vec<TaskId> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                TaskEvent::Transition { id, to, .. } if to == state => Some(id),
                _ => None,
            })
            .collect()
    }
}

impl TaskReporter for CollectingReporter {
    fn report(&self, event: &TaskEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}

/// Registry of task reporters
pub struct TaskReporterRegistry {
    reporters: Vec<Arc<dyn TaskReporter>>,
}

impl TaskReporterRegistry {
    pub fn new() -> Self {
        Self {
            reporters: vec![Arc::new(TracingReporter)],
        }
    }

    pub fn empty() -> Self {
        Self {
            reporters: Vec::new(),
        }
    }

    pub fn register(&mut self, reporter: Arc<dyn TaskReporter>) {
        self.reporters.push(reporter);
    }

    pub fn all(&self) -> &[Arc<dyn TaskReporter>] {
        &self.reporters
    }

    /// Broadcast an event to all registered reporters
    pub fn broadcast(&self, event: &TaskEvent) {
        for reporter in &self.reporters {
            reporter.report(event);
        }
    }
}

impl Default for TaskReporterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
