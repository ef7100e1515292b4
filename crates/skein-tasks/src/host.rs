//! Host task discovery
//!
//! A `load` call issued while another task is inside its loading phase must
//! become a branch of that task, otherwise the host would report success
//! before the work it started has finished. Synchronous callables are found
//! by state alone; asynchronously loaded resources are matched against the
//! resource the [`ExecutionContext`] reports as currently executing.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use crate::registry::TaskRegistry;
use crate::task::{TaskId, TaskState, CALLABLE_KIND};

/// Opaque handle to an environment resource (an injected script, say)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ResourceRef(u64);

impl ResourceRef {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "resource:{}", self.0)
    }
}

/// Tells the orchestrator which resource is executing right now
pub trait ExecutionContext: Send + Sync {
    /// The resource whose code is currently running, if the environment knows
    fn current_resource(&self) -> Option<ResourceRef>;
}

/// Context for environments without asynchronous resources
#[derive(Debug, Default)]
pub struct NoExecutionContext;

impl ExecutionContext for NoExecutionContext {
    fn current_resource(&self) -> Option<ResourceRef> {
        None
    }
}

/// Settable "currently executing" slot.
///
/// Environments mark a resource as executing for the duration of a guard
/// returned by [`CurrentResource::enter`]; the previous value comes back when
/// the guard drops.
#[derive(Debug, Clone, Default)]
pub struct CurrentResource {
    slot: Arc<Mutex<Option<ResourceRef>>>,
}

impl CurrentResource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<ResourceRef> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mark `resource` as executing until the guard is dropped
    pub fn enter(&self, resource: ResourceRef) -> CurrentResourceGuard {
        let previous = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(resource);
        CurrentResourceGuard {
            slot: self.slot.clone(),
            previous,
        }
    }
}

impl ExecutionContext for CurrentResource {
    fn current_resource(&self) -> Option<ResourceRef> {
        self.get()
    }
}

/// Restores the previously executing resource on drop
#[must_use = "the resource stops being current as soon as the guard is dropped"]
pub struct CurrentResourceGuard {
    slot: Arc<Mutex<Option<ResourceRef>>>,
    previous: Option<ResourceRef>,
}

impl Drop for CurrentResourceGuard {
    fn drop(&mut self) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = self.previous;
    }
}

/// Find the most recent task that is loading and owns the current call.
///
/// Scans newest to oldest. A loading callable wins outright; otherwise the
/// loading task bound to `current` is chosen.
pub(crate) fn find_host(tasks: &TaskRegistry, current: Option<ResourceRef>) -> Option<TaskId> {
    let mut bound = Vec::new();

    for task in tasks.iter_newest_first() {
        if task.state != TaskState::Loading {
            continue;
        }
        if task.kind.name() == CALLABLE_KIND {
            return Some(task.id);
        }
        if let Some(resource) = task.resource {
            bound.push((task.id, resource));
        }
    }

    let current = current?;
    bound
        .into_iter()
        .find(|(_, resource)| *resource == current)
        .map(|(id, _)| id)
}
