//! Series and parallel groups

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::instrument;

use crate::error::Result;
use crate::host::find_host;
use crate::reporter::TaskEvent;
use crate::scheduler::Scheduler;
use crate::specifier::Specifier;
use crate::task::{Source, TaskId, TaskKind};

/// Which container a group uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    Series,
    Parallel,
}

impl GroupKind {
    fn task_kind(self) -> TaskKind {
        match self {
            Self::Series => TaskKind::Series,
            Self::Parallel => TaskKind::Parallel,
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.task_kind().name())
    }
}

/// Lightweight reference to a group's container task.
///
/// Usable anywhere a [`Specifier`] is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GroupHandle {
    pub id: TaskId,
    pub kind: GroupKind,
}

impl Scheduler {
    /// Build a parallel group; nested lists are flattened into it
    #[instrument(skip_all, fields(count = specifiers.len()))]
    pub fn parallel(self: &Arc<Self>, specifiers: Vec<Specifier>) -> Result<GroupHandle> {
        let members = self.resolve_all(Specifier::flatten(specifiers))?;
        let id = self.create(Source::None, TaskKind::Parallel);
        for member in members {
            self.add_branch(id, member);
        }
        Ok(GroupHandle {
            id,
            kind: GroupKind::Parallel,
        })
    }

    /// Build a series group: each member waits for the one before it
    #[instrument(skip_all, fields(count = specifiers.len()))]
    pub fn series(self: &Arc<Self>, specifiers: Vec<Specifier>) -> Result<GroupHandle> {
        let members = self.resolve_all(specifiers)?;
        let id = self.create(Source::None, TaskKind::Series);
        let mut previous: Option<TaskId> = None;
        for member in members {
            if let Some(previous) = previous {
                self.add_dependence(member, previous);
            }
            self.add_branch(id, member);
            previous = Some(member);
        }
        Ok(GroupHandle {
            id,
            kind: GroupKind::Series,
        })
    }

    /// Build a series and run it.
    ///
    /// Issued from inside a loading task, the series becomes a branch of
    /// that task; otherwise it starts as a new root.
    pub fn load(self: &Arc<Self>, specifiers: Vec<Specifier>) -> Result<GroupHandle> {
        let current = self.context().current_resource();
        let host = find_host(&self.tasks(), current);

        let handle = self.series(specifiers)?;
        match host {
            Some(host) => {
                self.report(TaskEvent::Nested {
                    host,
                    id: handle.id,
                });
                self.add_branch(host, handle.id);
            }
            None => {
                self.report(TaskEvent::RootStarted { id: handle.id });
                self.start(handle.id);
            }
        }
        Ok(handle)
    }

    /// Resolve every specifier before anything is created for the group
    fn resolve_all(self: &Arc<Self>, specifiers: Vec<Specifier>) -> Result<Vec<TaskId>> {
        specifiers
            .into_iter()
            .map(|specifier| self.find_or_create(specifier))
            .collect()
    }
}
