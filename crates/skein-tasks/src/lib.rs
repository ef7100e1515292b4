//! Skein Tasks - dependency-aware resource orchestration
//!
//! This crate provides the task graph behind Skein: a per-task state machine
//! with dependencies and branches, series and parallel groups, identity
//! deduplication through loader plugins, and nesting of `load` calls under
//! the task that issued them.

pub mod bus;
pub mod error;
pub mod group;
pub mod host;
pub mod loader;
pub mod loaders;
pub mod location;
pub mod orchestrator;
mod registry;
pub mod reporter;
mod scheduler;
pub mod specifier;
pub mod task;

pub use bus::{Event, Subscription};
pub use error::{Result, TaskError};
pub use group::{GroupHandle, GroupKind};
pub use host::{CurrentResource, ExecutionContext, NoExecutionContext, ResourceRef};
pub use loader::{Loader, LoaderRegistry, Resolved, Signal, TaskAgent};
pub use loaders::{Completion, Environment, FeatureDetectors};
pub use location::UrlHelper;
pub use orchestrator::Orchestrator;
pub use reporter::{CollectingReporter, TaskEvent, TaskReporter, TaskReporterRegistry, TracingReporter};
pub use specifier::Specifier;
pub use task::{Callable, TaskId, TaskInfo, TaskKind, TaskState};
