//! Inline callable loader

use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::error;

use crate::loader::{Loader, Resolved, Signal, TaskAgent};
use crate::location::UrlHelper;
use crate::specifier::Specifier;
use crate::task::{Source, CALLABLE_KIND};

/// Runs inline callables. Always asked last, never deduplicated.
#[derive(Debug, Default)]
pub struct CallableLoader;

impl Loader for CallableLoader {
    fn name(&self) -> &str {
        CALLABLE_KIND
    }

    fn resolve(&self, specifier: &Specifier, _urls: &UrlHelper) -> Option<Resolved> {
        match specifier {
            Specifier::Callable(body) => Some(Resolved::callable(body.clone())),
            _ => None,
        }
    }

    fn load(&self, agent: TaskAgent) {
        let Source::Callable(body) = agent.source().clone() else {
            error!("{} has no callable body", agent.id());
            agent.emit(Signal::Error);
            return;
        };

        agent.emit(Signal::Loading);

        let orchestrator = agent.orchestrator();
        match catch_unwind(AssertUnwindSafe(|| body(&orchestrator))) {
            Ok(Ok(())) => agent.emit(Signal::Load),
            Ok(Err(err)) => {
                error!("Callable {} failed: {:#}", agent.id(), err);
                agent.emit(Signal::Error);
            }
            Err(panic) => {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!("Callable {} panicked: {}", agent.id(), message);
                agent.emit(Signal::Error);
            }
        }
    }
}
