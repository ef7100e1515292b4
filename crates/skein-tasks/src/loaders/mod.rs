//! Built-in loader plugins
//!
//! The callable loader needs nothing but the orchestrator. The script,
//! stylesheet and polyfill loaders reach the outside world through an
//! [`Environment`], which an embedding application implements.

mod callable;
mod features;
mod polyfill;
mod script;
mod style;

use std::sync::Arc;

use url::Url;

use crate::host::ResourceRef;
use crate::loader::{Signal, TaskAgent};
use crate::orchestrator::Orchestrator;
use crate::task::TaskId;

pub use callable::CallableLoader;
pub use features::{Detector, FeatureDetectors};
pub use polyfill::{PolyfillLoader, POLYFILL_SERVICE};
pub use script::ScriptLoader;
pub use style::StyleLoader;

/// Side effects the URL loaders need from their host environment
pub trait Environment: Send + Sync {
    /// Begin fetching and executing a script.
    ///
    /// Returns a handle for the resource, which the environment should
    /// report as current while the script's code runs. Settle `completion`
    /// when the script has finished or failed.
    fn inject_script(&self, url: &Url, completion: Completion) -> ResourceRef;

    /// Attach a stylesheet; stylesheets are not awaited
    fn inject_stylesheet(&self, url: &Url) -> anyhow::Result<()>;

    /// Whether a named feature is available natively
    fn supports(&self, feature: &str) -> bool;
}

/// One-shot completion for an asynchronous load.
///
/// Dropping it without settling counts as a failure.
pub struct Completion {
    agent: TaskAgent,
    settled: bool,
}

impl Completion {
    pub(crate) fn new(agent: TaskAgent) -> Self {
        Self {
            agent,
            settled: false,
        }
    }

    /// Task this completion settles
    pub fn task(&self) -> TaskId {
        self.agent.id()
    }

    /// Orchestrator to issue nested `load` calls through
    pub fn orchestrator(&self) -> Orchestrator {
        self.agent.orchestrator()
    }

    pub fn succeed(mut self) {
        self.settle(Signal::Load);
    }

    pub fn fail(mut self) {
        self.settle(Signal::Error);
    }

    fn settle(&mut self, signal: Signal) {
        if !self.settled {
            self.settled = true;
            self.agent.emit(signal);
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!("{} dropped without completing", self.agent.id());
            self.settle(Signal::Error);
        }
    }
}

impl std::fmt::Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion")
            .field("task", &self.agent.id())
            .field("settled", &self.settled)
            .finish()
    }
}

/// Register the script, polyfill and stylesheet loaders.
///
/// Later registrations are asked first, so stylesheets are recognised
/// before polyfills, and polyfills before the catch-all script loader.
pub fn register_defaults(orchestrator: &Orchestrator, environment: Arc<dyn Environment>) {
    orchestrator.register(ScriptLoader::new(environment.clone()));
    orchestrator.register(PolyfillLoader::new(environment.clone()));
    orchestrator.register(StyleLoader::new(environment));
}
