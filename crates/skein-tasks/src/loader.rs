//! Loader plugin contract and registry
//!
//! A loader claims specifiers in `resolve` and performs the actual work in
//! `load`, reporting progress through the [`TaskAgent`] it is handed. The
//! registry asks the most recently registered loader first; the built-in
//! callable loader is always asked last.

use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::host::ResourceRef;
use crate::loaders::CallableLoader;
use crate::location::UrlHelper;
use crate::orchestrator::Orchestrator;
use crate::scheduler::Scheduler;
use crate::specifier::Specifier;
use crate::task::{Callable, Source, TaskId, CALLABLE_KIND};

/// Kind names no plugin may take
pub const RESERVED_NAMES: &[&str] = &["series", "parallel", CALLABLE_KIND];

/// A loader plugin
pub trait Loader: Send + Sync {
    /// Unique name; becomes the kind of every task this loader creates
    fn name(&self) -> &str;

    /// Claim `specifier`, returning its canonical form.
    ///
    /// Must not have side effects: the orchestrator may resolve a specifier
    /// and then reuse an existing task instead of loading again.
    fn resolve(&self, specifier: &Specifier, urls: &UrlHelper) -> Option<Resolved>;

    /// Start loading. Emit [`Signal::Loading`] once, then exactly one of
    /// [`Signal::Load`] or [`Signal::Error`], now or later.
    fn load(&self, agent: TaskAgent);
}

/// Canonical form of a claimed specifier
#[derive(Clone)]
pub struct Resolved {
    pub source: Source,
    /// Deduplication key; `None` means every resolution creates a new task
    pub key: Option<String>,
}

impl Resolved {
    /// URL resource, keyed by the normalized URL
    pub fn url(url: Url) -> Self {
        let text = url.to_string();
        Self {
            key: Some(text.clone()),
            source: Source::Text(text),
        }
    }

    /// Non-URL string resource, keyed by the string itself
    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            key: Some(text.clone()),
            source: Source::Text(text),
        }
    }

    /// Inline callable; never deduplicated
    pub fn callable(body: Callable) -> Self {
        Self {
            source: Source::Callable(body),
            key: None,
        }
    }
}

impl fmt::Debug for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolved")
            .field("source", &self.source)
            .field("key", &self.key)
            .finish()
    }
}

/// Progress reported by a loader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// The load has started
    Loading,
    /// The load finished
    Load,
    /// The load failed
    Error,
}

/// Handle a loader uses to drive its task
#[derive(Clone)]
pub struct TaskAgent {
    id: TaskId,
    source: Source,
    scheduler: Arc<Scheduler>,
}

impl TaskAgent {
    pub(crate) fn new(id: TaskId, source: Source, scheduler: Arc<Scheduler>) -> Self {
        Self {
            id,
            source,
            scheduler,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Canonical source the loader resolved
    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Source parsed as a URL, for URL loaders
    pub fn url(&self) -> Option<Url> {
        self.source.as_text().and_then(|text| Url::parse(text).ok())
    }

    /// Attach the environment resource doing the work, for host lookup
    pub fn bind(&self, resource: ResourceRef) {
        self.scheduler.bind(self.id, resource);
    }

    /// Report progress
    pub fn emit(&self, signal: Signal) {
        self.scheduler.signal(self.id, signal);
    }

    /// The orchestrator that owns this task
    pub fn orchestrator(&self) -> Orchestrator {
        Orchestrator::from_scheduler(self.scheduler.clone())
    }
}

impl fmt::Debug for TaskAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskAgent")
            .field("id", &self.id)
            .field("source", &self.source)
            .finish()
    }
}

/// Ordered set of loader plugins
pub struct LoaderRegistry {
    plugins: Vec<Arc<dyn Loader>>,
    fallback: Arc<dyn Loader>,
}

impl LoaderRegistry {
    /// Registry holding only the callable fallback
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
            fallback: Arc::new(CallableLoader),
        }
    }

    /// Add a plugin. Blank, reserved and already taken names are refused.
    pub fn register(&mut self, loader: Arc<dyn Loader>) -> bool {
        let name = loader.name().trim();
        if name.is_empty() || RESERVED_NAMES.contains(&name) || self.get(name).is_some() {
            return false;
        }
        self.plugins.push(loader);
        true
    }

    /// Loader by name, fallback included
    pub fn get(&self, name: &str) -> Option<Arc<dyn Loader>> {
        if name == self.fallback.name() {
            return Some(self.fallback.clone());
        }
        self.plugins
            .iter()
            .find(|loader| loader.name() == name)
            .cloned()
    }

    /// Names in the order loaders are asked to resolve
    pub fn names(&self) -> Vec<String> {
        self.ordered().map(|loader| loader.name().to_string()).collect()
    }

    /// First loader to claim `specifier`, with its canonical form
    pub fn resolve(
        &self,
        specifier: &Specifier,
        urls: &UrlHelper,
    ) -> Option<(Arc<dyn Loader>, Resolved)> {
        self.ordered().find_map(|loader| {
            loader
                .resolve(specifier, urls)
                .map(|resolved| (loader.clone(), resolved))
        })
    }

    /// Callables belong to the callable fallback without consulting plugins
    pub fn resolve_callable(&self, specifier: &Specifier) -> Option<(Arc<dyn Loader>, Resolved)> {
        match specifier {
            Specifier::Callable(body) => {
                Some((self.fallback.clone(), Resolved::callable(body.clone())))
            }
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.plugins.len() + 1
    }

    fn ordered(&self) -> impl Iterator<Item = &Arc<dyn Loader>> {
        self.plugins.iter().rev().chain(std::iter::once(&self.fallback))
    }
}

impl Default for LoaderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
