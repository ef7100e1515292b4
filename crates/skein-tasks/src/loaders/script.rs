//! Script loader

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::error;

use super::{Completion, Environment};
use crate::loader::{Loader, Resolved, Signal, TaskAgent};
use crate::location::UrlHelper;
use crate::specifier::Specifier;

static PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^js:\s*").expect("Invalid regex"));

static EXTENSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.js$").expect("Invalid regex"));

/// Loads scripts through the environment. Claims every string, so it should
/// be registered before more specific loaders.
pub struct ScriptLoader {
    environment: Arc<dyn Environment>,
}

impl ScriptLoader {
    pub fn new(environment: Arc<dyn Environment>) -> Self {
        Self { environment }
    }
}

impl Loader for ScriptLoader {
    fn name(&self) -> &str {
        "js"
    }

    fn resolve(&self, specifier: &Specifier, urls: &UrlHelper) -> Option<Resolved> {
        let text = specifier.as_text()?.trim();
        let (path, query) = match text.find('?') {
            Some(index) => text.split_at(index),
            None => (text, ""),
        };

        let mut path = PREFIX_RE.replace(path, "").trim().to_string();
        if path.is_empty() {
            return None;
        }
        if !EXTENSION_RE.is_match(&path) {
            path.push_str(if urls.prefers_minified() { ".min.js" } else { ".js" });
        }

        urls.to_url(&format!("{}{}", path, query)).map(Resolved::url)
    }

    fn load(&self, agent: TaskAgent) {
        let Some(url) = agent.url() else {
            error!("{} has no script URL", agent.id());
            agent.emit(Signal::Error);
            return;
        };

        let resource = self
            .environment
            .inject_script(&url, Completion::new(agent.clone()));
        agent.bind(resource);
        agent.emit(Signal::Loading);
    }
}
