//! Stylesheet loader

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::error;

use super::Environment;
use crate::loader::{Loader, Resolved, Signal, TaskAgent};
use crate::location::UrlHelper;
use crate::specifier::Specifier;

static CLAIM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^css:\s*|\.css($|\?)").expect("Invalid regex"));

static PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^css:\s*").expect("Invalid regex"));

static EXTENSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.css($|\?)").expect("Invalid regex"));

/// Attaches stylesheets. Claims `css:` prefixed strings and `.css` paths;
/// completes as soon as the stylesheet is attached.
pub struct StyleLoader {
    environment: Arc<dyn Environment>,
}

impl StyleLoader {
    pub fn new(environment: Arc<dyn Environment>) -> Self {
        Self { environment }
    }
}

impl Loader for StyleLoader {
    fn name(&self) -> &str {
        "css"
    }

    fn resolve(&self, specifier: &Specifier, urls: &UrlHelper) -> Option<Resolved> {
        let text = specifier.as_text()?.trim();
        if !CLAIM_RE.is_match(text) {
            return None;
        }

        let text = PREFIX_RE.replace(text, "");
        let text = if EXTENSION_RE.is_match(&text) {
            text.into_owned()
        } else {
            match text.find('?') {
                Some(index) => format!("{}.css{}", &text[..index], &text[index..]),
                None => format!("{}.css", text),
            }
        };

        urls.to_url(&text).map(Resolved::url)
    }

    fn load(&self, agent: TaskAgent) {
        let Some(url) = agent.url() else {
            error!("{} has no stylesheet URL", agent.id());
            agent.emit(Signal::Error);
            return;
        };

        agent.emit(Signal::Loading);
        match self.environment.inject_stylesheet(&url) {
            Ok(()) => agent.emit(Signal::Load),
            Err(err) => {
                error!("Stylesheet {} failed: {:#}", url, err);
                agent.emit(Signal::Error);
            }
        }
    }
}
