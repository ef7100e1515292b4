//! Feature polyfill loader

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, error};
use url::Url;

use super::{Completion, Environment};
use crate::loader::{Loader, Resolved, Signal, TaskAgent};
use crate::location::UrlHelper;
use crate::specifier::Specifier;

/// Script that serves polyfills for a comma-separated feature list
pub const POLYFILL_SERVICE: &str = "https://polyfill.io/v3/polyfill.min.js";

static PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^polyfill:\s*").expect("Invalid regex"));

/// Loads `polyfill:<features>` when the environment lacks any of the features
pub struct PolyfillLoader {
    environment: Arc<dyn Environment>,
}

impl PolyfillLoader {
    pub fn new(environment: Arc<dyn Environment>) -> Self {
        Self { environment }
    }

    fn all_supported(&self, features: &str) -> bool {
        features
            .split(',')
            .map(str::trim)
            .filter(|feature| !feature.is_empty())
            .all(|feature| self.environment.supports(feature))
    }
}

impl Loader for PolyfillLoader {
    fn name(&self) -> &str {
        "polyfill"
    }

    fn resolve(&self, specifier: &Specifier, _urls: &UrlHelper) -> Option<Resolved> {
        let text = specifier.as_text()?.trim();
        if !PREFIX_RE.is_match(text) {
            return None;
        }
        let features = PREFIX_RE.replace(text, "");
        (!features.is_empty()).then(|| Resolved::text(features))
    }

    fn load(&self, agent: TaskAgent) {
        let features = agent.source().as_text().unwrap_or_default().to_string();

        if self.all_supported(&features) {
            debug!("{} natively supported", features);
            agent.emit(Signal::Loading);
            agent.emit(Signal::Load);
            return;
        }

        let url = match Url::parse(POLYFILL_SERVICE) {
            Ok(mut url) => {
                url.query_pairs_mut().append_pair("features", &features);
                url
            }
            Err(err) => {
                error!("Invalid polyfill service URL: {}", err);
                agent.emit(Signal::Error);
                return;
            }
        };

        let resource = self
            .environment
            .inject_script(&url, Completion::new(agent.clone()));
        agent.bind(resource);
        agent.emit(Signal::Loading);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::testing::{orchestrator, RecordingEnvironment};
    use crate::task::TaskState;
    use skein_core::Config;

    #[test]
    fn test_resolves_feature_list() {
        let urls = UrlHelper::new(&Url::parse("http://example.com/").unwrap(), &Config::default()).unwrap();
        let loader = PolyfillLoader::new(Arc::new(RecordingEnvironment::default()));

        let resolved = loader
            .resolve(&Specifier::from("Polyfill: fetch,Promise"), &urls)
            .unwrap();
        assert_eq!(resolved.key.as_deref(), Some("fetch,Promise"));
        assert!(loader.resolve(&Specifier::from("polyfill:"), &urls).is_none());
        assert!(loader.resolve(&Specifier::from("fetch"), &urls).is_none());
    }

    #[test]
    fn test_supported_features_skip_injection() {
        let (orchestrator, environment) = orchestrator();
        {
            let mut supported = environment.supported.lock().unwrap();
            supported.insert("fetch".to_string());
            supported.insert("Promise".to_string());
        }

        let root = orchestrator.load(["polyfill:fetch, Promise"]).unwrap();
        assert_eq!(orchestrator.state(root.id), Some(TaskState::Succeeded));
        assert!(environment.script_urls().is_empty());
    }

    #[test]
    fn test_missing_feature_injects_service() {
        let (orchestrator, environment) = orchestrator();
        environment
            .supported
            .lock()
            .unwrap()
            .insert("fetch".to_string());

        let root = orchestrator.load(["polyfill:fetch,IntersectionObserver"]).unwrap();
        assert_eq!(
            environment.script_urls(),
            vec!["https://polyfill.io/v3/polyfill.min.js?features=fetch%2CIntersectionObserver"]
        );
        assert_eq!(orchestrator.state(root.id), Some(TaskState::Loaded));

        environment.finish("IntersectionObserver", true);
        assert_eq!(orchestrator.state(root.id), Some(TaskState::Succeeded));
    }
}
