//! Specifier to URL normalization
//!
//! Loaders that fetch by URL use [`UrlHelper::to_url`] to turn whatever the
//! caller wrote into one canonical absolute URL, which then doubles as the
//! task cache key. Two spellings of the same resource collapse to one task.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use skein_core::Config;
use url::Url;

use crate::error::Result;

/// `//host...` or anything with a scheme
static ABSOLUTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^//.|:/").expect("Invalid regex"));

/// A run of slashes not at the start and not right after a scheme colon
static MULTI_SLASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^:/])/{2,}").expect("Invalid regex"));

/// Resolves specifiers against the working location and configured base
#[derive(Debug, Clone)]
pub struct UrlHelper {
    cwd: Url,
    base: Url,
    paths: BTreeMap<String, String>,
    min: bool,
}

impl UrlHelper {
    /// Build a helper for `location` (a document or directory URL).
    ///
    /// The base is taken relative to the directory of `location` unless it
    /// starts with `/`, in which case it is relative to the host root.
    pub fn new(location: &Url, config: &Config) -> Result<Self> {
        let cwd = location.join(".")?;

        let raw = config.base.trim();
        let mut base = if raw.starts_with('/') {
            cwd.join(raw)?
        } else {
            cwd.join(raw.trim_start_matches(|c: char| c == '^' || c == '/' || c.is_whitespace()))?
        };
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            cwd,
            base,
            paths: config.paths.clone(),
            min: config.min,
        })
    }

    /// Directory of the working location
    pub fn cwd(&self) -> &Url {
        &self.cwd
    }

    /// Directory relative specifiers resolve against
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Whether minified variants were requested
    pub fn prefers_minified(&self) -> bool {
        self.min
    }

    /// Canonical absolute URL for `specifier`; `None` for blank input or a
    /// specifier the URL parser rejects.
    pub fn to_url(&self, specifier: &str) -> Option<Url> {
        let specifier = specifier.trim();
        if specifier.is_empty() {
            return None;
        }

        let specifier = collapse_slashes(&self.apply_alias(specifier));

        let joined = if let Some(rest) = specifier.strip_prefix('^') {
            self.cwd.join(rest.trim_start_matches('/'))
        } else if ABSOLUTE_RE.is_match(&specifier) || specifier.starts_with('/') {
            self.cwd.join(&specifier)
        } else {
            self.base.join(&specifier)
        };

        joined.ok()
    }

    /// Replace a leading alias segment with its configured target
    fn apply_alias(&self, specifier: &str) -> String {
        let (head, tail) = match specifier.find('/') {
            Some(index) => specifier.split_at(index),
            None => (specifier, ""),
        };
        match self.paths.get(head) {
            Some(target) => format!("{}{}", target.trim_end_matches('/'), tail),
            None => specifier.to_string(),
        }
    }
}

/// Collapse repeated slashes in the path part, leaving query and fragment alone
fn collapse_slashes(specifier: &str) -> String {
    let split = specifier.find(['?', '#']).unwrap_or(specifier.len());
    let (path, rest) = specifier.split_at(split);
    format!("{}{}", MULTI_SLASH_RE.replace_all(path, "$1/"), rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn helper(base: &str) -> UrlHelper {
        let config = Config {
            base: base.to_string(),
            ..Config::default()
        };
        let location = Url::parse("http://example.com/app/index.html").unwrap();
        UrlHelper::new(&location, &config).unwrap()
    }

    fn resolve(helper: &UrlHelper, specifier: &str) -> String {
        helper.to_url(specifier).unwrap().to_string()
    }

    #[test]
    fn test_default_base_is_cwd() {
        let helper = helper("./");
        assert_eq!(helper.cwd().as_str(), "http://example.com/app/");
        assert_eq!(helper.base().as_str(), "http://example.com/app/");
        assert_eq!(resolve(&helper, "a.js"), "http://example.com/app/a.js");
    }

    #[test]
    fn test_relative_base_gets_trailing_slash() {
        let helper = helper("static");
        assert_eq!(helper.base().as_str(), "http://example.com/app/static/");
        assert_eq!(resolve(&helper, "a.js"), "http://example.com/app/static/a.js");
    }

    #[test]
    fn test_root_base() {
        let helper = helper("/assets");
        assert_eq!(helper.base().as_str(), "http://example.com/assets/");
    }

    #[test]
    fn test_caret_is_relative_to_cwd() {
        let helper = helper("static/");
        assert_eq!(resolve(&helper, "^a.js"), "http://example.com/app/a.js");
        assert_eq!(resolve(&helper, "^/lib/a.js"), "http://example.com/app/lib/a.js");
    }

    #[test]
    fn test_absolute_and_root_specifiers() {
        let helper = helper("static/");
        assert_eq!(resolve(&helper, "/x.js"), "http://example.com/x.js");
        assert_eq!(resolve(&helper, "//cdn.net/x.js"), "http://cdn.net/x.js");
        assert_eq!(resolve(&helper, "https://cdn.net/x.js"), "https://cdn.net/x.js");
    }

    #[test]
    fn test_normalizes_segments() {
        let helper = helper("./");
        assert_eq!(resolve(&helper, "a//b/../c.js"), "http://example.com/app/a/c.js");
        assert_eq!(resolve(&helper, "./a/./b.js"), "http://example.com/app/a/b.js");
        assert_eq!(resolve(&helper, "https://cdn.net//a///b.js"), "https://cdn.net/a/b.js");
    }

    #[test]
    fn test_query_is_untouched() {
        let helper = helper("./");
        assert_eq!(
            resolve(&helper, "a.js?next=//x"),
            "http://example.com/app/a.js?next=//x"
        );
    }

    #[test]
    fn test_spellings_collapse() {
        let helper = helper("./");
        assert_eq!(helper.to_url("a.js"), helper.to_url("./a.js"));
        assert_eq!(helper.to_url("a.js"), helper.to_url("/app/a.js"));
        assert_eq!(helper.to_url("a.js"), helper.to_url("^a.js"));
    }

    #[test]
    fn test_aliases() {
        let mut config = Config::default();
        config.paths.insert("ui".to_string(), "vendor/ui/".to_string());
        config.paths.insert("cdn".to_string(), "https://cdn.net/lib".to_string());
        let location = Url::parse("http://example.com/app/").unwrap();
        let helper = UrlHelper::new(&location, &config).unwrap();

        assert_eq!(resolve(&helper, "ui/button.js"), "http://example.com/app/vendor/ui/button.js");
        assert_eq!(resolve(&helper, "cdn/x.js"), "https://cdn.net/lib/x.js");
        assert_eq!(resolve(&helper, "uix/y.js"), "http://example.com/app/uix/y.js");
    }

    #[test]
    fn test_blank_specifier() {
        let helper = helper("./");
        assert!(helper.to_url("").is_none());
        assert!(helper.to_url("   ").is_none());
    }

    #[test]
    fn test_prefers_minified() {
        let config = Config {
            min: true,
            ..Config::default()
        };
        let location = Url::parse("file:///srv/site/").unwrap();
        let helper = UrlHelper::new(&location, &config).unwrap();
        assert!(helper.prefers_minified());
        assert_eq!(resolve(&helper, "a.js"), "file:///srv/site/a.js");
    }
}
