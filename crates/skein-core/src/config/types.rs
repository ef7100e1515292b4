//! Configuration types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfigError;

/// Key of the minified-variant flag
pub const KEY_MIN: &str = "min";

/// Key of the base path
pub const KEY_BASE: &str = "base";

/// Key of the path alias table
pub const KEY_PATHS: &str = "paths";

/// Main configuration for Skein
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Request minified script variants (`.min.js`) for extension-less specifiers
    pub min: bool,

    /// Base path that relative specifiers resolve against
    pub base: String,

    /// Path aliases; the first path segment of a specifier is looked up here
    pub paths: BTreeMap<String, String>,

    /// Any other keys set by the embedding application
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min: false,
            base: "./".to_string(),
            paths: BTreeMap::new(),
            extra: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Read a single key as a JSON value
    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            KEY_MIN => Some(Value::Bool(self.min)),
            KEY_BASE => Some(Value::String(self.base.clone())),
            KEY_PATHS => Some(Value::Object(
                self.paths
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect(),
            )),
            other => self.extra.get(other).cloned(),
        }
    }

    /// Assign a single key.
    ///
    /// Recognised keys are type-checked; everything else lands in `extra`.
    /// A `null` value is ignored, leaving the current value untouched.
    pub fn set(&mut self, key: &str, value: Value) -> Result<(), ConfigError> {
        if value.is_null() {
            return Ok(());
        }

        match key {
            KEY_MIN => {
                self.min = value
                    .as_bool()
                    .ok_or_else(|| ConfigError::invalid(KEY_MIN, "must be a boolean"))?;
            }
            KEY_BASE => {
                let base = value
                    .as_str()
                    .ok_or_else(|| ConfigError::invalid(KEY_BASE, "must be a string"))?;
                self.base = base.to_string();
            }
            KEY_PATHS => {
                let object = value
                    .as_object()
                    .ok_or_else(|| ConfigError::invalid(KEY_PATHS, "must be a table"))?;
                let mut paths = BTreeMap::new();
                for (alias, target) in object {
                    let target = target.as_str().ok_or_else(|| {
                        ConfigError::invalid(format!("paths.{}", alias), "must be a string")
                    })?;
                    paths.insert(alias.clone(), target.to_string());
                }
                self.paths = paths;
            }
            other => {
                self.extra.insert(other.to_string(), value);
            }
        }

        Ok(())
    }

    /// Assign every key of a JSON object
    pub fn merge(&mut self, values: serde_json::Map<String, Value>) -> Result<(), ConfigError> {
        for (key, value) in values {
            self.set(&key, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(!config.min);
        assert_eq!(config.base, "./");
        assert!(config.paths.is_empty());
    }

    #[test]
    fn test_get_known_keys() {
        let mut config = Config::default();
        config.paths.insert("lib".to_string(), "vendor/lib".to_string());

        assert_eq!(config.get("min"), Some(json!(false)));
        assert_eq!(config.get("base"), Some(json!("./")));
        assert_eq!(config.get("paths"), Some(json!({"lib": "vendor/lib"})));
        assert_eq!(config.get("unknown"), None);
    }

    #[test]
    fn test_set_known_keys() {
        let mut config = Config::default();
        config.set("min", json!(true)).unwrap();
        config.set("base", json!("/static/")).unwrap();
        config.set("paths", json!({"ui": "lib/ui"})).unwrap();

        assert!(config.min);
        assert_eq!(config.base, "/static/");
        assert_eq!(config.paths.get("ui").map(String::as_str), Some("lib/ui"));
    }

    #[test]
    fn test_set_rejects_wrong_types() {
        let mut config = Config::default();
        assert!(config.set("min", json!("yes")).is_err());
        assert!(config.set("base", json!(3)).is_err());
        assert!(config.set("paths", json!({"ui": 1})).is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_set_null_is_ignored() {
        let mut config = Config::default();
        config.set("base", Value::Null).unwrap();
        assert_eq!(config.base, "./");
    }

    #[test]
    fn test_unknown_keys_are_kept() {
        let mut config = Config::default();
        config.set("theme", json!("dark")).unwrap();
        assert_eq!(config.get("theme"), Some(json!("dark")));
    }

    #[test]
    fn test_merge_object() {
        let mut config = Config::default();
        let values = json!({"min": true, "base": "assets/"});
        config.merge(values.as_object().unwrap().clone()).unwrap();
        assert!(config.min);
        assert_eq!(config.base, "assets/");
    }

    #[test]
    fn test_deserialize_toml() {
        let config: Config = toml::from_str(
            "min = true\nbase = \"static/\"\nbuild = 7\n\n[paths]\nui = \"lib/ui\"\n",
        )
        .unwrap();
        assert!(config.min);
        assert_eq!(config.base, "static/");
        assert_eq!(config.paths.len(), 1);
        assert_eq!(config.get("build"), Some(json!(7)));
    }
}
