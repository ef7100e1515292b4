//! Default configuration values

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "skein.toml";

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "skein.yaml";

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_TOML,
        DEFAULT_CONFIG_YAML,
        ".skein.toml",
        ".skein.yaml",
    ]
}

/// Configuration template written by `init_config`
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Skein Configuration

# Request `.min.js` variants for script specifiers without an extension
min = false

# Base path for relative specifiers
base = "./"

# Path aliases, applied to the first segment of a specifier
[paths]
"#;
