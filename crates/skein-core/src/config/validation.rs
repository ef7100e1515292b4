//! Configuration validation

use tracing::debug;

use crate::error::{ConfigError, Result};

use super::types::Config;

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_base(config)?;
    validate_paths(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_base(config: &Config) -> Result<()> {
    if config.base.trim().is_empty() {
        return Err(ConfigError::invalid("base", "base path cannot be empty").into());
    }

    Ok(())
}

fn validate_paths(config: &Config) -> Result<()> {
    for (alias, target) in &config.paths {
        if alias.trim().is_empty() || alias.contains('/') {
            return Err(ConfigError::invalid(
                format!("paths.{}", alias),
                "alias must be a single non-empty path segment",
            )
            .into());
        }

        if target.trim().is_empty() {
            return Err(ConfigError::invalid(
                format!("paths.{}", alias),
                "alias target cannot be empty",
            )
            .into());
        }
    }

    Ok(())
}
