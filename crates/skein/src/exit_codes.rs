//! Exit codes for the CLI

use skein_core::{ConfigError, SkeinError};

use crate::cli::commands::LoadError;

/// Success
pub const SUCCESS: i32 = 0;

/// General error
pub const ERROR: i32 = 1;

/// Configuration error
pub const CONFIG_ERROR: i32 = 2;

/// At least one task failed
pub const LOAD_FAILED: i32 = 3;

/// The root task did not settle in time
pub const TIMEOUT: i32 = 4;

/// Exit code for an error returned by a command
pub fn for_error(err: &anyhow::Error) -> i32 {
    if let Some(load) = err.downcast_ref::<LoadError>() {
        return match load {
            LoadError::Failed { .. } => LOAD_FAILED,
            LoadError::TimedOut(..) => TIMEOUT,
        };
    }
    if err.downcast_ref::<ConfigError>().is_some()
        || matches!(err.downcast_ref::<SkeinError>(), Some(SkeinError::Config(_)))
    {
        return CONFIG_ERROR;
    }
    ERROR
}
