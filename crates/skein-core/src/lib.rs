//! Skein Core - configuration and errors
//!
//! This crate provides the configuration model and the error taxonomy shared
//! by the Skein task graph and command-line tool.

pub mod config;
pub mod error;

pub use config::Config;
pub use error::{ConfigError, Result, SkeinError};
