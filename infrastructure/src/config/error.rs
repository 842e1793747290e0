//! Configuration errors

use mos_domain::Role;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading configuration or wiring sources from it
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("{role} '{name}' is not defined in [sources]")]
    UndefinedSource { role: Role, name: String },

    #[error("Source '{0}' has an empty command")]
    EmptyCommand(String),
}
