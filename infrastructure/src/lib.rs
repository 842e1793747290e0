//! Infrastructure layer for mixture-of-solvers
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod sources;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigLoader, FileConfig, FileLoggingConfig, FileMosConfig, FileOutputConfig,
    FilePromptsConfig, FileRolesConfig, FileSourceConfig,
};
pub use logging::JsonlConversationLogger;
pub use sources::{CommandSource, CommandSourceError, SourceRegistry, TimeoutSource};
