//! Configuration file loading for mixture-of-solvers
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./mos.toml` or `./.mos.toml`
//! 3. XDG config: `$XDG_CONFIG_HOME/mixture-of-solvers/config.toml`
//! 4. Fallback: `~/.config/mixture-of-solvers/config.toml`
//! 5. Default values

mod error;
mod file_config;
mod loader;

pub use error::ConfigError;
pub use file_config::{
    FileConfig, FileLoggingConfig, FileMosConfig, FileOutputConfig, FilePromptsConfig,
    FileRolesConfig, FileSourceConfig,
};
pub use loader::ConfigLoader;
