//! Configuration file loader with multi-source merging

use super::error::ConfigError;
use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "mixture-of-solvers";
const PROJECT_FILES: [&str; 2] = ["mos.toml", ".mos.toml"];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Explicit config path (if provided)
    /// 2. Project root: `./mos.toml` or `./.mos.toml`
    /// 3. XDG config: `$XDG_CONFIG_HOME/mixture-of-solvers/config.toml`
    /// 4. Fallback: `~/.config/mixture-of-solvers/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, ConfigError> {
        let mut figment = Self::base();

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = config_path {
            Self::ensure_exists(path)?;
            figment = figment.merge(Toml::file(path));
        }

        Self::extract(figment)
    }

    /// Load defaults merged with one explicit file only
    pub fn load_file(path: &Path) -> Result<FileConfig, ConfigError> {
        Self::ensure_exists(path)?;
        Self::extract(Self::base().merge(Toml::file(path)))
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    fn base() -> Figment {
        Figment::new().merge(Serialized::defaults(FileConfig::default()))
    }

    fn ensure_exists(path: &Path) -> Result<(), ConfigError> {
        if path.exists() {
            Ok(())
        } else {
            Err(ConfigError::NotFound(path.to_path_buf()))
        }
    }

    fn extract(figment: Figment) -> Result<FileConfig, ConfigError> {
        figment.extract().map_err(|e| ConfigError::Load(Box::new(e)))
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/mixture-of-solvers/config.toml if set,
    /// otherwise falls back to ~/.config/mixture-of-solvers/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Describe the config file locations being used (for --show-config)
    pub fn describe_sources(explicit: Option<&Path>) -> Vec<String> {
        let mut lines = vec!["Configuration sources (in priority order):".to_string()];

        if let Some(path) = explicit {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            lines.push(format!("  [{:<7}] Explicit: {}", mark, path.display()));
        }

        match Self::project_config_path() {
            Some(path) => lines.push(format!("  [FOUND  ] Project:  {}", path.display())),
            None => lines.push("  [       ] Project:  ./mos.toml or ./.mos.toml".to_string()),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "" };
            lines.push(format!("  [{:<7}] Global:   {}", mark, path.display()));
        }

        lines.push("  [       ] Default:  built-in defaults".to_string());
        lines
    }
}
