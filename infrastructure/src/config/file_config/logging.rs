//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
///
/// ```toml
/// [logging]
/// transcript = "~/.local/share/mos/runs.jsonl"
/// append = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL file receiving every conversation event of a run
    pub transcript: Option<PathBuf>,
    /// Keep earlier runs in the transcript instead of starting it afresh
    pub append: bool,
}

impl FileLoggingConfig {
    /// Transcript path with a leading `~/` expanded to the home directory
    pub fn transcript_path(&self) -> Option<PathBuf> {
        let path = self.transcript.as_ref()?;
        match (path.strip_prefix("~"), dirs::home_dir()) {
            (Ok(rest), Some(home)) => Some(home.join(rest)),
            _ => Some(path.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_absent_by_default() {
        assert!(FileLoggingConfig::default().transcript_path().is_none());
    }

    #[test]
    fn test_plain_path_is_kept() {
        let config = FileLoggingConfig {
            transcript: Some(PathBuf::from("/tmp/run.jsonl")),
            append: false,
        };
        assert_eq!(
            config.transcript_path(),
            Some(PathBuf::from("/tmp/run.jsonl"))
        );
    }

    #[test]
    fn test_home_prefix_is_expanded() {
        let config = FileLoggingConfig {
            transcript: Some(PathBuf::from("~/runs/last.jsonl")),
            append: true,
        };
        let path = config.transcript_path().unwrap();
        if let Some(home) = dirs::home_dir() {
            assert_eq!(path, home.join("runs/last.jsonl"));
        }
    }
}
