//! Source definitions from TOML (`[sources.<name>]` sections)

use mos_domain::{Capability, ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// One subprocess-backed answer source
///
/// # Example
///
/// ```toml
/// [sources.wiki]
/// command = "python3"
/// args = ["-m", "wiki_solver"]
/// capabilities = ["answer", "select_best"]
/// timeout_secs = 20
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSourceConfig {
    /// Program to run for each call
    pub command: String,
    /// Arguments passed to the program
    pub args: Vec<String>,
    /// Operations the program understands
    pub capabilities: Vec<String>,
    /// Per-call timeout, overriding `mos.timeout_secs`
    pub timeout_secs: Option<u64>,
}

impl Default for FileSourceConfig {
    fn default() -> Self {
        Self {
            command: String::new(),
            args: Vec::new(),
            capabilities: vec![Capability::Answer.as_str().to_string()],
            timeout_secs: None,
        }
    }
}

impl FileSourceConfig {
    /// Parse the capability names of source `name`; unknown names are dropped with a warning.
    pub fn parse_capabilities(&self, name: &str) -> (Vec<Capability>, Vec<ConfigIssue>) {
        let mut capabilities = Vec::new();
        let mut issues = Vec::new();

        for raw in &self.capabilities {
            match raw.parse::<Capability>() {
                Ok(capability) => {
                    if !capabilities.contains(&capability) {
                        capabilities.push(capability);
                    }
                }
                Err(_) => issues.push(ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: format!("sources.{}.capabilities", name),
                        value: raw.clone(),
                        valid_values: Capability::ALL
                            .iter()
                            .map(|c| c.as_str().to_string())
                            .collect(),
                    },
                    format!(
                        "sources.{}.capabilities: unknown capability '{}', ignored",
                        name, raw
                    ),
                )),
            }
        }

        (capabilities, issues)
    }
}
