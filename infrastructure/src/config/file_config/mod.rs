//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly; enum-like fields stay strings so that a
//! typo is reported as a [`ConfigIssue`] instead of a parse failure.

mod logging;
mod mos;
mod output;
mod roles;
mod sources;

pub use logging::FileLoggingConfig;
pub use mos::{FileMosConfig, FilePromptsConfig};
pub use output::FileOutputConfig;
pub use roles::FileRolesConfig;
pub use sources::FileSourceConfig;

use mos_application::config::{GatherMode, MosConfig};
use mos_domain::{
    Capability, ConfigIssue, ConfigIssueCode, Role, StrategyKind, SynthesisMode,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Strategy selection and parameters
    pub mos: FileMosConfig,
    /// Source names per role
    pub roles: FileRolesConfig,
    /// Source definitions, keyed by name
    pub sources: BTreeMap<String, FileSourceConfig>,
    /// Output settings
    pub output: FileOutputConfig,
    /// Transcript settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// This is the single entry point for config validation. It checks:
    /// 1. Enum parse failures in `[mos]` and in source capabilities
    /// 2. Sources without a command
    /// 3. Role entries naming undefined sources
    /// 4. Roles the selected strategy needs but nobody fills
    /// 5. Sources assigned to a role they cannot serve
    /// 6. A discussion with zero rounds
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        // 1. Enum parse validation
        let (strategy, strategy_issues) = self.mos.parse_strategy();
        issues.extend(strategy_issues);
        let (synthesis, synthesis_issues) = self.mos.parse_synthesis();
        issues.extend(synthesis_issues);
        issues.extend(self.mos.parse_arbitration_input().1);
        for (name, source) in &self.sources {
            issues.extend(source.parse_capabilities(name).1);
        }

        // 2. Empty commands
        for (name, source) in &self.sources {
            if source.command.trim().is_empty() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyCommand {
                        source: name.clone(),
                    },
                    format!("sources.{}: command cannot be empty", name),
                ));
            }
        }

        // 3. Undefined sources and 5. capability mismatches
        for (role, name) in self.roles.assignments() {
            let Some(source) = self.sources.get(name) else {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::UndefinedSource {
                        role: role.to_string(),
                        source: name.to_string(),
                    },
                    format!("roles.{}: source '{}' is not defined in [sources]", role, name),
                ));
                continue;
            };

            let needed = required_capability(role, strategy, synthesis);
            let (capabilities, _) = source.parse_capabilities(name);
            if !capabilities.contains(&needed) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::MissingCapability {
                        source: name.to_string(),
                        capability: needed.as_str().to_string(),
                    },
                    format!(
                        "source '{}' acts as {} but does not declare '{}'",
                        name,
                        role,
                        needed.as_str()
                    ),
                ));
            }
        }

        // 4. Missing roles
        let founders_work = strategy == StrategyKind::Discuss && self.roles.count(Role::Founder) > 0;
        if self.roles.count(Role::Worker) == 0 && !founders_work {
            issues.push(missing_role(Role::Worker, strategy));
        }
        for role in strategy.required_roles() {
            if self.roles.count(*role) == 0 {
                issues.push(missing_role(*role, strategy));
            }
        }

        // 6. Zero rounds
        if strategy == StrategyKind::Discuss && self.mos.discussion_rounds == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroRounds,
                "mos.discussion_rounds is 0: founders will not discuss before the conclusion",
            ));
        }

        issues
    }

    /// Build the construction-time mixture configuration.
    ///
    /// Invalid enum values fall back to their defaults; [`validate`](Self::validate)
    /// reports them.
    pub fn to_mos_config(&self) -> MosConfig {
        let strategy = self.mos.parse_strategy().0;
        let gather_mode = if self.mos.concurrent_gather {
            GatherMode::Concurrent
        } else {
            GatherMode::Sequential
        };

        let mut config = MosConfig::new(strategy)
            .with_synthesis(self.mos.parse_synthesis().0)
            .with_arbitration_input(self.mos.parse_arbitration_input().0)
            .with_discussion_rounds(self.mos.discussion_rounds)
            .with_gather_mode(gather_mode);
        if let Some(prompts) = self.mos.prompts.to_prompt_set(strategy) {
            config = config.with_prompts(prompts);
        }
        config
    }
}

/// Contract method a source needs in order to serve `role`
fn required_capability(role: Role, strategy: StrategyKind, synthesis: SynthesisMode) -> Capability {
    match role {
        Role::Worker | Role::Founder => Capability::Answer,
        Role::Voter => Capability::SelectBest,
        Role::Reranker => Capability::Rerank,
        Role::President
            if strategy == StrategyKind::Discuss && synthesis == SynthesisMode::Arbitration =>
        {
            Capability::SelectBest
        }
        Role::President => Capability::Answer,
    }
}

fn missing_role(role: Role, strategy: StrategyKind) -> ConfigIssue {
    ConfigIssue::error(
        ConfigIssueCode::MissingRole {
            role: role.to_string(),
        },
        format!("strategy '{}' needs at least one {}", strategy, role),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use mos_domain::{OutputFormat, PromptSet};

    const VOTE_CONFIG: &str = r#"
[mos]
strategy = "vote"

[roles]
workers = ["a", "b"]
voters = ["judge"]

[sources.a]
command = "solver-a"

[sources.b]
command = "solver-b"

[sources.judge]
command = "judge"
capabilities = ["answer", "select_best"]
"#;

    fn codes(issues: &[ConfigIssue]) -> Vec<&ConfigIssueCode> {
        issues.iter().map(|i| &i.code).collect()
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[mos]
strategy = "discuss"
discussion_rounds = 2

[mos.prompts]
discuss_prompt = "argue"

[roles]
founders = ["f1", "f2"]
president = "p"

[sources.f1]
command = "f1"

[sources.f2]
command = "f2"

[sources.p]
command = "p"

[output]
format = "full"

[logging]
transcript = "/tmp/run.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.sources.len(), 3);
        assert_eq!(config.output.format, Some(OutputFormat::Full));
        assert!(config.logging.transcript.is_some());
        assert!(config.validate().is_empty());

        let mos = config.to_mos_config();
        assert_eq!(mos.strategy, StrategyKind::Discuss);
        assert_eq!(mos.discussion_rounds, 2);
        assert_eq!(
            mos.effective_prompts(),
            PromptSet::discussion().with_discuss_prompt("argue")
        );
    }

    #[test]
    fn test_vote_config_is_valid() {
        let config: FileConfig = toml::from_str(VOTE_CONFIG).unwrap();
        assert!(config.validate().is_empty());

        let mos = config.to_mos_config();
        assert_eq!(mos.strategy, StrategyKind::Vote);
        assert_eq!(mos.gather_mode, GatherMode::Concurrent);
        assert!(mos.prompts.is_none());
    }

    #[test]
    fn test_default_config_reports_missing_roles() {
        let issues = FileConfig::default().validate();
        assert!(issues.iter().all(|i| i.is_error()));
        assert_eq!(
            codes(&issues),
            vec![
                &ConfigIssueCode::MissingRole {
                    role: "worker".to_string()
                },
                &ConfigIssueCode::MissingRole {
                    role: "voter".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_undefined_source() {
        let mut config: FileConfig = toml::from_str(VOTE_CONFIG).unwrap();
        config.roles.workers.push("ghost".to_string());

        let issues = config.validate();
        assert_eq!(
            codes(&issues),
            vec![&ConfigIssueCode::UndefinedSource {
                role: "worker".to_string(),
                source: "ghost".to_string()
            }]
        );
    }

    #[test]
    fn test_voter_without_select_best() {
        let mut config: FileConfig = toml::from_str(VOTE_CONFIG).unwrap();
        config.roles.voters = vec!["a".to_string()];

        let issues = config.validate();
        assert_eq!(
            codes(&issues),
            vec![&ConfigIssueCode::MissingCapability {
                source: "a".to_string(),
                capability: "select_best".to_string()
            }]
        );
    }

    #[test]
    fn test_arbitrating_president_needs_select_best() {
        let toml_str = r#"
[mos]
strategy = "discuss"
synthesis = "arbitration"

[roles]
founders = ["f"]
president = "p"

[sources.f]
command = "f"

[sources.p]
command = "p"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();
        assert!(matches!(
            codes(&issues)[..],
            [ConfigIssueCode::MissingCapability { source, .. }] if source == "p"
        ));
    }

    #[test]
    fn test_zero_rounds_warning() {
        let toml_str = r#"
[mos]
strategy = "discuss"
discussion_rounds = 0

[roles]
founders = ["f"]
president = "f"

[sources.f]
command = "f"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, ConfigIssueCode::ZeroRounds);
        assert!(!issues[0].is_error());
    }

    #[test]
    fn test_empty_command() {
        let mut config: FileConfig = toml::from_str(VOTE_CONFIG).unwrap();
        config.sources.get_mut("a").unwrap().command = "  ".to_string();

        let issues = config.validate();
        assert_eq!(
            codes(&issues),
            vec![&ConfigIssueCode::EmptyCommand {
                source: "a".to_string()
            }]
        );
    }

    #[test]
    fn test_sequential_gather() {
        let mut config: FileConfig = toml::from_str(VOTE_CONFIG).unwrap();
        config.mos.concurrent_gather = false;
        assert_eq!(config.to_mos_config().gather_mode, GatherMode::Sequential);
    }
}
