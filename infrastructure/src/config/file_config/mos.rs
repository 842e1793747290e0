//! Mixture configuration from TOML (`[mos]` section)

use mos_application::config::DEFAULT_DISCUSSION_ROUNDS;
use mos_domain::{
    ArbitrationInput, ConfigIssue, ConfigIssueCode, PromptSet, StrategyKind, SynthesisMode,
};
use serde::{Deserialize, Serialize};

/// Raw mixture configuration from TOML
///
/// # Example
///
/// ```toml
/// [mos]
/// strategy = "discuss"              # vote, rerank, vote-rerank, generate, vote-generate, discuss
/// synthesis = "generative"          # "generative" or "arbitration"
/// arbitration_input = "original-query-only"
/// discussion_rounds = 3
/// concurrent_gather = true
/// timeout_secs = 30
///
/// [mos.prompts]
/// system_prompt = "answer briefly"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileMosConfig {
    /// Aggregation strategy name
    pub strategy: String,
    /// How the discussion strategy concludes
    pub synthesis: String,
    /// What an arbitrating president sees
    pub arbitration_input: String,
    /// Number of discussion rounds
    pub discussion_rounds: usize,
    /// Call workers concurrently instead of one after another
    pub concurrent_gather: bool,
    /// Per-call timeout applied to every source without its own
    pub timeout_secs: Option<u64>,
    /// Prompt overrides
    pub prompts: FilePromptsConfig,
}

impl Default for FileMosConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default().to_string(),
            synthesis: SynthesisMode::default().to_string(),
            arbitration_input: ArbitrationInput::default().to_string(),
            discussion_rounds: DEFAULT_DISCUSSION_ROUNDS,
            concurrent_gather: true,
            timeout_secs: None,
            prompts: FilePromptsConfig::default(),
        }
    }
}

impl FileMosConfig {
    /// Parse the strategy name. Aliases such as `democracy` are accepted.
    pub fn parse_strategy(&self) -> (StrategyKind, Vec<ConfigIssue>) {
        match self.strategy.parse::<StrategyKind>() {
            Ok(kind) => (kind, vec![]),
            Err(_) => {
                let issue = ConfigIssue::error(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "mos.strategy".to_string(),
                        value: self.strategy.clone(),
                        valid_values: StrategyKind::ALL
                            .iter()
                            .map(|k| k.as_str().to_string())
                            .collect(),
                    },
                    format!("mos.strategy: unknown strategy '{}'", self.strategy),
                );
                (StrategyKind::default(), vec![issue])
            }
        }
    }

    pub fn parse_synthesis(&self) -> (SynthesisMode, Vec<ConfigIssue>) {
        match self.synthesis.parse::<SynthesisMode>() {
            Ok(mode) => (mode, vec![]),
            Err(_) => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "mos.synthesis".to_string(),
                        value: self.synthesis.clone(),
                        valid_values: vec!["generative".to_string(), "arbitration".to_string()],
                    },
                    format!(
                        "mos.synthesis: unknown value '{}', falling back to 'generative'",
                        self.synthesis
                    ),
                );
                (SynthesisMode::default(), vec![issue])
            }
        }
    }

    pub fn parse_arbitration_input(&self) -> (ArbitrationInput, Vec<ConfigIssue>) {
        match self.arbitration_input.parse::<ArbitrationInput>() {
            Ok(input) => (input, vec![]),
            Err(_) => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "mos.arbitration_input".to_string(),
                        value: self.arbitration_input.clone(),
                        valid_values: vec![
                            ArbitrationInput::OriginalQueryOnly.to_string(),
                            ArbitrationInput::FounderVerdicts.to_string(),
                        ],
                    },
                    format!(
                        "mos.arbitration_input: unknown value '{}', falling back to '{}'",
                        self.arbitration_input,
                        ArbitrationInput::default()
                    ),
                );
                (ArbitrationInput::default(), vec![issue])
            }
        }
    }
}

/// Raw prompt overrides from TOML (`[mos.prompts]` section)
///
/// Unset fields keep the default text of the selected strategy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePromptsConfig {
    pub system_prompt: Option<String>,
    pub discuss_prompt: Option<String>,
    pub prompt_template: Option<String>,
}

impl FilePromptsConfig {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the overrides on top of the defaults for `strategy`.
    ///
    /// Returns `None` when nothing is overridden.
    pub fn to_prompt_set(&self, strategy: StrategyKind) -> Option<PromptSet> {
        if self.is_empty() {
            return None;
        }

        let mut prompts = match strategy {
            StrategyKind::Discuss => PromptSet::discussion(),
            _ => PromptSet::generation(),
        };
        if let Some(system) = &self.system_prompt {
            prompts = prompts.with_system_prompt(system.as_str());
        }
        if let Some(discuss) = &self.discuss_prompt {
            prompts = prompts.with_discuss_prompt(discuss.as_str());
        }
        if let Some(template) = &self.prompt_template {
            prompts = prompts.with_template(template.as_str());
        }
        Some(prompts)
    }
}
