//! Mixture configuration: construction-time strategy parameters.
//!
//! Everything here is fixed when the coordinator is built and never changes
//! afterwards; concurrent `answer` calls share it read-only.

use mos_domain::{ArbitrationInput, PromptSet, StrategyKind, SynthesisMode};
use serde::{Deserialize, Serialize};

/// Default number of discussion rounds
pub const DEFAULT_DISCUSSION_ROUNDS: usize = 3;

/// How workers are called during the gather phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GatherMode {
    /// One worker after another
    Sequential,
    /// All workers at once; results are re-ordered by worker index
    #[default]
    Concurrent,
}

/// Strategy selection and parameters.
///
/// | Field               | Used by                         |
/// |---------------------|---------------------------------|
/// | `strategy`          | all                             |
/// | `synthesis`         | discuss                         |
/// | `arbitration_input` | discuss + arbitration           |
/// | `discussion_rounds` | discuss                         |
/// | `gather_mode`       | all                             |
/// | `prompts`           | generate, vote-generate, discuss|
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MosConfig {
    pub strategy: StrategyKind,
    pub synthesis: SynthesisMode,
    pub arbitration_input: ArbitrationInput,
    pub discussion_rounds: usize,
    pub gather_mode: GatherMode,
    /// Prompt texts; `None` uses the defaults of the selected strategy.
    pub prompts: Option<PromptSet>,
}

impl Default for MosConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::default(),
            synthesis: SynthesisMode::default(),
            arbitration_input: ArbitrationInput::default(),
            discussion_rounds: DEFAULT_DISCUSSION_ROUNDS,
            gather_mode: GatherMode::default(),
            prompts: None,
        }
    }
}

impl MosConfig {
    pub fn new(strategy: StrategyKind) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_synthesis(mut self, synthesis: SynthesisMode) -> Self {
        self.synthesis = synthesis;
        self
    }

    pub fn with_arbitration_input(mut self, input: ArbitrationInput) -> Self {
        self.arbitration_input = input;
        self
    }

    pub fn with_discussion_rounds(mut self, rounds: usize) -> Self {
        self.discussion_rounds = rounds;
        self
    }

    pub fn with_gather_mode(mut self, mode: GatherMode) -> Self {
        self.gather_mode = mode;
        self
    }

    pub fn with_prompts(mut self, prompts: PromptSet) -> Self {
        self.prompts = Some(prompts);
        self
    }

    /// Prompts to use, falling back to the strategy's defaults
    pub fn effective_prompts(&self) -> PromptSet {
        match (&self.prompts, self.strategy) {
            (Some(prompts), _) => prompts.clone(),
            (None, StrategyKind::Discuss) => PromptSet::discussion(),
            (None, _) => PromptSet::generation(),
        }
    }
}
