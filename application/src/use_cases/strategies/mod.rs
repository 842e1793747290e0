//! Aggregation strategies
//!
//! Each strategy turns a non-empty [`CandidateSet`] into one final answer.
//! They share one trait and are picked by [`StrategyKind`] at construction
//! time; adding a protocol means adding a variant, not a subclass.

pub mod discuss;
pub mod generate;
pub mod rerank;
pub mod vote;

pub use discuss::DiscussStrategy;
pub use generate::GenerateStrategy;
pub use rerank::RerankStrategy;
pub use vote::VoteStrategy;

use crate::config::{MosConfig, SourceRoster};
use crate::ports::answer_source::SharedSource;
use crate::ports::conversation_logger::RunLog;
use crate::ports::progress::ProgressNotifier;
use crate::use_cases::run_mos::RunMosError;
use async_trait::async_trait;
use mos_domain::{CandidateSet, Query, Role, StrategyKind, Transcript, VoteTally};

/// What a strategy decided, plus the intermediate state worth reporting
#[derive(Debug, Clone)]
pub struct Decision {
    pub answer: String,
    pub tally: Option<VoteTally>,
    pub transcript: Option<Transcript>,
}

impl Decision {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            tally: None,
            transcript: None,
        }
    }

    pub fn with_tally(mut self, tally: VoteTally) -> Self {
        self.tally = Some(tally);
        self
    }

    pub fn with_transcript(mut self, transcript: Transcript) -> Self {
        self.transcript = Some(transcript);
        self
    }
}

/// Per-call observers handed to a strategy
pub struct DecisionContext<'a> {
    pub progress: &'a dyn ProgressNotifier,
    pub log: RunLog<'a>,
}

/// A protocol that turns candidates into one answer
#[async_trait]
pub trait AggregationStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Decide the final answer. `candidates` is never empty.
    async fn decide(
        &self,
        query: &Query,
        candidates: &CandidateSet,
        ctx: &DecisionContext<'_>,
    ) -> Result<Decision, RunMosError>;
}

/// Build the strategy selected by `config` from the sources in `roster`
pub fn build_strategy(
    config: &MosConfig,
    roster: &SourceRoster,
) -> Result<Box<dyn AggregationStrategy>, RunMosError> {
    for role in config.strategy.required_roles() {
        if roster.count(*role) == 0 {
            return Err(RunMosError::MissingRole {
                role: *role,
                strategy: config.strategy,
            });
        }
    }

    let president = || required(roster.president.as_ref(), Role::President, config.strategy);
    let reranker = || required(roster.reranker.as_ref(), Role::Reranker, config.strategy);

    let strategy: Box<dyn AggregationStrategy> = match config.strategy {
        StrategyKind::Vote => Box::new(VoteStrategy::new(roster.voters.clone())),
        StrategyKind::Rerank => Box::new(RerankStrategy::new(reranker()?)),
        StrategyKind::VoteRerank => {
            Box::new(RerankStrategy::new(reranker()?).with_voters(roster.voters.clone()))
        }
        StrategyKind::Generate => Box::new(GenerateStrategy::new(
            president()?,
            config.effective_prompts(),
        )),
        StrategyKind::VoteGenerate => Box::new(
            GenerateStrategy::new(president()?, config.effective_prompts())
                .with_voters(roster.voters.clone()),
        ),
        StrategyKind::Discuss => Box::new(
            DiscussStrategy::new(roster.founders.clone(), president()?)
                .with_prompts(config.effective_prompts())
                .with_rounds(config.discussion_rounds)
                .with_synthesis(config.synthesis)
                .with_arbitration_input(config.arbitration_input),
        ),
    };

    Ok(strategy)
}

fn required(
    source: Option<&SharedSource>,
    role: Role,
    strategy: StrategyKind,
) -> Result<SharedSource, RunMosError> {
    source
        .cloned()
        .ok_or(RunMosError::MissingRole { role, strategy })
}
