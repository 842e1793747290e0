//! Discuss-and-generate strategy
//!
//! Two phases:
//!
//! 1. **Discussion**: for `rounds` rounds, each founder in turn receives the
//!    query, the candidates and the transcript so far, and its reply is
//!    appended to the transcript. Strictly sequential: every founder sees
//!    every earlier turn.
//! 2. **Synthesis**: the transcript goes into a closing prompt.
//!    - [`SynthesisMode::Generative`]: the president answers it.
//!    - [`SynthesisMode::Arbitration`]: every founder answers it, then the
//!      president's `select_best` picks the final answer. By default
//!      ([`ArbitrationInput::OriginalQueryOnly`]) the founders' closing
//!      statements are only logged and the president chooses from an empty
//!      list given the original query.

use super::{AggregationStrategy, Decision, DecisionContext};
use crate::config::mos_config::DEFAULT_DISCUSSION_ROUNDS;
use crate::ports::answer_source::SharedSource;
use crate::ports::conversation_logger::RunEvent;
use crate::use_cases::run_mos::RunMosError;
use async_trait::async_trait;
use mos_domain::{
    ArbitrationInput, CandidateSet, Phase, PromptSet, Query, Role, StrategyKind, SynthesisMode,
    Transcript,
};
use tracing::{debug, info, warn};

pub struct DiscussStrategy {
    founders: Vec<SharedSource>,
    president: SharedSource,
    prompts: PromptSet,
    rounds: usize,
    synthesis: SynthesisMode,
    arbitration_input: ArbitrationInput,
}

impl DiscussStrategy {
    pub fn new(founders: Vec<SharedSource>, president: SharedSource) -> Self {
        Self {
            founders,
            president,
            prompts: PromptSet::discussion(),
            rounds: DEFAULT_DISCUSSION_ROUNDS,
            synthesis: SynthesisMode::default(),
            arbitration_input: ArbitrationInput::default(),
        }
    }

    pub fn with_prompts(mut self, prompts: PromptSet) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_synthesis(mut self, synthesis: SynthesisMode) -> Self {
        self.synthesis = synthesis;
        self
    }

    pub fn with_arbitration_input(mut self, input: ArbitrationInput) -> Self {
        self.arbitration_input = input;
        self
    }

    /// Phase 1: founders take turns refining the candidates
    async fn discuss(
        &self,
        query: &Query,
        candidates: &CandidateSet,
        ctx: &DecisionContext<'_>,
    ) -> Transcript {
        info!(
            "Discussion: {} rounds with {} founders",
            self.rounds,
            self.founders.len()
        );
        ctx.progress
            .on_phase_start(&Phase::Discussion, self.rounds * self.founders.len());

        let mut transcript = Transcript::new();

        for round in 1..=self.rounds {
            ctx.progress.on_round_start(round, self.rounds);

            for founder in &self.founders {
                let prompt = self
                    .prompts
                    .discussion_prompt(query.text(), candidates, &transcript);

                match founder.answer(&query.rephrase(prompt)).await {
                    Ok(turn) => {
                        debug!("Founder {} says: {}", founder.name(), turn);
                        ctx.log.record(RunEvent::DiscussionTurn {
                            round,
                            founder: founder.name(),
                            text: &turn,
                        });
                        ctx.progress
                            .on_task_complete(&Phase::Discussion, founder.name(), true);
                        transcript.append(turn);
                    }
                    Err(e) => {
                        warn!(
                            "Founder {} failed in round {}: {}",
                            founder.name(),
                            round,
                            e
                        );
                        ctx.progress
                            .on_task_complete(&Phase::Discussion, founder.name(), false);
                    }
                }
            }
        }

        ctx.progress.on_phase_complete(&Phase::Discussion);
        transcript
    }

    /// Phase 2 (generative): the president answers the closing prompt
    async fn conclude_generative(
        &self,
        query: &Query,
        synthesis_prompt: String,
        ctx: &DecisionContext<'_>,
    ) -> Result<String, RunMosError> {
        ctx.progress.on_phase_start(&Phase::Synthesis, 1);

        let result = self.president.answer(&query.rephrase(synthesis_prompt)).await;
        ctx.progress
            .on_task_complete(&Phase::Synthesis, self.president.name(), result.is_ok());
        ctx.progress.on_phase_complete(&Phase::Synthesis);
        result.map_err(|e| RunMosError::source_failed(Role::President, &self.president, e))
    }

    /// Phase 2 (arbitration): founders close, the president selects
    async fn conclude_arbitration(
        &self,
        query: &Query,
        synthesis_prompt: String,
        ctx: &DecisionContext<'_>,
    ) -> Result<String, RunMosError> {
        ctx.progress
            .on_phase_start(&Phase::Synthesis, self.founders.len() + 1);

        let closing = query.rephrase(synthesis_prompt);
        let mut verdicts = Vec::with_capacity(self.founders.len());

        for founder in &self.founders {
            match founder.answer(&closing).await {
                Ok(verdict) => {
                    debug!("Founder {} concludes: {}", founder.name(), verdict);
                    ctx.log.record(RunEvent::FounderVerdict {
                        founder: founder.name(),
                        text: &verdict,
                    });
                    ctx.progress
                        .on_task_complete(&Phase::Synthesis, founder.name(), true);
                    verdicts.push(verdict);
                }
                Err(e) => {
                    warn!("Founder {} failed to conclude: {}", founder.name(), e);
                    ctx.progress
                        .on_task_complete(&Phase::Synthesis, founder.name(), false);
                }
            }
        }

        let options: Vec<String> = match self.arbitration_input {
            ArbitrationInput::OriginalQueryOnly => {
                debug!(
                    "Discarding {} founder verdicts; president selects from the original query",
                    verdicts.len()
                );
                Vec::new()
            }
            ArbitrationInput::FounderVerdicts => {
                if verdicts.is_empty() {
                    ctx.progress.on_phase_complete(&Phase::Synthesis);
                    return Err(RunMosError::NoDecision(
                        "no founder produced a closing statement".to_string(),
                    ));
                }
                verdicts
            }
        };

        let result = self.president.select_best(query, &options).await;
        ctx.progress
            .on_task_complete(&Phase::Synthesis, self.president.name(), result.is_ok());
        ctx.progress.on_phase_complete(&Phase::Synthesis);
        result.map_err(|e| RunMosError::source_failed(Role::President, &self.president, e))
    }
}

#[async_trait]
impl AggregationStrategy for DiscussStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Discuss
    }

    async fn decide(
        &self,
        query: &Query,
        candidates: &CandidateSet,
        ctx: &DecisionContext<'_>,
    ) -> Result<Decision, RunMosError> {
        let transcript = self.discuss(query, candidates, ctx).await;
        let synthesis_prompt = self.prompts.synthesis_prompt(&transcript);

        let answer = match self.synthesis {
            SynthesisMode::Generative => {
                self.conclude_generative(query, synthesis_prompt, ctx)
                    .await?
            }
            SynthesisMode::Arbitration => {
                self.conclude_arbitration(query, synthesis_prompt, ctx)
                    .await?
            }
        };

        ctx.log.record(RunEvent::Synthesis {
            president: self.president.name(),
            mode: Some(self.synthesis),
            text: &answer,
        });
        info!(
            "President {} concluded after {} discussion turns",
            self.president.name(),
            transcript.len()
        );

        Ok(Decision::new(answer).with_transcript(transcript))
    }
}
