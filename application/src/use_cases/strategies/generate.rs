//! Generative strategy
//!
//! A king (or, after a vote, a president) writes the final answer from a
//! prompt that lists the candidates. Without voters every candidate goes
//! into the prompt; with voters only the distinct picks do.

use super::vote::poll_voters;
use super::{AggregationStrategy, Decision, DecisionContext};
use crate::ports::answer_source::SharedSource;
use crate::ports::conversation_logger::RunEvent;
use crate::use_cases::run_mos::RunMosError;
use async_trait::async_trait;
use mos_domain::{CandidateSet, Phase, PromptSet, Query, Role, StrategyKind};
use tracing::{debug, info};

pub struct GenerateStrategy {
    king: SharedSource,
    prompts: PromptSet,
    voters: Vec<SharedSource>,
}

impl GenerateStrategy {
    pub fn new(king: SharedSource, prompts: PromptSet) -> Self {
        Self {
            king,
            prompts,
            voters: Vec::new(),
        }
    }

    /// Shortlist with `voters` before generating
    pub fn with_voters(mut self, voters: Vec<SharedSource>) -> Self {
        self.voters = voters;
        self
    }

    async fn generate(
        &self,
        query: &Query,
        answers: &[String],
        ctx: &DecisionContext<'_>,
    ) -> Result<String, RunMosError> {
        ctx.progress.on_phase_start(&Phase::Synthesis, 1);

        let prompt = self.prompts.generation_prompt(query.text(), answers);
        debug!("Generation prompt for {}:\n{}", self.king.name(), prompt);

        let result = self.king.answer(&query.rephrase(prompt)).await;
        ctx.progress
            .on_task_complete(&Phase::Synthesis, self.king.name(), result.is_ok());
        ctx.progress.on_phase_complete(&Phase::Synthesis);
        let answer = result.map_err(|e| RunMosError::source_failed(Role::President, &self.king, e))?;

        ctx.log.record(RunEvent::Synthesis {
            president: self.king.name(),
            mode: None,
            text: &answer,
        });
        Ok(answer)
    }
}

#[async_trait]
impl AggregationStrategy for GenerateStrategy {
    fn kind(&self) -> StrategyKind {
        if self.voters.is_empty() {
            StrategyKind::Generate
        } else {
            StrategyKind::VoteGenerate
        }
    }

    async fn decide(
        &self,
        query: &Query,
        candidates: &CandidateSet,
        ctx: &DecisionContext<'_>,
    ) -> Result<Decision, RunMosError> {
        if self.voters.is_empty() {
            let answer = self.generate(query, candidates.as_slice(), ctx).await?;
            info!("King {} generated the final answer", self.king.name());
            return Ok(Decision::new(answer));
        }

        let tally = poll_voters(&self.voters, query, candidates.as_slice(), ctx).await;
        if tally.is_empty() {
            return Err(RunMosError::NoDecision(
                "no voter shortlisted a candidate".to_string(),
            ));
        }

        let answer = self.generate(query, &tally.selections(), ctx).await?;
        info!("President {} generated the final answer", self.king.name());
        Ok(Decision::new(answer).with_tally(tally))
    }
}
