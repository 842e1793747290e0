//! Rerank strategy
//!
//! A single reranker orders the candidates and its first entry is the
//! answer. The reranker's order is trusted as-is, scores are only logged.
//! With voters attached, the voters first shortlist candidates and only the
//! distinct picks are reranked.

use super::vote::poll_voters;
use super::{AggregationStrategy, Decision, DecisionContext};
use crate::ports::answer_source::SharedSource;
use crate::ports::conversation_logger::RunEvent;
use crate::use_cases::run_mos::RunMosError;
use async_trait::async_trait;
use mos_domain::{CandidateSet, Phase, Query, Role, StrategyKind};
use tracing::{debug, info};

pub struct RerankStrategy {
    reranker: SharedSource,
    voters: Vec<SharedSource>,
}

impl RerankStrategy {
    pub fn new(reranker: SharedSource) -> Self {
        Self {
            reranker,
            voters: Vec::new(),
        }
    }

    /// Shortlist with `voters` before reranking
    pub fn with_voters(mut self, voters: Vec<SharedSource>) -> Self {
        self.voters = voters;
        self
    }

    async fn rerank_head(
        &self,
        query: &Query,
        candidates: &[String],
        ctx: &DecisionContext<'_>,
    ) -> Result<String, RunMosError> {
        ctx.progress.on_phase_start(&Phase::Rerank, 1);

        let ranked = match self.reranker.rerank(query, candidates).await {
            Ok(ranked) => ranked,
            Err(e) => {
                ctx.progress
                    .on_task_complete(&Phase::Rerank, self.reranker.name(), false);
                ctx.progress.on_phase_complete(&Phase::Rerank);
                return Err(RunMosError::source_failed(Role::Reranker, &self.reranker, e));
            }
        };

        for entry in &ranked {
            debug!("ReRanker score: {} - {}", entry.score(), entry.text());
        }
        ctx.log.record(RunEvent::Reranked {
            reranker: self.reranker.name(),
            ranking: &ranked,
        });

        let head = ranked.into_iter().next();
        ctx.progress
            .on_task_complete(&Phase::Rerank, self.reranker.name(), head.is_some());
        ctx.progress.on_phase_complete(&Phase::Rerank);

        head.map(|entry| entry.into_text()).ok_or_else(|| {
            RunMosError::NoDecision(format!(
                "reranker {} returned an empty ranking",
                self.reranker.name()
            ))
        })
    }
}

#[async_trait]
impl AggregationStrategy for RerankStrategy {
    fn kind(&self) -> StrategyKind {
        if self.voters.is_empty() {
            StrategyKind::Rerank
        } else {
            StrategyKind::VoteRerank
        }
    }

    async fn decide(
        &self,
        query: &Query,
        candidates: &CandidateSet,
        ctx: &DecisionContext<'_>,
    ) -> Result<Decision, RunMosError> {
        if self.voters.is_empty() {
            let answer = self.rerank_head(query, candidates.as_slice(), ctx).await?;
            info!("Reranker {} picked: {}", self.reranker.name(), answer);
            return Ok(Decision::new(answer));
        }

        let tally = poll_voters(&self.voters, query, candidates.as_slice(), ctx).await;
        if tally.is_empty() {
            return Err(RunMosError::NoDecision(
                "no voter shortlisted a candidate".to_string(),
            ));
        }

        let shortlist = tally.selections();
        debug!("Shortlist after voting: {:?}", shortlist);
        let answer = self.rerank_head(query, &shortlist, ctx).await?;
        info!("Reranker {} picked from shortlist: {}", self.reranker.name(), answer);
        Ok(Decision::new(answer).with_tally(tally))
    }
}
