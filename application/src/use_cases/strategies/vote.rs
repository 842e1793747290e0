//! Plurality vote strategy
//!
//! Every voter picks one candidate with `select_best`; the answer with the
//! most votes wins, ties going to the answer that was picked first.

use super::{AggregationStrategy, Decision, DecisionContext};
use crate::ports::answer_source::SharedSource;
use crate::ports::conversation_logger::RunEvent;
use crate::use_cases::run_mos::RunMosError;
use async_trait::async_trait;
use futures::future::join_all;
use mos_domain::{CandidateSet, Phase, Query, StrategyKind, VoteTally};
use tracing::{debug, info, warn};

pub struct VoteStrategy {
    voters: Vec<SharedSource>,
}

impl VoteStrategy {
    pub fn new(voters: Vec<SharedSource>) -> Self {
        Self { voters }
    }
}

#[async_trait]
impl AggregationStrategy for VoteStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Vote
    }

    async fn decide(
        &self,
        query: &Query,
        candidates: &CandidateSet,
        ctx: &DecisionContext<'_>,
    ) -> Result<Decision, RunMosError> {
        let tally = poll_voters(&self.voters, query, candidates.as_slice(), ctx).await;

        let winner = tally
            .winner()
            .ok_or_else(|| RunMosError::NoDecision("no voter cast a vote".to_string()))?
            .to_string();

        info!("Vote winner: {} ({})", winner, tally.summary());
        Ok(Decision::new(winner).with_tally(tally))
    }
}

/// Ask every voter at once to pick one of `candidates`.
///
/// Ballots are counted in voter order, so ties resolve the same way no
/// matter which voter answers first. Whatever string a voter returns is
/// counted, even if it is not one of the candidates. A failing voter is
/// logged and its vote is dropped.
pub(crate) async fn poll_voters(
    voters: &[SharedSource],
    query: &Query,
    candidates: &[String],
    ctx: &DecisionContext<'_>,
) -> VoteTally {
    ctx.progress.on_phase_start(&Phase::Vote, voters.len());

    let ballots = join_all(
        voters
            .iter()
            .map(|voter| async move { (voter, voter.select_best(query, candidates).await) }),
    )
    .await;

    let mut tally = VoteTally::new();
    for (voter, ballot) in ballots {
        match ballot {
            Ok(choice) => {
                debug!("Voter {} picked: {}", voter.name(), choice);
                ctx.log.record(RunEvent::VoteCast {
                    voter: voter.name(),
                    choice: &choice,
                });
                ctx.progress.on_task_complete(&Phase::Vote, voter.name(), true);
                tally.record(choice);
            }
            Err(e) => {
                warn!("Voter {} failed: {}", voter.name(), e);
                ctx.progress.on_task_complete(&Phase::Vote, voter.name(), false);
            }
        }
    }

    ctx.progress.on_phase_complete(&Phase::Vote);
    tally
}
