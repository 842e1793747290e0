//! Run mixture use case
//!
//! The coordinator: gather candidates from the workers, fall back to a fixed
//! sentence when nobody answered, otherwise hand the candidates to the
//! configured aggregation strategy.

use crate::config::{MosConfig, SourceRoster};
use crate::ports::answer_source::{SharedSource, SourceError};
use crate::ports::conversation_logger::{
    ConversationLogger, NoConversationLogger, RunEvent, RunId, RunLog,
};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::gather_responses::ResponseGatherer;
use crate::use_cases::strategies::{AggregationStrategy, DecisionContext, build_strategy};
use mos_domain::{MosReport, NO_ANSWER_FALLBACK, Query, Role, StrategyKind};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur during a mixture run
#[derive(Error, Debug)]
pub enum RunMosError {
    #[error("No {role} configured for strategy '{strategy}'")]
    MissingRole { role: Role, strategy: StrategyKind },

    #[error("{role} '{name}' failed: {error}")]
    SourceFailed {
        role: Role,
        name: String,
        #[source]
        error: SourceError,
    },

    #[error("No decision: {0}")]
    NoDecision(String),
}

impl RunMosError {
    pub(crate) fn source_failed(role: Role, source: &SharedSource, error: SourceError) -> Self {
        RunMosError::SourceFailed {
            role,
            name: source.name().to_string(),
            error,
        }
    }

    /// Configuration errors are raised at construction, never mid-run
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, RunMosError::MissingRole { .. })
    }
}

/// Top-level façade: one gatherer plus one aggregation strategy
///
/// Holds only construction-time state, so a single coordinator can serve
/// concurrent queries.
pub struct MosCoordinator {
    gatherer: ResponseGatherer,
    strategy: Box<dyn AggregationStrategy>,
    logger: Arc<dyn ConversationLogger>,
}

impl MosCoordinator {
    pub fn new(gatherer: ResponseGatherer, strategy: Box<dyn AggregationStrategy>) -> Self {
        Self {
            gatherer,
            strategy,
            logger: Arc::new(NoConversationLogger),
        }
    }

    /// Build the gatherer and the strategy selected by `config`.
    ///
    /// The discussion strategy falls back to its founders as workers when no
    /// workers are configured. Any other strategy needs at least one worker.
    pub fn from_config(config: &MosConfig, roster: SourceRoster) -> Result<Self, RunMosError> {
        let workers = if roster.workers.is_empty() && config.strategy == StrategyKind::Discuss {
            roster.founders.clone()
        } else {
            roster.workers.clone()
        };

        if workers.is_empty() {
            return Err(RunMosError::MissingRole {
                role: Role::Worker,
                strategy: config.strategy,
            });
        }

        let strategy = build_strategy(config, &roster)?;
        let gatherer = ResponseGatherer::new(workers).with_mode(config.gather_mode);

        info!(
            "Mixture ready: strategy={}, {:?}",
            config.strategy, roster
        );
        Ok(Self::new(gatherer, strategy))
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn strategy(&self) -> StrategyKind {
        self.strategy.kind()
    }

    /// Answer the query with the configured strategy
    pub async fn answer(&self, query: &Query) -> Result<String, RunMosError> {
        Ok(self.answer_with_progress(query, &NoProgress).await?.answer)
    }

    /// Answer the query and return everything the run produced
    pub async fn answer_with_report(&self, query: &Query) -> Result<MosReport, RunMosError> {
        self.answer_with_progress(query, &NoProgress).await
    }

    /// Answer the query with progress callbacks
    pub async fn answer_with_progress(
        &self,
        query: &Query,
        progress: &dyn ProgressNotifier,
    ) -> Result<MosReport, RunMosError> {
        let strategy = self.strategy.kind();
        let log = RunLog::new(RunId::next(), self.logger.as_ref());
        info!("{}: answering with strategy '{}': {}", log.id(), strategy, query);
        log.record(RunEvent::Started {
            query: query.text(),
            strategy,
        });

        let gathered = self.gatherer.gather(query, progress, log).await;

        let report = if gathered.candidates.is_empty() {
            warn!("Returning fallback answer, no worker produced a candidate");
            MosReport {
                query: query.text().to_string(),
                strategy,
                responses: gathered.responses,
                candidates: gathered.candidates,
                tally: None,
                transcript: None,
                answer: NO_ANSWER_FALLBACK.to_string(),
                fallback: true,
            }
        } else {
            let ctx = DecisionContext { progress, log };
            let decision = self
                .strategy
                .decide(query, &gathered.candidates, &ctx)
                .await?;

            MosReport {
                query: query.text().to_string(),
                strategy,
                responses: gathered.responses,
                candidates: gathered.candidates,
                tally: decision.tally,
                transcript: decision.transcript,
                answer: decision.answer,
                fallback: false,
            }
        };

        log.record(RunEvent::Finished { report: &report });
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatherMode;
    use crate::ports::answer_source::AnswerSource;
    use crate::use_cases::testing::{MockSource, query, shared};
    use async_trait::async_trait;
    use mos_domain::SynthesisMode;
    use std::sync::Mutex;

    fn paris_lyon_workers() -> Vec<SharedSource> {
        let a = MockSource::answering("a", "Paris").shared();
        let b = MockSource::answering("b", "Paris").shared();
        let c = MockSource::answering("c", "Lyon").shared();
        shared(&[&a, &b, &c])
    }

    fn failing_workers() -> Vec<SharedSource> {
        let a = MockSource::failing("a").shared();
        let b = MockSource::failing("b").shared();
        let c = MockSource::failing("c").shared();
        shared(&[&a, &b, &c])
    }

    #[tokio::test]
    async fn test_vote_scenario() {
        let v1 = MockSource::counting("v1").selecting("Paris").shared();
        let v2 = MockSource::counting("v2").selecting("Paris").shared();
        let roster = SourceRoster::new()
            .with_workers(paris_lyon_workers())
            .with_voters(shared(&[&v1, &v2]));

        let coordinator = MosCoordinator::from_config(&MosConfig::default(), roster).unwrap();
        let report = coordinator
            .answer_with_report(&query("What is the capital of France?"))
            .await
            .unwrap();

        assert_eq!(report.answer, "Paris");
        assert!(!report.fallback);
        assert_eq!(report.candidates.as_slice(), &["Paris", "Paris", "Lyon"]);
        assert_eq!(
            report.tally.unwrap().entries(),
            &[("Paris".to_string(), 2)]
        );
    }

    #[tokio::test]
    async fn test_vote_without_voters_is_configuration_error() {
        let roster = SourceRoster::new().with_workers(paris_lyon_workers());
        let err = MosCoordinator::from_config(&MosConfig::default(), roster)
            .err()
            .unwrap();

        assert!(err.is_configuration_error());
        assert!(matches!(
            err,
            RunMosError::MissingRole {
                role: Role::Voter,
                strategy: StrategyKind::Vote
            }
        ));
    }

    #[tokio::test]
    async fn test_no_workers_is_configuration_error() {
        let v1 = MockSource::counting("v1").selecting("Paris").shared();
        let roster = SourceRoster::new().with_voters(shared(&[&v1]));
        let err = MosCoordinator::from_config(&MosConfig::default(), roster)
            .err()
            .unwrap();
        assert!(matches!(
            err,
            RunMosError::MissingRole {
                role: Role::Worker,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_rerank_scenario() {
        let reranker = MockSource::counting("rr")
            .ranking(&[(0.9, "Lyon"), (0.4, "Paris")])
            .shared();
        let roster = SourceRoster::new()
            .with_workers(paris_lyon_workers())
            .with_reranker(reranker);

        let coordinator =
            MosCoordinator::from_config(&MosConfig::new(StrategyKind::Rerank), roster).unwrap();
        let answer = coordinator.answer(&query("q")).await.unwrap();
        assert_eq!(answer, "Lyon");
    }

    #[tokio::test]
    async fn test_all_workers_fail_returns_fallback() {
        for kind in StrategyKind::ALL {
            let voter = MockSource::counting("v").selecting("x").shared();
            let founder = MockSource::counting("f").shared();
            let president = MockSource::counting("p").selecting("x").shared();
            let reranker = MockSource::counting("r").ranking(&[(1.0, "x")]).shared();
            let roster = SourceRoster::new()
                .with_workers(failing_workers())
                .with_voters(shared(&[&voter]))
                .with_founders(shared(&[&founder]))
                .with_president(president.clone())
                .with_reranker(reranker.clone());

            let coordinator =
                MosCoordinator::from_config(&MosConfig::new(kind), roster).unwrap();
            let report = coordinator.answer_with_report(&query("q")).await.unwrap();

            assert_eq!(report.answer, "No answer could be gathered from workers.");
            assert!(report.fallback);
            assert_eq!(report.responses.len(), 3);
            // The strategy never ran
            assert!(voter.candidates_seen().is_empty());
            assert!(founder.prompts().is_empty());
            assert!(president.prompts().is_empty());
            assert!(reranker.candidates_seen().is_empty());
        }
    }

    #[tokio::test]
    async fn test_discuss_scenario_call_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let worker = MockSource::answering("w", "Paris").logging_to(&log).shared();
        let f1 = MockSource::counting("f1").logging_to(&log).shared();
        let f2 = MockSource::counting("f2").logging_to(&log).shared();
        let president = MockSource::answering("pres", "Paris it is.")
            .logging_to(&log)
            .shared();

        let roster = SourceRoster::new()
            .with_workers(shared(&[&worker]))
            .with_founders(shared(&[&f1, &f2]))
            .with_president(president);
        let config = MosConfig::new(StrategyKind::Discuss).with_discussion_rounds(1);

        let coordinator = MosCoordinator::from_config(&config, roster).unwrap();
        let report = coordinator.answer_with_report(&query("q")).await.unwrap();

        assert_eq!(report.answer, "Paris it is.");
        assert_eq!(report.transcript.unwrap().len(), 2);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["w:answer", "f1:answer", "f2:answer", "pres:answer"]
        );
    }

    #[tokio::test]
    async fn test_discuss_uses_founders_as_workers_by_default() {
        let f1 = MockSource::answering("f1", "Paris").shared();
        let president = MockSource::answering("pres", "final").shared();
        let roster = SourceRoster::new()
            .with_founders(shared(&[&f1]))
            .with_president(president);
        let config = MosConfig::new(StrategyKind::Discuss)
            .with_discussion_rounds(2)
            .with_synthesis(SynthesisMode::Generative);

        let coordinator = MosCoordinator::from_config(&config, roster).unwrap();
        let report = coordinator.answer_with_report(&query("q")).await.unwrap();

        assert_eq!(report.responses[0].source, "f1");
        // One gather call plus two discussion turns
        assert_eq!(f1.prompts().len(), 3);
        assert_eq!(f1.prompts()[0], "q");
    }

    #[tokio::test]
    async fn test_repeated_calls_are_idempotent() {
        let v1 = MockSource::counting("v1").selecting("Lyon").shared();
        let v2 = MockSource::counting("v2").selecting("Paris").shared();
        let roster = SourceRoster::new()
            .with_workers(paris_lyon_workers())
            .with_voters(shared(&[&v1, &v2]));
        let config = MosConfig::default().with_gather_mode(GatherMode::Concurrent);
        let coordinator = MosCoordinator::from_config(&config, roster).unwrap();

        let first = coordinator.answer(&query("q")).await.unwrap();
        for _ in 0..5 {
            assert_eq!(coordinator.answer(&query("q")).await.unwrap(), first);
        }
        assert_eq!(first, "Lyon");
    }

    #[tokio::test]
    async fn test_concurrent_queries_share_one_coordinator() {
        struct Echo;

        #[async_trait]
        impl AnswerSource for Echo {
            fn name(&self) -> &str {
                "echo"
            }

            async fn answer(&self, query: &Query) -> Result<String, SourceError> {
                Ok(query.text().to_string())
            }

            async fn rerank(
                &self,
                _query: &Query,
                candidates: &[String],
            ) -> Result<Vec<mos_domain::ScoredAnswer>, SourceError> {
                Ok(candidates
                    .iter()
                    .map(|c| mos_domain::ScoredAnswer::new(1.0, c.clone()))
                    .collect())
            }
        }

        let echo: SharedSource = Arc::new(Echo);
        let roster = SourceRoster::new()
            .with_workers(vec![Arc::clone(&echo)])
            .with_reranker(echo);
        let coordinator = Arc::new(
            MosCoordinator::from_config(&MosConfig::new(StrategyKind::Rerank), roster).unwrap(),
        );

        let mut handles = Vec::new();
        for i in 0..8 {
            let coordinator = Arc::clone(&coordinator);
            handles.push(tokio::spawn(async move {
                let q = Query::new(format!("question {}", i)).unwrap();
                (i, coordinator.answer(&q).await.unwrap())
            }));
        }

        for handle in handles {
            let (i, answer) = handle.await.unwrap();
            assert_eq!(answer, format!("question {}", i));
        }
    }

    struct Recorder(Mutex<Vec<(RunId, serde_json::Value)>>);

    impl ConversationLogger for Recorder {
        fn record(&self, run: RunId, event: &RunEvent<'_>) {
            let value = serde_json::to_value(event).unwrap();
            self.0.lock().unwrap().push((run, value));
        }
    }

    #[tokio::test]
    async fn test_run_closes_with_report() {
        let recorder = Arc::new(Recorder(Mutex::new(Vec::new())));
        let roster = SourceRoster::new()
            .with_workers(failing_workers())
            .with_voters(paris_lyon_workers());
        let coordinator = MosCoordinator::from_config(&MosConfig::default(), roster)
            .unwrap()
            .with_logger(recorder.clone());

        coordinator.answer(&query("q")).await.unwrap();

        let events = recorder.0.lock().unwrap();
        assert_eq!(events.first().unwrap().1["type"], "started");
        let (_, last) = events.last().unwrap();
        assert_eq!(last["type"], "finished");
        assert_eq!(last["report"]["fallback"], true);
        assert_eq!(last["report"]["strategy"], "vote");
        assert_eq!(last["report"]["answer"], NO_ANSWER_FALLBACK);
    }

    #[tokio::test]
    async fn test_each_run_gets_its_own_id() {
        let recorder = Arc::new(Recorder(Mutex::new(Vec::new())));
        let v1 = MockSource::counting("v1").selecting("Paris").shared();
        let roster = SourceRoster::new()
            .with_workers(paris_lyon_workers())
            .with_voters(shared(&[&v1]));
        let coordinator = MosCoordinator::from_config(&MosConfig::default(), roster)
            .unwrap()
            .with_logger(recorder.clone());

        coordinator.answer(&query("q")).await.unwrap();
        coordinator.answer(&query("q")).await.unwrap();

        let events = recorder.0.lock().unwrap();
        let first_run = events[0].0;
        let split = events.iter().position(|(run, _)| *run != first_run).unwrap();

        // started, three candidates, one ballot, finished
        assert_eq!(split, 6);
        assert!(events[..split].iter().all(|(run, _)| *run == first_run));
        assert!(events[split..].iter().all(|(run, _)| *run != first_run));
        assert_eq!(events[split - 1].1["type"], "finished");
        assert_eq!(events[split - 1].1["report"]["answer"], "Paris");
    }
}
