//! Gather responses use case
//!
//! Fans a query out to every worker and collects the usable answers.
//! A failing worker is logged and left out; it never aborts the gather.

use crate::config::GatherMode;
use crate::ports::answer_source::SharedSource;
use crate::ports::conversation_logger::{RunEvent, RunLog};
use crate::ports::progress::ProgressNotifier;
use mos_domain::{CandidateSet, Phase, Query, SourceResponse};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Result of one gather round
#[derive(Debug, Clone, Default)]
pub struct Gathered {
    /// One entry per worker, in worker order
    pub responses: Vec<SourceResponse>,
    /// The usable answers, in worker order
    pub candidates: CandidateSet,
}

/// Fan-out caller over a fixed list of workers
pub struct ResponseGatherer {
    workers: Vec<SharedSource>,
    mode: GatherMode,
}

impl ResponseGatherer {
    pub fn new(workers: Vec<SharedSource>) -> Self {
        Self {
            workers,
            mode: GatherMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: GatherMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn workers(&self) -> &[SharedSource] {
        &self.workers
    }

    /// Ask every worker and collect the non-empty answers
    pub async fn gather(
        &self,
        query: &Query,
        progress: &dyn ProgressNotifier,
        log: RunLog<'_>,
    ) -> Gathered {
        info!(
            "Gathering candidates from {} workers ({:?})",
            self.workers.len(),
            self.mode
        );
        progress.on_phase_start(&Phase::Gather, self.workers.len());

        let responses = match self.mode {
            GatherMode::Sequential => self.gather_sequential(query, progress).await,
            GatherMode::Concurrent => self.gather_concurrent(query, progress).await,
        };

        let mut candidates = CandidateSet::new();
        for response in responses.iter().filter(|r| r.success) {
            candidates.push(response.content.clone());
            log.record(RunEvent::CandidateGathered {
                worker: &response.source,
                text: &response.content,
            });
        }

        if candidates.is_empty() {
            warn!("No answers gathered from workers.");
        }

        progress.on_phase_complete(&Phase::Gather);
        Gathered {
            responses,
            candidates,
        }
    }

    async fn gather_sequential(
        &self,
        query: &Query,
        progress: &dyn ProgressNotifier,
    ) -> Vec<SourceResponse> {
        let mut responses = Vec::with_capacity(self.workers.len());
        for worker in &self.workers {
            let response = Self::ask(worker, query).await;
            progress.on_task_complete(&Phase::Gather, worker.name(), response.success);
            responses.push(response);
        }
        responses
    }

    async fn gather_concurrent(
        &self,
        query: &Query,
        progress: &dyn ProgressNotifier,
    ) -> Vec<SourceResponse> {
        let mut join_set = JoinSet::new();

        for (index, worker) in self.workers.iter().enumerate() {
            let worker = Arc::clone(worker);
            let query = query.clone();

            join_set.spawn(async move {
                let response = Self::ask(&worker, &query).await;
                (index, response)
            });
        }

        // Completion order is arbitrary; slot results by worker index
        let mut slots: Vec<Option<SourceResponse>> = vec![None; self.workers.len()];

        while let Some(result) = join_set.join_next().await {
            match result {
                Ok((index, response)) => {
                    progress.on_task_complete(&Phase::Gather, &response.source, response.success);
                    slots[index] = Some(response);
                }
                Err(e) => {
                    warn!("Worker task join error: {}", e);
                }
            }
        }

        slots
            .into_iter()
            .zip(&self.workers)
            .map(|(slot, worker)| {
                slot.unwrap_or_else(|| {
                    progress.on_task_complete(&Phase::Gather, worker.name(), false);
                    SourceResponse::failure(worker.name(), "worker task aborted")
                })
            })
            .collect()
    }

    async fn ask(worker: &SharedSource, query: &Query) -> SourceResponse {
        match worker.answer(query).await {
            Ok(answer) if answer.is_empty() => {
                debug!("Worker {} returned an empty answer", worker.name());
                SourceResponse::empty(worker.name())
            }
            Ok(answer) => {
                debug!("Worker {} answered: {}", worker.name(), answer);
                SourceResponse::success(worker.name(), answer)
            }
            Err(e) => {
                warn!("Error from worker {}: {}", worker.name(), e);
                SourceResponse::failure(worker.name(), e.to_string())
            }
        }
    }
}
