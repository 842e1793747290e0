//! Answer source port
//!
//! Defines the contract every worker, voter, founder, president and
//! reranker satisfies. Implementations (adapters) live in the
//! infrastructure layer; the application layer only calls these methods.

use async_trait::async_trait;
use mos_domain::{Query, ScoredAnswer};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when calling an answer source
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Source does not support {0}")]
    Unsupported(&'static str),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Other error: {0}")]
    Other(String),
}

/// An opaque answer-producing collaborator
///
/// Only [`answer`](AnswerSource::answer) is mandatory. Sources that can
/// choose among candidates override [`select_best`](AnswerSource::select_best),
/// and rerankers override [`rerank`](AnswerSource::rerank).
#[async_trait]
pub trait AnswerSource: Send + Sync {
    /// Name used in logs, progress output and reports
    fn name(&self) -> &str;

    /// Answer the query. The language and units hints travel inside `query`.
    async fn answer(&self, query: &Query) -> Result<String, SourceError>;

    /// Pick the best of `candidates`.
    ///
    /// The result is expected to be one of `candidates`, but callers do not
    /// enforce it.
    async fn select_best(
        &self,
        _query: &Query,
        _candidates: &[String],
    ) -> Result<String, SourceError> {
        Err(SourceError::Unsupported("select_best"))
    }

    /// Order `candidates` by relevance, most relevant first
    async fn rerank(
        &self,
        _query: &Query,
        _candidates: &[String],
    ) -> Result<Vec<ScoredAnswer>, SourceError> {
        Err(SourceError::Unsupported("rerank"))
    }
}

/// Shared handle to a source; the same source may serve several roles
pub type SharedSource = Arc<dyn AnswerSource>;
