//! Per-call deadline for any answer source

use async_trait::async_trait;
use mos_application::ports::answer_source::{AnswerSource, SharedSource, SourceError};
use mos_domain::{Query, ScoredAnswer};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Wraps a source so that every call fails with [`SourceError::Timeout`]
/// once `limit` has elapsed.
///
/// Dropping the inner future cancels the call; a [`CommandSource`](super::CommandSource)
/// kills its child process in that case.
pub struct TimeoutSource {
    inner: SharedSource,
    limit: Duration,
}

impl TimeoutSource {
    pub fn new(inner: SharedSource, limit: Duration) -> Self {
        Self { inner, limit }
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }

    async fn bounded<T>(
        &self,
        op: &str,
        call: impl Future<Output = Result<T, SourceError>>,
    ) -> Result<T, SourceError> {
        match tokio::time::timeout(self.limit, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "Source {} timed out after {:?} during {}",
                    self.inner.name(),
                    self.limit,
                    op
                );
                Err(SourceError::Timeout(self.limit))
            }
        }
    }
}

#[async_trait]
impl AnswerSource for TimeoutSource {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn answer(&self, query: &Query) -> Result<String, SourceError> {
        self.bounded("answer", self.inner.answer(query)).await
    }

    async fn select_best(
        &self,
        query: &Query,
        candidates: &[String],
    ) -> Result<String, SourceError> {
        self.bounded("select_best", self.inner.select_best(query, candidates))
            .await
    }

    async fn rerank(
        &self,
        query: &Query,
        candidates: &[String],
    ) -> Result<Vec<ScoredAnswer>, SourceError> {
        self.bounded("rerank", self.inner.rerank(query, candidates))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct Slow {
        delay: Duration,
    }

    #[async_trait]
    impl AnswerSource for Slow {
        fn name(&self) -> &str {
            "slow"
        }

        async fn answer(&self, _query: &Query) -> Result<String, SourceError> {
            tokio::time::sleep(self.delay).await;
            Ok("late answer".to_string())
        }
    }

    fn query() -> Query {
        Query::new("q").unwrap()
    }

    #[tokio::test]
    async fn test_fast_call_passes_through() {
        let source = TimeoutSource::new(
            Arc::new(Slow {
                delay: Duration::from_millis(1),
            }),
            Duration::from_secs(5),
        );
        assert_eq!(source.answer(&query()).await.unwrap(), "late answer");
        assert_eq!(source.name(), "slow");
    }

    #[tokio::test]
    async fn test_slow_call_times_out() {
        let source = TimeoutSource::new(
            Arc::new(Slow {
                delay: Duration::from_secs(5),
            }),
            Duration::from_millis(20),
        );
        let err = source.answer(&query()).await.unwrap_err();
        assert!(matches!(err, SourceError::Timeout(d) if d == Duration::from_millis(20)));
    }

    #[tokio::test]
    async fn test_errors_are_passed_through() {
        let source = TimeoutSource::new(
            Arc::new(Slow {
                delay: Duration::from_millis(1),
            }),
            Duration::from_secs(5),
        );
        // Slow does not override select_best
        let err = source.select_best(&query(), &[]).await.unwrap_err();
        assert!(matches!(err, SourceError::Unsupported("select_best")));
    }
}
