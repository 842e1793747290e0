//! Reranker output

use serde::{Deserialize, Serialize};

/// One entry of a reranker's output: a relevance score and the answer
///
/// Serializes as a `[score, text]` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredAnswer(pub f64, pub String);

impl ScoredAnswer {
    pub fn new(score: f64, text: impl Into<String>) -> Self {
        Self(score, text.into())
    }

    pub fn score(&self) -> f64 {
        self.0
    }

    pub fn text(&self) -> &str {
        &self.1
    }

    pub fn into_text(self) -> String {
        self.1
    }
}
