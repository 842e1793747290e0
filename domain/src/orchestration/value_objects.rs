//! Orchestration value objects - immutable result types for a mixture run.
//!
//! - [`SourceResponse`] - one worker's outcome in the gather phase
//! - [`MosReport`] - everything a single `answer` call produced

use super::strategy::StrategyKind;
use crate::mixture::{CandidateSet, Transcript, VoteTally};
use serde::{Deserialize, Serialize};

/// Outcome of asking one worker during the gather phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceResponse {
    /// Name of the source that was asked
    pub source: String,
    /// The answer text (empty on failure)
    pub content: String,
    /// Whether the source answered with usable text
    pub success: bool,
    /// Error message if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SourceResponse {
    pub fn success(source: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            content: content.into(),
            success: true,
            error: None,
        }
    }

    pub fn failure(source: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            content: String::new(),
            success: false,
            error: Some(error.into()),
        }
    }

    /// The source answered, but with nothing usable
    pub fn empty(source: impl Into<String>) -> Self {
        Self::failure(source, "empty answer")
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

/// Complete record of one mixture run
///
/// Returned to the caller alongside the final answer; nothing here outlives
/// the call that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MosReport {
    /// The original query text
    pub query: String,
    /// Strategy that produced the answer
    pub strategy: StrategyKind,
    /// Per-worker outcomes, in worker configuration order
    pub responses: Vec<SourceResponse>,
    /// Usable candidate answers
    pub candidates: CandidateSet,
    /// Vote counts, for strategies that poll voters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tally: Option<VoteTally>,
    /// Discussion turns, for the discussion strategy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<Transcript>,
    /// The final answer
    pub answer: String,
    /// True when no candidate was gathered and the fallback text was returned
    pub fallback: bool,
}

impl MosReport {
    /// Number of workers that produced a usable answer
    pub fn successful_workers(&self) -> usize {
        self.responses.iter().filter(|r| r.success).count()
    }
}
