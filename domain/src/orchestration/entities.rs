//! Orchestration domain entities

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Phase of a mixture run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Workers produce the candidate answers
    Gather,
    /// Voters pick one candidate each
    Vote,
    /// A reranker orders candidates by relevance
    Rerank,
    /// Founders refine the candidates over several rounds
    Discussion,
    /// President/king produces or selects the final answer
    Synthesis,
}

impl Phase {
    pub fn as_str(&self) -> &str {
        match self {
            Phase::Gather => "gather",
            Phase::Vote => "vote",
            Phase::Rerank => "rerank",
            Phase::Discussion => "discussion",
            Phase::Synthesis => "synthesis",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Phase::Gather => "Gather Candidates",
            Phase::Vote => "Vote",
            Phase::Rerank => "Rerank",
            Phase::Discussion => "Discussion",
            Phase::Synthesis => "Synthesis",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Role a source plays in a mixture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Worker,
    Voter,
    Founder,
    /// Final arbiter; called "king" by the single-arbiter strategies
    President,
    Reranker,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Worker => "worker",
            Role::Voter => "voter",
            Role::Founder => "founder",
            Role::President => "president",
            Role::Reranker => "reranker",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Contract method a source is able to serve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Answer,
    SelectBest,
    Rerank,
}

impl Capability {
    pub const ALL: [Capability; 3] = [
        Capability::Answer,
        Capability::SelectBest,
        Capability::Rerank,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Answer => "answer",
            Capability::SelectBest => "select_best",
            Capability::Rerank => "rerank",
        }
    }
}

impl std::str::FromStr for Capability {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "answer" => Ok(Capability::Answer),
            "select_best" | "select" => Ok(Capability::SelectBest),
            "rerank" => Ok(Capability::Rerank),
            _ => Err(DomainError::UnknownCapability(s.to_string())),
        }
    }
}
