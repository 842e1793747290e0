//! Aggregation strategy selection
//!
//! Which protocol turns N candidates into one answer is a construction-time
//! choice. The variants replace a family of near-identical solver classes:
//!
//! | Kind            | Roles used                 | Final step                          |
//! |-----------------|----------------------------|-------------------------------------|
//! | `Vote`          | voters                     | plurality winner                    |
//! | `Rerank`        | reranker                   | head of the reranked list           |
//! | `VoteRerank`    | voters, reranker           | rerank the distinct selections      |
//! | `Generate`      | president (king)           | generate over all candidates        |
//! | `VoteGenerate`  | voters, president          | generate over the distinct selections |
//! | `Discuss`       | founders, president        | discussion rounds, then synthesis   |

use super::entities::Role;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Aggregation protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    #[default]
    Vote,
    Rerank,
    VoteRerank,
    Generate,
    VoteGenerate,
    Discuss,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 6] = [
        StrategyKind::Vote,
        StrategyKind::Rerank,
        StrategyKind::VoteRerank,
        StrategyKind::Generate,
        StrategyKind::VoteGenerate,
        StrategyKind::Discuss,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Vote => "vote",
            StrategyKind::Rerank => "rerank",
            StrategyKind::VoteRerank => "vote-rerank",
            StrategyKind::Generate => "generate",
            StrategyKind::VoteGenerate => "vote-generate",
            StrategyKind::Discuss => "discuss",
        }
    }

    /// Roles that must have at least one source besides the workers
    pub fn required_roles(&self) -> &'static [Role] {
        match self {
            StrategyKind::Vote => &[Role::Voter],
            StrategyKind::Rerank => &[Role::Reranker],
            StrategyKind::VoteRerank => &[Role::Voter, Role::Reranker],
            StrategyKind::Generate => &[Role::President],
            StrategyKind::VoteGenerate => &[Role::Voter, Role::President],
            StrategyKind::Discuss => &[Role::Founder, Role::President],
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StrategyKind::Vote => "Voters pick a candidate; plurality wins",
            StrategyKind::Rerank => "A reranker orders the candidates; the top one wins",
            StrategyKind::VoteRerank => "Voters shortlist candidates; a reranker picks one",
            StrategyKind::Generate => "A king writes the answer from all candidates",
            StrategyKind::VoteGenerate => "Voters shortlist candidates; a president writes the answer",
            StrategyKind::Discuss => "Founders discuss over several rounds; a president concludes",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "vote" | "democracy" => Ok(StrategyKind::Vote),
            "rerank" | "reranker-king" => Ok(StrategyKind::Rerank),
            "vote-rerank" | "reranker-democracy" => Ok(StrategyKind::VoteRerank),
            "generate" | "generative-king" => Ok(StrategyKind::Generate),
            "vote-generate" | "generative-democracy" => Ok(StrategyKind::VoteGenerate),
            "discuss" | "duopoly" => Ok(StrategyKind::Discuss),
            _ => Err(DomainError::UnknownStrategy(s.to_string())),
        }
    }
}

/// How a discussion is concluded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynthesisMode {
    /// The president answers the synthesis prompt; that answer is final
    #[default]
    Generative,
    /// Founders answer the synthesis prompt, then the president selects
    Arbitration,
}

impl fmt::Display for SynthesisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthesisMode::Generative => write!(f, "generative"),
            SynthesisMode::Arbitration => write!(f, "arbitration"),
        }
    }
}

impl FromStr for SynthesisMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "generative" | "generate" => Ok(SynthesisMode::Generative),
            "arbitration" | "rerank" | "select" => Ok(SynthesisMode::Arbitration),
            _ => Err(DomainError::UnknownSynthesisMode(s.to_string())),
        }
    }
}

/// What the president chooses from in [`SynthesisMode::Arbitration`]
///
/// `OriginalQueryOnly` reproduces the established behaviour: the founders'
/// closing statements are collected and logged but the president only sees
/// the original query with an empty candidate list. `FounderVerdicts` is
/// the opt-in stricter mode that hands those statements to the president.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArbitrationInput {
    #[default]
    OriginalQueryOnly,
    FounderVerdicts,
}

impl fmt::Display for ArbitrationInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArbitrationInput::OriginalQueryOnly => write!(f, "original-query-only"),
            ArbitrationInput::FounderVerdicts => write!(f, "founder-verdicts"),
        }
    }
}

impl FromStr for ArbitrationInput {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "original-query-only" | "query" => Ok(ArbitrationInput::OriginalQueryOnly),
            "founder-verdicts" | "verdicts" => Ok(ArbitrationInput::FounderVerdicts),
            _ => Err(DomainError::UnknownArbitrationInput(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_round_trips_through_str() {
        for kind in StrategyKind::ALL {
            assert_eq!(kind.as_str().parse::<StrategyKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_strategy_legacy_aliases() {
        assert_eq!("democracy".parse::<StrategyKind>().unwrap(), StrategyKind::Vote);
        assert_eq!("Duopoly".parse::<StrategyKind>().unwrap(), StrategyKind::Discuss);
        assert_eq!(
            "generative_democracy".parse::<StrategyKind>().unwrap(),
            StrategyKind::VoteGenerate
        );
    }

    #[test]
    fn test_unknown_strategy() {
        let err = "oligarchy".parse::<StrategyKind>().unwrap_err();
        assert_eq!(err, DomainError::UnknownStrategy("oligarchy".to_string()));
    }

    #[test]
    fn test_required_roles() {
        assert_eq!(StrategyKind::Vote.required_roles(), &[Role::Voter]);
        assert!(StrategyKind::Discuss.required_roles().contains(&Role::Founder));
        assert!(StrategyKind::Discuss.required_roles().contains(&Role::President));
    }

    #[test]
    fn test_synthesis_defaults() {
        assert_eq!(SynthesisMode::default(), SynthesisMode::Generative);
        assert_eq!(ArbitrationInput::default(), ArbitrationInput::OriginalQueryOnly);
        assert_eq!(
            "arbitration".parse::<SynthesisMode>().unwrap(),
            SynthesisMode::Arbitration
        );
    }

    #[test]
    fn test_strategy_serde_kebab() {
        let json = serde_json::to_string(&StrategyKind::VoteRerank).unwrap();
        assert_eq!(json, "\"vote-rerank\"");
    }
}
