//! Domain layer for mixture-of-solvers
//!
//! This crate contains the value objects the aggregation strategies work on.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Mixture of Solvers
//!
//! Several independent sources ("workers") answer the same query. Their
//! answers form a [`CandidateSet`], and an aggregation strategy turns that
//! set into one final answer:
//!
//! - **Vote**: voters pick a candidate each, a [`VoteTally`] decides
//! - **Rerank**: a reranker orders the candidates, the head wins
//! - **Discuss**: founders refine the candidates over several rounds in a
//!   shared [`Transcript`], then a president concludes
//!
//! See [`StrategyKind`] for the full list of protocols.

pub mod config;
pub mod core;
pub mod mixture;
pub mod orchestration;
pub mod prompt;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::{error::DomainError, query::Query};
pub use mixture::{CandidateSet, NO_ANSWER_FALLBACK, ScoredAnswer, Transcript, VoteTally};
pub use orchestration::{
    entities::{Capability, Phase, Role},
    strategy::{ArbitrationInput, StrategyKind, SynthesisMode},
    value_objects::{MosReport, SourceResponse},
};
pub use prompt::{PromptSet, render_template};
