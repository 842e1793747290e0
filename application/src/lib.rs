//! Application layer for mixture-of-solvers
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{GatherMode, MosConfig, SourceRoster};
pub use ports::{
    answer_source::{AnswerSource, SharedSource, SourceError},
    conversation_logger::{ConversationLogger, NoConversationLogger, RunEvent, RunId, RunLog},
    progress::{NoProgress, ProgressNotifier},
};
pub use use_cases::gather_responses::{Gathered, ResponseGatherer};
pub use use_cases::run_mos::{MosCoordinator, RunMosError};
pub use use_cases::strategies::{AggregationStrategy, Decision, DecisionContext, build_strategy};
