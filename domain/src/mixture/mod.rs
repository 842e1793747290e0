//! Mixture-of-solvers aggregation domain
//!
//! The data every aggregation strategy works on. All of it is built fresh
//! for a single `answer` call and dropped afterwards.
//!
//! ```text
//! workers ──▶ CandidateSet ──┬──▶ VoteTally ──────▶ winner / selections
//!                            ├──▶ ScoredAnswer[] ─▶ head
//!                            └──▶ Transcript ─────▶ synthesis prompt
//! ```

pub mod candidates;
pub mod discussion;
pub mod ranking;
pub mod vote;

pub use candidates::CandidateSet;
pub use discussion::Transcript;
pub use ranking::ScoredAnswer;
pub use vote::VoteTally;

/// Returned when no candidate could be gathered from any worker
pub const NO_ANSWER_FALLBACK: &str = "No answer could be gathered from workers.";
