//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod answer_source;
pub mod conversation_logger;
pub mod progress;
