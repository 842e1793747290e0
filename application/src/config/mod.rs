//! Application-level configuration.
//!
//! - [`MosConfig`]: which strategy runs and with which parameters
//! - [`SourceRoster`]: which sources fill which role

pub mod mos_config;
pub mod roster;

pub use mos_config::{DEFAULT_DISCUSSION_ROUNDS, GatherMode, MosConfig};
pub use roster::SourceRoster;
