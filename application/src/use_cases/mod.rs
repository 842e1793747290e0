//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod gather_responses;
pub mod run_mos;
pub mod strategies;

#[cfg(test)]
pub(crate) mod testing;
