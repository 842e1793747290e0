//! Core domain concepts shared across all subdomains.
//!
//! - [`query::Query`]: a validated query with its language and unit hints
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod query;
