//! Orchestration domain: phases, roles, strategy selection and per-call
//! reports.

pub mod entities;
pub mod strategy;
pub mod value_objects;
