//! Prompt templates used by the generative and discussion strategies

pub mod template;

pub use template::{PromptSet, render_template};
