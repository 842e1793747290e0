//! Prompt templates for the mixture flow
//!
//! Templates are plain text with named placeholders: `{system}`, `{query}`,
//! `{ans}` and `{discussion}`. `{{` and `}}` stand for literal braces.
//! Unknown placeholders are left untouched.

use crate::mixture::{CandidateSet, Transcript};
use serde::{Deserialize, Serialize};

/// Separator between answers or discussion turns inside a template
pub const LIST_SEPARATOR: &str = "\n-";

const DISCUSS_PROMPT: &str = "given a natural language query and potential answers, your task is to discuss the responses, improving them and correcting any flaws";

const DISCUSSION_SYSTEM_PROMPT: &str = "given a natural language query and a discussion about it, your task is to generate a final answer, it needs to be short, factual and conversational";

const DISCUSSION_TEMPLATE: &str =
    "{system}\nquery: {query}\n\nresponses:{ans}\n\ndiscussion:{discussion}";

const GENERATION_SYSTEM_PROMPT: &str = "given a natural language query and search results, your task is to write a short and factual conversational response to the query";

const GENERATION_TEMPLATE: &str = "{system}\nquery: {query}\n\nsearch results:{ans}";

/// Fill the named placeholders of `template`
pub fn render_template(
    template: &str,
    system: &str,
    query: &str,
    ans: &str,
    discussion: &str,
) -> String {
    // Single pass so that placeholder-like text inside values is not expanded again
    let mut out = String::with_capacity(template.len() + ans.len() + discussion.len());
    let mut rest = template;
    while let Some(start) = rest.find(['{', '}']) {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        if let Some(escaped) = ["{{", "}}"].into_iter().find(|e| tail.starts_with(e)) {
            out.push_str(&escaped[..1]);
            rest = &tail[2..];
            continue;
        }

        let replacement = [
            ("{system}", system),
            ("{query}", query),
            ("{ans}", ans),
            ("{discussion}", discussion),
        ]
        .into_iter()
        .find(|(key, _)| tail.starts_with(key));

        match replacement {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len()..];
            }
            None => {
                out.push_str(&tail[..1]);
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// The prompt texts a strategy is constructed with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSet {
    /// Instruction for the final answer (synthesis or generation)
    pub system_prompt: String,
    /// Instruction for each discussion turn
    pub discuss_prompt: String,
    /// Template with `{system}`, `{query}`, `{ans}`, `{discussion}`
    pub prompt_template: String,
}

impl PromptSet {
    /// Defaults for the discussion strategy
    pub fn discussion() -> Self {
        Self {
            system_prompt: DISCUSSION_SYSTEM_PROMPT.to_string(),
            discuss_prompt: DISCUSS_PROMPT.to_string(),
            prompt_template: DISCUSSION_TEMPLATE.to_string(),
        }
    }

    /// Defaults for the generate and vote-generate strategies
    pub fn generation() -> Self {
        Self {
            system_prompt: GENERATION_SYSTEM_PROMPT.to_string(),
            discuss_prompt: DISCUSS_PROMPT.to_string(),
            prompt_template: GENERATION_TEMPLATE.to_string(),
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_discuss_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.discuss_prompt = prompt.into();
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.prompt_template = template.into();
        self
    }

    /// Prompt for one founder turn
    pub fn discussion_prompt(
        &self,
        query: &str,
        candidates: &CandidateSet,
        transcript: &Transcript,
    ) -> String {
        render_template(
            &self.prompt_template,
            &self.discuss_prompt,
            query,
            &candidates.joined(LIST_SEPARATOR),
            &transcript.joined(LIST_SEPARATOR),
        )
    }

    /// Prompt that asks for the conclusion of a discussion
    pub fn synthesis_prompt(&self, transcript: &Transcript) -> String {
        format!(
            "{}\n\nDiscussion:\n{}",
            self.system_prompt,
            transcript.joined("\n")
        )
    }

    /// Prompt that asks a king/president to write the answer from `answers`
    pub fn generation_prompt(&self, query: &str, answers: &[String]) -> String {
        render_template(
            &self.prompt_template,
            &self.system_prompt,
            query,
            &answers.join(LIST_SEPARATOR),
            "",
        )
    }
}

impl Default for PromptSet {
    fn default() -> Self {
        Self::discussion()
    }
}
