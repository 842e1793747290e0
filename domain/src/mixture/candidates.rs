//! Candidate answers gathered from workers

use serde::{Deserialize, Serialize};

/// Ordered candidate answers from one gather round (Value Object)
///
/// Order follows worker configuration order, not relevance. Duplicates are
/// kept: two workers agreeing is information the strategies may use.
/// Empty answers are never admitted. Any other text, whitespace included,
/// is kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateSet {
    answers: Vec<String>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an answer, ignoring it when empty.
    ///
    /// Returns `true` if the answer was admitted.
    pub fn push(&mut self, answer: impl Into<String>) -> bool {
        let answer = answer.into();
        if answer.is_empty() {
            return false;
        }
        self.answers.push(answer);
        true
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.answers
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.answers.iter()
    }

    /// Join the answers with `separator`, the form they take inside prompts
    pub fn joined(&self, separator: &str) -> String {
        self.answers.join(separator)
    }
}

impl<S: Into<String>> FromIterator<S> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = CandidateSet::new();
        for answer in iter {
            set.push(answer);
        }
        set
    }
}
