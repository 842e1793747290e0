//! Discussion transcript shared by founders

use serde::{Deserialize, Serialize};

/// Append-only record of a multi-round discussion
///
/// Every founder turn is appended in call order, so each founder sees what
/// the previous founders said in this and earlier rounds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<String>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, turn: impl Into<String>) {
        self.turns.push(turn.into());
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn turns(&self) -> &[String] {
        &self.turns
    }

    pub fn joined(&self, separator: &str) -> String {
        self.turns.join(separator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let mut transcript = Transcript::new();
        transcript.append("first");
        transcript.append("second");
        assert_eq!(transcript.turns(), &["first", "second"]);
        assert_eq!(transcript.joined("\n"), "first\nsecond");
    }

    #[test]
    fn test_empty_transcript_joins_to_empty() {
        assert_eq!(Transcript::new().joined("\n-"), "");
    }
}
