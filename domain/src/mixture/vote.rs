//! Plurality vote tally
//!
//! Voters pick one candidate each; the tally counts exact strings. A voter
//! that returns text outside the candidate set still gets its vote
//! recorded, the tally does not police membership.

use serde::{Deserialize, Serialize};

/// Vote counts per distinct answer, in insertion order
///
/// # Example
///
/// ```
/// use mos_domain::mixture::VoteTally;
///
/// let mut tally = VoteTally::new();
/// tally.record("Lyon");
/// tally.record("Paris");
/// tally.record("Paris");
/// assert_eq!(tally.winner(), Some("Paris"));
/// assert_eq!(tally.count("Paris"), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoteTally {
    entries: Vec<(String, usize)>,
}

impl VoteTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one vote for `answer`
    pub fn record(&mut self, answer: impl Into<String>) {
        let answer = answer.into();
        match self.entries.iter_mut().find(|(key, _)| *key == answer) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((answer, 1)),
        }
    }

    /// Answer with the most votes.
    ///
    /// Ties go to the answer that entered the tally first.
    pub fn winner(&self) -> Option<&str> {
        let mut best: Option<&(String, usize)> = None;
        for entry in &self.entries {
            match best {
                Some((_, count)) if entry.1 <= *count => {}
                _ => best = Some(entry),
            }
        }
        best.map(|(answer, _)| answer.as_str())
    }

    pub fn count(&self, answer: &str) -> usize {
        self.entries
            .iter()
            .find(|(key, _)| key == answer)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    /// Distinct answers that received at least one vote, first-seen order
    pub fn selections(&self) -> Vec<String> {
        self.entries.iter().map(|(answer, _)| answer.clone()).collect()
    }

    pub fn entries(&self) -> &[(String, usize)] {
        &self.entries
    }

    pub fn total_votes(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Visual summary, e.g. `Paris ●● | Lyon ●`
    pub fn summary(&self) -> String {
        self.entries
            .iter()
            .map(|(answer, count)| format!("{} {}", answer, "●".repeat(*count)))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}
