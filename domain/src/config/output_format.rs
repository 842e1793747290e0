//! Output format value object

use serde::{Deserialize, Serialize};

/// How a mixture result is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Only the final answer (default)
    #[default]
    Answer,
    /// Candidates, votes, discussion and the final answer
    Full,
    /// JSON report
    Json,
}
