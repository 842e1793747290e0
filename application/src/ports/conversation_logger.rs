//! Run transcript port
//!
//! Every coordinator call is one run with its own [`RunId`]. The gatherer
//! and the strategies describe what each source said as [`RunEvent`]s, and
//! a [`ConversationLogger`] decides where they end up. A run always closes
//! with [`RunEvent::Finished`], which carries the whole [`MosReport`].
//!
//! `tracing` remains the diagnostic channel; this port is the record of the
//! conversation itself.

use mos_domain::{MosReport, ScoredAnswer, StrategyKind, SynthesisMode};
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one coordinator call within the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RunId(u64);

impl RunId {
    /// Take the next id from a process-wide counter starting at 1
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        RunId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run-{}", self.0)
    }
}

/// Something a source said, or the outcome of the run
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunEvent<'a> {
    Started {
        query: &'a str,
        strategy: StrategyKind,
    },
    CandidateGathered {
        worker: &'a str,
        text: &'a str,
    },
    VoteCast {
        voter: &'a str,
        choice: &'a str,
    },
    Reranked {
        reranker: &'a str,
        ranking: &'a [ScoredAnswer],
    },
    DiscussionTurn {
        round: usize,
        founder: &'a str,
        text: &'a str,
    },
    FounderVerdict {
        founder: &'a str,
        text: &'a str,
    },
    /// The president's (or king's) answer
    Synthesis {
        president: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        mode: Option<SynthesisMode>,
        text: &'a str,
    },
    Finished {
        report: &'a MosReport,
    },
}

impl RunEvent<'_> {
    /// The `type` tag the event serializes with
    pub fn kind(&self) -> &'static str {
        match self {
            RunEvent::Started { .. } => "started",
            RunEvent::CandidateGathered { .. } => "candidate_gathered",
            RunEvent::VoteCast { .. } => "vote_cast",
            RunEvent::Reranked { .. } => "reranked",
            RunEvent::DiscussionTurn { .. } => "discussion_turn",
            RunEvent::FounderVerdict { .. } => "founder_verdict",
            RunEvent::Synthesis { .. } => "synthesis",
            RunEvent::Finished { .. } => "finished",
        }
    }
}

/// Sink for run events.
///
/// `record` is synchronous and infallible: a broken transcript must never
/// disturb a run. Runs may record concurrently through one logger.
pub trait ConversationLogger: Send + Sync {
    fn record(&self, run: RunId, event: &RunEvent<'_>);
}

/// Discards every event
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn record(&self, _run: RunId, _event: &RunEvent<'_>) {}
}

/// A logger bound to one run, handed down to the gatherer and strategies
#[derive(Clone, Copy)]
pub struct RunLog<'a> {
    id: RunId,
    logger: &'a dyn ConversationLogger,
}

impl<'a> RunLog<'a> {
    pub fn new(id: RunId, logger: &'a dyn ConversationLogger) -> Self {
        Self { id, logger }
    }

    /// A log that records nothing
    pub fn disabled() -> RunLog<'static> {
        RunLog {
            id: RunId(0),
            logger: &NoConversationLogger,
        }
    }

    pub fn id(&self) -> RunId {
        self.id
    }

    pub fn record(&self, event: RunEvent<'_>) {
        self.logger.record(self.id, &event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Collect(Mutex<Vec<(RunId, serde_json::Value)>>);

    impl ConversationLogger for Collect {
        fn record(&self, run: RunId, event: &RunEvent<'_>) {
            let value = serde_json::to_value(event).unwrap();
            self.0.lock().unwrap().push((run, value));
        }
    }

    #[test]
    fn test_run_ids_are_distinct() {
        let a = RunId::next();
        let b = RunId::next();
        assert_ne!(a, b);
        assert_eq!(a.to_string(), format!("run-{}", a.get()));
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = RunEvent::DiscussionTurn {
            round: 2,
            founder: "wiki",
            text: "Paris, clearly.",
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], event.kind());
        assert_eq!(value["round"], 2);
        assert_eq!(value["founder"], "wiki");
    }

    #[test]
    fn test_synthesis_mode_is_optional() {
        let king = serde_json::to_value(RunEvent::Synthesis {
            president: "king",
            mode: None,
            text: "Paris",
        })
        .unwrap();
        assert!(king.get("mode").is_none());

        let president = serde_json::to_value(RunEvent::Synthesis {
            president: "pres",
            mode: Some(SynthesisMode::Arbitration),
            text: "Paris",
        })
        .unwrap();
        assert!(president.get("mode").is_some());
    }

    #[test]
    fn test_run_log_stamps_its_id() {
        let collect = Collect(Mutex::new(Vec::new()));
        let log = RunLog::new(RunId::next(), &collect);

        log.record(RunEvent::VoteCast {
            voter: "judge",
            choice: "Paris",
        });
        log.record(RunEvent::VoteCast {
            voter: "critic",
            choice: "Lyon",
        });

        let events = collect.0.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|(run, _)| *run == log.id()));
        assert_eq!(events[1].1["voter"], "critic");
    }
}
