//! Scripted answer sources shared by the use case tests

use crate::ports::answer_source::{AnswerSource, SharedSource, SourceError};
use crate::ports::progress::ProgressNotifier;
use async_trait::async_trait;
use mos_domain::{Phase, Query, ScoredAnswer};
use std::sync::{Arc, Mutex};
use std::time::Duration;

enum Script {
    Fixed(String),
    /// Answers `"<name>#<n>"`, n counting calls from 1
    Counting,
    Fail,
}

/// Deterministic source that records every call it receives
pub(crate) struct MockSource {
    name: String,
    script: Script,
    selection: Option<String>,
    ranking: Option<Vec<ScoredAnswer>>,
    prompts: Mutex<Vec<String>>,
    candidates_seen: Mutex<Vec<Vec<String>>>,
    call_log: Option<Arc<Mutex<Vec<String>>>>,
    delay: Option<Duration>,
}

impl MockSource {
    fn with_script(name: &str, script: Script) -> Self {
        Self {
            name: name.to_string(),
            script,
            selection: None,
            ranking: None,
            prompts: Mutex::new(Vec::new()),
            candidates_seen: Mutex::new(Vec::new()),
            call_log: None,
            delay: None,
        }
    }

    pub fn answering(name: &str, answer: &str) -> Self {
        Self::with_script(name, Script::Fixed(answer.to_string()))
    }

    pub fn counting(name: &str) -> Self {
        Self::with_script(name, Script::Counting)
    }

    pub fn failing(name: &str) -> Self {
        Self::with_script(name, Script::Fail)
    }

    pub fn selecting(mut self, selection: &str) -> Self {
        self.selection = Some(selection.to_string());
        self
    }

    pub fn ranking(mut self, ranking: &[(f64, &str)]) -> Self {
        self.ranking = Some(
            ranking
                .iter()
                .map(|(score, text)| ScoredAnswer::new(*score, *text))
                .collect(),
        );
        self
    }

    pub fn logging_to(mut self, log: &Arc<Mutex<Vec<String>>>) -> Self {
        self.call_log = Some(Arc::clone(log));
        self
    }

    /// Sleep before every reply, so replies finish out of configured order
    pub fn delayed(mut self, millis: u64) -> Self {
        self.delay = Some(Duration::from_millis(millis));
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Prompts received by `answer`, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Candidate lists received by `select_best` and `rerank`
    pub fn candidates_seen(&self) -> Vec<Vec<String>> {
        self.candidates_seen.lock().unwrap().clone()
    }

    /// Wait out the delay, then note the call in the shared log.
    ///
    /// The log therefore holds calls in completion order.
    async fn finish(&self, op: &str) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.log(op);
    }

    fn log(&self, op: &str) {
        if let Some(log) = &self.call_log {
            log.lock().unwrap().push(format!("{}:{}", self.name, op));
        }
    }
}

#[async_trait]
impl AnswerSource for MockSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn answer(&self, query: &Query) -> Result<String, SourceError> {
        self.finish("answer").await;
        let n = {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(query.text().to_string());
            prompts.len()
        };
        match &self.script {
            Script::Fixed(answer) => Ok(answer.clone()),
            Script::Counting => Ok(format!("{}#{}", self.name, n)),
            Script::Fail => Err(SourceError::RequestFailed(format!("{} is down", self.name))),
        }
    }

    async fn select_best(
        &self,
        _query: &Query,
        candidates: &[String],
    ) -> Result<String, SourceError> {
        self.finish("select_best").await;
        self.candidates_seen.lock().unwrap().push(candidates.to_vec());
        match (&self.selection, &self.script) {
            (_, Script::Fail) => Err(SourceError::RequestFailed(format!("{} is down", self.name))),
            (Some(selection), _) => Ok(selection.clone()),
            (None, _) => Err(SourceError::Unsupported("select_best")),
        }
    }

    async fn rerank(
        &self,
        _query: &Query,
        candidates: &[String],
    ) -> Result<Vec<ScoredAnswer>, SourceError> {
        self.finish("rerank").await;
        self.candidates_seen.lock().unwrap().push(candidates.to_vec());
        match (&self.ranking, &self.script) {
            (_, Script::Fail) => Err(SourceError::RequestFailed(format!("{} is down", self.name))),
            (Some(ranking), _) => Ok(ranking.clone()),
            (None, _) => Err(SourceError::Unsupported("rerank")),
        }
    }
}

/// Progress notifier that keeps the phase starts and completions it sees
#[derive(Default)]
pub(crate) struct PhaseLog(Mutex<Vec<String>>);

impl PhaseLog {
    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    /// Every started phase was completed, in the same order
    pub fn is_balanced(&self) -> bool {
        let events = self.events();
        let started: Vec<_> = events.iter().filter_map(|e| e.strip_prefix("start:")).collect();
        let completed: Vec<_> = events.iter().filter_map(|e| e.strip_prefix("complete:")).collect();
        started == completed
    }
}

impl ProgressNotifier for PhaseLog {
    fn on_phase_start(&self, phase: &Phase, _total_tasks: usize) {
        self.0.lock().unwrap().push(format!("start:{:?}", phase));
    }

    fn on_task_complete(&self, _phase: &Phase, _source: &str, _success: bool) {}

    fn on_phase_complete(&self, phase: &Phase) {
        self.0.lock().unwrap().push(format!("complete:{:?}", phase));
    }
}

pub(crate) fn shared(sources: &[&Arc<MockSource>]) -> Vec<SharedSource> {
    sources
        .iter()
        .map(|s| Arc::clone(*s) as SharedSource)
        .collect()
}

pub(crate) fn query(text: &str) -> Query {
    Query::new(text).unwrap()
}
