//! Subprocess-backed answer source
//!
//! Each call spawns the configured program, writes one JSON request to its
//! stdin and reads the reply from stdout:
//!
//! | op            | request fields                 | stdout                      |
//! |---------------|--------------------------------|-----------------------------|
//! | `answer`      | `query`, `lang`, `units`       | answer text                 |
//! | `select_best` | `query`, `candidates`, `lang`  | chosen text                 |
//! | `rerank`      | `query`, `candidates`, `lang`  | JSON `[[score, text], ...]` |

use async_trait::async_trait;
use mos_application::ports::answer_source::{AnswerSource, SourceError};
use mos_domain::{Capability, Query, ScoredAnswer};
use serde::Serialize;
use std::process::Stdio;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Maximum stderr excerpt kept in an error message
const MAX_STDERR_LEN: usize = 500;

/// Errors from running a source program
#[derive(Error, Debug)]
pub enum CommandSourceError {
    #[error("failed to spawn '{program}': {error}")]
    Spawn {
        program: String,
        #[source]
        error: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("exited with {status}: {stderr}")]
    Exit { status: String, stderr: String },

    #[error("unparsable output: {0}")]
    InvalidOutput(String),
}

impl From<CommandSourceError> for SourceError {
    fn from(e: CommandSourceError) -> Self {
        match e {
            CommandSourceError::InvalidOutput(msg) => SourceError::InvalidResponse(msg),
            CommandSourceError::Encode(e) => SourceError::Other(e.to_string()),
            other => SourceError::RequestFailed(other.to_string()),
        }
    }
}

/// One request written to the program's stdin
#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum CommandRequest<'a> {
    Answer {
        query: &'a str,
        lang: Option<&'a str>,
        units: Option<&'a str>,
    },
    SelectBest {
        query: &'a str,
        candidates: &'a [String],
        lang: Option<&'a str>,
    },
    Rerank {
        query: &'a str,
        candidates: &'a [String],
        lang: Option<&'a str>,
    },
}

/// Answer source that runs an external program per call
pub struct CommandSource {
    name: String,
    program: String,
    args: Vec<String>,
    capabilities: Vec<Capability>,
}

impl CommandSource {
    /// Create a source that can only answer
    pub fn new(name: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args: Vec::new(),
            capabilities: vec![Capability::Answer],
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_capabilities(mut self, capabilities: Vec<Capability>) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    fn require(&self, capability: Capability) -> Result<(), SourceError> {
        if self.supports(capability) {
            Ok(())
        } else {
            Err(SourceError::Unsupported(capability.as_str()))
        }
    }

    /// Run the program once and return its trimmed stdout
    async fn run(&self, request: &CommandRequest<'_>) -> Result<String, CommandSourceError> {
        let payload = serde_json::to_string(request)?;
        debug!("Source {} request: {}", self.name, payload);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|error| CommandSourceError::Spawn {
                program: self.program.clone(),
                error,
            })?;

        // Feed stdin while draining stdout, or a program that replies as it
        // reads can fill its pipe and stall both ends
        let stdin = child.stdin.take();
        let feed = async move {
            let Some(mut stdin) = stdin else {
                return Ok(());
            };
            match stdin.write_all(payload.as_bytes()).await {
                // A program may answer without reading its input
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
                other => other,
            }
        };

        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output?;
        fed?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr: String = stderr.trim().chars().take(MAX_STDERR_LEN).collect();
            return Err(CommandSourceError::Exit {
                status: output.status.to_string(),
                stderr,
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!("Source {} replied with {} bytes", self.name, stdout.len());
        Ok(stdout)
    }
}

#[async_trait]
impl AnswerSource for CommandSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn answer(&self, query: &Query) -> Result<String, SourceError> {
        self.require(Capability::Answer)?;
        let request = CommandRequest::Answer {
            query: query.text(),
            lang: query.lang(),
            units: query.units(),
        };
        Ok(self.run(&request).await?)
    }

    async fn select_best(
        &self,
        query: &Query,
        candidates: &[String],
    ) -> Result<String, SourceError> {
        self.require(Capability::SelectBest)?;
        let request = CommandRequest::SelectBest {
            query: query.text(),
            candidates,
            lang: query.lang(),
        };
        Ok(self.run(&request).await?)
    }

    async fn rerank(
        &self,
        query: &Query,
        candidates: &[String],
    ) -> Result<Vec<ScoredAnswer>, SourceError> {
        self.require(Capability::Rerank)?;
        let request = CommandRequest::Rerank {
            query: query.text(),
            candidates,
            lang: query.lang(),
        };
        let stdout = self.run(&request).await?;
        let ranking = serde_json::from_str::<Vec<ScoredAnswer>>(&stdout)
            .map_err(|e| CommandSourceError::InvalidOutput(e.to_string()))?;
        Ok(ranking)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn shell(name: &str, script: &str) -> CommandSource {
        CommandSource::new(name, "sh").with_args(vec!["-c".to_string(), script.to_string()])
    }

    fn query() -> Query {
        Query::new("capital of France?").unwrap()
    }

    fn candidates() -> Vec<String> {
        vec!["Paris".to_string(), "Lyon".to_string()]
    }

    #[tokio::test]
    async fn test_answer_is_trimmed_stdout() {
        let source = shell("paris", "cat >/dev/null; printf '  Paris\\n\\n'");
        assert_eq!(source.answer(&query()).await.unwrap(), "Paris");
    }

    #[tokio::test]
    async fn test_answer_request_format() {
        // `cat` echoes the request back
        let source = shell("echo", "cat");
        let reply = source
            .answer(&query().with_lang("fr-fr").with_units("metric"))
            .await
            .unwrap();

        let request: serde_json::Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(request["op"], "answer");
        assert_eq!(request["query"], "capital of France?");
        assert_eq!(request["lang"], "fr-fr");
        assert_eq!(request["units"], "metric");
    }

    #[tokio::test]
    async fn test_select_best_request_format() {
        let source = shell("echo", "cat").with_capabilities(vec![Capability::SelectBest]);
        let reply = source.select_best(&query(), &candidates()).await.unwrap();

        let request: serde_json::Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(request["op"], "select_best");
        assert_eq!(request["candidates"], serde_json::json!(["Paris", "Lyon"]));
        assert!(request["lang"].is_null());
    }

    #[tokio::test]
    async fn test_rerank_parses_scored_pairs() {
        let source = shell(
            "rr",
            r#"cat >/dev/null; echo '[[0.9, "Lyon"], [0.4, "Paris"]]'"#,
        )
        .with_capabilities(vec![Capability::Rerank]);

        let ranking = source.rerank(&query(), &candidates()).await.unwrap();
        assert_eq!(
            ranking,
            vec![ScoredAnswer::new(0.9, "Lyon"), ScoredAnswer::new(0.4, "Paris")]
        );
    }

    #[tokio::test]
    async fn test_rerank_garbage_is_invalid_response() {
        let source = shell("rr", "cat >/dev/null; echo 'Lyon first'")
            .with_capabilities(vec![Capability::Rerank]);

        let err = source.rerank(&query(), &candidates()).await.unwrap_err();
        assert!(matches!(err, SourceError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_undeclared_capability_is_unsupported() {
        // Never spawned: the program does not exist
        let source = CommandSource::new("ghost", "/nonexistent/solver");
        let err = source.select_best(&query(), &candidates()).await.unwrap_err();
        assert!(matches!(err, SourceError::Unsupported("select_best")));
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_failure() {
        let source = shell("broken", "cat >/dev/null; echo 'model offline' >&2; exit 3");
        let err = source.answer(&query()).await.unwrap_err();

        match err {
            SourceError::RequestFailed(msg) => assert!(msg.contains("model offline")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_spawn_failure() {
        let source = CommandSource::new("ghost", "/nonexistent/solver");
        let err = source.answer(&query()).await.unwrap_err();
        assert!(matches!(err, SourceError::RequestFailed(_)));
    }

    #[tokio::test]
    async fn test_large_request_is_streamed() {
        // Well past a pipe buffer; `cat` writes while it is still reading
        let long = Query::new("x".repeat(256 * 1024)).unwrap();
        let source = shell("echo", "cat");

        let reply = tokio::time::timeout(std::time::Duration::from_secs(10), source.answer(&long))
            .await
            .expect("source stalled on a large request")
            .unwrap();

        let request: serde_json::Value = serde_json::from_str(&reply).unwrap();
        assert_eq!(request["query"].as_str().unwrap().len(), 256 * 1024);
    }

    #[tokio::test]
    async fn test_program_ignoring_stdin() {
        let source = shell("blunt", "echo Paris");
        assert_eq!(source.answer(&query()).await.unwrap(), "Paris");
    }
}
