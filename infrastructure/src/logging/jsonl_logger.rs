//! JSONL run transcripts.
//!
//! One line per [`RunEvent`], stamped with the run it belongs to and the
//! time it was recorded:
//!
//! ```text
//! {"run":1,"timestamp":"…","type":"started","query":"…","strategy":"vote"}
//! {"run":1,"timestamp":"…","type":"candidate_gathered","worker":"wiki","text":"Paris"}
//! {"run":1,"timestamp":"…","type":"finished","report":{…}}
//! ```
//!
//! Concurrent runs may share one file; their lines interleave but every
//! line names its run, and `finished` closes each one.

use mos_application::ports::conversation_logger::{ConversationLogger, RunEvent, RunId};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

pub struct JsonlConversationLogger {
    out: Mutex<LineWriter<File>>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Start a fresh transcript at `path`, creating parent directories.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        Self::open(path.as_ref(), false)
    }

    /// Append to the transcript at `path`, keeping earlier runs.
    pub fn append(path: impl AsRef<Path>) -> io::Result<Self> {
        Self::open(path.as_ref(), true)
    }

    fn open(path: &Path, append: bool) -> io::Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)?;

        Ok(Self {
            out: Mutex::new(LineWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn line(run: RunId, event: &RunEvent<'_>) -> serde_json::Result<String> {
        let mut record = Map::new();
        record.insert("run".to_string(), Value::from(run.get()));
        record.insert(
            "timestamp".to_string(),
            Value::String(
                chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            ),
        );
        if let Value::Object(fields) = serde_json::to_value(event)? {
            record.extend(fields);
        }
        serde_json::to_string(&Value::Object(record))
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn record(&self, run: RunId, event: &RunEvent<'_>) {
        let line = match Self::line(run, event) {
            Ok(line) => line,
            Err(e) => {
                warn!("{}: could not encode {} event: {}", run, event.kind(), e);
                return;
            }
        };

        let Ok(mut out) = self.out.lock() else {
            return;
        };
        // LineWriter flushes on the newline, so a crashed run leaves whole lines
        if let Err(e) = writeln!(out, "{}", line) {
            warn!("{}: transcript write to {} failed: {}", run, self.path.display(), e);
            return;
        }
        if let RunEvent::Finished { report } = event {
            debug!(
                "{}: transcript closed ({} candidates, fallback={})",
                run,
                report.candidates.len(),
                report.fallback
            );
        }
    }
}
