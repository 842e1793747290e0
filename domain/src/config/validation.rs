//! Structured configuration issues.
//!
//! Loaders report everything wrong with a configuration at once instead of
//! failing on the first problem; each issue carries a severity so callers
//! can decide whether to abort or just warn.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// A string field holds a value outside its enum.
    InvalidEnumValue {
        field: String,
        value: String,
        valid_values: Vec<String>,
    },
    /// A role names a source that has no `[sources.<name>]` entry.
    UndefinedSource { role: String, source: String },
    /// A role needed by the selected strategy has no sources.
    MissingRole { role: String },
    /// A `[sources.<name>]` entry has no command to run.
    EmptyCommand { source: String },
    /// A source is assigned a role whose contract it does not declare.
    MissingCapability { source: String, capability: String },
    /// `discussion_rounds = 0` skips the discussion entirely.
    ZeroRounds,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", label, self.message)
    }
}
