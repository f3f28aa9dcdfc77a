//! Failure taxonomy for a forecast run.

use std::fmt;

use thiserror::Error;

/// Anything that can abort a run after the command input has been parsed.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("cannot read {path}: {source}")]
    Missing {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unexpected data in {subject}: {reason}")]
    Format { subject: String, reason: String },

    #[error("request for {subject} failed: {source}")]
    Network {
        subject: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request for {subject} answered with status {status}")]
    NotOk { status: u16, subject: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl QueryError {
    pub fn format<S: Into<String>, R: ToString>(subject: S, reason: R) -> Self {
        Self::Format {
            subject: subject.into(),
            reason: reason.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Missing { .. } => ErrorKind::Missing,
            Self::Format { .. } => ErrorKind::Format,
            Self::Network { .. } | Self::Client(_) => ErrorKind::Network,
            Self::NotOk { .. } => ErrorKind::NotOk,
        }
    }

    /// The line printed between `FAILED` and the kind.
    pub fn subject(&self) -> String {
        match self {
            Self::Missing { path, .. } => path.clone(),
            Self::Format { subject, .. } => subject.clone(),
            Self::Network { subject, .. } => subject.clone(),
            Self::NotOk { status, subject } => format!("{status} {subject}"),
            Self::Client(_) => "http client".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Missing,
    Format,
    Network,
    NotOk,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Missing => "MISSING",
            ErrorKind::Format => "FORMAT",
            ErrorKind::Network => "NETWORK",
            ErrorKind::NotOk => "NOT 200",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a failed run prints instead of its results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub subject: String,
    pub kind: ErrorKind,
}

impl ErrorReport {
    pub fn lines(&self) -> Vec<String> {
        vec![
            "FAILED".to_string(),
            self.subject.clone(),
            self.kind.to_string(),
        ]
    }
}

impl From<&QueryError> for ErrorReport {
    fn from(err: &QueryError) -> Self {
        Self {
            subject: err.subject(),
            kind: err.kind(),
        }
    }
}

/// Malformed command input. Never turned into an [`ErrorReport`].
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("expected a {expected} line, got {line:?}")]
    Unrecognized { expected: &'static str, line: String },

    #[error("invalid number {value:?} in {line:?}")]
    BadNumber { value: String, line: String },

    #[error("input ended before the {0} line")]
    UnexpectedEnd(&'static str),

    #[error("failed to read command input: {0}")]
    Io(#[from] std::io::Error),
}
