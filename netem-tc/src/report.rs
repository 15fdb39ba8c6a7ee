//! The uniform outcome returned to callers.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Error => "error",
        })
    }
}

/// The outcome of an operation: a status and a message.
///
/// On success the message is the output of the last command that ran, which is usually empty
/// except when listing. On error it is the error text, verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub status: Status,
    pub msg: String,
}

impl Report {
    pub fn success(msg: impl Into<String>) -> Self {
        Self { status: Status::Success, msg: msg.into() }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self { status: Status::Error, msg: msg.into() }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// The message split into lines, empty lines dropped.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.msg.lines().filter(|line| !line.trim().is_empty())
    }
}

impl<E: fmt::Display> From<Result<String, E>> for Report {
    fn from(result: Result<String, E>) -> Self {
        match result {
            Ok(output) => Self::success(output),
            Err(e) => Self::error(e.to_string()),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.msg.is_empty() {
            write!(f, "{}", self.status)
        } else {
            write!(f, "{}: {}", self.status, self.msg)
        }
    }
}
