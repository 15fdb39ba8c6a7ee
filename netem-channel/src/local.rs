use std::process::{self, Stdio};

use crate::{Channel, Error, Result};

/// Runs commands as a process on this host.
///
/// The command line is split on ASCII whitespace, the first word being the program. No shell is
/// involved.
#[derive(Debug, Clone, Copy, Default)]
pub struct Local;

impl Local {
    pub fn new() -> Self {
        Self
    }
}

impl Channel for Local {
    fn run(&self, command: &str) -> Result<String> {
        let mut iter = command.split_ascii_whitespace();
        let program = iter.next().ok_or(Error::Empty)?;
        let mut cmd = process::Command::new(program);
        cmd.args(iter).stdin(Stdio::null()).stderr(Stdio::piped()).stdout(Stdio::piped());

        tracing::debug!(?cmd, "running command");

        let output = cmd.spawn()?.wait_with_output()?;
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !stderr.is_empty() {
            tracing::debug!(?stderr, status = ?output.status, "command wrote to stderr");
            return Err(Error::Stderr(stderr));
        }

        if !output.status.success() {
            tracing::debug!(status = ?output.status, ?cmd, "command returned non-zero status");
            return Err(Error::NonZero(output.status.code().unwrap_or(-1)));
        }

        Ok(stdout)
    }
}
