//! Compiled commands and their sequential execution.

use std::fmt;

use netem_channel::Channel;

use crate::{Error, Result};

/// What a compiled command does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    DeleteRoot,
    AddNetem,
    AddPrio,
    AddTbf,
    AddFilter,
    DeleteBridge,
    AddBridge,
    SetStp,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::DeleteRoot => "delete root qdisc",
            Self::AddNetem => "add netem qdisc",
            Self::AddPrio => "add prio qdisc",
            Self::AddTbf => "add tbf qdisc",
            Self::AddFilter => "add filter",
            Self::DeleteBridge => "delete bridge",
            Self::AddBridge => "add bridge",
            Self::SetStp => "set stp",
        };

        f.write_str(s)
    }
}

/// A command of a sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub kind: StepKind,
    pub command: String,
    /// A failure of this step does not abort the sequence.
    pub tolerate_failure: bool,
}

impl Step {
    pub fn new(kind: StepKind, command: String) -> Self {
        Self { kind, command, tolerate_failure: false }
    }

    /// A step whose failure is expected and ignored, e.g. deleting something that may not exist.
    pub fn tolerant(kind: StepKind, command: String) -> Self {
        Self { kind, command, tolerate_failure: true }
    }
}

/// Runs the steps in order, stopping at the first failure that is not tolerated.
///
/// Returns the output of the last successful step. If the failing step is the last one its error
/// is returned as is, otherwise as [`Error::SequenceAborted`].
pub fn run<C: Channel>(channel: &C, steps: &[Step]) -> Result<String> {
    let mut output = String::new();

    for (i, step) in steps.iter().enumerate() {
        let _span = tracing::debug_span!("step", kind = %step.kind, i).entered();

        match channel.execute(&step.command) {
            Ok(out) => output = out,
            Err(e) if step.tolerate_failure => {
                tracing::debug!(%e, command = %step.command, "ignoring failure");
            }
            Err(e) => {
                let skipped = steps.len() - i - 1;
                tracing::warn!(%e, command = %step.command, skipped, "step failed");

                if skipped == 0 {
                    return Err(Error::Channel(e));
                }
                return Err(Error::SequenceAborted { step: step.kind, skipped, source: e });
            }
        }
    }

    Ok(output)
}
