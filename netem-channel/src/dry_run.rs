use parking_lot::Mutex;

use crate::{Channel, Result};

/// A channel that runs nothing. It records every command it is given and reports success with
/// an empty output.
#[derive(Debug, Default)]
pub struct DryRun {
    commands: Mutex<Vec<String>>,
}

impl DryRun {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded commands, in order.
    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().clone()
    }

    /// Takes the recorded commands, leaving the recorder empty.
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.commands.lock())
    }
}

impl Channel for DryRun {
    fn run(&self, command: &str) -> Result<String> {
        tracing::info!(command, "dry run");
        self.commands.lock().push(command.to_owned());
        Ok(String::new())
    }
}
