use netem_channel::{Channel, Error, Result};
use parking_lot::Mutex;

/// A channel recording the commands it runs. Commands matching a pattern fail the way `tc` would,
/// with a message on stderr, or succeed with canned output.
#[derive(Debug, Default)]
pub struct ScriptedChannel {
    ran: Mutex<Vec<String>>,
    failures: Vec<(String, String)>,
    outputs: Vec<(String, String)>,
}

impl ScriptedChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails every command containing `pattern` with `stderr`.
    pub fn fail_on(mut self, pattern: &str, stderr: &str) -> Self {
        self.failures.push((pattern.to_owned(), stderr.to_owned()));
        self
    }

    /// Answers every command containing `pattern` with `stdout`.
    pub fn respond_to(mut self, pattern: &str, stdout: &str) -> Self {
        self.outputs.push((pattern.to_owned(), stdout.to_owned()));
        self
    }

    /// The commands that reached the channel, failed ones included.
    pub fn ran(&self) -> Vec<String> {
        self.ran.lock().clone()
    }
}

impl Channel for ScriptedChannel {
    fn run(&self, command: &str) -> Result<String> {
        self.ran.lock().push(command.to_owned());

        let matching = |scripted: &&(String, String)| command.contains(scripted.0.as_str());

        if let Some((_, stderr)) = self.failures.iter().find(matching) {
            return Err(Error::Stderr(stderr.clone()));
        }

        Ok(self.outputs.iter().find(matching).map(|(_, stdout)| stdout.clone()).unwrap_or_default())
    }
}
