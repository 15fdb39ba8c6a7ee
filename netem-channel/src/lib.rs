#![doc(issue_tracker_base_url = "https://github.com/chainbound/netem-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

//! Command channels.
//!
//! A [`Channel`] runs a single, opaque command line and reports either its standard output or an
//! [`Error`]. Two real implementations are provided: [`Local`], which spawns a process on this
//! host, and [`Ssh`], which runs the command over a fresh SSH session on a remote host. [`DryRun`]
//! only records what would have been run.
//!
//! Channels are selected once, usually from a [`Target`], and then passed down to whatever builds
//! the commands.

use std::io;

mod dry_run;
mod local;
mod ssh;
mod target;

pub use dry_run::DryRun;
pub use local::Local;
pub use ssh::{Ssh, SshConfig, DEFAULT_SSH_PORT};
pub use target::Target;

/// Characters that are never allowed in a command line, since they would let a caller chain or
/// redirect commands once the line reaches a shell.
///
/// NOTE: this is a denylist and therefore incomplete. Values that end up in a command line should
/// be validated closer to where they are produced as well.
pub const ILLEGAL_CHARACTERS: [char; 9] = ['&', '|', ';', '$', '>', '<', '`', '\\', '!'];

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("illegal characters")]
    IllegalCharacters,
    #[error("empty command provided")]
    Empty,
    /// The command wrote to its standard error. This is treated as a failure even when the exit
    /// status was zero.
    #[error("{0}")]
    Stderr(String),
    #[error("command exited with status {0}")]
    NonZero(i32),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Ssh(#[from] ssh2::Error),
}

impl Error {
    /// Returns `true` if the command was rejected before anything was run.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::IllegalCharacters | Self::Empty)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// A boxed channel, as returned by [`Target::channel`].
pub type BoxedChannel = Box<dyn Channel + Send + Sync>;

/// Checks that the command is non-empty and free of [`ILLEGAL_CHARACTERS`].
pub fn sanitize(command: &str) -> Result<()> {
    if command.trim().is_empty() {
        return Err(Error::Empty);
    }

    if command.contains(ILLEGAL_CHARACTERS) {
        tracing::warn!(command, "rejecting command with illegal characters");
        return Err(Error::IllegalCharacters);
    }

    Ok(())
}

/// Something able to run a command line and report its output.
pub trait Channel {
    /// Runs the command without any check. Prefer [`Channel::execute`].
    fn run(&self, command: &str) -> Result<String>;

    /// Sanitizes the command with [`sanitize`] and runs it. Nothing is run if the command is
    /// rejected.
    fn execute(&self, command: &str) -> Result<String> {
        sanitize(command)?;
        self.run(command)
    }
}

impl<C: Channel + ?Sized> Channel for &C {
    fn run(&self, command: &str) -> Result<String> {
        (**self).run(command)
    }

    fn execute(&self, command: &str) -> Result<String> {
        (**self).execute(command)
    }
}

impl<C: Channel + ?Sized> Channel for Box<C> {
    fn run(&self, command: &str) -> Result<String> {
        (**self).run(command)
    }

    fn execute(&self, command: &str) -> Result<String> {
        (**self).execute(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_rejects_every_illegal_character() {
        for c in ILLEGAL_CHARACTERS {
            let command = format!("tc qdisc ls dev eth0{c}reboot");
            assert!(matches!(sanitize(&command), Err(Error::IllegalCharacters)), "{command}");
        }
    }

    #[test]
    fn sanitize_accepts_tc_lines() {
        sanitize("sudo tc qdisc add dev eth0 root netem delay 100ms 10ms 25% loss 0.3%").unwrap();
        sanitize("sudo tc filter add dev eth0 protocol ip parent 1:0 prio 3 u32 match ip dst 10.10.10.0/24 flowid 1:3").unwrap();
    }

    #[test]
    fn sanitize_rejects_blank_commands() {
        assert!(matches!(sanitize(""), Err(Error::Empty)));
        assert!(matches!(sanitize("  \t"), Err(Error::Empty)));
    }

    #[test]
    fn illegal_characters_message() {
        assert_eq!(Error::IllegalCharacters.to_string(), "illegal characters");
        assert!(Error::IllegalCharacters.is_rejected());
        assert!(!Error::Stderr("boom".into()).is_rejected());
    }
}
