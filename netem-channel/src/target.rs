use std::fmt;

use crate::{BoxedChannel, Local, Ssh, SshConfig};

/// Where commands are run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Target {
    /// This host.
    #[default]
    Local,
    /// A remote host reached over SSH.
    Remote(SshConfig),
}

impl Target {
    pub fn remote(config: SshConfig) -> Self {
        Self::Remote(config)
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// Turns the target into the channel that runs commands against it.
    pub fn channel(self) -> BoxedChannel {
        match self {
            Self::Local => Box::new(Local::new()),
            Self::Remote(config) => Box::new(Ssh::new(config)),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Remote(config) => write!(f, "{config}"),
        }
    }
}
