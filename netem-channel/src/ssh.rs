use std::{fmt, io::Read as _, net::TcpStream};

use crate::{Channel, Error, Result};

/// The port used when none is configured.
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Configuration for a remote host reached over SSH with password authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct SshConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl SshConfig {
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_SSH_PORT,
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

impl fmt::Debug for SshConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SshConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl fmt::Display for SshConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}", self.username, self.host, self.port)
    }
}

/// Runs commands on a remote host over SSH.
///
/// Every command opens its own session and closes it once the command completed, whatever the
/// outcome. Host keys are not verified: unknown hosts are accepted.
#[derive(Debug, Clone)]
pub struct Ssh {
    config: SshConfig,
}

impl Ssh {
    pub fn new(config: SshConfig) -> Self {
        Self { config }
    }

    /// Connects and authenticates a new session.
    fn connect(&self) -> Result<Session> {
        let SshConfig { host, port, username, password } = &self.config;

        tracing::debug!(%host, port, %username, "opening ssh session");

        let tcp = TcpStream::connect((host.as_str(), *port))?;
        let mut session = ssh2::Session::new()?;
        session.set_tcp_stream(tcp);
        session.handshake()?;

        // From here on the guard owns the session and disconnects it on every path.
        let session = Session { inner: session, host: host.clone() };
        session.inner.userauth_password(username, password)?;

        Ok(session)
    }
}

impl Channel for Ssh {
    fn run(&self, command: &str) -> Result<String> {
        let session = self.connect()?;

        tracing::debug!(host = %session.host, command, "running remote command");

        let mut channel = session.inner.channel_session()?;
        channel.exec(command)?;

        // NOTE: stderr is drained before stdout. A command writing more than the channel window
        // (a few hundred KiB) to stdout stalls until both sides block. `tc` output stays far below.
        let mut stderr = String::new();
        channel.stderr().read_to_string(&mut stderr)?;

        let mut stdout = String::new();
        channel.read_to_string(&mut stdout)?;

        channel.wait_close()?;

        if !stderr.is_empty() {
            tracing::debug!(?stderr, host = %session.host, "remote command wrote to stderr");
            return Err(Error::Stderr(stderr));
        }

        Ok(stdout)
    }
}

/// An authenticated SSH session, disconnected when dropped.
struct Session {
    inner: ssh2::Session,
    host: String,
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Err(e) = self.inner.disconnect(None, "bye", None) {
            tracing::error!(?e, host = %self.host, "failed to close ssh session");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use super::*;

    #[test]
    fn debug_redacts_password() {
        let config = SshConfig::new("10.0.0.2", "root", "hunter2").with_port(2222);
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("2222"));
        assert_eq!(config.to_string(), "root@10.0.0.2:2222");
    }

    #[test]
    fn refused_connection_is_reported_as_a_value() {
        // Bind and drop to get a port nobody listens on.
        let port = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port();

        let ssh = Ssh::new(SshConfig::new("127.0.0.1", "root", "root").with_port(port));
        let err = ssh.execute("tc qdisc ls dev eth0").unwrap_err();
        assert!(matches!(err, Error::Io(_)), "{err:?}");
    }

    #[test]
    fn injection_is_rejected_before_connecting() {
        // Port 1 on a reserved address would hang or fail: it must never be reached.
        let ssh = Ssh::new(SshConfig::new("192.0.2.1", "root", "root").with_port(1));
        let err = ssh.execute("tc qdisc ls dev eth0; reboot").unwrap_err();
        assert!(matches!(err, Error::IllegalCharacters));
    }
}
