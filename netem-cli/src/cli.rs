//! Command line configuration of the `netem` binary.
//!
//!   netem set -i eth0 --delay 100ms,10ms,25% --distribution normal
//!   netem --host 10.0.0.2 --username admin set -i eth0 --loss 1% --rate 256kbit --dst 10.10.10.0/24
//!   netem bridge create --stp off --attach eth1 --attach eth2

use clap::{ArgAction, Args, Parser, Subcommand};
use netem::{
    config::DEFAULT_BRIDGE_NAME, Impairment, Options, RateLimit, Request, SshConfig, Stp, Target,
    DEFAULT_SSH_PORT,
};

#[derive(Debug, Parser)]
#[command(name = "netem", version, about = "Apply tc/netem traffic shaping rules, locally or over SSH")]
pub struct Config {
    #[command(subcommand)]
    pub command: Command,

    /// Run the commands on this host over SSH instead of locally.
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// SSH user. Required with `--host`.
    #[arg(long, short = 'u', global = true)]
    pub username: Option<String>,

    /// SSH password. Required with `--host`.
    #[arg(long, env = "NETEM_SSH_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    #[arg(long, default_value_t = DEFAULT_SSH_PORT, global = true)]
    pub port: u16,

    /// Do not prefix commands with `sudo`.
    #[arg(long, global = true)]
    pub no_sudo: bool,

    /// The bridge device managed by `bridge` subcommands.
    #[arg(long, default_value = DEFAULT_BRIDGE_NAME, global = true)]
    pub bridge_name: String,

    /// Print the commands instead of running them.
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Print the outcome as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Log more. Repeat for even more. `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("--host requires --username and --password")]
pub struct MissingCredentials;

impl Config {
    /// Where to run the commands.
    pub fn target(&self) -> Result<Target, MissingCredentials> {
        let Some(host) = &self.host else {
            return Ok(Target::Local);
        };

        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Ok(Target::remote(
                SshConfig::new(host, username, password).with_port(self.port),
            )),
            _ => Err(MissingCredentials),
        }
    }

    pub fn options(&self) -> Options {
        Options::default().with_sudo(!self.no_sudo).with_bridge_name(&self.bridge_name)
    }

    /// The default log level, when `RUST_LOG` is not set.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Replace the rules of an interface.
    Set(SetArgs),
    /// Delete every rule of an interface.
    Clear {
        #[arg(short, long)]
        interface: String,
    },
    /// List the qdiscs of an interface.
    Show {
        #[arg(short, long)]
        interface: String,
    },
    /// Manage the bridge device.
    #[command(subcommand)]
    Bridge(BridgeCommand),
}

#[derive(Debug, Args)]
pub struct SetArgs {
    #[arg(short, long)]
    pub interface: String,

    /// Delay, then optionally jitter and correlation, e.g. `100ms,10ms,25%`.
    #[arg(short, long)]
    pub delay: Option<String>,

    /// Jitter distribution: normal, pareto or paretonormal.
    #[arg(long)]
    pub distribution: Option<String>,

    /// Reordering probability and correlation, e.g. `25%,50%`.
    #[arg(long)]
    pub reorder: Option<String>,

    /// Loss probability and correlation, e.g. `0.3%,25%`.
    #[arg(long)]
    pub loss: Option<String>,

    #[arg(long)]
    pub duplicate: Option<String>,

    #[arg(long)]
    pub corrupt: Option<String>,

    /// Netem rate, e.g. `1mbit`. Cannot be used with `--rate`.
    #[arg(long)]
    pub netem_rate: Option<String>,

    /// Netem queue limit, in packets.
    #[arg(long)]
    pub netem_limit: Option<u32>,

    /// Token bucket rate, e.g. `256kbit`.
    #[arg(long)]
    pub rate: Option<String>,

    /// Token bucket size, in bytes.
    #[arg(long)]
    pub buffer: Option<u32>,

    /// Bytes that can wait for tokens.
    #[arg(long)]
    pub limit: Option<u32>,

    /// Only shape traffic sent to this address or CIDR. Requires `--rate`.
    #[arg(long = "dst")]
    pub destination: Option<String>,
}

impl SetArgs {
    pub fn request(&self) -> Request {
        let impairment = Impairment {
            delay: self.delay.clone(),
            distribution: self.distribution.clone(),
            reorder: self.reorder.clone(),
            loss: self.loss.clone(),
            duplicate: self.duplicate.clone(),
            corrupt: self.corrupt.clone(),
            rate: self.netem_rate.clone(),
            limit: self.netem_limit,
        };
        let rate_limit = RateLimit {
            rate: self.rate.clone(),
            buffer: self.buffer,
            limit: self.limit,
            destination: self.destination.clone(),
        };

        Request::new(impairment, rate_limit)
    }
}

#[derive(Debug, Subcommand)]
pub enum BridgeCommand {
    /// (Re-)create the bridge, then attach interfaces to it.
    Create {
        #[arg(long, default_value_t = Stp::On)]
        stp: Stp,
        #[arg(long = "attach")]
        interfaces: Vec<String>,
    },
    Destroy,
    Attach { interface: String },
    Detach { interface: String },
}
