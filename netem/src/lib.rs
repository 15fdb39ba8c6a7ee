#![doc(issue_tracker_base_url = "https://github.com/chainbound/netem-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

//! Network emulation rules for Linux hosts, local or remote.
//!
//! ```no_run
//! use netem::{Impairment, RateLimit, Request, Shaper, SshConfig, Target};
//!
//! let target = Target::remote(SshConfig::new("10.0.0.2", "admin", "secret"));
//! let shaper = Shaper::new(target.channel());
//!
//! let request = Request::new(Impairment::default().with_delay("100ms,10ms"), RateLimit::default());
//! println!("{:?}", shaper.apply("eth0", &request));
//! ```

pub use netem_channel::{
    sanitize, BoxedChannel, Channel, DryRun, Local, Ssh, SshConfig, Target, DEFAULT_SSH_PORT,
    ILLEGAL_CHARACTERS,
};
pub use netem_tc::*;

/// Errors of the command channel, see [`netem_channel::Error`].
pub type ChannelError = netem_channel::Error;
