#![doc(issue_tracker_base_url = "https://github.com/chainbound/netem-rs/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

//! Traffic-control rule engine.
//!
//! This crate turns a partially specified set of impairments ([`Impairment`]) and rate limits
//! ([`RateLimit`]) into one of three queueing hierarchies ([`Topology`]), compiles it into an
//! ordered list of `tc` command lines and runs them, one at a time, through a
//! [`Channel`](netem_channel::Channel).
//!
//! ## Hierarchies
//!
//! | Topology | Qdiscs |
//! |----------|--------|
//! | [`Topology::Plain`] | `root netem` |
//! | [`Topology::TokenBucket`] | `root 1: netem` → `1:1 10: tbf` |
//! | [`Topology::Filtered`] | `root 1: prio` → `1:3 30: tbf` → `30:1 31: netem`, plus a `u32` filter sending the destination to `1:3` |
//!
//! Installing any of them first deletes the existing root qdisc of the interface.
//!
//! The [`Bridge`] controller manages the bridge device used to put a host "in the middle" of two
//! links, so that impairments apply to forwarded traffic.

pub mod bridge;
pub mod command;
pub mod config;
pub mod filter;
pub mod handle;
pub mod impairment;
pub mod rate;
pub mod report;
pub mod request;
pub mod shaper;
pub mod step;
pub mod topology;

pub use bridge::{Bridge, Stp};
pub use config::Options;
pub use filter::Subnet;
pub use impairment::{Distribution, Impairment, NetemOption};
pub use rate::{RateLimit, TokenBucket, DEFAULT_BUFFER, DEFAULT_LIMIT};
pub use report::{Report, Status};
pub use request::{Request, ValidationError};
pub use shaper::Shaper;
pub use step::{Step, StepKind};
pub use topology::Topology;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request was rejected before any command was run.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The last (or only) command failed, or was rejected by the channel.
    #[error(transparent)]
    Channel(#[from] netem_channel::Error),
    /// A command in the middle of a sequence failed and the remaining ones were skipped. The
    /// message is the failed command's, verbatim.
    ///
    /// The hierarchy may be left half-installed: deleting the root qdisc brings the interface back
    /// to a known state.
    #[error("{source}")]
    SequenceAborted {
        step: StepKind,
        skipped: usize,
        source: netem_channel::Error,
    },
}

impl Error {
    /// Returns `true` if nothing was run because the request was invalid.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
