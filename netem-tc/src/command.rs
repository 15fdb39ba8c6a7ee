//! Command line builders for `tc` and `brctl`.
//!
//! Builders only produce text: running it is the job of a
//! [`Channel`](netem_channel::Channel).

use std::fmt;

use crate::{
    bridge::Stp,
    filter::Subnet,
    handle::{Handle, FILTER_PRIORITY},
    impairment::Impairment,
    rate::TokenBucket,
};

/// A command line, as a list of words joined by single spaces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    words: Vec<String>,
}

impl CommandLine {
    /// Starts a command line for `program`, optionally run through `sudo`.
    pub fn new(program: &str, sudo: bool) -> Self {
        let mut words = Vec::with_capacity(16);
        if sudo {
            words.push("sudo".to_owned());
        }
        words.push(program.to_owned());

        Self { words }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.words.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.words.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.words.join(" "))
    }
}

impl From<CommandLine> for String {
    fn from(value: CommandLine) -> Self {
        value.to_string()
    }
}

/// Where a qdisc is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent {
    Root,
    Class(Handle),
}

impl Parent {
    fn args(self) -> Vec<String> {
        match self {
            Self::Root => vec!["root".to_owned()],
            Self::Class(handle) => vec!["parent".to_owned(), handle.to_string()],
        }
    }
}

/// The qdiscs our hierarchies are made of.
#[derive(Debug, Clone, Copy)]
pub enum Qdisc<'a> {
    Netem(&'a Impairment),
    Tbf(&'a TokenBucket),
    Prio,
}

impl Qdisc<'_> {
    fn args(self) -> Vec<String> {
        match self {
            Self::Netem(impairment) => {
                let mut args = vec!["netem".to_owned()];
                args.extend(impairment.to_args());
                args
            }
            Self::Tbf(bucket) => {
                let mut args = vec!["tbf".to_owned()];
                args.extend(bucket.to_args());
                args
            }
            Self::Prio => vec!["prio".to_owned()],
        }
    }
}

/// Builds `tc` command lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tc {
    sudo: bool,
}

impl Tc {
    pub const fn new(sudo: bool) -> Self {
        Self { sudo }
    }

    fn line(&self) -> CommandLine {
        CommandLine::new("tc", self.sudo)
    }

    /// `tc qdisc ls dev <dev>`
    pub fn qdisc_show(&self, dev: &str) -> String {
        self.line().args(["qdisc", "ls", "dev", dev]).into()
    }

    /// `tc qdisc del dev <dev> root`
    pub fn qdisc_del_root(&self, dev: &str) -> String {
        self.line().args(["qdisc", "del", "dev", dev, "root"]).into()
    }

    /// `tc qdisc add dev <dev> <parent> [handle <handle>] <qdisc> [options]`
    pub fn qdisc_add(
        &self,
        dev: &str,
        parent: Parent,
        handle: Option<Handle>,
        qdisc: Qdisc<'_>,
    ) -> String {
        let mut line = self.line().args(["qdisc", "add", "dev", dev]).args(parent.args());
        if let Some(handle) = handle {
            line = line.arg("handle").arg(handle.to_string());
        }

        line.args(qdisc.args()).into()
    }

    /// Sends traffic towards `destination` to the `flow` class of the `parent` qdisc.
    ///
    /// `tc filter add dev <dev> protocol ip parent <parent> prio 3 u32 match ip dst <cidr>
    /// flowid <flow>`
    pub fn filter_add(&self, dev: &str, parent: Handle, destination: &Subnet, flow: Handle) -> String {
        self.line()
            .args(["filter", "add", "dev", dev, "protocol", destination.protocol()])
            .arg("parent")
            .arg(parent.to_string())
            .arg("prio")
            .arg(FILTER_PRIORITY.to_string())
            .args(["u32", "match", destination.selector(), "dst"])
            .arg(destination.to_string())
            .arg("flowid")
            .arg(flow.to_string())
            .into()
    }
}

/// Builds `brctl` command lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brctl {
    sudo: bool,
}

impl Brctl {
    pub const fn new(sudo: bool) -> Self {
        Self { sudo }
    }

    fn line(&self) -> CommandLine {
        CommandLine::new("brctl", self.sudo)
    }

    pub fn add_bridge(&self, bridge: &str) -> String {
        self.line().args(["addbr", bridge]).into()
    }

    pub fn del_bridge(&self, bridge: &str) -> String {
        self.line().args(["delbr", bridge]).into()
    }

    pub fn stp(&self, bridge: &str, stp: Stp) -> String {
        self.line().args(["stp", bridge, stp.as_str()]).into()
    }

    pub fn add_interface(&self, bridge: &str, interface: &str) -> String {
        self.line().args(["addif", bridge, interface]).into()
    }

    pub fn del_interface(&self, bridge: &str, interface: &str) -> String {
        self.line().args(["delif", bridge, interface]).into()
    }
}
