//! The bridge device.
//!
//! Bridging two interfaces turns the host into a middlebox: impairments installed on the bridged
//! interfaces then apply to the traffic it forwards.

use std::{fmt, str::FromStr};

use netem_channel::Channel;

use crate::{
    command::Brctl,
    config::Options,
    report::Report,
    request::check_device,
    step::{self, Step, StepKind},
    Result,
};

/// Spanning tree protocol setting of the bridge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Stp {
    #[default]
    On,
    Off,
}

impl Stp {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }
}

impl FromStr for Stp {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "on" => Ok(Self::On),
            "off" => Ok(Self::Off),
            other => Err(format!("stp must be on or off, got {other:?}")),
        }
    }
}

impl fmt::Display for Stp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Manages a single, well-known bridge device.
#[derive(Debug)]
pub struct Bridge<C> {
    channel: C,
    brctl: Brctl,
    name: String,
}

impl<C: Channel> Bridge<C> {
    pub fn new(channel: C) -> Self {
        Self::with_options(channel, &Options::default())
    }

    pub fn with_options(channel: C, options: &Options) -> Self {
        Self { channel, brctl: Brctl::new(options.sudo), name: options.bridge_name.clone() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// (Re-)creates the bridge: deletes any bridge with the same name, ignoring failures, creates
    /// it and sets its spanning tree protocol.
    pub fn create(&self, stp: Stp) -> Result<String> {
        check_device(&self.name)?;
        let steps = [
            Step::tolerant(StepKind::DeleteBridge, self.brctl.del_bridge(&self.name)),
            Step::new(StepKind::AddBridge, self.brctl.add_bridge(&self.name)),
            Step::new(StepKind::SetStp, self.brctl.stp(&self.name, stp)),
        ];

        tracing::debug!(bridge = %self.name, %stp, "creating bridge");

        step::run(&self.channel, &steps)
    }

    pub fn destroy(&self) -> Result<String> {
        check_device(&self.name)?;
        tracing::debug!(bridge = %self.name, "deleting bridge");
        Ok(self.channel.execute(&self.brctl.del_bridge(&self.name))?)
    }

    pub fn attach(&self, interface: &str) -> Result<String> {
        check_device(interface)?;
        Ok(self.channel.execute(&self.brctl.add_interface(&self.name, interface))?)
    }

    pub fn detach(&self, interface: &str) -> Result<String> {
        check_device(interface)?;
        Ok(self.channel.execute(&self.brctl.del_interface(&self.name, interface))?)
    }

    /// Attaches every interface, carrying on after failures. Returns one report per interface,
    /// in order.
    pub fn attach_all<I, S>(&self, interfaces: I) -> Vec<(String, Report)>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        interfaces
            .into_iter()
            .map(|interface| {
                let interface = interface.as_ref();
                (interface.to_owned(), Report::from(self.attach(interface)))
            })
            .collect()
    }
}
