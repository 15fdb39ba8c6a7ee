//! Maps subcommands to engine operations.

use netem::{Bridge, Channel, Options, Report, Shaper};
use serde::Serialize;

use crate::cli::{BridgeCommand, Command};

/// What a subcommand produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Single(Report),
    /// One report per device, in the order they were handled.
    PerDevice(Vec<DeviceReport>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceReport {
    pub device: String,
    #[serde(flatten)]
    pub report: Report,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        match self {
            Self::Single(report) => report.is_success(),
            Self::PerDevice(reports) => reports.iter().all(|r| r.report.is_success()),
        }
    }
}

impl From<Report> for Outcome {
    fn from(report: Report) -> Self {
        Self::Single(report)
    }
}

/// Runs `command` through `channel`.
pub fn execute<C: Channel>(command: &Command, channel: C, options: &Options) -> Outcome {
    match command {
        Command::Set(args) => {
            let shaper = Shaper::with_options(channel, options);
            Report::from(shaper.apply(&args.interface, &args.request())).into()
        }
        Command::Clear { interface } => {
            Report::from(Shaper::with_options(channel, options).delete_root(interface)).into()
        }
        Command::Show { interface } => {
            Report::from(Shaper::with_options(channel, options).list(interface)).into()
        }
        Command::Bridge(command) => bridge(command, Bridge::with_options(channel, options)),
    }
}

fn bridge<C: Channel>(command: &BridgeCommand, bridge: Bridge<C>) -> Outcome {
    match command {
        BridgeCommand::Create { stp, interfaces } => {
            let created = Report::from(bridge.create(*stp));
            if !created.is_success() || interfaces.is_empty() {
                return created.into();
            }

            let mut reports = vec![DeviceReport { device: bridge.name().to_owned(), report: created }];
            reports.extend(
                bridge
                    .attach_all(interfaces)
                    .into_iter()
                    .map(|(device, report)| DeviceReport { device, report }),
            );

            Outcome::PerDevice(reports)
        }
        BridgeCommand::Destroy => Report::from(bridge.destroy()).into(),
        BridgeCommand::Attach { interface } => Report::from(bridge.attach(interface)).into(),
        BridgeCommand::Detach { interface } => Report::from(bridge.detach(interface)).into(),
    }
}
