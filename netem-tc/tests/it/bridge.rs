use netem_tc::{Bridge, Error, Options, Report, Stp, ValidationError};

use crate::helpers::ScriptedChannel;

fn options() -> Options {
    Options::default().with_bridge_name("br-test")
}

#[test]
fn create_succeeds_without_a_previous_bridge() {
    let channel = ScriptedChannel::new()
        .fail_on("delbr", "bridge br-test doesn't exist; can't delete it\n");
    let bridge = Bridge::with_options(channel, &options());

    let report = Report::from(bridge.create(Stp::On));

    assert!(report.is_success(), "{report}");
    assert_eq!(
        bridge.channel().ran(),
        ["sudo brctl delbr br-test", "sudo brctl addbr br-test", "sudo brctl stp br-test on"]
    );
}

#[test]
fn create_stops_when_the_bridge_cannot_be_added() {
    let channel = ScriptedChannel::new().fail_on("addbr", "add bridge failed: Operation not permitted\n");
    let bridge = Bridge::with_options(channel, &options());

    let err = bridge.create(Stp::Off).unwrap_err();

    assert!(matches!(err, Error::SequenceAborted { skipped: 1, .. }));
    assert_eq!(bridge.channel().ran().len(), 2);
}

#[test]
fn attach_all_reports_each_interface() {
    let channel = ScriptedChannel::new().fail_on("eth9", "interface eth9 does not exist!\n");
    let bridge = Bridge::with_options(channel, &options());

    let reports = bridge.attach_all(["eth1", "eth9", "eth2"]);

    let statuses: Vec<_> =
        reports.iter().map(|(interface, report)| (interface.as_str(), report.is_success())).collect();
    assert_eq!(statuses, [("eth1", true), ("eth9", false), ("eth2", true)]);
    assert_eq!(reports[1].1.msg, "interface eth9 does not exist!\n");
}

#[test]
fn interface_names_are_checked() {
    let bridge = Bridge::with_options(ScriptedChannel::new(), &options());

    let reports = bridge.attach_all(["eth1 eth2", ""]);
    assert!(reports.iter().all(|(_, report)| !report.is_success()));

    let err = bridge.detach("eth1 eth2").unwrap_err();
    assert!(matches!(err, Error::Validation(ValidationError::InvalidInterface(_))));

    let unnamed = Bridge::with_options(ScriptedChannel::new(), &options().with_bridge_name(" "));
    assert!(unnamed.create(Stp::On).unwrap_err().is_validation());
    assert!(unnamed.channel().ran().is_empty());

    assert!(bridge.channel().ran().is_empty());
}

#[test]
fn detach_and_destroy() {
    let bridge = Bridge::with_options(ScriptedChannel::new(), &options().with_sudo(false));

    bridge.detach("eth1").unwrap();
    bridge.destroy().unwrap();

    assert_eq!(bridge.channel().ran(), ["brctl delif br-test eth1", "brctl delbr br-test"]);
}
