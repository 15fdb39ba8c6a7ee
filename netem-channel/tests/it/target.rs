use netem_channel::{Channel, Error, SshConfig, Target};

#[test]
fn local_target_runs_processes() {
    let channel = Target::Local.channel();
    assert_eq!(channel.execute("echo netem").unwrap(), "netem\n");
}

#[test]
fn boxed_channels_still_sanitize() {
    let channel = Target::default().channel();
    let err = channel.execute("echo netem; echo pwned").unwrap_err();
    assert!(matches!(err, Error::IllegalCharacters));
}

#[test]
fn display() {
    assert_eq!(Target::Local.to_string(), "local");

    let target = Target::remote(SshConfig::new("10.0.0.2", "admin", "secret"));
    assert!(target.is_remote());
    assert_eq!(target.to_string(), "admin@10.0.0.2:22");
}
