use netem_channel::DryRun;
use netem_tc::{
    Error, Impairment, Options, RateLimit, Report, Request, Shaper, Status, StepKind, Subnet,
    TokenBucket, ValidationError,
};

use crate::helpers::ScriptedChannel;

const NO_SUCH_FILE: &str = "RTNETLINK answers: No such file or directory\n";

#[test]
fn impairment_with_distribution() {
    let _ = tracing_subscriber::fmt::try_init();

    let shaper = Shaper::new(DryRun::new());
    let impairment =
        Impairment::default().with_delay("100ms,10ms,25%").with_distribution("normal");

    let report = Report::from(shaper.apply_impairment("eth0", &impairment));
    assert!(report.is_success(), "{report}");

    let commands = shaper.channel().commands();
    assert_eq!(commands.len(), 2);
    assert_eq!(commands[0], "sudo tc qdisc del dev eth0 root");
    assert!(commands[1].contains("delay 100ms 10ms 25%"));
    assert!(commands[1].contains("distribution normal"));
}

#[test]
fn filtered_token_bucket() {
    let shaper = Shaper::new(DryRun::new());
    let request = Request::new(
        Impairment::default().with_loss("0.3%,25%"),
        RateLimit::new("256kbit").with_destination("10.10.10.0/24"),
    );

    shaper.apply("eth0", &request).unwrap();

    assert_eq!(
        shaper.channel().commands(),
        [
            "sudo tc qdisc del dev eth0 root",
            "sudo tc qdisc add dev eth0 root handle 1: prio",
            "sudo tc qdisc add dev eth0 parent 1:3 handle 30: tbf rate 256kbit buffer 1600 limit 3000",
            "sudo tc qdisc add dev eth0 parent 30:1 handle 31: netem loss 0.3% 25%",
            "sudo tc filter add dev eth0 protocol ip parent 1: prio 3 u32 match ip dst 10.10.10.0/24 flowid 1:3",
        ]
    );
}

#[test]
fn failed_step_skips_the_rest() {
    let shaper = Shaper::new(ScriptedChannel::new().fail_on("tbf", "Error: Invalid rate.\n"));
    let destination: Subnet = "10.10.10.0/24".parse().unwrap();

    let err = shaper
        .apply_filtered_token_bucket(
            "eth0",
            &TokenBucket::new("fast"),
            &destination,
            &Impairment::default().with_loss("0.3%,25%"),
        )
        .unwrap_err();

    assert!(matches!(err, Error::SequenceAborted { step: StepKind::AddTbf, skipped: 2, .. }));
    assert_eq!(Report::from(Err::<String, _>(err)), Report::error("Error: Invalid rate.\n"));

    let ran = shaper.channel().ran();
    assert_eq!(ran.len(), 3);
    assert!(ran.iter().all(|command| !command.contains("netem") && !command.contains("filter")));
}

#[test]
fn failing_root_deletion_is_tolerated() {
    let shaper = Shaper::new(ScriptedChannel::new().fail_on("del", NO_SUCH_FILE));

    let output = shaper.apply_impairment("eth0", &Impairment::default().with_corrupt("0.1%"));

    assert_eq!(output.unwrap(), "");
    assert_eq!(shaper.channel().ran().len(), 2);
}

#[test]
fn delete_twice() {
    let shaper = Shaper::with_options(
        ScriptedChannel::new().fail_on("del", NO_SUCH_FILE),
        &Options::default().with_sudo(false),
    );

    let first = Report::from(shaper.delete_root("eth0"));
    let second = Report::from(shaper.delete_root("eth0"));

    assert_eq!(first, second);
    assert_eq!(first.status, Status::Error);
    assert_eq!(first.msg, NO_SUCH_FILE);
    assert_eq!(shaper.channel().ran(), ["tc qdisc del dev eth0 root", "tc qdisc del dev eth0 root"]);
}

#[test]
fn conflicting_rates_never_reach_the_channel() {
    let shaper = Shaper::new(DryRun::new());
    let request =
        Request::new(Impairment::default().with_rate("1mbit"), RateLimit::new("256kbit"));

    let err = shaper.apply("eth0", &request).unwrap_err();

    assert!(err.is_validation());
    assert!(matches!(err, Error::Validation(ValidationError::ConflictingRates)));
    assert!(shaper.channel().commands().is_empty());
}

#[test]
fn invalid_requests_never_reach_the_channel() {
    let shaper = Shaper::new(DryRun::new());

    for (impairment, rate_limit, expected) in [
        (
            Impairment::default().with_distribution("normal"),
            RateLimit::default(),
            ValidationError::DistributionWithoutDelay,
        ),
        (
            Impairment::default().with_delay("100ms").with_distribution("pareto"),
            RateLimit::default(),
            ValidationError::DistributionWithoutJitter,
        ),
        (
            Impairment::default().with_delay("100ms,10ms").with_distribution("uniform"),
            RateLimit::default(),
            ValidationError::UnknownDistribution("uniform".to_owned()),
        ),
        (
            Impairment::default().with_reorder("25%"),
            RateLimit::default(),
            ValidationError::ReorderWithoutDelay,
        ),
        (
            Impairment::default().with_loss("1%"),
            RateLimit::default().with_limit(3000),
            ValidationError::OptionsWithoutRate,
        ),
        (Impairment::default(), RateLimit::default(), ValidationError::NoParameters),
    ] {
        let err = shaper.apply("eth0", &Request::new(impairment, rate_limit)).unwrap_err();
        assert_eq!(err.to_string(), expected.to_string());
    }

    assert!(shaper.channel().commands().is_empty());
}

#[test]
fn injected_interface_is_rejected() {
    let shaper = Shaper::new(ScriptedChannel::new());

    let report = Report::from(shaper.list("eth0; reboot"));

    assert_eq!(report, Report::error("illegal characters"));
    assert!(shaper.channel().ran().is_empty());
}

#[test]
fn list_returns_the_output() {
    let listing = "qdisc netem 8001: root refcnt 2 limit 1000 delay 100ms  10ms 25%\n\
                   qdisc tbf 10: parent 8001:1 rate 256Kbit burst 1600b lat 4.8ms\n";
    let shaper = Shaper::new(ScriptedChannel::new().respond_to("qdisc ls dev eth0", listing));

    let report = Report::from(shaper.list("eth0"));

    assert_eq!(report, Report::success(listing));
    assert_eq!(report.lines().count(), 2);
    assert_eq!(shaper.channel().ran(), ["sudo tc qdisc ls dev eth0"]);
}

#[test]
fn values_cannot_add_options() {
    let shaper = Shaper::new(ScriptedChannel::new());
    let impairment = Impairment::default().with_duplicate("1% corrupt 50%").with_corrupt("0.1%");

    let err = shaper.apply_impairment("eth0", &impairment).unwrap_err();

    assert!(matches!(
        err,
        Error::Validation(ValidationError::MalformedValue { option: "duplicate", .. })
    ));
    assert!(shaper.channel().ran().is_empty());
}

#[test]
fn malformed_token_bucket_rate_is_rejected() {
    let shaper = Shaper::new(ScriptedChannel::new());
    let request = Request::new(
        Impairment::default().with_loss("1%"),
        RateLimit::new("256kbit parent 1:1"),
    );

    let err = shaper.apply("eth0", &request).unwrap_err();

    assert!(matches!(err, Error::Validation(ValidationError::MalformedValue { option: "rate", .. })));
    assert!(shaper.channel().ran().is_empty());
}

#[test]
fn interface_must_be_a_single_word() {
    let shaper = Shaper::new(ScriptedChannel::new());
    let loss = Impairment::default().with_loss("1%");

    for dev in ["", "  ", "eth0 root handle 5:"] {
        let expected = ValidationError::InvalidInterface(dev.to_owned()).to_string();

        assert_eq!(shaper.apply_impairment(dev, &loss).unwrap_err().to_string(), expected);
        assert_eq!(shaper.delete_root(dev).unwrap_err().to_string(), expected);
        assert_eq!(shaper.list(dev).unwrap_err().to_string(), expected);
    }

    assert!(shaper.channel().ran().is_empty());
}
