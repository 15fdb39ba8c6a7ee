//! `netem`: apply traffic shaping rules to the interfaces of this host, or of a remote one.

use std::process::ExitCode;

use clap::Parser;
use netem::{DryRun, Report};
use tracing_subscriber::EnvFilter;

mod cli;
mod run;

use cli::Config;
use run::Outcome;

fn main() -> ExitCode {
    let config = Config::parse();

    // Logs go to stderr: stdout is reserved for the outcome.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_level()));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let options = config.options();

    let outcome = if config.dry_run {
        let channel = DryRun::new();
        let outcome = run::execute(&config.command, &channel, &options);
        for command in channel.take() {
            if config.json {
                eprintln!("{command}");
            } else {
                println!("{command}");
            }
        }
        outcome
    } else {
        match config.target() {
            Ok(target) => {
                tracing::info!(%target, "running commands");
                run::execute(&config.command, target.channel(), &options)
            }
            Err(e) => Report::error(e.to_string()).into(),
        }
    };

    print(&outcome, config.json);

    if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print(outcome: &Outcome, json: bool) {
    if json {
        match serde_json::to_string_pretty(outcome) {
            Ok(json) => println!("{json}"),
            Err(e) => tracing::error!(?e, "failed to serialize outcome"),
        }
        return;
    }

    match outcome {
        Outcome::Single(report) if report.is_success() => {
            for line in report.lines() {
                println!("{line}");
            }
        }
        Outcome::Single(report) => eprintln!("error: {}", report.msg.trim_end()),
        Outcome::PerDevice(reports) => {
            for r in reports {
                println!("{}: {}", r.device, r.report.to_string().trim_end());
            }
        }
    }
}
