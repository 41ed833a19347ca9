//! Human-readable progress and summary on stdout.

use colored::Colorize;
use restmail_probe_common::ProbeConfig;

use crate::{
    report::Report,
    scenario::{Outcome, Scenario, Verdict},
};

const WIDTH: usize = 63;

fn rule() -> String {
    "═".repeat(WIDTH)
}

/// Prints `text` centred in a double-line box.
fn boxed(text: &str) -> [String; 3] {
    [
        format!("╔{}╗", rule()),
        format!("║{text:^width$}║", width = WIDTH),
        format!("╚{}╝", rule()),
    ]
}

pub fn header(config: &ProbeConfig) {
    for line in boxed("Restmail Receiver Probe") {
        println!("{}", line.blue());
    }
    println!();
    println!("{}", "Configuration:".yellow());
    println!("  Mode:          {}", config.mode.to_string().green());
    println!("  Host:          {}", config.host.green());
    println!("  Policy Port:   {}", config.policy_port().to_string().green());
    println!("  Delivery Port: {}", config.delivery_port().to_string().green());
    println!();
}

pub fn scenario(index: usize, scenario: &Scenario) {
    println!("{}", rule().blue());
    println!("{}", format!("  Test {}: {}", index + 1, scenario.name).blue());
    println!("{}", rule().blue());
    println!("{}", format!("Testing {}...", scenario.target).blue());

    let width = scenario
        .details
        .iter()
        .map(|(label, _)| label.len() + 1)
        .max()
        .unwrap_or_default();
    for (label, value) in &scenario.details {
        println!("  {:<width$} {}", format!("{label}:"), value.yellow());
    }
}

pub fn verdict(verdict: &Verdict) {
    let mut lines = verdict.diagnostic().lines();
    let first = lines.next().unwrap_or_default();

    match verdict.outcome() {
        Outcome::Passed => println!("  {} - {first}", "✓ PASSED".green()),
        Outcome::Mismatch => {
            println!("  {} - Unexpected response", "✗ FAILED".red());
            println!("    {first}");
        }
        Outcome::ConnectionFailure => {
            println!("  {} - {first}", "✗ FAILED".red());
        }
    }

    for line in lines {
        println!("    {line}");
    }
    println!();
}

pub fn summary(report: &Report, config: &ProbeConfig) {
    let (passed, total) = (report.passed(), report.total());

    if report.all_passed() {
        for line in boxed(&format!("All Tests Passed ({passed}/{total})")) {
            println!("{}", line.green());
        }
    } else {
        for line in boxed(&format!("Some Tests Failed ({passed}/{total} passed)")) {
            println!("{}", line.red());
        }
    }

    println!();
    println!(
        "{} Check the mail storage directory for saved emails:",
        "Note:".yellow()
    );
    for hint in config.mode.mail_storage_hint() {
        println!("  {hint}");
    }

    println!();
    println!("{}", "To view logs:".blue());
    for hint in config.mode.log_hint() {
        println!("  {hint}");
    }
}
