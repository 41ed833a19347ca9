//! Command-line probe for a running restmail receiver.
//!
//! Exercises the policy service and the mail delivery service with four
//! fixed scenarios and exits non-zero if any of them fails.

use std::{path::PathBuf, process::ExitCode, time::Duration};

use clap::Parser;
use restmail_probe::{Runner, console};
use restmail_probe_common::{Mode, ProbeConfig, internal, logging};

#[derive(Parser, Debug)]
#[command(name = "restmail-probe")]
#[command(about = "Test utility for restmail-receiver", long_about = None)]
#[command(version)]
#[command(after_help = "\
Examples:
  restmail-probe                                 # Test cargo run (local)
  restmail-probe --mode docker                   # Test docker deployment
  restmail-probe --mode kubernetes               # Test kubernetes deployment
  restmail-probe --host 192.168.1.100 --delivery-port 30025 --policy-port 30345")]
struct Cli {
    /// Deployment mode: local, docker or kubernetes (selects default ports)
    #[arg(long)]
    mode: Option<Mode>,

    /// Host to connect to [default: localhost]
    #[arg(long)]
    host: Option<String>,

    /// Policy service port
    #[arg(long)]
    policy_port: Option<u16>,

    /// Mail delivery port
    #[arg(long)]
    delivery_port: Option<u16>,

    /// Policy exchange timeout in seconds [default: 5]
    #[arg(long, value_name = "SECS")]
    policy_timeout: Option<f64>,

    /// Delivery exchange timeout in seconds [default: 10]
    #[arg(long, value_name = "SECS")]
    delivery_timeout: Option<f64>,

    /// RON configuration file (overrides RESTMAIL_PROBE_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Disable coloured output
    #[arg(long)]
    no_color: bool,

    /// Log level for diagnostics on stderr (overrides LOG_LEVEL)
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    /// Layers the flags over a loaded configuration.
    fn apply(self, mut config: ProbeConfig) -> anyhow::Result<ProbeConfig> {
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.policy_port {
            config.policy_port = Some(port);
        }
        if let Some(port) = self.delivery_port {
            config.delivery_port = Some(port);
        }
        if let Some(secs) = self.policy_timeout {
            config.timeouts.policy_ms = millis(secs)?;
        }
        if let Some(secs) = self.delivery_timeout {
            config.timeouts.delivery_ms = millis(secs)?;
        }

        config.validate()?;
        Ok(config)
    }
}

fn millis(secs: f64) -> anyhow::Result<u64> {
    let timeout = Duration::try_from_secs_f64(secs)
        .map_err(|e| anyhow::anyhow!("Invalid timeout {secs}: {e}"))?;
    Ok(u64::try_from(timeout.as_millis())?)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    logging::init(cli.log_level.as_deref());
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = ProbeConfig::load(cli.config.as_deref())?;
    let config = cli.apply(config)?;
    internal!(level = DEBUG, "Effective configuration: {config:?}");

    console::header(&config);

    let runner = Runner::new(config);
    let report = runner
        .run_all_with(console::scenario, console::verdict)
        .await;

    console::summary(&report, runner.config());

    Ok(report.exit_code())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;
    use restmail_probe_common::ConfigError;

    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("restmail-probe").chain(args.iter().copied()))
            .unwrap()
    }

    fn file_config() -> ProbeConfig {
        ProbeConfig::from_ron(
            r#"(
                mode: docker,
                host: "10.0.0.7",
                policy_port: Some(40001),
                timeouts: (policy_ms: 250, delivery_ms: 750),
            )"#,
            Path::new("probe.ron"),
        )
        .unwrap()
    }

    #[test]
    fn flags_override_file_values_and_leave_the_rest() {
        let config = cli(&["--host", "192.168.1.100", "--delivery-timeout", "1.5"])
            .apply(file_config())
            .unwrap();

        assert_eq!(config.host, "192.168.1.100");
        assert_eq!(config.timeouts.delivery_ms, 1500);
        assert_eq!(config.mode, Mode::Docker);
        assert_eq!(config.policy_port(), 40001);
        assert_eq!(config.delivery_port(), 2525);
        assert_eq!(config.timeouts.policy_ms, 250);
    }

    #[test]
    fn flags_without_a_file_override_mode_defaults() {
        let config = cli(&["--mode", "k8s", "--policy-port", "12000"])
            .apply(ProbeConfig::default())
            .unwrap();

        assert_eq!(config.mode, Mode::Kubernetes);
        assert_eq!(config.policy_port(), 12000);
        assert_eq!(config.delivery_port(), 30025);
    }

    #[test]
    fn sub_millisecond_timeout_is_rejected_as_zero() {
        let err = cli(&["--policy-timeout", "0.0001"])
            .apply(ProbeConfig::default())
            .unwrap_err();

        assert!(
            matches!(
                err.downcast_ref::<ConfigError>(),
                Some(ConfigError::ZeroTimeout { service: "policy" })
            ),
            "{err:?}"
        );
    }

    #[test]
    fn negative_or_nan_timeouts_are_rejected() {
        for arg in ["--delivery-timeout=-1", "--delivery-timeout=NaN"] {
            let err = cli(&[arg]).apply(ProbeConfig::default()).unwrap_err();
            assert!(err.to_string().starts_with("Invalid timeout"), "{err}");
        }
    }

    #[test]
    fn millis_rounds_down_to_whole_milliseconds() {
        assert_eq!(millis(5.0).unwrap(), 5000);
        assert_eq!(millis(0.0015).unwrap(), 1);
        assert!(millis(f64::INFINITY).is_err());
    }
}
