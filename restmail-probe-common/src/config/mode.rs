//! Deployment modes of the service under test.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Where the service under test is running. The mode only selects default
/// ports and the hints printed after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// `cargo run` on the same machine.
    #[default]
    Local,
    /// The docker-compose deployment.
    Docker,
    /// A cluster exposing the service through node ports.
    Kubernetes,
}

impl Mode {
    /// Default port of the policy endpoint.
    #[must_use]
    pub const fn policy_port(self) -> u16 {
        match self {
            Self::Local | Self::Docker => 12345,
            Self::Kubernetes => 30345,
        }
    }

    /// Default port of the mail delivery endpoint.
    #[must_use]
    pub const fn delivery_port(self) -> u16 {
        match self {
            Self::Local | Self::Docker => 2525,
            Self::Kubernetes => 30025,
        }
    }

    /// Where the service stores the mail it accepted.
    #[must_use]
    pub const fn mail_storage_hint(self) -> &'static [&'static str] {
        match self {
            Self::Local => &["/var/mail/restmail/incoming/ (or path from config file)"],
            Self::Docker => &["./deploy/mail-storage/incoming/"],
            Self::Kubernetes => &["/var/mail/restmail/incoming/ (on the node or PVC)"],
        }
    }

    /// How to follow the service's logs.
    #[must_use]
    pub const fn log_hint(self) -> &'static [&'static str] {
        match self {
            Self::Local => &[
                "tail -f /var/log/restmail-receiver/restmail.log",
                "(or check stdout if running with cargo run)",
            ],
            Self::Docker => &[
                "docker logs -f restmail-receiver",
                "or check: ./deploy/logs/",
            ],
            Self::Kubernetes => &["kubectl logs -f deployment/restmail-receiver"],
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Local => "local",
            Self::Docker => "docker",
            Self::Kubernetes => "kubernetes",
        })
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "docker" => Ok(Self::Docker),
            "kubernetes" | "k8s" => Ok(Self::Kubernetes),
            _ => Err(ConfigError::UnknownMode(s.to_string())),
        }
    }
}
